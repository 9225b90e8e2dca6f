use std::cell::RefCell;

use backlight_control::bsp::pwm::{
    ChannelConfig, ClockSource, PwmPeripheral, SpeedMode, TimerConfig,
};

use crate::sim_error::SimError;

pub const TIMERS: usize = 4;
pub const CHANNELS: usize = 8;

const APB_CLK_HZ: u64 = 80_000_000;
const REF_TICK_HZ: u64 = 1_000_000;
const MAX_RESOLUTION_BITS: u8 = 20;

#[derive(Clone, Debug, Eq, PartialEq, Copy)]
pub struct ChannelState {
    pub pin: u8,
    pub timer: u8,
    /// Duty which is currently on the output
    pub duty: u32,
    /// Duty written by set_duty, waiting for update_duty
    pub pending_duty: u32,
    pub invert: bool,
    pub running: bool,
    pub idle_high: bool,
}

/// LEDC which resides in memory, low speed group of an ESP32
pub struct SimLedc {
    timers: RefCell<[Option<TimerConfig>; TIMERS]>,
    channels: RefCell<[Option<ChannelState>; CHANNELS]>,
}

impl SimLedc {
    pub fn new() -> Self {
        SimLedc {
            timers: RefCell::new([None; TIMERS]),
            channels: RefCell::new([None; CHANNELS]),
        }
    }

    pub fn timer(&self, timer: u8) -> Option<TimerConfig> {
        self.timers.borrow().get(timer as usize).copied().flatten()
    }

    pub fn channel(&self, channel: u8) -> Option<ChannelState> {
        self.channels.borrow().get(channel as usize).copied().flatten()
    }

    /// Fraction of a period the pad of the channel is high, polarity included
    pub fn pad_high_fraction(&self, channel: u8) -> Option<f64> {
        let state = self.channel(channel)?;
        if !state.running {
            return Some(if state.idle_high { 1.0 } else { 0.0 });
        }
        let timer = self.timer(state.timer)?;
        let fraction = state.duty as f64 / (1u64 << timer.resolution_bits) as f64;
        Some(if state.invert { 1.0 - fraction } else { fraction })
    }

    fn check_channel(channel: u8) -> Result<usize, SimError> {
        if (channel as usize) < CHANNELS {
            Ok(channel as usize)
        } else {
            Err(SimError::InvalidChannel(channel))
        }
    }

    fn check_speed_mode(speed_mode: SpeedMode) -> Result<(), SimError> {
        match speed_mode {
            SpeedMode::LowSpeed => Ok(()),
            SpeedMode::HighSpeed => Err(SimError::UnsupportedSpeedMode),
        }
    }

    fn with_channel<F>(&self, channel: u8, f: F) -> Result<(), SimError>
    where
        F: FnOnce(&mut ChannelState, &TimerConfig) -> Result<(), SimError>,
    {
        let index = Self::check_channel(channel)?;
        let mut channels = self.channels.borrow_mut();
        let state = channels[index]
            .as_mut()
            .ok_or(SimError::ChannelNotConfigured(channel))?;
        let timer = self
            .timer(state.timer)
            .ok_or(SimError::TimerNotConfigured(state.timer))?;
        f(state, &timer)
    }
}

fn max_duty(timer: &TimerConfig) -> u32 {
    1 << timer.resolution_bits
}

impl PwmPeripheral for SimLedc {
    type Error = SimError;

    fn configure_timer(&self, config: &TimerConfig) -> Result<(), Self::Error> {
        Self::check_speed_mode(config.speed_mode)?;
        if config.timer as usize >= TIMERS {
            return Err(SimError::InvalidTimer(config.timer));
        }
        if config.resolution_bits == 0 || config.resolution_bits > MAX_RESOLUTION_BITS {
            return Err(SimError::UnsupportedResolution(config.resolution_bits));
        }
        let source_hz = match config.clock {
            ClockSource::Auto | ClockSource::Apb => APB_CLK_HZ,
            ClockSource::RefTick => REF_TICK_HZ,
        };
        // the timer counter needs one source tick per duty step
        let required_hz = config.freq_hz as u64 * (1u64 << config.resolution_bits);
        if config.freq_hz == 0 || required_hz > source_hz {
            return Err(SimError::UnsupportedFrequency(config.freq_hz));
        }
        self.timers.borrow_mut()[config.timer as usize] = Some(*config);
        Ok(())
    }

    fn configure_channel(&self, config: &ChannelConfig) -> Result<(), Self::Error> {
        Self::check_speed_mode(config.speed_mode)?;
        let index = Self::check_channel(config.channel)?;
        let timer = self
            .timer(config.timer)
            .ok_or(SimError::TimerNotConfigured(config.timer))?;
        if config.duty > max_duty(&timer) {
            return Err(SimError::DutyOutOfRange(config.duty));
        }
        self.channels.borrow_mut()[index] = Some(ChannelState {
            pin: config.pin,
            timer: config.timer,
            duty: config.duty,
            pending_duty: config.duty,
            invert: config.invert,
            running: true,
            idle_high: false,
        });
        Ok(())
    }

    fn set_duty(&self, speed_mode: SpeedMode, channel: u8, duty: u32) -> Result<(), Self::Error> {
        Self::check_speed_mode(speed_mode)?;
        self.with_channel(channel, |state, timer| {
            if duty > max_duty(timer) {
                return Err(SimError::DutyOutOfRange(duty));
            }
            state.pending_duty = duty;
            Ok(())
        })
    }

    fn update_duty(&self, speed_mode: SpeedMode, channel: u8) -> Result<(), Self::Error> {
        Self::check_speed_mode(speed_mode)?;
        self.with_channel(channel, |state, _| {
            state.duty = state.pending_duty;
            state.running = true;
            Ok(())
        })
    }

    fn stop(&self, speed_mode: SpeedMode, channel: u8, idle_high: bool) -> Result<(), Self::Error> {
        Self::check_speed_mode(speed_mode)?;
        self.with_channel(channel, |state, _| {
            state.running = false;
            state.idle_high = idle_high;
            state.duty = 0;
            state.pending_duty = 0;
            Ok(())
        })
    }
}

#[cfg(test)]
mod test {
    use backlight_control::bsp::pwm::{ChannelConfig, ClockSource, PwmPeripheral, SpeedMode, TimerConfig};

    use crate::sim_error::SimError;
    use crate::sim_ledc::SimLedc;

    fn timer(freq_hz: u32, clock: ClockSource) -> TimerConfig {
        TimerConfig {
            speed_mode: SpeedMode::LowSpeed,
            timer: 1,
            resolution_bits: 10,
            freq_hz,
            clock,
        }
    }

    fn channel(invert: bool) -> ChannelConfig {
        ChannelConfig {
            speed_mode: SpeedMode::LowSpeed,
            channel: 3,
            pin: 23,
            timer: 1,
            duty: 0,
            hpoint: 0,
            invert,
        }
    }

    #[test]
    fn duty_reaches_output_after_update() {
        let ledc = SimLedc::new();
        ledc.configure_timer(&timer(5000, ClockSource::Auto)).unwrap();
        ledc.configure_channel(&channel(false)).unwrap();

        ledc.set_duty(SpeedMode::LowSpeed, 3, 512).unwrap();
        assert_eq!(ledc.pad_high_fraction(3), Some(0.0));

        ledc.update_duty(SpeedMode::LowSpeed, 3).unwrap();
        assert_eq!(ledc.pad_high_fraction(3), Some(0.5));
    }

    #[test]
    fn inverted_channel_is_high_for_the_rest_of_the_period() {
        let ledc = SimLedc::new();
        ledc.configure_timer(&timer(5000, ClockSource::Auto)).unwrap();
        ledc.configure_channel(&channel(true)).unwrap();

        ledc.set_duty(SpeedMode::LowSpeed, 3, 256).unwrap();
        ledc.update_duty(SpeedMode::LowSpeed, 3).unwrap();
        assert_eq!(ledc.pad_high_fraction(3), Some(0.75));
    }

    #[test]
    fn stopped_channel_holds_idle_level() {
        let ledc = SimLedc::new();
        ledc.configure_timer(&timer(5000, ClockSource::Auto)).unwrap();
        ledc.configure_channel(&channel(false)).unwrap();
        ledc.set_duty(SpeedMode::LowSpeed, 3, 1023).unwrap();
        ledc.update_duty(SpeedMode::LowSpeed, 3).unwrap();

        ledc.stop(SpeedMode::LowSpeed, 3, false).unwrap();

        let state = ledc.channel(3).unwrap();
        assert!(!state.running);
        assert_eq!(state.duty, 0);
        assert_eq!(ledc.pad_high_fraction(3), Some(0.0));
    }

    #[test]
    fn channel_needs_configured_timer() {
        let ledc = SimLedc::new();
        assert_eq!(
            ledc.configure_channel(&channel(false)),
            Err(SimError::TimerNotConfigured(1))
        );
        assert_eq!(
            ledc.set_duty(SpeedMode::LowSpeed, 3, 1),
            Err(SimError::ChannelNotConfigured(3))
        );
    }

    #[test]
    fn ref_tick_is_too_slow_for_10_bits_at_5khz() {
        let ledc = SimLedc::new();
        assert_eq!(
            ledc.configure_timer(&timer(5000, ClockSource::RefTick)),
            Err(SimError::UnsupportedFrequency(5000))
        );
        assert!(ledc.configure_timer(&timer(500, ClockSource::RefTick)).is_ok());
    }

    #[test]
    fn out_of_range_indices_are_rejected() {
        let ledc = SimLedc::new();
        let mut config = timer(5000, ClockSource::Auto);
        config.timer = 4;
        assert_eq!(ledc.configure_timer(&config), Err(SimError::InvalidTimer(4)));
        assert_eq!(
            ledc.update_duty(SpeedMode::LowSpeed, 8),
            Err(SimError::InvalidChannel(8))
        );
        assert_eq!(
            ledc.update_duty(SpeedMode::HighSpeed, 0),
            Err(SimError::UnsupportedSpeedMode)
        );
    }
}
