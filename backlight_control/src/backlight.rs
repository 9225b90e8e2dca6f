use log::{debug, error, info, warn};
use no_std_compat::fmt::Debug;

use crate::bsp::gpio::{DigitalIo, Direction};
use crate::bsp::pwm::{ChannelConfig, ClockSource, PwmPeripheral, SpeedMode, TimerConfig};
use crate::config::{BacklightConfig, DUTY_RESOLUTION_BITS, MAX_BRIGHTNESS, PWM_FREQUENCY_HZ};
use crate::duty::{clamp_percent, duty_for_percent};
use crate::error::Error;

const SPEED_MODE: SpeedMode = SpeedMode::LowSpeed;

/// What drives the backlight. Chosen once in [Backlight::new].
#[derive(Clone, Debug, Eq, PartialEq, Copy)]
pub enum Output {
    /// Dimmable, duty cycle of a PWM channel
    Pwm { channel: u8 },
    /// On or off, level of a GPIO
    Digital { pin: u8 },
}

/// Backlight of a display.
///
/// Dropping the backlight stops the PWM channel (output held low) or hands the pin back to the
/// GPIO matrix.
pub struct Backlight<'a, G: DigitalIo, P: PwmPeripheral> {
    output: Output,
    gpio: &'a G,
    pwm: &'a P,
    brightness: u8,
}

impl<'a, G: DigitalIo, P: PwmPeripheral> Backlight<'a, G, P> {
    /// Configures the peripherals according to the config.
    ///
    /// Fails only if the pin can not be an output, in which case no peripheral is touched.
    /// Panics if a peripheral rejects the configuration.
    pub fn new(config: &BacklightConfig, gpio: &'a G, pwm: &'a P) -> Result<Self, Error> {
        if !gpio.is_valid_output(config.gpio_num) {
            warn!("Invalid GPIO number {}", config.gpio_num);
            return Err(Error::InvalidPin {
                pin: config.gpio_num,
            });
        }

        let output = if config.pwm_control {
            configure_pwm(config, pwm)
        } else {
            configure_digital(config, gpio)
        };
        info!("LCD backlight on GPIO {}: {:?}", config.gpio_num, output);

        Ok(Backlight {
            output,
            gpio,
            pwm,
            brightness: 0,
        })
    }

    pub fn output(&self) -> Output {
        self.output
    }

    /// Last brightness which was set, 0..=100
    pub fn brightness(&self) -> u8 {
        self.brightness
    }

    /// Sets brightness in percent, values outside of 0..=100 are clamped.
    ///
    /// A digital backlight is on for anything above 0%.
    pub fn set_brightness(&mut self, percent: i32) {
        let percent = clamp_percent(percent);
        info!("Setting LCD backlight: {}%", percent);

        match self.output {
            Output::Pwm { channel } => {
                let duty = duty_for_percent(percent);
                check("set PWM duty", self.pwm.set_duty(SPEED_MODE, channel, duty));
                check("update PWM duty", self.pwm.update_duty(SPEED_MODE, channel));
            }
            Output::Digital { pin } => {
                check("set GPIO level", self.gpio.set_level(pin, percent > 0));
            }
        }

        self.brightness = percent;
    }

    pub fn on(&mut self) {
        self.set_brightness(MAX_BRIGHTNESS);
    }

    pub fn off(&mut self) {
        self.set_brightness(0);
    }

    /// Same as dropping the backlight
    pub fn delete(self) {}
}

impl<'a, G: DigitalIo, P: PwmPeripheral> Drop for Backlight<'a, G, P> {
    fn drop(&mut self) {
        debug!("Deleting LCD backlight {:?}", self.output);
        match self.output {
            Output::Pwm { channel } => {
                if let Err(e) = self.pwm.stop(SPEED_MODE, channel, false) {
                    warn!("Failed to stop PWM channel {}: {:?}", channel, e);
                }
            }
            Output::Digital { pin } => self.gpio.select_pad(pin),
        }
    }
}

/// Sets the brightness if there is a backlight at all
pub fn set_brightness<G: DigitalIo, P: PwmPeripheral>(
    backlight: Option<&mut Backlight<'_, G, P>>,
    percent: i32,
) {
    if let Some(backlight) = backlight {
        backlight.set_brightness(percent);
    }
}

/// Deletes the backlight if there is one
pub fn delete<G: DigitalIo, P: PwmPeripheral>(backlight: Option<Backlight<'_, G, P>>) {
    if let Some(backlight) = backlight {
        backlight.delete();
    }
}

fn configure_pwm<P: PwmPeripheral>(config: &BacklightConfig, pwm: &P) -> Output {
    let timer = TimerConfig {
        speed_mode: SPEED_MODE,
        timer: config.timer_idx,
        resolution_bits: DUTY_RESOLUTION_BITS,
        freq_hz: PWM_FREQUENCY_HZ,
        clock: ClockSource::Auto,
    };
    let channel = ChannelConfig {
        speed_mode: SPEED_MODE,
        channel: config.channel_idx,
        pin: config.gpio_num,
        timer: config.timer_idx,
        duty: 0,
        hpoint: 0,
        invert: config.output_invert,
    };

    // channel can only be bound to a timer which is already running
    check("configure PWM timer", pwm.configure_timer(&timer));
    check("configure PWM channel", pwm.configure_channel(&channel));

    Output::Pwm {
        channel: config.channel_idx,
    }
}

fn configure_digital<G: DigitalIo>(config: &BacklightConfig, gpio: &G) -> Output {
    let pin = config.gpio_num;
    gpio.select_pad(pin);
    check("set GPIO direction", gpio.set_direction(pin, Direction::Output));
    gpio.set_output_inverted(pin, config.output_invert);
    Output::Digital { pin }
}

/// Peripherals which fail to take a setting are left in an unknown state, there is no way back.
fn check<E: Debug>(operation: &str, result: Result<(), E>) {
    if let Err(e) = result {
        error!("{} failed: {:?}", operation, e);
        panic!("{} failed: {:?}", operation, e);
    }
}
