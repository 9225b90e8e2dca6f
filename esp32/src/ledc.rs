use esp_idf_svc::sys::{
    esp, ledc_channel_config, ledc_channel_config_t, ledc_intr_type_t_LEDC_INTR_DISABLE,
    ledc_mode_t, ledc_mode_t_LEDC_HIGH_SPEED_MODE, ledc_mode_t_LEDC_LOW_SPEED_MODE, ledc_set_duty,
    ledc_stop, ledc_timer_config, ledc_timer_config_t, ledc_update_duty,
    soc_periph_ledc_clk_src_legacy_t, soc_periph_ledc_clk_src_legacy_t_LEDC_AUTO_CLK,
    soc_periph_ledc_clk_src_legacy_t_LEDC_USE_APB_CLK,
    soc_periph_ledc_clk_src_legacy_t_LEDC_USE_REF_TICK, EspError,
};

use backlight_control::bsp::pwm::{
    ChannelConfig, ClockSource, PwmPeripheral, SpeedMode, TimerConfig,
};

/// LEDC driver of ESP-IDF. Stateless, the driver keeps track of timers and channels.
pub struct EspLedc;

fn mode(speed_mode: SpeedMode) -> ledc_mode_t {
    match speed_mode {
        SpeedMode::LowSpeed => ledc_mode_t_LEDC_LOW_SPEED_MODE,
        SpeedMode::HighSpeed => ledc_mode_t_LEDC_HIGH_SPEED_MODE,
    }
}

fn clock(clock: ClockSource) -> soc_periph_ledc_clk_src_legacy_t {
    match clock {
        ClockSource::Auto => soc_periph_ledc_clk_src_legacy_t_LEDC_AUTO_CLK,
        ClockSource::Apb => soc_periph_ledc_clk_src_legacy_t_LEDC_USE_APB_CLK,
        ClockSource::RefTick => soc_periph_ledc_clk_src_legacy_t_LEDC_USE_REF_TICK,
    }
}

impl PwmPeripheral for EspLedc {
    type Error = EspError;

    fn configure_timer(&self, config: &TimerConfig) -> Result<(), Self::Error> {
        let timer_config = ledc_timer_config_t {
            speed_mode: mode(config.speed_mode),
            duty_resolution: config.resolution_bits as _,
            timer_num: config.timer as _,
            freq_hz: config.freq_hz,
            clk_cfg: clock(config.clock),
            ..Default::default()
        };
        esp!(unsafe { ledc_timer_config(&timer_config) })
    }

    fn configure_channel(&self, config: &ChannelConfig) -> Result<(), Self::Error> {
        let mut channel_config = ledc_channel_config_t {
            gpio_num: config.pin as _,
            speed_mode: mode(config.speed_mode),
            channel: config.channel as _,
            intr_type: ledc_intr_type_t_LEDC_INTR_DISABLE,
            timer_sel: config.timer as _,
            duty: config.duty,
            hpoint: config.hpoint as _,
            ..Default::default()
        };
        channel_config.flags.set_output_invert(config.invert as u32);
        esp!(unsafe { ledc_channel_config(&channel_config) })
    }

    fn set_duty(&self, speed_mode: SpeedMode, channel: u8, duty: u32) -> Result<(), Self::Error> {
        esp!(unsafe { ledc_set_duty(mode(speed_mode), channel as _, duty) })
    }

    fn update_duty(&self, speed_mode: SpeedMode, channel: u8) -> Result<(), Self::Error> {
        esp!(unsafe { ledc_update_duty(mode(speed_mode), channel as _) })
    }

    fn stop(&self, speed_mode: SpeedMode, channel: u8, idle_high: bool) -> Result<(), Self::Error> {
        esp!(unsafe { ledc_stop(mode(speed_mode), channel as _, idle_high as u32) })
    }
}
