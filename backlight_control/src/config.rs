pub const MAX_BRIGHTNESS: i32 = 100;

/// LEDC resolution is 10 bits, thus 100% = 1023
pub const DUTY_RESOLUTION_BITS: u8 = 10;
pub const MAX_DUTY: u32 = (1 << DUTY_RESOLUTION_BITS) - 1;
pub const PWM_FREQUENCY_HZ: u32 = 5000;

/// How the backlight of a display is wired
#[derive(Clone, Debug, Eq, PartialEq, Copy)]
pub struct BacklightConfig {
    pub gpio_num: u8,
    /// true: LEDC is used, false: GPIO is used
    pub pwm_control: bool,
    pub channel_idx: u8,
    pub timer_idx: u8,
    /// Backlight is on when the pin is low
    pub output_invert: bool,
}

impl BacklightConfig {
    pub const fn pwm(gpio_num: u8, channel_idx: u8, timer_idx: u8) -> Self {
        BacklightConfig {
            gpio_num,
            pwm_control: true,
            channel_idx,
            timer_idx,
            output_invert: false,
        }
    }

    pub const fn digital(gpio_num: u8) -> Self {
        BacklightConfig {
            gpio_num,
            pwm_control: false,
            channel_idx: 0,
            timer_idx: 0,
            output_invert: false,
        }
    }

    pub const fn inverted(self, output_invert: bool) -> Self {
        BacklightConfig {
            output_invert,
            ..self
        }
    }
}
