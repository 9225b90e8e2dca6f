use esp_idf_svc::sys::{
    esp, esp_rom_gpio_connect_out_signal, esp_rom_gpio_pad_select_gpio, gpio_mode_t,
    gpio_mode_t_GPIO_MODE_DISABLE, gpio_mode_t_GPIO_MODE_INPUT, gpio_mode_t_GPIO_MODE_OUTPUT,
    gpio_set_direction, gpio_set_level, EspError, SIG_GPIO_OUT_IDX,
};

use backlight_control::bsp::gpio::{DigitalIo, Direction};

/// GPIO0..=GPIO33 minus the pins which are not bonded out, GPIO34..=GPIO39 are input only
const VALID_OUTPUT_MASK: u64 = 0x3_FFFF_FFFF & !(1 << 24 | 0b1111 << 28);

/// GPIO driver of ESP-IDF
pub struct EspGpio;

impl DigitalIo for EspGpio {
    type Error = EspError;

    fn is_valid_output(&self, pin: u8) -> bool {
        pin < 64 && VALID_OUTPUT_MASK & (1 << pin) != 0
    }

    fn select_pad(&self, pin: u8) {
        unsafe { esp_rom_gpio_pad_select_gpio(pin as _) }
    }

    fn set_direction(&self, pin: u8, direction: Direction) -> Result<(), Self::Error> {
        let mode: gpio_mode_t = match direction {
            Direction::Disabled => gpio_mode_t_GPIO_MODE_DISABLE,
            Direction::Input => gpio_mode_t_GPIO_MODE_INPUT,
            Direction::Output => gpio_mode_t_GPIO_MODE_OUTPUT,
        };
        esp!(unsafe { gpio_set_direction(pin as _, mode) })
    }

    fn set_output_inverted(&self, pin: u8, inverted: bool) {
        unsafe { esp_rom_gpio_connect_out_signal(pin as _, SIG_GPIO_OUT_IDX, inverted, false) }
    }

    fn set_level(&self, pin: u8, high: bool) -> Result<(), Self::Error> {
        esp!(unsafe { gpio_set_level(pin as _, high as u32) })
    }
}
