use esp_idf_svc::hal::delay::FreeRtos;
use esp_idf_svc::log::EspLogger;
use log::*;

use backlight_control::backlight::Backlight;
use backlight_control::config::BacklightConfig;

use crate::gpio::EspGpio;
use crate::ledc::EspLedc;

mod gpio;
mod ledc;

/// TTGO T-Display
const BACKLIGHT: BacklightConfig = BacklightConfig::pwm(4, 0, 0);
const FADE_STEP: usize = 5;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // It is necessary to call this function once. Otherwise some patches to the runtime
    // implemented by esp-idf-sys might not link properly. See https://github.com/esp-rs/esp-idf-template/issues/71
    esp_idf_svc::sys::link_patches();

    EspLogger::initialize_default();
    set_max_level(LevelFilter::Info);

    let gpio = EspGpio;
    let ledc = EspLedc;
    let mut backlight = Backlight::new(&BACKLIGHT, &gpio, &ledc).map_err(|e| e.to_string())?;

    // fade in and out forever
    loop {
        for percent in (0..=100).chain((0..100).rev()).step_by(FADE_STEP) {
            backlight.set_brightness(percent);
            FreeRtos::delay_ms(50);
        }
        info!("LCD backlight faded {:?}", backlight.output());
    }
}
