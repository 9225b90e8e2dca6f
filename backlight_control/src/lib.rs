// make `std` available when testing
#![cfg_attr(not(test), no_std)]
pub mod backlight;
pub mod bsp;
pub mod config;
pub mod duty;
pub mod error;

pub use backlight::{Backlight, Output};
pub use config::BacklightConfig;
pub use error::Error;
