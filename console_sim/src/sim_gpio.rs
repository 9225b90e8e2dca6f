use std::cell::RefCell;

use backlight_control::bsp::gpio::{DigitalIo, Direction};

use crate::sim_error::SimError;

pub const PIN_COUNT: usize = 40;

#[derive(Clone, Debug, Eq, PartialEq, Copy)]
pub struct PinState {
    pub direction: Direction,
    /// Level written by software
    pub level: bool,
    pub inverted: bool,
    pub pad_selected: bool,
}

impl PinState {
    /// Level at the pad, after the inversion of the GPIO matrix
    pub fn pad_high(&self) -> bool {
        self.direction == Direction::Output && (self.level ^ self.inverted)
    }
}

const RESET: PinState = PinState {
    direction: Direction::Disabled,
    level: false,
    inverted: false,
    pad_selected: false,
};

/// GPIO matrix which resides in memory, pin map of an ESP32
pub struct SimGpio {
    pins: RefCell<[PinState; PIN_COUNT]>,
}

impl SimGpio {
    pub fn new() -> Self {
        SimGpio {
            pins: RefCell::new([RESET; PIN_COUNT]),
        }
    }

    pub fn pin(&self, pin: u8) -> Option<PinState> {
        self.pins.borrow().get(pin as usize).copied()
    }

    fn modify<F>(&self, pin: u8, f: F) -> Result<(), SimError>
    where
        F: FnOnce(&mut PinState),
    {
        if !self.is_valid_output(pin) {
            return Err(SimError::NotAnOutput(pin));
        }
        f(&mut self.pins.borrow_mut()[pin as usize]);
        Ok(())
    }
}

impl DigitalIo for SimGpio {
    type Error = SimError;

    /// 34..=39 are input only, the rest of the gaps are not bonded out
    fn is_valid_output(&self, pin: u8) -> bool {
        pin < 34 && !matches!(pin, 24 | 28..=31)
    }

    fn select_pad(&self, pin: u8) {
        if let Some(state) = self.pins.borrow_mut().get_mut(pin as usize) {
            state.pad_selected = true;
        }
    }

    fn set_direction(&self, pin: u8, direction: Direction) -> Result<(), Self::Error> {
        if direction == Direction::Output {
            return self.modify(pin, |state| state.direction = direction);
        }
        match self.pins.borrow_mut().get_mut(pin as usize) {
            Some(state) => {
                state.direction = direction;
                Ok(())
            }
            None => Err(SimError::NoSuchPin(pin)),
        }
    }

    fn set_output_inverted(&self, pin: u8, inverted: bool) {
        if let Some(state) = self.pins.borrow_mut().get_mut(pin as usize) {
            state.inverted = inverted;
        }
    }

    fn set_level(&self, pin: u8, high: bool) -> Result<(), Self::Error> {
        self.modify(pin, |state| state.level = high)
    }
}

#[cfg(test)]
mod test {
    use backlight_control::bsp::gpio::{DigitalIo, Direction};

    use crate::sim_error::SimError;
    use crate::sim_gpio::SimGpio;

    #[test]
    fn input_only_pins_are_not_outputs() {
        let gpio = SimGpio::new();
        assert!(gpio.is_valid_output(0));
        assert!(gpio.is_valid_output(23));
        assert!(gpio.is_valid_output(33));
        assert!(!gpio.is_valid_output(24));
        assert!(!gpio.is_valid_output(30));
        assert!(!gpio.is_valid_output(34));
        assert!(!gpio.is_valid_output(39));
        assert!(!gpio.is_valid_output(40));
        assert_eq!(
            gpio.set_direction(36, Direction::Output),
            Err(SimError::NotAnOutput(36))
        );
    }

    #[test]
    fn pad_follows_level_and_inversion() {
        let gpio = SimGpio::new();
        gpio.set_direction(4, Direction::Output).unwrap();

        gpio.set_level(4, true).unwrap();
        assert!(gpio.pin(4).unwrap().pad_high());

        gpio.set_output_inverted(4, true);
        assert!(!gpio.pin(4).unwrap().pad_high());

        gpio.set_level(4, false).unwrap();
        assert!(gpio.pin(4).unwrap().pad_high());
    }

    #[test]
    fn pad_of_disabled_pin_is_low() {
        let gpio = SimGpio::new();
        gpio.set_level(4, true).unwrap();
        assert!(!gpio.pin(4).unwrap().pad_high());
    }
}
