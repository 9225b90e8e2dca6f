use crate::config::{MAX_BRIGHTNESS, MAX_DUTY};

/// Out of range values are not an error, they are silently clamped to 0..=100
pub fn clamp_percent(percent: i32) -> u8 {
    percent.clamp(0, MAX_BRIGHTNESS) as u8
}

/// Duty cycle for the given brightness. Truncates, so 50% is 511 and not 512.
pub fn duty_for_percent(percent: u8) -> u32 {
    MAX_DUTY * percent as u32 / MAX_BRIGHTNESS as u32
}

#[cfg(test)]
mod test {
    use crate::duty::{clamp_percent, duty_for_percent};

    #[test]
    fn clamps_to_percent_range() {
        assert_eq!(clamp_percent(i32::MIN), 0);
        assert_eq!(clamp_percent(-1), 0);
        assert_eq!(clamp_percent(0), 0);
        assert_eq!(clamp_percent(42), 42);
        assert_eq!(clamp_percent(100), 100);
        assert_eq!(clamp_percent(101), 100);
        assert_eq!(clamp_percent(i32::MAX), 100);
    }

    #[test]
    fn calculate_duty() {
        let expected = [0, 102, 204, 306, 409, 511, 613, 716, 818, 920, 1023];
        let duties: Vec<u32> = (0..=10).map(|i| duty_for_percent(i * 10)).collect();
        assert_eq!(duties, expected);
        assert_eq!(duty_for_percent(1), 10);
        assert_eq!(duty_for_percent(99), 1012);
    }
}
