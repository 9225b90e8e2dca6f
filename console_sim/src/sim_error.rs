use std::fmt::{Display, Formatter};

/// What the simulated peripherals refuse to do
#[derive(Clone, Debug, Eq, PartialEq, Copy)]
pub enum SimError {
    InvalidTimer(u8),
    InvalidChannel(u8),
    TimerNotConfigured(u8),
    ChannelNotConfigured(u8),
    DutyOutOfRange(u32),
    UnsupportedFrequency(u32),
    UnsupportedResolution(u8),
    UnsupportedSpeedMode,
    NoSuchPin(u8),
    NotAnOutput(u8),
}

impl Display for SimError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SimError::InvalidTimer(timer) => write!(f, "no such timer: {}", timer),
            SimError::InvalidChannel(channel) => write!(f, "no such channel: {}", channel),
            SimError::TimerNotConfigured(timer) => write!(f, "timer {} is not configured", timer),
            SimError::ChannelNotConfigured(channel) => {
                write!(f, "channel {} is not configured", channel)
            }
            SimError::DutyOutOfRange(duty) => write!(f, "duty {} exceeds timer resolution", duty),
            SimError::UnsupportedFrequency(freq) => write!(f, "can not generate {} Hz", freq),
            SimError::UnsupportedResolution(bits) => write!(f, "{} bit resolution", bits),
            SimError::UnsupportedSpeedMode => write!(f, "only the low speed group is simulated"),
            SimError::NoSuchPin(pin) => write!(f, "no such GPIO: {}", pin),
            SimError::NotAnOutput(pin) => write!(f, "GPIO {} can not be an output", pin),
        }
    }
}

impl std::error::Error for SimError {}
