/// Digital outputs, as exposed by the GPIO matrix of the chip
pub mod gpio {
    use no_std_compat::fmt::Debug;

    #[derive(Clone, Debug, Eq, PartialEq, Copy)]
    pub enum Direction {
        Disabled,
        Input,
        Output,
    }

    /// GPIO driver. Pins are addressed by their number, the same way the chip datasheet does.
    pub trait DigitalIo {
        type Error: Debug;

        /// true if the pin exists and can drive an output
        fn is_valid_output(&self, pin: u8) -> bool;
        /// Routes the pad of the pin to the GPIO function (instead of a peripheral)
        fn select_pad(&self, pin: u8);
        fn set_direction(&self, pin: u8, direction: Direction) -> Result<(), Self::Error>;
        /// Static polarity inversion of the output signal
        fn set_output_inverted(&self, pin: u8, inverted: bool);
        fn set_level(&self, pin: u8, high: bool) -> Result<(), Self::Error>;
    }
}

/// LEDC-like PWM peripheral: a handful of timers, each shared by any number of channels.
pub mod pwm {
    use no_std_compat::fmt::Debug;

    #[derive(Clone, Debug, Eq, PartialEq, Copy)]
    pub enum SpeedMode {
        LowSpeed,
        HighSpeed,
    }

    #[derive(Clone, Debug, Eq, PartialEq, Copy)]
    pub enum ClockSource {
        /// Let the driver pick a source which can produce the requested frequency
        Auto,
        Apb,
        RefTick,
    }

    #[derive(Clone, Debug, Eq, PartialEq, Copy)]
    pub struct TimerConfig {
        pub speed_mode: SpeedMode,
        pub timer: u8,
        pub resolution_bits: u8,
        pub freq_hz: u32,
        pub clock: ClockSource,
    }

    #[derive(Clone, Debug, Eq, PartialEq, Copy)]
    pub struct ChannelConfig {
        pub speed_mode: SpeedMode,
        pub channel: u8,
        pub pin: u8,
        pub timer: u8,
        pub duty: u32,
        pub hpoint: u32,
        pub invert: bool,
    }

    /// PWM driver. [set_duty] only stages the value, it reaches the output after [update_duty].
    pub trait PwmPeripheral {
        type Error: Debug;

        fn configure_timer(&self, config: &TimerConfig) -> Result<(), Self::Error>;
        fn configure_channel(&self, config: &ChannelConfig) -> Result<(), Self::Error>;
        fn set_duty(&self, speed_mode: SpeedMode, channel: u8, duty: u32) -> Result<(), Self::Error>;
        fn update_duty(&self, speed_mode: SpeedMode, channel: u8) -> Result<(), Self::Error>;
        /// Stops the channel and holds the output at the given idle level
        fn stop(&self, speed_mode: SpeedMode, channel: u8, idle_high: bool) -> Result<(), Self::Error>;
    }
}
