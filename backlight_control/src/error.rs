use no_std_compat::fmt::{self, Display, Formatter};

/// Recoverable errors of [crate::backlight::Backlight::new]. Peripheral failures are not
/// reported here, misconfigured hardware has no safe fallback and panics instead.
#[derive(Clone, Debug, Eq, PartialEq, Copy)]
pub enum Error {
    /// The pin does not exist or can not drive an output
    InvalidPin { pin: u8 },
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidPin { pin } => write!(f, "GPIO {} can not be used as an output", pin),
        }
    }
}
