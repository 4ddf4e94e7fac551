use core::fmt;

/// Errors returned by the weight unit drivers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error<E> {
    /// The underlying bus transaction failed.
    I2c(E),
    /// The unit answered with firmware version 0.
    NotDetected,
    /// The operation is not allowed while periodic measurement is running.
    PeriodicRunning,
    /// A filter parameter was above its maximum.
    OutOfRange { value: u8, max: u8 },
    /// Not a usable 7-bit address (0x08..=0x77).
    InvalidAddress(u8),
    /// The weight string register did not hold UTF-8.
    InvalidText,
    /// The unit did not come back after an address change.
    Timeout,
}

impl<E: fmt::Debug> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::I2c(e) => write!(f, "i2c error: {e:?}"),
            Error::NotDetected => f.write_str("weight unit not detected"),
            Error::PeriodicRunning => f.write_str("periodic measurement is running"),
            Error::OutOfRange { value, max } => {
                write!(f, "value {value} out of range, must be 0-{max}")
            }
            Error::InvalidAddress(addr) => write!(f, "invalid i2c address {addr:#04x}"),
            Error::InvalidText => f.write_str("weight string is not valid utf-8"),
            Error::Timeout => f.write_str("timed out waiting for the unit"),
        }
    }
}
