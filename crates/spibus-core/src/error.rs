//! Error types for spibus-core
//!
//! This module provides a no_std compatible error type that can be used
//! throughout the crate.

use core::fmt;

use crate::hal::HalError;
use crate::Hertz;

/// Core error type - no_std compatible, Copy for efficiency
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    // Configuration errors
    /// Requested clock frequency is not below the peripheral input clock
    FrequencyTooHigh {
        /// The rejected frequency
        requested: Hertz,
        /// Peripheral input clock at the time of validation
        pclk: Hertz,
    },
    /// Data mode encoding is not one of the four canonical values (0-3)
    InvalidDataMode(u8),
    /// Bit order encoding is not 0 (MSB first) or 1 (LSB first)
    InvalidBitOrder(u8),
    /// Clock divider encoding is not a valid 3-bit prescaler value
    InvalidClockDivider(u8),

    // Driver errors
    /// Peripheral initialization failed
    Init(HalError),
    /// Peripheral deinitialization failed
    Deinit(HalError),
    /// Full-duplex transfer failed
    Transfer(HalError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FrequencyTooHigh { requested, pclk } => write!(
                f,
                "requested clock {} Hz is not below the peripheral clock {} Hz",
                requested.raw(),
                pclk.raw()
            ),
            Self::InvalidDataMode(value) => write!(f, "invalid SPI data mode {}", value),
            Self::InvalidBitOrder(value) => write!(f, "invalid SPI bit order {}", value),
            Self::InvalidClockDivider(value) => {
                write!(f, "invalid SPI clock divider encoding {}", value)
            }
            Self::Init(status) => write!(f, "SPI init failed: {}", status),
            Self::Deinit(status) => write!(f, "SPI deinit failed: {}", status),
            Self::Transfer(status) => write!(f, "SPI transfer failed: {}", status),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

impl embedded_hal::spi::Error for Error {
    fn kind(&self) -> embedded_hal::spi::ErrorKind {
        embedded_hal::spi::ErrorKind::Other
    }
}

/// Result type alias using the core Error type
pub type Result<T> = core::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use core::fmt::Write;

    #[test]
    fn test_display_messages() {
        let mut text = heapless::String::<80>::new();
        let err = Error::FrequencyTooHigh {
            requested: Hertz::from_raw(64_000_000),
            pclk: Hertz::from_raw(64_000_000),
        };
        write!(text, "{}", err).unwrap();
        assert_eq!(
            text.as_str(),
            "requested clock 64000000 Hz is not below the peripheral clock 64000000 Hz"
        );

        text.clear();
        write!(text, "{}", Error::Transfer(HalError::Timeout)).unwrap();
        assert_eq!(text.as_str(), "SPI transfer failed: peripheral timed out");
    }
}
