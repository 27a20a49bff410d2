//! SPI transaction settings

use crate::error::{Error, Result};
use crate::mode::{BitOrder, DataMode};
use crate::Hertz;

/// Default SPI clock frequency (1 MHz)
const DEFAULT_FREQUENCY: Hertz = Hertz::from_raw(1_000_000);

/// SPI bus settings: clock frequency, bit order, and data mode
///
/// The value object applied by [`Spi::begin_transaction_with`]. Defaults
/// are 1 MHz, MSB first, mode 0.
///
/// [`Spi::begin_transaction_with`]: crate::Spi::begin_transaction_with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Settings {
    frequency: Hertz,
    bit_order: BitOrder,
    mode: DataMode,
}

impl Default for Settings {
    fn default() -> Self {
        Self::new(DEFAULT_FREQUENCY, BitOrder::MsbFirst, DataMode::Mode0)
    }
}

impl Settings {
    /// Create settings from the three bus parameters
    pub const fn new(frequency: Hertz, bit_order: BitOrder, mode: DataMode) -> Self {
        Self {
            frequency,
            bit_order,
            mode,
        }
    }

    /// Set the clock frequency
    pub const fn with_frequency(mut self, frequency: Hertz) -> Self {
        self.frequency = frequency;
        self
    }

    /// Set the bit order
    pub const fn with_bit_order(mut self, bit_order: BitOrder) -> Self {
        self.bit_order = bit_order;
        self
    }

    /// Set the data mode
    pub const fn with_mode(mut self, mode: DataMode) -> Self {
        self.mode = mode;
        self
    }

    /// Requested clock frequency
    pub const fn frequency(&self) -> Hertz {
        self.frequency
    }

    /// First bit on the wire
    pub const fn bit_order(&self) -> BitOrder {
        self.bit_order
    }

    /// Data mode
    pub const fn mode(&self) -> DataMode {
        self.mode
    }

    /// Replace the clock frequency, validated against the peripheral clock
    ///
    /// The frequency must be strictly below `pclk`; on rejection the
    /// stored value is left unchanged.
    pub fn set_frequency(&mut self, frequency: Hertz, pclk: Hertz) -> Result<()> {
        if frequency >= pclk {
            return Err(Error::FrequencyTooHigh {
                requested: frequency,
                pclk,
            });
        }
        self.frequency = frequency;
        Ok(())
    }

    /// Replace the bit order
    pub fn set_bit_order(&mut self, bit_order: BitOrder) {
        self.bit_order = bit_order;
    }

    /// Replace the data mode
    pub fn set_mode(&mut self, mode: DataMode) {
        self.mode = mode;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PCLK: Hertz = Hertz::from_raw(64_000_000);

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.frequency(), Hertz::from_raw(1_000_000));
        assert_eq!(settings.bit_order(), BitOrder::MsbFirst);
        assert_eq!(settings.mode(), DataMode::Mode0);
    }

    #[test]
    fn test_set_frequency_below_pclk() {
        let mut settings = Settings::default();
        settings
            .set_frequency(Hertz::from_raw(63_999_999), PCLK)
            .unwrap();
        assert_eq!(settings.frequency(), Hertz::from_raw(63_999_999));
    }

    #[test]
    fn test_set_frequency_at_or_above_pclk_is_rejected() {
        let mut settings = Settings::default();

        let err = settings.set_frequency(PCLK, PCLK).unwrap_err();
        assert_eq!(
            err,
            Error::FrequencyTooHigh {
                requested: PCLK,
                pclk: PCLK,
            }
        );
        assert_eq!(settings.frequency(), Hertz::from_raw(1_000_000));

        let above = Hertz::from_raw(80_000_000);
        assert!(settings.set_frequency(above, PCLK).is_err());
        assert_eq!(settings.frequency(), Hertz::from_raw(1_000_000));
    }

    #[test]
    fn test_builders() {
        let settings = Settings::default()
            .with_frequency(Hertz::from_raw(8_000_000))
            .with_bit_order(BitOrder::LsbFirst)
            .with_mode(DataMode::Mode2);
        assert_eq!(settings.frequency(), Hertz::from_raw(8_000_000));
        assert_eq!(settings.bit_order(), BitOrder::LsbFirst);
        assert_eq!(settings.mode(), DataMode::Mode2);
    }
}
