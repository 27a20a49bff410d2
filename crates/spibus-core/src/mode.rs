//! SPI bit order and data modes

use embedded_hal::spi::{Mode, Phase, Polarity};

use crate::error::Error;

/// Bit order of each transferred frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BitOrder {
    /// Most significant bit first (default)
    #[default]
    MsbFirst,
    /// Least significant bit first
    LsbFirst,
}

impl BitOrder {
    /// Raw encoding: 0 for MSB first, 1 for LSB first
    pub const fn bits(self) -> u8 {
        match self {
            Self::MsbFirst => 0,
            Self::LsbFirst => 1,
        }
    }
}

impl TryFrom<u8> for BitOrder {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Error> {
        match value {
            0 => Ok(Self::MsbFirst),
            1 => Ok(Self::LsbFirst),
            other => Err(Error::InvalidBitOrder(other)),
        }
    }
}

/// SPI data mode: clock polarity and capture phase
///
/// The canonical encoding puts CPOL in bit 1 and CPHA in bit 0, so the
/// four modes map to the values 0 through 3.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DataMode {
    /// CPOL=0, CPHA=0: clock idles low, data captured on the first edge (default)
    #[default]
    Mode0,
    /// CPOL=0, CPHA=1: clock idles low, data captured on the second edge
    Mode1,
    /// CPOL=1, CPHA=0: clock idles high, data captured on the first edge
    Mode2,
    /// CPOL=1, CPHA=1: clock idles high, data captured on the second edge
    Mode3,
}

impl DataMode {
    /// Clock level while the bus is idle
    pub const fn polarity(self) -> Polarity {
        match self {
            Self::Mode0 | Self::Mode1 => Polarity::IdleLow,
            Self::Mode2 | Self::Mode3 => Polarity::IdleHigh,
        }
    }

    /// Clock transition on which data is captured
    pub const fn phase(self) -> Phase {
        match self {
            Self::Mode0 | Self::Mode2 => Phase::CaptureOnFirstTransition,
            Self::Mode1 | Self::Mode3 => Phase::CaptureOnSecondTransition,
        }
    }

    /// Canonical encoding (0-3)
    pub const fn bits(self) -> u8 {
        match self {
            Self::Mode0 => 0,
            Self::Mode1 => 1,
            Self::Mode2 => 2,
            Self::Mode3 => 3,
        }
    }
}

impl TryFrom<u8> for DataMode {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Error> {
        match value {
            0 => Ok(Self::Mode0),
            1 => Ok(Self::Mode1),
            2 => Ok(Self::Mode2),
            3 => Ok(Self::Mode3),
            other => Err(Error::InvalidDataMode(other)),
        }
    }
}

impl From<DataMode> for Mode {
    fn from(mode: DataMode) -> Self {
        Mode {
            polarity: mode.polarity(),
            phase: mode.phase(),
        }
    }
}

impl From<Mode> for DataMode {
    fn from(mode: Mode) -> Self {
        match (mode.polarity, mode.phase) {
            (Polarity::IdleLow, Phase::CaptureOnFirstTransition) => Self::Mode0,
            (Polarity::IdleLow, Phase::CaptureOnSecondTransition) => Self::Mode1,
            (Polarity::IdleHigh, Phase::CaptureOnFirstTransition) => Self::Mode2,
            (Polarity::IdleHigh, Phase::CaptureOnSecondTransition) => Self::Mode3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_polarity_phase_map() {
        assert_eq!(DataMode::Mode0.polarity(), Polarity::IdleLow);
        assert_eq!(DataMode::Mode0.phase(), Phase::CaptureOnFirstTransition);
        assert_eq!(DataMode::Mode1.polarity(), Polarity::IdleLow);
        assert_eq!(DataMode::Mode1.phase(), Phase::CaptureOnSecondTransition);
        assert_eq!(DataMode::Mode2.polarity(), Polarity::IdleHigh);
        assert_eq!(DataMode::Mode2.phase(), Phase::CaptureOnFirstTransition);
        assert_eq!(DataMode::Mode3.polarity(), Polarity::IdleHigh);
        assert_eq!(DataMode::Mode3.phase(), Phase::CaptureOnSecondTransition);
    }

    #[test]
    fn test_data_mode_accepts_canonical_encodings() {
        for value in 0..=3u8 {
            let mode = DataMode::try_from(value).unwrap();
            assert_eq!(mode.bits(), value);
        }
    }

    #[test]
    fn test_data_mode_rejects_other_encodings() {
        assert_eq!(DataMode::try_from(4), Err(Error::InvalidDataMode(4)));
        assert_eq!(DataMode::try_from(0xFF), Err(Error::InvalidDataMode(0xFF)));
    }

    #[test]
    fn test_bit_order_encodings() {
        assert_eq!(BitOrder::try_from(0), Ok(BitOrder::MsbFirst));
        assert_eq!(BitOrder::try_from(1), Ok(BitOrder::LsbFirst));
        assert_eq!(BitOrder::try_from(2), Err(Error::InvalidBitOrder(2)));
        assert_eq!(BitOrder::MsbFirst.bits(), 0);
        assert_eq!(BitOrder::LsbFirst.bits(), 1);
    }

    #[test]
    fn test_embedded_hal_mode_conversion() {
        use embedded_hal::spi::{MODE_1, MODE_2};

        assert_eq!(Mode::from(DataMode::Mode1), MODE_1);
        assert_eq!(DataMode::from(MODE_2), DataMode::Mode2);
    }
}
