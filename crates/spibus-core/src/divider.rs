//! Baud rate prescaler selection

use crate::error::Error;
use crate::Hertz;

/// Baud rate prescaler dividing the peripheral input clock down to SCK
///
/// The discriminant is the 3-bit register encoding of the divider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum ClockDivider {
    /// SCK = pclk / 2
    Div2 = 0b000,
    /// SCK = pclk / 4
    Div4 = 0b001,
    /// SCK = pclk / 8
    Div8 = 0b010,
    /// SCK = pclk / 16
    Div16 = 0b011,
    /// SCK = pclk / 32
    Div32 = 0b100,
    /// SCK = pclk / 64
    Div64 = 0b101,
    /// SCK = pclk / 128
    Div128 = 0b110,
    /// SCK = pclk / 256
    Div256 = 0b111,
}

impl ClockDivider {
    /// All dividers, fastest first
    pub const ALL: [ClockDivider; 8] = [
        ClockDivider::Div2,
        ClockDivider::Div4,
        ClockDivider::Div8,
        ClockDivider::Div16,
        ClockDivider::Div32,
        ClockDivider::Div64,
        ClockDivider::Div128,
        ClockDivider::Div256,
    ];

    /// Division factor applied to the input clock (2-256)
    pub const fn divisor(self) -> u32 {
        2u32 << (self as u32)
    }

    /// 3-bit register encoding (0b000-0b111)
    pub const fn bits(self) -> u8 {
        self as u8
    }

    /// SCK rate this divider produces from the given input clock
    pub const fn actual(self, pclk: Hertz) -> Hertz {
        Hertz::from_raw(pclk.raw() / self.divisor())
    }

    /// Select the smallest divider whose output rate is at or below `target`
    ///
    /// Falls back to `Div256` when even the largest divider is too fast,
    /// so a request can only be exceeded at the slow end of the ladder.
    pub fn for_frequency(pclk: Hertz, target: Hertz) -> Self {
        let pclk = pclk.raw();
        let target = target.raw();
        for divider in Self::ALL {
            if target >= pclk / divider.divisor() {
                return divider;
            }
        }
        Self::Div256
    }
}

impl TryFrom<u8> for ClockDivider {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Error> {
        Self::ALL
            .into_iter()
            .find(|divider| divider.bits() == value)
            .ok_or(Error::InvalidClockDivider(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PCLK: Hertz = Hertz::from_raw(64_000_000);

    #[test]
    fn test_divisor_and_encoding() {
        assert_eq!(ClockDivider::Div2.divisor(), 2);
        assert_eq!(ClockDivider::Div32.divisor(), 32);
        assert_eq!(ClockDivider::Div256.divisor(), 256);
        assert_eq!(ClockDivider::Div2.bits(), 0b000);
        assert_eq!(ClockDivider::Div16.bits(), 0b011);
        assert_eq!(ClockDivider::Div256.bits(), 0b111);
    }

    #[test]
    fn test_fast_request_picks_smallest_divider() {
        // 64 MHz / 2 = 32 MHz is already at or below the 40 MHz request
        let divider = ClockDivider::for_frequency(PCLK, Hertz::from_raw(40_000_000));
        assert_eq!(divider, ClockDivider::Div2);
    }

    #[test]
    fn test_slow_request_clamps_to_largest_divider() {
        // 64 MHz / 256 = 250 kHz still exceeds the request; clamp
        let divider = ClockDivider::for_frequency(PCLK, Hertz::from_raw(100_000));
        assert_eq!(divider, ClockDivider::Div256);
        assert_eq!(divider.actual(PCLK), Hertz::from_raw(250_000));
    }

    #[test]
    fn test_exact_ladder_steps() {
        for divider in ClockDivider::ALL {
            let request = Hertz::from_raw(PCLK.raw() / divider.divisor());
            assert_eq!(ClockDivider::for_frequency(PCLK, request), divider);
        }
    }

    #[test]
    fn test_selection_is_monotonic() {
        let mut last = ClockDivider::for_frequency(PCLK, Hertz::from_raw(1)).divisor();
        for hz in [100_000, 250_000, 1_000_000, 3_000_000, 9_000_000, 33_000_000] {
            let divisor = ClockDivider::for_frequency(PCLK, Hertz::from_raw(hz)).divisor();
            assert!(divisor <= last);
            last = divisor;
        }
    }

    #[test]
    fn test_chosen_rate_never_exceeds_request() {
        for hz in [250_000u32, 600_000, 1_500_000, 8_000_000, 32_000_000] {
            let divider = ClockDivider::for_frequency(PCLK, Hertz::from_raw(hz));
            assert!(divider.actual(PCLK).raw() <= hz);
        }
    }

    #[test]
    fn test_register_encoding_validation() {
        assert_eq!(ClockDivider::try_from(0b011), Ok(ClockDivider::Div16));
        assert_eq!(ClockDivider::try_from(8), Err(Error::InvalidClockDivider(8)));
    }
}
