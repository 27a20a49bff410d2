//! Vendor peripheral driver boundary
//!
//! The wrapper reaches the vendor HAL exclusively through the
//! [`SpiPeripheral`] trait. A controller can therefore run against real
//! hardware or against a software peripheral such as `spibus-dummy`.

use core::fmt;

use bitflags::bitflags;
use embedded_hal::spi::{Phase, Polarity};

use crate::divider::ClockDivider;
use crate::mode::BitOrder;
use crate::settings::Settings;
use crate::Hertz;

/// Timeout sentinel requesting an unbounded wait
pub const MAX_DELAY: u32 = u32::MAX;

/// Status word reported by the vendor driver on failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HalError {
    /// The driver reported a generic error
    Failed,
    /// The peripheral is busy with another operation
    Busy,
    /// The operation did not complete within the timeout
    Timeout,
}

impl fmt::Display for HalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Failed => write!(f, "peripheral reported an error"),
            Self::Busy => write!(f, "peripheral is busy"),
            Self::Timeout => write!(f, "peripheral timed out"),
        }
    }
}

bitflags! {
    /// Fixed-function init options handed to the driver
    ///
    /// The wrapper always configures a full-duplex master with 8-bit
    /// frames; these flags cover the remaining init fields.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ConfigFlags: u8 {
        /// Slave select is managed in software, leaving the NSS pin free
        const SOFT_NSS = 1 << 0;
        /// TI frame format instead of Motorola
        const TI_MODE = 1 << 1;
        /// Hardware CRC calculation on each frame
        const HW_CRC = 1 << 2;
    }
}

impl Default for ConfigFlags {
    fn default() -> Self {
        ConfigFlags::SOFT_NSS
    }
}

/// Snapshot of the driver init fields derived from a [`Settings`] value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusConfig {
    /// Baud rate prescaler
    pub divider: ClockDivider,
    /// First bit on the wire
    pub bit_order: BitOrder,
    /// Clock level while the bus is idle
    pub polarity: Polarity,
    /// Clock transition on which data is captured
    pub phase: Phase,
    /// Fixed-function options
    pub flags: ConfigFlags,
}

impl BusConfig {
    /// Translate settings into driver init fields
    ///
    /// `pclk` is the peripheral input clock feeding the prescaler.
    pub fn from_settings(settings: &Settings, pclk: Hertz) -> Self {
        Self {
            divider: ClockDivider::for_frequency(pclk, settings.frequency()),
            bit_order: settings.bit_order(),
            polarity: settings.mode().polarity(),
            phase: settings.mode().phase(),
            flags: ConfigFlags::default(),
        }
    }
}

/// Vendor SPI peripheral driver capability
///
/// Implementations wrap one hardware SPI instance. All operations block
/// until completion; the wait policy is the implementation's concern.
pub trait SpiPeripheral {
    /// Input clock feeding the peripheral's baud rate prescaler
    fn input_clock(&self) -> Hertz;

    /// Configure and enable the peripheral
    fn init(&mut self, config: &BusConfig) -> Result<(), HalError>;

    /// Disable the peripheral
    fn deinit(&mut self) -> Result<(), HalError>;

    /// Blocking full-duplex exchange
    ///
    /// `tx` and `rx` are always the same length. `timeout_ms` bounds the
    /// wait; [`MAX_DELAY`] requests an unbounded wait.
    fn transmit_receive(
        &mut self,
        tx: &[u8],
        rx: &mut [u8],
        timeout_ms: u32,
    ) -> Result<(), HalError>;

    /// Blocking full-duplex exchange over a single buffer
    ///
    /// The buffer is transmitted and overwritten with the received data.
    /// The default implementation stages outgoing bytes through a small
    /// scratch buffer; drivers whose hardware accepts aliased transmit
    /// and receive regions should override it with a single call.
    fn transmit_receive_in_place(
        &mut self,
        buf: &mut [u8],
        timeout_ms: u32,
    ) -> Result<(), HalError> {
        let mut scratch = [0u8; 32];
        for chunk in buf.chunks_mut(scratch.len()) {
            let staged = &mut scratch[..chunk.len()];
            staged.copy_from_slice(chunk);
            self.transmit_receive(staged, chunk, timeout_ms)?;
        }
        Ok(())
    }
}

// Forwarding impl so a peripheral can be lent to a controller without
// giving up ownership.
impl<P: SpiPeripheral + ?Sized> SpiPeripheral for &mut P {
    fn input_clock(&self) -> Hertz {
        (**self).input_clock()
    }

    fn init(&mut self, config: &BusConfig) -> Result<(), HalError> {
        (**self).init(config)
    }

    fn deinit(&mut self) -> Result<(), HalError> {
        (**self).deinit()
    }

    fn transmit_receive(
        &mut self,
        tx: &[u8],
        rx: &mut [u8],
        timeout_ms: u32,
    ) -> Result<(), HalError> {
        (**self).transmit_receive(tx, rx, timeout_ms)
    }

    fn transmit_receive_in_place(
        &mut self,
        buf: &mut [u8],
        timeout_ms: u32,
    ) -> Result<(), HalError> {
        (**self).transmit_receive_in_place(buf, timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mode::DataMode;

    #[test]
    fn test_from_settings_translation() {
        let pclk = Hertz::from_raw(64_000_000);
        let settings = Settings::new(
            Hertz::from_raw(10_000_000),
            BitOrder::LsbFirst,
            DataMode::Mode3,
        );

        let config = BusConfig::from_settings(&settings, pclk);
        assert_eq!(config.divider, ClockDivider::Div8);
        assert_eq!(config.bit_order, BitOrder::LsbFirst);
        assert_eq!(config.polarity, Polarity::IdleHigh);
        assert_eq!(config.phase, Phase::CaptureOnSecondTransition);
        assert_eq!(config.flags, ConfigFlags::SOFT_NSS);
    }

    #[test]
    fn test_default_flags_select_software_nss_only() {
        let flags = ConfigFlags::default();
        assert!(flags.contains(ConfigFlags::SOFT_NSS));
        assert!(!flags.contains(ConfigFlags::TI_MODE));
        assert!(!flags.contains(ConfigFlags::HW_CRC));
    }
}
