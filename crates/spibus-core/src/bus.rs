//! SPI master controller
//!
//! [`Spi`] owns one [`SpiPeripheral`] and drives it from a [`Settings`]
//! snapshot: begin/end for the peripheral lifecycle, transaction
//! bracketing that reconfigures the hardware only when the settings
//! change, and blocking byte/word/buffer transfers.

use embedded_hal::spi::SpiBus;

use crate::divider::ClockDivider;
use crate::error::{Error, Result};
use crate::hal::{BusConfig, SpiPeripheral, MAX_DELAY};
use crate::mode::{BitOrder, DataMode};
use crate::settings::Settings;

/// Byte clocked out when the caller provides nothing to transmit
const FILLER: u8 = 0x00;

/// SPI master controller over a vendor peripheral driver
///
/// # Example
///
/// ```ignore
/// use spibus_core::{Spi, SpiPeripheral};
///
/// fn read_status<P: SpiPeripheral>(periph: P) -> spibus_core::Result<u8> {
///     let mut spi = Spi::new(periph);
///     spi.begin()?;
///     spi.transfer_byte(0x05)
/// }
/// ```
pub struct Spi<P: SpiPeripheral> {
    periph: P,
    settings: Settings,
    /// Settings currently applied to the hardware; `None` while uninitialized
    applied: Option<Settings>,
    last_error: Option<Error>,
}

impl<P: SpiPeripheral> Spi<P> {
    /// Create a controller with default settings (1 MHz, MSB first, mode 0)
    pub fn new(periph: P) -> Self {
        Self::with_settings(periph, Settings::default())
    }

    /// Create a controller with the given settings
    ///
    /// The peripheral is not touched until [`begin`](Self::begin) or
    /// [`begin_transaction`](Self::begin_transaction) is called.
    pub fn with_settings(periph: P, settings: Settings) -> Self {
        Self {
            periph,
            settings,
            applied: None,
            last_error: None,
        }
    }

    /// Initialize the peripheral with the current settings
    ///
    /// Always reconfigures the hardware, even when already initialized.
    /// On failure the previous state is kept and the call can be retried.
    pub fn begin(&mut self) -> Result<()> {
        self.apply()
    }

    /// Deinitialize the peripheral
    ///
    /// On failure the driver may be left in either state; the error is
    /// recorded and the controller keeps its initialized marker.
    pub fn end(&mut self) -> Result<()> {
        match self.periph.deinit() {
            Ok(()) => {
                log::debug!("spi: deinitialized");
                self.applied = None;
                Ok(())
            }
            Err(status) => Err(self.record(Error::Deinit(status))),
        }
    }

    /// Apply the current settings, reconfiguring the hardware if needed
    ///
    /// A transaction whose settings match the applied configuration
    /// starts without touching the driver.
    pub fn begin_transaction(&mut self) -> Result<()> {
        if self.applied == Some(self.settings) {
            return Ok(());
        }
        self.apply()
    }

    /// Replace the settings and start a transaction with them
    pub fn begin_transaction_with(&mut self, settings: Settings) -> Result<()> {
        self.settings = settings;
        self.begin_transaction()
    }

    /// End the transaction
    ///
    /// The peripheral stays configured; the next transaction with
    /// unchanged settings starts without reinitializing.
    pub fn end_transaction(&mut self) {}

    /// Exchange a single byte
    pub fn transfer_byte(&mut self, byte: u8) -> Result<u8> {
        let tx = [byte];
        let mut rx = [0u8; 1];
        self.exchange(&tx, &mut rx)?;
        Ok(rx[0])
    }

    /// Exchange a 16-bit word as two frames, low byte first
    pub fn transfer_word(&mut self, word: u16) -> Result<u16> {
        let tx = word.to_le_bytes();
        let mut rx = [0u8; 2];
        self.exchange(&tx, &mut rx)?;
        Ok(u16::from_le_bytes(rx))
    }

    /// Exchange a buffer in place
    ///
    /// Every byte is transmitted and replaced with the byte received in
    /// the same frame. An empty buffer is a no-op. On failure the buffer
    /// contents are unspecified.
    pub fn transfer_in_place(&mut self, buf: &mut [u8]) -> Result<()> {
        if buf.is_empty() {
            return Ok(());
        }
        self.periph
            .transmit_receive_in_place(buf, MAX_DELAY)
            .map_err(|status| self.record(Error::Transfer(status)))
    }

    /// Replace the bit order
    ///
    /// Takes effect at the next [`begin`](Self::begin) or
    /// [`begin_transaction`](Self::begin_transaction).
    pub fn set_bit_order(&mut self, bit_order: BitOrder) {
        self.settings.set_bit_order(bit_order);
    }

    /// Replace the data mode
    ///
    /// Takes effect at the next [`begin`](Self::begin) or
    /// [`begin_transaction`](Self::begin_transaction).
    pub fn set_data_mode(&mut self, mode: DataMode) {
        self.settings.set_mode(mode);
    }

    /// Request the clock rate `input_clock / divider`
    ///
    /// Takes effect at the next [`begin`](Self::begin) or
    /// [`begin_transaction`](Self::begin_transaction), where the
    /// prescaler selection reproduces exactly this divider.
    pub fn set_clock_divider(&mut self, divider: ClockDivider) -> Result<()> {
        let pclk = self.periph.input_clock();
        let target = divider.actual(pclk);
        self.settings
            .set_frequency(target, pclk)
            .map_err(|err| self.record(err))
    }

    /// Most recent failure
    ///
    /// Successful calls do not clear it; only the next failure replaces it.
    pub fn last_error(&self) -> Option<Error> {
        self.last_error
    }

    /// Whether the hardware currently carries an applied configuration
    pub fn is_initialized(&self) -> bool {
        self.applied.is_some()
    }

    /// Current settings snapshot
    pub fn settings(&self) -> Settings {
        self.settings
    }

    /// Get a reference to the underlying peripheral
    pub fn peripheral(&self) -> &P {
        &self.periph
    }

    /// Get a mutable reference to the underlying peripheral
    pub fn peripheral_mut(&mut self) -> &mut P {
        &mut self.periph
    }

    /// Consume the controller and return the peripheral
    pub fn release(self) -> P {
        self.periph
    }

    fn apply(&mut self) -> Result<()> {
        let pclk = self.periph.input_clock();
        let config = BusConfig::from_settings(&self.settings, pclk);
        log::debug!(
            "spi: configuring mode{} {:?}, requested {} Hz, sck {} Hz (pclk/{})",
            self.settings.mode().bits(),
            self.settings.bit_order(),
            self.settings.frequency().raw(),
            config.divider.actual(pclk).raw(),
            config.divider.divisor()
        );
        match self.periph.init(&config) {
            Ok(()) => {
                self.applied = Some(self.settings);
                Ok(())
            }
            Err(status) => Err(self.record(Error::Init(status))),
        }
    }

    fn exchange(&mut self, tx: &[u8], rx: &mut [u8]) -> Result<()> {
        self.periph
            .transmit_receive(tx, rx, MAX_DELAY)
            .map_err(|status| self.record(Error::Transfer(status)))
    }

    fn read_filled(&mut self, words: &mut [u8]) -> Result<()> {
        const FILL: [u8; 32] = [FILLER; 32];
        for chunk in words.chunks_mut(FILL.len()) {
            let len = chunk.len();
            self.exchange(&FILL[..len], chunk)?;
        }
        Ok(())
    }

    fn write_discard(&mut self, words: &[u8]) -> Result<()> {
        let mut sink = [0u8; 32];
        for chunk in words.chunks(sink.len()) {
            self.exchange(chunk, &mut sink[..chunk.len()])?;
        }
        Ok(())
    }

    fn record(&mut self, err: Error) -> Error {
        self.last_error = Some(err);
        err
    }
}

impl<P: SpiPeripheral> embedded_hal::spi::ErrorType for Spi<P> {
    type Error = Error;
}

impl<P: SpiPeripheral> SpiBus<u8> for Spi<P> {
    fn read(&mut self, words: &mut [u8]) -> Result<()> {
        self.read_filled(words)
    }

    fn write(&mut self, words: &[u8]) -> Result<()> {
        self.write_discard(words)
    }

    fn transfer(&mut self, read: &mut [u8], write: &[u8]) -> Result<()> {
        let common = read.len().min(write.len());
        if common > 0 {
            self.exchange(&write[..common], &mut read[..common])?;
        }
        if read.len() > common {
            self.read_filled(&mut read[common..])?;
        } else if write.len() > common {
            self.write_discard(&write[common..])?;
        }
        Ok(())
    }

    fn transfer_in_place(&mut self, words: &mut [u8]) -> Result<()> {
        Spi::transfer_in_place(self, words)
    }

    fn flush(&mut self) -> Result<()> {
        // Every transfer completes before returning
        Ok(())
    }
}
