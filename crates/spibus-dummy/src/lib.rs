//! spibus-dummy - Software-emulated SPI peripheral for testing
//!
//! This crate provides a dummy peripheral that emulates the vendor SPI
//! driver in memory. It's useful for testing and development without
//! real hardware: received bytes can be scripted and driver failures
//! injected on demand.

#![cfg_attr(not(feature = "std"), no_std)]

use heapless::{Deque, Vec};

use spibus_core::{BusConfig, HalError, Hertz, SpiPeripheral};

/// Capacity of the scripted receive queue
const SCRIPT_CAPACITY: usize = 64;

/// Capacity of the transmit capture buffer
const CAPTURE_CAPACITY: usize = 256;

/// Configuration for the dummy peripheral
#[derive(Debug, Clone)]
pub struct DummyConfig {
    /// Input clock feeding the baud rate prescaler
    pub pclk: Hertz,
    /// Echo transmitted bytes back when the script queue is empty
    pub loopback: bool,
    /// Byte received when the script is empty and loopback is off
    pub idle_byte: u8,
}

impl Default for DummyConfig {
    fn default() -> Self {
        Self {
            pclk: Hertz::from_raw(64_000_000),
            loopback: true,
            idle_byte: 0xFF,
        }
    }
}

/// Dummy SPI peripheral
///
/// Emulates the vendor driver in memory for testing purposes. Each
/// received byte comes from the scripted queue first, then from
/// loopback of the transmitted byte or the configured idle byte.
pub struct DummyPeripheral {
    config: DummyConfig,
    initialized: bool,
    last_config: Option<BusConfig>,
    init_count: u32,
    deinit_count: u32,
    transfer_count: u32,
    script: Deque<u8, SCRIPT_CAPACITY>,
    written: Vec<u8, CAPTURE_CAPACITY>,
    fail_init: Option<HalError>,
    fail_deinit: Option<HalError>,
    fail_transfer: Option<HalError>,
}

impl DummyPeripheral {
    /// Create a new dummy peripheral with the given configuration
    pub fn new(config: DummyConfig) -> Self {
        Self {
            config,
            initialized: false,
            last_config: None,
            init_count: 0,
            deinit_count: 0,
            transfer_count: 0,
            script: Deque::new(),
            written: Vec::new(),
            fail_init: None,
            fail_deinit: None,
            fail_transfer: None,
        }
    }

    /// Create a new dummy peripheral with default configuration
    /// (64 MHz input clock, loopback enabled)
    pub fn new_default() -> Self {
        Self::new(DummyConfig::default())
    }

    /// Queue bytes to be returned by upcoming transfers
    ///
    /// Scripted bytes are consumed before loopback or the idle byte.
    /// Panics when the script queue capacity is exceeded.
    pub fn queue_read(&mut self, data: &[u8]) {
        for &byte in data {
            assert!(self.script.push_back(byte).is_ok(), "script queue full");
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &DummyConfig {
        &self.config
    }

    /// Configuration most recently applied through `init`
    pub fn last_config(&self) -> Option<BusConfig> {
        self.last_config
    }

    /// Number of successful `init` calls
    pub fn init_count(&self) -> u32 {
        self.init_count
    }

    /// Number of successful `deinit` calls
    pub fn deinit_count(&self) -> u32 {
        self.deinit_count
    }

    /// Number of successful transfer calls
    pub fn transfer_count(&self) -> u32 {
        self.transfer_count
    }

    /// Whether the peripheral is currently initialized
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// All bytes transmitted so far, oldest first
    ///
    /// The capture is capped; bytes past the capacity are dropped.
    pub fn written(&self) -> &[u8] {
        &self.written
    }

    /// Make the next `init` call fail with the given status
    pub fn fail_next_init(&mut self, status: HalError) {
        self.fail_init = Some(status);
    }

    /// Make the next `deinit` call fail with the given status
    pub fn fail_next_deinit(&mut self, status: HalError) {
        self.fail_deinit = Some(status);
    }

    /// Make the next transfer call fail with the given status
    pub fn fail_next_transfer(&mut self, status: HalError) {
        self.fail_transfer = Some(status);
    }

    fn capture(&mut self, tx: &[u8]) {
        for &byte in tx {
            if self.written.push(byte).is_err() {
                break;
            }
        }
    }

    fn produce(&mut self, sent: u8) -> u8 {
        match self.script.pop_front() {
            Some(byte) => byte,
            None if self.config.loopback => sent,
            None => self.config.idle_byte,
        }
    }
}

impl SpiPeripheral for DummyPeripheral {
    fn input_clock(&self) -> Hertz {
        self.config.pclk
    }

    fn init(&mut self, config: &BusConfig) -> Result<(), HalError> {
        if let Some(status) = self.fail_init.take() {
            return Err(status);
        }
        log::debug!("dummy: init (sck pclk/{})", config.divider.divisor());
        self.initialized = true;
        self.last_config = Some(*config);
        self.init_count += 1;
        Ok(())
    }

    fn deinit(&mut self) -> Result<(), HalError> {
        if let Some(status) = self.fail_deinit.take() {
            return Err(status);
        }
        log::debug!("dummy: deinit");
        self.initialized = false;
        self.deinit_count += 1;
        Ok(())
    }

    fn transmit_receive(
        &mut self,
        tx: &[u8],
        rx: &mut [u8],
        _timeout_ms: u32,
    ) -> Result<(), HalError> {
        if !self.initialized {
            return Err(HalError::Failed);
        }
        if let Some(status) = self.fail_transfer.take() {
            return Err(status);
        }
        self.capture(tx);
        for (slot, &sent) in rx.iter_mut().zip(tx) {
            *slot = self.produce(sent);
        }
        self.transfer_count += 1;
        Ok(())
    }
}
