//! spibus-core - Settings-driven SPI master wrapper
//!
//! This crate provides a thin wrapper around a vendor HAL SPI peripheral
//! driver: a [`Settings`] value object (clock frequency, bit order, data
//! mode), a [`Spi`] controller with begin/end and transaction bracketing,
//! and blocking byte/word/buffer transfers. It is designed to be `no_std`
//! compatible for use in embedded environments.
//!
//! The vendor driver is reached exclusively through the [`SpiPeripheral`]
//! trait, so the wrapper can be exercised against a software peripheral
//! (see the `spibus-dummy` crate) as well as real hardware.
//!
//! # Features
//!
//! - `std` - Enable standard library support (`std::error::Error` impls)
//! - `defmt` - Derive `defmt::Format` on public types
//!
//! # Example
//!
//! ```ignore
//! use spibus_core::{BitOrder, DataMode, Hertz, Settings, Spi, SpiPeripheral};
//!
//! fn read_id<P: SpiPeripheral>(periph: P) -> spibus_core::Result<u8> {
//!     let mut spi = Spi::new(periph);
//!     spi.begin_transaction_with(Settings::new(
//!         Hertz::from_raw(4_000_000),
//!         BitOrder::MsbFirst,
//!         DataMode::Mode0,
//!     ))?;
//!     let id = spi.transfer_byte(0x9F)?;
//!     spi.end_transaction();
//!     Ok(id)
//! }
//! ```

#![no_std]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

#[cfg(feature = "std")]
extern crate std;

pub mod bus;
pub mod divider;
pub mod error;
pub mod hal;
pub mod mode;
pub mod settings;

pub use bus::Spi;
pub use divider::ClockDivider;
pub use error::{Error, Result};
pub use hal::{BusConfig, ConfigFlags, HalError, SpiPeripheral, MAX_DELAY};
pub use mode::{BitOrder, DataMode};
pub use settings::Settings;

/// Clock frequency type used throughout the crate.
pub use fugit::HertzU32 as Hertz;
