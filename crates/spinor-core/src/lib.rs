//! spinor-core - Command framing driver for SPI NOR flash chips
//!
//! This crate turns flash operations (read, page program, erase, register
//! access, identification, SFDP, information rows, sector locking) into
//! chip-select framed byte streams on top of a minimal byte transport.
//! It is `no_std` and allocation free.
//!
//! # Features
//!
//! - `is_sync` (default) - Blocking API. Disable default features to get
//!   `async fn` operations instead.
//! - `std` - Implement `std::error::Error` for [`Error`]
//!
//! # Example
//!
//! ```ignore
//! use spinor_core::flash::{Line, Pins, SerialFlash};
//!
//! fn dump_id<T: spinor_core::transport::SpiTransport>(bus: T) -> spinor_core::Result<()> {
//!     let pins = Pins::new(Line::new(0, 4), Line::new(0, 2), Line::new(0, 3));
//!     let mut flash = SerialFlash::new(bus, pins);
//!     let id = flash.read_jedec_id()?;
//!     log::info!("JEDEC ID: {}", id);
//!     Ok(())
//! }
//! ```

#![no_std]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
// Allow async fn in traits - we use maybe-async for dual sync/async support
#![allow(async_fn_in_trait)]

#[cfg(any(feature = "std", test))]
extern crate std;

pub mod error;
pub mod flash;
pub mod protocol;
pub mod sfdp;
pub mod spi;
pub mod transport;

pub use error::{Error, Result};
pub use flash::SerialFlash;
