//! Transport abstraction
//!
//! The driver never touches hardware directly. Everything goes through the
//! [`SpiTransport`] trait: open a chip-select scoped transaction, move
//! single bytes, close it again.

#[cfg(test)]
pub(crate) mod mock;
mod traits;

pub use traits::*;
