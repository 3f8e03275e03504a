//! Error types for spinor-core
//!
//! The driver itself never fails on its own: every error originates in the
//! transport and is passed through unchanged. The variants here give
//! transport implementations a shared, no_std compatible vocabulary.

use core::fmt;

/// Core error type - no_std compatible, Copy for efficiency
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    // Transport errors
    /// A byte transfer on the bus failed
    TransportFault,
    /// The transport gave up waiting for the bus
    Timeout,
    /// Chip-select could not be asserted or released
    ChipSelect,
    /// The bus is owned by someone else
    BusBusy,

    // Parameter table errors
    /// SFDP signature missing or unsupported revision
    SfdpInvalid,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TransportFault => write!(f, "SPI transfer failed"),
            Self::Timeout => write!(f, "SPI transport timed out"),
            Self::ChipSelect => write!(f, "chip-select line could not be driven"),
            Self::BusBusy => write!(f, "SPI bus is busy"),
            Self::SfdpInvalid => write!(f, "SFDP table missing or unsupported"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

/// Result type alias using the core Error type
pub type Result<T> = core::result::Result<T, Error>;
