//! Flash chip operations
//!
//! - [`SerialFlash`] - device handle, one method per instruction
//! - [`registers`] - status/function register bits
//! - [`id`] - identification value types

mod device;
pub mod id;
pub mod registers;

pub use crate::transport::Line;
pub use device::{Pins, SerialFlash, RESET_ENABLE_DELAY_US};
pub use id::{JedecId, ManufacturerDeviceId, UniqueId};
pub use registers::{Function, Status};
