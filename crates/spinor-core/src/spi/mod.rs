//! SPI types and command structures
//!
//! This module provides the opcode set, the operation catalog and the
//! command structure the framer serializes.

pub mod address;
mod command;
pub mod opcodes;
mod operation;

pub use command::Command;
pub use opcodes::*;
pub use operation::{Capability, Descriptor, Direction, FastReadMode, Operation};
