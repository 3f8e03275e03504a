//! Status and function register bit definitions
//!
//! The driver moves these registers as raw bytes. These types are for
//! callers that want to look inside.

use bitflags::bitflags;

bitflags! {
    /// Status register
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Status: u8 {
        /// Write in progress
        const WIP  = 0x01;
        /// Write enable latch
        const WEL  = 0x02;
        /// Block protect bit 0
        const BP0  = 0x04;
        /// Block protect bit 1
        const BP1  = 0x08;
        /// Block protect bit 2
        const BP2  = 0x10;
        /// Block protect bit 3
        const BP3  = 0x20;
        /// Quad enable
        const QE   = 0x40;
        /// Status register write disable
        const SRWD = 0x80;

        /// All block protect bits
        const BP = Self::BP0.bits() | Self::BP1.bits() | Self::BP2.bits() | Self::BP3.bits();
    }
}

impl Status {
    /// A program or erase is still running
    pub const fn is_busy(&self) -> bool {
        self.contains(Self::WIP)
    }

    /// Block protect level (BP3..BP0 as a 4-bit number)
    pub const fn protect_level(&self) -> u8 {
        (self.bits() & Self::BP.bits()) >> 2
    }
}

bitflags! {
    /// Function register
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Function: u8 {
        /// Program suspended
        const PSUS  = 0x04;
        /// Erase suspended
        const ESUS  = 0x08;
        /// Information row 0 lock (OTP)
        const IRL0  = 0x10;
        /// Information row 1 lock (OTP)
        const IRL1  = 0x20;
        /// Information row 2 lock (OTP)
        const IRL2  = 0x40;
        /// Information row 3 lock (OTP)
        const IRL3  = 0x80;
    }
}

impl Function {
    /// Lock bit for information row `row` (0..=3)
    pub const fn row_lock(row: u8) -> Self {
        Self::from_bits_retain(Self::IRL0.bits() << (row & 0x03))
    }

    /// Information row `row` is locked
    pub const fn is_row_locked(&self, row: u8) -> bool {
        self.contains(Self::row_lock(row))
    }

    /// A program or erase is suspended
    pub const fn is_suspended(&self) -> bool {
        self.intersects(Self::PSUS.union(Self::ESUS))
    }
}
