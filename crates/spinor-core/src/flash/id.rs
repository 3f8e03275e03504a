//! Identification values
//!
//! All multi-byte IDs arrive most significant byte first and are assembled
//! by shifting, independent of host byte order.

use core::fmt;

use crate::spi::opcodes::UID_LEN;

/// 24-bit JEDEC ID: manufacturer, memory type, capacity
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct JedecId(u32);

impl JedecId {
    /// Assemble from the three bytes in the order they were received
    pub const fn from_bytes(bytes: [u8; 3]) -> Self {
        Self(((bytes[0] as u32) << 16) | ((bytes[1] as u32) << 8) | (bytes[2] as u32))
    }

    /// Create from a raw 24-bit value; bits above 24 are dropped
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw & 0x00FF_FFFF)
    }

    /// Raw 24-bit value
    pub const fn raw(&self) -> u32 {
        self.0
    }

    /// Bytes in wire order
    pub const fn to_bytes(&self) -> [u8; 3] {
        [(self.0 >> 16) as u8, (self.0 >> 8) as u8, self.0 as u8]
    }

    /// JEDEC manufacturer ID
    pub const fn manufacturer(&self) -> u8 {
        (self.0 >> 16) as u8
    }

    /// Memory type byte
    pub const fn memory_type(&self) -> u8 {
        (self.0 >> 8) as u8
    }

    /// Capacity byte (density as a power of two, in bytes, for most vendors)
    pub const fn capacity(&self) -> u8 {
        self.0 as u8
    }

    /// Memory type and capacity as one 16-bit device ID
    pub const fn device(&self) -> u16 {
        self.0 as u16
    }
}

impl fmt::Display for JedecId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02X} {:04X}", self.manufacturer(), self.device())
    }
}

impl From<JedecId> for u32 {
    fn from(id: JedecId) -> u32 {
        id.0
    }
}

/// 16-bit manufacturer and device ID read with 0x90
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ManufacturerDeviceId(u16);

impl ManufacturerDeviceId {
    /// Assemble from the two bytes in the order they were received
    pub const fn from_bytes(bytes: [u8; 2]) -> Self {
        Self(((bytes[0] as u16) << 8) | (bytes[1] as u16))
    }

    /// Raw 16-bit value
    pub const fn raw(&self) -> u16 {
        self.0
    }

    /// First byte received
    pub const fn high(&self) -> u8 {
        (self.0 >> 8) as u8
    }

    /// Second byte received
    pub const fn low(&self) -> u8 {
        self.0 as u8
    }
}

impl fmt::Display for ManufacturerDeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02X} {:02X}", self.high(), self.low())
    }
}

/// 128-bit factory unique ID
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct UniqueId(pub [u8; UID_LEN]);

impl UniqueId {
    /// Bytes in the order they were received
    pub const fn as_bytes(&self) -> &[u8; UID_LEN] {
        &self.0
    }
}

impl fmt::Display for UniqueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{:02X}", byte)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jedec_positional_assembly() {
        let id = JedecId::from_bytes([0x11, 0x22, 0x33]);
        assert_eq!(id.raw(), 0x11_2233);
        assert_eq!(id.to_bytes(), [0x11, 0x22, 0x33]);
        assert_eq!(id.manufacturer(), 0x11);
        assert_eq!(id.memory_type(), 0x22);
        assert_eq!(id.capacity(), 0x33);
        assert_eq!(id.device(), 0x2233);
        assert_eq!(JedecId::from_raw(0xFF11_2233), id);
    }

    #[test]
    fn test_manufacturer_device_id() {
        let id = ManufacturerDeviceId::from_bytes([0x9D, 0x17]);
        assert_eq!(id.raw(), 0x9D17);
        assert_eq!(id.high(), 0x9D);
        assert_eq!(id.low(), 0x17);
    }
}
