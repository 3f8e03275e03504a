//! SFDP data types
//!
//! Layout per JEDEC JESD216. All multi-byte SFDP fields are little-endian,
//! unlike the command address which is sent big-endian.

use core::fmt;

/// SFDP signature: "SFDP" read as a little-endian u32
pub const SFDP_SIGNATURE: u32 = 0x5044_4653;

/// Parameter ID of the Basic Flash Parameter Table
pub const PARAM_ID_BASIC: u16 = 0xFF00;

/// Size of the SFDP header and of each parameter header
pub const HEADER_LEN: usize = 8;

/// SFDP revision number
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct SfdpRevision {
    /// Major revision number
    pub major: u8,
    /// Minor revision number
    pub minor: u8,
}

impl SfdpRevision {
    /// Create a new revision
    pub const fn new(major: u8, minor: u8) -> Self {
        Self { major, minor }
    }

    /// Check if this revision is at least the specified version
    pub fn at_least(&self, major: u8, minor: u8) -> bool {
        self.major > major || (self.major == major && self.minor >= minor)
    }
}

impl fmt::Display for SfdpRevision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// SFDP header structure (first 8 bytes at address 0x00)
#[derive(Debug, Clone, Copy, Default)]
pub struct SfdpHeader {
    /// SFDP signature (should be 0x50444653)
    pub signature: u32,
    /// SFDP revision
    pub revision: SfdpRevision,
    /// Number of parameter headers (0-based, so actual count is nph + 1)
    pub nph: u8,
    /// Access protocol (0xFF for legacy)
    pub access_protocol: u8,
}

impl SfdpHeader {
    /// Parse SFDP header from raw bytes
    pub fn parse(data: &[u8; HEADER_LEN]) -> Self {
        Self {
            signature: u32::from_le_bytes([data[0], data[1], data[2], data[3]]),
            revision: SfdpRevision {
                minor: data[4],
                major: data[5],
            },
            nph: data[6],
            access_protocol: data[7],
        }
    }

    /// Check if the signature is valid
    pub fn is_valid(&self) -> bool {
        self.signature == SFDP_SIGNATURE
    }

    /// Get the number of parameter headers
    pub fn num_param_headers(&self) -> usize {
        (self.nph as usize) + 1
    }
}

/// Parameter header structure (8 bytes each, starting at address 0x08)
#[derive(Debug, Clone, Copy, Default)]
pub struct ParameterHeader {
    /// Parameter ID (MSB << 8 | LSB)
    pub id: u16,
    /// Parameter table revision
    pub revision: SfdpRevision,
    /// Parameter table length in DWORDs
    pub length_dwords: u8,
    /// Parameter table pointer (24-bit byte address)
    pub table_pointer: u32,
}

impl ParameterHeader {
    /// Parse a parameter header from raw bytes
    pub fn parse(data: &[u8; HEADER_LEN]) -> Self {
        Self {
            id: ((data[7] as u16) << 8) | (data[0] as u16),
            revision: SfdpRevision {
                minor: data[1],
                major: data[2],
            },
            length_dwords: data[3],
            table_pointer: u32::from_le_bytes([data[4], data[5], data[6], 0]),
        }
    }

    /// Address of the n-th parameter header
    pub const fn address(index: usize) -> u32 {
        (HEADER_LEN + index * HEADER_LEN) as u32
    }

    /// Get the table length in bytes
    pub fn length_bytes(&self) -> usize {
        (self.length_dwords as usize) * 4
    }

    /// Check if this is the Basic Flash Parameter Table
    pub fn is_basic(&self) -> bool {
        self.id == PARAM_ID_BASIC
    }
}

/// Flash density from BFPT DWORD 2, in bytes
///
/// Bit 31 clear: bits 30:0 are the density in bits minus one.
/// Bit 31 set: bits 30:0 are N with density 2^N bits.
///
/// Returns 0 for exponents that do not fit a `u64` byte count.
pub fn density_bytes(dword2: u32) -> u64 {
    let value = dword2 & 0x7FFF_FFFF;
    if dword2 & (1 << 31) == 0 {
        ((value as u64) + 1) / 8
    } else if value >= 3 {
        1u64.checked_shl(value - 3).unwrap_or(0)
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_parse() {
        let raw = [b'S', b'F', b'D', b'P', 0x06, 0x01, 0x01, 0xFF];
        let header = SfdpHeader::parse(&raw);
        assert!(header.is_valid());
        assert_eq!(header.revision, SfdpRevision::new(1, 6));
        assert!(header.revision.at_least(1, 5));
        assert!(!header.revision.at_least(1, 7));
        assert_eq!(header.num_param_headers(), 2);
        assert_eq!(header.access_protocol, 0xFF);

        assert!(!SfdpHeader::parse(&[0xFF; 8]).is_valid());
    }

    #[test]
    fn test_parameter_header_parse() {
        let raw = [0x00, 0x06, 0x01, 0x10, 0x30, 0x00, 0x00, 0xFF];
        let ph = ParameterHeader::parse(&raw);
        assert!(ph.is_basic());
        assert_eq!(ph.revision, SfdpRevision::new(1, 6));
        assert_eq!(ph.length_bytes(), 64);
        assert_eq!(ph.table_pointer, 0x30);
        assert_eq!(ParameterHeader::address(0), 0x08);
        assert_eq!(ParameterHeader::address(2), 0x18);
    }

    #[test]
    fn test_density() {
        // 128 Mbit as bit count minus one
        assert_eq!(density_bytes(0x07FF_FFFF), 16 * 1024 * 1024);
        // 2^34 bits = 2 GiB
        assert_eq!(density_bytes(0x8000_0022), 2 * 1024 * 1024 * 1024);
        // 2^66 bits is the largest exponent that still fits
        assert_eq!(density_bytes(0x8000_0042), 1u64 << 63);
        // Garbage exponents
        assert_eq!(density_bytes(0x8000_0043), 0);
        assert_eq!(density_bytes(0x8000_0050), 0);
        assert_eq!(density_bytes(0xFFFF_FFFF), 0);
        assert_eq!(density_bytes(0x8000_0002), 0);
    }
}
