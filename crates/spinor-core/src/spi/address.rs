//! 24-bit address encoding

/// Number of address bytes on the wire
pub const ADDRESS_BYTES: usize = 3;

/// Mask of the address bits that are representable on the wire
pub const ADDRESS_MASK: u32 = 0x00FF_FFFF;

/// Encode an address as 3 bytes, most significant first
///
/// Bits 24..32 of `address` are dropped.
pub const fn encode(address: u32) -> [u8; ADDRESS_BYTES] {
    [(address >> 16) as u8, (address >> 8) as u8, address as u8]
}

/// Decode 3 address bytes (most significant first) back into a u32
pub const fn decode(bytes: [u8; ADDRESS_BYTES]) -> u32 {
    ((bytes[0] as u32) << 16) | ((bytes[1] as u32) << 8) | (bytes[2] as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_msb_first() {
        assert_eq!(encode(0x0012_3456), [0x12, 0x34, 0x56]);
        assert_eq!(encode(0), [0, 0, 0]);
    }

    #[test]
    fn test_encode_drops_top_byte() {
        for addr in [0xFF12_3456u32, 0x8000_0000, 0xFFFF_FFFF, 0x0100_0000] {
            let bytes = encode(addr);
            assert_eq!(bytes[0], ((addr >> 16) & 0xFF) as u8);
            assert_eq!(bytes[1], ((addr >> 8) & 0xFF) as u8);
            assert_eq!(bytes[2], (addr & 0xFF) as u8);
            assert_eq!(decode(bytes), addr & ADDRESS_MASK);
        }
    }
}
