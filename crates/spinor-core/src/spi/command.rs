//! SPI command structure

use super::{address, Direction, Operation};

/// A single framed flash command
///
/// Designed to avoid allocation - uses slices for data.
/// The lifetime parameter `'a` ties the command to the buffers it references.
pub struct Command<'a> {
    /// Catalog entry describing the wire shape
    pub operation: Operation,

    /// Address, only sent when the operation is address-bearing
    pub address: u32,

    /// Data to write after the header
    pub write_data: &'a [u8],

    /// Buffer to read into
    pub read_buf: &'a mut [u8],
}

impl<'a> Command<'a> {
    /// Create a command with no address or data (e.g., WREN, CER)
    pub fn simple(operation: Operation) -> Self {
        debug_assert_eq!(operation.descriptor().direction, Direction::None);
        Self {
            operation,
            address: 0,
            write_data: &[],
            read_buf: &mut [],
        }
    }

    /// Create an address-only command (e.g., SER, SECUNLOCK)
    pub fn addressed(operation: Operation, addr: u32) -> Self {
        debug_assert_eq!(operation.descriptor().direction, Direction::None);
        Self {
            operation,
            address: addr,
            write_data: &[],
            read_buf: &mut [],
        }
    }

    /// Create a read command; the address is ignored for operations without one
    pub fn read(operation: Operation, addr: u32, buf: &'a mut [u8]) -> Self {
        debug_assert_eq!(operation.descriptor().direction, Direction::Read);
        Self {
            operation,
            address: addr,
            write_data: &[],
            read_buf: buf,
        }
    }

    /// Create a write command; the address is ignored for operations without one
    pub fn write(operation: Operation, addr: u32, data: &'a [u8]) -> Self {
        debug_assert_eq!(operation.descriptor().direction, Direction::Write);
        Self {
            operation,
            address: addr,
            write_data: data,
            read_buf: &mut [],
        }
    }

    /// Encode opcode, address and dummy byte into `buf`
    ///
    /// Returns the number of bytes written, equal to
    /// `self.operation.descriptor().header_len()`.
    pub fn encode_header(&self, buf: &mut [u8]) -> usize {
        let desc = self.operation.descriptor();
        buf[0] = desc.opcode;
        let mut len = 1;
        if desc.address {
            buf[len..len + address::ADDRESS_BYTES].copy_from_slice(&address::encode(self.address));
            len += address::ADDRESS_BYTES;
        }
        if desc.dummy {
            buf[len] = 0x00;
            len += 1;
        }
        len
    }

    /// Number of bytes clocked for the whole transaction
    pub fn total_bytes(&self) -> usize {
        self.operation.descriptor().header_len() + self.write_data.len() + self.read_buf.len()
    }
}
