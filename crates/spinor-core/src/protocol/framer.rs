//! Transaction framer
//!
//! One routine serializes every catalog entry: opcode, optional 24-bit
//! address, optional dummy byte, then the data phase, all inside a single
//! chip-select window.

use crate::error::Result;
use crate::spi::Command;
use crate::transport::{Line, SpiTransport};
use maybe_async::maybe_async;

/// Longest possible header: opcode, 3 address bytes, dummy byte
pub const MAX_HEADER_LEN: usize = 5;

/// Execute one command as a chip-select framed transaction
///
/// Chip-select is released on every path once `begin` succeeded. If a byte
/// transfer fails, that error is returned and a failure to release
/// chip-select afterwards is only logged.
#[maybe_async]
pub async fn execute<T: SpiTransport + ?Sized>(
    transport: &mut T,
    cs: Line,
    cmd: &mut Command<'_>,
) -> Result<()> {
    log::trace!(
        "{:?} (0x{:02X}) addr=0x{:06X} out={} in={} total={}",
        cmd.operation,
        cmd.operation.opcode(),
        cmd.address & crate::spi::address::ADDRESS_MASK,
        cmd.write_data.len(),
        cmd.read_buf.len(),
        cmd.total_bytes()
    );

    transport.begin(cs).await?;
    let body = transfer(transport, cmd).await;
    let end = transport.end(cs).await;

    match body {
        Ok(()) => end,
        Err(e) => {
            if let Err(end_err) = end {
                log::warn!("Releasing {} after failed transfer: {}", cs, end_err);
            }
            Err(e)
        }
    }
}

#[maybe_async]
async fn transfer<T: SpiTransport + ?Sized>(transport: &mut T, cmd: &mut Command<'_>) -> Result<()> {
    let mut header = [0u8; MAX_HEADER_LEN];
    let header_len = cmd.encode_header(&mut header);

    for &byte in &header[..header_len] {
        transport.write_byte(byte).await?;
    }
    for &byte in cmd.write_data {
        transport.write_byte(byte).await?;
    }
    for slot in cmd.read_buf.iter_mut() {
        *slot = transport.read_byte().await?;
    }

    Ok(())
}
