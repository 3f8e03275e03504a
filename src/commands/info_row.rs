//! Information row commands

use super::{enable_write, hexdump, wait_ready, CmdResult};
use spinor_core::flash::SerialFlash;
use spinor_core::transport::SpiTransport;
use spinor_dummy::{INFO_ROW_SIZE, INFO_ROW_STRIDE};
use std::fs;
use std::path::Path;

fn row_address(row: u8) -> u32 {
    row as u32 * INFO_ROW_STRIDE
}

/// Dump one information row
pub fn run_info_row_read<T: SpiTransport>(flash: &mut SerialFlash<T>, row: u8) -> CmdResult {
    let mut buf = [0u8; INFO_ROW_SIZE];
    flash.read_information_row(row_address(row), &mut buf)?;
    println!("Information row {}:", row);
    hexdump(row_address(row), &buf);
    Ok(())
}

/// Program one information row from `input`
pub fn run_info_row_write<T: SpiTransport>(
    flash: &mut SerialFlash<T>,
    row: u8,
    input: &Path,
) -> CmdResult {
    let data = fs::read(input)?;
    if data.len() > INFO_ROW_SIZE {
        return Err(format!(
            "{:?} is {} bytes, an information row holds {}",
            input,
            data.len(),
            INFO_ROW_SIZE
        )
        .into());
    }

    if flash.function()?.is_row_locked(row) {
        return Err(format!("Information row {} is locked", row).into());
    }

    enable_write(flash)?;
    flash.write_information_row(row_address(row), &data)?;
    wait_ready(flash)?;

    println!("Programmed {} bytes into information row {}", data.len(), row);
    Ok(())
}
