//! Erase command implementation

use super::{enable_write, wait_ready, CmdResult};
use crate::cli::EraseCommands;
use indicatif::{ProgressBar, ProgressStyle};
use spinor_core::flash::SerialFlash;
use spinor_core::spi::opcodes::{BLOCK_32K_SIZE, BLOCK_64K_SIZE, SECTOR_SIZE};
use spinor_core::transport::SpiTransport;
use std::time::Duration;

/// Run the erase command
pub fn run_erase<T: SpiTransport>(
    flash: &mut SerialFlash<T>,
    chip_size: u32,
    target: &EraseCommands,
) -> CmdResult {
    let (unit, index) = match *target {
        EraseCommands::Sector { index } => (SECTOR_SIZE, index),
        EraseCommands::Block32 { index } => (BLOCK_32K_SIZE, index),
        EraseCommands::Block64 { index } => (BLOCK_64K_SIZE, index),
        EraseCommands::Chip => (chip_size, 0),
    };

    let start = index as u64 * unit as u64;
    if start + unit as u64 > chip_size as u64 {
        return Err(format!(
            "Erase unit {} (0x{:06X}..0x{:06X}) is outside chip bounds (0x{:06X})",
            index,
            start,
            start + unit as u64,
            chip_size
        )
        .into());
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.set_message(format!("Erasing {} bytes at 0x{:06X}...", unit, start));
    pb.enable_steady_tick(Duration::from_millis(100));

    enable_write(flash)?;
    match *target {
        EraseCommands::Sector { index } => flash.erase_sector(index)?,
        EraseCommands::Block32 { index } => flash.erase_block_32k(index)?,
        EraseCommands::Block64 { index } => flash.erase_block_64k(index)?,
        EraseCommands::Chip => flash.erase_chip()?,
    }
    wait_ready(flash)?;

    pb.finish_with_message(format!("Erased {} bytes at 0x{:06X}", unit, start));
    Ok(())
}
