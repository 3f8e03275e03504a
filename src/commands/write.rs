//! Write command implementation
//!
//! Programs page by page. Flash programming can only clear bits, so the
//! target range has to be erased first (see the erase command).

use super::{enable_write, wait_ready, CmdResult};
use indicatif::{ProgressBar, ProgressStyle};
use spinor_core::flash::SerialFlash;
use spinor_core::spi::opcodes::PAGE_SIZE;
use spinor_core::transport::SpiTransport;
use std::fs;
use std::path::Path;

/// Run the write command
pub fn run_write<T: SpiTransport>(
    flash: &mut SerialFlash<T>,
    chip_size: u32,
    addr: u32,
    input: &Path,
) -> CmdResult {
    let data = fs::read(input)?;
    if data.is_empty() {
        println!("{:?} is empty, nothing to write", input);
        return Ok(());
    }

    let end = addr as u64 + data.len() as u64;
    if end > chip_size as u64 {
        return Err(format!(
            "Write range 0x{:06X}..0x{:06X} is outside chip bounds (0x{:06X})",
            addr, end, chip_size
        )
        .into());
    }

    program_with_progress(flash, addr, &data)?;
    println!("Wrote {} bytes at 0x{:06X}", data.len(), addr);
    Ok(())
}

/// Program `data` at `addr`, never crossing a page boundary in one command
pub fn program_with_progress<T: SpiTransport>(
    flash: &mut SerialFlash<T>,
    addr: u32,
    data: &[u8],
) -> CmdResult {
    let pb = ProgressBar::new(data.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec}, {eta}) Writing")?
            .progress_chars("#>-"),
    );

    let mut offset = 0usize;
    while offset < data.len() {
        let page_addr = addr + offset as u32;
        let page_remaining = (PAGE_SIZE - (page_addr % PAGE_SIZE)) as usize;
        let chunk_len = std::cmp::min(page_remaining, data.len() - offset);

        enable_write(flash)?;
        flash.write(page_addr, &data[offset..offset + chunk_len])?;
        wait_ready(flash)?;

        offset += chunk_len;
        pb.set_position(offset as u64);
    }

    pb.finish_with_message("Write complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::super::tests::flash_with;
    use super::*;
    use spinor_dummy::DummyConfig;

    #[test]
    fn test_program_splits_at_page_boundaries() {
        let mut flash = flash_with(DummyConfig {
            busy_reads: 1,
            ..DummyConfig::default()
        });
        let data: Vec<u8> = (0..600u32).map(|i| (i * 7) as u8).collect();

        program_with_progress(&mut flash, 0x1F0, &data).unwrap();

        assert_eq!(&flash.transport().data()[0x1F0..0x1F0 + 600], &data[..]);
        assert_eq!(flash.transport().data()[0x1EF], 0xFF);
        let programs = flash
            .transport()
            .opcode_log()
            .iter()
            .filter(|&&op| op == 0x02)
            .count();
        // 16 bytes to the first boundary, two full pages, 72 bytes tail
        assert_eq!(programs, 4);
    }
}
