//! Read command implementation

use super::{hexdump, CmdResult};
use indicatif::{ProgressBar, ProgressStyle};
use spinor_core::flash::SerialFlash;
use spinor_core::transport::SpiTransport;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Default chunk size for reading (4 KiB)
const READ_CHUNK_SIZE: usize = 4096;

/// Run the read command
pub fn run_read<T: SpiTransport>(
    flash: &mut SerialFlash<T>,
    addr: u32,
    len: u32,
    fast: bool,
    output: Option<&Path>,
) -> CmdResult {
    let data = read_with_progress(flash, addr, len as usize, fast)?;

    match output {
        Some(path) => {
            let mut file = File::create(path)?;
            file.write_all(&data)?;
            println!("Wrote {} bytes to {:?}", data.len(), path);
        }
        None => hexdump(addr, &data),
    }
    Ok(())
}

/// Read `len` bytes from `addr` in chunks, one transaction per chunk
pub fn read_with_progress<T: SpiTransport>(
    flash: &mut SerialFlash<T>,
    addr: u32,
    len: usize,
    fast: bool,
) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    let mut data = vec![0u8; len];

    let pb = ProgressBar::new(len as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec}, {eta})")?
            .progress_chars("#>-"),
    );

    let mut offset = 0usize;
    for chunk in data.chunks_mut(READ_CHUNK_SIZE) {
        let chunk_addr = addr.wrapping_add(offset as u32);
        if fast {
            flash.fast_read(chunk_addr, chunk)?;
        } else {
            flash.read(chunk_addr, chunk)?;
        }
        offset += chunk.len();
        pb.set_position(offset as u64);
    }

    pb.finish_with_message("Read complete");
    Ok(data)
}
