//! Image file backing the emulated chip

use spinor_dummy::{DummyConfig, DummyFlash};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Largest chip reachable with 24-bit addresses
pub const MAX_CHIP_SIZE: usize = 1 << 24;

/// Status reads that report busy after a program or erase
const BUSY_READS: u32 = 2;

/// Errors loading or saving the image file
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("failed to read image {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write image {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("image {} is {actual} bytes, chip is only {size} bytes", .path.display())]
    TooLarge {
        path: PathBuf,
        actual: usize,
        size: usize,
    },

    #[error("chip size {0} must be a power of two no larger than 16 MiB")]
    BadSize(usize),
}

/// Create the emulated chip, filled from `path` when the file exists
///
/// A shorter image leaves the rest of the chip erased.
pub fn load(path: Option<&Path>, size: usize) -> Result<DummyFlash, ImageError> {
    if !size.is_power_of_two() || size > MAX_CHIP_SIZE {
        return Err(ImageError::BadSize(size));
    }

    let config = DummyConfig {
        busy_reads: BUSY_READS,
        ..DummyConfig::with_size(size)
    };

    let Some(path) = path else {
        log::debug!("No image file, starting with an erased {} byte chip", size);
        return Ok(DummyFlash::new(config));
    };

    match fs::read(path) {
        Ok(data) => {
            if data.len() > size {
                return Err(ImageError::TooLarge {
                    path: path.to_path_buf(),
                    actual: data.len(),
                    size,
                });
            }
            log::info!("Loaded {} bytes from {}", data.len(), path.display());
            Ok(DummyFlash::with_data(config, &data))
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::info!("{} does not exist yet, starting erased", path.display());
            Ok(DummyFlash::new(config))
        }
        Err(source) => Err(ImageError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Write the chip contents back to `path`
pub fn save(path: &Path, flash: &DummyFlash) -> Result<(), ImageError> {
    fs::write(path, flash.data()).map_err(|source| ImageError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    log::debug!("Saved {} bytes to {}", flash.data().len(), path.display());
    Ok(())
}
