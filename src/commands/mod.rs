//! CLI command implementations
//!
//! Every command takes a [`SerialFlash`] over any [`SpiTransport`]. The
//! driver never sequences anything on its own, so the sequencing lives
//! here: write enable before state-changing instructions, WIP polling after.

mod erase;
mod id;
mod info_row;
mod read;
mod reset;
mod sfdp;
mod status;
mod write;

pub use erase::run_erase;
pub use id::run_id;
pub use info_row::{run_info_row_read, run_info_row_write};
pub use read::run_read;
pub use reset::run_reset;
pub use sfdp::run_sfdp;
pub use status::run_status;
pub use write::run_write;

use spinor_core::flash::{SerialFlash, Status};
use spinor_core::transport::SpiTransport;
use spinor_core::Error;

/// Result type shared by the commands
pub type CmdResult = Result<(), Box<dyn std::error::Error>>;

/// Status polls before a program/erase is declared stuck
const MAX_BUSY_POLLS: u32 = 1_000_000;

/// Send write enable and check that WEL latched
///
/// A floating bus reads 0xFF, so WIP set alongside WEL counts as failure.
pub fn enable_write<T: SpiTransport>(flash: &mut SerialFlash<T>) -> CmdResult {
    flash.write_enable()?;
    let status = flash.status()?;
    if !status.contains(Status::WEL) || status.is_busy() {
        return Err(format!(
            "Write enable did not latch (status 0x{:02X}); chip busy or powered down?",
            status.bits()
        )
        .into());
    }
    Ok(())
}

/// Poll the status register until WIP clears
pub fn wait_ready<T: SpiTransport>(flash: &mut SerialFlash<T>) -> spinor_core::Result<Status> {
    for polls in 0..MAX_BUSY_POLLS {
        let status = flash.status()?;
        if !status.is_busy() {
            log::trace!("Ready after {} status poll(s)", polls + 1);
            return Ok(status);
        }
    }
    log::debug!("WIP still set after {} polls", MAX_BUSY_POLLS);
    Err(Error::Timeout)
}

/// Print `data` as a classic hex dump, offsets starting at `base`
pub fn hexdump(base: u32, data: &[u8]) {
    for line in format_hexdump(base, data) {
        println!("{}", line);
    }
}

fn format_hexdump(base: u32, data: &[u8]) -> Vec<String> {
    data.chunks(16)
        .enumerate()
        .map(|(i, chunk)| {
            let hex: Vec<String> = chunk.iter().map(|b| format!("{:02X}", b)).collect();
            let ascii: String = chunk
                .iter()
                .map(|&b| if b.is_ascii_graphic() || b == b' ' { b as char } else { '.' })
                .collect();
            format!(
                "{:06X}  {:<47}  |{}|",
                base.wrapping_add((i * 16) as u32),
                hex.join(" "),
                ascii
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use spinor_core::flash::{Line, Pins};
    use spinor_dummy::{DummyConfig, DummyFlash};

    pub(super) fn flash_with(config: DummyConfig) -> SerialFlash<DummyFlash> {
        let cs = Line::new(0, 4);
        SerialFlash::new(DummyFlash::new(config), Pins::new(cs, Line::new(0, 2), Line::new(0, 3)))
    }

    #[test]
    fn test_wait_ready_polls_until_idle() {
        let mut flash = flash_with(DummyConfig {
            busy_reads: 5,
            ..DummyConfig::default()
        });
        enable_write(&mut flash).unwrap();
        flash.erase_sector(0).unwrap();
        let before = flash.transport().opcode_log().len();
        let status = wait_ready(&mut flash).unwrap();
        assert!(!status.is_busy());
        // Five busy reads plus the one that saw WIP clear
        assert_eq!(flash.transport().opcode_log().len() - before, 6);
    }

    #[test]
    fn test_enable_write_detects_powered_down_chip() {
        let mut flash = flash_with(DummyConfig::default());
        flash.deep_power_down().unwrap();
        assert!(enable_write(&mut flash).is_err());
    }

    #[test]
    fn test_format_hexdump() {
        let lines = format_hexdump(0x100, b"SFDP\x00\x01");
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("000100  53 46 44 50 00 01"));
        assert!(lines[0].ends_with("|SFDP..|"));
    }
}
