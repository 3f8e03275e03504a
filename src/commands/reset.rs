//! Software reset command

use super::CmdResult;
use spinor_core::flash::SerialFlash;
use spinor_core::transport::SpiTransport;

/// Issue reset-enable and reset
pub fn run_reset<T: SpiTransport>(flash: &mut SerialFlash<T>) -> CmdResult {
    flash.reset()?;
    println!("Reset issued");
    Ok(())
}
