//! SFDP dump command

use super::CmdResult;
use spinor_core::flash::SerialFlash;
use spinor_core::sfdp;
use spinor_core::transport::SpiTransport;

/// Print the SFDP header, parameter headers and BFPT density
pub fn run_sfdp<T: SpiTransport>(flash: &mut SerialFlash<T>) -> CmdResult {
    let header = sfdp::read_header(flash)?;
    println!(
        "SFDP revision {}, {} parameter header(s), access protocol 0x{:02X}",
        header.revision,
        header.num_param_headers(),
        header.access_protocol
    );

    for index in 0..header.num_param_headers() {
        let ph = sfdp::read_parameter_header(flash, index)?;
        println!(
            "  [{}] ID 0x{:04X} rev {} at 0x{:06X}, {} bytes{}",
            index,
            ph.id,
            ph.revision,
            ph.table_pointer,
            ph.length_bytes(),
            if ph.is_basic() { " (basic)" } else { "" }
        );
        if ph.is_basic() {
            let density = sfdp::read_density(flash, &ph)?;
            println!("      density: {} bytes ({} Mbit)", density, density * 8 / (1024 * 1024));
        }
    }
    Ok(())
}
