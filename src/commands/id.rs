//! Identification command

use super::CmdResult;
use spinor_core::flash::SerialFlash;
use spinor_core::transport::SpiTransport;

/// Print every identification value the chip offers
pub fn run_id<T: SpiTransport>(flash: &mut SerialFlash<T>) -> CmdResult {
    let jedec = flash.read_jedec_id()?;
    let product = flash.read_product_id()?;
    let mfr_dev = flash.read_manufacturer_device_id(0)?;
    let uid = flash.unique_id(0)?;

    if jedec.raw() == 0xFF_FFFF || jedec.raw() == 0 {
        log::warn!("JEDEC ID 0x{:06X} - no chip responding?", jedec.raw());
    }

    println!(
        "JEDEC ID:            {} (manufacturer 0x{:02X}, type 0x{:02X}, capacity 0x{:02X})",
        jedec,
        jedec.manufacturer(),
        jedec.memory_type(),
        jedec.capacity()
    );
    println!("Product ID:          0x{:02X}", product);
    println!("Manufacturer/device: {}", mfr_dev);
    println!("Unique ID:           {}", uid);
    Ok(())
}
