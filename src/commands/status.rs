//! Register dump command

use super::CmdResult;
use spinor_core::flash::{Function, SerialFlash, Status};
use spinor_core::transport::SpiTransport;

/// Print the status and function registers bit by bit
pub fn run_status<T: SpiTransport>(flash: &mut SerialFlash<T>) -> CmdResult {
    let status = flash.status()?;
    let function = flash.function()?;

    println!("Status register:   0x{:02X}", status.bits());
    println!("  WIP  (busy):           {}", status.is_busy());
    println!("  WEL  (write enabled):  {}", status.contains(Status::WEL));
    println!("  BP   (protect level):  {}", status.protect_level());
    println!("  QE   (quad enable):    {}", status.contains(Status::QE));
    println!("  SRWD (status locked):  {}", status.contains(Status::SRWD));

    println!("Function register: 0x{:02X}", function.bits());
    println!("  PSUS (program susp.):  {}", function.contains(Function::PSUS));
    println!("  ESUS (erase susp.):    {}", function.contains(Function::ESUS));
    for row in 0..4u8 {
        println!("  IRL{} (row {} locked):  {}", row, row, function.is_row_locked(row));
    }
    Ok(())
}
