//! Flash device handle
//!
//! [`SerialFlash`] owns the transport and the pin assignment of one chip.
//! Every public operation is a single call into the framer with one catalog
//! entry; nothing is sequenced or polled behind the caller's back. In
//! particular, program/erase/register writes need a preceding
//! [`write_enable`](SerialFlash::write_enable), and completion has to be
//! checked with [`read_status`](SerialFlash::read_status).

use crate::error::Result;
use crate::protocol;
use crate::spi::{opcodes, Command, FastReadMode, Operation};
use crate::transport::{Line, SpiTransport};
use maybe_async::maybe_async;

use super::id::{JedecId, ManufacturerDeviceId, UniqueId};
use super::registers::{Function, Status};

/// Delay requested between reset-enable and reset
///
/// Datasheets require no gap beyond the chip-select deassertion between the
/// two instructions; the transport may stretch it.
pub const RESET_ENABLE_DELAY_US: u32 = 1;

/// Pin assignment of one flash chip
///
/// Only `chip_select` is driven (through the transport). `write_protect`
/// and `hold` are recorded for the caller; this driver never toggles them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Pins {
    /// Chip-select line asserted for every transaction
    pub chip_select: Line,
    /// Write-protect (WP#) line
    pub write_protect: Line,
    /// Hold (HOLD#) line
    pub hold: Line,
}

impl Pins {
    /// Create a pin assignment
    pub const fn new(chip_select: Line, write_protect: Line, hold: Line) -> Self {
        Self {
            chip_select,
            write_protect,
            hold,
        }
    }
}

/// Handle to one SPI NOR flash chip
///
/// The transport may be owned or borrowed (`&mut Bus`), so several handles
/// with different chip-select lines can share one bus.
#[derive(Debug)]
pub struct SerialFlash<T> {
    transport: T,
    pins: Pins,
}

impl<T> SerialFlash<T> {
    /// Create a handle; no bus traffic happens here
    pub fn new(transport: T, pins: Pins) -> Self {
        log::debug!(
            "Flash handle: cs={} wp={} hold={}",
            pins.chip_select,
            pins.write_protect,
            pins.hold
        );
        Self { transport, pins }
    }

    /// Pin assignment given at construction
    pub fn pins(&self) -> &Pins {
        &self.pins
    }

    /// Borrow the transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Mutably borrow the transport
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Give back the transport and pin assignment
    pub fn release(self) -> (T, Pins) {
        (self.transport, self.pins)
    }
}

#[maybe_async]
impl<T: SpiTransport> SerialFlash<T> {
    /// Execute an arbitrary catalog command
    ///
    /// This is the generic entry point; all other operations go through it.
    /// Useful for catalog entries without a dedicated method, like the
    /// quad page program on a transport that switches data lines by opcode.
    pub async fn transfer(&mut self, cmd: &mut Command<'_>) -> Result<()> {
        protocol::execute(&mut self.transport, self.pins.chip_select, cmd).await
    }

    async fn simple(&mut self, op: Operation) -> Result<()> {
        self.transfer(&mut Command::simple(op)).await
    }

    async fn addressed(&mut self, op: Operation, addr: u32) -> Result<()> {
        self.transfer(&mut Command::addressed(op, addr)).await
    }

    async fn read_into(&mut self, op: Operation, addr: u32, buf: &mut [u8]) -> Result<()> {
        self.transfer(&mut Command::read(op, addr, buf)).await
    }

    async fn write_from(&mut self, op: Operation, addr: u32, data: &[u8]) -> Result<()> {
        self.transfer(&mut Command::write(op, addr, data)).await
    }

    async fn read_u8(&mut self, op: Operation, addr: u32) -> Result<u8> {
        let mut buf = [0u8; 1];
        self.read_into(op, addr, &mut buf).await?;
        Ok(buf[0])
    }

    // ------------------------------------------------------------------------
    // Read
    // ------------------------------------------------------------------------

    /// Read one byte with the normal read instruction
    pub async fn read_byte(&mut self, addr: u32) -> Result<u8> {
        self.read_u8(Operation::Read, addr).await
    }

    /// Fill `buf` starting at `addr` with the normal read instruction
    pub async fn read(&mut self, addr: u32, buf: &mut [u8]) -> Result<()> {
        self.read_into(Operation::Read, addr, buf).await
    }

    /// Read one byte with the fast read instruction
    pub async fn fast_read_byte(&mut self, addr: u32) -> Result<u8> {
        self.read_u8(Operation::FastRead, addr).await
    }

    /// Fill `buf` starting at `addr` with the fast read instruction
    pub async fn fast_read(&mut self, addr: u32, buf: &mut [u8]) -> Result<()> {
        self.read_into(Operation::FastRead, addr, buf).await
    }

    /// Fast read with a dual/quad opcode
    pub async fn fast_read_with(
        &mut self,
        mode: FastReadMode,
        addr: u32,
        buf: &mut [u8],
    ) -> Result<()> {
        self.read_into(mode.operation(), addr, buf).await
    }

    // ------------------------------------------------------------------------
    // Program
    // ------------------------------------------------------------------------

    /// Program one byte
    pub async fn write_byte(&mut self, addr: u32, byte: u8) -> Result<()> {
        self.write_from(Operation::PageProgram, addr, &[byte]).await
    }

    /// Page program `data` at `addr`
    ///
    /// The chip wraps within the 256-byte page; splitting is up to the caller.
    pub async fn write(&mut self, addr: u32, data: &[u8]) -> Result<()> {
        self.write_from(Operation::PageProgram, addr, data).await
    }

    // ------------------------------------------------------------------------
    // Erase
    // ------------------------------------------------------------------------

    /// Erase the 4KB sector with index `sector`
    pub async fn erase_sector(&mut self, sector: u32) -> Result<()> {
        self.addressed(Operation::SectorErase, sector.wrapping_mul(opcodes::SECTOR_SIZE))
            .await
    }

    /// Erase the 32KB block with index `block`
    pub async fn erase_block_32k(&mut self, block: u32) -> Result<()> {
        self.addressed(Operation::BlockErase32K, block.wrapping_mul(opcodes::BLOCK_32K_SIZE))
            .await
    }

    /// Erase the 64KB block with index `block`
    pub async fn erase_block_64k(&mut self, block: u32) -> Result<()> {
        self.addressed(Operation::BlockErase64K, block.wrapping_mul(opcodes::BLOCK_64K_SIZE))
            .await
    }

    /// Erase the whole chip
    pub async fn erase_chip(&mut self) -> Result<()> {
        self.simple(Operation::ChipErase).await
    }

    // ------------------------------------------------------------------------
    // Write control
    // ------------------------------------------------------------------------

    /// Set the write enable latch
    pub async fn write_enable(&mut self) -> Result<()> {
        self.simple(Operation::WriteEnable).await
    }

    /// Clear the write enable latch
    pub async fn write_disable(&mut self) -> Result<()> {
        self.simple(Operation::WriteDisable).await
    }

    // ------------------------------------------------------------------------
    // Registers
    // ------------------------------------------------------------------------

    /// Read the status register
    pub async fn read_status(&mut self) -> Result<u8> {
        self.read_u8(Operation::ReadStatus, 0).await
    }

    /// Write the status register
    pub async fn write_status(&mut self, status: u8) -> Result<()> {
        self.write_from(Operation::WriteStatus, 0, &[status]).await
    }

    /// Read the function register
    pub async fn read_function(&mut self) -> Result<u8> {
        self.read_u8(Operation::ReadFunction, 0).await
    }

    /// Write the function register
    pub async fn write_function(&mut self, function: u8) -> Result<()> {
        self.write_from(Operation::WriteFunction, 0, &[function]).await
    }

    /// Read the status register as flags
    pub async fn status(&mut self) -> Result<Status> {
        Ok(Status::from_bits_retain(self.read_status().await?))
    }

    /// Read the function register as flags
    pub async fn function(&mut self) -> Result<Function> {
        Ok(Function::from_bits_retain(self.read_function().await?))
    }

    // ------------------------------------------------------------------------
    // Power
    // ------------------------------------------------------------------------

    /// Enter deep power down
    pub async fn deep_power_down(&mut self) -> Result<()> {
        self.simple(Operation::DeepPowerDown).await
    }

    /// Leave deep power down
    pub async fn release_deep_power_down(&mut self) -> Result<()> {
        self.simple(Operation::ReleaseDeepPowerDown).await
    }

    // ------------------------------------------------------------------------
    // Identification
    // ------------------------------------------------------------------------

    /// Read the manufacturer/product ID byte (address fixed at 0)
    pub async fn read_product_id(&mut self) -> Result<u8> {
        self.read_u8(Operation::ReadProductId, 0).await
    }

    /// Read the JEDEC ID
    pub async fn read_jedec_id(&mut self) -> Result<JedecId> {
        let mut buf = [0u8; 3];
        self.read_into(Operation::ReadJedecId, 0, &mut buf).await?;
        Ok(JedecId::from_bytes(buf))
    }

    /// Read the manufacturer and device ID
    ///
    /// `addr` selects which of the two bytes comes first on most parts
    /// (0 = manufacturer first, 1 = device first).
    pub async fn read_manufacturer_device_id(&mut self, addr: u32) -> Result<ManufacturerDeviceId> {
        let mut buf = [0u8; 2];
        self.read_into(Operation::ReadManufacturerDeviceId, addr, &mut buf)
            .await?;
        Ok(ManufacturerDeviceId::from_bytes(buf))
    }

    /// Read the 16-byte unique ID at `addr` into `buf`
    pub async fn read_unique_id(&mut self, addr: u32, buf: &mut [u8; opcodes::UID_LEN]) -> Result<()> {
        self.read_into(Operation::ReadUniqueId, addr, buf).await
    }

    /// Read the 16-byte unique ID at `addr`
    pub async fn unique_id(&mut self, addr: u32) -> Result<UniqueId> {
        let mut buf = [0u8; opcodes::UID_LEN];
        self.read_unique_id(addr, &mut buf).await?;
        Ok(UniqueId(buf))
    }

    // ------------------------------------------------------------------------
    // SFDP
    // ------------------------------------------------------------------------

    /// Read one SFDP byte
    pub async fn read_sfdp_byte(&mut self, addr: u32) -> Result<u8> {
        self.read_u8(Operation::ReadSfdp, addr).await
    }

    /// Fill `buf` from the SFDP table starting at `addr`
    pub async fn read_sfdp(&mut self, addr: u32, buf: &mut [u8]) -> Result<()> {
        self.read_into(Operation::ReadSfdp, addr, buf).await
    }

    // ------------------------------------------------------------------------
    // Maintenance
    // ------------------------------------------------------------------------

    /// Software reset: reset-enable, short delay, reset
    ///
    /// Sent as two separate transactions. The chip reboots afterwards; this
    /// does not wait for it.
    pub async fn reset(&mut self) -> Result<()> {
        self.simple(Operation::ResetEnable).await?;
        self.transport.delay_us(RESET_ENABLE_DELAY_US).await;
        self.simple(Operation::Reset).await
    }

    /// Relock all sectors
    pub async fn lock(&mut self) -> Result<()> {
        self.simple(Operation::SectorLock).await
    }

    /// Unlock the 4KB sector with index `sector`
    pub async fn unlock(&mut self, sector: u32) -> Result<()> {
        self.addressed(Operation::SectorUnlock, sector.wrapping_mul(opcodes::SECTOR_SIZE))
            .await
    }

    /// Suspend the running program or erase
    pub async fn suspend(&mut self) -> Result<()> {
        self.simple(Operation::Suspend).await
    }

    /// Resume a suspended program or erase
    pub async fn resume(&mut self) -> Result<()> {
        self.simple(Operation::Resume).await
    }

    // ------------------------------------------------------------------------
    // Information rows
    // ------------------------------------------------------------------------

    /// Program `data` into the information row area at `addr`
    pub async fn write_information_row(&mut self, addr: u32, data: &[u8]) -> Result<()> {
        self.write_from(Operation::ProgramInformationRow, addr, data)
            .await
    }

    /// Fill `buf` from the information row area starting at `addr`
    pub async fn read_information_row(&mut self, addr: u32, buf: &mut [u8]) -> Result<()> {
        self.read_into(Operation::ReadInformationRow, addr, buf).await
    }
}

#[cfg(all(test, feature = "is_sync"))]
mod tests {
    use super::*;
    use crate::transport::mock::{Event, MockTransport};
    use std::vec;
    use std::vec::Vec;

    const CS: Line = Line::new(2, 0);

    fn flash(mock: MockTransport) -> SerialFlash<MockTransport> {
        SerialFlash::new(mock, Pins::new(CS, Line::new(2, 1), Line::new(2, 2)))
    }

    fn transactions(flash: &SerialFlash<MockTransport>) -> Vec<Vec<u8>> {
        flash.transport().transactions()
    }

    #[test]
    fn test_address_bytes_for_any_u32() {
        let mut dev = flash(MockTransport::new());
        let addrs = [0u32, 1, 0x00FF_FFFF, 0x0100_0000, 0xDEAD_BEEF, u32::MAX, 0x0012_3456];
        for &addr in &addrs {
            dev.read_byte(addr).unwrap();
        }
        for (tx, &addr) in transactions(&dev).iter().zip(addrs.iter()) {
            assert_eq!(
                &tx[1..4],
                &[
                    ((addr >> 16) & 0xFF) as u8,
                    ((addr >> 8) & 0xFF) as u8,
                    (addr & 0xFF) as u8
                ]
            );
        }
    }

    #[test]
    fn test_erase_addresses() {
        let mut dev = flash(MockTransport::new());
        dev.erase_sector(3).unwrap();
        dev.erase_block_32k(5).unwrap();
        dev.erase_block_64k(7).unwrap();
        dev.erase_chip().unwrap();
        dev.unlock(0x10).unwrap();

        assert_eq!(
            transactions(&dev),
            vec![
                vec![0xD7, 0x00, 0x30, 0x00],
                vec![0x52, 0x02, 0x80, 0x00],
                vec![0xD8, 0x07, 0x00, 0x00],
                vec![0xC7],
                vec![0x26, 0x01, 0x00, 0x00],
            ]
        );
    }

    #[test]
    fn test_erase_index_overflow_truncates() {
        let mut dev = flash(MockTransport::new());
        // 0x1000 * 0x1001 = 0x0100_1000, bit 24 is dropped on the wire
        dev.erase_sector(0x1001).unwrap();
        dev.erase_block_64k(0x1FF).unwrap();
        let txs = transactions(&dev);
        assert_eq!(txs[0], [0xD7, 0x00, 0x10, 0x00]);
        assert_eq!(txs[1], [0xD8, 0xFF, 0x00, 0x00]);
    }

    #[test]
    fn test_read_range_without_dummy() {
        let mut dev = flash(MockTransport::with_responses(&[10, 20, 30, 40, 50]));
        let mut buf = [0u8; 5];
        dev.read(0x00_0200, &mut buf).unwrap();
        assert_eq!(buf, [10, 20, 30, 40, 50]);
        assert_eq!(transactions(&dev), vec![vec![0x03, 0x00, 0x02, 0x00]]);
    }

    #[test]
    fn test_fast_read_range_with_dummy() {
        let mut dev = flash(MockTransport::with_responses(&[0xA5, 0x5A]));
        let mut buf = [0u8; 2];
        dev.fast_read(0x01_0000, &mut buf).unwrap();
        assert_eq!(buf, [0xA5, 0x5A]);

        // Begin, opcode, 3 address bytes, dummy, 2 reads, End
        let events = &dev.transport().events;
        assert_eq!(events.len(), 9);
        assert_eq!(events[2], Event::Write(0x01));
        assert_eq!(events[5], Event::Write(0x00));
        assert_eq!(events[6], Event::Read(0xA5));
    }

    #[test]
    fn test_fast_read_byte_and_modes() {
        let mut dev = flash(MockTransport::with_responses(&[0x77, 0x01, 0x02]));
        assert_eq!(dev.fast_read_byte(0x10).unwrap(), 0x77);
        let mut buf = [0u8; 2];
        dev.fast_read_with(FastReadMode::QuadIo, 0x20, &mut buf).unwrap();
        assert_eq!(buf, [0x01, 0x02]);
        let txs = transactions(&dev);
        assert_eq!(txs[0], [0x0B, 0x00, 0x00, 0x10, 0x00]);
        assert_eq!(txs[1], [0xEB, 0x00, 0x00, 0x20, 0x00]);
    }

    #[test]
    fn test_program() {
        let mut dev = flash(MockTransport::new());
        dev.write_byte(0x00_0100, 0x5A).unwrap();
        dev.write(0x00_0200, &[1, 2, 3, 4]).unwrap();
        let txs = transactions(&dev);
        assert_eq!(txs[0], [0x02, 0x00, 0x01, 0x00, 0x5A]);
        assert_eq!(txs[1], [0x02, 0x00, 0x02, 0x00, 1, 2, 3, 4]);
    }

    #[test]
    fn test_jedec_id_big_endian() {
        let mut dev = flash(MockTransport::with_responses(&[0x11, 0x22, 0x33]));
        let id = dev.read_jedec_id().unwrap();
        assert_eq!(id.raw(), 0x11_2233);
        assert_eq!(transactions(&dev), vec![vec![0x9F]]);
    }

    #[test]
    fn test_identification_framing() {
        let mut dev = flash(MockTransport::with_responses(&[
            0x17, // product id
            0x9D, 0x17, // manufacturer/device id
        ]));
        assert_eq!(dev.read_product_id().unwrap(), 0x17);
        assert_eq!(dev.read_manufacturer_device_id(1).unwrap().raw(), 0x9D17);

        let mut uid = [0u8; opcodes::UID_LEN];
        dev.read_unique_id(0x00_0000, &mut uid).unwrap();

        let txs = transactions(&dev);
        assert_eq!(txs[0], [0xAB, 0x00, 0x00, 0x00]);
        assert_eq!(txs[1], [0x90, 0x00, 0x00, 0x01]);
        assert_eq!(txs[2], [0x4B, 0x00, 0x00, 0x00, 0x00]);
        assert_eq!(
            dev.transport().count(|e| matches!(e, Event::Read(_))),
            1 + 2 + opcodes::UID_LEN
        );
    }

    #[test]
    fn test_status_round_trip_through_echo() {
        let mut dev = flash(MockTransport::new());
        dev.write_status(0xFF).unwrap();
        assert_eq!(dev.read_status().unwrap(), 0xFF);

        dev.write_function(0x30).unwrap();
        assert_eq!(dev.function().unwrap(), Function::IRL0 | Function::IRL1);

        let txs = transactions(&dev);
        assert_eq!(txs[0], [0x01, 0xFF]);
        assert_eq!(txs[1], [0x05]);
        assert_eq!(txs[2], [0x42, 0x30]);
        assert_eq!(txs[3], [0x48]);
    }

    #[test]
    fn test_single_opcode_operations() {
        let mut dev = flash(MockTransport::new());
        dev.write_enable().unwrap();
        dev.write_disable().unwrap();
        dev.deep_power_down().unwrap();
        dev.release_deep_power_down().unwrap();
        dev.lock().unwrap();
        dev.suspend().unwrap();
        dev.resume().unwrap();
        assert_eq!(
            transactions(&dev),
            vec![
                vec![0x06],
                vec![0x04],
                vec![0xB9],
                vec![0xAB],
                vec![0x24],
                vec![0x75],
                vec![0x7A],
            ]
        );
    }

    #[test]
    fn test_reset_is_two_transactions() {
        let mut dev = flash(MockTransport::new());
        dev.reset().unwrap();
        assert_eq!(
            dev.transport().events,
            [
                Event::Begin(CS),
                Event::Write(0x66),
                Event::End(CS),
                Event::Delay(RESET_ENABLE_DELAY_US),
                Event::Begin(CS),
                Event::Write(0x99),
                Event::End(CS),
            ]
        );
    }

    #[test]
    fn test_sfdp_and_information_rows() {
        let mut dev = flash(MockTransport::with_responses(&[0x53, 1, 2, 3]));
        assert_eq!(dev.read_sfdp_byte(0).unwrap(), 0x53);
        let mut buf = [0u8; 3];
        dev.read_information_row(0x00_1000, &mut buf).unwrap();
        assert_eq!(buf, [1, 2, 3]);
        dev.write_information_row(0x00_2000, &[9, 8]).unwrap();

        let txs = transactions(&dev);
        assert_eq!(txs[0], [0x5A, 0x00, 0x00, 0x00, 0x00]);
        assert_eq!(txs[1], [0x68, 0x00, 0x10, 0x00, 0x00]);
        assert_eq!(txs[2], [0x62, 0x00, 0x20, 0x00, 9, 8]);
    }

    #[test]
    fn test_every_operation_frames_once_even_when_empty() {
        let mut dev = flash(MockTransport::new());
        let mut empty = [0u8; 0];
        dev.read(0, &mut empty).unwrap();
        dev.fast_read(0, &mut empty).unwrap();
        dev.write(0, &[]).unwrap();
        dev.read_sfdp(0, &mut empty).unwrap();
        dev.read_information_row(0, &mut empty).unwrap();
        dev.write_information_row(0, &[]).unwrap();

        let mock = dev.transport();
        assert_eq!(mock.count(|e| matches!(e, Event::Begin(_))), 6);
        assert_eq!(mock.count(|e| matches!(e, Event::End(_))), 6);
        assert_eq!(mock.count(|e| matches!(e, Event::Read(_))), 0);
        assert_eq!(
            transactions(&dev).iter().map(|tx| tx.len()).collect::<Vec<_>>(),
            vec![4, 5, 4, 5, 5, 4]
        );
    }

    #[test]
    fn test_release_returns_parts() {
        let dev = flash(MockTransport::new());
        assert_eq!(dev.pins().chip_select, CS);
        let (mock, pins) = dev.release();
        assert!(mock.events.is_empty());
        assert_eq!(pins.hold, Line::new(2, 2));
        assert_eq!(pins.write_protect, Line::new(2, 1));
    }
}
