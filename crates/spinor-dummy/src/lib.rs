//! spinor-dummy - In-memory SPI NOR flash emulator
//!
//! [`DummyFlash`] implements [`SpiTransport`] and decodes the byte stream the
//! way a real chip does: opcode, address, dummy byte, data. Commands take
//! effect when chip-select is released. It's useful for testing and for
//! running the CLI without hardware.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "alloc")]
extern crate alloc;

#[cfg(feature = "alloc")]
use alloc::vec;
#[cfg(feature = "alloc")]
use alloc::vec::Vec;

use spinor_core::error::{Error, Result};
use spinor_core::flash::{Function, Status};
use spinor_core::spi::{address, opcodes, Direction, Operation};
use spinor_core::transport::{Line, SpiTransport};

/// Number of information rows
pub const INFO_ROWS: usize = 4;
/// Size of one information row
pub const INFO_ROW_SIZE: usize = 256;
/// Address distance between information rows
pub const INFO_ROW_STRIDE: u32 = 0x1000;

/// Configuration for the dummy flash
#[derive(Debug, Clone)]
pub struct DummyConfig {
    /// JEDEC manufacturer ID
    pub manufacturer_id: u8,
    /// JEDEC memory type
    pub memory_type: u8,
    /// JEDEC capacity code
    pub capacity: u8,
    /// Product ID returned by 0xAB
    pub product_id: u8,
    /// Device ID returned by 0x90
    pub device_id: u8,
    /// Flash size in bytes
    ///
    /// [`DummyFlash::new`] rounds this up to a power of two of at least one
    /// sector.
    pub size: usize,
    /// Factory unique ID
    pub unique_id: [u8; opcodes::UID_LEN],
    /// Status reads that report WIP after a program or erase
    pub busy_reads: u32,
}

impl Default for DummyConfig {
    fn default() -> Self {
        Self {
            manufacturer_id: 0x9D, // ISSI
            memory_type: 0x60,
            capacity: 0x18, // IS25LP128
            product_id: 0x17,
            device_id: 0x17,
            size: 16 * 1024 * 1024,
            unique_id: [
                0x49, 0x53, 0x53, 0x49, 0x2D, 0x44, 0x55, 0x4D, 0x4D, 0x59, 0x00, 0x01, 0x02,
                0x03, 0x04, 0x05,
            ],
            busy_reads: 0,
        }
    }
}

impl DummyConfig {
    /// Configuration for a chip of `size` bytes
    pub fn with_size(size: usize) -> Self {
        Self {
            size,
            capacity: size.trailing_zeros() as u8,
            ..Self::default()
        }
    }
}

/// Build a minimal JESD216B SFDP table for a chip of `size` bytes
///
/// One parameter header pointing at a 16-DWORD Basic Flash Parameter Table
/// at 0x30. Only DWORD 1 (4KB erase opcode) and DWORD 2 (density) are
/// filled in, the rest reads as 0xFF.
#[cfg(feature = "alloc")]
pub fn default_sfdp(size: usize) -> Vec<u8> {
    const BFPT_PTR: usize = 0x30;
    const BFPT_DWORDS: u8 = 16;

    let mut table = vec![0xFF; BFPT_PTR + BFPT_DWORDS as usize * 4];
    table[..8].copy_from_slice(&[b'S', b'F', b'D', b'P', 0x06, 0x01, 0x00, 0xFF]);
    table[8..16].copy_from_slice(&[0x00, 0x06, 0x01, BFPT_DWORDS, BFPT_PTR as u8, 0x00, 0x00, 0xFF]);

    // DWORD 1: 4KB erase supported, opcode in bits 15:8
    let dword1: u32 = 0xFFF0_00E5 | ((opcodes::SER as u32) << 8);
    table[BFPT_PTR..BFPT_PTR + 4].copy_from_slice(&dword1.to_le_bytes());
    // DWORD 2: density in bits minus one
    let dword2 = ((size as u64) * 8).saturating_sub(1) as u32;
    table[BFPT_PTR + 4..BFPT_PTR + 8].copy_from_slice(&dword2.to_le_bytes());
    table
}

/// Program/erase that is still "running"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Busy {
    Program,
    Erase,
}

/// Decoder state of the open transaction
#[derive(Debug, Default)]
struct Transaction {
    opcode: Option<u8>,
    operation: Option<Operation>,
    address: u32,
    address_bytes: usize,
    dummy_done: bool,
    cursor: u32,
    ignored: bool,
    #[cfg(feature = "alloc")]
    data: Vec<u8>,
}

impl Transaction {
    fn header_done(&self) -> bool {
        match self.operation {
            Some(op) => {
                let desc = op.descriptor();
                (!desc.address || self.address_bytes == address::ADDRESS_BYTES)
                    && (!desc.dummy || self.dummy_done)
            }
            None => false,
        }
    }
}

/// Dummy flash chip
///
/// Emulates an IS25LP-style flash chip in memory for testing purposes.
#[cfg(feature = "alloc")]
#[derive(Debug)]
pub struct DummyFlash {
    config: DummyConfig,
    data: Vec<u8>,
    info_rows: Vec<u8>,
    sfdp: Vec<u8>,
    status: Status,
    function: Function,
    deep_power_down: bool,
    reset_armed: bool,
    unlocked_sector: Option<u32>,
    busy: Option<(Busy, u32)>,
    selected: Option<Line>,
    tx: Transaction,
    log: Vec<u8>,
    resets: usize,
    transfers: usize,
    fail_on_transfer: Option<usize>,
}

#[cfg(feature = "alloc")]
impl DummyFlash {
    /// Create a new dummy flash with the given configuration
    pub fn new(mut config: DummyConfig) -> Self {
        let size = config
            .size
            .max(opcodes::SECTOR_SIZE as usize)
            .next_power_of_two();
        if size != config.size {
            log::debug!("dummy: size {} rounded up to {}", config.size, size);
            config.size = size;
        }
        let data = vec![0xFF; config.size];
        let sfdp = default_sfdp(config.size);
        let mut info_rows = vec![0xFF; INFO_ROWS * INFO_ROW_SIZE];
        // Row 0 is the factory row
        info_rows[..config.unique_id.len()].copy_from_slice(&config.unique_id);
        Self {
            config,
            data,
            info_rows,
            sfdp,
            status: Status::empty(),
            function: Function::IRL0,
            deep_power_down: false,
            reset_armed: false,
            unlocked_sector: None,
            busy: None,
            selected: None,
            tx: Transaction::default(),
            log: Vec::new(),
            resets: 0,
            transfers: 0,
            fail_on_transfer: None,
        }
    }

    /// Create a new dummy flash with default configuration (IS25LP128)
    pub fn new_default() -> Self {
        Self::new(DummyConfig::default())
    }

    /// Create a dummy flash with pre-filled data
    pub fn with_data(config: DummyConfig, initial_data: &[u8]) -> Self {
        let mut flash = Self::new(config);
        let len = core::cmp::min(initial_data.len(), flash.data.len());
        flash.data[..len].copy_from_slice(&initial_data[..len]);
        flash
    }

    /// Get a reference to the flash data
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Get a mutable reference to the flash data
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Get the configuration
    pub fn config(&self) -> &DummyConfig {
        &self.config
    }

    /// Contents of information row `row`
    pub fn info_row(&self, row: usize) -> &[u8] {
        &self.info_rows[row * INFO_ROW_SIZE..(row + 1) * INFO_ROW_SIZE]
    }

    /// Opcodes of all completed transactions, in order
    pub fn opcode_log(&self) -> &[u8] {
        &self.log
    }

    /// Chip is in deep power down
    pub fn is_powered_down(&self) -> bool {
        self.deep_power_down
    }

    /// Sector currently unlocked by 0x26, if any
    pub fn unlocked_sector(&self) -> Option<u32> {
        self.unlocked_sector
    }

    /// Number of completed software resets
    pub fn reset_count(&self) -> usize {
        self.resets
    }

    /// Chip-select is asserted
    pub fn is_selected(&self) -> bool {
        self.selected.is_some()
    }

    /// Fail the n-th byte transfer from now (0-based)
    pub fn fail_transfer_in(&mut self, n: usize) {
        self.fail_on_transfer = Some(self.transfers + n);
    }

    fn transfer(&mut self) -> Result<()> {
        if self.selected.is_none() {
            log::warn!("dummy: byte transfer without chip-select");
            return Err(Error::ChipSelect);
        }
        let n = self.transfers;
        self.transfers += 1;
        if self.fail_on_transfer == Some(n) {
            self.fail_on_transfer = None;
            return Err(Error::TransportFault);
        }
        Ok(())
    }

    fn accepts(&self, op: Operation) -> bool {
        if self.deep_power_down {
            return op.opcode() == opcodes::RDPD;
        }
        if self.busy.is_some() {
            return matches!(
                op,
                Operation::ReadStatus | Operation::ReadFunction | Operation::Suspend
            );
        }
        true
    }

    fn on_opcode(&mut self, opcode: u8) {
        self.tx.opcode = Some(opcode);
        match Operation::from_opcode(opcode) {
            Some(op) if self.accepts(op) => self.tx.operation = Some(op),
            Some(op) => {
                log::debug!("dummy: {:?} ignored in current state", op);
                self.tx.ignored = true;
            }
            None => {
                log::debug!("dummy: unknown opcode 0x{:02X}", opcode);
                self.tx.ignored = true;
            }
        }
    }

    fn read_data(&mut self) -> u8 {
        let Some(op) = self.tx.operation else {
            return 0xFF;
        };
        let addr = self.tx.address.wrapping_add(self.tx.cursor);
        let cursor = self.tx.cursor as usize;
        self.tx.cursor = self.tx.cursor.wrapping_add(1);

        match op {
            Operation::Read
            | Operation::FastRead
            | Operation::FastReadDualIo
            | Operation::FastReadDualOutput
            | Operation::FastReadQuadIo
            | Operation::FastReadQuadOutput => self.data[addr as usize % self.data.len()],
            Operation::ReadStatus => self.read_status(),
            Operation::ReadFunction => self.function.bits(),
            Operation::ReadJedecId => {
                [self.config.manufacturer_id, self.config.memory_type, self.config.capacity]
                    [cursor % 3]
            }
            Operation::ReadProductId => self.config.product_id,
            Operation::ReadManufacturerDeviceId => {
                let pair = if self.tx.address & 1 == 0 {
                    [self.config.manufacturer_id, self.config.device_id]
                } else {
                    [self.config.device_id, self.config.manufacturer_id]
                };
                pair[cursor % 2]
            }
            Operation::ReadUniqueId => self.config.unique_id[addr as usize % opcodes::UID_LEN],
            Operation::ReadSfdp => self.sfdp.get(addr as usize).copied().unwrap_or(0xFF),
            Operation::ReadInformationRow => self.info_rows[info_row_index(self.tx.address, cursor)],
            _ => 0xFF,
        }
    }

    fn read_status(&mut self) -> u8 {
        let mut status = self.status;
        if let Some((kind, remaining)) = self.busy {
            status |= Status::WIP;
            if remaining <= 1 {
                self.busy = None;
            } else {
                self.busy = Some((kind, remaining - 1));
            }
        }
        status.bits()
    }

    fn start_busy(&mut self, kind: Busy) {
        if self.config.busy_reads > 0 {
            self.busy = Some((kind, self.config.busy_reads));
        }
    }

    /// Consume WEL; returns false (and logs) when it was not set
    fn take_write_enable(&mut self, op: Operation) -> bool {
        if !self.status.contains(Status::WEL) {
            log::debug!("dummy: {:?} without write enable, ignored", op);
            return false;
        }
        self.status.remove(Status::WEL);
        true
    }

    fn erase(&mut self, addr: u32, size: usize) {
        let start = (addr as usize & !(size - 1)) % self.data.len();
        let end = core::cmp::min(start + size, self.data.len());
        log::debug!("dummy: erase 0x{:06X}..0x{:06X}", start, end);
        self.data[start..end].fill(0xFF);
    }

    fn program(&mut self, addr: u32) {
        // Flash programming: can only change 1 -> 0, wraps within the page
        let page_size = opcodes::PAGE_SIZE as usize;
        let page_base = addr as usize & !(page_size - 1);
        let len = self.data.len();
        for (i, &byte) in self.tx.data.iter().enumerate() {
            let offset = (addr as usize + i) % page_size;
            self.data[(page_base + offset) % len] &= byte;
        }
    }

    fn commit(&mut self) {
        let Some(op) = self.tx.operation else {
            return;
        };
        if let Some(opcode) = self.tx.opcode {
            self.log.push(opcode);
            // 0xAB wakes the chip whether or not an address follows
            if opcode == opcodes::RDPD {
                self.deep_power_down = false;
            }
        }
        if !self.tx.header_done() {
            log::debug!("dummy: {:?} aborted before header completed", op);
            return;
        }

        // Reset must directly follow reset enable
        let armed = core::mem::take(&mut self.reset_armed);
        let addr = self.tx.address;

        match op {
            Operation::WriteEnable => self.status.insert(Status::WEL),
            Operation::WriteDisable => self.status.remove(Status::WEL),
            Operation::PageProgram | Operation::QuadPageProgram => {
                if self.take_write_enable(op) {
                    self.program(addr);
                    self.start_busy(Busy::Program);
                }
            }
            Operation::SectorErase | Operation::BlockErase32K | Operation::BlockErase64K => {
                if self.take_write_enable(op) {
                    let size = match op {
                        Operation::SectorErase => opcodes::SECTOR_SIZE,
                        Operation::BlockErase32K => opcodes::BLOCK_32K_SIZE,
                        _ => opcodes::BLOCK_64K_SIZE,
                    };
                    self.erase(addr, size as usize);
                    self.start_busy(Busy::Erase);
                }
            }
            Operation::ChipErase => {
                if self.take_write_enable(op) {
                    self.data.fill(0xFF);
                    self.start_busy(Busy::Erase);
                }
            }
            Operation::WriteStatus => {
                if let Some(&value) = self.tx.data.first() {
                    if self.take_write_enable(op) {
                        // WIP and WEL are read-only
                        let writable = !(Status::WIP | Status::WEL).bits();
                        self.status = Status::from_bits_retain(value & writable);
                    }
                }
            }
            Operation::WriteFunction => {
                if let Some(&value) = self.tx.data.first() {
                    if self.take_write_enable(op) {
                        // Row lock bits are one-time programmable
                        let locks = value
                            & (Function::IRL0 | Function::IRL1 | Function::IRL2 | Function::IRL3)
                                .bits();
                        self.function |= Function::from_bits_retain(locks);
                    }
                }
            }
            Operation::ProgramInformationRow => {
                if self.take_write_enable(op) {
                    let row = ((addr / INFO_ROW_STRIDE) as usize) % INFO_ROWS;
                    if self.function.is_row_locked(row as u8) {
                        log::debug!("dummy: information row {} is locked", row);
                    } else {
                        for (i, &byte) in self.tx.data.iter().enumerate() {
                            self.info_rows[info_row_index(addr, i)] &= byte;
                        }
                    }
                }
            }
            Operation::DeepPowerDown => self.deep_power_down = true,
            Operation::ReleaseDeepPowerDown | Operation::ReadProductId => {
                self.deep_power_down = false
            }
            Operation::ResetEnable => self.reset_armed = true,
            Operation::Reset => {
                if armed {
                    self.software_reset();
                } else {
                    log::debug!("dummy: reset without reset enable, ignored");
                }
            }
            Operation::SectorUnlock => {
                self.unlocked_sector = Some((addr & address::ADDRESS_MASK) / opcodes::SECTOR_SIZE)
            }
            Operation::SectorLock => self.unlocked_sector = None,
            Operation::Suspend => {
                if let Some((kind, _)) = self.busy.take() {
                    self.function |= match kind {
                        Busy::Program => Function::PSUS,
                        Busy::Erase => Function::ESUS,
                    };
                }
            }
            Operation::Resume => {
                if self.function.is_suspended() {
                    self.function.remove(Function::PSUS | Function::ESUS);
                    // The operation was instantaneous, it completes on resume
                }
            }
            _ => {}
        }
    }

    fn software_reset(&mut self) {
        log::debug!("dummy: software reset");
        self.status.remove(Status::WEL | Status::WIP);
        self.function.remove(Function::PSUS | Function::ESUS);
        self.busy = None;
        self.unlocked_sector = None;
        self.resets += 1;
    }
}

/// Index into the information row storage; wraps within the row
fn info_row_index(addr: u32, offset: usize) -> usize {
    let row = ((addr / INFO_ROW_STRIDE) as usize) % INFO_ROWS;
    let column = (addr as usize + offset) % INFO_ROW_SIZE;
    row * INFO_ROW_SIZE + column
}

#[cfg(feature = "alloc")]
impl SpiTransport for DummyFlash {
    fn begin(&mut self, cs: Line) -> Result<()> {
        if let Some(current) = self.selected {
            log::warn!("dummy: {} selected while {} is active", cs, current);
            return Err(Error::BusBusy);
        }
        self.selected = Some(cs);
        self.tx = Transaction::default();
        Ok(())
    }

    fn write_byte(&mut self, byte: u8) -> Result<()> {
        self.transfer()?;
        if self.tx.ignored {
            return Ok(());
        }
        let Some(op) = self.tx.operation else {
            self.on_opcode(byte);
            return Ok(());
        };

        let desc = op.descriptor();
        if desc.address && self.tx.address_bytes < address::ADDRESS_BYTES {
            self.tx.address = (self.tx.address << 8) | byte as u32;
            self.tx.address_bytes += 1;
        } else if desc.dummy && !self.tx.dummy_done {
            self.tx.dummy_done = true;
        } else if desc.direction == Direction::Write {
            self.tx.data.push(byte);
        }
        Ok(())
    }

    fn read_byte(&mut self) -> Result<u8> {
        self.transfer()?;
        if self.tx.ignored || !self.tx.header_done() {
            // Nobody drives MISO
            return Ok(0xFF);
        }
        Ok(self.read_data())
    }

    fn end(&mut self, cs: Line) -> Result<()> {
        match self.selected.take() {
            Some(current) if current == cs => {}
            Some(current) => log::warn!("dummy: released {} but {} was selected", cs, current),
            None => {
                log::warn!("dummy: {} released without begin", cs);
                return Err(Error::ChipSelect);
            }
        }
        self.commit();
        self.tx = Transaction::default();
        Ok(())
    }
}
