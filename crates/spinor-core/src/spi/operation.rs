//! Operation catalog
//!
//! Every instruction the driver can send is one [`Operation`]. The
//! [`Descriptor`] of an operation tells the framer how to serialize it:
//! whether an address follows the opcode, whether a dummy byte precedes the
//! data phase, and which way the payload flows.

use super::opcodes;

/// Direction of the data phase that follows the command header
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// No data phase
    None,
    /// Bytes are clocked in from the chip
    Read,
    /// Bytes are clocked out to the chip
    Write,
}

/// Capability group of an operation
///
/// The groups are exclusive: every operation belongs to exactly one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Observes the chip without changing any state
    ReadOnly,
    /// Changes array, register or lock contents at a location or register
    StateChanging,
    /// Acts on the chip as a whole (erase all, power, reset, write latch)
    Global,
}

/// Wire shape of one operation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Descriptor {
    /// Opcode sent first in the transaction
    pub opcode: u8,
    /// A 24-bit address follows the opcode
    pub address: bool,
    /// One zero byte follows the address before the data phase
    pub dummy: bool,
    /// Direction of the data phase
    pub direction: Direction,
    /// Capability group
    pub capability: Capability,
}

impl Descriptor {
    const fn new(
        opcode: u8,
        address: bool,
        dummy: bool,
        direction: Direction,
        capability: Capability,
    ) -> Self {
        Self {
            opcode,
            address,
            dummy,
            direction,
            capability,
        }
    }

    /// Number of header bytes (opcode + address + dummy)
    pub const fn header_len(&self) -> usize {
        let mut len = 1;
        if self.address {
            len += super::address::ADDRESS_BYTES;
        }
        if self.dummy {
            len += 1;
        }
        len
    }
}

/// A flash instruction
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Normal read
    Read,
    /// Fast read (dummy byte)
    FastRead,
    /// Fast read, dual I/O
    FastReadDualIo,
    /// Fast read, dual output
    FastReadDualOutput,
    /// Fast read, quad I/O
    FastReadQuadIo,
    /// Fast read, quad output
    FastReadQuadOutput,
    /// Page program
    PageProgram,
    /// Quad input page program
    QuadPageProgram,
    /// 4KB sector erase
    SectorErase,
    /// 32KB block erase
    BlockErase32K,
    /// 64KB block erase
    BlockErase64K,
    /// Whole chip erase
    ChipErase,
    /// Set the write enable latch
    WriteEnable,
    /// Clear the write enable latch
    WriteDisable,
    /// Read the status register
    ReadStatus,
    /// Write the status register
    WriteStatus,
    /// Read the function register
    ReadFunction,
    /// Write the function register
    WriteFunction,
    /// Enter deep power down
    DeepPowerDown,
    /// Leave deep power down
    ReleaseDeepPowerDown,
    /// Read manufacturer and product ID
    ReadProductId,
    /// Read JEDEC ID
    ReadJedecId,
    /// Read manufacturer and device ID
    ReadManufacturerDeviceId,
    /// Read the 16-byte unique ID
    ReadUniqueId,
    /// Read the SFDP table
    ReadSfdp,
    /// Arm the software reset
    ResetEnable,
    /// Software reset
    Reset,
    /// Program an information row
    ProgramInformationRow,
    /// Read an information row
    ReadInformationRow,
    /// Unlock one sector
    SectorUnlock,
    /// Relock all sectors
    SectorLock,
    /// Suspend the running program/erase
    Suspend,
    /// Resume a suspended program/erase
    Resume,
}

impl Operation {
    /// Every operation, in catalog order
    pub const ALL: [Operation; 33] = [
        Self::Read,
        Self::FastRead,
        Self::FastReadDualIo,
        Self::FastReadDualOutput,
        Self::FastReadQuadIo,
        Self::FastReadQuadOutput,
        Self::PageProgram,
        Self::QuadPageProgram,
        Self::SectorErase,
        Self::BlockErase32K,
        Self::BlockErase64K,
        Self::ChipErase,
        Self::WriteEnable,
        Self::WriteDisable,
        Self::ReadStatus,
        Self::WriteStatus,
        Self::ReadFunction,
        Self::WriteFunction,
        Self::DeepPowerDown,
        Self::ReleaseDeepPowerDown,
        Self::ReadProductId,
        Self::ReadJedecId,
        Self::ReadManufacturerDeviceId,
        Self::ReadUniqueId,
        Self::ReadSfdp,
        Self::ResetEnable,
        Self::Reset,
        Self::ProgramInformationRow,
        Self::ReadInformationRow,
        Self::SectorUnlock,
        Self::SectorLock,
        Self::Suspend,
        Self::Resume,
    ];

    /// Wire shape of this operation
    pub const fn descriptor(self) -> Descriptor {
        use Capability::*;
        use Direction::{None as NoData, Read as In, Write as Out};

        match self {
            Self::Read => Descriptor::new(opcodes::RD, true, false, In, ReadOnly),
            Self::FastRead => Descriptor::new(opcodes::FR, true, true, In, ReadOnly),
            Self::FastReadDualIo => Descriptor::new(opcodes::FRDIO, true, true, In, ReadOnly),
            Self::FastReadDualOutput => Descriptor::new(opcodes::FRDO, true, true, In, ReadOnly),
            Self::FastReadQuadIo => Descriptor::new(opcodes::FRQIO, true, true, In, ReadOnly),
            Self::FastReadQuadOutput => Descriptor::new(opcodes::FRQO, true, true, In, ReadOnly),
            Self::PageProgram => Descriptor::new(opcodes::PP, true, false, Out, StateChanging),
            Self::QuadPageProgram => Descriptor::new(opcodes::PPQ, true, false, Out, StateChanging),
            Self::SectorErase => Descriptor::new(opcodes::SER, true, false, NoData, StateChanging),
            Self::BlockErase32K => {
                Descriptor::new(opcodes::BER32, true, false, NoData, StateChanging)
            }
            Self::BlockErase64K => {
                Descriptor::new(opcodes::BER64, true, false, NoData, StateChanging)
            }
            Self::ChipErase => Descriptor::new(opcodes::CER, false, false, NoData, Global),
            Self::WriteEnable => Descriptor::new(opcodes::WREN, false, false, NoData, Global),
            Self::WriteDisable => Descriptor::new(opcodes::WRDI, false, false, NoData, Global),
            Self::ReadStatus => Descriptor::new(opcodes::RDSR, false, false, In, ReadOnly),
            Self::WriteStatus => Descriptor::new(opcodes::WRSR, false, false, Out, StateChanging),
            Self::ReadFunction => Descriptor::new(opcodes::RDFR, false, false, In, ReadOnly),
            Self::WriteFunction => Descriptor::new(opcodes::WRFR, false, false, Out, StateChanging),
            Self::DeepPowerDown => Descriptor::new(opcodes::DP, false, false, NoData, Global),
            Self::ReleaseDeepPowerDown => {
                Descriptor::new(opcodes::RDPD, false, false, NoData, Global)
            }
            Self::ReadProductId => Descriptor::new(opcodes::RDID, true, false, In, ReadOnly),
            Self::ReadJedecId => Descriptor::new(opcodes::RDJDID, false, false, In, ReadOnly),
            Self::ReadManufacturerDeviceId => {
                Descriptor::new(opcodes::RDMDID, true, false, In, ReadOnly)
            }
            Self::ReadUniqueId => Descriptor::new(opcodes::RDUID, true, true, In, ReadOnly),
            Self::ReadSfdp => Descriptor::new(opcodes::RDSFDP, true, true, In, ReadOnly),
            Self::ResetEnable => Descriptor::new(opcodes::RSTEN, false, false, NoData, Global),
            Self::Reset => Descriptor::new(opcodes::RST, false, false, NoData, Global),
            Self::ProgramInformationRow => {
                Descriptor::new(opcodes::IRP, true, false, Out, StateChanging)
            }
            Self::ReadInformationRow => Descriptor::new(opcodes::IRRD, true, true, In, ReadOnly),
            Self::SectorUnlock => {
                Descriptor::new(opcodes::SECUNLOCK, true, false, NoData, StateChanging)
            }
            Self::SectorLock => Descriptor::new(opcodes::SECLOCK, false, false, NoData, Global),
            Self::Suspend => Descriptor::new(opcodes::PERSUS, false, false, NoData, Global),
            Self::Resume => Descriptor::new(opcodes::PERRSM, false, false, NoData, Global),
        }
    }

    /// Opcode of this operation
    pub const fn opcode(self) -> u8 {
        self.descriptor().opcode
    }

    /// Capability group of this operation
    pub const fn capability(self) -> Capability {
        self.descriptor().capability
    }

    /// Look up the operation for an opcode
    ///
    /// `0xAB` is shared by [`Operation::ReadProductId`] and
    /// [`Operation::ReleaseDeepPowerDown`]; the address-bearing
    /// `ReadProductId` is returned since the chip treats both the same way
    /// until an address byte arrives.
    pub fn from_opcode(opcode: u8) -> Option<Self> {
        if opcode == opcodes::RDPD {
            return Some(Self::ReadProductId);
        }
        Self::ALL.iter().copied().find(|op| op.opcode() == opcode)
    }
}

/// Read instruction used by [`SerialFlash::fast_read_with`](crate::flash::SerialFlash::fast_read_with)
///
/// The byte framing is identical for all modes; a transport that drives
/// multiple data lines picks the line count from the opcode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FastReadMode {
    /// 1-1-1
    #[default]
    Single,
    /// 1-1-2
    DualOutput,
    /// 1-2-2
    DualIo,
    /// 1-1-4
    QuadOutput,
    /// 1-4-4
    QuadIo,
}

impl FastReadMode {
    /// Catalog entry for this mode
    pub const fn operation(self) -> Operation {
        match self {
            Self::Single => Operation::FastRead,
            Self::DualOutput => Operation::FastReadDualOutput,
            Self::DualIo => Operation::FastReadDualIo,
            Self::QuadOutput => Operation::FastReadQuadOutput,
            Self::QuadIo => Operation::FastReadQuadIo,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fast_reads_carry_dummy_byte() {
        for op in [
            Operation::FastRead,
            Operation::FastReadDualIo,
            Operation::FastReadDualOutput,
            Operation::FastReadQuadIo,
            Operation::FastReadQuadOutput,
            Operation::ReadUniqueId,
            Operation::ReadSfdp,
            Operation::ReadInformationRow,
        ] {
            let desc = op.descriptor();
            assert!(desc.address, "{:?} must be address-bearing", op);
            assert!(desc.dummy, "{:?} must carry a dummy byte", op);
            assert_eq!(desc.direction, Direction::Read);
            assert_eq!(desc.header_len(), 5);
        }
    }

    #[test]
    fn test_plain_read_and_program_have_no_dummy() {
        for op in [
            Operation::Read,
            Operation::PageProgram,
            Operation::ProgramInformationRow,
            Operation::ReadProductId,
            Operation::ReadManufacturerDeviceId,
        ] {
            let desc = op.descriptor();
            assert!(desc.address);
            assert!(!desc.dummy);
            assert_eq!(desc.header_len(), 4);
        }
    }

    #[test]
    fn test_erase_addressing() {
        assert!(Operation::SectorErase.descriptor().address);
        assert!(Operation::BlockErase32K.descriptor().address);
        assert!(Operation::BlockErase64K.descriptor().address);
        assert!(!Operation::ChipErase.descriptor().address);
        assert!(Operation::SectorUnlock.descriptor().address);
        assert!(!Operation::SectorLock.descriptor().address);
        assert_eq!(Operation::ChipErase.descriptor().header_len(), 1);
    }

    #[test]
    fn test_capability_groups() {
        assert_eq!(Operation::Read.capability(), Capability::ReadOnly);
        assert_eq!(Operation::ReadStatus.capability(), Capability::ReadOnly);
        assert_eq!(Operation::PageProgram.capability(), Capability::StateChanging);
        assert_eq!(Operation::WriteStatus.capability(), Capability::StateChanging);
        assert_eq!(Operation::ChipErase.capability(), Capability::Global);
        assert_eq!(Operation::Reset.capability(), Capability::Global);

        // Read-only operations never write a payload
        for op in Operation::ALL {
            if op.capability() == Capability::ReadOnly {
                assert_ne!(op.descriptor().direction, Direction::Write, "{:?}", op);
            }
            if op.capability() == Capability::Global {
                assert!(!op.descriptor().address, "{:?}", op);
            }
        }
    }

    #[test]
    fn test_from_opcode() {
        for op in Operation::ALL {
            let decoded = Operation::from_opcode(op.opcode()).unwrap();
            if op == Operation::ReleaseDeepPowerDown {
                assert_eq!(decoded, Operation::ReadProductId);
            } else {
                assert_eq!(decoded, op);
            }
        }
        assert_eq!(Operation::from_opcode(0xFF), None);
    }

    #[test]
    fn test_shared_opcode_decodes_to_addressed_read() {
        let op = Operation::from_opcode(opcodes::RDPD).unwrap();
        assert_eq!(op, Operation::ReadProductId);
        assert!(op.descriptor().address);
        assert_eq!(op.descriptor().direction, Direction::Read);
    }

    #[test]
    fn test_fast_read_modes() {
        assert_eq!(FastReadMode::default().operation(), Operation::FastRead);
        assert_eq!(FastReadMode::QuadIo.operation().opcode(), opcodes::FRQIO);
        assert_eq!(FastReadMode::DualOutput.operation().opcode(), opcodes::FRDO);
    }
}
