//! SPI NOR flash opcodes
//!
//! Instruction set of the ISSI IS25LP/IS25WP family and compatible parts.
//! Some erase and suspend opcodes have vendor alternates; the values below
//! are the ones this driver sends. Check the datasheet of your chip.

// ============================================================================
// Read commands - 3-byte address
// ============================================================================

/// Read Data (normal read, up to 33 MHz)
pub const RD: u8 = 0x03;
/// Fast Read (one dummy byte before data)
pub const FR: u8 = 0x0B;
/// Fast Read Dual I/O (1-2-2)
pub const FRDIO: u8 = 0xBB;
/// Fast Read Dual Output (1-1-2)
pub const FRDO: u8 = 0x3B;
/// Fast Read Quad I/O (1-4-4)
pub const FRQIO: u8 = 0xEB;
/// Fast Read Quad Output (1-1-4)
pub const FRQO: u8 = 0x6B;

// ============================================================================
// Page Program
// ============================================================================

/// Page Program
pub const PP: u8 = 0x02;
/// Quad Input Page Program (alternate: 0x38)
pub const PPQ: u8 = 0x32;

// ============================================================================
// Erase commands
// ============================================================================

/// Sector Erase 4KB (alternate: 0x20)
pub const SER: u8 = 0xD7;
/// Block Erase 32KB
pub const BER32: u8 = 0x52;
/// Block Erase 64KB
pub const BER64: u8 = 0xD8;
/// Chip Erase (alternate: 0x60)
pub const CER: u8 = 0xC7;

// ============================================================================
// Write control
// ============================================================================

/// Write Enable - sets WEL, required before program/erase/register writes
pub const WREN: u8 = 0x06;
/// Write Disable - clears WEL
pub const WRDI: u8 = 0x04;

// ============================================================================
// Register operations
// ============================================================================

/// Read Status Register
pub const RDSR: u8 = 0x05;
/// Write Status Register
pub const WRSR: u8 = 0x01;
/// Read Function Register
pub const RDFR: u8 = 0x48;
/// Write Function Register
pub const WRFR: u8 = 0x42;

// ============================================================================
// Power management
// ============================================================================

/// Deep Power Down
pub const DP: u8 = 0xB9;
/// Release from Deep Power Down (same opcode as RDID)
pub const RDPD: u8 = 0xAB;

// ============================================================================
// Identification
// ============================================================================

/// Read Manufacturer and Product ID
pub const RDID: u8 = 0xAB;
/// Read JEDEC ID (manufacturer, memory type, capacity)
pub const RDJDID: u8 = 0x9F;
/// Read Manufacturer and Device ID
pub const RDMDID: u8 = 0x90;
/// Read Unique ID Number
pub const RDUID: u8 = 0x4B;
/// Read SFDP (JEDEC JESD216)
pub const RDSFDP: u8 = 0x5A;

// ============================================================================
// Software Reset
// ============================================================================

/// Software Reset Enable
pub const RSTEN: u8 = 0x66;
/// Software Reset
pub const RST: u8 = 0x99;

// ============================================================================
// Information rows
// ============================================================================

/// Program Information Row
pub const IRP: u8 = 0x62;
/// Read Information Row
pub const IRRD: u8 = 0x68;

// ============================================================================
// Sector locking
// ============================================================================

/// Sector Unlock
pub const SECUNLOCK: u8 = 0x26;
/// Sector Lock
pub const SECLOCK: u8 = 0x24;

// ============================================================================
// Suspend/Resume
// ============================================================================

/// Program/Erase Suspend (alternate: 0xB0)
pub const PERSUS: u8 = 0x75;
/// Program/Erase Resume (alternate: 0x30)
pub const PERRSM: u8 = 0x7A;

// ============================================================================
// Geometry
// ============================================================================

/// Sector size (smallest erase unit)
pub const SECTOR_SIZE: u32 = 0x1000;
/// 32KB block size
pub const BLOCK_32K_SIZE: u32 = 0x8000;
/// 64KB block size
pub const BLOCK_64K_SIZE: u32 = 0x10000;
/// Page size (largest single page program)
pub const PAGE_SIZE: u32 = 256;
/// Unique ID length in bytes
pub const UID_LEN: usize = 16;
