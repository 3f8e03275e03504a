//! CLI argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Parse a string as a hex or decimal u32
fn parse_hex_u32(s: &str) -> Result<u32, String> {
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u32::from_str_radix(hex, 16).map_err(|e| format!("Invalid hex value: {}", e))
    } else {
        s.parse::<u32>().map_err(|e| format!("Invalid number: {}", e))
    }
}

#[derive(Parser)]
#[command(name = "spinor")]
#[command(author, version, about = "SPI NOR flash tool", long_about = None)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Image file backing the emulated chip (loaded if present, saved after changes)
    #[arg(long, global = true)]
    pub image: Option<PathBuf>,

    /// Chip size in bytes (hex with 0x prefix or decimal)
    #[arg(long, global = true, default_value = "0x1000000", value_parser = parse_hex_u32)]
    pub size: u32,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show JEDEC, product, manufacturer/device and unique IDs
    Id,

    /// Show status and function registers
    Status,

    /// Read a range of flash
    Read {
        /// Start address (hex with 0x prefix or decimal)
        #[arg(long, value_parser = parse_hex_u32)]
        addr: u32,

        /// Number of bytes to read
        #[arg(long, value_parser = parse_hex_u32)]
        len: u32,

        /// Use the fast read instruction (with dummy byte)
        #[arg(long)]
        fast: bool,

        /// Output file (hex dump to stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Program a file into flash (target must be erased)
    Write {
        /// Start address (hex with 0x prefix or decimal)
        #[arg(long, value_parser = parse_hex_u32)]
        addr: u32,

        /// Input file path
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Erase a sector, block or the whole chip
    #[command(subcommand)]
    Erase(EraseCommands),

    /// Show the SFDP header and parameter tables
    Sfdp,

    /// Information row operations
    #[command(subcommand)]
    InfoRow(InfoRowCommands),

    /// Software reset (reset-enable followed by reset)
    Reset,
}

impl Commands {
    /// Whether the command can change the flash array
    pub fn modifies_flash(&self) -> bool {
        matches!(self, Self::Write { .. } | Self::Erase(_))
    }
}

#[derive(Subcommand)]
pub enum EraseCommands {
    /// Erase one 4KB sector
    Sector {
        /// Sector index
        #[arg(value_parser = parse_hex_u32)]
        index: u32,
    },

    /// Erase one 32KB block
    Block32 {
        /// Block index
        #[arg(value_parser = parse_hex_u32)]
        index: u32,
    },

    /// Erase one 64KB block
    Block64 {
        /// Block index
        #[arg(value_parser = parse_hex_u32)]
        index: u32,
    },

    /// Erase the entire chip
    Chip,
}

#[derive(Subcommand)]
pub enum InfoRowCommands {
    /// Dump one information row
    Read {
        /// Row number
        #[arg(value_parser = clap::value_parser!(u8).range(0..4))]
        row: u8,
    },

    /// Program one information row from a file
    Write {
        /// Row number
        #[arg(value_parser = clap::value_parser!(u8).range(0..4))]
        row: u8,

        /// Input file path (at most 256 bytes)
        #[arg(short, long)]
        input: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_u32() {
        assert_eq!(parse_hex_u32("0x1000"), Ok(0x1000));
        assert_eq!(parse_hex_u32("0XFF"), Ok(0xFF));
        assert_eq!(parse_hex_u32("4096"), Ok(4096));
        assert!(parse_hex_u32("0xZZ").is_err());
        assert!(parse_hex_u32("").is_err());
    }

    #[test]
    fn test_cli_parses_commands() {
        let cli = Cli::parse_from(["spinor", "-vv", "read", "--addr", "0x100", "--len", "16", "--fast"]);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.size, 0x100_0000);
        assert!(matches!(
            cli.command,
            Commands::Read { addr: 0x100, len: 16, fast: true, output: None }
        ));

        let cli = Cli::parse_from(["spinor", "--size", "0x10000", "erase", "block64", "1"]);
        assert_eq!(cli.size, 0x10000);
        assert!(cli.command.modifies_flash());
        assert!(matches!(cli.command, Commands::Erase(EraseCommands::Block64 { index: 1 })));

        let cli = Cli::parse_from(["spinor", "info-row", "read", "2"]);
        assert!(!cli.command.modifies_flash());
        assert!(matches!(cli.command, Commands::InfoRow(InfoRowCommands::Read { row: 2 })));

        assert!(Cli::try_parse_from(["spinor", "info-row", "read", "4"]).is_err());
    }
}
