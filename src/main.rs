//! spinor - SPI NOR flash tool
//!
//! Drives a chip through the `spinor-core` command framing driver. The chip
//! is the `spinor-dummy` emulator, backed by an image file so its contents
//! persist between invocations.
//!
//! The driver issues exactly the instruction it is asked for. This tool adds
//! the sequencing a real flashing session needs: write enable before every
//! state-changing instruction, status polling until the chip is idle again,
//! and page splitting for writes.

mod cli;
mod commands;
mod image;

use clap::Parser;
use cli::{Cli, Commands, InfoRowCommands};
use spinor_core::flash::{Line, Pins, SerialFlash};

/// Chip select on P0.4, write protect on P0.2, hold on P0.3
const PINS: Pins = Pins::new(Line::new(0, 4), Line::new(0, 2), Line::new(0, 3));

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    // Set log level based on verbosity
    match cli.verbose {
        0 => {} // default (info)
        1 => log::set_max_level(log::LevelFilter::Debug),
        _ => log::set_max_level(log::LevelFilter::Trace),
    }

    let chip = image::load(cli.image.as_deref(), cli.size as usize)?;
    let mut flash = SerialFlash::new(chip, PINS);

    let result = match &cli.command {
        Commands::Id => commands::run_id(&mut flash),
        Commands::Status => commands::run_status(&mut flash),
        Commands::Read {
            addr,
            len,
            fast,
            output,
        } => commands::run_read(&mut flash, *addr, *len, *fast, output.as_deref()),
        Commands::Write { addr, input } => commands::run_write(&mut flash, cli.size, *addr, input),
        Commands::Erase(target) => commands::run_erase(&mut flash, cli.size, target),
        Commands::Sfdp => commands::run_sfdp(&mut flash),
        Commands::InfoRow(subcmd) => match subcmd {
            InfoRowCommands::Read { row } => commands::run_info_row_read(&mut flash, *row),
            InfoRowCommands::Write { row, input } => {
                commands::run_info_row_write(&mut flash, *row, input)
            }
        },
        Commands::Reset => commands::run_reset(&mut flash),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    if cli.command.modifies_flash() {
        match &cli.image {
            Some(path) => image::save(path, flash.transport())?,
            None => log::warn!("No --image given, changes are discarded"),
        }
    }

    Ok(())
}
