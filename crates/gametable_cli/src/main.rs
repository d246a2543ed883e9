//! gametable CLI
//!
//! Command-line tools for gametable table files.
//!
//! # Commands
//!
//! - `dump` - Decode a table and print its contents
//! - `verify` - Check that a table decodes and survives a re-encode
//! - `reencode` - Rewrite a table in canonical layout
//! - `ident` - Show the projections of a 4-character identifier

mod commands;

use clap::{Parser, Subcommand};
use gametable_tables::TableKind;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// gametable command-line table tools.
#[derive(Parser)]
#[command(name = "gametable")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a table and print its contents
    Dump {
        /// Table file
        file: PathBuf,

        /// Table type (cinematic, conversation)
        #[arg(short, long)]
        table: TableKind,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Check that a table decodes and survives a re-encode
    Verify {
        /// Table file
        file: PathBuf,

        /// Table type (cinematic, conversation)
        #[arg(short, long)]
        table: TableKind,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Rewrite a table in canonical layout
    Reencode {
        /// Table file
        file: PathBuf,

        /// Table type (cinematic, conversation)
        #[arg(short, long)]
        table: TableKind,

        /// Destination file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Show the numeric, byte and character views of an identifier
    Ident {
        /// `0x`-prefixed hex, decimal, or up to 4 characters
        value: String,

        /// Treat the value as characters even if it looks numeric
        #[arg(short, long)]
        chars: bool,
    },

    /// Show version information
    Version,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Dump {
            file,
            table,
            format,
        } => {
            commands::dump::run(&file, table, &format)?;
        }
        Commands::Verify {
            file,
            table,
            format,
        } => {
            commands::verify::run(&file, table, &format)?;
        }
        Commands::Reencode {
            file,
            table,
            output,
        } => {
            commands::reencode::run(&file, table, &output)?;
        }
        Commands::Ident { value, chars } => {
            commands::ident::run(&value, chars)?;
        }
        Commands::Version => {
            println!("gametable CLI v{}", env!("CARGO_PKG_VERSION"));
            let kinds: Vec<&str> = TableKind::ALL.iter().map(|k| k.name()).collect();
            println!("Tables: {}", kinds.join(", "));
        }
    }

    Ok(())
}
