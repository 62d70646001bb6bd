// src/cli.rs

use clap::Parser;
use std::path::PathBuf;

/// Mip-Table Validation
#[derive(Debug, Parser)]
#[command(name = "mipcheck")]
pub struct Args {
    /// Directory holding the table JSON files
    #[arg(long, default_value = "../Tables")]
    pub tables_dir: PathBuf,

    /// Check dimensions
    #[arg(long)]
    pub check_dimensions: bool,

    /// Check units
    #[arg(long)]
    pub check_units: bool,

    /// Print the number of variables per table
    #[arg(long)]
    pub report_statistics: bool,

    /// Check if a variable exists in multiple tables
    #[arg(long)]
    pub multitable: bool,

    /// Check conformity of individual variable entries (reserved, no reporter wired yet)
    #[arg(long)]
    pub duplicates: bool,
}
