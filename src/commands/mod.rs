//! Command-line interface of calsum.
//!
//! - **`report`**: summarize calendar events into a spreadsheet
//! - **`init`**: interactive setup of report defaults

pub mod init;
pub mod report;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Configuration initialization")]
    Init(init::InitArgs),
    #[command(about = "Summarize calendar events into a spreadsheet report")]
    Report(report::ReportArgs),
}

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help(true))]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub fn menu() -> Result<()> {
        let cli = Self::parse();
        match cli.command {
            Commands::Init(args) => init::cmd(args),
            Commands::Report(args) => report::cmd(args),
        }
    }
}
