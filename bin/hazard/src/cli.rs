//! Contains the hazard CLI.

use crate::{
    commands::{CheckCommand, VerifyCommand},
    snapshot, telemetry,
};
use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// Subcommands for the CLI.
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Checks a set of hazard blocks for cyclic same-timestamp dependencies.
    Check(CheckCommand),
    /// Verifies the blocks after the cross-unsafe head of a chain.
    Verify(VerifyCommand),
}

/// The hazard CLI.
#[derive(Parser, Clone, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (0-3)
    #[arg(long, short, global = true, action = ArgAction::Count)]
    pub v: u8,
    /// Path to the JSON chain data snapshot.
    #[arg(long, short = 's', env = "KONA_HAZARD_SNAPSHOT")]
    pub snapshot: PathBuf,
    /// The subcommand to run.
    #[command(subcommand)]
    pub subcommand: Commands,
}

impl Cli {
    /// Runs the CLI.
    pub fn run(self) -> Result<()> {
        telemetry::init_tracing_subscriber(self.v)?;
        let chain_data = snapshot::load(&self.snapshot)?;

        match self.subcommand {
            Commands::Check(check) => check.run(&chain_data),
            Commands::Verify(verify) => verify.run(&chain_data),
        }
    }
}
