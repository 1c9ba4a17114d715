//! Subcommands of the hazard CLI.

mod check;
pub use check::{CheckCommand, HazardArg};

mod verify;
pub use verify::VerifyCommand;
