//! Loading chain data snapshots.

use anyhow::{Context as _, Result};
use kona_supervisor_cross::{ChainDataSnapshot, InMemoryChainData};
use std::{fs, path::Path};

/// Loads an [`InMemoryChainData`] from the JSON [`ChainDataSnapshot`] at `path`.
pub fn load(path: &Path) -> Result<InMemoryChainData> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read snapshot file '{}'", path.display()))?;

    let snapshot: ChainDataSnapshot = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse JSON from snapshot file '{}'", path.display()))?;

    snapshot
        .dependency_set
        .validate()
        .with_context(|| format!("Invalid dependency set in snapshot file '{}'", path.display()))?;

    InMemoryChainData::from_snapshot(snapshot)
        .with_context(|| format!("Inconsistent chain data in snapshot file '{}'", path.display()))
}
