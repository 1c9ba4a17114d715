//! Cross-chain dependency checks for the interop supervisor.
//!
//! A block can only become cross-unsafe once every message it executes is known to be backed by
//! an initiating log that is itself safe to depend on. Messages initiated at an earlier timestamp
//! are ordered by time alone, so it is enough to see that their block is already cross-unsafe.
//! Messages initiated at the *same* timestamp carry no such guarantee: the blocks involved form a
//! hazard set, and their logs have to be checked jointly for cyclic dependencies.
//!
//! - [`CrossUnsafeHazards`] classifies the executing messages of a candidate block and collects
//!   the [`HazardSet`].
//! - [`HazardCycleChecker`] builds a [`HazardGraph`] over the logs of the hazard blocks and runs a
//!   topological reduction on it.
//! - [`CrossUnsafeUpdater`] ties both together to advance the cross-unsafe head of a chain by one
//!   block.

mod error;
pub use error::{ChainDataError, CrossUnsafeError, CycleError, HazardError};

mod traits;
pub use traits::{CrossUnsafeDeps, CycleCheckDeps, OpenedBlock, UnsafeStartDeps};
#[cfg(test)]
pub(crate) use traits::{MockCycleCheckDeps, MockUnsafeStartDeps};

mod graph;
pub use graph::{HazardGraph, MsgKey};

mod diagram;
pub use diagram::MermaidDiagram;

mod cycle;
pub use cycle::HazardCycleChecker;

mod hazards;
pub use hazards::{CrossUnsafeHazards, HazardSet};

mod update;
pub use update::CrossUnsafeUpdater;

mod memory;
pub use memory::{ChainDataSnapshot, ChainSnapshot, InMemoryChainData, StoredBlock};

#[cfg(test)]
pub(crate) mod test_utils;
