//! The intra-timestamp hazard-cycle check.

use crate::{CycleCheckDeps, CycleError, HazardGraph, HazardSet};
use derive_more::Constructor;
use kona_supervisor_types::ChainIndexResolver;
use tracing::{trace, warn};

/// Checks the blocks of a [`HazardSet`] for cyclic dependencies between their logs.
///
/// Messages initiated at the same timestamp as they are executed carry no ordering guarantee of
/// their own. The checker builds the [`HazardGraph`] of the hazard blocks and reduces it
/// topologically: if every log can be ordered, the hazard set is free of cycles.
#[derive(Debug, Constructor)]
pub struct HazardCycleChecker<'a, D, R> {
    deps: &'a D,
    resolver: &'a R,
}

impl<D, R> HazardCycleChecker<'_, D, R>
where
    D: CycleCheckDeps,
    R: ChainIndexResolver,
{
    /// Checks the `hazards` blocks for cycles among the messages executed at `timestamp`.
    pub fn check(&self, timestamp: u64, hazards: &HazardSet) -> Result<(), CycleError> {
        if hazards.is_empty() {
            return Ok(());
        }

        let mut graph = HazardGraph::build(self.deps, self.resolver, timestamp, hazards)?;

        if let Err(err) = graph.check_for_cycle() {
            warn!(
                target: "supervisor::cross",
                timestamp,
                %err,
                diagram = %graph.mermaid(),
                "Found cycle; remaining sub-graph"
            );
            return Err(err);
        }

        trace!(target: "supervisor::cross", timestamp, hazards = hazards.len(), "No cycle found");
        Ok(())
    }
}
