//! Advancing the cross-unsafe head of a chain.

use crate::{
    ChainDataError, CrossUnsafeDeps, CrossUnsafeError, CrossUnsafeHazards, HazardCycleChecker,
    HazardError,
};
use alloy_primitives::ChainId;
use derive_more::Constructor;
use kona_supervisor_types::{BlockSeal, ChainIndexResolver};
use tracing::{debug, info};

/// Promotes the local-unsafe block after the cross-unsafe head of a chain to cross-unsafe, once
/// its cross-chain dependencies check out.
#[derive(Debug, Constructor)]
pub struct CrossUnsafeUpdater<'a, D, R> {
    deps: &'a D,
    resolver: &'a R,
}

impl<D, R> CrossUnsafeUpdater<'_, D, R>
where
    D: CrossUnsafeDeps,
    R: ChainIndexResolver,
{
    /// Tries to advance the cross-unsafe head of `chain_id` by one block.
    ///
    /// Returns the new head, or `None` if there is no local-unsafe block past the current head
    /// yet. On error the head is left untouched.
    pub fn update(&self, chain_id: ChainId) -> Result<Option<BlockSeal>, CrossUnsafeError> {
        let chain_index = self
            .resolver
            .chain_index_for_id(chain_id)
            .ok_or(CrossUnsafeError::UnresolvedChainId(chain_id))?;

        let current = self.deps.cross_unsafe(chain_id)?;
        let candidate = match self.deps.open_block(chain_id, current.number + 1) {
            Ok(block) => block,
            Err(ChainDataError::BlockNotFound { .. }) => {
                debug!(
                    target: "supervisor::cross",
                    chain_id,
                    cross_unsafe = %current,
                    "No local-unsafe block past the cross-unsafe head"
                );
                return Ok(None);
            }
            Err(err) => return Err(err.into()),
        };
        let seal = candidate.seal;

        let mut hazards = CrossUnsafeHazards::new(self.deps, self.resolver).collect(
            chain_id,
            &seal,
            candidate.executing_messages.values(),
        )?;

        // The candidate's own logs are ordered against the messages it executes.
        hazards.record(chain_index, seal).map_err(|existing| HazardError::ConflictingHazard {
            chain_id,
            existing,
            found: seal,
        })?;

        HazardCycleChecker::new(self.deps, self.resolver).check(seal.timestamp, &hazards)?;

        self.deps.update_cross_unsafe(chain_id, seal)?;
        info!(
            target: "supervisor::cross",
            chain_id,
            block_number = seal.number,
            block_hash = %seal.hash,
            hazards = hazards.len(),
            "Promoted block to cross-unsafe"
        );

        Ok(Some(seal))
    }
}
