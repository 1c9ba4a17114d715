//! Collection of the hazard blocks a candidate block depends on.

use crate::{HazardError, UnsafeStartDeps};
use alloy_primitives::ChainId;
use derive_more::Constructor;
use kona_supervisor_types::{BlockSeal, ChainIndex, ChainIndexResolver, ExecutingMessage};
use std::{cmp::Ordering, collections::BTreeMap};
use tracing::trace;

/// The blocks that have to be checked jointly for cyclic dependencies, at most one per chain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HazardSet {
    blocks: BTreeMap<ChainIndex, BlockSeal>,
}

impl HazardSet {
    /// Creates an empty [`HazardSet`].
    pub const fn new() -> Self {
        Self { blocks: BTreeMap::new() }
    }

    /// Records `block` as the hazard block of `chain_index`.
    ///
    /// Recording the same block twice is a no-op. If a different block is already recorded for
    /// the chain, the set is left unchanged and that block is returned as the error.
    pub fn record(&mut self, chain_index: ChainIndex, block: BlockSeal) -> Result<(), BlockSeal> {
        match self.blocks.get(&chain_index) {
            Some(existing) if *existing != block => Err(*existing),
            Some(_) => Ok(()),
            None => {
                self.blocks.insert(chain_index, block);
                Ok(())
            }
        }
    }

    /// Returns the hazard block of `chain_index`.
    pub fn get(&self, chain_index: ChainIndex) -> Option<&BlockSeal> {
        self.blocks.get(&chain_index)
    }

    /// Returns the number of hazard blocks.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Returns true if there are no hazard blocks.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Iterates over the hazard blocks in chain index order.
    pub fn iter(&self) -> impl Iterator<Item = (ChainIndex, &BlockSeal)> {
        self.blocks.iter().map(|(index, seal)| (*index, seal))
    }
}

impl FromIterator<(ChainIndex, BlockSeal)> for HazardSet {
    fn from_iter<T: IntoIterator<Item = (ChainIndex, BlockSeal)>>(iter: T) -> Self {
        Self { blocks: iter.into_iter().collect() }
    }
}

/// Classifies the executing messages of a candidate block and collects its [`HazardSet`].
#[derive(Debug, Constructor)]
pub struct CrossUnsafeHazards<'a, D, R> {
    deps: &'a D,
    resolver: &'a R,
}

impl<D, R> CrossUnsafeHazards<'_, D, R>
where
    D: UnsafeStartDeps,
    R: ChainIndexResolver,
{
    /// Checks that all `messages` of `candidate` on `chain_id` exist and respect the timestamp
    /// invariant, and returns the blocks they depend on at the candidate's own timestamp.
    ///
    /// - Messages initiated before the candidate are ordered by time; the block including the
    ///   initiating log has to be cross-unsafe already.
    /// - Messages initiated at the candidate's timestamp may depend on each other in any order;
    ///   the block including the initiating log becomes a hazard block.
    /// - Messages initiated after the candidate are invalid.
    pub fn collect<'m, I>(
        &self,
        chain_id: ChainId,
        candidate: &BlockSeal,
        messages: I,
    ) -> Result<HazardSet, HazardError>
    where
        I: IntoIterator<Item = &'m ExecutingMessage>,
    {
        let mut hazards = HazardSet::new();

        for message in messages {
            let init_chain_id = self
                .resolver
                .chain_id_for_index(message.chain_index)
                .ok_or(HazardError::UnresolvedChainIndex(message.chain_index))?;

            match message.timestamp.cmp(&candidate.timestamp) {
                Ordering::Less => {
                    let included_in = self.included_in(init_chain_id, message)?;
                    self.deps.is_cross_unsafe(init_chain_id, included_in.id()).map_err(
                        |source| HazardError::DependencyNotCrossUnsafe {
                            chain_id: init_chain_id,
                            block: included_in,
                            source,
                        },
                    )?;
                }
                Ordering::Equal => {
                    // The initiating block may itself still be waiting on this chain, so it is
                    // only required to be local-unsafe and joins the hazard set.
                    let included_in = self.included_in(init_chain_id, message)?;
                    hazards.record(message.chain_index, included_in).map_err(|existing| {
                        HazardError::ConflictingHazard {
                            chain_id: init_chain_id,
                            existing,
                            found: included_in,
                        }
                    })?;
                }
                Ordering::Greater => {
                    return Err(HazardError::TimestampInvariantViolation {
                        message: *message,
                        candidate: *candidate,
                    });
                }
            }
        }

        trace!(
            target: "supervisor::cross",
            chain_id,
            candidate = %candidate,
            hazards = hazards.len(),
            "Collected cross-unsafe hazards"
        );

        Ok(hazards)
    }

    fn included_in(
        &self,
        chain_id: ChainId,
        message: &ExecutingMessage,
    ) -> Result<BlockSeal, HazardError> {
        self.deps
            .check(chain_id, message.block_number, message.log_index, message.hash)
            .map_err(|source| HazardError::MessageCheck { message: *message, source })
    }
}
