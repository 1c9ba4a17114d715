//! Data-access traits the cross-chain checks are written against.

use crate::ChainDataError;
use alloy_primitives::{B256, ChainId};
use kona_supervisor_types::{BlockNumHash, BlockSeal, ExecutingMessage};
use std::collections::BTreeMap;

/// A block as seen by the cycle check: its seal, how many logs it holds, and the executing
/// messages among those logs keyed by log index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OpenedBlock {
    /// The seal of the opened block.
    pub seal: BlockSeal,
    /// The number of logs in the block.
    pub log_count: u32,
    /// The executing messages of the block, keyed by the log index they sit at.
    pub executing_messages: BTreeMap<u32, ExecutingMessage>,
}

/// Opens blocks for the hazard-cycle check.
#[cfg_attr(test, mockall::automock)]
pub trait CycleCheckDeps {
    /// Opens block `block_number` of `chain_id`.
    fn open_block(&self, chain_id: ChainId, block_number: u64)
    -> Result<OpenedBlock, ChainDataError>;
}

/// Verifies initiating messages for the hazard collector.
#[cfg_attr(test, mockall::automock)]
pub trait UnsafeStartDeps {
    /// Looks up the log at `log_index` of block `block_number` on `chain_id`, checks that its hash
    /// is `log_hash`, and returns the block that includes it.
    fn check(
        &self,
        chain_id: ChainId,
        block_number: u64,
        log_index: u32,
        log_hash: B256,
    ) -> Result<BlockSeal, ChainDataError>;

    /// Returns `Ok(())` if `block` of `chain_id` is cross-unsafe.
    fn is_cross_unsafe(&self, chain_id: ChainId, block: BlockNumHash)
    -> Result<(), ChainDataError>;
}

/// Everything needed to advance the cross-unsafe head of a chain.
pub trait CrossUnsafeDeps: CycleCheckDeps + UnsafeStartDeps {
    /// Returns the current cross-unsafe head of `chain_id`.
    fn cross_unsafe(&self, chain_id: ChainId) -> Result<BlockSeal, ChainDataError>;

    /// Records `block` as the new cross-unsafe head of `chain_id`.
    fn update_cross_unsafe(&self, chain_id: ChainId, block: BlockSeal)
    -> Result<(), ChainDataError>;
}
