//! Fixtures shared by the unit tests.

use crate::{InMemoryChainData, StoredBlock};
use alloy_primitives::{B256, ChainId};
use kona_supervisor_types::{BlockSeal, ChainIndex, DependencySet, ExecutingMessage};
use std::collections::BTreeMap;

pub(crate) const CHAIN_A: ChainId = 900;
pub(crate) const CHAIN_B: ChainId = 901;
pub(crate) const CHAIN_C: ChainId = 902;

/// A dependency set with [`CHAIN_A`], [`CHAIN_B`] and [`CHAIN_C`] at indices 0, 1 and 2.
pub(crate) fn depset() -> DependencySet {
    DependencySet::default()
        .with_chain(CHAIN_A, ChainIndex(0))
        .with_chain(CHAIN_B, ChainIndex(1))
        .with_chain(CHAIN_C, ChainIndex(2))
}

pub(crate) fn seal(hash: u8, number: u64, timestamp: u64) -> BlockSeal {
    BlockSeal::new(B256::with_last_byte(hash), number, timestamp)
}

pub(crate) fn log_hash(log_index: u32) -> B256 {
    B256::with_last_byte(log_index as u8 + 1)
}

/// Builds [`StoredBlock`]s with their executing messages.
#[derive(Debug)]
pub(crate) struct BlockBuilder {
    block: StoredBlock,
}

impl BlockBuilder {
    /// Starts a block with `log_count` plain logs.
    pub(crate) fn new(seal: BlockSeal, log_count: u32) -> Self {
        let logs = (0..log_count).map(log_hash).collect();
        Self { block: StoredBlock { seal, logs, executing_messages: BTreeMap::new() } }
    }

    /// Turns log `log_index` into a message executing log `init_log` of block `init_block` on
    /// chain `init_chain`, initiated at `timestamp`.
    pub(crate) fn exec(
        mut self,
        log_index: u32,
        init_chain: u32,
        init_block: u64,
        init_log: u32,
        timestamp: u64,
    ) -> Self {
        self.block.executing_messages.insert(
            log_index,
            ExecutingMessage {
                chain_index: ChainIndex(init_chain),
                block_number: init_block,
                log_index: init_log,
                hash: log_hash(init_log),
                timestamp,
            },
        );
        self
    }

    pub(crate) fn build(self) -> StoredBlock {
        self.block
    }
}

/// Builds a store over [`depset`] holding `blocks`.
pub(crate) fn store_with(
    blocks: impl IntoIterator<Item = (ChainId, StoredBlock)>,
) -> InMemoryChainData {
    let mut store = InMemoryChainData::new(depset()).expect("valid dependency set");
    for (chain_id, block) in blocks {
        store.insert_block(chain_id, block).expect("conflicting test block");
    }
    store
}
