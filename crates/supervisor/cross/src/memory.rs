//! An in-memory chain data source, loadable from a JSON snapshot.

use crate::{ChainDataError, CrossUnsafeDeps, CycleCheckDeps, OpenedBlock, UnsafeStartDeps};
use alloy_primitives::{B256, ChainId};
use kona_supervisor_types::{BlockNumHash, BlockSeal, DependencySet, ExecutingMessage};
use serde::{Deserialize, Serialize};
use std::{
    collections::{BTreeMap, HashMap},
    sync::RwLock,
};
use tracing::debug;

/// A locally indexed block: its seal, the hashes of its logs, and the executing messages among
/// them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredBlock {
    /// The seal of the block.
    pub seal: BlockSeal,
    /// The hashes of all logs of the block, in order.
    #[serde(default)]
    pub logs: Vec<B256>,
    /// The executing messages of the block, keyed by log index.
    #[serde(default)]
    pub executing_messages: BTreeMap<u32, ExecutingMessage>,
}

impl StoredBlock {
    fn log_count(&self) -> u32 {
        u32::try_from(self.logs.len()).unwrap_or(u32::MAX)
    }
}

/// The indexed data of a single chain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainSnapshot {
    /// The local-unsafe blocks of the chain.
    #[serde(default)]
    pub blocks: Vec<StoredBlock>,
    /// The number of the cross-unsafe head, if any.
    #[serde(default)]
    pub cross_unsafe: Option<u64>,
}

/// A serializable view of the chain data of every chain in a dependency set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainDataSnapshot {
    /// The dependency set the chains belong to.
    pub dependency_set: DependencySet,
    /// The data per chain.
    #[serde(default)]
    pub chains: HashMap<ChainId, ChainSnapshot>,
}

/// Chain data held in memory.
///
/// Blocks are immutable once inserted. Cross-unsafe heads sit behind a lock, so checks can run
/// against a shared reference.
#[derive(Debug, Default)]
pub struct InMemoryChainData {
    dependency_set: DependencySet,
    chains: HashMap<ChainId, BTreeMap<u64, StoredBlock>>,
    cross_unsafe: RwLock<HashMap<ChainId, BlockSeal>>,
}

impl InMemoryChainData {
    /// Creates an empty store tracking every chain of `dependency_set`.
    ///
    /// Fails with [`ChainDataError::InvalidDependencySet`] if two chains share an index, since
    /// executing messages could then not be attributed to a single source chain.
    pub fn new(dependency_set: DependencySet) -> Result<Self, ChainDataError> {
        dependency_set.validate()?;
        let chains = dependency_set
            .chain_ids()
            .into_iter()
            .map(|chain_id| (chain_id, BTreeMap::new()))
            .collect();
        Ok(Self { dependency_set, chains, cross_unsafe: RwLock::default() })
    }

    /// Loads a store from a [`ChainDataSnapshot`].
    pub fn from_snapshot(snapshot: ChainDataSnapshot) -> Result<Self, ChainDataError> {
        let mut store = Self::new(snapshot.dependency_set)?;

        for (chain_id, chain) in snapshot.chains {
            for block in chain.blocks {
                store.insert_block(chain_id, block)?;
            }
            if let Some(number) = chain.cross_unsafe {
                let seal = store.stored_block(chain_id, number)?.seal;
                store.set_cross_unsafe(chain_id, seal)?;
            }
        }

        Ok(store)
    }

    /// Returns the dependency set of the store.
    pub const fn dependency_set(&self) -> &DependencySet {
        &self.dependency_set
    }

    /// Indexes `block` on `chain_id`.
    ///
    /// Re-inserting an identical block is a no-op; a different block at the same height is a
    /// [`ChainDataError::Conflict`].
    pub fn insert_block(
        &mut self,
        chain_id: ChainId,
        block: StoredBlock,
    ) -> Result<(), ChainDataError> {
        let blocks =
            self.chains.get_mut(&chain_id).ok_or(ChainDataError::UnknownChain(chain_id))?;

        if let Some(existing) = blocks.get(&block.seal.number) {
            if *existing != block {
                return Err(ChainDataError::Conflict(format!(
                    "chain {chain_id} already has {} at height {}, cannot insert {}",
                    existing.seal, block.seal.number, block.seal
                )));
            }
            return Ok(());
        }

        blocks.insert(block.seal.number, block);
        Ok(())
    }

    /// Sets the cross-unsafe head of `chain_id` without any checks beyond the block being known.
    pub fn set_cross_unsafe(
        &self,
        chain_id: ChainId,
        seal: BlockSeal,
    ) -> Result<(), ChainDataError> {
        self.ensure_stored(chain_id, &seal)?;
        self.write_heads()?.insert(chain_id, seal);
        Ok(())
    }

    fn stored_block(&self, chain_id: ChainId, number: u64) -> Result<&StoredBlock, ChainDataError> {
        self.chains
            .get(&chain_id)
            .ok_or(ChainDataError::UnknownChain(chain_id))?
            .get(&number)
            .ok_or(ChainDataError::BlockNotFound { chain_id, block_number: number })
    }

    fn ensure_stored(&self, chain_id: ChainId, seal: &BlockSeal) -> Result<(), ChainDataError> {
        let stored = self.stored_block(chain_id, seal.number)?;
        if stored.seal != *seal {
            return Err(ChainDataError::Conflict(format!(
                "chain {chain_id} has {} at height {}, not {seal}",
                stored.seal, seal.number
            )));
        }
        Ok(())
    }

    fn read_heads(
        &self,
    ) -> Result<std::sync::RwLockReadGuard<'_, HashMap<ChainId, BlockSeal>>, ChainDataError> {
        self.cross_unsafe.read().map_err(|err| ChainDataError::Unavailable(err.to_string()))
    }

    fn write_heads(
        &self,
    ) -> Result<std::sync::RwLockWriteGuard<'_, HashMap<ChainId, BlockSeal>>, ChainDataError> {
        self.cross_unsafe.write().map_err(|err| ChainDataError::Unavailable(err.to_string()))
    }
}

impl CycleCheckDeps for InMemoryChainData {
    fn open_block(
        &self,
        chain_id: ChainId,
        block_number: u64,
    ) -> Result<OpenedBlock, ChainDataError> {
        let block = self.stored_block(chain_id, block_number)?;
        Ok(OpenedBlock {
            seal: block.seal,
            log_count: block.log_count(),
            executing_messages: block.executing_messages.clone(),
        })
    }
}

impl UnsafeStartDeps for InMemoryChainData {
    fn check(
        &self,
        chain_id: ChainId,
        block_number: u64,
        log_index: u32,
        log_hash: B256,
    ) -> Result<BlockSeal, ChainDataError> {
        let block = self.stored_block(chain_id, block_number)?;
        let actual = block
            .logs
            .get(log_index as usize)
            .ok_or(ChainDataError::LogNotFound { chain_id, block_number, log_index })?;

        if *actual != log_hash {
            return Err(ChainDataError::LogHashMismatch {
                chain_id,
                block_number,
                log_index,
                expected: log_hash,
                actual: *actual,
            });
        }

        Ok(block.seal)
    }

    fn is_cross_unsafe(
        &self,
        chain_id: ChainId,
        block: BlockNumHash,
    ) -> Result<(), ChainDataError> {
        let head = self.cross_unsafe(chain_id)?;
        let stored = self.stored_block(chain_id, block.number)?;

        if block.number > head.number || stored.seal.hash != block.hash {
            return Err(ChainDataError::NotCrossUnsafe {
                chain_id,
                block_number: block.number,
                block_hash: block.hash,
            });
        }

        Ok(())
    }
}

impl CrossUnsafeDeps for InMemoryChainData {
    fn cross_unsafe(&self, chain_id: ChainId) -> Result<BlockSeal, ChainDataError> {
        if !self.chains.contains_key(&chain_id) {
            return Err(ChainDataError::UnknownChain(chain_id));
        }
        self.read_heads()?
            .get(&chain_id)
            .copied()
            .ok_or(ChainDataError::NoCrossUnsafeHead(chain_id))
    }

    fn update_cross_unsafe(
        &self,
        chain_id: ChainId,
        block: BlockSeal,
    ) -> Result<(), ChainDataError> {
        self.ensure_stored(chain_id, &block)?;

        let mut heads = self.write_heads()?;
        if let Some(current) = heads.get(&chain_id) {
            if block.number < current.number {
                return Err(ChainDataError::Conflict(format!(
                    "cross-unsafe head of chain {chain_id} cannot move back from {current} to \
                     {block}"
                )));
            }
        }

        debug!(
            target: "supervisor::cross",
            chain_id,
            block_number = block.number,
            block_hash = %block.hash,
            "Updated cross-unsafe head"
        );
        heads.insert(chain_id, block);
        Ok(())
    }
}
