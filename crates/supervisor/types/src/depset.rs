//! The dependency set and chain index resolution.

use crate::ChainIndex;
use alloy_primitives::ChainId;
use auto_impl::auto_impl;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Translates between compact [`ChainIndex`]es and [`ChainId`]s.
///
/// Executing messages only carry the index of their source chain, while chain data is looked up
/// by chain ID. The mapping is owned by whoever configures the dependency set, so it is injected
/// wherever a translation is needed.
#[auto_impl(&, Box, Arc)]
pub trait ChainIndexResolver {
    /// Returns the chain ID assigned to `index`, if any.
    fn chain_id_for_index(&self, index: ChainIndex) -> Option<ChainId>;

    /// Returns the index assigned to `chain_id`, if any.
    fn chain_index_for_id(&self, chain_id: ChainId) -> Option<ChainIndex>;
}

/// Configuration for a dependency of a chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainDependency {
    /// chain_index is the unique short identifier for this chain
    pub chain_index: ChainIndex,
}

/// Configuration for the dependency set
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencySet {
    /// dependencies information per chain
    pub dependencies: HashMap<ChainId, ChainDependency>,

    /// Override message expiry window to use for this dependency set.
    #[serde(default)]
    pub override_message_expiry_window: u64,
}

/// An invalid [`DependencySet`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DependencySetError {
    /// Two chains share the same index.
    #[error("chain index {index} is assigned to both chain {first} and chain {second}")]
    DuplicateChainIndex {
        /// The shared index.
        index: ChainIndex,
        /// The lower chain ID.
        first: ChainId,
        /// The higher chain ID.
        second: ChainId,
    },
}

impl DependencySet {
    /// Adds `chain_id` to the set under `chain_index`.
    pub fn with_chain(mut self, chain_id: ChainId, chain_index: ChainIndex) -> Self {
        self.dependencies.insert(chain_id, ChainDependency { chain_index });
        self
    }

    /// Returns the chain IDs in the set, in ascending order.
    pub fn chain_ids(&self) -> Vec<ChainId> {
        let mut ids: Vec<_> = self.dependencies.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Checks that every chain has a distinct index.
    pub fn validate(&self) -> Result<(), DependencySetError> {
        let mut seen: HashMap<ChainIndex, ChainId> = HashMap::new();
        for chain_id in self.chain_ids() {
            let index = self.dependencies[&chain_id].chain_index;
            if let Some(first) = seen.insert(index, chain_id) {
                return Err(DependencySetError::DuplicateChainIndex {
                    index,
                    first,
                    second: chain_id,
                });
            }
        }
        Ok(())
    }
}

impl ChainIndexResolver for DependencySet {
    fn chain_id_for_index(&self, index: ChainIndex) -> Option<ChainId> {
        self.dependencies
            .iter()
            .find_map(|(chain_id, dep)| (dep.chain_index == index).then_some(*chain_id))
    }

    fn chain_index_for_id(&self, chain_id: ChainId) -> Option<ChainIndex> {
        self.dependencies.get(&chain_id).map(|dep| dep.chain_index)
    }
}
