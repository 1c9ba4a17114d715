//! Block identities and head references.

use alloy_eips::eip1898::BlockNumHash;
use alloy_primitives::B256;
use core::fmt;
use derive_more::Constructor;
use serde::{Deserialize, Serialize};

/// The immutable identity of a sealed block.
///
/// Two seals are equal only if hash, number and timestamp all match.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Constructor, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub struct BlockSeal {
    /// The block hash.
    pub hash: B256,
    /// The block number.
    pub number: u64,
    /// The block timestamp.
    pub timestamp: u64,
}

impl BlockSeal {
    /// Returns the [`BlockNumHash`] of the sealed block.
    pub const fn id(&self) -> BlockNumHash {
        BlockNumHash { number: self.number, hash: self.hash }
    }
}

impl fmt::Display for BlockSeal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BlockSeal(hash:{}, number:{}, time:{})", self.hash, self.number, self.timestamp)
    }
}

/// A reference to a block, with parent linkage.
///
/// Used for L1 blocks, and as the inner block of an [`L2BlockInfo`].
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Constructor, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub struct BlockInfo {
    /// The block hash.
    pub hash: B256,
    /// The block number.
    pub number: u64,
    /// The parent block hash.
    pub parent_hash: B256,
    /// The block timestamp.
    pub timestamp: u64,
}

impl BlockInfo {
    /// Returns the [`BlockNumHash`] of the block.
    pub const fn id(&self) -> BlockNumHash {
        BlockNumHash { number: self.number, hash: self.hash }
    }

    /// Returns the [`BlockSeal`] of the block.
    pub const fn seal(&self) -> BlockSeal {
        BlockSeal { hash: self.hash, number: self.number, timestamp: self.timestamp }
    }
}

impl fmt::Display for BlockInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "BlockInfo {{ hash: {}, number: {}, parent_hash: {}, timestamp: {} }}",
            self.hash, self.number, self.parent_hash, self.timestamp
        )
    }
}

/// A reference to an L2 block, with the L1 block it was derived from or sequenced against.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Constructor, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub struct L2BlockInfo {
    /// The base [`BlockInfo`].
    #[serde(flatten)]
    pub block_info: BlockInfo,
    /// The L1 origin [`BlockNumHash`].
    pub l1_origin: BlockNumHash,
    /// The sequence number of the L2 block within its epoch.
    pub seq_num: u64,
}

impl L2BlockInfo {
    /// Returns the block hash.
    pub const fn hash(&self) -> B256 {
        self.block_info.hash
    }

    /// Returns the block number.
    pub const fn number(&self) -> u64 {
        self.block_info.number
    }

    /// Returns the block timestamp.
    pub const fn timestamp(&self) -> u64 {
        self.block_info.timestamp
    }

    /// Returns the [`BlockNumHash`] of the block.
    pub const fn id(&self) -> BlockNumHash {
        self.block_info.id()
    }
}
