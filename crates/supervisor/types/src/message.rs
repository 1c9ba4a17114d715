//! Executing messages.

use crate::ChainIndex;
use alloy_primitives::B256;
use core::fmt;
use serde::{Deserialize, Serialize};

/// A parsed executing message extracted from a log emitted on an L2 chain.
///
/// The message asserts that an initiating log with `hash` was emitted at `log_index` of block
/// `block_number` on the chain identified by `chain_index`, and that this block has the given
/// `timestamp`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutingMessage {
    /// The index of the chain the initiating message was emitted on.
    pub chain_index: ChainIndex,
    /// The block number that contains the initiating log.
    pub block_number: u64,
    /// The log index of the initiating log within its block.
    pub log_index: u32,
    /// The hash of the initiating log.
    pub hash: B256,
    /// The timestamp of the block that contains the initiating log.
    pub timestamp: u64,
}

impl fmt::Display for ExecutingMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ExecMsg(chain: {}, block: {}, log: {}, time: {}, logHash: {})",
            self.chain_index, self.block_number, self.log_index, self.timestamp, self.hash
        )
    }
}
