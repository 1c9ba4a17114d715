//! Configuration of the interop deriver.

use alloy_primitives::ChainId;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// The default time a single event may take to process.
const DEFAULT_RPC_TIMEOUT: Duration = Duration::from_secs(10);

const fn default_rpc_timeout() -> Duration {
    DEFAULT_RPC_TIMEOUT
}

/// The rollup parameters the interop deriver depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteropConfig {
    /// The chain ID of the local L2 chain.
    pub l2_chain_id: ChainId,
    /// The timestamp interop activates at, if it is scheduled.
    #[serde(default)]
    pub interop_time: Option<u64>,
    /// The number of the L2 genesis block.
    #[serde(default)]
    pub genesis_l2_number: u64,
    /// The timestamp of the L2 genesis block.
    #[serde(default)]
    pub genesis_l2_time: u64,
    /// The L2 block time, in seconds.
    pub block_time: u64,
    /// The time a single event may take to process, including all supervisor round trips.
    #[serde(default = "default_rpc_timeout")]
    pub rpc_timeout: Duration,
}

impl InteropConfig {
    /// Creates a new [`InteropConfig`] for `l2_chain_id` with interop active from `interop_time`.
    pub const fn new(l2_chain_id: ChainId, interop_time: Option<u64>, block_time: u64) -> Self {
        Self {
            l2_chain_id,
            interop_time,
            genesis_l2_number: 0,
            genesis_l2_time: 0,
            block_time,
            rpc_timeout: DEFAULT_RPC_TIMEOUT,
        }
    }

    /// Returns true if interop is active at `timestamp`.
    pub fn is_interop(&self, timestamp: u64) -> bool {
        self.interop_time.is_some_and(|activation| timestamp >= activation)
    }

    /// Returns the timestamp of L2 block `number`.
    pub const fn timestamp_for_block(&self, number: u64) -> u64 {
        let elapsed = number.saturating_sub(self.genesis_l2_number).saturating_mul(self.block_time);
        self.genesis_l2_time.saturating_add(elapsed)
    }
}
