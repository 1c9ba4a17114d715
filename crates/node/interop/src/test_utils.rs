//! Block fixtures for the unit tests.

use alloy_primitives::{B256, ChainId};
use kona_supervisor_types::{BlockInfo, BlockNumHash, L2BlockInfo};

pub(crate) const CHAIN_ID: ChainId = 42;

fn hash(tag: u8, number: u64) -> B256 {
    let mut bytes = [0u8; 32];
    bytes[0] = tag;
    bytes[24..].copy_from_slice(&number.to_be_bytes());
    B256::from(bytes)
}

/// L1 block `number`, with a 12 second block time.
pub(crate) fn l1_ref(number: u64) -> BlockInfo {
    BlockInfo {
        hash: hash(0x01, number),
        number,
        parent_hash: hash(0x01, number.saturating_sub(1)),
        timestamp: 12 * number,
    }
}

/// L2 block `number`, with a 2 second block time from genesis at timestamp 0.
pub(crate) fn l2_ref(number: u64) -> L2BlockInfo {
    L2BlockInfo {
        block_info: BlockInfo {
            hash: hash(0x02, number),
            number,
            parent_hash: hash(0x02, number.saturating_sub(1)),
            timestamp: 2 * number,
        },
        l1_origin: BlockNumHash { number: number / 6, hash: hash(0x01, number / 6) },
        seq_num: number % 6,
    }
}
