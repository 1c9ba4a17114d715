//! Error types for the cross-chain dependency checks.

use crate::MsgKey;
use alloy_primitives::{B256, ChainId};
use kona_supervisor_types::{BlockSeal, ChainIndex, DependencySetError, ExecutingMessage};
use thiserror::Error;

/// Errors returned by the chain data sources the checks read from.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainDataError {
    /// The chain is not known to the data source.
    #[error("chain {0} is not tracked")]
    UnknownChain(ChainId),

    /// The requested block has not been indexed (yet).
    #[error("block {block_number} of chain {chain_id} not found")]
    BlockNotFound {
        /// The chain that was queried.
        chain_id: ChainId,
        /// The block number that was queried.
        block_number: u64,
    },

    /// The requested log does not exist in its block.
    #[error("log {log_index} of block {block_number} of chain {chain_id} not found")]
    LogNotFound {
        /// The chain that was queried.
        chain_id: ChainId,
        /// The block number that was queried.
        block_number: u64,
        /// The log index that was queried.
        log_index: u32,
    },

    /// The log exists, but its hash differs from the one the message commits to.
    #[error(
        "log {log_index} of block {block_number} of chain {chain_id} has hash {actual}, expected {expected}"
    )]
    LogHashMismatch {
        /// The chain that was queried.
        chain_id: ChainId,
        /// The block number that was queried.
        block_number: u64,
        /// The log index that was queried.
        log_index: u32,
        /// The hash the message commits to.
        expected: B256,
        /// The hash of the stored log.
        actual: B256,
    },

    /// The block is known, but it is not cross-unsafe.
    #[error("block {block_number} ({block_hash}) of chain {chain_id} is not cross-unsafe")]
    NotCrossUnsafe {
        /// The chain that was queried.
        chain_id: ChainId,
        /// The number of the block.
        block_number: u64,
        /// The hash of the block.
        block_hash: B256,
    },

    /// No cross-unsafe head has been recorded for the chain.
    #[error("no cross-unsafe head recorded for chain {0}")]
    NoCrossUnsafeHead(ChainId),

    /// A write conflicts with data that is already stored.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The data source could not be reached.
    #[error("chain data unavailable: {0}")]
    Unavailable(String),

    /// The dependency set of the data source is invalid.
    #[error("invalid dependency set: {0}")]
    InvalidDependencySet(#[from] DependencySetError),
}

/// Errors returned by the hazard-cycle check.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CycleError {
    /// A hazard block could not be opened.
    #[error("failed to open block {block_number} of chain {chain_id}: {source}")]
    FailedToOpenBlock {
        /// The chain of the hazard block.
        chain_id: ChainId,
        /// The number of the hazard block.
        block_number: u64,
        /// The underlying error.
        #[source]
        source: ChainDataError,
    },

    /// Opening a hazard block returned a different block than the one in the hazard set.
    #[error(
        "tried to open block {expected} of chain {chain_id}, but got different block {actual} than expected, use a reorg lock for consistency"
    )]
    BlockMismatch {
        /// The chain of the hazard block.
        chain_id: ChainId,
        /// The block recorded in the hazard set.
        expected: BlockSeal,
        /// The block that was opened.
        actual: BlockSeal,
    },

    /// An executing message sits at a log index outside its block.
    #[error(
        "executing message references invalid log index: log index {log_index} >= log count {log_count} on chain {chain_index}"
    )]
    InvalidLogIndex {
        /// The chain of the block holding the message.
        chain_index: ChainIndex,
        /// The log index of the executing message.
        log_index: u32,
        /// The number of logs in the block.
        log_count: u32,
    },

    /// An executing message points at a log outside its hazard block.
    #[error("executing message {exec} references unknown initiating log {init}")]
    UnknownInitiatingLog {
        /// The executing log.
        exec: MsgKey,
        /// The initiating log that does not exist.
        init: MsgKey,
    },

    /// An executing message points at itself.
    #[error("executing message references itself: {0}")]
    SelfReferencing(MsgKey),

    /// An executing message points at a chain outside the hazard set.
    #[error("executing message references unknown chain {0}")]
    UnknownChain(ChainIndex),

    /// A chain index of the hazard set has no chain ID.
    #[error("no chain ID for chain index {0}")]
    UnresolvedChainIndex(ChainIndex),

    /// The dependency graph contains a cycle.
    #[error("cycle detected: {remaining} logs could not be ordered")]
    Cycle {
        /// The number of logs left in the graph once no log without dependencies remained.
        remaining: usize,
    },
}

/// Errors returned while collecting the hazards of a candidate block.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HazardError {
    /// The initiating log of a message could not be found or verified.
    #[error("failed to check executing message {message}: {source}")]
    MessageCheck {
        /// The executing message.
        message: ExecutingMessage,
        /// The underlying error.
        #[source]
        source: ChainDataError,
    },

    /// A message initiated at an earlier timestamp is not cross-unsafe yet.
    #[error("dependency {block} of chain {chain_id} is not cross-unsafe: {source}")]
    DependencyNotCrossUnsafe {
        /// The chain of the dependency.
        chain_id: ChainId,
        /// The block that includes the initiating log.
        block: BlockSeal,
        /// The underlying error.
        #[source]
        source: ChainDataError,
    },

    /// The candidate depends on two different blocks of the same chain at its own timestamp.
    #[error("found dependency on {found} (chain {chain_id}), but already depend on {existing}")]
    ConflictingHazard {
        /// The chain of both dependencies.
        chain_id: ChainId,
        /// The hazard block that was recorded first.
        existing: BlockSeal,
        /// The conflicting block.
        found: BlockSeal,
    },

    /// A message claims to be initiated after the block that executes it.
    #[error("executing message {message} in {candidate} breaks timestamp invariant")]
    TimestampInvariantViolation {
        /// The executing message.
        message: ExecutingMessage,
        /// The block that executes the message.
        candidate: BlockSeal,
    },

    /// The source chain index of a message has no chain ID.
    #[error("no chain ID for chain index {0}")]
    UnresolvedChainIndex(ChainIndex),
}

/// Errors returned while advancing the cross-unsafe head of a chain.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CrossUnsafeError {
    /// Reading or writing chain data failed.
    #[error(transparent)]
    ChainData(#[from] ChainDataError),

    /// The candidate's executing messages are invalid.
    #[error(transparent)]
    Hazards(#[from] HazardError),

    /// The hazard set of the candidate failed the cycle check.
    #[error(transparent)]
    Cycle(#[from] CycleError),

    /// The chain has no index in the dependency set.
    #[error("chain {0} is not part of the dependency set")]
    UnresolvedChainId(ChainId),
}

impl CrossUnsafeError {
    /// Returns true if the candidate block itself is invalid, rather than the check having been
    /// interrupted by unavailable data.
    pub const fn is_candidate_rejection(&self) -> bool {
        match self {
            Self::ChainData(_) | Self::UnresolvedChainId(_) => false,
            Self::Hazards(err) => !matches!(
                err,
                HazardError::MessageCheck { source: ChainDataError::Unavailable(_), .. }
            ),
            Self::Cycle(err) => !matches!(
                err,
                CycleError::FailedToOpenBlock { .. } | CycleError::BlockMismatch { .. }
            ),
        }
    }
}
