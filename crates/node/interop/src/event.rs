//! Events consumed and emitted by the interop deriver.

use kona_supervisor_types::{BlockInfo, L2BlockInfo, SafetyLevel};

/// An update of the local chain the [`InteropDeriver`](crate::InteropDeriver) reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteropEvent {
    /// The local-unsafe head advanced.
    LocalUnsafeUpdated {
        /// The new local-unsafe head.
        head: L2BlockInfo,
    },
    /// The engine asks whether the cross-unsafe head can advance.
    CrossUnsafeUpdate {
        /// The current cross-unsafe head.
        cross_unsafe: L2BlockInfo,
        /// The current local-unsafe head.
        local_unsafe: L2BlockInfo,
    },
    /// The local-safe head advanced.
    LocalSafeUpdated {
        /// The new local-safe head.
        head: L2BlockInfo,
        /// The L1 block the head was derived from.
        derived_from: BlockInfo,
    },
    /// The engine asks whether the cross-safe head can advance.
    CrossSafeUpdate {
        /// The current cross-safe head.
        cross_safe: L2BlockInfo,
        /// The current local-safe head.
        local_safe: L2BlockInfo,
    },
    /// A new L1 block was finalized.
    FinalizedL1 {
        /// The finalized L1 block.
        block: BlockInfo,
    },
    /// The engine asks whether the finalized head can advance.
    FinalizedUpdate {
        /// The current finalized head.
        head: L2BlockInfo,
    },
}

impl InteropEvent {
    /// Returns a short name of the event kind.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::LocalUnsafeUpdated { .. } => "local_unsafe_updated",
            Self::CrossUnsafeUpdate { .. } => "cross_unsafe_update",
            Self::LocalSafeUpdated { .. } => "local_safe_updated",
            Self::CrossSafeUpdate { .. } => "cross_safe_update",
            Self::FinalizedL1 { .. } => "finalized_l1",
            Self::FinalizedUpdate { .. } => "finalized_update",
        }
    }
}

/// An event the [`InteropDeriver`](crate::InteropDeriver) emits towards the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromotionEvent {
    /// Ask for a [`InteropEvent::CrossUnsafeUpdate`].
    RequestCrossUnsafe,
    /// Promote a block to cross-unsafe.
    PromoteCrossUnsafe {
        /// The new cross-unsafe head.
        head: L2BlockInfo,
    },
    /// Ask for a [`InteropEvent::CrossSafeUpdate`].
    RequestCrossSafe,
    /// Promote a block to cross-safe.
    PromoteSafe {
        /// The new safe head.
        head: L2BlockInfo,
        /// The L1 block the head was derived from.
        derived_from: BlockInfo,
    },
    /// Ask for a [`InteropEvent::FinalizedUpdate`].
    RequestFinalizedUpdate,
    /// Promote a block to finalized.
    PromoteFinalized {
        /// The new finalized head.
        head: L2BlockInfo,
    },
}

impl PromotionEvent {
    /// Returns the level a block is promoted to, or `None` for requests.
    pub const fn safety_level(&self) -> Option<SafetyLevel> {
        match self {
            Self::PromoteCrossUnsafe { .. } => Some(SafetyLevel::CrossUnsafe),
            Self::PromoteSafe { .. } => Some(SafetyLevel::CrossSafe),
            Self::PromoteFinalized { .. } => Some(SafetyLevel::Finalized),
            Self::RequestCrossUnsafe | Self::RequestCrossSafe | Self::RequestFinalizedUpdate => {
                None
            }
        }
    }
}
