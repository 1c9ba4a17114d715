//! Views over the supervisor's safety heads and bootstrap anchors.

use crate::BlockInfo;
use alloy_eips::eip1898::BlockNumHash;
use derive_more::Constructor;
use serde::{Deserialize, Serialize};

/// A pair of local and cross heads at one safety tier.
///
/// The node sends its own view of the tier to the supervisor, and the supervisor responds with
/// the view it has verified. The `cross` head never runs ahead of the `local` head.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Constructor, Serialize, Deserialize)]
pub struct ReferenceView {
    /// The local head of the tier.
    pub local: BlockNumHash,
    /// The cross-verified head of the tier.
    pub cross: BlockNumHash,
}

/// The point from which cross-safe tracking starts on a chain without prior cross-safe state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Constructor, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnchorPoint {
    /// The L2 block that is cross-safe by definition.
    pub cross_safe: BlockInfo,
    /// The L1 block the anchor was derived from.
    pub derived_from: BlockInfo,
}
