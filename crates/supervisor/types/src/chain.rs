//! Compact chain identifiers.

use derive_more::{Display, From, Into};
use serde::{Deserialize, Serialize};

/// The compact index of a chain within the dependency set.
///
/// Chain indices are assigned by the [`DependencySet`] and are only meaningful within it. They are
/// what executing messages embed to name their source chain; translating an index into a
/// [`ChainId`] is always done through a [`ChainIndexResolver`].
///
/// [`DependencySet`]: crate::DependencySet
/// [`ChainId`]: alloy_primitives::ChainId
/// [`ChainIndexResolver`]: crate::ChainIndexResolver
#[derive(
    Debug,
    Display,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    From,
    Into,
    Serialize,
    Deserialize,
)]
#[serde(transparent)]
pub struct ChainIndex(pub u32);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_index_serde_is_transparent() {
        let index = ChainIndex(7);
        let json = serde_json::to_string(&index).unwrap();
        assert_eq!(json, "7");
        assert_eq!(serde_json::from_str::<ChainIndex>(&json).unwrap(), index);
    }

    #[test]
    fn test_chain_index_display() {
        assert_eq!(ChainIndex(42).to_string(), "42");
        assert_eq!(u32::from(ChainIndex::from(3u32)), 3);
    }
}
