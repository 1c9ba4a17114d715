//! The ladder of safety levels a block moves through.

use core::{fmt, str::FromStr};
use serde::{Deserialize, Serialize};

/// The safety level of a block.
///
/// Levels are ordered from least to most safe, so `a < b` reads as "`a` is weaker than `b`". A
/// block's level only ever moves up this ladder.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum SafetyLevel {
    /// Observed locally, dependencies not yet verified.
    #[serde(rename = "unsafe")]
    LocalUnsafe,
    /// Dependencies verified against the unsafe views of all chains.
    #[serde(rename = "cross-unsafe")]
    CrossUnsafe,
    /// Derived from L1 data, dependencies not yet verified.
    #[serde(rename = "local-safe")]
    LocalSafe,
    /// Derived from L1 data, with all dependencies cross-safe.
    #[serde(rename = "safe")]
    CrossSafe,
    /// Derived from finalized L1 data, with all dependencies finalized.
    #[serde(rename = "finalized")]
    Finalized,
}

impl SafetyLevel {
    /// All levels, from least to most safe.
    pub const ALL: [Self; 5] =
        [Self::LocalUnsafe, Self::CrossUnsafe, Self::LocalSafe, Self::CrossSafe, Self::Finalized];

    /// Returns the level as it appears in configs and metrics labels.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LocalUnsafe => "unsafe",
            Self::CrossUnsafe => "cross-unsafe",
            Self::LocalSafe => "local-safe",
            Self::CrossSafe => "safe",
            Self::Finalized => "finalized",
        }
    }
}

impl fmt::Display for SafetyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when parsing a [`SafetyLevel`] from an unknown string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown safety level: {0}")]
pub struct UnknownSafetyLevel(pub String);

impl FromStr for SafetyLevel {
    type Err = UnknownSafetyLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|level| level.as_str() == s)
            .ok_or_else(|| UnknownSafetyLevel(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_safety_levels_are_ordered() {
        for pair in SafetyLevel::ALL.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[rstest]
    #[case::local_unsafe(SafetyLevel::LocalUnsafe, "unsafe")]
    #[case::cross_unsafe(SafetyLevel::CrossUnsafe, "cross-unsafe")]
    #[case::local_safe(SafetyLevel::LocalSafe, "local-safe")]
    #[case::cross_safe(SafetyLevel::CrossSafe, "safe")]
    #[case::finalized(SafetyLevel::Finalized, "finalized")]
    fn test_safety_level_names(#[case] level: SafetyLevel, #[case] name: &str) {
        assert_eq!(level.to_string(), name);
        assert_eq!(name.parse::<SafetyLevel>().unwrap(), level);
        assert_eq!(serde_json::to_string(&level).unwrap(), format!("\"{name}\""));
        assert_eq!(serde_json::from_str::<SafetyLevel>(&format!("\"{name}\"")).unwrap(), level);
    }

    #[test]
    fn test_unknown_safety_level() {
        assert_eq!(
            "safesafe".parse::<SafetyLevel>(),
            Err(UnknownSafetyLevel("safesafe".to_string()))
        );
        assert!(serde_json::from_str::<SafetyLevel>(r#""failed""#).is_err());
    }
}
