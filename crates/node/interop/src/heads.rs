//! The consumer-side record of the safety heads of a chain.

use crate::PromotionEvent;
use kona_supervisor_types::{L2BlockInfo, SafetyLevel};
use thiserror::Error;

/// An update that would leave [`SafetyHeads`] in an invalid state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvalidSafetyHeads {
    /// The heads would no longer be ordered by safety level.
    #[error(
        "Invalid safety heads: expected finalized ({finalized}) <= safe ({safe}) <= \
        local_safe ({local_safe}) <= cross_unsafe ({cross_unsafe}) <= unsafe ({local_unsafe})"
    )]
    Ordering {
        /// The resulting finalized head block number.
        finalized: u64,
        /// The resulting safe head block number.
        safe: u64,
        /// The resulting local safe head block number.
        local_safe: u64,
        /// The resulting cross unsafe head block number.
        cross_unsafe: u64,
        /// The resulting unsafe head block number.
        local_unsafe: u64,
    },
    /// A head would move back to a lower block.
    #[error("{level} head cannot move back from block {current} to block {update}")]
    Regression {
        /// The level of the head.
        level: SafetyLevel,
        /// The current block number of the head.
        current: u64,
        /// The block number of the update.
        update: u64,
    },
}

/// The heads of a chain at each safety level.
///
/// The heads are always ordered: `finalized <= safe <= local_safe <= cross_unsafe <=
/// local_unsafe`, and none of them ever moves back.
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq)]
pub struct SafetyHeads {
    local_unsafe: L2BlockInfo,
    cross_unsafe: L2BlockInfo,
    local_safe: L2BlockInfo,
    safe: L2BlockInfo,
    finalized: L2BlockInfo,
}

/// Specifies how to update [`SafetyHeads`]. Heads left at `None` keep their value.
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq)]
pub struct SafetyHeadsUpdate {
    /// The new local-unsafe head.
    pub local_unsafe: Option<L2BlockInfo>,
    /// The new cross-unsafe head.
    pub cross_unsafe: Option<L2BlockInfo>,
    /// The new local-safe head.
    pub local_safe: Option<L2BlockInfo>,
    /// The new safe head.
    pub safe: Option<L2BlockInfo>,
    /// The new finalized head.
    pub finalized: Option<L2BlockInfo>,
}

impl SafetyHeads {
    /// Returns the head at `level`.
    pub const fn head(&self, level: SafetyLevel) -> L2BlockInfo {
        match level {
            SafetyLevel::LocalUnsafe => self.local_unsafe,
            SafetyLevel::CrossUnsafe => self.cross_unsafe,
            SafetyLevel::LocalSafe => self.local_safe,
            SafetyLevel::CrossSafe => self.safe,
            SafetyLevel::Finalized => self.finalized,
        }
    }

    /// Applies `update`, returning the new heads.
    ///
    /// # Errors
    ///
    /// Returns an error if a head would move back, or if the resulting heads would not be
    /// ordered by safety level.
    pub fn apply_update(self, update: SafetyHeadsUpdate) -> Result<Self, InvalidSafetyHeads> {
        let updates = [
            (SafetyLevel::LocalUnsafe, update.local_unsafe),
            (SafetyLevel::CrossUnsafe, update.cross_unsafe),
            (SafetyLevel::LocalSafe, update.local_safe),
            (SafetyLevel::CrossSafe, update.safe),
            (SafetyLevel::Finalized, update.finalized),
        ];
        for (level, head) in updates {
            let Some(head) = head else { continue };
            let current = self.head(level).number();
            if head.number() < current {
                return Err(InvalidSafetyHeads::Regression {
                    level,
                    current,
                    update: head.number(),
                });
            }
        }

        let new = Self {
            local_unsafe: update.local_unsafe.unwrap_or(self.local_unsafe),
            cross_unsafe: update.cross_unsafe.unwrap_or(self.cross_unsafe),
            local_safe: update.local_safe.unwrap_or(self.local_safe),
            safe: update.safe.unwrap_or(self.safe),
            finalized: update.finalized.unwrap_or(self.finalized),
        };

        let finalized = new.finalized.number();
        let safe = new.safe.number();
        let local_safe = new.local_safe.number();
        let cross_unsafe = new.cross_unsafe.number();
        let local_unsafe = new.local_unsafe.number();

        let is_valid = finalized <= safe &&
            safe <= local_safe &&
            local_safe <= cross_unsafe &&
            cross_unsafe <= local_unsafe;
        if !is_valid {
            return Err(InvalidSafetyHeads::Ordering {
                finalized,
                safe,
                local_safe,
                cross_unsafe,
                local_unsafe,
            });
        }

        Ok(new)
    }

    /// Applies the head promoted by `event`. Request events leave the heads unchanged.
    pub fn apply_promotion(self, event: &PromotionEvent) -> Result<Self, InvalidSafetyHeads> {
        let update = match *event {
            PromotionEvent::PromoteCrossUnsafe { head } => {
                SafetyHeadsUpdate { cross_unsafe: Some(head), ..Default::default() }
            }
            PromotionEvent::PromoteSafe { head, .. } => {
                SafetyHeadsUpdate { safe: Some(head), ..Default::default() }
            }
            PromotionEvent::PromoteFinalized { head } => {
                SafetyHeadsUpdate { finalized: Some(head), ..Default::default() }
            }
            PromotionEvent::RequestCrossUnsafe |
            PromotionEvent::RequestCrossSafe |
            PromotionEvent::RequestFinalizedUpdate => return Ok(self),
        };
        self.apply_update(update)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{l1_ref, l2_ref};
    use rstest::rstest;

    fn heads() -> SafetyHeads {
        SafetyHeads::default()
            .apply_update(SafetyHeadsUpdate {
                local_unsafe: Some(l2_ref(10)),
                cross_unsafe: Some(l2_ref(8)),
                local_safe: Some(l2_ref(6)),
                safe: Some(l2_ref(4)),
                finalized: Some(l2_ref(2)),
            })
            .unwrap()
    }

    #[test]
    fn test_apply_update_keeps_unset_heads() {
        let heads = heads().apply_update(SafetyHeadsUpdate {
            local_unsafe: Some(l2_ref(11)),
            ..Default::default()
        });
        let heads = heads.unwrap();
        assert_eq!(heads.head(SafetyLevel::LocalUnsafe), l2_ref(11));
        assert_eq!(heads.head(SafetyLevel::CrossUnsafe), l2_ref(8));
        assert_eq!(heads.head(SafetyLevel::Finalized), l2_ref(2));
    }

    fn update_at(level: SafetyLevel, number: u64) -> SafetyHeadsUpdate {
        let head = Some(l2_ref(number));
        match level {
            SafetyLevel::LocalUnsafe => {
                SafetyHeadsUpdate { local_unsafe: head, ..Default::default() }
            }
            SafetyLevel::CrossUnsafe => {
                SafetyHeadsUpdate { cross_unsafe: head, ..Default::default() }
            }
            SafetyLevel::LocalSafe => SafetyHeadsUpdate { local_safe: head, ..Default::default() },
            SafetyLevel::CrossSafe => SafetyHeadsUpdate { safe: head, ..Default::default() },
            SafetyLevel::Finalized => SafetyHeadsUpdate { finalized: head, ..Default::default() },
        }
    }

    #[rstest]
    #[case::cross_unsafe_ahead_of_unsafe(update_at(SafetyLevel::CrossUnsafe, 11))]
    #[case::safe_ahead_of_local_safe(update_at(SafetyLevel::CrossSafe, 7))]
    #[case::finalized_ahead_of_safe(update_at(SafetyLevel::Finalized, 5))]
    fn test_apply_update_rejects_unordered_heads(#[case] update: SafetyHeadsUpdate) {
        assert!(matches!(heads().apply_update(update), Err(InvalidSafetyHeads::Ordering { .. })));
    }

    #[rstest]
    #[case::local_unsafe(SafetyLevel::LocalUnsafe, 10)]
    #[case::cross_unsafe(SafetyLevel::CrossUnsafe, 8)]
    #[case::finalized(SafetyLevel::Finalized, 2)]
    fn test_apply_update_rejects_regressions(#[case] level: SafetyLevel, #[case] current: u64) {
        assert_eq!(
            heads().apply_update(update_at(level, current - 1)),
            Err(InvalidSafetyHeads::Regression { level, current, update: current - 1 })
        );
    }

    #[test]
    fn test_apply_promotions() {
        let heads = heads()
            .apply_promotion(&PromotionEvent::PromoteCrossUnsafe { head: l2_ref(9) })
            .unwrap()
            .apply_promotion(&PromotionEvent::PromoteSafe {
                head: l2_ref(5),
                derived_from: l1_ref(1),
            })
            .unwrap()
            .apply_promotion(&PromotionEvent::PromoteFinalized { head: l2_ref(3) })
            .unwrap();

        assert_eq!(heads.head(SafetyLevel::CrossUnsafe), l2_ref(9));
        assert_eq!(heads.head(SafetyLevel::CrossSafe), l2_ref(5));
        assert_eq!(heads.head(SafetyLevel::Finalized), l2_ref(3));
        assert_eq!(heads.apply_promotion(&PromotionEvent::RequestCrossSafe), Ok(heads));
    }

    #[test]
    fn test_promotion_past_local_head_is_rejected() {
        assert!(matches!(
            heads().apply_promotion(&PromotionEvent::PromoteSafe {
                head: l2_ref(7),
                derived_from: l1_ref(1),
            }),
            Err(InvalidSafetyHeads::Ordering { safe: 7, local_safe: 6, .. })
        ));
    }
}
