//! The safety-level promotion state machine.

use crate::{
    AnchorPointLoader, BackendError, InteropBackend, InteropConfig, InteropDeriverError,
    InteropEngineClient, InteropEvent, L2Source, Metrics, PromotionEvent,
};
use alloy_primitives::ChainId;
use derive_more::Constructor;
use kona_supervisor_types::{BlockInfo, BlockNumHash, L2BlockInfo, ReferenceView, SafetyLevel};
use std::cmp::Ordering;
use tracing::{debug, info, trace, warn};

/// Drives the cross-safety levels of the local chain through the supervisor.
///
/// The deriver holds no state of its own. Every [`InteropEvent`] is an idempotent re-check
/// against the supervisor, and results in at most one promotion.
#[derive(Debug, Constructor)]
pub struct InteropDeriver<B, S, A, E> {
    config: InteropConfig,
    backend: B,
    l2_source: S,
    anchor_loader: A,
    engine: E,
}

impl<B, S, A, E> InteropDeriver<B, S, A, E>
where
    B: InteropBackend,
    S: L2Source,
    A: AnchorPointLoader,
    E: InteropEngineClient,
{
    /// Returns the [`InteropConfig`] of the deriver.
    pub const fn config(&self) -> &InteropConfig {
        &self.config
    }

    /// Handles a single [`InteropEvent`].
    pub async fn handle(&self, event: InteropEvent) -> Result<(), InteropDeriverError> {
        match event {
            InteropEvent::LocalUnsafeUpdated { head } => self.on_local_unsafe_updated(head).await,
            InteropEvent::CrossUnsafeUpdate { cross_unsafe, local_unsafe } => {
                self.on_cross_unsafe_update(cross_unsafe, local_unsafe).await
            }
            InteropEvent::LocalSafeUpdated { head, derived_from } => {
                self.on_local_safe_updated(head, derived_from).await
            }
            InteropEvent::CrossSafeUpdate { cross_safe, local_safe } => {
                self.on_cross_safe_update(cross_safe, local_safe).await
            }
            InteropEvent::FinalizedL1 { block } => self.on_finalized_l1(block).await,
            InteropEvent::FinalizedUpdate { head } => self.on_finalized_update(head).await,
        }
    }

    const fn chain_id(&self) -> ChainId {
        self.config.l2_chain_id
    }

    async fn on_local_unsafe_updated(&self, head: L2BlockInfo) -> Result<(), InteropDeriverError> {
        if !self.config.is_interop(head.timestamp()) {
            trace!(
                target: "interop",
                number = head.number(),
                "Ignoring pre-interop local-unsafe head"
            );
            return Ok(());
        }

        debug!(
            target: "interop",
            number = head.number(),
            hash = %head.hash(),
            "Signaling local-unsafe head to supervisor"
        );
        self.backend.update_local_unsafe(self.chain_id(), head.block_info).await?;
        self.emit(PromotionEvent::RequestCrossUnsafe).await
    }

    async fn on_cross_unsafe_update(
        &self,
        cross_unsafe: L2BlockInfo,
        local_unsafe: L2BlockInfo,
    ) -> Result<(), InteropDeriverError> {
        if !self.needs_update(&cross_unsafe, &local_unsafe) {
            return Ok(());
        }

        let view = ReferenceView::new(local_unsafe.id(), cross_unsafe.id());
        let view = self.backend.unsafe_view(self.chain_id(), view).await?;
        if !Self::advances(SafetyLevel::CrossUnsafe, view.cross, &cross_unsafe) {
            return Ok(());
        }

        let head = self.l2_source.l2_block_ref_by_hash(view.cross.hash).await?;
        self.emit(PromotionEvent::PromoteCrossUnsafe { head }).await
    }

    async fn on_local_safe_updated(
        &self,
        head: L2BlockInfo,
        derived_from: BlockInfo,
    ) -> Result<(), InteropDeriverError> {
        if !self.config.is_interop(head.timestamp()) {
            trace!(
                target: "interop",
                number = head.number(),
                "Ignoring pre-interop local-safe head"
            );
            return Ok(());
        }

        debug!(
            target: "interop",
            number = head.number(),
            hash = %head.hash(),
            derived_from = derived_from.number,
            "Signaling local-safe head to supervisor"
        );
        self.backend.update_local_safe(self.chain_id(), derived_from, head.block_info).await?;
        self.emit(PromotionEvent::RequestCrossSafe).await
    }

    async fn on_cross_safe_update(
        &self,
        cross_safe: L2BlockInfo,
        local_safe: L2BlockInfo,
    ) -> Result<(), InteropDeriverError> {
        if !self.needs_update(&cross_safe, &local_safe) {
            return Ok(());
        }

        let view = ReferenceView::new(local_safe.id(), cross_safe.id());
        let view = match self.backend.safe_view(self.chain_id(), view).await {
            Ok(view) => view,
            Err(BackendError::UninitializedCrossSafe) => return self.initialize_cross_safe().await,
            Err(err) => return Err(err.into()),
        };
        if !Self::advances(SafetyLevel::CrossSafe, view.cross, &cross_safe) {
            return Ok(());
        }

        let derived_from = self.backend.derived_from(self.chain_id(), view.cross).await?;
        let head = self.l2_source.l2_block_ref_by_hash(view.cross.hash).await?;
        self.emit(PromotionEvent::PromoteSafe { head, derived_from }).await?;
        self.emit(PromotionEvent::RequestFinalizedUpdate).await
    }

    async fn on_finalized_l1(&self, block: BlockInfo) -> Result<(), InteropDeriverError> {
        debug!(
            target: "interop",
            number = block.number,
            hash = %block.hash,
            "Signaling finalized L1 block to supervisor"
        );
        self.backend.update_finalized_l1(self.chain_id(), block).await?;
        self.emit(PromotionEvent::RequestFinalizedUpdate).await
    }

    async fn on_finalized_update(&self, head: L2BlockInfo) -> Result<(), InteropDeriverError> {
        let finalized = self.backend.finalized(self.chain_id()).await?;
        if finalized == BlockNumHash::default() {
            debug!(target: "interop", "Supervisor has not finalized any block yet");
            return Ok(());
        }
        if finalized.number <= head.number() {
            trace!(
                target: "interop",
                supervisor = finalized.number,
                current = head.number(),
                "No finalized head update"
            );
            return Ok(());
        }

        let head = self.l2_source.l2_block_ref_by_hash(finalized.hash).await?;
        self.emit(PromotionEvent::PromoteFinalized { head }).await
    }

    /// Seeds the supervisor with the anchor point. Nothing is promoted in the same turn.
    async fn initialize_cross_safe(&self) -> Result<(), InteropDeriverError> {
        let anchor = self.anchor_loader.load_anchor_point().await?;
        info!(
            target: "interop",
            cross_safe = anchor.cross_safe.number,
            derived_from = anchor.derived_from.number,
            "Initializing cross-safe head from anchor point"
        );
        self.backend
            .initialize_cross_safe(self.chain_id(), anchor.derived_from, anchor.cross_safe)
            .await?;
        Ok(())
    }

    /// Returns true if `cross` lags behind `local`, and the block after it is past activation.
    fn needs_update(&self, cross: &L2BlockInfo, local: &L2BlockInfo) -> bool {
        if cross.number() >= local.number() {
            trace!(
                target: "interop",
                cross = cross.number(),
                local = local.number(),
                "Cross head caught up"
            );
            return false;
        }
        let next = cross.number() + 1;
        if !self.config.is_interop(self.config.timestamp_for_block(next)) {
            trace!(target: "interop", next, "Next block is pre-interop");
            return false;
        }
        true
    }

    /// Returns true if the supervisor's `cross` head is ahead of the `current` one.
    fn advances(level: SafetyLevel, cross: BlockNumHash, current: &L2BlockInfo) -> bool {
        match cross.number.cmp(&current.number()) {
            Ordering::Greater => true,
            Ordering::Equal => {
                debug!(
                    target: "interop",
                    %level,
                    number = cross.number,
                    "Supervisor did not advance"
                );
                false
            }
            Ordering::Less => {
                warn!(
                    target: "interop",
                    %level,
                    supervisor = cross.number,
                    current = current.number(),
                    "Supervisor is behind the node"
                );
                false
            }
        }
    }

    async fn emit(&self, event: PromotionEvent) -> Result<(), InteropDeriverError> {
        self.engine.send_promotion(event).await?;
        if let Some(level) = event.safety_level() {
            Metrics::record_promotion(level);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        MockAnchorPointLoader, MockInteropBackend, MockInteropEngineClient, MockL2Source,
        test_utils::{CHAIN_ID, l1_ref, l2_ref},
    };
    use kona_supervisor_types::AnchorPoint;
    use mockall::{Sequence, predicate::eq};

    type TestDeriver = InteropDeriver<
        MockInteropBackend,
        MockL2Source,
        MockAnchorPointLoader,
        MockInteropEngineClient,
    >;

    #[derive(Default)]
    struct Mocks {
        backend: MockInteropBackend,
        l2_source: MockL2Source,
        anchor_loader: MockAnchorPointLoader,
        engine: MockInteropEngineClient,
    }

    impl Mocks {
        fn deriver(self, interop_time: u64) -> TestDeriver {
            InteropDeriver::new(
                InteropConfig::new(CHAIN_ID, Some(interop_time), 2),
                self.backend,
                self.l2_source,
                self.anchor_loader,
                self.engine,
            )
        }

        fn expect_emit(&mut self, event: PromotionEvent) {
            self.engine.expect_send_promotion().with(eq(event)).times(1).returning(|_| Ok(()));
        }
    }

    #[tokio::test]
    async fn test_local_unsafe_pushes_to_supervisor_and_requests_cross_unsafe() {
        let head = l2_ref(10);
        let mut mocks = Mocks::default();
        mocks
            .backend
            .expect_update_local_unsafe()
            .with(eq(CHAIN_ID), eq(head.block_info))
            .times(1)
            .returning(|_, _| Ok(()));
        mocks.expect_emit(PromotionEvent::RequestCrossUnsafe);

        mocks.deriver(0).handle(InteropEvent::LocalUnsafeUpdated { head }).await.unwrap();
    }

    #[tokio::test]
    async fn test_pre_interop_heads_are_ignored() {
        let mut mocks = Mocks::default();
        mocks.backend.expect_update_local_unsafe().never();
        mocks.backend.expect_update_local_safe().never();
        mocks.engine.expect_send_promotion().never();
        let deriver = mocks.deriver(1_000);

        deriver.handle(InteropEvent::LocalUnsafeUpdated { head: l2_ref(10) }).await.unwrap();
        deriver
            .handle(InteropEvent::LocalSafeUpdated { head: l2_ref(10), derived_from: l1_ref(1) })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_establish_cross_unsafe() {
        let (old, next, local) = (l2_ref(10), l2_ref(11), l2_ref(12));
        let mut mocks = Mocks::default();
        mocks
            .backend
            .expect_unsafe_view()
            .with(eq(CHAIN_ID), eq(ReferenceView::new(local.id(), old.id())))
            .times(1)
            .returning(move |_, _| Ok(ReferenceView::new(local.id(), next.id())));
        mocks
            .l2_source
            .expect_l2_block_ref_by_hash()
            .with(eq(next.hash()))
            .times(1)
            .returning(move |_| Ok(next));
        mocks.expect_emit(PromotionEvent::PromoteCrossUnsafe { head: next });

        mocks
            .deriver(0)
            .handle(InteropEvent::CrossUnsafeUpdate { cross_unsafe: old, local_unsafe: local })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_deny_cross_unsafe() {
        let (old, local) = (l2_ref(10), l2_ref(12));
        let mut mocks = Mocks::default();
        mocks
            .backend
            .expect_unsafe_view()
            .times(1)
            .returning(move |_, _| Ok(ReferenceView::new(local.id(), old.id())));
        mocks.l2_source.expect_l2_block_ref_by_hash().never();
        mocks.engine.expect_send_promotion().never();

        mocks
            .deriver(0)
            .handle(InteropEvent::CrossUnsafeUpdate { cross_unsafe: old, local_unsafe: local })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_supervisor_behind_is_not_a_promotion() {
        let (behind, old, local) = (l2_ref(9), l2_ref(10), l2_ref(12));
        let mut mocks = Mocks::default();
        mocks
            .backend
            .expect_unsafe_view()
            .returning(move |_, _| Ok(ReferenceView::new(local.id(), behind.id())));
        mocks.l2_source.expect_l2_block_ref_by_hash().never();
        mocks.engine.expect_send_promotion().never();

        mocks
            .deriver(0)
            .handle(InteropEvent::CrossUnsafeUpdate { cross_unsafe: old, local_unsafe: local })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_cross_unsafe_caught_up_skips_supervisor() {
        let mut mocks = Mocks::default();
        mocks.backend.expect_unsafe_view().never();
        mocks.backend.expect_safe_view().never();
        let deriver = mocks.deriver(0);

        deriver
            .handle(InteropEvent::CrossUnsafeUpdate {
                cross_unsafe: l2_ref(12),
                local_unsafe: l2_ref(12),
            })
            .await
            .unwrap();
        deriver
            .handle(InteropEvent::CrossSafeUpdate {
                cross_safe: l2_ref(12),
                local_safe: l2_ref(11),
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_cross_update_before_activation_skips_supervisor() {
        // Block 11 sits at timestamp 22, activation is at 24.
        let mut mocks = Mocks::default();
        mocks.backend.expect_unsafe_view().never();
        mocks.backend.expect_safe_view().never();
        mocks.anchor_loader.expect_load_anchor_point().never();
        mocks.engine.expect_send_promotion().never();
        let deriver = mocks.deriver(24);

        deriver
            .handle(InteropEvent::CrossUnsafeUpdate {
                cross_unsafe: l2_ref(10),
                local_unsafe: l2_ref(15),
            })
            .await
            .unwrap();
        deriver
            .handle(InteropEvent::CrossSafeUpdate {
                cross_safe: l2_ref(10),
                local_safe: l2_ref(15),
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_cross_safe_update_at_activation_queries_supervisor() {
        // Block 12 sits at timestamp 24, exactly at activation.
        let (old, local) = (l2_ref(11), l2_ref(15));
        let mut mocks = Mocks::default();
        mocks
            .backend
            .expect_safe_view()
            .with(eq(CHAIN_ID), eq(ReferenceView::new(local.id(), old.id())))
            .times(1)
            .returning(move |_, _| Ok(ReferenceView::new(local.id(), old.id())));
        mocks.engine.expect_send_promotion().never();

        mocks
            .deriver(24)
            .handle(InteropEvent::CrossSafeUpdate { cross_safe: old, local_safe: local })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_local_safe_pushes_to_supervisor_and_requests_cross_safe() {
        let (head, derived_from) = (l2_ref(10), l1_ref(2));
        let mut mocks = Mocks::default();
        mocks
            .backend
            .expect_update_local_safe()
            .with(eq(CHAIN_ID), eq(derived_from), eq(head.block_info))
            .times(1)
            .returning(|_, _, _| Ok(()));
        mocks.expect_emit(PromotionEvent::RequestCrossSafe);

        let event = InteropEvent::LocalSafeUpdated { head, derived_from };
        mocks.deriver(0).handle(event).await.unwrap();
    }

    #[tokio::test]
    async fn test_initialize_cross_safe() {
        let anchor = AnchorPoint::new(l2_ref(0).block_info, l1_ref(0));
        let mut mocks = Mocks::default();
        mocks
            .backend
            .expect_safe_view()
            .times(1)
            .returning(|_, _| Err(BackendError::UninitializedCrossSafe));
        mocks.anchor_loader.expect_load_anchor_point().times(1).returning(move || Ok(anchor));
        mocks
            .backend
            .expect_initialize_cross_safe()
            .with(eq(CHAIN_ID), eq(anchor.derived_from), eq(anchor.cross_safe))
            .times(1)
            .returning(|_, _, _| Ok(()));
        mocks.backend.expect_derived_from().never();
        mocks.l2_source.expect_l2_block_ref_by_hash().never();
        mocks.engine.expect_send_promotion().never();

        mocks
            .deriver(0)
            .handle(InteropEvent::CrossSafeUpdate {
                cross_safe: l2_ref(10),
                local_safe: l2_ref(12),
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_establish_cross_safe() {
        let (old, next, local, derived_from) = (l2_ref(10), l2_ref(11), l2_ref(12), l1_ref(2));
        let mut mocks = Mocks::default();
        let mut seq = Sequence::new();
        mocks
            .backend
            .expect_safe_view()
            .with(eq(CHAIN_ID), eq(ReferenceView::new(local.id(), old.id())))
            .times(1)
            .returning(move |_, _| Ok(ReferenceView::new(local.id(), next.id())));
        mocks
            .backend
            .expect_derived_from()
            .with(eq(CHAIN_ID), eq(next.id()))
            .times(1)
            .returning(move |_, _| Ok(derived_from));
        mocks
            .l2_source
            .expect_l2_block_ref_by_hash()
            .with(eq(next.hash()))
            .times(1)
            .returning(move |_| Ok(next));
        mocks
            .engine
            .expect_send_promotion()
            .with(eq(PromotionEvent::PromoteSafe { head: next, derived_from }))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        mocks
            .engine
            .expect_send_promotion()
            .with(eq(PromotionEvent::RequestFinalizedUpdate))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));

        mocks
            .deriver(0)
            .handle(InteropEvent::CrossSafeUpdate { cross_safe: old, local_safe: local })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_deny_cross_safe() {
        let (old, local) = (l2_ref(10), l2_ref(12));
        let mut mocks = Mocks::default();
        mocks
            .backend
            .expect_safe_view()
            .times(1)
            .returning(move |_, _| Ok(ReferenceView::new(local.id(), old.id())));
        mocks.backend.expect_derived_from().never();
        mocks.engine.expect_send_promotion().never();

        mocks
            .deriver(0)
            .handle(InteropEvent::CrossSafeUpdate { cross_safe: old, local_safe: local })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_finalized_l1_requests_finalized_update() {
        let block = l1_ref(5);
        let mut mocks = Mocks::default();
        mocks
            .backend
            .expect_update_finalized_l1()
            .with(eq(CHAIN_ID), eq(block))
            .times(1)
            .returning(|_, _| Ok(()));
        mocks.expect_emit(PromotionEvent::RequestFinalizedUpdate);

        mocks.deriver(0).handle(InteropEvent::FinalizedL1 { block }).await.unwrap();
    }

    #[tokio::test]
    async fn test_next_finalized_block() {
        let (old, next) = (l2_ref(10), l2_ref(12));
        let mut mocks = Mocks::default();
        mocks
            .backend
            .expect_finalized()
            .with(eq(CHAIN_ID))
            .times(1)
            .returning(move |_| Ok(next.id()));
        mocks
            .l2_source
            .expect_l2_block_ref_by_hash()
            .with(eq(next.hash()))
            .times(1)
            .returning(move |_| Ok(next));
        mocks.expect_emit(PromotionEvent::PromoteFinalized { head: next });

        mocks.deriver(0).handle(InteropEvent::FinalizedUpdate { head: old }).await.unwrap();
    }

    #[tokio::test]
    async fn test_keep_finalized_block() {
        let old = l2_ref(10);
        let mut mocks = Mocks::default();
        mocks.backend.expect_finalized().times(1).returning(move |_| Ok(old.id()));
        mocks.l2_source.expect_l2_block_ref_by_hash().never();
        mocks.engine.expect_send_promotion().never();

        mocks.deriver(0).handle(InteropEvent::FinalizedUpdate { head: old }).await.unwrap();
    }

    #[tokio::test]
    async fn test_nothing_finalized_yet() {
        let mut mocks = Mocks::default();
        mocks.backend.expect_finalized().times(1).returning(|_| Ok(BlockNumHash::default()));
        mocks.engine.expect_send_promotion().never();

        mocks
            .deriver(0)
            .handle(InteropEvent::FinalizedUpdate { head: L2BlockInfo::default() })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_backend_errors_are_returned() {
        let mut mocks = Mocks::default();
        mocks
            .backend
            .expect_unsafe_view()
            .returning(|_, _| Err(BackendError::Request("connection reset".to_string())));
        mocks.engine.expect_send_promotion().never();

        let err = mocks
            .deriver(0)
            .handle(InteropEvent::CrossUnsafeUpdate {
                cross_unsafe: l2_ref(1),
                local_unsafe: l2_ref(2),
            })
            .await
            .unwrap_err();
        assert_eq!(
            err,
            InteropDeriverError::Backend(BackendError::Request("connection reset".to_string()))
        );
    }
}
