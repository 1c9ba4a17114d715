//! The collaborators of the interop deriver.

use crate::{
    AnchorPointError, BackendError, EngineClientError, L2SourceError, PromotionEvent,
};
use alloy_primitives::{B256, ChainId};
use async_trait::async_trait;
use derive_more::Constructor;
use kona_supervisor_types::{AnchorPoint, BlockInfo, BlockNumHash, L2BlockInfo, ReferenceView};
use std::fmt::Debug;
use tokio::sync::mpsc;

/// The supervisor, as seen by a node.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InteropBackend: Debug + Send + Sync {
    /// Reports a new local-unsafe head of `chain_id`.
    async fn update_local_unsafe(&self, chain_id: ChainId, head: BlockInfo)
    -> Result<(), BackendError>;

    /// Reports a new local-safe head of `chain_id`, derived from `derived_from`.
    async fn update_local_safe(
        &self,
        chain_id: ChainId,
        derived_from: BlockInfo,
        head: BlockInfo,
    ) -> Result<(), BackendError>;

    /// Reports a new finalized L1 block.
    async fn update_finalized_l1(&self, chain_id: ChainId, block: BlockInfo)
    -> Result<(), BackendError>;

    /// Seeds the cross-safe data of `chain_id` with an anchor point.
    async fn initialize_cross_safe(
        &self,
        chain_id: ChainId,
        derived_from: BlockInfo,
        cross_safe: BlockInfo,
    ) -> Result<(), BackendError>;

    /// Returns the supervisor's unsafe view of `chain_id`, given the node's own `view`.
    async fn unsafe_view(
        &self,
        chain_id: ChainId,
        view: ReferenceView,
    ) -> Result<ReferenceView, BackendError>;

    /// Returns the supervisor's safe view of `chain_id`, given the node's own `view`.
    async fn safe_view(
        &self,
        chain_id: ChainId,
        view: ReferenceView,
    ) -> Result<ReferenceView, BackendError>;

    /// Returns the L1 block `derived` of `chain_id` was derived from.
    async fn derived_from(
        &self,
        chain_id: ChainId,
        derived: BlockNumHash,
    ) -> Result<BlockInfo, BackendError>;

    /// Returns the finalized head of `chain_id`. A zeroed ID means nothing is finalized yet.
    async fn finalized(&self, chain_id: ChainId) -> Result<BlockNumHash, BackendError>;
}

/// Looks up blocks of the local L2 chain.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait L2Source: Debug + Send + Sync {
    /// Returns the L2 block with the given hash.
    async fn l2_block_ref_by_hash(&self, hash: B256) -> Result<L2BlockInfo, L2SourceError>;
}

/// Loads the point the cross-safe data of a chain starts from.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AnchorPointLoader: Debug + Send + Sync {
    /// Loads the anchor point.
    async fn load_anchor_point(&self) -> Result<AnchorPoint, AnchorPointError>;
}

/// Trait to be used to emit [`PromotionEvent`]s towards the engine, abstracting actual means of
/// communication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InteropEngineClient: Debug + Send + Sync {
    /// Sends `event` to the engine.
    /// Note: this function just guarantees that it is received by the engine but does not have
    /// any insight into whether it was processed or processed successfully.
    async fn send_promotion(&self, event: PromotionEvent) -> Result<(), EngineClientError>;
}

/// Queue-based implementation of the [`InteropEngineClient`] trait.
#[derive(Constructor, Debug)]
pub struct QueuedInteropEngineClient {
    /// A channel to use to send the engine [`PromotionEvent`]s.
    pub promotion_tx: mpsc::Sender<PromotionEvent>,
}

#[async_trait]
impl InteropEngineClient for QueuedInteropEngineClient {
    async fn send_promotion(&self, event: PromotionEvent) -> Result<(), EngineClientError> {
        self.promotion_tx
            .send(event)
            .await
            .map_err(|_| EngineClientError::RequestError("request channel closed.".to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_queued_client_forwards_events() {
        let (tx, mut rx) = mpsc::channel(4);
        let client = QueuedInteropEngineClient::new(tx);

        client.send_promotion(PromotionEvent::RequestCrossSafe).await.unwrap();
        assert_eq!(rx.recv().await, Some(PromotionEvent::RequestCrossSafe));
    }

    #[tokio::test]
    async fn test_queued_client_closed_channel() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let client = QueuedInteropEngineClient::new(tx);

        assert_eq!(
            client.send_promotion(PromotionEvent::RequestCrossUnsafe).await,
            Err(EngineClientError::RequestError("request channel closed.".to_string()))
        );
    }
}
