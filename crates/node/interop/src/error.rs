//! Error types for the interop deriver and its collaborators.

use alloy_primitives::B256;
use thiserror::Error;

/// Errors returned by the supervisor backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    /// The supervisor has no cross-safe data for the chain yet, and needs an anchor point.
    #[error("cross-safe head is not initialized")]
    UninitializedCrossSafe,
    /// The request failed.
    #[error("supervisor request failed: {0}")]
    Request(String),
}

/// Errors returned by the L2 block source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum L2SourceError {
    /// The block is not known to the source.
    #[error("L2 block {0} not found")]
    BlockNotFound(B256),
    /// The request failed.
    #[error("L2 source request failed: {0}")]
    Request(String),
}

/// Errors returned when loading the anchor point.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnchorPointError {
    /// The anchor point could not be loaded.
    #[error("failed to load anchor point: {0}")]
    Load(String),
}

/// Errors returned when emitting events to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineClientError {
    /// Error making a request to the engine. The request never made it there.
    #[error("Error making a request to the engine: {0}.")]
    RequestError(String),
}

/// Errors returned while handling an [`InteropEvent`](crate::InteropEvent).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InteropDeriverError {
    /// A supervisor backend call failed.
    #[error(transparent)]
    Backend(#[from] BackendError),
    /// An L2 block lookup failed.
    #[error(transparent)]
    L2Source(#[from] L2SourceError),
    /// The anchor point could not be loaded.
    #[error(transparent)]
    AnchorPoint(#[from] AnchorPointError),
    /// A promotion event could not be emitted.
    #[error(transparent)]
    EngineClient(#[from] EngineClientError),
}
