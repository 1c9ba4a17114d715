//! Core types shared across the interop safety components.
//!
//! This crate defines the fundamental data structures used by the hazard-cycle
//! checks and by the safety-level promotion machinery: chain identifiers, block
//! seals and references, executing messages and the dependency set that maps
//! compact chain indices to chain IDs.

mod chain;
pub use chain::ChainIndex;

mod block;
pub use block::{BlockInfo, BlockSeal, L2BlockInfo};

mod message;
pub use message::ExecutingMessage;

mod view;
pub use view::{AnchorPoint, ReferenceView};

mod safety;
pub use safety::{SafetyLevel, UnknownSafetyLevel};

mod depset;
pub use depset::{ChainDependency, ChainIndexResolver, DependencySet, DependencySetError};

pub use alloy_eips::eip1898::BlockNumHash;
pub use alloy_primitives::{B256, ChainId};
