#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod config;
pub use config::InteropConfig;

mod error;
pub use error::{
    AnchorPointError, BackendError, EngineClientError, InteropDeriverError, L2SourceError,
};

mod event;
pub use event::{InteropEvent, PromotionEvent};

mod traits;
pub use traits::{
    AnchorPointLoader, InteropBackend, InteropEngineClient, L2Source, QueuedInteropEngineClient,
};
#[cfg(test)]
pub(crate) use traits::{
    MockAnchorPointLoader, MockInteropBackend, MockInteropEngineClient, MockL2Source,
};

mod deriver;
pub use deriver::InteropDeriver;

mod actor;
pub use actor::InteropActor;

mod heads;
pub use heads::{InvalidSafetyHeads, SafetyHeads, SafetyHeadsUpdate};

mod metrics;
pub use metrics::Metrics;

#[cfg(test)]
pub(crate) mod test_utils;
