//! Behavior, option and verification primitives for arbitration graphs.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod behavior;
pub mod cache;
pub mod error;
pub mod merge;
pub mod option;
pub mod snapshot;
pub mod time;
pub mod verification;

pub use behavior::{same_instance, Behavior, SharedBehavior};
pub use cache::Cache;
pub use error::{ArbitrationError, Result};
pub use merge::Mergeable;
pub use option::{BehaviorOption, OptionFlags};
pub use snapshot::{Annotation, OptionSnapshot, Snapshot};
pub use time::Time;
pub use verification::{
    PlaceboResult, PlaceboVerifier, SharedResult, VerificationResult, Verifier,
};
