//! Umbrella crate that re-exports the `ag-*` building blocks.
//!
//! Decision making is split into small behaviors, each knowing when it applies. Arbitrators pick
//! one behavior per tick, coordinators run several at once, and both are behaviors themselves, so
//! they nest into graphs. An optional verifier rejects unsafe commands before they are executed.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

#[cfg(feature = "core")]
#[cfg_attr(docsrs, doc(cfg(feature = "core")))]
pub use ag_core as core;

#[cfg(feature = "arbitrators")]
#[cfg_attr(docsrs, doc(cfg(feature = "arbitrators")))]
pub use ag_arbitrators as arbitrators;

#[cfg(feature = "coordinators")]
#[cfg_attr(docsrs, doc(cfg(feature = "coordinators")))]
pub use ag_coordinators as coordinators;

/// The types needed to assemble and run a graph.
#[cfg(feature = "core")]
pub mod prelude {
    pub use ag_core::{
        ArbitrationError, Behavior, Mergeable, OptionFlags, PlaceboVerifier, SharedBehavior,
        Snapshot, Time, VerificationResult, Verifier,
    };

    #[cfg(feature = "arbitrators")]
    pub use ag_arbitrators::{CostArbitrator, CostEstimator, PriorityArbitrator, RandomArbitrator};

    #[cfg(feature = "coordinators")]
    pub use ag_coordinators::{ConjunctiveCoordinator, JointCoordinator};
}
