//! Arbitrators that pick one winning behavior per tick.
//!
//! All arbitrators share one selection algorithm in [`Arbitrator`]. They differ only in how the
//! applicable options are ordered before verification: by insertion order, by estimated cost or
//! by weighted random sampling.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod arbitrator;
pub mod cost;
pub mod priority;
pub mod random;

pub use arbitrator::{Arbitrator, OptionSet, SelectionPolicy};
pub use cost::{ByCost, CostArbitrator, CostData, CostEstimator};
pub use priority::{ByPriority, PriorityArbitrator};
pub use random::{ByWeight, RandomArbitrator, SamplingConfig};
