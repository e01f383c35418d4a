//! Coordinators: behaviors that run several sub-behaviors at once and merge their commands.
//!
//! Where an arbitrator picks a single winner, a coordinator combines the commands of its
//! contributing options with [`ag_core::Mergeable`]. Neither coordinator falls back to another
//! option when verification fails.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod conjunctive;
pub mod joint;

pub use conjunctive::ConjunctiveCoordinator;
pub use joint::JointCoordinator;

use ag_core::{same_instance, ArbitrationError, BehaviorOption, Result, SharedBehavior};

pub(crate) fn ensure_unique<E, S>(
    options: &[BehaviorOption<E, S>],
    behavior: &SharedBehavior<E, S>,
) -> Result<()> {
    match options
        .iter()
        .find(|option| same_instance(option.behavior(), behavior))
    {
        Some(option) => Err(ArbitrationError::MultipleReferencesToSameInstance {
            name: option.name(),
        }),
        None => Ok(()),
    }
}
