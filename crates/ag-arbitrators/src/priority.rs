use ag_core::{Annotation, OptionFlags, SharedBehavior, Time};

use crate::{Arbitrator, OptionSet, SelectionPolicy};

/// Options are tried in the order they were added; earlier means higher priority.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ByPriority;

impl<E, S> SelectionPolicy<E, S> for ByPriority {
    type OptionData = ();

    const KIND: &'static str = "PriorityArbitrator";

    fn sort_options(
        &mut self,
        candidates: Vec<usize>,
        _options: &mut OptionSet<'_, E, S, ()>,
        _time: Time,
        _environment: &E,
    ) -> Vec<usize> {
        candidates
    }

    fn annotation(&self, index: usize, _data: &()) -> Annotation {
        Annotation::Rank(index)
    }
}

pub type PriorityArbitrator<E, C, S = C> = Arbitrator<E, C, S, ByPriority>;

impl<E, C, S> Arbitrator<E, C, S, ByPriority> {
    pub fn add_option(&mut self, behavior: SharedBehavior<E, S>, flags: OptionFlags) {
        self.push_option(behavior, flags, ());
    }
}
