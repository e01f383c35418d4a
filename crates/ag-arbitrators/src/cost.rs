use std::rc::Rc;

use ag_core::{Annotation, OptionFlags, SharedBehavior, Time};

use crate::{Arbitrator, OptionSet, SelectionPolicy};

/// Application supplied cost of running a command. Lower is better.
pub trait CostEstimator<E, S> {
    fn estimate_cost(&self, time: Time, environment: &E, command: &S, is_active: bool) -> f64;
}

impl<E, S, F> CostEstimator<E, S> for F
where
    F: Fn(Time, &E, &S, bool) -> f64,
{
    fn estimate_cost(&self, time: Time, environment: &E, command: &S, is_active: bool) -> f64 {
        self(time, environment, command, is_active)
    }
}

pub struct CostData<E, S> {
    estimator: Rc<dyn CostEstimator<E, S>>,
    last_estimated_cost: Option<f64>,
}

impl<E, S> CostData<E, S> {
    pub fn new(estimator: Rc<dyn CostEstimator<E, S>>) -> Self {
        Self {
            estimator,
            last_estimated_cost: None,
        }
    }

    /// Cost from the most recent ordering, `None` if the option was not estimated then.
    pub fn last_estimated_cost(&self) -> Option<f64> {
        self.last_estimated_cost
    }
}

/// Options are ordered by ascending estimated cost of their verified command.
///
/// Equal costs keep insertion order. Options whose command cannot be fetched or fails
/// verification get no cost and drop out of the ordering.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ByCost;

impl<E, S: Clone> SelectionPolicy<E, S> for ByCost {
    type OptionData = CostData<E, S>;

    const KIND: &'static str = "CostArbitrator";

    fn sort_options(
        &mut self,
        candidates: Vec<usize>,
        options: &mut OptionSet<'_, E, S, CostData<E, S>>,
        time: Time,
        environment: &E,
    ) -> Vec<usize> {
        for option in options.iter_mut() {
            option.data_mut().last_estimated_cost = None;
        }

        let mut costed = Vec::with_capacity(candidates.len());
        for index in candidates {
            let is_active = options.is_active(index);

            let command = if is_active {
                options.get_and_verify_command(index, time, environment)
            } else {
                options.option(index).gain_control(time, environment);
                let command = options.get_and_verify_command(index, time, environment);
                options.option(index).lose_control(time, environment);
                command
            };
            let Some(command) = command else {
                continue;
            };

            let data = options.option_mut(index).data_mut();
            let cost = data
                .estimator
                .estimate_cost(time, environment, &command, is_active);
            let cost = if cost.is_nan() { f64::INFINITY } else { cost };
            data.last_estimated_cost = Some(cost);
            costed.push((cost, index));
        }

        // `sort_by` is stable, so ties stay in insertion order.
        costed.sort_by(|(a, _), (b, _)| a.total_cmp(b));
        costed.into_iter().map(|(_, index)| index).collect()
    }

    fn annotation(&self, _index: usize, data: &CostData<E, S>) -> Annotation {
        Annotation::Cost(data.last_estimated_cost)
    }
}

pub type CostArbitrator<E, C, S = C> = Arbitrator<E, C, S, ByCost>;

impl<E, C, S: Clone> Arbitrator<E, C, S, ByCost> {
    pub fn add_option(
        &mut self,
        behavior: SharedBehavior<E, S>,
        flags: OptionFlags,
        estimator: Rc<dyn CostEstimator<E, S>>,
    ) {
        self.push_option(behavior, flags, CostData::new(estimator));
    }
}
