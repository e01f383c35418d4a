use ag_core::{Annotation, ArbitrationError, OptionFlags, Result, SharedBehavior, Time};
use rand::distributions::{Distribution, WeightedError, WeightedIndex};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use tracing::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Arbitrator, OptionSet, SelectionPolicy};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SamplingConfig {
    /// Fixed seed for reproducible orderings. Seeded from OS entropy if unset.
    pub seed: Option<u64>,
}

/// Options are ordered by weighted sampling without replacement.
///
/// Each pick is drawn with probability proportional to its weight among the options not yet
/// picked, which yields a full fallback order rather than only a favorite.
#[derive(Debug, Clone)]
pub struct ByWeight {
    config: SamplingConfig,
    rng: SmallRng,
}

impl ByWeight {
    pub fn with_config(config: SamplingConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        Self { config, rng }
    }

    pub fn config(&self) -> SamplingConfig {
        self.config
    }
}

impl Default for ByWeight {
    fn default() -> Self {
        Self::with_config(SamplingConfig::default())
    }
}

impl<E, S> SelectionPolicy<E, S> for ByWeight {
    type OptionData = f64;

    const KIND: &'static str = "RandomArbitrator";

    fn sort_options(
        &mut self,
        candidates: Vec<usize>,
        options: &mut OptionSet<'_, E, S, f64>,
        _time: Time,
        _environment: &E,
    ) -> Vec<usize> {
        let mut remaining = candidates;
        let mut ordered = Vec::with_capacity(remaining.len());

        while !remaining.is_empty() {
            let weights: Vec<f64> = remaining
                .iter()
                .map(|&index| *options.option(index).data())
                .collect();

            match WeightedIndex::new(&weights) {
                Ok(distribution) => {
                    let pick = distribution.sample(&mut self.rng);
                    ordered.push(remaining.remove(pick));
                }
                Err(WeightedError::AllWeightsZero) => {
                    debug!(
                        remaining = remaining.len(),
                        "only zero weights left, keeping insertion order"
                    );
                    ordered.append(&mut remaining);
                }
                Err(err) => {
                    // Unreachable with weights that passed `validate`.
                    debug!(
                        remaining = remaining.len(),
                        error = %err,
                        "weighted sampling failed, rejecting the remaining options"
                    );
                    break;
                }
            }
        }

        ordered
    }

    fn annotation(&self, _index: usize, weight: &f64) -> Annotation {
        Annotation::Weight(*weight)
    }

    fn validate(&self, weight: &f64) -> Result<()> {
        if !weight.is_finite() || *weight < 0.0 {
            return Err(ArbitrationError::InvalidArguments(format!(
                "option weight must be finite and non-negative, got {weight}"
            )));
        }
        Ok(())
    }
}

pub type RandomArbitrator<E, C, S = C> = Arbitrator<E, C, S, ByWeight>;

impl<E, C, S> Arbitrator<E, C, S, ByWeight> {
    pub fn with_config(name: impl Into<String>, config: SamplingConfig) -> Self {
        Self::with_policy(name, ByWeight::with_config(config))
    }

    /// Add an option with weight 1.
    pub fn add_option(&mut self, behavior: SharedBehavior<E, S>, flags: OptionFlags) {
        self.push_option(behavior, flags, 1.0);
    }

    /// Add an option selected with probability `weight` over the sum of all applicable weights.
    ///
    /// Zero is allowed and makes the option a last resort; negative or non-finite weights are
    /// rejected.
    pub fn add_option_with_weight(
        &mut self,
        behavior: SharedBehavior<E, S>,
        flags: OptionFlags,
        weight: f64,
    ) -> Result<()> {
        self.add_option_with(behavior, flags, weight)
    }
}
