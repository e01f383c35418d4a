use core::marker::PhantomData;
use std::collections::BTreeSet;

use ag_core::{
    Annotation, ArbitrationError, Behavior, BehaviorOption, Mergeable, OptionFlags,
    PlaceboVerifier, Result, SharedBehavior, Snapshot, Time, Verifier,
};
use tracing::debug;

/// Partial coordinator: merges the commands of whichever options are applicable this tick.
///
/// An option is applicable if it is invocable, or if it is active and still committed. Options
/// whose command fails verification are dropped from the merge and lose control; the tick only
/// fails if none of the applicable options is safe.
pub struct JointCoordinator<E, C, S = C> {
    name: String,
    options: Vec<BehaviorOption<E, S>>,
    active: BTreeSet<usize>,
    verifier: Box<dyn Verifier<E, S>>,
    _command: PhantomData<fn() -> C>,
}

impl<E, C, S> JointCoordinator<E, C, S> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            options: Vec::new(),
            active: BTreeSet::new(),
            verifier: Box::new(PlaceboVerifier),
            _command: PhantomData,
        }
    }

    pub fn with_verifier(mut self, verifier: impl Verifier<E, S> + 'static) -> Self {
        self.verifier = Box::new(verifier);
        self
    }

    /// Fails if `behavior` is already held by this coordinator.
    pub fn add_option(&mut self, behavior: SharedBehavior<E, S>, flags: OptionFlags) -> Result<()> {
        crate::ensure_unique(&self.options, &behavior)?;
        self.options.push(BehaviorOption::new(behavior, flags, ()));
        Ok(())
    }

    pub fn options(&self) -> &[BehaviorOption<E, S>] {
        &self.options
    }

    pub fn is_active(&self) -> bool {
        !self.active.is_empty()
    }

    /// Indices of the options currently holding control, ascending.
    pub fn active_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.active.iter().copied()
    }

    fn release(&mut self, index: usize, time: Time, environment: &E) {
        if self.active.remove(&index) {
            self.options[index].lose_control(time, environment);
            debug!(
                coordinator = %self.name,
                option = %self.options[index].name(),
                "option lost control"
            );
        }
    }
}

impl<E, C, S> Behavior<E, C> for JointCoordinator<E, C, S>
where
    S: Clone + Mergeable,
    C: From<S>,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn get_command(&mut self, time: Time, environment: &E) -> Result<C> {
        let mut merged: Option<S> = None;
        let mut attempted = 0;

        for index in 0..self.options.len() {
            let was_active = self.active.contains(&index);
            let continues =
                was_active && self.options[index].check_commitment_condition(time, environment);
            if !continues && !self.options[index].check_invocation_condition(time, environment) {
                self.release(index, time, environment);
                continue;
            }

            attempted += 1;
            if !was_active {
                self.options[index].gain_control(time, environment);
                self.active.insert(index);
            }

            match self.options[index].get_and_verify_command(time, environment, &*self.verifier) {
                Some(command) => {
                    merged = Some(match merged.take() {
                        Some(mut merged) => {
                            merged.merge(command);
                            merged
                        }
                        None => command,
                    });
                }
                None => self.release(index, time, environment),
            }
        }

        if attempted == 0 {
            return Err(ArbitrationError::InvocationConditionIsFalse {
                name: self.name.clone(),
            });
        }
        merged
            .map(C::from)
            .ok_or(ArbitrationError::NoApplicableOptionPassedVerification { attempted })
    }

    fn check_invocation_condition(&self, time: Time, environment: &E) -> bool {
        self.options
            .iter()
            .any(|option| option.check_invocation_condition(time, environment))
    }

    fn check_commitment_condition(&self, time: Time, environment: &E) -> bool {
        self.active
            .iter()
            .any(|&index| self.options[index].check_commitment_condition(time, environment))
    }

    fn gain_control(&mut self, time: Time, environment: &E) {
        for (index, option) in self.options.iter().enumerate() {
            if self.active.contains(&index) || !option.check_invocation_condition(time, environment)
            {
                continue;
            }
            option.gain_control(time, environment);
            self.active.insert(index);
        }
        debug!(coordinator = %self.name, active = self.active.len(), "gained control");
    }

    fn lose_control(&mut self, time: Time, environment: &E) {
        for index in core::mem::take(&mut self.active) {
            self.options[index].lose_control(time, environment);
        }
        debug!(coordinator = %self.name, "lost control");
    }

    fn snapshot(&self, time: Time, environment: &E) -> Snapshot {
        Snapshot {
            kind: "JointCoordinator".to_string(),
            name: self.name.clone(),
            invocation_condition: self.check_invocation_condition(time, environment),
            commitment_condition: self.check_commitment_condition(time, environment),
            options: self
                .options
                .iter()
                .map(|option| option.snapshot(time, environment, Annotation::Member))
                .collect(),
            active_options: self.active.iter().copied().collect(),
        }
    }
}
