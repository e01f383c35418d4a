use core::marker::PhantomData;

use ag_core::{
    ArbitrationError, Behavior, BehaviorOption, OptionFlags, PlaceboVerifier, Result,
    SharedBehavior, Snapshot, Time, Verifier,
};
use tracing::debug;

/// Ordering of applicable options, the only part that differs between arbitrators.
pub trait SelectionPolicy<E, S> {
    /// Per-option data the policy needs (cost estimator, weight, ...).
    type OptionData;

    /// Kind reported in snapshots.
    const KIND: &'static str;

    /// Order `candidates` (indices into `options`, ascending) best first.
    ///
    /// Candidates left out of the result are treated as rejected. Implementations that probe
    /// commands must balance every `gain_control` they issue with a `lose_control` for options
    /// that are not active.
    fn sort_options(
        &mut self,
        candidates: Vec<usize>,
        options: &mut OptionSet<'_, E, S, Self::OptionData>,
        time: Time,
        environment: &E,
    ) -> Vec<usize>;

    fn annotation(&self, index: usize, data: &Self::OptionData) -> ag_core::Annotation;

    /// Check per-option data before it is stored. Accepts everything by default.
    fn validate(&self, _data: &Self::OptionData) -> Result<()> {
        Ok(())
    }
}

/// Mutable view of an arbitrator's options handed to a [`SelectionPolicy`].
pub struct OptionSet<'a, E, S, X> {
    options: &'a mut [BehaviorOption<E, S, X>],
    active: Option<usize>,
    verifier: &'a dyn Verifier<E, S>,
}

impl<E, S, X> OptionSet<'_, E, S, X> {
    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    pub fn is_active(&self, index: usize) -> bool {
        self.active == Some(index)
    }

    pub fn option(&self, index: usize) -> &BehaviorOption<E, S, X> {
        &self.options[index]
    }

    pub fn option_mut(&mut self, index: usize) -> &mut BehaviorOption<E, S, X> {
        &mut self.options[index]
    }

    pub fn iter_mut(&mut self) -> core::slice::IterMut<'_, BehaviorOption<E, S, X>> {
        self.options.iter_mut()
    }
}

impl<E, S: Clone, X> OptionSet<'_, E, S, X> {
    pub fn get_and_verify_command(
        &mut self,
        index: usize,
        time: Time,
        environment: &E,
    ) -> Option<S> {
        self.options[index].get_and_verify_command(time, environment, self.verifier)
    }
}

/// Generic arbitrator: holds options in insertion order and at most one active option.
///
/// Per tick, an active option that is committed and not interruptable is continued as long as its
/// command verifies. Otherwise all applicable options (the active one included) are ordered by
/// the policy and tried in turn; the first whose command verifies, or which is a fallback, wins.
pub struct Arbitrator<E, C, S, P>
where
    P: SelectionPolicy<E, S>,
{
    name: String,
    options: Vec<BehaviorOption<E, S, P::OptionData>>,
    active: Option<usize>,
    verifier: Box<dyn Verifier<E, S>>,
    policy: P,
    _command: PhantomData<fn() -> C>,
}

impl<E, C, S, P> Arbitrator<E, C, S, P>
where
    P: SelectionPolicy<E, S> + Default,
{
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_policy(name, P::default())
    }
}

impl<E, C, S, P> Arbitrator<E, C, S, P>
where
    P: SelectionPolicy<E, S>,
{
    pub fn with_policy(name: impl Into<String>, policy: P) -> Self {
        Self {
            name: name.into(),
            options: Vec::new(),
            active: None,
            verifier: Box::new(PlaceboVerifier),
            policy,
            _command: PhantomData,
        }
    }

    pub fn with_verifier(mut self, verifier: impl Verifier<E, S> + 'static) -> Self {
        self.verifier = Box::new(verifier);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    /// Append an option with explicit policy data. Later options rank lower where order matters.
    ///
    /// Fails with `InvalidArguments` if the policy rejects `data`.
    pub fn add_option_with(
        &mut self,
        behavior: SharedBehavior<E, S>,
        flags: OptionFlags,
        data: P::OptionData,
    ) -> Result<()> {
        self.policy.validate(&data)?;
        self.push_option(behavior, flags, data);
        Ok(())
    }

    /// Append without validation, for policy data that is valid by construction.
    pub(crate) fn push_option(
        &mut self,
        behavior: SharedBehavior<E, S>,
        flags: OptionFlags,
        data: P::OptionData,
    ) {
        self.options.push(BehaviorOption::new(behavior, flags, data));
    }

    pub fn options(&self) -> &[BehaviorOption<E, S, P::OptionData>] {
        &self.options
    }

    /// Position of `option` in this arbitrator, compared by address.
    pub fn option_index(&self, option: &BehaviorOption<E, S, P::OptionData>) -> Result<usize> {
        self.options
            .iter()
            .position(|candidate| core::ptr::eq(candidate, option))
            .ok_or_else(|| {
                ArbitrationError::InvalidArguments(format!(
                    "option {} is not held by {}",
                    option.name(),
                    self.name
                ))
            })
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    fn is_applicable(&self, index: usize, time: Time, environment: &E) -> bool {
        let option = &self.options[index];
        let continues = self.active == Some(index)
            && option.check_commitment_condition(time, environment);
        continues || option.check_invocation_condition(time, environment)
    }

    fn applicable_options(&self, time: Time, environment: &E) -> Vec<usize> {
        (0..self.options.len())
            .filter(|&index| self.is_applicable(index, time, environment))
            .collect()
    }

    fn deactivate(&mut self, time: Time, environment: &E) {
        if let Some(index) = self.active.take() {
            debug!(
                arbitrator = %self.name,
                option = %self.options[index].name(),
                "option lost control"
            );
            self.options[index].lose_control(time, environment);
        }
    }
}

impl<E, C, S, P> Arbitrator<E, C, S, P>
where
    P: SelectionPolicy<E, S>,
    S: Clone,
{
    fn continue_active(&mut self, time: Time, environment: &E) -> Option<S> {
        let index = self.active?;

        if !self.options[index].check_commitment_condition(time, environment) {
            self.deactivate(time, environment);
            return None;
        }
        if self.options[index].has_flag(OptionFlags::INTERRUPTABLE) {
            return None;
        }

        let command =
            self.options[index].get_and_verify_command(time, environment, &*self.verifier);
        if command.is_none() {
            self.deactivate(time, environment);
        }
        command
    }

    fn rank_options(&mut self, candidates: Vec<usize>, time: Time, environment: &E) -> Vec<usize> {
        let Self {
            options,
            active,
            verifier,
            policy,
            ..
        } = self;
        let mut set = OptionSet {
            options: options.as_mut_slice(),
            active: *active,
            verifier: &**verifier,
        };
        policy.sort_options(candidates, &mut set, time, environment)
    }

    fn select_from(
        &mut self,
        ranked: Vec<usize>,
        attempted: usize,
        time: Time,
        environment: &E,
    ) -> Result<S> {
        for index in ranked {
            let was_active = self.active == Some(index);
            // The candidate and the active option may both hold control until verification ends.
            if !was_active {
                self.options[index].gain_control(time, environment);
            }

            let command =
                self.options[index].get_and_verify_command(time, environment, &*self.verifier);
            match command {
                Some(command) => {
                    if !was_active {
                        if let Some(previous) = self.active.replace(index) {
                            self.options[previous].lose_control(time, environment);
                        }
                        debug!(
                            arbitrator = %self.name,
                            option = %self.options[index].name(),
                            "option gained control"
                        );
                    }
                    return Ok(command);
                }
                None => {
                    self.options[index].lose_control(time, environment);
                    if was_active {
                        self.active = None;
                    }
                }
            }
        }

        // The policy may have dropped the active option from the ranking without trying it.
        self.deactivate(time, environment);
        Err(ArbitrationError::NoApplicableOptionPassedVerification { attempted })
    }
}

impl<E, C, S, P> Behavior<E, C> for Arbitrator<E, C, S, P>
where
    P: SelectionPolicy<E, S>,
    S: Clone,
    C: From<S>,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn get_command(&mut self, time: Time, environment: &E) -> Result<C> {
        if let Some(command) = self.continue_active(time, environment) {
            return Ok(C::from(command));
        }

        let applicable = self.applicable_options(time, environment);
        if applicable.is_empty() {
            return Err(ArbitrationError::InvocationConditionIsFalse {
                name: self.name.clone(),
            });
        }

        let attempted = applicable.len();
        let ranked = self.rank_options(applicable, time, environment);
        self.select_from(ranked, attempted, time, environment)
            .map(C::from)
    }

    fn check_invocation_condition(&self, time: Time, environment: &E) -> bool {
        self.options
            .iter()
            .any(|option| option.check_invocation_condition(time, environment))
    }

    /// An inactive arbitrator is never committed. An active one is committed while its active
    /// option is committed or any option can be invoked.
    fn check_commitment_condition(&self, time: Time, environment: &E) -> bool {
        let Some(index) = self.active else {
            return false;
        };
        self.options[index].check_commitment_condition(time, environment)
            || self.check_invocation_condition(time, environment)
    }

    fn lose_control(&mut self, time: Time, environment: &E) {
        self.deactivate(time, environment);
    }

    fn snapshot(&self, time: Time, environment: &E) -> Snapshot {
        Snapshot {
            kind: P::KIND.to_string(),
            name: self.name.clone(),
            invocation_condition: self.check_invocation_condition(time, environment),
            commitment_condition: self.check_commitment_condition(time, environment),
            options: self
                .options
                .iter()
                .enumerate()
                .map(|(index, option)| {
                    option.snapshot(time, environment, self.policy.annotation(index, option.data()))
                })
                .collect(),
            active_options: self.active.into_iter().collect(),
        }
    }
}
