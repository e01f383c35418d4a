use core::marker::PhantomData;

use ag_core::{
    Annotation, ArbitrationError, Behavior, BehaviorOption, Mergeable, OptionFlags,
    PlaceboVerifier, Result, SharedBehavior, Snapshot, Time, Verifier,
};
use tracing::debug;

/// All-or-nothing coordinator: runs every option together and merges all of their commands.
///
/// Invocable only if every option is invocable. Once active, it stays committed while at least one
/// option is committed.
pub struct ConjunctiveCoordinator<E, C, S = C> {
    name: String,
    options: Vec<BehaviorOption<E, S>>,
    is_active: bool,
    verifier: Box<dyn Verifier<E, S>>,
    _command: PhantomData<fn() -> C>,
}

impl<E, C, S> ConjunctiveCoordinator<E, C, S> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            options: Vec::new(),
            is_active: false,
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
        self.is_active
    }
}

impl<E, C, S> Behavior<E, C> for ConjunctiveCoordinator<E, C, S>
where
    S: Clone + Mergeable,
    C: From<S>,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn get_command(&mut self, time: Time, environment: &E) -> Result<C> {
        let count = self.options.len();
        let mut merged: Option<S> = None;
        for option in &mut self.options {
            let Some(command) = option.get_and_verify_command(time, environment, &*self.verifier)
            else {
                debug!(
                    coordinator = %self.name,
                    option = %option.name(),
                    "option failed verification"
                );
                return Err(ArbitrationError::ApplicableOptionFailedVerification { options: count });
            };
            merged = Some(match merged.take() {
                Some(mut merged) => {
                    merged.merge(command);
                    merged
                }
                None => command,
            });
        }

        merged
            .map(C::from)
            .ok_or_else(|| ArbitrationError::InvocationConditionIsFalse {
                name: self.name.clone(),
            })
    }

    fn check_invocation_condition(&self, time: Time, environment: &E) -> bool {
        !self.options.is_empty()
            && self
                .options
                .iter()
                .all(|option| option.check_invocation_condition(time, environment))
    }

    fn check_commitment_condition(&self, time: Time, environment: &E) -> bool {
        self.is_active
            && self
                .options
                .iter()
                .any(|option| option.check_commitment_condition(time, environment))
    }

    fn gain_control(&mut self, time: Time, environment: &E) {
        for option in &self.options {
            option.gain_control(time, environment);
        }
        self.is_active = true;
        debug!(coordinator = %self.name, options = self.options.len(), "gained control");
    }

    fn lose_control(&mut self, time: Time, environment: &E) {
        self.is_active = false;
        for option in &self.options {
            option.lose_control(time, environment);
        }
        debug!(coordinator = %self.name, "lost control");
    }

    fn snapshot(&self, time: Time, environment: &E) -> Snapshot {
        Snapshot {
            kind: "ConjunctiveCoordinator".to_string(),
            name: self.name.clone(),
            invocation_condition: self.check_invocation_condition(time, environment),
            commitment_condition: self.check_commitment_condition(time, environment),
            options: self
                .options
                .iter()
                .map(|option| option.snapshot(time, environment, Annotation::Member))
                .collect(),
            active_options: if self.is_active {
                (0..self.options.len()).collect()
            } else {
                Vec::new()
            },
        }
    }
}
