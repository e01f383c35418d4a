use bitflags::bitflags;
use tracing::{debug, trace};

use crate::{
    Annotation, Cache, OptionSnapshot, PlaceboResult, Result, SharedBehavior, SharedResult, Time,
    Verifier,
};

bitflags! {
    /// Selection flags of a single option.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct OptionFlags: u8 {
        /// The option may be preempted by a higher ranked one while it is still committed.
        const INTERRUPTABLE = 0b01;
        /// The option wins even if its command fails verification.
        const FALLBACK = 0b10;
    }
}

/// A behavior held by an arbitrator or coordinator, with its flags and per-time caches.
///
/// `X` is policy specific data: `()` for priority ordering, cost estimator data for cost
/// ordering, the sampling weight for random ordering.
pub struct BehaviorOption<E, S, X = ()> {
    behavior: SharedBehavior<E, S>,
    flags: OptionFlags,
    command: Cache<Time, S>,
    verification: Cache<Time, SharedResult>,
    data: X,
}

impl<E, S, X> BehaviorOption<E, S, X> {
    pub fn new(behavior: SharedBehavior<E, S>, flags: OptionFlags, data: X) -> Self {
        Self {
            behavior,
            flags,
            command: Cache::new(),
            verification: Cache::new(),
            data,
        }
    }

    pub fn behavior(&self) -> &SharedBehavior<E, S> {
        &self.behavior
    }

    pub fn name(&self) -> String {
        self.behavior.borrow().name().to_owned()
    }

    pub fn flags(&self) -> OptionFlags {
        self.flags
    }

    pub fn has_flag(&self, flag: OptionFlags) -> bool {
        self.flags.intersects(flag)
    }

    pub fn data(&self) -> &X {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut X {
        &mut self.data
    }

    pub fn check_invocation_condition(&self, time: Time, environment: &E) -> bool {
        self.behavior
            .borrow()
            .check_invocation_condition(time, environment)
    }

    pub fn check_commitment_condition(&self, time: Time, environment: &E) -> bool {
        self.behavior
            .borrow()
            .check_commitment_condition(time, environment)
    }

    pub fn gain_control(&self, time: Time, environment: &E) {
        self.behavior.borrow_mut().gain_control(time, environment);
    }

    pub fn lose_control(&self, time: Time, environment: &E) {
        self.behavior.borrow_mut().lose_control(time, environment);
    }

    /// Verification result cached for exactly `time`, if any.
    pub fn verification_result(&self, time: Time) -> Option<SharedResult> {
        self.verification.get(&time).cloned()
    }

    pub fn cache_verification_result(&mut self, time: Time, result: SharedResult) {
        self.verification.insert(time, result);
    }

    pub fn reset_verification_result(&mut self) {
        self.verification.clear();
    }

    pub fn snapshot(&self, time: Time, environment: &E, annotation: Annotation) -> OptionSnapshot {
        OptionSnapshot {
            behavior: self.behavior.borrow().snapshot(time, environment),
            flags: self
                .flags
                .iter_names()
                .map(|(name, _)| name.to_owned())
                .collect(),
            verification_passed: self.verification_result(time).map(|result| result.is_ok()),
            annotation,
        }
    }
}

impl<E, S, X> BehaviorOption<E, S, X>
where
    S: Clone,
{
    /// Command of the behavior for `time`. The behavior is asked at most once per distinct time.
    pub fn get_command(&mut self, time: Time, environment: &E) -> Result<S> {
        if let Some(command) = self.command.get(&time) {
            return Ok(command.clone());
        }
        let command = self.behavior.borrow_mut().get_command(time, environment)?;
        self.command.insert(time, command.clone());
        Ok(command)
    }

    /// Fetch the command and run it through `verifier`, caching the outcome for `time`.
    ///
    /// Returns the command if it passed, or if the option is a fallback. Errors never escape:
    /// a verification-class error clears the cached result, any other error caches a failed one.
    pub fn get_and_verify_command(
        &mut self,
        time: Time,
        environment: &E,
        verifier: &dyn Verifier<E, S>,
    ) -> Option<S> {
        let analyzed = self.get_command(time, environment).and_then(|command| {
            let result = verifier.analyze(time, environment, &command)?;
            Ok((command, result))
        });

        match analyzed {
            Ok((command, result)) => {
                self.verification.insert(time, result.clone());
                if result.is_ok() || self.has_flag(OptionFlags::FALLBACK) {
                    return Some(command);
                }
                debug!(option = %self.name(), "option is applicable but not safe");
                trace!(option = %self.name(), result = %result, "verification result");
                None
            }
            Err(err) if err.is_verification_error() => {
                self.verification.clear();
                debug!(
                    option = %self.name(),
                    error = %err,
                    "option has no safe applicable command"
                );
                None
            }
            Err(err) => {
                self.verification.insert(time, PlaceboResult::failed());
                debug!(option = %self.name(), error = %err, "option failed to produce a command");
                None
            }
        }
    }
}
