use std::cell::RefCell;
use std::rc::Rc;

use crate::{Result, Snapshot, Time};

/// The most abstract decision unit: something that can produce a command.
///
/// Leaf behaviors carry the knowledge of when they are applicable. Arbitrators and coordinators
/// implement this trait as well, so they nest into hierarchies without knowing what kind of
/// behavior they hold.
///
/// A behavior should not try to track whether it is active. That bookkeeping belongs to the
/// arbitrator calling it: `gain_control` is followed by exactly one `lose_control` before the next
/// `gain_control`, and `get_command` is only called between the two.
pub trait Behavior<E, C> {
    fn name(&self) -> &str;

    /// Produce the command realizing this behavior at `time`.
    ///
    /// Only call this if the invocation condition, or for an active behavior the commitment
    /// condition, is true for the same `time`.
    fn get_command(&mut self, time: Time, environment: &E) -> Result<C>;

    /// True if activating the behavior now would yield a sensible command.
    fn check_invocation_condition(&self, _time: Time, _environment: &E) -> bool {
        false
    }

    /// True if the behavior, given it is already active, should keep running.
    fn check_commitment_condition(&self, _time: Time, _environment: &E) -> bool {
        false
    }

    fn gain_control(&mut self, _time: Time, _environment: &E) {}

    fn lose_control(&mut self, _time: Time, _environment: &E) {}

    /// Structured view of the behavior and its current state.
    fn snapshot(&self, time: Time, environment: &E) -> Snapshot {
        Snapshot::leaf(
            self.name(),
            self.check_invocation_condition(time, environment),
            self.check_commitment_condition(time, environment),
        )
    }

    /// Human readable, ANSI colored state. `prefix` and `suffix` wrap every line after the first.
    fn to_str(&self, time: Time, environment: &E, prefix: &str, suffix: &str) -> String {
        self.snapshot(time, environment).render(prefix, suffix)
    }
}

/// Shared handle to a behavior. The same instance may sit below several arbitrators.
pub type SharedBehavior<E, C> = Rc<RefCell<dyn Behavior<E, C>>>;

/// Reference identity of two shared behaviors.
pub fn same_instance<E, C>(a: &SharedBehavior<E, C>, b: &SharedBehavior<E, C>) -> bool {
    std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
}
