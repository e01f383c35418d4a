#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use ag_core::{
    Behavior, Mergeable, PlaceboResult, Result, SharedBehavior, SharedResult, Time, Verifier,
};
use tracing_subscriber::EnvFilter;

pub const INVOCATION_TRUE: &str = "\x1b[32mINVOCATION\x1b[39m ";
pub const INVOCATION_FALSE: &str = "\x1b[31mInvocation\x1b[39m ";
pub const COMMITMENT_TRUE: &str = "\x1b[32mCOMMITMENT\x1b[39m ";
pub const COMMITMENT_FALSE: &str = "\x1b[31mCommitment\x1b[39m ";
pub const STRIKE_THROUGH_ON: &str = "×××\x08\x08\x08\x1b[9m";
pub const STRIKE_THROUGH_OFF: &str = "\x1b[29m\x1b[8m×××\x1b[28m";

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[derive(Debug, Default)]
pub struct DummyEnvironment;

/// Sequence of action names. Merging appends, so the merge order stays visible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actions(pub String);

impl Mergeable for Actions {
    fn merge(&mut self, other: Self) {
        self.0.push_str(&other.0);
    }
}

/// Command type of a parent that only cares about how many actions were merged.
#[derive(Debug, PartialEq, Eq)]
pub struct ActionCount(pub usize);

impl From<Actions> for ActionCount {
    fn from(actions: Actions) -> Self {
        Self(actions.0.len())
    }
}

#[derive(Debug, Default)]
pub struct DummyBehavior {
    pub name: String,
    pub invocation: bool,
    pub commitment: bool,
    pub gain_control_counter: usize,
    pub lose_control_counter: usize,
}

impl DummyBehavior {
    pub fn shared(invocation: bool, commitment: bool, name: &str) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self {
            name: name.to_string(),
            invocation,
            commitment,
            ..Self::default()
        }))
    }
}

impl Behavior<DummyEnvironment, Actions> for DummyBehavior {
    fn name(&self) -> &str {
        &self.name
    }

    fn get_command(&mut self, _time: Time, _environment: &DummyEnvironment) -> Result<Actions> {
        Ok(Actions(self.name.clone()))
    }

    fn check_invocation_condition(&self, _time: Time, _environment: &DummyEnvironment) -> bool {
        self.invocation
    }

    fn check_commitment_condition(&self, _time: Time, _environment: &DummyEnvironment) -> bool {
        self.commitment
    }

    fn gain_control(&mut self, _time: Time, _environment: &DummyEnvironment) {
        self.gain_control_counter += 1;
    }

    fn lose_control(&mut self, _time: Time, _environment: &DummyEnvironment) {
        self.lose_control_counter += 1;
    }
}

pub fn shared(behavior: &Rc<RefCell<DummyBehavior>>) -> SharedBehavior<DummyEnvironment, Actions> {
    behavior.clone()
}

/// Rejects the action with the given name.
pub struct RejectAction(pub &'static str);

impl Verifier<DummyEnvironment, Actions> for RejectAction {
    fn analyze(
        &self,
        _time: Time,
        _environment: &DummyEnvironment,
        command: &Actions,
    ) -> Result<SharedResult> {
        let result: SharedResult = Rc::new(PlaceboResult::new(command.0 != self.0));
        Ok(result)
    }
}

pub struct RejectEverything;

impl Verifier<DummyEnvironment, Actions> for RejectEverything {
    fn analyze(
        &self,
        _time: Time,
        _environment: &DummyEnvironment,
        _command: &Actions,
    ) -> Result<SharedResult> {
        Ok(PlaceboResult::failed())
    }
}

pub struct Fixture {
    pub a: Rc<RefCell<DummyBehavior>>,
    pub b1: Rc<RefCell<DummyBehavior>>,
    pub c: Rc<RefCell<DummyBehavior>>,
    pub b2: Rc<RefCell<DummyBehavior>>,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            a: DummyBehavior::shared(false, false, "A"),
            b1: DummyBehavior::shared(true, false, "B"),
            c: DummyBehavior::shared(true, true, "C"),
            b2: DummyBehavior::shared(true, false, "B"),
        }
    }

    pub fn all(&self) -> [SharedBehavior<DummyEnvironment, Actions>; 4] {
        [shared(&self.a), shared(&self.b1), shared(&self.c), shared(&self.b2)]
    }
}
