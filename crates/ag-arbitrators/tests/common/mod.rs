#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use ag_arbitrators::CostEstimator;
use ag_core::{
    ArbitrationError, Behavior, PlaceboResult, Result, SharedBehavior, SharedResult, Time, Verifier,
};
use tracing_subscriber::EnvFilter;

pub const INVOCATION_TRUE: &str = "\x1b[32mINVOCATION\x1b[39m ";
pub const INVOCATION_FALSE: &str = "\x1b[31mInvocation\x1b[39m ";
pub const COMMITMENT_TRUE: &str = "\x1b[32mCOMMITMENT\x1b[39m ";
pub const COMMITMENT_FALSE: &str = "\x1b[31mCommitment\x1b[39m ";

/// Route engine logs to the test output. Filter with `RUST_LOG`, e.g. `RUST_LOG=ag_core=debug`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[derive(Debug, Default)]
pub struct DummyEnvironment;

/// Leaf behavior whose command is its own name. Counts control transitions and command requests.
#[derive(Debug, Default)]
pub struct DummyBehavior {
    pub name: String,
    pub invocation: bool,
    pub commitment: bool,
    pub fail: bool,
    pub gain_control_counter: usize,
    pub lose_control_counter: usize,
    pub get_command_counter: usize,
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

impl Behavior<DummyEnvironment, String> for DummyBehavior {
    fn name(&self) -> &str {
        &self.name
    }

    fn get_command(&mut self, _time: Time, _environment: &DummyEnvironment) -> Result<String> {
        self.get_command_counter += 1;
        if self.fail {
            return Err(anyhow::anyhow!("{} failed to plan", self.name).into());
        }
        Ok(self.name.clone())
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

pub fn shared(behavior: &Rc<RefCell<DummyBehavior>>) -> SharedBehavior<DummyEnvironment, String> {
    behavior.clone()
}

/// Rejects one specific command.
pub struct RejectCommand(pub &'static str);

impl Verifier<DummyEnvironment, String> for RejectCommand {
    fn analyze(
        &self,
        _time: Time,
        _environment: &DummyEnvironment,
        command: &String,
    ) -> Result<SharedResult> {
        let result: SharedResult = Rc::new(PlaceboResult::new(command != self.0));
        Ok(result)
    }
}

/// Refuses to judge one specific command.
pub struct CannotJudge(pub &'static str);

impl Verifier<DummyEnvironment, String> for CannotJudge {
    fn analyze(
        &self,
        _time: Time,
        _environment: &DummyEnvironment,
        command: &String,
    ) -> Result<SharedResult> {
        if command == self.0 {
            return Err(ArbitrationError::Verification(format!("cannot judge {command}")));
        }
        Ok(PlaceboResult::passed())
    }
}

/// Looks up the cost of a command by name. Unknown commands cost 1.
///
/// Activation costs penalize switching: inactive options pay them on top of their base cost.
#[derive(Debug, Default)]
pub struct CostTable {
    costs: BTreeMap<String, f64>,
    activation_costs: f64,
    pub calls: RefCell<Vec<(String, bool)>>,
}

impl CostTable {
    pub fn new(costs: &[(&str, f64)]) -> Rc<Self> {
        Self::with_activation_costs(costs, 0.0)
    }

    pub fn with_activation_costs(costs: &[(&str, f64)], activation_costs: f64) -> Rc<Self> {
        Rc::new(Self {
            costs: costs
                .iter()
                .map(|(name, cost)| (name.to_string(), *cost))
                .collect(),
            activation_costs,
            calls: RefCell::new(Vec::new()),
        })
    }
}

impl CostEstimator<DummyEnvironment, String> for CostTable {
    fn estimate_cost(
        &self,
        _time: Time,
        _environment: &DummyEnvironment,
        command: &String,
        is_active: bool,
    ) -> f64 {
        self.calls.borrow_mut().push((command.clone(), is_active));
        let cost = self.costs.get(command).copied().unwrap_or(1.0);
        if is_active {
            cost / (1.0 + self.activation_costs)
        } else {
            (cost + self.activation_costs) / (1.0 + self.activation_costs)
        }
    }
}
