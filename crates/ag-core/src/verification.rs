use core::fmt;
use std::rc::Rc;

use crate::{Result, Time};

/// Outcome of analyzing a single command.
pub trait VerificationResult: fmt::Debug {
    fn is_ok(&self) -> bool;
}

pub type SharedResult = Rc<dyn VerificationResult>;

impl fmt::Display for dyn VerificationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(if self.is_ok() { "is okay" } else { "is not okay" })
    }
}

/// Safety gate judging a candidate command before an arbitrator commits to it.
///
/// Return `ArbitrationError::Verification` if the command cannot be judged at all; that is
/// treated differently from an `Ok` result that is not ok.
pub trait Verifier<E, S> {
    fn analyze(&self, time: Time, environment: &E, command: &S) -> Result<SharedResult>;
}

/// Plain boolean result. Also used for the synthetic not-ok result of a failing behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaceboResult {
    ok: bool,
}

impl PlaceboResult {
    pub const fn new(ok: bool) -> Self {
        Self { ok }
    }

    pub fn passed() -> SharedResult {
        Rc::new(Self::new(true))
    }

    pub fn failed() -> SharedResult {
        Rc::new(Self::new(false))
    }
}

impl Default for PlaceboResult {
    fn default() -> Self {
        Self::new(true)
    }
}

impl VerificationResult for PlaceboResult {
    fn is_ok(&self) -> bool {
        self.ok
    }
}

/// Accepts every command.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlaceboVerifier;

impl<E, S> Verifier<E, S> for PlaceboVerifier {
    fn analyze(&self, _time: Time, _environment: &E, _command: &S) -> Result<SharedResult> {
        Ok(PlaceboResult::passed())
    }
}
