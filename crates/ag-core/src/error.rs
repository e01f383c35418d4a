use thiserror::Error;

/// Errors raised while arbitrating between behaviors.
#[derive(Debug, Error)]
pub enum ArbitrationError {
    /// `get_command` was called although no option can be invoked or continued.
    #[error(
        "no behavior with true invocation condition found in {name}; only call get_command() if \
         check_invocation_condition() or check_commitment_condition() is true"
    )]
    InvocationConditionIsFalse { name: String },

    #[error("none of the {attempted} applicable options passed the verification step")]
    NoApplicableOptionPassedVerification { attempted: usize },

    #[error("one of the {options} applicable options failed the verification step")]
    ApplicableOptionFailedVerification { options: usize },

    /// The verifier could not judge a command.
    #[error("verification error: {0}")]
    Verification(String),

    #[error("coordinators cannot hold the same behavior instance multiple times: {name}")]
    MultipleReferencesToSameInstance { name: String },

    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    /// Any failure reported by a behavior's own logic.
    #[error(transparent)]
    Behavior(#[from] anyhow::Error),
}

impl ArbitrationError {
    /// True for the verification family: the candidate has no safe command, as opposed to a
    /// behavior that broke while producing one.
    pub fn is_verification_error(&self) -> bool {
        matches!(
            self,
            ArbitrationError::Verification(_)
                | ArbitrationError::NoApplicableOptionPassedVerification { .. }
                | ArbitrationError::ApplicableOptionFailedVerification { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, ArbitrationError>;
