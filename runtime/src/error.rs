use std::fmt;

/// Rejected input. The orchestrator's state is unchanged whenever one of
/// these is returned.
#[derive(Debug, Clone, PartialEq)]
pub enum RuntimeError {
    /// `start` has not been called yet
    NotRunning,
    /// Event does not apply to the current state
    UnexpectedEvent { event: &'static str, state: String },
    /// Option index outside the displayed options
    InvalidOption { index: usize, total: usize },
    /// Submit pressed before an answer is complete
    SubmitDisabled,
    /// No drag token with this id on the board
    UnknownToken { token: String },
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuntimeError::NotRunning => {
                write!(f, "ERROR: Quiz is not running")
            }
            RuntimeError::UnexpectedEvent { event, state } => {
                write!(f, "ERROR: Cannot {} during {}", event, state)
            }
            RuntimeError::InvalidOption { index, total } => {
                write!(
                    f,
                    "ERROR: Invalid option {}, choose between 1 and {}",
                    index + 1,
                    total
                )
            }
            RuntimeError::SubmitDisabled => {
                write!(f, "ERROR: Answer is not complete yet")
            }
            RuntimeError::UnknownToken { token } => {
                write!(f, "ERROR: Unknown scenario: {}", token)
            }
        }
    }
}

impl std::error::Error for RuntimeError {}
