use thiserror::Error;

/// Errors that abort a single parse. The parser keeps its previous state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("run {run}: malformed intent combination: {reason}")]
    MalformedIntentCombination { run: usize, reason: String },

    #[error("run {run}: {kind} closed out of order")]
    UnbalancedContainer { run: usize, kind: &'static str },
}

impl ParseError {
    pub(crate) fn malformed(run: usize, reason: impl Into<String>) -> Self {
        ParseError::MalformedIntentCombination {
            run,
            reason: reason.into(),
        }
    }

    /// Index of the run the error was detected at.
    pub fn run(&self) -> usize {
        match self {
            ParseError::MalformedIntentCombination { run, .. }
            | ParseError::UnbalancedContainer { run, .. } => *run,
        }
    }
}
