//! Error taxonomy.
//!
//! Overflow is a first-class semantic outcome, not an error — it is
//! reported as data on [`crate::stats::InvocationStat`] and drives the
//! adaptive controller's escalation. What *is* a genuine error is a
//! transport failure (timeout, HTTP error, malformed body): those
//! propagate to the caller as a fatal failure of the current join via
//! [`OracleError`] / `anyhow::Error`.

use thiserror::Error;

/// A transport-level failure talking to the oracle. Distinct from overflow.
#[derive(Debug, Error)]
pub enum OracleError {
    #[error("oracle request timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("oracle returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("oracle response could not be parsed: {0}")]
    MalformedResponse(String),

    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

/// Outcome of a single chat-completion call, distinguishing natural
/// termination from overflow (truncation by the token budget) without
/// treating overflow as an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OracleOutcome {
    /// `finish_reason == "stop"`: the oracle finished naturally.
    Complete,
    /// `finish_reason != "stop"` (notably `"length"`): the reply was
    /// truncated by the token budget.
    Overflow,
}

impl OracleOutcome {
    /// Classify a raw `finish_reason` string from the oracle response.
    pub fn from_finish_reason(finish_reason: &str) -> Self {
        if finish_reason == "stop" {
            OracleOutcome::Complete
        } else {
            OracleOutcome::Overflow
        }
    }

    pub fn is_overflow(&self) -> bool {
        matches!(self, OracleOutcome::Overflow)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stop_is_complete() {
        assert_eq!(OracleOutcome::from_finish_reason("stop"), OracleOutcome::Complete);
    }

    #[test]
    fn length_is_overflow() {
        assert!(OracleOutcome::from_finish_reason("length").is_overflow());
    }

    #[test]
    fn anything_else_is_overflow() {
        assert!(OracleOutcome::from_finish_reason("content_filter").is_overflow());
    }
}
