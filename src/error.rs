//! Error types used by the producer runtime and by subscribers.
//!
//! This module defines three enums:
//!
//! - [`ProducerError`]: errors surfaced to callers of the producer API (build/start).
//! - [`GenerateError`]: failures while drawing a value or a wait; never leave the loop.
//! - [`ReceiveError`]: failures returned by a [`Subscriber`](crate::Subscriber).
//!
//! All of them provide `as_label` for logs/events.

use thiserror::Error;

use crate::core::RunState;

/// # Errors produced by the producer runtime.
///
/// Only lifecycle operations can fail; nothing that happens inside the
/// generation loop is ever reported through this type.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ProducerError {
    /// The producer is not in a state that allows the requested transition.
    #[error("producer is {state}; cannot start")]
    InvalidState {
        /// State observed when the transition was attempted.
        state: RunState,
    },

    /// No tokio runtime is available to spawn the generation loop on.
    #[error("no tokio runtime available to spawn the generation loop")]
    NoRuntime,

    /// The operating system random source could not seed the generator.
    #[error("random source unavailable: {reason}")]
    RandomSource {
        /// Underlying OS error.
        reason: String,
    },

    /// Configuration failed validation.
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// What is wrong with it.
        reason: String,
    },
}

impl ProducerError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use randcast::{ProducerError, RunState};
    ///
    /// let err = ProducerError::InvalidState { state: RunState::Running };
    /// assert_eq!(err.as_label(), "producer_invalid_state");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ProducerError::InvalidState { .. } => "producer_invalid_state",
            ProducerError::NoRuntime => "producer_no_runtime",
            ProducerError::RandomSource { .. } => "producer_random_source",
            ProducerError::InvalidConfig { .. } => "producer_invalid_config",
        }
    }
}

/// # Errors produced while generating a value or a wait duration.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerateError {
    /// An inclusive range had `min > max` (or was otherwise unusable).
    #[error("invalid {what} range {min}..={max}")]
    InvalidRange {
        /// Which range (`"length"` or `"interval"`).
        what: &'static str,
        /// Lower bound.
        min: u64,
        /// Upper bound.
        max: u64,
    },
}

impl GenerateError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            GenerateError::InvalidRange { .. } => "generate_invalid_range",
        }
    }
}

/// # Errors returned by a subscriber's `receive`.
///
/// The producer contains these: they are published as
/// [`EventKind::SubscriberFailed`](crate::EventKind::SubscriberFailed) and never
/// interrupt the round or the loop.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ReceiveError {
    /// The subscriber refused or could not process the value.
    #[error("rejected: {reason}")]
    Rejected {
        /// Human-readable reason.
        reason: String,
    },

    /// I/O failure while persisting or forwarding the value.
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

impl ReceiveError {
    /// Shorthand for [`ReceiveError::Rejected`].
    pub fn rejected(reason: impl Into<String>) -> Self {
        ReceiveError::Rejected {
            reason: reason.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use randcast::ReceiveError;
    ///
    /// assert_eq!(ReceiveError::rejected("full").as_label(), "receive_rejected");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ReceiveError::Rejected { .. } => "receive_rejected",
            ReceiveError::Io(_) => "receive_io",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_state_message_names_state() {
        let err = ProducerError::InvalidState {
            state: RunState::Stopping,
        };
        assert_eq!(err.to_string(), "producer is stopping; cannot start");
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope");
        let err: ReceiveError = io.into();
        assert_eq!(err.as_label(), "receive_io");
        assert!(err.to_string().contains("nope"));
    }

    #[test]
    fn test_generate_error_display() {
        let err = GenerateError::InvalidRange {
            what: "length",
            min: 16,
            max: 8,
        };
        assert_eq!(err.to_string(), "invalid length range 16..=8");
    }
}
