//! # Producer configuration.
//!
//! Provides [`ProducerConfig`] centralized settings for the generation loop and
//! its lifecycle.
//!
//! Config is used in two ways:
//! 1. **Producer creation**: `Producer::builder().config(cfg).build()`
//! 2. **Loop parameters**: value length range and inter-event wait range
//!
//! ## Sentinel values
//! - `stop_timeout = 0s` → the loop is aborted unless it has already exited when `stop` polls it

use std::time::Duration;

use crate::error::ProducerError;

/// Configuration for a [`Producer`](crate::Producer).
///
/// ## Field semantics
/// - `min_len`/`max_len`: inclusive length range of generated values
/// - `min_interval`/`max_interval`: inclusive range of the wait between rounds
/// - `stop_timeout`: bound on how long `stop` waits for the loop to exit
/// - `bus_capacity`: event bus ring buffer size (min 1; clamped by Bus)
///
/// All fields are public. Call [`validate`](Self::validate) (the builder does)
/// before handing a hand-edited config to a producer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProducerConfig {
    /// Minimum value length (inclusive).
    pub min_len: usize,
    /// Maximum value length (inclusive).
    pub max_len: usize,

    /// Minimum wait between two rounds (inclusive).
    pub min_interval: Duration,
    /// Maximum wait between two rounds (inclusive).
    ///
    /// A subscriber registered before `start` sees its first value no later
    /// than roughly this long after the loop starts.
    pub max_interval: Duration,

    /// Maximum time `stop` waits for the loop to confirm termination.
    ///
    /// When exceeded, the loop task is aborted and `stop` returns
    /// [`StopOutcome::TimedOut`](crate::StopOutcome::TimedOut).
    pub stop_timeout: Duration,

    /// Capacity of the event bus broadcast channel ring buffer.
    pub bus_capacity: usize,
}

impl ProducerConfig {
    /// Checks that ranges are non-empty and values are non-empty.
    pub fn validate(&self) -> Result<(), ProducerError> {
        if self.min_len == 0 {
            return Err(ProducerError::InvalidConfig {
                reason: "min_len must be at least 1".into(),
            });
        }
        if self.min_len > self.max_len {
            return Err(ProducerError::InvalidConfig {
                reason: format!(
                    "min_len ({}) exceeds max_len ({})",
                    self.min_len, self.max_len
                ),
            });
        }
        if self.min_interval > self.max_interval {
            return Err(ProducerError::InvalidConfig {
                reason: format!(
                    "min_interval ({:?}) exceeds max_interval ({:?})",
                    self.min_interval, self.max_interval
                ),
            });
        }
        Ok(())
    }

    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for ProducerConfig {
    /// Default configuration:
    ///
    /// - values of 8..=16 symbols
    /// - waits of 1000..=5000 ms
    /// - `stop_timeout = 1000ms`
    /// - `bus_capacity = 1024`
    fn default() -> Self {
        Self {
            min_len: 8,
            max_len: 16,
            min_interval: Duration::from_millis(1000),
            max_interval: Duration::from_millis(5000),
            stop_timeout: Duration::from_millis(1000),
            bus_capacity: 1024,
        }
    }
}
