//! # Runtime events emitted by the producer and its generation loop.
//!
//! The [`EventKind`] enum classifies event types across three categories:
//! - **Lifecycle events**: start, stop request, loop exit, stop timeout, stopped
//! - **Round events**: value generated, generation failed, wait scheduled
//! - **Subscriber events**: added, removed, failed, panicked
//!
//! The [`Event`] struct carries additional metadata such as timestamps, subscriber
//! name, the generated value, reasons and delays.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//! Use `seq` to restore the exact order when events are delivered out of order.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use randcast::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::SubscriberFailed)
//!     .with_subscriber("file-writer")
//!     .with_reason("disk full")
//!     .with_round(3);
//!
//! assert_eq!(ev.kind, EventKind::SubscriberFailed);
//! assert_eq!(ev.subscriber.as_deref(), Some("file-writer"));
//! assert_eq!(ev.reason.as_deref(), Some("disk full"));
//! assert_eq!(ev.round, Some(3));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Lifecycle events ===
    /// Producer transitioned to `Running` and spawned its loop.
    ProducerStarted,

    /// `stop` was called on a running producer; the loop has been cancelled.
    StopRequested,

    /// Generation loop returned.
    ///
    /// Sets:
    /// - `round`: number of rounds the loop started
    LoopExited,

    /// The loop did not confirm termination within the stop timeout and was aborted.
    ///
    /// Sets:
    /// - `timeout_ms`: configured stop timeout
    StopTimedOut,

    /// Producer reached `Stopped` and its registry has been cleared.
    ///
    /// Sets:
    /// - `count`: number of subscribers dropped from the registry
    ProducerStopped,

    // === Round events ===
    /// A value was generated and is about to be fanned out.
    ///
    /// Sets:
    /// - `value`: the generated value
    /// - `round`: round number (1-based, per loop)
    /// - `count`: size of the snapshot it is delivered to
    ValueGenerated,

    /// Generating the value failed; the round is skipped.
    ///
    /// Sets:
    /// - `reason`: failure message
    /// - `round`: round number
    GenerationFailed,

    /// Next round scheduled after a randomized wait.
    ///
    /// Sets:
    /// - `delay_ms`: wait before the next round
    /// - `round`: round that just finished
    WaitScheduled,

    // === Subscriber events ===
    /// Subscriber inserted into the registry.
    SubscriberAdded,

    /// Subscriber removed from the registry.
    SubscriberRemoved,

    /// Subscriber returned an error from `receive`.
    ///
    /// Sets:
    /// - `subscriber`: subscriber name
    /// - `reason`: error message
    /// - `round`: round number
    SubscriberFailed,

    /// Subscriber panicked inside `receive`.
    ///
    /// Sets:
    /// - `subscriber`: subscriber name
    /// - `reason`: panic info/message
    /// - `round`: round number
    SubscriberPanicked,
}

/// Runtime event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Name of the subscriber, if applicable.
    pub subscriber: Option<Arc<str>>,
    /// Generated value, if applicable.
    pub value: Option<Arc<str>>,
    /// Human-readable reason (errors, panic info).
    pub reason: Option<Arc<str>>,
    /// Round number within the current loop (starting from 1).
    pub round: Option<u64>,
    /// Number of subscribers involved.
    pub count: Option<usize>,
    /// Inter-round wait in milliseconds (compact).
    pub delay_ms: Option<u32>,
    /// Stop timeout in milliseconds (compact).
    pub timeout_ms: Option<u32>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            subscriber: None,
            value: None,
            reason: None,
            round: None,
            count: None,
            delay_ms: None,
            timeout_ms: None,
        }
    }

    /// Attaches a subscriber name.
    #[inline]
    pub fn with_subscriber(mut self, name: impl Into<Arc<str>>) -> Self {
        self.subscriber = Some(name.into());
        self
    }

    /// Attaches the generated value.
    #[inline]
    pub fn with_value(mut self, value: impl Into<Arc<str>>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches a round number.
    #[inline]
    pub fn with_round(mut self, round: u64) -> Self {
        self.round = Some(round);
        self
    }

    /// Attaches a subscriber count.
    #[inline]
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }

    /// Attaches an inter-round wait (stored as milliseconds).
    #[inline]
    pub fn with_delay(mut self, d: Duration) -> Self {
        self.delay_ms = Some(compact_ms(d));
        self
    }

    /// Attaches a stop timeout (stored as milliseconds).
    #[inline]
    pub fn with_timeout(mut self, d: Duration) -> Self {
        self.timeout_ms = Some(compact_ms(d));
        self
    }

    /// Creates a subscriber failure event.
    #[inline]
    pub fn subscriber_failed(subscriber: &str, round: u64, reason: impl Into<Arc<str>>) -> Self {
        Event::new(EventKind::SubscriberFailed)
            .with_subscriber(subscriber)
            .with_round(round)
            .with_reason(reason)
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &str, round: u64, info: String) -> Self {
        Event::new(EventKind::SubscriberPanicked)
            .with_subscriber(subscriber)
            .with_round(round)
            .with_reason(info)
    }

    /// True for events that report a contained failure.
    #[inline]
    pub fn is_failure(&self) -> bool {
        matches!(
            self.kind,
            EventKind::GenerationFailed
                | EventKind::SubscriberFailed
                | EventKind::SubscriberPanicked
                | EventKind::StopTimedOut
        )
    }
}

fn compact_ms(d: Duration) -> u32 {
    d.as_millis().min(u128::from(u32::MAX)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seq_is_monotonic() {
        let a = Event::new(EventKind::ProducerStarted);
        let b = Event::new(EventKind::ProducerStarted);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn test_delay_saturates() {
        let ev = Event::new(EventKind::WaitScheduled).with_delay(Duration::from_secs(u64::MAX));
        assert_eq!(ev.delay_ms, Some(u32::MAX));
    }

    #[test]
    fn test_failure_classification() {
        assert!(Event::subscriber_failed("s", 1, "x").is_failure());
        assert!(Event::subscriber_panicked("s", 1, "boom".into()).is_failure());
        assert!(!Event::new(EventKind::ValueGenerated).is_failure());
    }
}
