//! # LogWriter: bus events to `tracing`
//!
//! Drains the producer's [`Bus`] and turns each [`Event`] into a `tracing` record.
//! The builder attaches one by default.
//!
//! ## Levels
//! ```text
//! error  generation-failed, subscriber-panicked
//! warn   subscriber-failed, stop-timed-out, loop exited abnormally
//! info   producer-started, stop-requested, loop-exited, producer-stopped,
//!        subscriber-added, subscriber-removed
//! debug  value-generated, wait-scheduled
//! ```

use tokio::runtime::Handle;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::events::{Bus, Event, EventKind};

/// Event-to-log bridge.
#[derive(Default, Debug, Clone, Copy)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Subscribes to `bus` now and logs on a task spawned on `handle` until the
    /// bus closes (every sender dropped).
    pub fn spawn_on(self, handle: &Handle, bus: &Bus) -> JoinHandle<()> {
        let mut rx = bus.subscribe();
        handle.spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(ev) => self.write(&ev),
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "log writer lagged behind the event bus");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        })
    }

    /// Logs a single event.
    pub fn write(&self, e: &Event) {
        let subscriber = e.subscriber.as_deref().unwrap_or("unknown");
        let reason = e.reason.as_deref().unwrap_or("unknown");

        match e.kind {
            EventKind::ProducerStarted => info!(seq = e.seq, "producer started"),
            EventKind::StopRequested => info!(seq = e.seq, "stop requested"),
            EventKind::LoopExited => match &e.reason {
                Some(reason) => warn!(seq = e.seq, %reason, "generation loop exited abnormally"),
                None => info!(seq = e.seq, rounds = e.round, "generation loop terminated"),
            },
            EventKind::StopTimedOut => warn!(
                seq = e.seq,
                timeout_ms = e.timeout_ms,
                "generation loop did not stop in time; aborted"
            ),
            EventKind::ProducerStopped => {
                info!(seq = e.seq, dropped = e.count, "producer stopped")
            }
            EventKind::ValueGenerated => debug!(
                seq = e.seq,
                round = e.round,
                value = e.value.as_deref().unwrap_or(""),
                subscribers = e.count,
                "value generated"
            ),
            EventKind::GenerationFailed => {
                error!(seq = e.seq, round = e.round, %reason, "error in generation loop")
            }
            EventKind::WaitScheduled => {
                debug!(seq = e.seq, round = e.round, delay_ms = e.delay_ms, "next round scheduled")
            }
            EventKind::SubscriberAdded => {
                info!(seq = e.seq, %subscriber, total = e.count, "subscriber added")
            }
            EventKind::SubscriberRemoved => {
                info!(seq = e.seq, %subscriber, total = e.count, "subscriber removed")
            }
            EventKind::SubscriberFailed => warn!(
                seq = e.seq,
                %subscriber,
                round = e.round,
                %reason,
                "error notifying subscriber"
            ),
            EventKind::SubscriberPanicked => error!(
                seq = e.seq,
                %subscriber,
                round = e.round,
                %reason,
                "subscriber panicked"
            ),
        }
    }
}
