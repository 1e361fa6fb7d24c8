//! # Generation loop: one long-lived task per running producer.
//!
//! ## Architecture
//! ```text
//! Producer::start ──► tokio::spawn(GenerationLoop::run(token))
//!
//! loop {
//!   ├─► next_value()
//!   ├─► token cancelled? → exit without delivering
//!   ├─► round += 1
//!   │     ├─ Err → publish GenerationFailed (round skipped)
//!   │     └─ Ok  → snapshot registry → publish ValueGenerated
//!   │              └─► join_all(receive(value) per subscriber)
//!   │                    ├─ Err   → publish SubscriberFailed
//!   │                    └─ panic → publish SubscriberPanicked
//!   ├─► next_wait() → publish WaitScheduled
//!   └─► select! { sleep(wait) => continue, token.cancelled() => exit }
//! }
//! publish LoopExited{ rounds }
//! ```
//!
//! ## Rules
//! - The only suspension point owned by the loop is the inter-round wait, and it
//!   is cancellable: `stop` never waits for a full random interval.
//! - Cancellation is a clean exit, never reported as a failure.
//! - A round delivers to the snapshot taken at its start; subscribers added later
//!   wait for the next round, subscribers removed later still get this value.
//! - Nothing that fails inside a round ends the loop.

use std::{any::Any, panic::AssertUnwindSafe, sync::Arc, time::Duration};

use futures::{FutureExt, future::join_all};
use tokio::{select, time};
use tokio_util::sync::CancellationToken;

use crate::{
    core::{generator::ValueGenerator, registry::Registry},
    events::{Bus, Event, EventKind},
    subscribers::Subscriber,
};

/// State owned by the background task of a running producer.
pub struct GenerationLoop {
    generator: ValueGenerator,
    registry: Arc<Registry>,
    bus: Bus,
    fallback_wait: Duration,
}

impl GenerationLoop {
    /// Creates a loop delivering to `registry` and reporting to `bus`.
    ///
    /// `fallback_wait` is used when a wait cannot be drawn.
    pub fn new(
        generator: ValueGenerator,
        registry: Arc<Registry>,
        bus: Bus,
        fallback_wait: Duration,
    ) -> Self {
        Self {
            generator,
            registry,
            bus,
            fallback_wait,
        }
    }

    /// Runs rounds until `token` is cancelled. Returns the number of rounds delivered
    /// or skipped; a value generated after cancellation is discarded.
    pub async fn run(mut self, token: CancellationToken) -> u64 {
        let mut round: u64 = 0;

        loop {
            let generated = self.generator.next_value();
            if token.is_cancelled() {
                break;
            }
            round += 1;

            match generated {
                Ok(value) => self.fan_out(round, Arc::from(value)).await,
                Err(e) => self.bus.publish(
                    Event::new(EventKind::GenerationFailed)
                        .with_round(round)
                        .with_reason(e.to_string()),
                ),
            }

            let wait = match self.generator.next_wait() {
                Ok(wait) => wait,
                Err(e) => {
                    self.bus.publish(
                        Event::new(EventKind::GenerationFailed)
                            .with_round(round)
                            .with_reason(e.to_string()),
                    );
                    self.fallback_wait
                }
            };
            self.bus.publish(
                Event::new(EventKind::WaitScheduled)
                    .with_round(round)
                    .with_delay(wait),
            );

            let sleep = time::sleep(wait);
            tokio::pin!(sleep);
            select! {
                _ = &mut sleep => {}
                _ = token.cancelled() => { break; }
            }
        }

        self.bus
            .publish(Event::new(EventKind::LoopExited).with_round(round));
        round
    }

    /// Delivers `value` to the registry snapshot taken now.
    async fn fan_out(&self, round: u64, value: Arc<str>) {
        let snapshot = self.registry.snapshot();
        self.bus.publish(
            Event::new(EventKind::ValueGenerated)
                .with_value(Arc::clone(&value))
                .with_round(round)
                .with_count(snapshot.len()),
        );

        join_all(
            snapshot
                .iter()
                .map(|sub| deliver(sub.as_ref(), &value, round, &self.bus)),
        )
        .await;
    }
}

/// Calls `sub.receive(value)`, turning errors and panics into events.
async fn deliver(sub: &dyn Subscriber, value: &str, round: u64, bus: &Bus) {
    // `receive` is called inside the wrapper so a panic raised before the
    // future is returned is caught too.
    let fut = async { sub.receive(value).await };

    match AssertUnwindSafe(fut).catch_unwind().await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => bus.publish(Event::subscriber_failed(sub.name(), round, e.to_string())),
        Err(panic_err) => bus.publish(Event::subscriber_panicked(
            sub.name(),
            round,
            panic_message(&*panic_err),
        )),
    }
}

fn panic_message(any: &(dyn Any + Send)) -> String {
    if let Some(msg) = any.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = any.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
