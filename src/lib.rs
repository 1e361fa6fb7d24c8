//! # randcast
//!
//! **randcast** is a small publish/subscribe producer for Rust.
//!
//! A [`Producer`] runs one background task that generates random alphanumeric
//! values at random intervals and fans each value out to a set of
//! [`Subscriber`]s that can change at any time. Failing subscribers are
//! isolated, and [`Producer::stop`] wakes the loop immediately and waits for it
//! within a bounded time.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     subscribe()/unsubscribe()  (any thread, any time)
//!                 │
//!                 ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Producer                                                         │
//! │  - Registry (copy-on-write Vec<Arc<dyn Subscriber>>)              │
//! │  - Bus (broadcast events)                                         │
//! │  - random source (StdRng, forked per run)                         │
//! │  - lifecycle: Idle → Running → Stopping → Stopped                 │
//! └──────┬──────────────────────────────────────────────────▲─────────┘
//!        │ start(): spawn                                   │ stop(): cancel + bounded join
//!        ▼                                                  │
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  GenerationLoop (one tokio task)                                  │
//! │    value ─► snapshot ─► join_all(receive) ─► sleep(1..=5s)        │
//! └──────┬───────────────────────────────┬────────────────────────────┘
//!        ▼                               ▼
//!  sub1.receive(v)  sub2.receive(v) ...  Bus ──► LogWriter ──► tracing
//! ```
//!
//! ### Round
//! ```text
//! loop {
//!   ├─► cancelled? → exit
//!   ├─► value = 8..=16 symbols of [A-Za-z0-9]
//!   │       └─ Err → GenerationFailed, skip delivery
//!   ├─► snapshot = registry.snapshot()
//!   ├─► for sub in snapshot (concurrently): sub.receive(&value)
//!   │       ├─ Err   → SubscriberFailed{ subscriber }
//!   │       └─ panic → SubscriberPanicked{ subscriber }
//!   └─► select! { sleep(random wait), token.cancelled() → exit }
//! }
//! ```
//!
//! ## Features
//! | Area              | Description                                                 | Key types / traits                        |
//! |-------------------|-------------------------------------------------------------|-------------------------------------------|
//! | **Producer**      | Start/stop the generation loop, manage subscribers.         | [`Producer`], [`ProducerBuilder`]         |
//! | **Subscriber API**| Consume generated values.                                   | [`Subscriber`]                            |
//! | **Events**        | Observe what the producer does.                             | [`Bus`], [`Event`], [`EventKind`]         |
//! | **Errors**        | Typed errors for lifecycle, generation and delivery.        | [`ProducerError`], [`ReceiveError`]       |
//! | **Configuration** | Ranges and timeouts.                                        | [`ProducerConfig`]                        |
//!
//! ## Optional features
//! - `sinks` _(default)_: [`FileWriter`](sinks::FileWriter) and [`SyslogSender`](sinks::SyslogSender).
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use async_trait::async_trait;
//! use randcast::{Producer, ReceiveError, StopOutcome, Subscriber};
//!
//! struct Print;
//!
//! #[async_trait]
//! impl Subscriber for Print {
//!     async fn receive(&self, value: &str) -> Result<(), ReceiveError> {
//!         println!("{value}");
//!         Ok(())
//!     }
//! }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let producer = Producer::builder().build()?;
//!     let print: Arc<dyn Subscriber> = Arc::new(Print);
//!     producer.subscribe(print.clone());
//!
//!     producer.start()?;
//!     // ... the first value arrives immediately, later ones every 1-5s
//!     assert_eq!(producer.stop().await, StopOutcome::Joined);
//!     assert_eq!(producer.subscriber_count(), 0);
//!     Ok(())
//! }
//! ```
mod core;
mod error;
mod events;
mod subscribers;

#[cfg(feature = "sinks")]
pub mod sinks;

// ---- Public re-exports ----

pub use core::{Producer, ProducerBuilder, ProducerConfig, RunState, StopOutcome};
pub use error::{GenerateError, ProducerError, ReceiveError};
pub use events::{Bus, Event, EventKind};
pub use subscribers::{LogWriter, Subscriber};
