//! Runtime core: the producer and its generation loop.
//!
//! The public API from this module is [`Producer`] (with [`ProducerBuilder`] and
//! [`ProducerConfig`]) plus the small state types it reports.
//!
//! Internal modules:
//! - [`producer`]: lifecycle (start/stop), subscribe/unsubscribe;
//! - [`runner`]: the generation loop, one fan-out round at a time;
//! - [`generator`]: random values and inter-round waits;
//! - [`registry`]: copy-on-write subscriber registry;
//! - [`builder`]: validated construction;
//! - [`config`]: ranges and timeouts.

mod builder;
mod config;
mod generator;
mod producer;
mod registry;
mod runner;

pub use builder::ProducerBuilder;
pub use config::ProducerConfig;
pub use producer::{Producer, RunState, StopOutcome};
