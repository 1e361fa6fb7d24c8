//! Runtime events: types and broadcast bus.
//!
//! This module groups the event **data model** and the **bus** used to
//! publish/observe what the producer and its generation loop are doing.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: `Producer` (start/stop/subscribe/unsubscribe) and the
//!   generation loop (values, failures, waits, exit).
//! - **Consumers**: [`LogWriter`](crate::LogWriter) and any receiver obtained
//!   from [`Producer::bus`](crate::Producer::bus).

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
