//! # Subscribers.
//!
//! This module provides the [`Subscriber`] trait for consuming generated values and
//! the built-in [`LogWriter`], which observes the event [`Bus`](crate::Bus) rather
//! than values.
//!
//! ## Architecture
//! ```text
//! Values:
//!   generation loop ── snapshot ──► Subscriber::receive(value)   (one call per registration)
//!                                     ├──► FileWriter   (feature "sinks")
//!                                     ├──► SyslogSender (feature "sinks")
//!                                     └──► Custom ...
//!
//! Events:
//!   Producer / loop ── publish(Event) ──► Bus ──► LogWriter ──► tracing
//! ```

mod log;
mod subscriber;

pub use log::LogWriter;
pub use subscriber::Subscriber;
