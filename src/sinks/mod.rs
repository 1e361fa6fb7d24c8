//! Ready-made subscribers that persist or forward values.
//!
//! - [`FileWriter`]: one timestamped file per value.
//! - [`SyslogSender`]: one syslog-style UDP datagram per value.
//!
//! Both report failures as [`ReceiveError::Io`](crate::ReceiveError::Io); the
//! producer logs them and keeps going.

pub mod file;
pub mod syslog;

pub use file::FileWriter;
pub use syslog::SyslogSender;
