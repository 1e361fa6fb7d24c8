//! # SyslogSender: values as syslog-style UDP datagrams
//!
//! Each value is sent as one datagram in the simplified BSD syslog shape:
//!
//! ```text
//! <134>Mar 07 09:05:02 randcast-demo: Abc123xyZ
//!  │    │               │              └─ value
//!  │    │               └─ hostname
//!  │    └─ local time, "MMM dd HH:mm:ss"
//!  └─ priority = facility local0 (16) * 8 + severity info (6)
//! ```

use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};

use async_trait::async_trait;
use chrono::{DateTime, Local};
use tokio::net::UdpSocket;
use tracing::{debug, info};

use crate::error::ReceiveError;
use crate::subscribers::Subscriber;

/// Facility `local0`.
pub const FACILITY: u8 = 16;
/// Severity `info`.
pub const SEVERITY: u8 = 6;
/// `FACILITY * 8 + SEVERITY`.
pub const PRIORITY: u8 = FACILITY * 8 + SEVERITY;
/// Default collector address.
pub const DEFAULT_TARGET: &str = "127.0.0.1:514";
/// Default hostname field.
pub const DEFAULT_HOSTNAME: &str = "randcast-demo";

/// Subscriber forwarding values to a syslog collector over UDP.
#[derive(Debug)]
pub struct SyslogSender {
    socket: UdpSocket,
    target: SocketAddr,
    hostname: String,
}

impl SyslogSender {
    /// Binds an ephemeral local UDP socket for sending to `target`.
    pub async fn bind(target: SocketAddr, hostname: impl Into<String>) -> std::io::Result<Self> {
        let local = if target.is_ipv4() {
            SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0))
        } else {
            SocketAddr::from((Ipv6Addr::UNSPECIFIED, 0))
        };
        let socket = UdpSocket::bind(local).await?;
        info!(collector = %target, local = %socket.local_addr()?, "syslog sender bound");
        Ok(Self {
            socket,
            target,
            hostname: hostname.into(),
        })
    }

    /// Collector address.
    pub fn target(&self) -> SocketAddr {
        self.target
    }

    /// Formats `value` as it goes on the wire.
    pub fn format_message(&self, value: &str, at: DateTime<Local>) -> String {
        format!(
            "<{PRIORITY}>{} {}: {value}",
            at.format("%b %d %H:%M:%S"),
            self.hostname
        )
    }
}

#[async_trait]
impl Subscriber for SyslogSender {
    async fn receive(&self, value: &str) -> Result<(), ReceiveError> {
        let msg = self.format_message(value, Local::now());
        self.socket.send_to(msg.as_bytes(), self.target).await?;
        debug!(collector = %self.target, value, "sent value to syslog");
        Ok(())
    }

    fn name(&self) -> &str {
        "syslog-sender"
    }
}
