//! # Demo: pubsub
//!
//! Wires a producer to both built-in sinks and runs until Ctrl-C.
//!
//! ## Flow
//! ```text
//! main()
//!   ├─► tracing_subscriber (RUST_LOG, default "info")
//!   ├─► Producer::builder().build()
//!   ├─► subscribe(FileWriter)    → /tmp/randcast-demo/string_<ts>.txt
//!   ├─► subscribe(SyslogSender)  → <134>... datagram to 127.0.0.1:514
//!   ├─► start()
//!   ├─► ctrl_c().await
//!   └─► stop()                   → bounded join, registry cleared
//! ```
//!
//! ## Run
//! ```bash
//! RUST_LOG=debug cargo run --example pubsub
//! ```

use std::sync::Arc;

use randcast::{
    Producer, Subscriber,
    sinks::{FileWriter, SyslogSender, file, syslog},
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let producer = Producer::builder().build()?;

    let writer: Arc<dyn Subscriber> = Arc::new(FileWriter::create(file::DEFAULT_DIR).await?);
    let sender: Arc<dyn Subscriber> = Arc::new(
        SyslogSender::bind(syslog::DEFAULT_TARGET.parse()?, syslog::DEFAULT_HOSTNAME).await?,
    );
    producer.subscribe(writer);
    producer.subscribe(sender);

    producer.start()?;
    tokio::signal::ctrl_c().await?;

    let outcome = producer.stop().await;
    tracing::info!(?outcome, "demo finished");
    Ok(())
}
