//! # Value subscriber trait.
//!
//! Provides [`Subscriber`] the extension point for consuming generated values.
//!
//! ## Rules
//! - Every subscriber in a round's snapshot receives the same value.
//! - Delivery order among subscribers in a round is unspecified; `receive`
//!   calls for one round run concurrently.
//! - An `Err` or a panic from `receive` is contained: it is published as
//!   `EventKind::SubscriberFailed` / `EventKind::SubscriberPanicked` and the
//!   remaining subscribers and later rounds are unaffected.
//! - No retries, no buffering: a value a subscriber fails to handle is gone.
//!
//! ## Example
//! ```rust
//! use async_trait::async_trait;
//! use randcast::{ReceiveError, Subscriber};
//!
//! struct Stdout;
//!
//! #[async_trait]
//! impl Subscriber for Stdout {
//!     async fn receive(&self, value: &str) -> Result<(), ReceiveError> {
//!         println!("got {value}");
//!         Ok(())
//!     }
//!
//!     fn name(&self) -> &str { "stdout" }
//! }
//! ```

use async_trait::async_trait;

use crate::error::ReceiveError;

/// Consumer of generated values.
///
/// ### Implementation requirements
/// - Use async I/O; avoid blocking the executor (a blocked `receive` also
///   delays `stop`, which aborts the loop once its timeout elapses).
/// - Report failures through the returned `Result`.
#[async_trait]
pub trait Subscriber: Send + Sync + 'static {
    /// Handles one generated value.
    ///
    /// Called from the producer's generation loop.
    async fn receive(&self, value: &str) -> Result<(), ReceiveError>;

    /// Returns the subscriber name used in logs and failure events.
    ///
    /// The default uses `type_name::<Self>()`, which can be verbose - override it when possible.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}
