//! # Producer: lifecycle control, subscriber registry and the generation loop.
//!
//! The [`Producer`] owns the event bus, a copy-on-write [`Registry`], its random
//! source and the handle of the background loop.
//!
//! ## Key responsibilities
//! - spawn exactly one [`GenerationLoop`] per `start`
//! - accept `subscribe`/`unsubscribe` from any thread at any time
//! - stop promptly: cancel, bounded join, abort on timeout, clear the registry
//!
//! ## State machine
//! ```text
//!            start()                 stop()                 loop joined / timeout
//!   Idle ───────────► Running ───────────────► Stopping ─────────────────────► Stopped
//!    ▲                   │                                                        │
//!    │                   └─ start() → Err(InvalidState)                           │
//!    └──────────────────────────────── start() (restart) ─────────────────────────┘
//! ```
//!
//! ## Shutdown path
//! ```text
//! stop()
//!   ├─► state = Stopping, take (token, join handle)
//!   ├─► publish StopRequested
//!   ├─► token.cancel()               → wakes the inter-round wait
//!   ├─► (shared with concurrent stop callers) timeout(stop_timeout, join):
//!   │      ├─ Ok      → StopOutcome::Joined
//!   │      └─ Elapsed → join.abort(), publish StopTimedOut → StopOutcome::TimedOut
//!   ├─► registry.clear(), state = Stopped (under the lifecycle lock)
//!   └─► publish ProducerStopped
//! ```
//!
//! A `stop` arriving while `Stopping` awaits the same shared shutdown future and
//! returns the same outcome.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use rand::{SeedableRng, rngs::StdRng};
use tokio::{runtime::Handle, task::JoinHandle, time};
use tokio_util::sync::CancellationToken;

use crate::{
    core::{
        builder::ProducerBuilder, config::ProducerConfig, generator::ValueGenerator,
        registry::Registry, runner::GenerationLoop,
    },
    error::ProducerError,
    events::{Bus, Event, EventKind},
    subscribers::Subscriber,
};

/// Lifecycle state of a [`Producer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Created, never started (or reset for a restart).
    Idle,
    /// Generation loop is running.
    Running,
    /// `stop` is waiting for the loop to exit.
    Stopping,
    /// Loop has exited (or was aborted) and the registry was cleared.
    Stopped,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RunState::Idle => "idle",
            RunState::Running => "running",
            RunState::Stopping => "stopping",
            RunState::Stopped => "stopped",
        })
    }
}

/// How a call to [`Producer::stop`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopOutcome {
    /// The loop observed cancellation and exited within the stop timeout.
    Joined,
    /// The loop did not exit in time and was aborted.
    TimedOut,
    /// The producer was not running; only the registry was cleared.
    NotRunning,
}

struct ActiveLoop {
    token: CancellationToken,
    join: JoinHandle<u64>,
}

type Shutdown = Shared<BoxFuture<'static, StopOutcome>>;

struct Lifecycle {
    state: RunState,
    active: Option<ActiveLoop>,
    /// Set while `Stopping`; later `stop` callers await it too.
    stopping: Option<Shutdown>,
}

/// Generates random values on a background task and fans them out to subscribers.
///
/// All methods take `&self`; share a producer across tasks with `Arc<Producer>`.
pub struct Producer {
    cfg: ProducerConfig,
    bus: Bus,
    registry: Arc<Registry>,
    rng: Mutex<StdRng>,
    lifecycle: Mutex<Lifecycle>,
}

impl Producer {
    /// Returns a builder with the default configuration.
    pub fn builder() -> ProducerBuilder {
        ProducerBuilder::new()
    }

    /// Creates an idle producer. The builder validates `cfg` before calling this.
    pub(crate) fn new_internal(cfg: ProducerConfig, bus: Bus, rng: StdRng) -> Self {
        Self {
            cfg,
            bus,
            registry: Arc::new(Registry::new()),
            rng: Mutex::new(rng),
            lifecycle: Mutex::new(Lifecycle {
                state: RunState::Idle,
                active: None,
                stopping: None,
            }),
        }
    }

    /// Spawns the generation loop on the current tokio runtime.
    ///
    /// Allowed from `Idle` and from `Stopped` (restart). Returns
    /// [`ProducerError::InvalidState`] while `Running` or `Stopping`, and
    /// [`ProducerError::NoRuntime`] when called outside a tokio runtime.
    pub fn start(&self) -> Result<(), ProducerError> {
        let handle = Handle::try_current().map_err(|_| ProducerError::NoRuntime)?;

        let mut lc = self.lifecycle.lock();
        match lc.state {
            RunState::Running | RunState::Stopping => {
                return Err(ProducerError::InvalidState { state: lc.state });
            }
            RunState::Stopped => lc.state = RunState::Idle,
            RunState::Idle => {}
        }

        // Each run gets its own stream forked from the producer's source, so a
        // seeded producer stays reproducible across restarts.
        let rng = StdRng::from_rng(&mut *self.rng.lock());
        let generation = GenerationLoop::new(
            ValueGenerator::new(rng, &self.cfg),
            Arc::clone(&self.registry),
            self.bus.clone(),
            self.cfg.max_interval,
        );

        let token = CancellationToken::new();
        let join = handle.spawn(generation.run(token.clone()));
        lc.active = Some(ActiveLoop { token, join });
        lc.state = RunState::Running;
        drop(lc);

        self.bus.publish(Event::new(EventKind::ProducerStarted));
        Ok(())
    }

    /// Stops the generation loop and clears the registry.
    ///
    /// Waits at most [`ProducerConfig::stop_timeout`] for the loop to exit; a loop
    /// that does not make it in time is aborted. The registry is cleared in every
    /// case, including when the producer was not running.
    ///
    /// Concurrent callers share one shutdown: each returns once the loop is gone,
    /// with the same outcome.
    pub async fn stop(&self) -> StopOutcome {
        let pending = {
            let mut lc = self.lifecycle.lock();
            match lc.state {
                RunState::Running => match lc.active.take() {
                    Some(active) => {
                        // Cancel now so the loop exits even if no caller polls the join.
                        self.bus.publish(Event::new(EventKind::StopRequested));
                        active.token.cancel();
                        let shutdown =
                            shutdown(active.join, self.bus.clone(), self.cfg.stop_timeout)
                                .boxed()
                                .shared();
                        lc.state = RunState::Stopping;
                        lc.stopping = Some(shutdown.clone());
                        Some(shutdown)
                    }
                    None => None,
                },
                RunState::Stopping => lc.stopping.clone(),
                RunState::Idle | RunState::Stopped => {
                    self.registry.clear();
                    None
                }
            }
        };

        let Some(shutdown) = pending else {
            return StopOutcome::NotRunning;
        };
        let outcome = shutdown.await;

        // The first caller to get here finishes the transition.
        let dropped = {
            let mut lc = self.lifecycle.lock();
            if lc.state != RunState::Stopping {
                return outcome;
            }
            let dropped = self.registry.clear();
            lc.stopping = None;
            lc.state = RunState::Stopped;
            dropped
        };
        self.bus
            .publish(Event::new(EventKind::ProducerStopped).with_count(dropped));
        outcome
    }

    /// Adds `subscriber`; it is delivered to from the next round on.
    ///
    /// Adding the same subscriber twice registers it twice.
    pub fn subscribe(&self, subscriber: Arc<dyn Subscriber>) {
        let name: Arc<str> = Arc::from(subscriber.name());
        let count = self.registry.insert(subscriber);
        self.bus.publish(
            Event::new(EventKind::SubscriberAdded)
                .with_subscriber(name)
                .with_count(count),
        );
    }

    /// Like [`subscribe`](Self::subscribe); `None` is a no-op.
    pub fn subscribe_opt(&self, subscriber: Option<Arc<dyn Subscriber>>) {
        if let Some(subscriber) = subscriber {
            self.subscribe(subscriber);
        }
    }

    /// Removes one registration of `subscriber`. Returns `false` if it was not registered.
    ///
    /// A round already in progress may still deliver to it.
    pub fn unsubscribe(&self, subscriber: &Arc<dyn Subscriber>) -> bool {
        let removed = self.registry.remove(subscriber);
        if removed {
            self.bus.publish(
                Event::new(EventKind::SubscriberRemoved)
                    .with_subscriber(subscriber.name())
                    .with_count(self.registry.len()),
            );
        }
        removed
    }

    /// Like [`unsubscribe`](Self::unsubscribe); `None` is a no-op returning `false`.
    pub fn unsubscribe_opt(&self, subscriber: Option<&Arc<dyn Subscriber>>) -> bool {
        subscriber.is_some_and(|s| self.unsubscribe(s))
    }

    /// Current lifecycle state.
    pub fn state(&self) -> RunState {
        self.lifecycle.lock().state
    }

    /// Number of registrations currently in the registry.
    pub fn subscriber_count(&self) -> usize {
        self.registry.len()
    }

    /// Number of registrations of `subscriber`.
    pub fn registrations_of(&self, subscriber: &Arc<dyn Subscriber>) -> usize {
        self.registry.count_of(subscriber)
    }

    /// Event bus; call `bus().subscribe()` to observe the producer.
    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    /// Configuration this producer was built with.
    pub fn config(&self) -> &ProducerConfig {
        &self.cfg
    }
}

/// Waits for a cancelled loop within `stop_timeout`, aborting it on expiry.
///
/// Owns everything it touches so concurrent `stop` callers can share it.
async fn shutdown(mut join: JoinHandle<u64>, bus: Bus, stop_timeout: Duration) -> StopOutcome {
    match time::timeout(stop_timeout, &mut join).await {
        Ok(Ok(_rounds)) => StopOutcome::Joined,
        Ok(Err(join_err)) => {
            bus.publish(
                Event::new(EventKind::LoopExited)
                    .with_reason(format!("loop terminated abnormally: {join_err}")),
            );
            StopOutcome::Joined
        }
        Err(_elapsed) => {
            join.abort();
            bus.publish(Event::new(EventKind::StopTimedOut).with_timeout(stop_timeout));
            StopOutcome::TimedOut
        }
    }
}

impl Drop for Producer {
    fn drop(&mut self) {
        if let Some(active) = self.lifecycle.get_mut().active.take() {
            active.token.cancel();
        }
    }
}
