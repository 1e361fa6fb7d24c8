use std::sync::Arc;

use rand::{SeedableRng, rngs::StdRng};
use tokio::runtime::Handle;

use crate::{
    core::{config::ProducerConfig, producer::Producer},
    error::ProducerError,
    events::Bus,
    subscribers::{LogWriter, Subscriber},
};

/// Builder for constructing a [`Producer`] with optional features.
pub struct ProducerBuilder {
    cfg: ProducerConfig,
    rng: Option<StdRng>,
    subscribers: Vec<Arc<dyn Subscriber>>,
    logging: bool,
}

impl ProducerBuilder {
    /// Creates a new builder with the default configuration and logging enabled.
    pub fn new() -> Self {
        Self {
            cfg: ProducerConfig::default(),
            rng: None,
            subscribers: Vec::new(),
            logging: true,
        }
    }

    /// Replaces the configuration.
    pub fn config(mut self, cfg: ProducerConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Uses `rng` as the random source instead of one seeded from the OS.
    pub fn rng(mut self, rng: StdRng) -> Self {
        self.rng = Some(rng);
        self
    }

    /// Seeds the random source deterministically (tests, reproducible demos).
    pub fn seed(self, seed: u64) -> Self {
        self.rng(StdRng::seed_from_u64(seed))
    }

    /// Subscribers registered before the producer is returned.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscriber>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Enables or disables the built-in [`LogWriter`] (enabled by default).
    pub fn with_logging(mut self, enabled: bool) -> Self {
        self.logging = enabled;
        self
    }

    /// Validates the configuration and builds an idle producer.
    ///
    /// With logging enabled this spawns the log writer, so it must run inside a
    /// tokio runtime; otherwise it returns [`ProducerError::NoRuntime`].
    pub fn build(self) -> Result<Producer, ProducerError> {
        self.cfg.validate()?;

        let bus = Bus::new(self.cfg.bus_capacity_clamped());
        if self.logging {
            let handle = Handle::try_current().map_err(|_| ProducerError::NoRuntime)?;
            LogWriter::new().spawn_on(&handle, &bus);
        }

        let rng = match self.rng {
            Some(rng) => rng,
            None => StdRng::try_from_os_rng().map_err(|e| ProducerError::RandomSource {
                reason: e.to_string(),
            })?,
        };
        let producer = Producer::new_internal(self.cfg, bus, rng);
        for sub in self.subscribers {
            producer.subscribe(sub);
        }
        Ok(producer)
    }
}

impl Default for ProducerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
