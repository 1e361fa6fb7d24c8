//! # Random values and inter-round waits.
//!
//! [`ValueGenerator`] owns the loop's random source and draws:
//! - values: length uniform in `[min_len, max_len]`, symbols uniform over `A–Z a–z 0–9`
//! - waits: uniform in `[min_interval, max_interval]`
//!
//! The random source is [`StdRng`], a cryptographically strong generator. It is
//! passed in rather than taken from thread-local state so tests can seed it.

use std::time::Duration;

use rand::distr::{Alphanumeric, Distribution, Uniform};
use rand::rngs::StdRng;

use crate::core::config::ProducerConfig;
use crate::error::GenerateError;

/// Draws values and waits for one generation loop.
pub struct ValueGenerator {
    rng: StdRng,
    min_len: usize,
    max_len: usize,
    min_interval: Duration,
    max_interval: Duration,
}

impl ValueGenerator {
    /// Creates a generator using the ranges from `cfg`.
    pub fn new(rng: StdRng, cfg: &ProducerConfig) -> Self {
        Self {
            rng,
            min_len: cfg.min_len,
            max_len: cfg.max_len,
            min_interval: cfg.min_interval,
            max_interval: cfg.max_interval,
        }
    }

    /// Generates one value.
    pub fn next_value(&mut self) -> Result<String, GenerateError> {
        let len = Uniform::new_inclusive(self.min_len, self.max_len).map_err(|_| {
            GenerateError::InvalidRange {
                what: "length",
                min: self.min_len as u64,
                max: self.max_len as u64,
            }
        })?;
        let len = len.sample(&mut self.rng);

        Ok(Alphanumeric
            .sample_iter(&mut self.rng)
            .take(len)
            .map(char::from)
            .collect())
    }

    /// Draws the wait before the next round.
    pub fn next_wait(&mut self) -> Result<Duration, GenerateError> {
        let wait = Uniform::new_inclusive(self.min_interval, self.max_interval).map_err(|_| {
            GenerateError::InvalidRange {
                what: "interval",
                min: millis(self.min_interval),
                max: millis(self.max_interval),
            }
        })?;
        Ok(wait.sample(&mut self.rng))
    }
}

fn millis(d: Duration) -> u64 {
    d.as_millis().min(u128::from(u64::MAX)) as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn generator(seed: u64) -> ValueGenerator {
        ValueGenerator::new(StdRng::seed_from_u64(seed), &ProducerConfig::default())
    }

    #[test]
    fn test_values_within_length_and_alphabet() {
        let mut g = generator(7);
        for _ in 0..2000 {
            let v = g.next_value().unwrap();
            assert!((8..=16).contains(&v.len()), "bad length {}", v.len());
            assert!(
                v.bytes().all(|b| b.is_ascii_alphanumeric()),
                "bad symbol in {v:?}"
            );
        }
    }

    #[test]
    fn test_all_lengths_reachable() {
        let mut g = generator(11);
        let mut seen = [false; 17];
        for _ in 0..5000 {
            seen[g.next_value().unwrap().len()] = true;
        }
        assert!(seen[8..=16].iter().all(|s| *s), "lengths seen: {seen:?}");
    }

    #[test]
    fn test_waits_within_bounds() {
        let mut g = generator(3);
        for _ in 0..2000 {
            let w = g.next_wait().unwrap();
            assert!(w >= Duration::from_millis(1000), "wait {w:?} below floor");
            assert!(w <= Duration::from_millis(5000), "wait {w:?} above ceiling");
        }
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = generator(42);
        let mut b = generator(42);
        for _ in 0..20 {
            assert_eq!(a.next_value().unwrap(), b.next_value().unwrap());
            assert_eq!(a.next_wait().unwrap(), b.next_wait().unwrap());
        }
    }

    #[test]
    fn test_inverted_length_range_is_an_error() {
        let cfg = ProducerConfig {
            min_len: 5,
            max_len: 2,
            ..ProducerConfig::default()
        };
        let mut g = ValueGenerator::new(StdRng::seed_from_u64(0), &cfg);
        assert_eq!(
            g.next_value(),
            Err(GenerateError::InvalidRange {
                what: "length",
                min: 5,
                max: 2
            })
        );
        assert!(g.next_wait().is_ok());
    }

    #[test]
    fn test_inverted_interval_is_an_error() {
        let cfg = ProducerConfig {
            min_interval: Duration::from_millis(20),
            max_interval: Duration::from_millis(10),
            ..ProducerConfig::default()
        };
        let mut g = ValueGenerator::new(StdRng::seed_from_u64(0), &cfg);
        assert!(matches!(
            g.next_wait(),
            Err(GenerateError::InvalidRange {
                what: "interval",
                min: 20,
                max: 10
            })
        ));
    }
}
