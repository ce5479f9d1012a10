use std::collections::HashMap;

use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Source of uniform draws used for every decay decision.
pub trait RandomSource {
    /// Uniform sample in `[0, 1)`.
    fn next_f64(&mut self) -> f64;

    /// Bernoulli trial. Zero, negative and NaN probabilities never succeed.
    fn chance(&mut self, probability: f64) -> bool {
        probability > 0.0 && self.next_f64() <= probability
    }

    /// Uniform index in `0..len`. `len` must be non-zero.
    fn pick(&mut self, len: usize) -> usize {
        let index = (self.next_f64() * len as f64) as usize;
        index.min(len.saturating_sub(1))
    }
}

/// Derives independent, reproducible ChaCha streams from one master seed.
pub struct RngManager {
    master: ChaCha8Rng,
    streams: HashMap<String, ChaCha8Rng>,
}

impl RngManager {
    pub fn new(seed: u64) -> Self {
        Self {
            master: ChaCha8Rng::seed_from_u64(seed),
            streams: HashMap::new(),
        }
    }

    pub fn stream(&mut self, name: &str) -> StreamRng<'_> {
        let master = &mut self.master;
        let entry = self
            .streams
            .entry(name.to_string())
            .or_insert_with(|| ChaCha8Rng::seed_from_u64(master.next_u64()));
        StreamRng { inner: entry }
    }
}

pub struct StreamRng<'a> {
    inner: &'a mut ChaCha8Rng,
}

impl<'a> StreamRng<'a> {
    pub fn gen_range(&mut self, min: f64, max: f64) -> f64 {
        if max <= min {
            return min;
        }
        self.inner.gen_range(min..max)
    }
}

impl<'a> RandomSource for StreamRng<'a> {
    fn next_f64(&mut self) -> f64 {
        self.inner.gen::<f64>()
    }
}

/// Owned seeded source for callers that do not need named streams.
#[derive(Clone, Debug)]
pub struct SeededRandom {
    inner: ChaCha8Rng,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for SeededRandom {
    fn next_f64(&mut self) -> f64 {
        self.inner.gen::<f64>()
    }
}

/// Replays a fixed sequence of draws, cycling when exhausted.
#[derive(Clone, Debug)]
pub struct ScriptedRandom {
    values: Vec<f64>,
    cursor: usize,
}

impl ScriptedRandom {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values, cursor: 0 }
    }

    /// Every draw returns `value`. `always(0.0)` makes every trial succeed and
    /// every pick take the first element.
    pub fn always(value: f64) -> Self {
        Self::new(vec![value])
    }

    pub fn draws(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for ScriptedRandom {
    fn next_f64(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value
    }
}
