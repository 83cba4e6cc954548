//! Injectable randomness for particle scatter

/// Source of uniform samples in `[0, 1)`.
///
/// Every `rand::Rng` is a `RandomSource`, so production code passes
/// `rand::thread_rng()` and reproducible runs pass a seeded `StdRng`.
/// [`ScriptedRandom`] replays a fixed sequence for exact-coordinate tests.
pub trait RandomSource {
    fn next_unit(&mut self) -> f64;
}

impl<R: rand::Rng> RandomSource for R {
    fn next_unit(&mut self) -> f64 {
        self.gen::<f64>()
    }
}

/// Replays a fixed list of samples, cycling when exhausted.
#[derive(Debug, Clone)]
pub struct ScriptedRandom {
    values: Vec<f64>,
    pos: usize,
}

impl ScriptedRandom {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values, pos: 0 }
    }

    /// Number of samples handed out so far.
    pub fn draws(&self) -> usize {
        self.pos
    }
}

impl RandomSource for ScriptedRandom {
    fn next_unit(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let v = self.values[self.pos % self.values.len()];
        self.pos += 1;
        v
    }
}
