//! Simulated wristband
//!
//! Random walk over the four rule inputs, starting from a configured
//! baseline. Activity and vitals stay at their baseline values.

use std::time::Duration;

use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Uniform};

use super::{SnapshotEvent, SnapshotSource, SourceError};
use crate::config::DeviceConfig;
use crate::types::HealthSnapshot;

/// Per-tick drift bounds (half-widths)
const HEART_RATE_DRIFT: f64 = 2.0;
const HYDRATION_DRIFT: f64 = 3.0;
const STRESS_DRIFT: f64 = 4.0;
const TEMPERATURE_DRIFT: f64 = 0.2;

/// Seeded random-walk device. Never reaches EOF.
pub struct SimulatedWristband {
    state: HealthSnapshot,
    rng: StdRng,
    poll_interval: Duration,
    ticks: u64,
    heart_rate: Uniform<f64>,
    hydration: Uniform<f64>,
    stress: Uniform<f64>,
    temperature: Uniform<f64>,
}

impl SimulatedWristband {
    pub fn new(baseline: HealthSnapshot, seed: Option<u64>, poll_interval: Duration) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            state: baseline,
            rng,
            poll_interval,
            ticks: 0,
            heart_rate: Uniform::new(-HEART_RATE_DRIFT, HEART_RATE_DRIFT),
            hydration: Uniform::new(-HYDRATION_DRIFT, HYDRATION_DRIFT),
            stress: Uniform::new(-STRESS_DRIFT, STRESS_DRIFT),
            temperature: Uniform::new(-TEMPERATURE_DRIFT, TEMPERATURE_DRIFT),
        }
    }

    pub fn from_config(config: &DeviceConfig) -> Self {
        Self::new(
            config.baseline.clone(),
            config.seed,
            Duration::from_millis(config.poll_interval_ms),
        )
    }

    /// Reading the device currently reports (the baseline before any tick).
    pub fn current(&self) -> &HealthSnapshot {
        &self.state
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Advance the walk one step and return the new reading.
    pub fn tick(&mut self) -> HealthSnapshot {
        let s = &mut self.state;
        s.heart_rate = (s.heart_rate + self.heart_rate.sample(&mut self.rng)).floor();
        s.hydration_level = (s.hydration_level + self.hydration.sample(&mut self.rng)).clamp(0.0, 100.0);
        s.stress_level = (s.stress_level + self.stress.sample(&mut self.rng)).clamp(0.0, 100.0);
        s.body_temperature = round_tenth(s.body_temperature + self.temperature.sample(&mut self.rng));
        s.captured_at = Some(Utc::now());
        self.ticks += 1;
        tracing::trace!(
            tick = self.ticks,
            hr = s.heart_rate,
            hydration = s.hydration_level,
            stress = s.stress_level,
            temp = s.body_temperature,
            "Wristband reading"
        );
        s.clone()
    }
}

impl SnapshotSource for SimulatedWristband {
    fn next_snapshot(&mut self) -> Result<SnapshotEvent, SourceError> {
        Ok(SnapshotEvent::Snapshot(self.tick()))
    }

    fn source_name(&self) -> &str {
        "wristband-sim"
    }
}

fn round_tenth(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}
