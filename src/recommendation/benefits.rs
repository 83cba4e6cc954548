//! Health benefit hints shown alongside a formula

use serde::Serialize;

use crate::types::thresholds::benefit_thresholds;
use crate::types::HealthSnapshot;

/// A benefit the current readings suggest the formula can help with.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", content = "reading", rename_all = "snake_case")]
pub enum HealthBenefit {
    /// Hydration level (%)
    ImproveHydration(f64),
    /// Stress index
    StressRelief(f64),
    /// Heart rate (BPM)
    CardiovascularSupport(f64),
}

impl HealthBenefit {
    pub fn describe(&self) -> String {
        match self {
            HealthBenefit::ImproveHydration(level) => {
                format!("Improves hydration level ({level:.0}%)")
            }
            HealthBenefit::StressRelief(level) => format!("Helps relieve stress ({level:.0}%)"),
            HealthBenefit::CardiovascularSupport(bpm) => {
                format!("Supports cardiovascular health ({bpm:.0} BPM)")
            }
        }
    }
}

/// Benefit hints for a snapshot, in display order.
///
/// These thresholds are softer than the recommendation rules: a reading can
/// earn a hint without being the reason a formula was picked.
pub fn health_benefits(snapshot: &HealthSnapshot) -> Vec<HealthBenefit> {
    let mut hints = Vec::new();
    if snapshot.hydration_level < benefit_thresholds::HYDRATION_BELOW {
        hints.push(HealthBenefit::ImproveHydration(snapshot.hydration_level));
    }
    if snapshot.stress_level > benefit_thresholds::STRESS_ABOVE {
        hints.push(HealthBenefit::StressRelief(snapshot.stress_level));
    }
    if snapshot.heart_rate > benefit_thresholds::HEART_RATE_ABOVE {
        hints.push(HealthBenefit::CardiovascularSupport(snapshot.heart_rate));
    }
    hints
}
