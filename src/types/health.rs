//! Health snapshot types supplied by the wristband collaborator

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Arterial blood pressure (mmHg)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BloodPressure {
    pub systolic: f64,
    pub diastolic: f64,
}

/// Point-in-time bundle of physiological readings.
///
/// Values are taken as-is; nothing here is range-checked. The four fields
/// the recommendation rules read are mandatory on the wire, everything else
/// defaults to zero when a device omits it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthSnapshot {
    // === Rule inputs ===
    /// Heart rate (BPM)
    pub heart_rate: f64,
    /// Hydration level (%)
    pub hydration_level: f64,
    /// Body temperature (°C)
    pub body_temperature: f64,
    /// Stress index (0-100)
    pub stress_level: f64,

    // === Activity ===
    /// Step count today
    #[serde(default)]
    pub steps: f64,
    /// Calories burned today (kcal)
    #[serde(default)]
    pub calories_burned: f64,
    /// Sleep last night (hours)
    #[serde(default)]
    pub sleep_hours: f64,

    // === Vitals ===
    #[serde(default)]
    pub blood_pressure: BloodPressure,
    /// SpO2 (%)
    #[serde(default)]
    pub oxygen_saturation: f64,

    /// When the device took the reading, if it reports one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub captured_at: Option<DateTime<Utc>>,
}

impl Default for HealthSnapshot {
    /// Resting-adult reading the simulated wristband starts from.
    fn default() -> Self {
        Self {
            heart_rate: 72.0,
            hydration_level: 65.0,
            body_temperature: 36.7,
            stress_level: 35.0,
            steps: 8432.0,
            calories_burned: 1240.0,
            sleep_hours: 6.5,
            blood_pressure: BloodPressure {
                systolic: 120.0,
                diastolic: 80.0,
            },
            oxygen_saturation: 98.0,
            captured_at: None,
        }
    }
}
