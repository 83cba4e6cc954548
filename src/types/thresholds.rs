//! Recommendation and benefit-hint thresholds
//!
//! Fixed constants: the recommendation rules are a hand-tuned decision table,
//! not operator-tunable values.

/// Thresholds for the recommendation rule table, in priority order
pub mod rule_thresholds {
    /// Hydration below this (%) selects the rapid-hydration formula
    pub const HYDRATION_LOW: f64 = 50.0;
    /// Stress above this (0-100) selects the stress-relief formula
    pub const STRESS_HIGH: f64 = 60.0;
    /// Heart rate above this (BPM) selects the cardiovascular formula
    pub const HEART_RATE_HIGH: f64 = 85.0;
    /// Body temperature above this (°C) selects the cooling formula
    pub const BODY_TEMPERATURE_HIGH: f64 = 37.2;
}

/// Softer thresholds for the "health benefits" hints shown next to a formula
pub mod benefit_thresholds {
    /// Hydration below this (%) gets an "improve hydration" hint
    pub const HYDRATION_BELOW: f64 = 70.0;
    /// Stress above this gets a "stress relief" hint
    pub const STRESS_ABOVE: f64 = 50.0;
    /// Heart rate above this (BPM) gets a "cardiovascular support" hint
    pub const HEART_RATE_ABOVE: f64 = 80.0;
}
