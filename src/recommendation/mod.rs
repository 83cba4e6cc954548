//! Recommendation Engine
//!
//! Maps a health snapshot to a water formula through an ordered decision
//! table. Rules are evaluated top to bottom and the first satisfied predicate
//! wins; a snapshot that satisfies none gets the daily-maintenance formula.
//!
//! ## Priority
//!
//! 1. **Dehydration** - hydration < 50%
//! 2. **High Stress** - stress > 60
//! 3. **Elevated Heart Rate** - heart rate > 85 BPM
//! 4. **Elevated Temperature** - body temperature > 37.2 °C
//! 5. **Daily Maintenance** - fallback
//!
//! Reordering the table changes which formula wins when several thresholds
//! are crossed at once, so tests pin the order.

pub mod benefits;

pub use benefits::{health_benefits, HealthBenefit};

use crate::catalog::ElementId;
use crate::types::thresholds::rule_thresholds;
use crate::types::{Formula, HealthSnapshot, Recommendation, Trigger};

/// Fixed formula attached to one trigger.
#[derive(Debug)]
pub struct FormulaProfile {
    pub name: &'static str,
    pub condition: &'static str,
    /// Levels in catalog order: Mg, Ca, K, Na, Zn, Se, electrolytes, vitamin B
    pub levels: [f64; 8],
    pub highlighted: &'static [ElementId],
}

impl FormulaProfile {
    fn to_recommendation(&self, trigger: Trigger) -> Recommendation {
        Recommendation {
            trigger,
            formula: Formula::from_vector(self.name, Some(self.condition.to_string()), &self.levels),
            highlighted: self.highlighted.to_vec(),
        }
    }
}

/// One row of the decision table.
pub struct Rule {
    pub trigger: Trigger,
    pub predicate: fn(&HealthSnapshot) -> bool,
}

impl Rule {
    pub fn matches(&self, snapshot: &HealthSnapshot) -> bool {
        (self.predicate)(snapshot)
    }
}

/// The decision table, highest priority first.
pub static RULES: [Rule; 4] = [
    Rule {
        trigger: Trigger::Dehydration,
        predicate: is_dehydrated,
    },
    Rule {
        trigger: Trigger::HighStress,
        predicate: is_stressed,
    },
    Rule {
        trigger: Trigger::ElevatedHeartRate,
        predicate: has_elevated_heart_rate,
    },
    Rule {
        trigger: Trigger::ElevatedTemperature,
        predicate: has_elevated_temperature,
    },
];

fn is_dehydrated(s: &HealthSnapshot) -> bool {
    s.hydration_level < rule_thresholds::HYDRATION_LOW
}

fn is_stressed(s: &HealthSnapshot) -> bool {
    s.stress_level > rule_thresholds::STRESS_HIGH
}

fn has_elevated_heart_rate(s: &HealthSnapshot) -> bool {
    s.heart_rate > rule_thresholds::HEART_RATE_HIGH
}

fn has_elevated_temperature(s: &HealthSnapshot) -> bool {
    s.body_temperature > rule_thresholds::BODY_TEMPERATURE_HIGH
}

/// Formula profile for a trigger.
pub fn profile(trigger: Trigger) -> &'static FormulaProfile {
    match trigger {
        Trigger::Dehydration => &RAPID_HYDRATION,
        Trigger::HighStress => &STRESS_RELIEF,
        Trigger::ElevatedHeartRate => &CARDIOVASCULAR_SUPPORT,
        Trigger::ElevatedTemperature => &COOLING_BALANCE,
        Trigger::DailyMaintenance => &DAILY_BALANCE,
    }
}

static RAPID_HYDRATION: FormulaProfile = FormulaProfile {
    name: "Rapid Hydration",
    condition: "Dehydration",
    levels: [15.0, 10.0, 20.0, 25.0, 2.0, 1.0, 40.0, 5.0],
    highlighted: &[ElementId::Electrolytes, ElementId::Potassium, ElementId::Sodium],
};

static STRESS_RELIEF: FormulaProfile = FormulaProfile {
    name: "Stress Relief",
    condition: "High Stress",
    levels: [35.0, 15.0, 10.0, 5.0, 5.0, 3.0, 20.0, 15.0],
    highlighted: &[ElementId::Magnesium, ElementId::VitaminB, ElementId::Selenium],
};

static CARDIOVASCULAR_SUPPORT: FormulaProfile = FormulaProfile {
    name: "Cardiovascular Support",
    condition: "Elevated Heart Rate",
    levels: [25.0, 15.0, 25.0, 5.0, 3.0, 2.0, 15.0, 5.0],
    highlighted: &[ElementId::Potassium, ElementId::Magnesium],
};

static COOLING_BALANCE: FormulaProfile = FormulaProfile {
    name: "Cooling Balance",
    condition: "Elevated Temperature",
    levels: [15.0, 10.0, 15.0, 20.0, 5.0, 2.0, 30.0, 3.0],
    highlighted: &[ElementId::Electrolytes, ElementId::Sodium],
};

static DAILY_BALANCE: FormulaProfile = FormulaProfile {
    name: "Daily Balance",
    condition: "Daily Maintenance",
    levels: [20.0, 20.0, 15.0, 10.0, 3.0, 2.0, 15.0, 5.0],
    highlighted: &[ElementId::Magnesium, ElementId::Calcium],
};

/// First rule whose predicate holds, or `DailyMaintenance`.
pub fn select_trigger(snapshot: &HealthSnapshot) -> Trigger {
    RULES
        .iter()
        .find(|rule| rule.matches(snapshot))
        .map_or(Trigger::DailyMaintenance, |rule| rule.trigger)
}

/// Generate the recommended formula for a snapshot.
///
/// Pure and total: every snapshot, including NaN readings, maps to exactly
/// one of the five fixed formulas.
pub fn generate_recommendation(snapshot: &HealthSnapshot) -> Recommendation {
    let trigger = select_trigger(snapshot);
    tracing::debug!(
        trigger = %trigger,
        hydration = snapshot.hydration_level,
        stress = snapshot.stress_level,
        heart_rate = snapshot.heart_rate,
        temperature = snapshot.body_temperature,
        "Recommendation rule selected"
    );
    profile(trigger).to_recommendation(trigger)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(hydration: f64, stress: f64, heart_rate: f64, temperature: f64) -> HealthSnapshot {
        HealthSnapshot {
            hydration_level: hydration,
            stress_level: stress,
            heart_rate,
            body_temperature: temperature,
            ..HealthSnapshot::default()
        }
    }

    #[test]
    fn test_rule_order_is_priority_order() {
        let order: Vec<Trigger> = RULES.iter().map(|r| r.trigger).collect();
        assert_eq!(
            order,
            vec![
                Trigger::Dehydration,
                Trigger::HighStress,
                Trigger::ElevatedHeartRate,
                Trigger::ElevatedTemperature,
            ]
        );
    }

    #[test]
    fn test_each_rule_in_isolation() {
        let calm = snapshot(80.0, 20.0, 70.0, 36.8);
        assert!(RULES.iter().all(|r| !r.matches(&calm)));

        assert!(RULES[0].matches(&snapshot(49.9, 20.0, 70.0, 36.8)));
        assert!(RULES[1].matches(&snapshot(80.0, 60.1, 70.0, 36.8)));
        assert!(RULES[2].matches(&snapshot(80.0, 20.0, 86.0, 36.8)));
        assert!(RULES[3].matches(&snapshot(80.0, 20.0, 70.0, 37.3)));
    }

    #[test]
    fn test_thresholds_are_strict() {
        assert_eq!(select_trigger(&snapshot(50.0, 60.0, 85.0, 37.2)), Trigger::DailyMaintenance);
    }

    #[test]
    fn test_profiles_cover_all_elements_within_bounds() {
        for trigger in [
            Trigger::Dehydration,
            Trigger::HighStress,
            Trigger::ElevatedHeartRate,
            Trigger::ElevatedTemperature,
            Trigger::DailyMaintenance,
        ] {
            let rec = profile(trigger).to_recommendation(trigger);
            assert_eq!(rec.formula.levels.len(), 8, "{trigger} profile incomplete");
            for (id, level) in &rec.formula.levels {
                assert!(*level <= id.element().max_level, "{trigger}: {id} above max");
            }
            assert_eq!(rec.formula.for_condition.as_deref(), Some(profile(trigger).condition));
        }
    }

    #[test]
    fn test_nan_reading_falls_through() {
        let rec = generate_recommendation(&snapshot(f64::NAN, 20.0, 90.0, 36.8));
        assert_eq!(rec.trigger, Trigger::ElevatedHeartRate);
    }
}
