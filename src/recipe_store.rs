//! Recipe Store
//!
//! In-memory session state: one editable "current" formula, an append-only
//! log of saved formulas, and the most recent recommendation. Every transfer
//! between current, saved and recommended is a deep copy; no two slots share
//! a formula.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::catalog::ElementId;
use crate::types::{Formula, FormulaError, Recommendation};

/// Target of [`RecipeStore::reset`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetTarget {
    /// Catalog default levels under the session's default name
    Defaults,
    /// The last recommendation seen; falls back to `Defaults` if none
    Recommended,
}

/// Outcome of [`RecipeStore::track_recommendation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecommendationUpdate {
    /// Same trigger as the previous recommendation
    Unchanged,
    /// Trigger changed; current left alone
    NewTrigger,
    /// Trigger changed; recommendation applied and saved at this index
    Applied { saved_index: usize },
}

/// A formula snapshot appended by [`RecipeStore::save`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SavedRecipe {
    pub formula: Formula,
    pub saved_at: DateTime<Utc>,
}

/// Session recipe store.
#[derive(Debug, Clone)]
pub struct RecipeStore {
    current: Formula,
    saved: Vec<SavedRecipe>,
    last_recommendation: Option<Recommendation>,
    default_name: String,
}

impl RecipeStore {
    /// Empty store whose current formula holds the catalog defaults.
    pub fn new(default_name: impl Into<String>) -> Self {
        let default_name = default_name.into();
        Self {
            current: Formula::defaults(default_name.clone()),
            saved: Vec::new(),
            last_recommendation: None,
            default_name,
        }
    }

    pub fn current(&self) -> &Formula {
        &self.current
    }

    pub fn saved(&self) -> &[SavedRecipe] {
        &self.saved
    }

    pub fn last_recommendation(&self) -> Option<&Recommendation> {
        self.last_recommendation.as_ref()
    }

    /// Replace the editable formula. No validation.
    pub fn set_current(&mut self, formula: Formula) {
        debug!(name = %formula.name, "Current formula replaced");
        self.current = formula;
    }

    pub fn rename_current(&mut self, name: impl Into<String>) {
        self.current.name = name.into();
    }

    /// Set one element's concentration, clamped to `[0, max_level]`.
    ///
    /// Returns the value actually stored.
    pub fn set_level(&mut self, id: ElementId, value: f64) -> f64 {
        let stored = id.element().clamp_level(value);
        if stored != value {
            debug!(element = %id, requested = value, stored, "Level clamped");
        }
        self.current.levels.insert(id, stored);
        stored
    }

    /// Set one element's concentration by string key.
    ///
    /// Unknown keys fail with `FormulaError::UnknownElement` and leave the
    /// formula untouched.
    pub fn mutate_level(&mut self, element: &str, value: f64) -> Result<f64, FormulaError> {
        let id: ElementId = element.parse()?;
        Ok(self.set_level(id, value))
    }

    /// Append a copy of the current formula under `name`.
    ///
    /// The saved condition is the last recommendation's when one exists,
    /// otherwise the current formula's. Returns the saved entry's index
    /// (its position in save order).
    pub fn save(&mut self, name: impl Into<String>) -> usize {
        let mut formula = self.current.clone();
        formula.name = name.into();
        if let Some(rec) = &self.last_recommendation {
            formula.for_condition = rec.formula.for_condition.clone();
        }
        info!(name = %formula.name, index = self.saved.len(), "Recipe saved");
        self.saved.push(SavedRecipe {
            formula,
            saved_at: Utc::now(),
        });
        self.saved.len() - 1
    }

    /// Copy a saved formula back into current.
    ///
    /// An out-of-range index leaves the store unchanged and is reported as
    /// `SavedRecipeNotFound`.
    pub fn apply_saved(&mut self, index: usize) -> Result<&Formula, FormulaError> {
        let Some(entry) = self.saved.get(index) else {
            warn!(index, saved = self.saved.len(), "Saved recipe not found");
            return Err(FormulaError::SavedRecipeNotFound {
                index,
                saved: self.saved.len(),
            });
        };
        self.current = entry.formula.clone();
        Ok(&self.current)
    }

    /// Record the latest recommendation without touching current.
    pub fn observe_recommendation(&mut self, recommendation: Recommendation) {
        self.last_recommendation = Some(recommendation);
    }

    /// Record a recommendation from a stream of readings.
    ///
    /// When its trigger differs from the previous recommendation's and
    /// `auto_apply` is set, the formula is copied into current and saved as
    /// `"<name> (<tag>)"`. Repeats of the same trigger never save.
    pub fn track_recommendation(
        &mut self,
        recommendation: Recommendation,
        auto_apply: bool,
        tag: &str,
    ) -> RecommendationUpdate {
        let previous = self.last_recommendation.as_ref().map(|r| r.trigger);
        let changed = previous != Some(recommendation.trigger);
        if !changed {
            self.last_recommendation = Some(recommendation);
            return RecommendationUpdate::Unchanged;
        }
        if !auto_apply {
            self.last_recommendation = Some(recommendation);
            return RecommendationUpdate::NewTrigger;
        }
        info!(name = %recommendation.formula.name, trigger = %recommendation.trigger, "Recommendation applied");
        self.current = recommendation.formula.clone();
        let name = format!("{} ({tag})", recommendation.formula.name);
        self.last_recommendation = Some(recommendation);
        RecommendationUpdate::Applied {
            saved_index: self.save(name),
        }
    }

    /// Copy the last recommendation into current.
    pub fn apply_recommendation(&mut self) -> Result<&Formula, FormulaError> {
        let rec = self
            .last_recommendation
            .as_ref()
            .ok_or(FormulaError::NoRecommendation)?;
        info!(name = %rec.formula.name, trigger = %rec.trigger, "Recommendation applied");
        self.current = rec.formula.clone();
        Ok(&self.current)
    }

    /// Restore current to the catalog defaults or the last recommendation.
    pub fn reset(&mut self, target: ResetTarget) {
        match (target, &self.last_recommendation) {
            (ResetTarget::Recommended, Some(rec)) => {
                self.current = rec.formula.clone();
            }
            (ResetTarget::Recommended, None) => {
                debug!("No recommendation yet, resetting to defaults");
                self.current = Formula::defaults(self.default_name.clone());
            }
            (ResetTarget::Defaults, _) => {
                self.current = Formula::defaults(self.default_name.clone());
            }
        }
    }
}

impl Default for RecipeStore {
    fn default() -> Self {
        Self::new(crate::config::defaults::DEFAULT_RECIPE_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recommendation::generate_recommendation;
    use crate::types::HealthSnapshot;

    #[test]
    fn test_new_store_holds_defaults() {
        let store = RecipeStore::default();
        assert_eq!(store.current(), &Formula::defaults("My Custom Water"));
        assert!(store.saved().is_empty());
        assert!(store.last_recommendation().is_none());
    }

    #[test]
    fn test_mutate_level_clamps() {
        let mut store = RecipeStore::default();
        assert_eq!(store.mutate_level("potassium", 99.0).unwrap(), 30.0);
        assert_eq!(store.mutate_level("potassium", -1.0).unwrap(), 0.0);
        assert_eq!(store.current().level(ElementId::Potassium), Some(0.0));
    }

    #[test]
    fn test_mutate_unknown_element_leaves_formula() {
        let mut store = RecipeStore::default();
        let before = store.current().clone();
        let err = store.mutate_level("iron", 5.0).unwrap_err();
        assert_eq!(err, FormulaError::UnknownElement("iron".to_string()));
        assert_eq!(store.current(), &before);
    }

    #[test]
    fn test_save_returns_sequential_indices() {
        let mut store = RecipeStore::default();
        assert_eq!(store.save("a"), 0);
        assert_eq!(store.save("b"), 1);
        assert_eq!(store.saved()[1].formula.name, "b");
        // Saving does not rename current
        assert_eq!(store.current().name, "My Custom Water");
    }

    #[test]
    fn test_apply_saved_out_of_range_is_noop() {
        let mut store = RecipeStore::default();
        store.set_level(ElementId::Zinc, 9.0);
        let before = store.current().clone();
        let err = store.apply_saved(3).unwrap_err();
        assert_eq!(err, FormulaError::SavedRecipeNotFound { index: 3, saved: 0 });
        assert_eq!(store.current(), &before);
    }

    #[test]
    fn test_apply_recommendation_requires_one() {
        let mut store = RecipeStore::default();
        assert_eq!(store.apply_recommendation().unwrap_err(), FormulaError::NoRecommendation);

        let rec = generate_recommendation(&HealthSnapshot {
            stress_level: 75.0,
            ..HealthSnapshot::default()
        });
        store.observe_recommendation(rec);
        // Observing alone leaves the user's formula in place
        assert_eq!(store.current().name, "My Custom Water");
        assert_eq!(store.apply_recommendation().unwrap().name, "Stress Relief");
    }

    #[test]
    fn test_save_takes_condition_from_recommendation() {
        let mut store = RecipeStore::default();
        store.save("plain");
        assert_eq!(store.saved()[0].formula.for_condition, None);

        let rec = generate_recommendation(&HealthSnapshot {
            stress_level: 75.0,
            ..HealthSnapshot::default()
        });
        let condition = rec.formula.for_condition.clone();
        assert!(condition.is_some());
        store.observe_recommendation(rec);
        store.apply_saved(0).unwrap();
        assert_eq!(store.current().for_condition, None);

        let idx = store.save("restored");
        assert_eq!(store.saved()[idx].formula.for_condition, condition);
        assert_eq!(store.current().for_condition, None);
    }

    #[test]
    fn test_track_saves_once_per_new_trigger() {
        let mut store = RecipeStore::default();
        let stressed = HealthSnapshot {
            stress_level: 75.0,
            ..HealthSnapshot::default()
        };
        let dry = HealthSnapshot {
            hydration_level: 30.0,
            ..HealthSnapshot::default()
        };

        let first = store.track_recommendation(generate_recommendation(&stressed), true, "tick 1");
        assert_eq!(first, RecommendationUpdate::Applied { saved_index: 0 });
        assert_eq!(store.current().name, "Stress Relief");
        assert_eq!(store.saved()[0].formula.name, "Stress Relief (tick 1)");

        let repeat = store.track_recommendation(generate_recommendation(&stressed), true, "tick 2");
        assert_eq!(repeat, RecommendationUpdate::Unchanged);
        assert_eq!(store.saved().len(), 1);

        let next = store.track_recommendation(generate_recommendation(&dry), true, "tick 3");
        assert_eq!(next, RecommendationUpdate::Applied { saved_index: 1 });
        assert_eq!(store.saved().len(), 2);
    }

    #[test]
    fn test_track_without_auto_apply_never_saves() {
        let mut store = RecipeStore::default();
        let rec = generate_recommendation(&HealthSnapshot {
            stress_level: 75.0,
            ..HealthSnapshot::default()
        });
        let trigger = rec.trigger;
        assert_eq!(
            store.track_recommendation(rec.clone(), false, "tick 1"),
            RecommendationUpdate::NewTrigger
        );
        assert_eq!(store.track_recommendation(rec, false, "tick 2"), RecommendationUpdate::Unchanged);
        assert!(store.saved().is_empty());
        assert_eq!(store.current().name, "My Custom Water");
        assert_eq!(store.last_recommendation().map(|r| r.trigger), Some(trigger));
    }

    #[test]
    fn test_reset_targets() {
        let mut store = RecipeStore::new("Base");
        store.set_level(ElementId::Calcium, 99.0);

        store.reset(ResetTarget::Recommended);
        assert_eq!(store.current(), &Formula::defaults("Base"));

        let rec = generate_recommendation(&HealthSnapshot {
            hydration_level: 30.0,
            ..HealthSnapshot::default()
        });
        store.observe_recommendation(rec.clone());
        store.set_level(ElementId::Calcium, 99.0);
        store.reset(ResetTarget::Recommended);
        assert_eq!(store.current(), &rec.formula);

        store.reset(ResetTarget::Defaults);
        assert_eq!(store.current(), &Formula::defaults("Base"));
    }
}
