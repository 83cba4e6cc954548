//! Formula (recipe) and recommendation types

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::catalog::{self, ElementId};

/// Element concentrations keyed by element id, iterated in catalog order.
pub type ElementLevels = BTreeMap<ElementId, f64>;

/// A named water formula.
///
/// Plain owned value: the live formula and every saved copy are independent
/// clones, never shared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Formula {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub for_condition: Option<String>,
    pub levels: ElementLevels,
}

impl Formula {
    /// Formula with every element at its catalog default.
    pub fn defaults(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            for_condition: None,
            levels: catalog::elements()
                .iter()
                .map(|e| (e.id, e.default_level))
                .collect(),
        }
    }

    /// Build a formula from a full vector in catalog order.
    pub fn from_vector(name: impl Into<String>, for_condition: Option<String>, vector: &[f64; 8]) -> Self {
        Self {
            name: name.into(),
            for_condition,
            levels: ElementId::ALL.into_iter().zip(vector.iter().copied()).collect(),
        }
    }

    /// Concentration for an element, if the formula carries it.
    pub fn level(&self, id: ElementId) -> Option<f64> {
        self.levels.get(&id).copied()
    }

    /// Composition badges: present elements (level > 0) in catalog order,
    /// with highlighted elements at full emphasis.
    pub fn composition(&self, highlighted: &[ElementId]) -> Vec<CompositionEntry> {
        catalog::elements()
            .iter()
            .filter_map(|e| {
                let level = self.level(e.id)?;
                (level > 0.0).then(|| CompositionEntry {
                    element: e.id,
                    display_name: e.display_name,
                    level,
                    unit_label: e.unit_label,
                    emphasis: if highlighted.contains(&e.id) {
                        HIGHLIGHT_EMPHASIS
                    } else {
                        DEFAULT_EMPHASIS
                    },
                })
            })
            .collect()
    }

    /// One-line listing of the non-zero levels, e.g. `Magnesium: 15, Calcium: 10`.
    pub fn summary(&self) -> String {
        self.levels
            .iter()
            .filter(|(_, v)| **v > 0.0)
            .map(|(id, v)| format!("{}: {}", id.element().display_name, v))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Badge opacity for highlighted elements
pub const HIGHLIGHT_EMPHASIS: f64 = 1.0;
/// Badge opacity for everything else
pub const DEFAULT_EMPHASIS: f64 = 0.7;

/// One badge in the composition listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompositionEntry {
    pub element: ElementId,
    pub display_name: &'static str,
    pub level: f64,
    pub unit_label: &'static str,
    pub emphasis: f64,
}

/// Which rule of the recommendation table fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Trigger {
    Dehydration,
    HighStress,
    ElevatedHeartRate,
    ElevatedTemperature,
    DailyMaintenance,
}

impl std::fmt::Display for Trigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Trigger::Dehydration => write!(f, "Dehydration"),
            Trigger::HighStress => write!(f, "High Stress"),
            Trigger::ElevatedHeartRate => write!(f, "Elevated Heart Rate"),
            Trigger::ElevatedTemperature => write!(f, "Elevated Temperature"),
            Trigger::DailyMaintenance => write!(f, "Daily Maintenance"),
        }
    }
}

/// Recommendation engine output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub trigger: Trigger,
    pub formula: Formula,
    /// Elements most relevant to the trigger; display emphasis only
    pub highlighted: Vec<ElementId>,
}

impl Recommendation {
    pub fn is_highlighted(&self, id: ElementId) -> bool {
        self.highlighted.contains(&id)
    }

    pub fn composition(&self) -> Vec<CompositionEntry> {
        self.formula.composition(&self.highlighted)
    }
}
