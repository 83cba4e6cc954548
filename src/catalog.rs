//! Trace Element Catalog
//!
//! Static registry of the eight trace elements a formula can carry, with
//! their concentration bounds and display metadata. The catalog order is the
//! display order everywhere (sliders, badges, summaries, particle layers).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::types::FormulaError;

/// Symbolic key of a catalog element.
///
/// Serializes as the snake_case key used by device payloads and saved
/// formulas (`"vitamin_b"`, `"electrolytes"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementId {
    Magnesium,
    Calcium,
    Potassium,
    Sodium,
    Zinc,
    Selenium,
    Electrolytes,
    VitaminB,
}

impl ElementId {
    /// All ids in catalog order.
    pub const ALL: [ElementId; 8] = [
        ElementId::Magnesium,
        ElementId::Calcium,
        ElementId::Potassium,
        ElementId::Sodium,
        ElementId::Zinc,
        ElementId::Selenium,
        ElementId::Electrolytes,
        ElementId::VitaminB,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ElementId::Magnesium => "magnesium",
            ElementId::Calcium => "calcium",
            ElementId::Potassium => "potassium",
            ElementId::Sodium => "sodium",
            ElementId::Zinc => "zinc",
            ElementId::Selenium => "selenium",
            ElementId::Electrolytes => "electrolytes",
            ElementId::VitaminB => "vitamin_b",
        }
    }

    /// Catalog entry for this id.
    pub fn element(self) -> &'static TraceElement {
        // ALL and CATALOG share the same order
        &CATALOG[self as usize]
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ElementId {
    type Err = FormulaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim();
        ElementId::ALL
            .into_iter()
            .find(|id| id.as_str() == key)
            .ok_or_else(|| FormulaError::UnknownElement(key.to_string()))
    }
}

/// One catalog entry.
#[derive(Debug, Clone, Serialize)]
pub struct TraceElement {
    pub id: ElementId,
    pub display_name: &'static str,
    pub unit_label: &'static str,
    /// Display color as RGB
    pub color: [u8; 3],
    pub default_level: f64,
    pub max_level: f64,
    pub benefits: &'static str,
    pub associated_conditions: &'static [&'static str],
}

impl TraceElement {
    /// Color as a CSS hex string (`#a3e635`).
    pub fn color_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.color[0], self.color[1], self.color[2])
    }

    /// Clamp a requested concentration into `[0, max_level]`.
    ///
    /// NaN maps to 0 so a bad slider value can never be stored.
    pub fn clamp_level(&self, value: f64) -> f64 {
        if value.is_nan() {
            return 0.0;
        }
        value.clamp(0.0, self.max_level)
    }
}

/// The fixed, ordered element catalog.
pub static CATALOG: [TraceElement; 8] = [
    TraceElement {
        id: ElementId::Magnesium,
        display_name: "Magnesium",
        unit_label: "mg/L",
        color: [0xa3, 0xe6, 0x35],
        default_level: 10.0,
        max_level: 50.0,
        benefits: "Supports muscle and nerve function, energy production and bone health",
        associated_conditions: &["Muscle fatigue", "Stress", "Exercise recovery"],
    },
    TraceElement {
        id: ElementId::Calcium,
        display_name: "Calcium",
        unit_label: "mg/L",
        color: [0xd1, 0xd5, 0xdb],
        default_level: 20.0,
        max_level: 100.0,
        benefits: "Essential for bone health, muscle function and nerve transmission",
        associated_conditions: &["Bone health", "Muscle contraction", "Nerve transmission"],
    },
    TraceElement {
        id: ElementId::Potassium,
        display_name: "Potassium",
        unit_label: "mg/L",
        color: [0xfb, 0xbf, 0x24],
        default_level: 5.0,
        max_level: 30.0,
        benefits: "Regulates fluid balance, muscle contraction and nerve signals",
        associated_conditions: &["Blood pressure", "Muscle function", "Heart health"],
    },
    TraceElement {
        id: ElementId::Sodium,
        display_name: "Sodium",
        unit_label: "mg/L",
        color: [0xf8, 0x71, 0x71],
        default_level: 10.0,
        max_level: 40.0,
        benefits: "Maintains fluid balance and supports nerve and muscle function",
        associated_conditions: &["Fluid balance", "Electrolytes", "Nerve function"],
    },
    TraceElement {
        id: ElementId::Zinc,
        display_name: "Zinc",
        unit_label: "mg/L",
        color: [0x60, 0xa5, 0xfa],
        default_level: 2.0,
        max_level: 15.0,
        benefits: "Supports immune function, wound healing and DNA synthesis",
        associated_conditions: &["Immune system", "Wound healing", "Cell growth"],
    },
    TraceElement {
        id: ElementId::Selenium,
        display_name: "Selenium",
        unit_label: "μg/L",
        color: [0xc0, 0x84, 0xfc],
        default_level: 1.0,
        max_level: 10.0,
        benefits: "Antioxidant that helps protect cells from damage",
        associated_conditions: &["Antioxidant", "Thyroid function", "Immune system"],
    },
    TraceElement {
        id: ElementId::Electrolytes,
        display_name: "Electrolyte Blend",
        unit_label: "mg/L",
        color: [0x34, 0xd3, 0x99],
        default_level: 15.0,
        max_level: 60.0,
        benefits: "Balances body fluids and supports nerve and muscle function",
        associated_conditions: &["Exercise recovery", "Hydration", "Muscle function"],
    },
    TraceElement {
        id: ElementId::VitaminB,
        display_name: "Vitamin B Complex",
        unit_label: "mg/L",
        color: [0x81, 0x8c, 0xf8],
        default_level: 3.0,
        max_level: 20.0,
        benefits: "Supports energy metabolism and nervous system health",
        associated_conditions: &["Energy levels", "Nervous system", "Metabolism"],
    },
];

/// The whole catalog in display order.
pub fn elements() -> &'static [TraceElement] {
    &CATALOG
}

/// Look up an element by its string key.
pub fn lookup(key: &str) -> Result<&'static TraceElement, FormulaError> {
    key.parse::<ElementId>().map(ElementId::element)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_order_matches_ids() {
        for (idx, element) in CATALOG.iter().enumerate() {
            assert_eq!(element.id, ElementId::ALL[idx]);
            assert_eq!(element.id.element().id, element.id);
        }
    }

    #[test]
    fn test_ids_are_unique() {
        let keys: HashSet<&str> = CATALOG.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(keys.len(), 8);
    }

    #[test]
    fn test_default_within_bounds() {
        for e in elements() {
            assert!(e.default_level >= 0.0, "{} default negative", e.id);
            assert!(e.default_level <= e.max_level, "{} default above max", e.id);
        }
    }

    #[test]
    fn test_lookup_known_and_unknown() {
        assert_eq!(lookup("vitamin_b").unwrap().max_level, 20.0);
        assert_eq!(lookup(" zinc ").unwrap().id, ElementId::Zinc);
        match lookup("iron") {
            Err(FormulaError::UnknownElement(key)) => assert_eq!(key, "iron"),
            other => panic!("expected UnknownElement, got {other:?}"),
        }
    }

    #[test]
    fn test_clamp_level() {
        let mg = ElementId::Magnesium.element();
        assert_eq!(mg.clamp_level(-3.0), 0.0);
        assert_eq!(mg.clamp_level(1e9), 50.0);
        assert_eq!(mg.clamp_level(f64::NAN), 0.0);
        assert_eq!(mg.clamp_level(f64::INFINITY), 50.0);
        assert_eq!(mg.clamp_level(12.5), 12.5);
    }

    #[test]
    fn test_color_hex() {
        assert_eq!(ElementId::Magnesium.element().color_hex(), "#a3e635");
        assert_eq!(ElementId::VitaminB.element().color_hex(), "#818cf8");
    }

    #[test]
    fn test_element_id_serde_keys() {
        let json = serde_json::to_string(&ElementId::VitaminB).unwrap();
        assert_eq!(json, "\"vitamin_b\"");
        let id: ElementId = serde_json::from_str("\"electrolytes\"").unwrap();
        assert_eq!(id, ElementId::Electrolytes);
    }
}
