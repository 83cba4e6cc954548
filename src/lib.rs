//! Water Formula: personalized trace-element water from wearable readings
//!
//! ## Architecture
//!
//! - **Catalog**: the eight supported trace elements and their bounds
//! - **Recommendation Engine**: ordered rule table from health snapshot to formula
//! - **Recipe Store**: editable current formula, saved recipes, last recommendation
//! - **Composition Renderer**: particle-density picture of a formula
//! - **Acquisition**: JSON-lines and simulated wristband snapshot sources

pub mod config;
pub mod types;
pub mod catalog;
pub mod recommendation;
pub mod recipe_store;
pub mod render;
pub mod acquisition;

// Re-export configuration
pub use config::AppConfig;

// Re-export commonly used types
pub use catalog::{ElementId, TraceElement, CATALOG};
pub use types::{
    CompositionEntry, ElementLevels, Formula, FormulaError, HealthSnapshot, Recommendation,
    Trigger,
};

// Re-export engine and store
pub use recommendation::{generate_recommendation, health_benefits, HealthBenefit};
pub use recipe_store::{RecipeStore, RecommendationUpdate, ResetTarget, SavedRecipe};

// Re-export renderer
pub use render::{CompositionRenderer, Raster, RandomSource, RenderError, Scene};

// Re-export sources
pub use acquisition::{
    require_snapshot, JsonLinesSource, SimulatedWristband, SnapshotEvent, SnapshotSource,
    SourceError,
};
