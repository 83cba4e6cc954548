//! Shared data structures for the water formula core
//!
//! - HealthSnapshot: wristband readings (engine input)
//! - Formula / Recommendation: engine and store values
//! - FormulaError: catalog and store error taxonomy
//! - thresholds: rule and hint constants

mod error;
mod formula;
mod health;
pub mod thresholds;

pub use error::*;
pub use formula::*;
pub use health::*;
