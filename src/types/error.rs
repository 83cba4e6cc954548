//! Formula-level error type shared by the catalog, engine boundary and store

use thiserror::Error;

/// Errors surfaced by catalog lookups and recipe store operations.
///
/// Out-of-range concentrations are not errors: they are clamped at the
/// store boundary and never reach the caller.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormulaError {
    #[error("Unknown trace element: '{0}'")]
    UnknownElement(String),

    #[error("No health snapshot available to generate a recommendation")]
    MissingSnapshot,

    #[error("Saved recipe #{index} not found ({saved} saved)")]
    SavedRecipeNotFound { index: usize, saved: usize },

    #[error("No recommendation has been received yet")]
    NoRecommendation,
}
