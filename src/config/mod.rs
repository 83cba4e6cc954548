//! Application Configuration Module
//!
//! Session, renderer and simulated-device settings loaded from TOML. Every
//! section is optional; missing values fall back to the built-in defaults.
//!
//! ## Loading Order
//!
//! 1. `WATER_FORMULA_CONFIG` environment variable (path to TOML file)
//! 2. `water_formula.toml` in the current working directory
//! 3. Built-in defaults
//!
//! Recommendation thresholds are not configurable; they live in
//! `types::thresholds`.

mod app_config;
pub mod defaults;
pub mod validation;

pub use app_config::*;
