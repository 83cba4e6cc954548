//! Application Configuration - session, renderer and wristband settings
//!
//! Each struct implements `Default` with the values the renderer and
//! simulated device use when no config file is present.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::defaults;
use crate::types::HealthSnapshot;

// ============================================================================
// Top-Level Config
// ============================================================================

/// Root configuration.
///
/// Load with `AppConfig::load()` which searches:
/// 1. `$WATER_FORMULA_CONFIG` env var
/// 2. `./water_formula.toml`
/// 3. Built-in defaults
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Editable-formula session settings
    #[serde(default)]
    pub session: SessionConfig,

    /// Composition renderer settings
    #[serde(default)]
    pub render: RenderConfig,

    /// Simulated wristband settings
    #[serde(default)]
    pub device: DeviceConfig,
}

impl AppConfig {
    /// Load configuration using the standard search order:
    /// 1. `$WATER_FORMULA_CONFIG` environment variable
    /// 2. `./water_formula.toml` in the current working directory
    /// 3. Built-in defaults
    pub fn load() -> Self {
        // 1. Check env var
        if let Ok(path) = std::env::var(defaults::CONFIG_ENV_VAR) {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(config) => {
                        info!(path = %p.display(), "Loaded config from {}", defaults::CONFIG_ENV_VAR);
                        return config;
                    }
                    Err(e) => {
                        warn!(path = %p.display(), error = %e, "Failed to load config from {}, falling back", defaults::CONFIG_ENV_VAR);
                    }
                }
            } else {
                warn!(path = %path, "{} points to non-existent file, falling back", defaults::CONFIG_ENV_VAR);
            }
        }

        // 2. Check ./water_formula.toml
        let local = PathBuf::from(defaults::LOCAL_CONFIG_FILE);
        if local.exists() {
            match Self::load_from_file(&local) {
                Ok(config) => {
                    info!("Loaded config from ./{}", defaults::LOCAL_CONFIG_FILE);
                    return config;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load ./{}, using defaults", defaults::LOCAL_CONFIG_FILE);
                }
            }
        }

        // 3. Defaults
        info!("No {} found, using built-in defaults", defaults::LOCAL_CONFIG_FILE);
        Self::default()
    }

    /// Load from a specific TOML file path.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        Self::from_toml_str(&contents).map_err(|e| match e {
            ConfigError::Parse(_, err) => ConfigError::Parse(path.to_path_buf(), err),
            other => other,
        })
    }

    /// Parse and validate a TOML document.
    ///
    /// Unknown keys and suspicious values are logged as warnings and never
    /// fail the load; impossible values fail with `ConfigError::Validation`.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        for w in super::validation::validate_unknown_keys(contents) {
            warn!("{}", w);
        }

        let config: Self = toml::from_str(contents)
            .map_err(|e| ConfigError::Parse(PathBuf::new(), e))?;
        config.validate()?;

        for w in super::validation::validate_suspicious_values(&config) {
            warn!("{}", w);
        }
        Ok(config)
    }

    /// Serialize the current config to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    /// Write the config to a file (used by `water-formula config --write`).
    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = self.to_toml()?;
        std::fs::write(path, contents)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        info!(path = %path.display(), "Config saved");
        Ok(())
    }

    /// Validate all settings for internal consistency.
    ///
    /// Rules:
    /// - Every min/max pair must be finite with min <= max
    /// - Canvas must be within `MIN_CANVAS_SIZE..=MAX_CANVAS_SIZE` on both axes
    /// - Ripple count must not exceed `MAX_RIPPLE_COUNT`
    /// - Opacities must lie in [0, 1]
    /// - Poll interval must be > 0
    pub fn validate(&self) -> Result<(), ConfigError> {
        let r = &self.render;
        let mut errors: Vec<String> = Vec::new();

        if self.session.default_recipe_name.trim().is_empty() {
            errors.push("session.default_recipe_name must not be empty".to_string());
        }

        if r.width < defaults::MIN_CANVAS_SIZE || r.height < defaults::MIN_CANVAS_SIZE {
            errors.push(format!(
                "render: canvas {}x{} is below the minimum {min}x{min}",
                r.width,
                r.height,
                min = defaults::MIN_CANVAS_SIZE
            ));
        }
        if r.width > defaults::MAX_CANVAS_SIZE || r.height > defaults::MAX_CANVAS_SIZE {
            errors.push(format!(
                "render: canvas {}x{} exceeds the maximum {max}x{max}",
                r.width,
                r.height,
                max = defaults::MAX_CANVAS_SIZE
            ));
        }
        if r.ripple_count > defaults::MAX_RIPPLE_COUNT {
            errors.push(format!(
                "render.ripple_count = {} must be <= {}",
                r.ripple_count,
                defaults::MAX_RIPPLE_COUNT
            ));
        }

        Self::check_range(
            r.min_particle_radius,
            r.max_particle_radius,
            "render.particle_radius",
            &mut errors,
        );
        if r.min_particle_radius <= 0.0 {
            errors.push(format!(
                "render.min_particle_radius = {:.2} must be > 0",
                r.min_particle_radius
            ));
        }

        Self::check_range(
            r.min_particle_opacity,
            r.max_particle_opacity,
            "render.particle_opacity",
            &mut errors,
        );
        for (name, v) in [
            ("render.min_particle_opacity", r.min_particle_opacity),
            ("render.max_particle_opacity", r.max_particle_opacity),
        ] {
            if !(0.0..=1.0).contains(&v) {
                errors.push(format!("{name} = {v:.2} must be within [0, 1]"));
            }
        }

        if !r.particle_scale.is_finite() || r.particle_scale < 0.0 {
            errors.push(format!(
                "render.particle_scale = {} must be finite and >= 0",
                r.particle_scale
            ));
        }
        if !r.ripple_amplitude.is_finite() {
            errors.push("render.ripple_amplitude must be finite".to_string());
        }

        if self.device.poll_interval_ms == 0 {
            errors.push("device.poll_interval_ms must be > 0".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    fn check_range(min: f64, max: f64, name: &str, errors: &mut Vec<String>) {
        // NaN/Inf comparisons silently pass, so catch them explicitly
        if !min.is_finite() || !max.is_finite() {
            errors.push(format!(
                "{name}: values must be finite (got min={min}, max={max})"
            ));
            return;
        }
        if max < min {
            errors.push(format!("{name}: max ({max:.3}) must be >= min ({min:.3})"));
        }
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(PathBuf, std::io::Error),
    Parse(PathBuf, toml::de::Error),
    Serialize(toml::ser::Error),
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(path, e) => write!(f, "Config I/O error ({}): {}", path.display(), e),
            ConfigError::Parse(path, e) => {
                write!(f, "Config parse error ({}): {}", path.display(), e)
            }
            ConfigError::Serialize(e) => write!(f, "Config serialization error: {}", e),
            ConfigError::Validation(errors) => {
                writeln!(f, "Config validation failed:")?;
                for e in errors {
                    writeln!(f, "  - {}", e)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Session
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Name of the editable formula after a reset to defaults
    #[serde(default = "default_recipe_name")]
    pub default_recipe_name: String,
}

fn default_recipe_name() -> String {
    defaults::DEFAULT_RECIPE_NAME.to_string()
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            default_recipe_name: default_recipe_name(),
        }
    }
}

// ============================================================================
// Renderer
// ============================================================================

/// Composition renderer tuning.
///
/// Particle count per element is
/// `floor(level / max_level * particle_scale) + min_particles`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Canvas width (px)
    pub width: u32,
    /// Canvas height (px)
    pub height: u32,
    pub particle_scale: f64,
    pub min_particles: u32,
    /// Particle radius range (px)
    pub min_particle_radius: f64,
    pub max_particle_radius: f64,
    /// Particle opacity range
    pub min_particle_opacity: f64,
    pub max_particle_opacity: f64,
    /// Ripple strokes over the water body
    pub ripple_count: u32,
    /// Ripple radius oscillation (px)
    pub ripple_amplitude: f64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: defaults::CANVAS_SIZE,
            height: defaults::CANVAS_SIZE,
            particle_scale: defaults::PARTICLE_SCALE,
            min_particles: defaults::MIN_PARTICLES,
            min_particle_radius: defaults::PARTICLE_RADIUS_RANGE.0,
            max_particle_radius: defaults::PARTICLE_RADIUS_RANGE.1,
            min_particle_opacity: defaults::PARTICLE_OPACITY_RANGE.0,
            max_particle_opacity: defaults::PARTICLE_OPACITY_RANGE.1,
            ripple_count: defaults::RIPPLE_COUNT,
            ripple_amplitude: defaults::RIPPLE_AMPLITUDE,
        }
    }
}

// ============================================================================
// Simulated Wristband
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// Interval between readings (ms)
    pub poll_interval_ms: u64,
    /// Random-walk seed; unset means OS entropy
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Reading the random walk starts from
    pub baseline: HealthSnapshot,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: defaults::DEVICE_POLL_INTERVAL_MS,
            seed: None,
            baseline: HealthSnapshot::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validates() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok(), "Default config must always validate");
    }

    #[test]
    fn test_empty_toml_produces_defaults() {
        let config: AppConfig = toml::from_str("").expect("empty TOML should parse");
        assert_eq!(config.session.default_recipe_name, "My Custom Water");
        assert_eq!(config.render.width, 240);
        assert_eq!(config.render.min_particles, 5);
        assert_eq!(config.render.particle_scale, 50.0);
        assert_eq!(config.device.poll_interval_ms, 5_000);
        assert_eq!(config.device.baseline.heart_rate, 72.0);
    }

    #[test]
    fn test_partial_toml_override() {
        let toml_str = r#"
[render]
width = 480
max_particle_radius = 8.0

[device]
seed = 42
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("partial TOML should parse");
        assert_eq!(config.render.width, 480);
        assert_eq!(config.render.max_particle_radius, 8.0);
        assert_eq!(config.device.seed, Some(42));
        // Non-overridden values retain defaults
        assert_eq!(config.render.height, 240);
        assert_eq!(config.render.min_particle_radius, 2.0);
        assert_eq!(config.device.poll_interval_ms, 5_000);
    }

    #[test]
    fn test_validation_catches_inverted_ranges() {
        let mut config = AppConfig::default();
        config.render.min_particle_radius = 6.0;
        config.render.max_particle_radius = 2.0;
        let result = config.validate();
        assert!(result.is_err(), "Inverted radius range should fail validation");
        if let Err(ConfigError::Validation(errors)) = result {
            assert!(errors.iter().any(|e| e.contains("particle_radius")));
        }
    }

    #[test]
    fn test_validation_catches_small_canvas() {
        let mut config = AppConfig::default();
        config.render.width = 32;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_catches_oversized_canvas() {
        let mut config = AppConfig::default();
        config.render.width = u32::MAX;
        config.render.height = u32::MAX;
        match config.validate() {
            Err(ConfigError::Validation(errors)) => {
                assert_eq!(errors.len(), 1, "{errors:?}");
                assert!(errors[0].contains("exceeds the maximum"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_validation_catches_excess_ripples() {
        let mut config = AppConfig::default();
        config.render.ripple_count = 4_000_000_000;
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Validation(ref e)) if e[0].contains("ripple_count")));
    }

    #[test]
    fn test_validation_catches_opacity_out_of_unit_range() {
        let mut config = AppConfig::default();
        config.render.max_particle_opacity = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_catches_nan_range() {
        let mut config = AppConfig::default();
        config.render.min_particle_opacity = f64::NAN;
        let result = config.validate();
        if let Err(ConfigError::Validation(errors)) = result {
            assert!(errors.iter().any(|e| e.contains("finite")));
        } else {
            panic!("NaN opacity should fail validation");
        }
    }

    #[test]
    fn test_validation_collects_every_error() {
        let mut config = AppConfig::default();
        config.session.default_recipe_name = "  ".to_string();
        config.device.poll_interval_ms = 0;
        match config.validate() {
            Err(ConfigError::Validation(errors)) => assert_eq!(errors.len(), 2),
            other => panic!("expected two validation errors, got {other:?}"),
        }
    }

    #[test]
    fn test_roundtrip_toml() {
        let mut original = AppConfig::default();
        original.device.seed = Some(7);
        let toml_str = original.to_toml().expect("serialization should work");
        assert!(toml_str.contains("[render]"), "Missing [render] section");
        assert!(toml_str.contains("[device.baseline]"), "Missing baseline section");
        let back: AppConfig = toml::from_str(&toml_str).expect("deserialization should work");
        assert_eq!(back.device.seed, Some(7));
        assert_eq!(back.device.baseline, original.device.baseline);
        assert_eq!(back.render.ripple_count, original.render.ripple_count);
    }
}
