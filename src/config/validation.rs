//! Config validation: unknown-key detection with Levenshtein suggestions
//! and suspicious-value warnings.
//!
//! Two-pass parse approach: first deserialize raw TOML into `toml::Value`,
//! walk the key tree, compare against known field names, and emit warnings
//! with "did you mean?" suggestions. Then proceed with normal serde
//! deserialization. Warnings never break existing configs.

use std::collections::HashSet;

use super::defaults;

/// A non-fatal config warning (typo, suspicious value).
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(ref s) = self.suggestion {
            write!(f, " (did you mean '{s}'?)")?;
        }
        Ok(())
    }
}

// ============================================================================
// Known Config Keys
// ============================================================================

/// Returns the complete set of valid dotted key paths for AppConfig.
///
/// Maintained by hand to match the struct hierarchy in app_config.rs.
/// Any new field added there must be added here too.
pub fn known_config_keys() -> HashSet<&'static str> {
    let keys: &[&str] = &[
        // [session]
        "session",
        "session.default_recipe_name",
        // [render]
        "render",
        "render.width",
        "render.height",
        "render.particle_scale",
        "render.min_particles",
        "render.min_particle_radius",
        "render.max_particle_radius",
        "render.min_particle_opacity",
        "render.max_particle_opacity",
        "render.ripple_count",
        "render.ripple_amplitude",
        // [device]
        "device",
        "device.poll_interval_ms",
        "device.seed",
        // [device.baseline]
        "device.baseline",
        "device.baseline.heartRate",
        "device.baseline.hydrationLevel",
        "device.baseline.bodyTemperature",
        "device.baseline.stressLevel",
        "device.baseline.steps",
        "device.baseline.caloriesBurned",
        "device.baseline.sleepHours",
        "device.baseline.oxygenSaturation",
        "device.baseline.capturedAt",
        "device.baseline.bloodPressure",
        "device.baseline.bloodPressure.systolic",
        "device.baseline.bloodPressure.diastolic",
    ];
    keys.iter().copied().collect()
}

// ============================================================================
// TOML Key Walking
// ============================================================================

/// Recursively walks a `toml::Value` tree and collects all dotted key paths.
///
/// For example, a table `{ a = { b = 1, c = 2 } }` yields:
/// `["a", "a.b", "a.c"]`
pub fn walk_toml_keys(value: &toml::Value, prefix: &str) -> Vec<String> {
    let mut keys = Vec::new();
    if let Some(table) = value.as_table() {
        for (k, v) in table {
            let path = if prefix.is_empty() {
                k.clone()
            } else {
                format!("{prefix}.{k}")
            };
            keys.push(path.clone());
            if v.is_table() {
                keys.extend(walk_toml_keys(v, &path));
            }
        }
    }
    keys
}

// ============================================================================
// Levenshtein Distance
// ============================================================================

/// Compute the Levenshtein edit distance between two strings.
fn levenshtein(a: &str, b: &str) -> usize {
    let b_chars: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b_chars.len();
    }
    if b_chars.is_empty() {
        return a.chars().count();
    }

    let mut prev: Vec<usize> = (0..=b_chars.len()).collect();
    let mut curr = vec![0; b_chars.len() + 1];

    for (i, ca) in a.chars().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b_chars.iter().enumerate() {
            let cost = usize::from(ca != *cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b_chars.len()]
}

/// Suggest the closest known key for an unknown key, if within edit distance 3.
///
/// Ties resolve to the lexicographically smallest key so suggestions are
/// stable across runs.
pub fn suggest_correction(unknown: &str, known: &HashSet<&str>) -> Option<String> {
    known
        .iter()
        .map(|&k| (levenshtein(unknown, k), k))
        .filter(|(dist, _)| *dist <= 3)
        .min()
        .map(|(_, k)| k.to_string())
}

// ============================================================================
// Unknown Key Validation (entry point)
// ============================================================================

/// Parse a raw TOML string and return warnings for any unknown config keys.
///
/// This does NOT fail on unknown keys, it only warns.
pub fn validate_unknown_keys(raw_toml: &str) -> Vec<ValidationWarning> {
    let value: toml::Value = match raw_toml.parse() {
        Ok(v) => v,
        Err(_) => return Vec::new(), // parse errors are reported by serde later
    };

    let known = known_config_keys();
    walk_toml_keys(&value, "")
        .into_iter()
        .filter(|key| !known.contains(key.as_str()))
        .map(|key| ValidationWarning {
            suggestion: suggest_correction(&key, &known),
            message: format!("Unknown config key '{key}'"),
            field: key,
        })
        .collect()
}

// ============================================================================
// Suspicious Values
// ============================================================================

/// Values that load fine but are probably mistakes.
pub fn validate_suspicious_values(config: &super::AppConfig) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();
    let r = &config.render;

    if r.width > defaults::LARGE_CANVAS_WARN || r.height > defaults::LARGE_CANVAS_WARN {
        warnings.push(ValidationWarning {
            field: "render.width".to_string(),
            message: format!(
                "render canvas {}x{} is unusually large; each frame is re-rendered from scratch",
                r.width, r.height
            ),
            suggestion: None,
        });
    }

    if config.device.poll_interval_ms < defaults::FAST_POLL_WARN_MS {
        warnings.push(ValidationWarning {
            field: "device.poll_interval_ms".to_string(),
            message: format!(
                "device.poll_interval_ms = {} is faster than any wristband reports",
                config.device.poll_interval_ms
            ),
            suggestion: None,
        });
    }

    let baseline = &config.device.baseline;
    for (field, value) in [
        ("device.baseline.hydrationLevel", baseline.hydration_level),
        ("device.baseline.stressLevel", baseline.stress_level),
    ] {
        if !(0.0..=100.0).contains(&value) {
            warnings.push(ValidationWarning {
                field: field.to_string(),
                message: format!("{field} = {value:.1} is outside 0-100"),
                suggestion: None,
            });
        }
    }

    warnings
}
