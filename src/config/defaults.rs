//! System-wide default constants.
//!
//! Centralises magic numbers that would otherwise be scattered across the
//! loader, renderer and simulated device. Grouped by subsystem.

// ============================================================================
// Config Loading
// ============================================================================

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "WATER_FORMULA_CONFIG";

/// Config file looked up in the current working directory.
pub const LOCAL_CONFIG_FILE: &str = "water_formula.toml";

// ============================================================================
// Session
// ============================================================================

/// Name given to the editable formula before the user renames it.
pub const DEFAULT_RECIPE_NAME: &str = "My Custom Water";

// ============================================================================
// Rendering
// ============================================================================

/// Logical canvas edge (px).
pub const CANVAS_SIZE: u32 = 240;

/// Smallest canvas the renderer accepts (px).
///
/// The particle ellipse is inset 20 px from each edge; below this the
/// scatter area collapses.
pub const MIN_CANVAS_SIZE: u32 = 64;

/// Canvas edge above which a config warning is logged (px).
pub const LARGE_CANVAS_WARN: u32 = 4096;

/// Hard canvas edge limit (px). Larger canvases are rejected.
pub const MAX_CANVAS_SIZE: u32 = 8192;

/// Particles added per unit of relative saturation (level / max_level).
pub const PARTICLE_SCALE: f64 = 50.0;

/// Particles drawn for any element present at all.
pub const MIN_PARTICLES: u32 = 5;

/// Particle radius range (px).
pub const PARTICLE_RADIUS_RANGE: (f64, f64) = (2.0, 6.0);

/// Particle opacity range.
pub const PARTICLE_OPACITY_RANGE: (f64, f64) = (0.5, 1.0);

/// Number of ripple strokes over the water body.
pub const RIPPLE_COUNT: u32 = 3;

/// Upper bound on configured ripple strokes.
pub const MAX_RIPPLE_COUNT: u32 = 64;

/// Ripple radius oscillation amplitude (px).
pub const RIPPLE_AMPLITUDE: f64 = 10.0;

// ============================================================================
// Simulated Wristband
// ============================================================================

/// Interval between simulated wristband readings (ms).
pub const DEVICE_POLL_INTERVAL_MS: u64 = 5_000;

/// Poll interval below which a config warning is logged (ms).
pub const FAST_POLL_WARN_MS: u64 = 100;
