//! water-formula - personalized trace-element water from wristband readings
//!
//! # Usage
//!
//! ```bash
//! # Print the element catalog
//! water-formula catalog
//!
//! # Recommend a formula for one reading
//! echo '{"heartRate":72,"hydrationLevel":45,"bodyTemperature":36.8,"stressLevel":20}' \
//!     | water-formula recommend
//!
//! # Render a formula to PNG
//! water-formula render --levels magnesium=35,zinc=8 --output water.png --seed 7
//!
//! # Drive the engine from the simulated wristband
//! water-formula simulate --ticks 20 --speed 0 --auto-apply --output-dir frames/
//! ```
//!
//! # Environment Variables
//!
//! - `WATER_FORMULA_CONFIG`: Path to a TOML config file
//! - `RUST_LOG`: Logging level (default: info)

use anyhow::{Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::json;
use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

use water_formula::acquisition::{require_snapshot, JsonLinesSource, SimulatedWristband, SnapshotSource};
use water_formula::catalog;
use water_formula::config::AppConfig;
use water_formula::recommendation::{generate_recommendation, health_benefits};
use water_formula::render::{ripple_clock, CompositionRenderer, RandomSource};
use water_formula::{Formula, RecipeStore, RecommendationUpdate};

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "water-formula")]
#[command(about = "Personalized trace-element water formulas from wearable health readings")]
#[command(version)]
struct CliArgs {
    /// Config file (overrides WATER_FORMULA_CONFIG and ./water_formula.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: SubCommand,
}

#[derive(clap::Subcommand, Debug)]
enum SubCommand {
    /// Print the trace-element catalog as JSON
    Catalog,

    /// Recommend a formula for one health snapshot (JSON)
    Recommend {
        /// Snapshot file; reads stdin when omitted
        #[arg(long)]
        input: Option<PathBuf>,
    },

    /// Render a formula's composition to PNG
    Render {
        /// Element overrides on top of the catalog defaults, e.g. magnesium=35,zinc=8
        #[arg(long, value_delimiter = ',')]
        levels: Vec<String>,

        /// Formula JSON file to start from instead of the defaults
        #[arg(long)]
        formula: Option<PathBuf>,

        /// Output PNG path
        #[arg(short, long)]
        output: PathBuf,

        /// Particle scatter seed (random when omitted)
        #[arg(long)]
        seed: Option<u64>,

        /// Ripple phase in seconds (wall clock when omitted)
        #[arg(long)]
        time: Option<f64>,
    },

    /// Run the simulated wristband through the engine and recipe store
    Simulate {
        /// Number of readings to take
        #[arg(long, default_value = "10")]
        ticks: u64,

        /// Wristband seed (overrides device.seed)
        #[arg(long)]
        seed: Option<u64>,

        /// Speed multiplier for the poll cadence (1 = realtime, 0 = no delay)
        #[arg(long, default_value = "1")]
        speed: f64,

        /// Write one PNG per reading into this directory
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Apply and save each new recommendation as it appears
        #[arg(long)]
        auto_apply: bool,
    },

    /// Print the effective configuration as TOML
    Config {
        /// Write it to this path instead of stdout
        #[arg(long, value_name = "PATH")]
        write: Option<PathBuf>,
    },
}

fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    match path {
        Some(p) => AppConfig::load_from_file(p)
            .with_context(|| format!("Failed to load config {}", p.display())),
        None => Ok(AppConfig::load()),
    }
}

fn print_json(value: &serde_json::Value) -> Result<()> {
    let mut out = io::stdout().lock();
    serde_json::to_writer_pretty(&mut out, value).context("Failed to write JSON")?;
    writeln!(out)?;
    Ok(())
}

// ============================================================================
// Subcommands
// ============================================================================

fn run_recommend(input: Option<&Path>) -> Result<()> {
    let event = match input {
        Some(path) => {
            let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
            JsonLinesSource::strict(BufReader::new(file), path.display().to_string()).next_snapshot()
        }
        None => JsonLinesSource::strict(io::stdin().lock(), "stdin").next_snapshot(),
    }
    .context("Failed to read health snapshot")?;

    let snapshot = require_snapshot(event.into_snapshot())?;
    let recommendation = generate_recommendation(&snapshot);
    let benefits: Vec<_> = health_benefits(&snapshot)
        .into_iter()
        .map(|b| json!({ "benefit": b, "description": b.describe() }))
        .collect();

    print_json(&json!({
        "recommendation": recommendation,
        "summary": recommendation.formula.summary(),
        "composition": recommendation.composition(),
        "benefits": benefits,
    }))
}

fn parse_level(pair: &str) -> Result<(&str, f64)> {
    let (key, value) = pair
        .split_once('=')
        .with_context(|| format!("Expected element=value, got '{pair}'"))?;
    let value: f64 = value
        .trim()
        .parse()
        .with_context(|| format!("Invalid level for {key}: '{value}'"))?;
    Ok((key.trim(), value))
}

fn run_render(
    config: &AppConfig,
    levels: &[String],
    formula: Option<&Path>,
    output: &Path,
    seed: Option<u64>,
    time: Option<f64>,
) -> Result<()> {
    let mut store = RecipeStore::new(config.session.default_recipe_name.clone());
    if let Some(path) = formula {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let loaded: Formula = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid formula JSON in {}", path.display()))?;
        store.set_current(loaded);
    }
    for pair in levels {
        let (key, value) = parse_level(pair)?;
        let stored = store.mutate_level(key, value)?;
        if stored != value {
            warn!(element = key, requested = value, stored, "Level clamped to catalog range");
        }
    }

    let renderer = CompositionRenderer::new(config.render.clone())?;
    let mut rng: Box<dyn RandomSource> = match seed {
        Some(s) => Box::new(StdRng::seed_from_u64(s)),
        None => Box::new(rand::thread_rng()),
    };
    let raster = renderer.render(
        catalog::elements(),
        &store.current().levels,
        rng.as_mut(),
        time.unwrap_or_else(ripple_clock),
    )?;
    raster.save_png(output)?;

    info!(formula = %store.current().name, path = %output.display(), "Rendered");
    println!("{}", store.current().summary());
    Ok(())
}

fn run_simulate(
    config: &AppConfig,
    ticks: u64,
    seed: Option<u64>,
    speed: f64,
    output_dir: Option<&Path>,
    auto_apply: bool,
) -> Result<()> {
    let mut device_config = config.device.clone();
    if seed.is_some() {
        device_config.seed = seed;
    }
    let mut device = SimulatedWristband::from_config(&device_config);
    let mut store = RecipeStore::new(config.session.default_recipe_name.clone());
    let renderer = CompositionRenderer::new(config.render.clone())?;
    let mut rng = match device_config.seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };

    if let Some(dir) = output_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
    }

    let delay = if speed > 0.0 {
        Duration::try_from_secs_f64(device.poll_interval().as_secs_f64() / speed)
            .with_context(|| format!("Invalid --speed {speed}"))?
    } else {
        Duration::ZERO
    };

    info!(source = device.source_name(), ticks, speed, "Starting simulation");

    for tick in 1..=ticks {
        if tick > 1 && !delay.is_zero() {
            std::thread::sleep(delay);
        }
        let snapshot = require_snapshot(device.next_snapshot()?.into_snapshot())?;
        let recommendation = generate_recommendation(&snapshot);
        let trigger = recommendation.trigger;
        let update = store.track_recommendation(recommendation, auto_apply, &format!("tick {tick}"));
        if update != RecommendationUpdate::Unchanged {
            info!(tick, trigger = %trigger, "New recommendation");
        }

        if let Some(dir) = output_dir {
            let path = dir.join(format!("tick_{tick:04}.png"));
            renderer
                .render(catalog::elements(), &store.current().levels, &mut rng, tick as f64)?
                .save_png(&path)
                .with_context(|| format!("Failed to write {}", path.display()))?;
        }

        let line = json!({
            "tick": tick,
            "snapshot": snapshot,
            "trigger": trigger,
            "current": store.current().name,
        });
        println!("{line}");
    }

    info!(saved = store.saved().len(), "Simulation complete");
    for (idx, recipe) in store.saved().iter().enumerate() {
        info!(index = idx, name = %recipe.formula.name, "{}", recipe.formula.summary());
    }
    Ok(())
}

fn run_config(config: &AppConfig, write: Option<&Path>) -> Result<()> {
    match write {
        Some(path) => config
            .save_to_file(path)
            .with_context(|| format!("Failed to write config to {}", path.display())),
        None => {
            print!("{}", config.to_toml()?);
            Ok(())
        }
    }
}

// ============================================================================
// Entry Point
// ============================================================================

fn main() -> Result<()> {
    // Logs go to stderr; stdout carries JSON and TOML output
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let args = CliArgs::parse();

    match args.command {
        SubCommand::Catalog => print_json(&serde_json::to_value(catalog::elements())?),
        SubCommand::Recommend { input } => run_recommend(input.as_deref()),
        SubCommand::Render {
            levels,
            formula,
            output,
            seed,
            time,
        } => {
            let config = load_config(args.config.as_deref())?;
            run_render(&config, &levels, formula.as_deref(), &output, seed, time)
        }
        SubCommand::Simulate {
            ticks,
            seed,
            speed,
            output_dir,
            auto_apply,
        } => {
            let config = load_config(args.config.as_deref())?;
            run_simulate(&config, ticks, seed, speed, output_dir.as_deref(), auto_apply)
        }
        SubCommand::Config { write } => {
            let config = load_config(args.config.as_deref())?;
            run_config(&config, write.as_deref())
        }
    }
}
