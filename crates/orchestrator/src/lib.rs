//! Orchestration Layer
//!
//! This crate drives the SPH kernel crate through whole simulations:
//! - Configuration loading and fail-fast validation
//! - Deterministic initial-condition generation (jittered lattice)
//! - The frame-level runner state machine (pause / run / single-step / reset)
//!   with step-completed observer callbacks

#![warn(missing_docs)]

pub mod config;
pub mod runner;
pub mod spawner;

pub use config::{FluidConfig, SpawnConfig};
pub use runner::{RunState, SimulationRunner};
pub use spawner::SpawnData;

/// Create a complete simulation from a configuration file.
///
/// Loads and validates the JSON configuration, runs the initial-condition
/// generator, and wraps the result in a paused [`SimulationRunner`].
///
/// # Example
/// ```no_run
/// let mut runner = orchestrator::create_simulation("config/dam_break.json")?;
/// runner.toggle_pause();
/// runner.update(1.0 / 60.0);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn create_simulation(config_path: &str) -> Result<SimulationRunner, Box<dyn std::error::Error>> {
    tracing::info!("Creating simulation from config: {}", config_path);

    let config = FluidConfig::load(config_path)?;
    tracing::info!("Configuration loaded: {}", config.name);

    let runner = SimulationRunner::new(config)?;
    Ok(runner)
}
