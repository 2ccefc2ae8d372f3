//! Headless driver: runs a dam-break-style simulation for a few seconds of
//! simulated time and logs summary statistics.
//!
//! Run with: cargo run -p orchestrator --example headless [config.json]

use orchestrator::{FluidConfig, SimulationRunner, SpawnConfig};
use std::cell::Cell;
use std::rc::Rc;

fn default_config() -> FluidConfig {
    FluidConfig {
        name: "headless dam break".to_string(),
        gravity: 9.81,
        collision_damping: 0.95,
        smoothing_radius: 0.35,
        target_density: 55.0,
        pressure_multiplier: 500.0,
        near_pressure_multiplier: 18.0,
        viscosity_strength: 0.06,
        particle_mass: 1.0,
        half_extent: [8.0, 4.5],
        spawn: SpawnConfig {
            count: 1600,
            centre: [-3.0, 0.0],
            size: [6.0, 6.0],
            seed: 42,
        },
        iterations_per_frame: 3,
        time_scale: 1.0,
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let mut runner = match std::env::args().nth(1) {
        Some(path) => orchestrator::create_simulation(&path)?,
        None => SimulationRunner::new(default_config())?,
    };

    let substeps = Rc::new(Cell::new(0u64));
    let substeps_observer = Rc::clone(&substeps);
    runner.on_step_completed(move || substeps_observer.set(substeps_observer.get() + 1));

    let frame_dt = 1.0 / 60.0;
    let frames = 600; // 10 seconds of simulated time

    runner.toggle_pause();
    for frame in 0..frames {
        runner.update(frame_dt);

        if frame % 60 == 0 {
            let p = runner.sim().particles();
            let n = p.len() as f32;
            let mean_density: f32 = p.density.iter().sum::<f32>() / n;
            let max_speed = p
                .vx
                .iter()
                .zip(&p.vy)
                .map(|(vx, vy)| (vx * vx + vy * vy).sqrt())
                .fold(0.0_f32, f32::max);
            tracing::info!(
                frame,
                substeps = substeps.get(),
                mean_density,
                max_speed,
                "progress"
            );
        }
    }

    tracing::info!(
        substeps = substeps.get(),
        particles = runner.sim().particle_count(),
        "finished"
    );
    Ok(())
}
