//! Reset behavior tests.
//!
//! Reset must restore positions and velocities bit-for-bit to the
//! initial-condition generator's output, from any simulation state and
//! regardless of how many substeps previously ran.

use orchestrator::{FluidConfig, RunState, SimulationRunner, SpawnConfig};

fn test_config() -> FluidConfig {
    FluidConfig {
        name: "reset-test".to_string(),
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
            count: 100,
            centre: [0.0, 1.0],
            size: [3.0, 3.0],
            seed: 42,
        },
        iterations_per_frame: 3,
        time_scale: 1.0,
    }
}

#[test]
fn reset_restores_spawn_state_bit_for_bit() {
    let mut runner = SimulationRunner::new(test_config()).unwrap();
    let initial = runner.sim().particles().clone();

    // Run a good number of frames so the state diverges substantially.
    runner.toggle_pause();
    for _ in 0..30 {
        runner.update(1.0 / 60.0);
    }
    assert_ne!(runner.sim().particles().y, initial.y);

    runner.reset();
    let p = runner.sim().particles();
    assert_eq!(p.x, initial.x, "positions must match spawn output exactly");
    assert_eq!(p.y, initial.y, "positions must match spawn output exactly");
    assert_eq!(p.vx, initial.vx, "velocities must be back to zero");
    assert_eq!(p.vy, initial.vy, "velocities must be back to zero");
    assert_eq!(p.pred_x, initial.x, "predicted positions re-seeded from positions");
}

#[test]
fn reset_is_idempotent() {
    let mut runner = SimulationRunner::new(test_config()).unwrap();
    runner.toggle_pause();
    for _ in 0..5 {
        runner.update(1.0 / 60.0);
    }

    runner.reset();
    let first = runner.sim().particles().clone();
    runner.reset();
    let second = runner.sim().particles();
    assert_eq!(second.x, first.x);
    assert_eq!(second.y, first.y);
    assert_eq!(second.vx, first.vx);
    assert_eq!(second.vy, first.vy);
}

#[test]
fn reset_pauses_the_simulation() {
    let mut runner = SimulationRunner::new(test_config()).unwrap();
    runner.toggle_pause();
    runner.update(1.0 / 60.0);

    runner.reset();
    assert_eq!(runner.state(), RunState::Paused);

    // An update after reset must not move anything.
    let frozen = runner.sim().particles().clone();
    runner.update(1.0 / 60.0);
    assert_eq!(runner.sim().particles().y, frozen.y);
}
