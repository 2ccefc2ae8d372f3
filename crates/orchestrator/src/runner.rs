//! Simulation runner: the frame-level state machine around the substep
//! pipeline.
//!
//! The runner owns the [`FluidSim`], the stored spawn data for reset, and
//! the per-substep parameter struct. Each `update` call runs a fixed number
//! of fixed-size substeps (the frame time divided by that count) and invokes
//! the registered step-completed observers after every substep, on the
//! caller's thread.

use kernel::{FluidSim, KernelScales};

use crate::config::FluidConfig;
use crate::spawner::{self, SpawnData};

/// Frame duration assumed for the warm-up substep performed during reset,
/// where no live frame time is available.
const RESET_FRAME_DT: f32 = 1.0 / 60.0;

/// Runner state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Simulation paused; `update` is a no-op.
    Paused,
    /// Simulation advancing every `update`.
    Running,
    /// Advance exactly one more frame, then return to `Paused`.
    StepFrame,
}

/// Callback invoked after every completed substep, with no payload.
pub type StepObserver = Box<dyn FnMut()>;

/// Frame-level driver for a [`FluidSim`].
pub struct SimulationRunner {
    config: FluidConfig,
    sim: FluidSim,
    /// Spawn output kept verbatim so reset can restore it bit-for-bit.
    spawn: SpawnData,
    /// Kernel normalization constants, rebuilt when the smoothing radius changes.
    scales: KernelScales,
    state: RunState,
    observers: Vec<StepObserver>,
}

impl SimulationRunner {
    /// Create a paused simulation from a validated configuration.
    ///
    /// Runs the initial-condition generator once and allocates all particle
    /// buffers from its output; the particle count is fixed from here on.
    pub fn new(config: FluidConfig) -> Result<Self, String> {
        config.validate()?;

        let spawn = spawner::spawn_particles(&config.spawn);
        let sim = FluidSim::new(
            spawn.x.clone(),
            spawn.y.clone(),
            spawn.vx.clone(),
            spawn.vy.clone(),
        );
        let scales = KernelScales::for_radius(config.smoothing_radius);

        tracing::info!(
            name = %config.name,
            particles = sim.particle_count(),
            "simulation created"
        );

        Ok(Self {
            config,
            sim,
            spawn,
            scales,
            state: RunState::Paused,
            observers: Vec::new(),
        })
    }

    /// Current runner state.
    pub fn state(&self) -> RunState {
        self.state
    }

    /// Flip between `Paused` and `Running`.
    pub fn toggle_pause(&mut self) {
        self.state = match self.state {
            RunState::Paused => RunState::Running,
            RunState::Running | RunState::StepFrame => RunState::Paused,
        };
    }

    /// Advance exactly one frame on the next `update`, then pause.
    pub fn step_frame(&mut self) {
        self.state = RunState::StepFrame;
    }

    /// Reset the simulation to its initial conditions.
    ///
    /// Re-seeds the particle buffers from the stored spawn data, runs a
    /// single warm-up substep so the auxiliary buffers (densities, spatial
    /// offsets) describe the initial configuration, then re-seeds again to
    /// discard the warm-up's position and velocity changes. The visible
    /// result is the exact spawn state with a consistent density display.
    pub fn reset(&mut self) {
        self.state = RunState::Paused;

        self.sim
            .reseed(&self.spawn.x, &self.spawn.y, &self.spawn.vx, &self.spawn.vy);
        let dt = self.substep_dt(RESET_FRAME_DT);
        let params = self.config.step_params(dt, self.scales);
        self.sim.substep(&params);
        self.sim
            .reseed(&self.spawn.x, &self.spawn.y, &self.spawn.vx, &self.spawn.vy);

        tracing::info!("simulation reset to initial conditions");
    }

    /// Run one frame of simulation if not paused.
    ///
    /// Performs `iterations_per_frame` substeps of equal duration derived
    /// from `frame_dt`, invoking every step-completed observer after each
    /// substep. A `StepFrame` request runs exactly one frame and then forces
    /// `Paused`.
    pub fn update(&mut self, frame_dt: f32) {
        if self.state == RunState::Paused {
            return;
        }

        let dt = self.substep_dt(frame_dt);
        let params = self.config.step_params(dt, self.scales);
        for _ in 0..self.config.iterations_per_frame {
            self.sim.substep(&params);
            for observer in &mut self.observers {
                observer();
            }
        }

        if self.state == RunState::StepFrame {
            self.state = RunState::Paused;
        }
    }

    /// Register a callback invoked synchronously after every substep.
    pub fn on_step_completed(&mut self, observer: impl FnMut() + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Read-only access to the simulation for rendering and inspection.
    pub fn sim(&self) -> &FluidSim {
        &self.sim
    }

    /// The active configuration.
    pub fn config(&self) -> &FluidConfig {
        &self.config
    }

    /// Replace the user-facing parameters with a new validated set.
    ///
    /// Kernel normalization constants are recomputed only when the smoothing
    /// radius actually changed. Spawn settings are intentionally not applied
    /// to the running simulation: the particle count is fixed at creation,
    /// and reset keeps restoring the original spawn data.
    pub fn set_config(&mut self, config: FluidConfig) -> Result<(), String> {
        config.validate()?;
        if config.smoothing_radius != self.config.smoothing_radius {
            self.scales = KernelScales::for_radius(config.smoothing_radius);
        }
        self.config = config;
        Ok(())
    }

    fn substep_dt(&self, frame_dt: f32) -> f32 {
        frame_dt / self.config.iterations_per_frame as f32 * self.config.time_scale
    }
}
