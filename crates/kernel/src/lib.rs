//! 2D SPH Fluid Simulation Kernel
//!
//! This crate provides the core simulation kernel for a 2D smoothed-particle
//! hydrodynamics (SPH) fluid. It is designed to be separable and
//! compute-focused.
//!
//! # Modules
//! - [`particle`] -- Struct-of-arrays particle storage.
//! - [`sph`] -- Smoothing kernels (poly6, spiky) and the force passes.
//! - [`neighbor`] -- GPU-shaped spatial hash for neighbor search.
//! - [`eos`] -- Linear equation of state (pressure, near-pressure).
//! - [`boundary`] -- Axis-aligned container collision response.

#![warn(missing_docs)]

pub mod boundary;
pub mod eos;
pub mod neighbor;
pub mod particle;
pub mod sph;

pub use neighbor::{SpatialEntry, SpatialHash};
pub use particle::ParticleArrays;
pub use sph::KernelScales;

/// Immutable per-substep simulation parameters.
///
/// Built once per settings change by the orchestrator (with a fresh `dt`
/// per frame) and passed by reference into every pass; nothing in the
/// pipeline mutates it. The kernel normalization constants in `scales` must
/// be derived from `smoothing_radius` (see [`KernelScales::for_radius`]).
#[derive(Debug, Clone, Copy)]
pub struct StepParams {
    /// Substep duration in seconds.
    pub dt: f32,
    /// Gravity magnitude; applied as an acceleration along -y.
    pub gravity: f32,
    /// Velocity damping factor in [0, 1] applied on boundary reflection.
    pub collision_damping: f32,
    /// Smoothing radius `h`; also the spatial hash cell size.
    pub smoothing_radius: f32,
    /// Rest density the pressure term relaxes toward.
    pub target_density: f32,
    /// Linear equation-of-state stiffness.
    pub pressure_multiplier: f32,
    /// Stiffness of the short-range anti-clustering pressure term.
    pub near_pressure_multiplier: f32,
    /// Viscosity force strength.
    pub viscosity_strength: f32,
    /// Per-particle mass used in the density summations.
    pub particle_mass: f32,
    /// Container half width and half height.
    pub half_extent: [f32; 2],
    /// Kernel normalization constants derived from `smoothing_radius`.
    pub scales: KernelScales,
}

impl StepParams {
    /// Neutral parameter set for smoothing radius `h`: no gravity, no
    /// pressure or viscosity response, unit mass, a large container, and a
    /// small fixed `dt`. Callers override the fields they care about.
    pub fn for_radius(h: f32) -> Self {
        Self {
            dt: 1.0 / 180.0,
            gravity: 0.0,
            collision_damping: 1.0,
            smoothing_radius: h,
            target_density: 0.0,
            pressure_multiplier: 0.0,
            near_pressure_multiplier: 0.0,
            viscosity_strength: 0.0,
            particle_mass: 1.0,
            half_extent: [1.0e6, 1.0e6],
            scales: KernelScales::for_radius(h),
        }
    }
}

/// The per-step simulation pipeline.
///
/// Owns the per-particle state buffers and the spatial hash for the
/// simulation's lifetime, and advances them one substep at a time through
/// the fixed pass sequence:
///
/// 1. External forces (gravity impulse + predicted positions)
/// 2. Spatial hash build (hash, sort, bucket offsets)
/// 3. Density summation
/// 4. Pressure + near-pressure force
/// 5. Viscosity force
/// 6. Position integration + container collision response
///
/// Passes run in strict order; each completes fully before the next begins,
/// which is the only synchronization the pipeline needs (no pass writes
/// another particle's slot).
pub struct FluidSim {
    particles: ParticleArrays,
    grid: SpatialHash,
}

impl FluidSim {
    /// Create a simulation from initial positions and velocities.
    ///
    /// The particle count is fixed from the input lengths; all buffers are
    /// allocated here and never reallocated.
    ///
    /// # Panics
    /// Panics if the input vectors do not all have the same length.
    pub fn new(x: Vec<f32>, y: Vec<f32>, vx: Vec<f32>, vy: Vec<f32>) -> Self {
        let particles = ParticleArrays::from_initial(x, y, vx, vy);
        let grid = SpatialHash::new(particles.len());
        tracing::debug!(particles = particles.len(), "fluid simulation created");
        Self { particles, grid }
    }

    /// Advance the simulation by one substep.
    pub fn substep(&mut self, params: &StepParams) {
        sph::apply_external_forces(&mut self.particles, params);

        self.grid.build(
            &self.particles.pred_x,
            &self.particles.pred_y,
            params.smoothing_radius,
        );

        sph::compute_densities(&mut self.particles, &self.grid, params);
        sph::apply_pressure_forces(&mut self.particles, &self.grid, params);
        sph::apply_viscosity_forces(&mut self.particles, &self.grid, params);

        // Integrator: commit velocities to positions, then container response.
        let p = &mut self.particles;
        for i in 0..p.len() {
            p.x[i] += p.vx[i] * params.dt;
            p.y[i] += p.vy[i] * params.dt;
        }
        boundary::resolve_collisions(p, params.half_extent, params.collision_damping);
    }

    /// Read-only access to the particle buffers (positions, velocities,
    /// densities) for rendering and diagnostics.
    pub fn particles(&self) -> &ParticleArrays {
        &self.particles
    }

    /// Number of particles in the simulation.
    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    /// Spatial hash of the most recent substep, for diagnostics.
    pub fn grid(&self) -> &SpatialHash {
        &self.grid
    }

    /// Re-seed positions, predicted positions, and velocities from initial
    /// condition data without reallocating any buffer.
    ///
    /// # Panics
    /// Panics if any slice length differs from the particle count.
    pub fn reseed(&mut self, x: &[f32], y: &[f32], vx: &[f32], vy: &[f32]) {
        self.particles.reseed(x, y, vx, vy);
    }
}
