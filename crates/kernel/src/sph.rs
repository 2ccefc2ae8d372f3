//! SPH smoothing kernel functions and the per-substep force passes.
//!
//! All smoothing kernels are 2D and radially symmetric with support radius
//! equal to the smoothing radius `h`: poly6 for density, the steeper
//! spiky-cubed kernel for near-density, and spiky-squared for viscosity
//! weighting. Normalization constants are precomputed from `h` once per
//! settings change (see [`KernelScales`]) rather than recomputed per pair.
//!
//! The passes here are the data-parallel stages of the substep pipeline:
//! external forces, density summation, pressure + near-pressure force, and
//! viscosity force. Each is a read-all/write-own-slot map over particles;
//! pair contributions are accumulated into scratch arrays and applied after
//! the read phase, so no pass observes partially updated sibling state.

use std::f32::consts::PI;

use crate::eos;
use crate::neighbor::SpatialHash;
use crate::particle::ParticleArrays;
use crate::StepParams;

/// Lookahead applied to predicted positions, independent of the substep dt.
/// Only used for neighbor-search stability; never committed to positions.
const PREDICTION_DT: f32 = 1.0 / 120.0;

/// Minimum pair distance used when normalizing direction vectors.
/// Pairs closer than this get a fixed unit direction instead of blowing up.
const DIST_EPSILON: f32 = 1.0e-6;

/// Floor for density denominators so near-zero densities cannot produce
/// unbounded impulses.
const DENSITY_EPSILON: f32 = 1.0e-8;

/// Precomputed normalization constants for the smoothing kernels, derived
/// from the smoothing radius.
///
/// Rebuilt whenever the smoothing radius changes and passed into each pass
/// as part of the immutable [`StepParams`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KernelScales {
    /// Poly6 density kernel: 4 / (pi h^8).
    pub poly6: f32,
    /// Spiky-cubed near-density kernel: 10 / (pi h^5).
    pub spiky_pow3: f32,
    /// Spiky-squared viscosity kernel: 6 / (pi h^4).
    pub spiky_pow2: f32,
    /// Derivative of the spiky-cubed kernel: 30 / (pi h^5).
    pub spiky_pow3_derivative: f32,
    /// Derivative of the spiky-squared kernel: 12 / (pi h^4).
    pub spiky_pow2_derivative: f32,
}

impl KernelScales {
    /// Compute the normalization constants for smoothing radius `h`.
    ///
    /// Degenerate radii are a caller precondition violation (rejected at
    /// configuration time); a non-positive `h` here is a programming error.
    pub fn for_radius(h: f32) -> Self {
        debug_assert!(h > 0.0, "smoothing radius must be positive");
        let h2 = h * h;
        let h4 = h2 * h2;
        let h5 = h4 * h;
        let h8 = h4 * h4;
        Self {
            poly6: 4.0 / (PI * h8),
            spiky_pow3: 10.0 / (PI * h5),
            spiky_pow2: 6.0 / (PI * h4),
            spiky_pow3_derivative: 30.0 / (PI * h5),
            spiky_pow2_derivative: 12.0 / (PI * h4),
        }
    }
}

/// Poly6 kernel: `(h^2 - d^2)^3` scaled by 4 / (pi h^8). Zero beyond `h`.
#[inline]
pub fn poly6(dst: f32, radius: f32, scale: f32) -> f32 {
    if dst < radius {
        let v = radius * radius - dst * dst;
        v * v * v * scale
    } else {
        0.0
    }
}

/// Spiky-cubed kernel: `(h - d)^3` scaled by 10 / (pi h^5). Zero beyond `h`.
#[inline]
pub fn spiky_pow3(dst: f32, radius: f32, scale: f32) -> f32 {
    if dst < radius {
        let v = radius - dst;
        v * v * v * scale
    } else {
        0.0
    }
}

/// Spiky-squared kernel: `(h - d)^2` scaled by 6 / (pi h^4). Zero beyond `h`.
#[inline]
pub fn spiky_pow2(dst: f32, radius: f32, scale: f32) -> f32 {
    if dst < radius {
        let v = radius - dst;
        v * v * scale
    } else {
        0.0
    }
}

/// Radial derivative of [`spiky_pow3`]; `scale` is 30 / (pi h^5).
/// Negative inside the support (the kernel decreases with distance).
#[inline]
pub fn spiky_pow3_derivative(dst: f32, radius: f32, scale: f32) -> f32 {
    if dst < radius {
        let v = radius - dst;
        -v * v * scale
    } else {
        0.0
    }
}

/// Radial derivative of [`spiky_pow2`]; `scale` is 12 / (pi h^4).
#[inline]
pub fn spiky_pow2_derivative(dst: f32, radius: f32, scale: f32) -> f32 {
    if dst < radius {
        -(radius - dst) * scale
    } else {
        0.0
    }
}

/// External forces pass, run first each substep.
///
/// Applies the gravity impulse to velocities and recomputes the predicted
/// positions used by the spatial hash and all later passes this substep.
pub fn apply_external_forces(p: &mut ParticleArrays, params: &StepParams) {
    for i in 0..p.len() {
        p.vy[i] -= params.gravity * params.dt;
        p.pred_x[i] = p.x[i] + p.vx[i] * PREDICTION_DT;
        p.pred_y[i] = p.y[i] + p.vy[i] * PREDICTION_DT;
    }
}

/// Density pass: SPH summation of density and near-density at the predicted
/// positions.
///
/// ```text
/// rho_i      = sum_j m * poly6(|r_ij|, h)
/// near_rho_i = sum_j m * spiky_pow3(|r_ij|, h)
/// ```
///
/// The self-contribution (j == i) is included, which keeps the density
/// bounded away from zero for isolated particles. Candidates from aliased
/// hash buckets are rejected by the distance check.
pub fn compute_densities(p: &mut ParticleArrays, grid: &SpatialHash, params: &StepParams) {
    let radius = params.smoothing_radius;
    let radius_sq = radius * radius;

    for i in 0..p.len() {
        let ox = p.pred_x[i];
        let oy = p.pred_y[i];
        let mut density = 0.0_f32;
        let mut near_density = 0.0_f32;

        grid.for_each_candidate(ox, oy, |j| {
            let dx = p.pred_x[j] - ox;
            let dy = p.pred_y[j] - oy;
            let dist_sq = dx * dx + dy * dy;
            if dist_sq > radius_sq {
                return;
            }
            let dst = dist_sq.sqrt();
            density += params.particle_mass * poly6(dst, radius, params.scales.poly6);
            near_density +=
                params.particle_mass * spiky_pow3(dst, radius, params.scales.spiky_pow3);
        });

        p.density[i] = density;
        p.near_density[i] = near_density;
    }
}

/// Pressure pass: converts densities to pressures via the linear equation of
/// state, then accumulates the symmetrized pressure-gradient force and adds
/// it to velocities as an impulse.
///
/// Each pair uses the average of the two particles' pressures (and near
/// pressures) and is normalized by the neighbor's own density, which keeps
/// the pair impulses approximately momentum-conserving.
pub fn apply_pressure_forces(p: &mut ParticleArrays, grid: &SpatialHash, params: &StepParams) {
    let n = p.len();
    let radius = params.smoothing_radius;
    let radius_sq = radius * radius;

    // EOS conversion for the whole pass up front; the neighbor loop reads
    // pressures of arbitrary particles.
    let mut pressure = vec![0.0_f32; n];
    let mut near_pressure = vec![0.0_f32; n];
    for i in 0..n {
        pressure[i] = eos::pressure_from_density(
            p.density[i],
            params.target_density,
            params.pressure_multiplier,
        );
        near_pressure[i] =
            eos::near_pressure_from_density(p.near_density[i], params.near_pressure_multiplier);
    }

    let mut fx = vec![0.0_f32; n];
    let mut fy = vec![0.0_f32; n];

    for i in 0..n {
        let ox = p.pred_x[i];
        let oy = p.pred_y[i];

        grid.for_each_candidate(ox, oy, |j| {
            if j == i {
                return;
            }
            let dx = p.pred_x[j] - ox;
            let dy = p.pred_y[j] - oy;
            let dist_sq = dx * dx + dy * dy;
            if dist_sq > radius_sq {
                return;
            }
            let dst = dist_sq.sqrt();
            let (ux, uy) = if dst > DIST_EPSILON {
                (dx / dst, dy / dst)
            } else {
                // Coincident particles have no meaningful direction; push
                // them apart along a fixed axis.
                (0.0, 1.0)
            };

            let shared_pressure = 0.5 * (pressure[i] + pressure[j]);
            let shared_near_pressure = 0.5 * (near_pressure[i] + near_pressure[j]);
            let density_j = p.density[j].max(DENSITY_EPSILON);
            let near_density_j = p.near_density[j].max(DENSITY_EPSILON);

            let grad = spiky_pow2_derivative(dst, radius, params.scales.spiky_pow2_derivative);
            let near_grad =
                spiky_pow3_derivative(dst, radius, params.scales.spiky_pow3_derivative);

            fx[i] += ux * grad * shared_pressure / density_j;
            fy[i] += uy * grad * shared_pressure / density_j;
            fx[i] += ux * near_grad * shared_near_pressure / near_density_j;
            fy[i] += uy * near_grad * shared_near_pressure / near_density_j;
        });
    }

    // Impulse: a = F / rho, dv = a * dt.
    for i in 0..n {
        let density_i = p.density[i].max(DENSITY_EPSILON);
        p.vx[i] += fx[i] / density_i * params.dt;
        p.vy[i] += fy[i] / density_i * params.dt;
    }
}

/// Viscosity pass: velocity-difference-weighted force over neighbors using
/// the spiky-squared kernel, added to velocities as an impulse.
///
/// Pulls each particle's velocity toward its neighbors' velocities,
/// dissipating relative motion.
pub fn apply_viscosity_forces(p: &mut ParticleArrays, grid: &SpatialHash, params: &StepParams) {
    let n = p.len();
    let radius = params.smoothing_radius;
    let radius_sq = radius * radius;

    let mut fx = vec![0.0_f32; n];
    let mut fy = vec![0.0_f32; n];

    for i in 0..n {
        let ox = p.pred_x[i];
        let oy = p.pred_y[i];
        let vix = p.vx[i];
        let viy = p.vy[i];

        grid.for_each_candidate(ox, oy, |j| {
            if j == i {
                return;
            }
            let dx = p.pred_x[j] - ox;
            let dy = p.pred_y[j] - oy;
            let dist_sq = dx * dx + dy * dy;
            if dist_sq > radius_sq {
                return;
            }
            let dst = dist_sq.sqrt();
            let w = spiky_pow2(dst, radius, params.scales.spiky_pow2);
            fx[i] += (p.vx[j] - vix) * w;
            fy[i] += (p.vy[j] - viy) * w;
        });
    }

    for i in 0..n {
        p.vx[i] += fx[i] * params.viscosity_strength * params.dt;
        p.vy[i] += fy[i] * params.viscosity_strength * params.dt;
    }
}
