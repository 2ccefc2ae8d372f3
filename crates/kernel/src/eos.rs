//! Equation of state: density to pressure conversion.
//!
//! The fluid uses a linear (weakly compressible) equation of state: pressure
//! grows linearly with the deviation from the target density, and a separate
//! near-pressure term grows linearly with the near-density to keep particles
//! from clustering at short range.

/// Linear equation of state.
///
/// ```text
/// P = k * (rho - rho_0)
/// ```
///
/// Negative when the fluid is locally sparser than the target density, which
/// pulls particles together and gives the fluid surface tension-like
/// cohesion.
#[inline]
pub fn pressure_from_density(density: f32, target_density: f32, multiplier: f32) -> f32 {
    (density - target_density) * multiplier
}

/// Near-pressure term used to prevent particle clustering.
///
/// Unlike the main pressure, this has no rest value: any near-density
/// produces a repulsive contribution.
#[inline]
pub fn near_pressure_from_density(near_density: f32, multiplier: f32) -> f32 {
    near_density * multiplier
}
