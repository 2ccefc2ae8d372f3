//! Axis-aligned container boundary handling.
//!
//! The only collision geometry is a rectangular container centered on the
//! origin. Collision response is resolved independently per axis: a particle
//! past an edge is clamped to the edge and the corresponding velocity
//! component is reflected and damped. Corners get no special casing; the
//! two axes simply both trigger, an accepted approximation for this model.

use crate::particle::ParticleArrays;

/// Clamp particles into the container and reflect-and-damp the velocity
/// component of any axis whose half-extent was exceeded.
///
/// `half_extent` is the container half width and half height;
/// `collision_damping` in [0, 1] scales the reflected velocity component.
pub fn resolve_collisions(p: &mut ParticleArrays, half_extent: [f32; 2], collision_damping: f32) {
    for i in 0..p.len() {
        if p.x[i].abs() > half_extent[0] {
            p.x[i] = half_extent[0] * p.x[i].signum();
            p.vx[i] *= -collision_damping;
        }
        if p.y[i].abs() > half_extent[1] {
            p.y[i] = half_extent[1] * p.y[i].signum();
            p.vy[i] *= -collision_damping;
        }
    }
}
