//! Particle data structures using struct-of-arrays layout for GPU-readiness and SIMD.

/// Struct-of-arrays particle storage for the 2D fluid.
///
/// All arrays are parallel: index `i` across every array refers to the same
/// particle, and all arrays keep the same length for the simulation's
/// lifetime. Separate x/y arrays (rather than a Vec2 type) are used
/// deliberately for SIMD lane utilization and straightforward GPU buffer
/// mapping.
///
/// `pred_x`/`pred_y` and the density pair are transient: they are rewritten
/// at the start of every substep and must not be relied on across substeps.
#[derive(Debug, Clone)]
pub struct ParticleArrays {
    /// X positions.
    pub x: Vec<f32>,
    /// Y positions.
    pub y: Vec<f32>,

    /// Predicted X positions (short lookahead used for neighbor search).
    pub pred_x: Vec<f32>,
    /// Predicted Y positions.
    pub pred_y: Vec<f32>,

    /// X velocities.
    pub vx: Vec<f32>,
    /// Y velocities.
    pub vy: Vec<f32>,

    /// Density estimate, rebuilt each substep.
    pub density: Vec<f32>,
    /// Near-density estimate (steeper kernel, anti-clustering), rebuilt each substep.
    pub near_density: Vec<f32>,
}

impl ParticleArrays {
    /// Create particle storage from initial positions and velocities.
    ///
    /// Predicted positions start equal to the positions; densities start at
    /// zero and are filled in by the first density pass.
    ///
    /// # Panics
    /// Panics if the four input vectors do not all have the same length.
    pub fn from_initial(x: Vec<f32>, y: Vec<f32>, vx: Vec<f32>, vy: Vec<f32>) -> Self {
        let n = x.len();
        assert_eq!(n, y.len(), "position arrays must have equal length");
        assert_eq!(n, vx.len(), "velocity arrays must match position length");
        assert_eq!(n, vy.len(), "velocity arrays must match position length");

        Self {
            pred_x: x.clone(),
            pred_y: y.clone(),
            x,
            y,
            vx,
            vy,
            density: vec![0.0; n],
            near_density: vec![0.0; n],
        }
    }

    /// Return the number of particles.
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// Return `true` if there are no particles.
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Overwrite positions, predicted positions, and velocities from seed
    /// data without reallocating.
    ///
    /// Used by reset: the particle count is fixed for the simulation's
    /// lifetime, so the seed slices must match the current length.
    ///
    /// # Panics
    /// Panics if any slice length differs from the current particle count.
    pub fn reseed(&mut self, x: &[f32], y: &[f32], vx: &[f32], vy: &[f32]) {
        let n = self.len();
        assert_eq!(n, x.len(), "reseed must not change the particle count");
        assert_eq!(n, y.len(), "reseed must not change the particle count");
        assert_eq!(n, vx.len(), "reseed must not change the particle count");
        assert_eq!(n, vy.len(), "reseed must not change the particle count");

        self.x.copy_from_slice(x);
        self.y.copy_from_slice(y);
        self.pred_x.copy_from_slice(x);
        self.pred_y.copy_from_slice(y);
        self.vx.copy_from_slice(vx);
        self.vy.copy_from_slice(vy);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_initial_sets_predicted_to_position() {
        let p = ParticleArrays::from_initial(
            vec![1.0, 2.0],
            vec![3.0, 4.0],
            vec![0.5, -0.5],
            vec![0.0, 0.0],
        );
        assert_eq!(p.len(), 2);
        assert_eq!(p.pred_x, p.x);
        assert_eq!(p.pred_y, p.y);
        assert_eq!(p.density, vec![0.0, 0.0]);
    }

    #[test]
    fn reseed_restores_seed_exactly() {
        let mut p = ParticleArrays::from_initial(
            vec![1.0, 2.0],
            vec![3.0, 4.0],
            vec![0.0, 0.0],
            vec![0.0, 0.0],
        );
        // Scribble over the state as a simulation would.
        p.x[0] = 9.0;
        p.vy[1] = -7.0;
        p.pred_x[1] = 42.0;
        p.density[0] = 5.0;

        p.reseed(&[1.0, 2.0], &[3.0, 4.0], &[0.0, 0.0], &[0.0, 0.0]);
        assert_eq!(p.x, vec![1.0, 2.0]);
        assert_eq!(p.y, vec![3.0, 4.0]);
        assert_eq!(p.pred_x, vec![1.0, 2.0]);
        assert_eq!(p.vx, vec![0.0, 0.0]);
        assert_eq!(p.vy, vec![0.0, 0.0]);
    }

    #[test]
    #[should_panic(expected = "particle count")]
    fn reseed_rejects_length_change() {
        let mut p =
            ParticleArrays::from_initial(vec![0.0], vec![0.0], vec![0.0], vec![0.0]);
        p.reseed(&[0.0, 1.0], &[0.0, 1.0], &[0.0, 0.0], &[0.0, 0.0]);
    }
}
