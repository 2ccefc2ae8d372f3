//! Configuration parsing and validation for fluid simulations.

use serde::{Deserialize, Serialize};
use std::fs;

use kernel::{KernelScales, StepParams};

/// Main simulation configuration.
///
/// Loaded from JSON and validated up front; a degenerate value (non-positive
/// smoothing radius, zero container extent) would poison the kernel
/// normalization constants with division by zero, so configuration is the
/// fail-fast boundary for the whole pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FluidConfig {
    /// Human-readable simulation name.
    #[serde(default)]
    pub name: String,
    /// Gravity magnitude (applied downward, along -y).
    #[serde(default = "default_gravity")]
    pub gravity: f32,
    /// Velocity damping factor on boundary collision, in [0, 1].
    #[serde(default = "default_collision_damping")]
    pub collision_damping: f32,
    /// Smoothing radius; also the spatial hash cell size.
    pub smoothing_radius: f32,
    /// Rest density the pressure term relaxes toward.
    pub target_density: f32,
    /// Linear equation-of-state stiffness.
    pub pressure_multiplier: f32,
    /// Stiffness of the short-range anti-clustering pressure term.
    #[serde(default)]
    pub near_pressure_multiplier: f32,
    /// Viscosity force strength.
    #[serde(default)]
    pub viscosity_strength: f32,
    /// Per-particle mass used in the density summations.
    #[serde(default = "default_particle_mass")]
    pub particle_mass: f32,
    /// Container half width and half height.
    pub half_extent: [f32; 2],
    /// Initial-condition generator settings.
    pub spawn: SpawnConfig,
    /// Fixed number of substeps per rendered frame.
    #[serde(default = "default_iterations_per_frame")]
    pub iterations_per_frame: u32,
    /// Scale applied to the frame time before dividing into substeps.
    #[serde(default = "default_time_scale")]
    pub time_scale: f32,
}

/// Initial-condition generator settings: a jittered lattice of particles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpawnConfig {
    /// Number of particles to spawn.
    pub count: usize,
    /// Centre of the spawn rectangle.
    #[serde(default)]
    pub centre: [f32; 2],
    /// Width and height of the spawn rectangle.
    pub size: [f32; 2],
    /// Seed for the deterministic jitter.
    #[serde(default = "default_seed")]
    pub seed: u64,
}

fn default_gravity() -> f32 {
    9.81
}

fn default_collision_damping() -> f32 {
    0.95
}

fn default_particle_mass() -> f32 {
    1.0
}

fn default_iterations_per_frame() -> u32 {
    3
}

fn default_time_scale() -> f32 {
    1.0
}

fn default_seed() -> u64 {
    42
}

impl FluidConfig {
    /// Load configuration from a JSON file.
    pub fn load(path: &str) -> Result<Self, String> {
        let contents = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file {}: {}", path, e))?;

        let config: FluidConfig = serde_json::from_str(&contents)
            .map_err(|e| format!("Failed to parse config JSON: {}", e))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.smoothing_radius <= 0.0 {
            return Err("Smoothing radius must be positive".to_string());
        }
        if self.half_extent[0] <= 0.0 || self.half_extent[1] <= 0.0 {
            return Err("Container half-extent must be positive on both axes".to_string());
        }
        if !(0.0..=1.0).contains(&self.collision_damping) {
            return Err("Collision damping must be in range [0, 1]".to_string());
        }
        if self.gravity < 0.0 {
            return Err("Gravity magnitude must be non-negative".to_string());
        }
        if self.particle_mass <= 0.0 {
            return Err("Particle mass must be positive".to_string());
        }
        if self.target_density < 0.0 {
            return Err("Target density must be non-negative".to_string());
        }
        if self.viscosity_strength < 0.0 {
            return Err("Viscosity strength must be non-negative".to_string());
        }
        if self.iterations_per_frame == 0 {
            return Err("Iterations per frame must be at least 1".to_string());
        }
        if self.time_scale <= 0.0 {
            return Err("Time scale must be positive".to_string());
        }
        if self.spawn.count == 0 {
            return Err("Spawn count must be at least 1".to_string());
        }
        if self.spawn.size[0] <= 0.0 || self.spawn.size[1] <= 0.0 {
            return Err("Spawn size must be positive on both axes".to_string());
        }
        Ok(())
    }

    /// Build the immutable per-substep parameter struct for a substep of
    /// duration `dt`, reusing kernel normalization constants already derived
    /// from the current smoothing radius.
    pub fn step_params(&self, dt: f32, scales: KernelScales) -> StepParams {
        StepParams {
            dt,
            gravity: self.gravity,
            collision_damping: self.collision_damping,
            smoothing_radius: self.smoothing_radius,
            target_density: self.target_density,
            pressure_multiplier: self.pressure_multiplier,
            near_pressure_multiplier: self.near_pressure_multiplier,
            viscosity_strength: self.viscosity_strength,
            particle_mass: self.particle_mass,
            half_extent: self.half_extent,
            scales,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> FluidConfig {
        FluidConfig {
            name: "test".to_string(),
            gravity: default_gravity(),
            collision_damping: default_collision_damping(),
            smoothing_radius: 0.35,
            target_density: 55.0,
            pressure_multiplier: 500.0,
            near_pressure_multiplier: 18.0,
            viscosity_strength: 0.06,
            particle_mass: default_particle_mass(),
            half_extent: [8.0, 4.5],
            spawn: SpawnConfig {
                count: 400,
                centre: [0.0, 0.0],
                size: [7.0, 7.0],
                seed: default_seed(),
            },
            iterations_per_frame: default_iterations_per_frame(),
            time_scale: default_time_scale(),
        }
    }

    #[test]
    fn valid_config_passes() {
        assert!(base_config().validate().is_ok());
    }

    #[test]
    fn rejects_non_positive_smoothing_radius() {
        let mut config = base_config();
        config.smoothing_radius = 0.0;
        assert!(config.validate().is_err());
        config.smoothing_radius = -1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_zero_container_extent() {
        let mut config = base_config();
        config.half_extent = [8.0, 0.0];
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_out_of_range_damping() {
        let mut config = base_config();
        config.collision_damping = 1.5;
        assert!(config.validate().is_err());
        config.collision_damping = -0.1;
        assert!(config.validate().is_err());
        config.collision_damping = 1.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_empty_spawn() {
        let mut config = base_config();
        config.spawn.count = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn parses_minimal_json_with_defaults() {
        let json = r#"{
            "smoothing_radius": 0.35,
            "target_density": 55.0,
            "pressure_multiplier": 500.0,
            "half_extent": [8.0, 4.5],
            "spawn": { "count": 100, "size": [4.0, 4.0] }
        }"#;
        let config: FluidConfig = serde_json::from_str(json).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.iterations_per_frame, 3);
        assert_eq!(config.time_scale, 1.0);
        assert_eq!(config.spawn.seed, 42);
        assert_eq!(config.collision_damping, 0.95);
    }
}
