//! Simulation tuning
//!
//! Every physical constant the simulation uses, loadable from JSON so a host
//! can tweak the scene without recompiling. Missing fields fall back to the
//! defaults in [`crate::consts`].

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Reflective box the bodies live in
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Walls {
    /// Walls at `x = ±half_x`
    pub half_x: f32,
    /// Walls at `z = ±half_z`
    pub half_z: f32,
    /// Ceiling at `y = ceiling`
    pub ceiling: f32,
}

impl Default for Walls {
    fn default() -> Self {
        Self {
            half_x: WALL_X,
            half_z: WALL_Z,
            ceiling: CEILING_Y,
        }
    }
}

/// Simulation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    // === Wave field ===
    /// Cells per side of the square field
    pub grid_dim: usize,
    /// World-space edge length of the field
    pub grid_world_size: f32,
    /// Spatial step used by the Laplacian
    pub spatial_delta: f32,
    /// Wave propagation speed
    pub wave_speed: f32,
    /// Per-step energy damping factor (< 1)
    pub damping: f32,

    // === Surface coupling ===
    /// Height of an undisturbed surface; also the submersion threshold
    pub water_zero_height: f32,
    /// Width of the cell window searched around a body
    pub culling_radius: usize,
    /// Fraction of a body's momentum deposited into the field
    pub collision_factor: f32,
    /// Fraction of speed removed downward on splashdown
    pub splash_downspeed: f32,

    // === Bodies ===
    /// Coefficient of restitution for body/body contacts
    pub restitution: f32,
    pub walls: Walls,

    // === Interactive spawning ===
    pub spawn_size: f32,
    pub spawn_mass: f32,
    /// Drag-vector to launch-velocity factor
    pub spawn_launch_scale: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            grid_dim: GRID_DIM,
            grid_world_size: GRID_WORLD_SIZE,
            spatial_delta: SPATIAL_DELTA,
            wave_speed: WAVE_SPEED,
            damping: DAMPING,

            water_zero_height: WATER_ZERO_HEIGHT,
            culling_radius: CULLING_PROJECTION_RADIUS,
            collision_factor: WATER_COLLISION_FACTOR,
            splash_downspeed: WATER_COLLISION_DOWNSPEED,

            restitution: BOUNCINESS,
            walls: Walls::default(),

            spawn_size: SPAWN_SIZE,
            spawn_mass: SPAWN_MASS,
            spawn_launch_scale: SPAWN_LAUNCH_SCALE,
        }
    }
}

impl SimConfig {
    /// Parse a (possibly partial) JSON config
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load from a JSON file, falling back to defaults on any failure
    pub fn load(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(config) => match config.validate() {
                    Ok(()) => {
                        log::info!("Loaded config from {}", path.display());
                        return config;
                    }
                    Err(e) => log::warn!("Rejected config {}: {}", path.display(), e),
                },
                Err(e) => log::warn!("Invalid config {}: {}", path.display(), e),
            },
            Err(e) => log::warn!("Cannot read config {}: {}", path.display(), e),
        }

        log::info!("Using default config");
        Self::default()
    }

    /// Check the values the simulation divides by or sizes buffers with
    pub fn validate(&self) -> Result<(), String> {
        if self.grid_dim == 0 {
            return Err("grid_dim must be at least 1".into());
        }
        if !(self.grid_world_size.is_finite() && self.grid_world_size > 0.0) {
            return Err(format!("grid_world_size must be positive, got {}", self.grid_world_size));
        }
        if !(self.spatial_delta.is_finite() && self.spatial_delta != 0.0) {
            return Err(format!("spatial_delta must be non-zero, got {}", self.spatial_delta));
        }
        if !(self.spawn_mass.is_finite() && self.spawn_mass > 0.0) {
            return Err(format!("spawn_mass must be positive, got {}", self.spawn_mass));
        }
        if !(self.spawn_size.is_finite() && self.spawn_size > 0.0) {
            return Err(format!("spawn_size must be positive, got {}", self.spawn_size));
        }
        Ok(())
    }

    /// World-space edge length of one field cell
    #[inline]
    pub fn cell_size(&self) -> f32 {
        self.grid_world_size / self.grid_dim as f32
    }
}
