//! Splashdown - rigid boxes splashing into a damped wave field
//!
//! Core modules:
//! - `sim`: Deterministic simulation (rigid bodies, collisions, wave solver)
//! - `render`: Draw hooks and instance data for an external renderer
//! - `settings`: Data-driven simulation tuning

pub mod render;
pub mod settings;
pub mod sim;

pub use settings::SimConfig;

use glam::Vec3;

/// Simulation configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Wave field dimensions (cells per side)
    pub const GRID_DIM: usize = 40;
    /// World-space edge length the field is scaled to
    pub const GRID_WORLD_SIZE: f32 = 2.0;

    /// Wave solver defaults
    pub const SPATIAL_DELTA: f32 = 10.0;
    pub const WAVE_SPEED: f32 = 300.0;
    pub const DAMPING: f32 = 0.999;

    /// Field value that maps to one world unit of surface height
    pub const HEIGHT_SCALE: f32 = 100.0;
    /// World-space height of an undisturbed surface
    pub const WATER_ZERO_HEIGHT: f32 = -0.5;
    /// Minimum visual thickness of a surface cell
    pub const PIXEL_MIN_THICKNESS: f32 = 0.01;

    /// Body/field coupling
    pub const CULLING_PROJECTION_RADIUS: usize = 6;
    pub const WATER_COLLISION_FACTOR: f32 = 0.4;
    pub const WATER_COLLISION_DOWNSPEED: f32 = 0.5;

    /// Coefficient of restitution for body/body contacts
    pub const BOUNCINESS: f32 = 0.7;

    /// Reflective walls
    pub const WALL_X: f32 = 1.0;
    pub const WALL_Z: f32 = 1.0;
    pub const CEILING_Y: f32 = 1.5;

    /// Interactively spawned bodies
    pub const SPAWN_SIZE: f32 = 0.1;
    pub const SPAWN_MASS: f32 = 0.1;
    pub const SPAWN_LAUNCH_SCALE: f32 = -0.05;
}

/// Vector cross-product helper for force torques: `cross(point - about, force)`
#[inline]
pub fn torque_about(about: Vec3, point: Vec3, force: Vec3) -> Vec3 {
    (point - about).cross(force)
}
