//! Simulation state
//!
//! Everything a step mutates lives in [`SimState`]: the active bodies, the
//! wave field with its pixel projection, and the body currently being placed
//! by an input gesture.

use glam::{Quat, Vec3};

use super::body::RigidBody;
use super::pixel::{PixelField, pixel_field};
use super::wave::WaveSolver;
use crate::settings::SimConfig;

/// Edge length of the boxes in the default scene
pub const SCENE_BOX_SIZE: f32 = 0.1;
/// Launch speed factor of the default scene
pub const SCENE_LAUNCH_SPEED: f32 = 3.0;

/// Complete simulation state (deterministic)
#[derive(Debug, Clone)]
pub struct SimState {
    pub config: SimConfig,
    /// Active bodies, in creation order
    pub bodies: Vec<RigidBody>,
    pub wave: WaveSolver,
    pub pixels: PixelField,
    /// Body being placed interactively, not yet simulated
    pub spawning: Option<RigidBody>,
    /// Steps taken since the last reset
    pub time_steps: u64,
    next_id: u32,
}

impl SimState {
    /// Create a state holding the default scene
    pub fn new(config: SimConfig) -> Self {
        let wave = WaveSolver::from_config(&config);
        let pixels = pixel_field(wave.current(), &config);
        let mut state = Self {
            config,
            bodies: Vec::new(),
            wave,
            pixels,
            spawning: None,
            time_steps: 0,
            next_id: 1,
        };
        state.reset();
        state
    }

    /// Flatten the field and restore the default two-box scene
    pub fn reset(&mut self) {
        self.wave.reset();
        self.pixels.update(self.wave.current());
        self.spawning = None;
        self.time_steps = 0;
        self.init_default_scene();
        log::info!(
            "Simulation reset: {}x{} field, {} bodies",
            self.wave.current().rows(),
            self.wave.current().cols(),
            self.bodies.len()
        );
    }

    /// Two boxes thrown at each other across the field
    fn init_default_scene(&mut self) {
        self.bodies.clear();
        let size = Vec3::splat(SCENE_BOX_SIZE);

        let id = self.next_body_id();
        let start = Vec3::new(-1.0, 1.0, -1.0);
        let first = RigidBody::new(id, start, Quat::IDENTITY, size, 1.0)
            .with_velocity(Vec3::new(1.0, -1.0, 1.0) * SCENE_LAUNCH_SPEED);

        let id = self.next_body_id();
        let turned = Quat::from_rotation_y(45f32.to_radians());
        let second = RigidBody::new(id, Vec3::new(1.0, 1.0, 1.0), turned, size, 1.0)
            .with_velocity(Vec3::new(-1.0, -1.0, -1.0) * SCENE_LAUNCH_SPEED);

        self.bodies.push(first);
        self.bodies.push(second);
    }

    /// Allocate a new body ID
    pub fn next_body_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Add a body to the active set, assigning it a fresh ID
    pub fn add_body(&mut self, mut body: RigidBody) -> u32 {
        body.id = self.next_body_id();
        let id = body.id;
        self.bodies.push(body);
        id
    }

    pub fn position_of_body(&self, index: usize) -> Vec3 {
        self.bodies[index].position
    }

    /// Apply a force at a world-space point of the body at `index`
    pub fn apply_force_on_body(&mut self, index: usize, point: Vec3, force: Vec3) {
        self.bodies[index].apply_external_force(force, point);
    }

    /// Drop every pending external force
    pub fn clear_forces(&mut self) {
        for body in &mut self.bodies {
            body.clear_forces();
        }
    }

    /// Start placing a new body at `position`
    ///
    /// Ignored while another placement is in progress.
    pub fn begin_spawn(&mut self, position: Vec3) {
        if self.spawning.is_some() {
            return;
        }
        let size = Vec3::splat(self.config.spawn_size);
        let mass = self.config.spawn_mass;
        self.spawning = Some(RigidBody::new(0, position, Quat::IDENTITY, size, mass));
    }

    /// Turn the body being placed so its up axis points along `drag`
    pub fn drag_spawn(&mut self, drag: Vec3) {
        let Some(body) = self.spawning.as_mut() else {
            return;
        };
        if drag.length_squared() == 0.0 {
            return;
        }
        body.orientation = Quat::from_rotation_arc(Vec3::Y, drag.normalize());
    }

    /// Release the body being placed, launching it against `drag`
    ///
    /// Returns the new body's ID, or `None` if nothing was being placed.
    pub fn release_spawn(&mut self, drag: Vec3) -> Option<u32> {
        let mut body = self.spawning.take()?;
        body.linear_velocity = drag * self.config.spawn_launch_scale;
        let id = self.add_body(body);
        log::info!("Spawned body {} (now {} active)", id, self.bodies.len());
        Some(id)
    }

    /// Find an active body by ID
    pub fn body(&self, id: u32) -> Option<&RigidBody> {
        self.bodies.iter().find(|b| b.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    #[test]
    fn test_default_scene() {
        let state = SimState::new(SimConfig::default());
        assert_eq!(state.bodies.len(), 2);
        assert_eq!(state.position_of_body(0), Vec3::new(-1.0, 1.0, -1.0));
        assert_eq!(state.bodies[0].linear_velocity, Vec3::new(3.0, -3.0, 3.0));
        assert_eq!(state.bodies[1].linear_velocity, Vec3::new(-3.0, -3.0, -3.0));
        assert!((state.bodies[1].orientation.length() - 1.0).abs() < EPS);
        assert_ne!(state.bodies[0].id, state.bodies[1].id);
    }

    #[test]
    fn test_reset_restores_scene_and_field() {
        let mut state = SimState::new(SimConfig::default());
        state.bodies.clear();
        state.wave.disturb(5, 5, 10.0);
        state.begin_spawn(Vec3::ZERO);
        state.reset();
        assert_eq!(state.bodies.len(), 2);
        assert_eq!(state.wave.current().value_interval(), (0.0, 0.0));
        assert!(state.spawning.is_none());
        assert_eq!(state.time_steps, 0);
    }

    #[test]
    fn test_spawn_gesture() {
        let mut state = SimState::new(SimConfig::default());
        state.begin_spawn(Vec3::new(0.2, 0.5, 0.1));
        // A second press does not replace the body being placed
        state.begin_spawn(Vec3::new(9.0, 9.0, 9.0));

        state.drag_spawn(Vec3::new(2.0, 0.0, 0.0));
        let placing = state.spawning.as_ref().expect("placement active");
        assert!((placing.orientation * Vec3::Y).abs_diff_eq(Vec3::X, EPS));
        assert_eq!(placing.position, Vec3::new(0.2, 0.5, 0.1));

        let id = state.release_spawn(Vec3::new(2.0, 0.0, 0.0)).expect("body spawned");
        assert!(state.spawning.is_none());
        assert_eq!(state.bodies.len(), 3);
        let body = state.body(id).expect("spawned body is active");
        assert!(body.linear_velocity.abs_diff_eq(Vec3::new(-0.1, 0.0, 0.0), EPS));
        assert!((body.mass - 0.1).abs() < EPS);

        assert!(state.release_spawn(Vec3::X).is_none());
    }

    #[test]
    fn test_zero_drag_keeps_orientation() {
        let mut state = SimState::new(SimConfig::default());
        state.begin_spawn(Vec3::ZERO);
        state.drag_spawn(Vec3::ZERO);
        assert_eq!(state.spawning.as_ref().map(|b| b.orientation), Some(Quat::IDENTITY));
    }

    #[test]
    fn test_apply_and_clear_forces() {
        let mut state = SimState::new(SimConfig::default());
        state.apply_force_on_body(1, Vec3::ONE, Vec3::X);
        assert_eq!(state.bodies[1].external_forces().len(), 1);
        state.clear_forces();
        assert!(state.bodies[1].external_forces().is_empty());
    }
}
