//! Rigid box bodies
//!
//! A body is a uniform-density box. Linear state is position/velocity; angular
//! state is orientation plus angular momentum, with angular velocity derived
//! from momentum through the world-space inverse inertia tensor.

use glam::{Mat3, Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::torque_about;

/// A force applied at a world-space point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExternalForce {
    pub force: Vec3,
    pub position: Vec3,
}

impl ExternalForce {
    pub fn new(force: Vec3, position: Vec3) -> Self {
        Self { force, position }
    }

    /// Torque this force produces about `center_of_mass`
    #[inline]
    pub fn torque(&self, center_of_mass: Vec3) -> Vec3 {
        torque_about(center_of_mass, self.position, self.force)
    }
}

/// Oriented box with mass and inertia
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RigidBody {
    pub id: u32,
    /// World-space center of mass
    pub position: Vec3,
    /// Unit quaternion
    pub orientation: Quat,
    /// Full box extents along the local axes
    pub size: Vec3,
    pub mass: f32,
    pub linear_velocity: Vec3,
    pub angular_momentum: Vec3,
    /// Derived from `angular_momentum` after each integration step
    pub angular_velocity: Vec3,
    /// Set once the body has splashed into the field
    pub grid_hit: bool,
    inverse_inertia_local: Mat3,
    external_forces: Vec<ExternalForce>,
}

impl RigidBody {
    pub fn new(id: u32, position: Vec3, orientation: Quat, size: Vec3, mass: f32) -> Self {
        Self {
            id,
            position,
            orientation,
            size,
            mass,
            linear_velocity: Vec3::ZERO,
            angular_momentum: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            grid_hit: false,
            inverse_inertia_local: box_inverse_inertia(size, mass),
            external_forces: Vec::new(),
        }
    }

    /// Builder-style initial velocity
    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.linear_velocity = velocity;
        self
    }

    #[inline]
    pub fn half_extents(&self) -> Vec3 {
        self.size * 0.5
    }

    /// World-space y of the bottom face (ignoring rotation)
    #[inline]
    pub fn lower_extent(&self) -> f32 {
        self.position.y - self.half_extents().y
    }

    /// Queue a force for the next integration steps
    ///
    /// Forces stay pending across steps until the body takes part in a
    /// contact or [`clear_forces`](Self::clear_forces) is called; a host that
    /// applies a one-off push has to clear it itself.
    pub fn apply_external_force(&mut self, force: Vec3, point: Vec3) {
        self.external_forces.push(ExternalForce::new(force, point));
    }

    pub fn external_forces(&self) -> &[ExternalForce] {
        &self.external_forces
    }

    pub fn clear_forces(&mut self) {
        self.external_forces.clear();
    }

    pub fn total_force(&self) -> Vec3 {
        self.external_forces.iter().map(|f| f.force).sum()
    }

    /// Sum of torques about `about`
    pub fn total_torque(&self, about: Vec3) -> Vec3 {
        self.external_forces.iter().map(|f| f.torque(about)).sum()
    }

    /// Velocity of a point at `offset` from the center (world-space offset)
    #[inline]
    pub fn velocity_at_local_point(&self, offset: Vec3) -> Vec3 {
        self.linear_velocity + self.angular_velocity.cross(offset)
    }

    /// Body-local point to world space
    #[inline]
    pub fn local_to_world(&self, local: Vec3) -> Vec3 {
        self.position + self.orientation * local
    }

    pub fn inverse_inertia_local(&self) -> Mat3 {
        self.inverse_inertia_local
    }

    /// `R · I0⁻¹ · Rᵀ` for the current orientation
    pub fn inverse_inertia_world(&self) -> Mat3 {
        let rot = Mat3::from_quat(self.orientation);
        rot * self.inverse_inertia_local * rot.transpose()
    }

    /// Object-to-world transform of the unit cube scaled to `size`
    pub fn world_transform(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.size, self.orientation, self.position)
    }

    /// Angular velocity as a pure quaternion `(ω, 0)`
    #[inline]
    pub fn angular_velocity_quat(&self) -> Quat {
        Quat::from_xyzw(
            self.angular_velocity.x,
            self.angular_velocity.y,
            self.angular_velocity.z,
            0.0,
        )
    }

    /// Total momentum (for diagnostics)
    #[inline]
    pub fn linear_momentum(&self) -> Vec3 {
        self.linear_velocity * self.mass
    }
}

/// Inverse inertia tensor of a uniform box with full extents `size`
pub fn box_inverse_inertia(size: Vec3, mass: f32) -> Mat3 {
    let (w, h, d) = (size.x, size.y, size.z);
    let k = mass / 12.0;
    let moments = Vec3::new(k * (h * h + d * d), k * (w * w + h * h), k * (w * w + d * d));
    Mat3::from_diagonal(moments.recip())
}
