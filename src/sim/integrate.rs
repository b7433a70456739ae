//! Semi-implicit Euler integration of rigid body state

use glam::Quat;

use super::body::RigidBody;

/// Normalize a quaternion, leaving a zero quaternion unchanged
#[inline]
pub fn normalize_quat(q: Quat) -> Quat {
    let norm = q.length();
    if norm > 0.0 { q / norm } else { q }
}

/// Advance one body by `dt` under its pending external forces
pub fn integrate_body(body: &mut RigidBody, dt: f32) {
    // Linear part
    body.position += dt * body.linear_velocity;
    let acceleration = body.total_force() / body.mass;
    body.linear_velocity += dt * acceleration;

    // Angular part
    let wr = body.angular_velocity_quat() * body.orientation;
    body.orientation = normalize_quat(body.orientation + wr * (dt / 2.0));

    body.angular_momentum += dt * body.total_torque(body.position);
    body.angular_velocity = body.inverse_inertia_world() * body.angular_momentum;
}

/// Advance every body
pub fn integrate_bodies(bodies: &mut [RigidBody], dt: f32) {
    for body in bodies {
        integrate_body(body, dt);
    }
}
