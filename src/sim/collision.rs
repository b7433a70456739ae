//! Collision response
//!
//! Impulse-based resolution between boxes, splashdown into the wave field,
//! reflective walls and removal of sunken bodies. Detection is delegated to
//! the separating-axis test in [`super::sat`].

use glam::Vec3;

use super::body::RigidBody;
use super::pixel::PixelField;
use super::sat::{CollisionInfo, check_collision_sat};
use super::wave::WaveSolver;
use crate::settings::{SimConfig, Walls};

/// What happened to an overlapping-or-not pair of bodies
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PairOutcome {
    /// No overlap
    Apart,
    /// Overlapping but already moving apart at the contact
    Separating,
    /// Impulse of magnitude `impulse` applied along the contact normal
    Resolved { impulse: f32 },
}

impl PairOutcome {
    /// True whenever the SAT test found an overlap
    #[inline]
    pub fn in_contact(&self) -> bool {
        !matches!(self, PairOutcome::Apart)
    }
}

/// Detect and resolve a contact between two bodies
pub fn resolve_body_pair(a: &mut RigidBody, b: &mut RigidBody, restitution: f32) -> PairOutcome {
    match check_collision_sat(&a.world_transform(), &b.world_transform()) {
        None => PairOutcome::Apart,
        Some(info) => apply_contact_impulse(a, b, &info, restitution),
    }
}

/// Impulse response for a known contact
///
/// `info.normal` must point from B toward A.
pub fn apply_contact_impulse(
    a: &mut RigidBody,
    b: &mut RigidBody,
    info: &CollisionInfo,
    restitution: f32,
) -> PairOutcome {
    let n = info.normal;
    let x_a = info.point - a.position;
    let x_b = info.point - b.position;

    let v_rel = a.velocity_at_local_point(x_a) - b.velocity_at_local_point(x_b);
    let v_rel_n = v_rel.dot(n);
    if v_rel_n > 0.0 {
        return PairOutcome::Separating;
    }

    let angular = (a.inverse_inertia_world() * x_a.cross(n)).cross(x_a)
        + (b.inverse_inertia_world() * x_b.cross(n)).cross(x_b);
    let j = -(1.0 + restitution) * v_rel_n / (1.0 / a.mass + 1.0 / b.mass + angular.dot(n));
    let jn = j * n;

    a.linear_velocity += jn / a.mass;
    b.linear_velocity -= jn / b.mass;
    a.angular_momentum += x_a.cross(jn);
    b.angular_momentum -= x_b.cross(jn);

    PairOutcome::Resolved { impulse: j }
}

/// Mutable references to two distinct bodies
pub fn pair_mut(bodies: &mut [RigidBody], i: usize, j: usize) -> (&mut RigidBody, &mut RigidBody) {
    assert_ne!(i, j, "a body cannot collide with itself");
    if i < j {
        let (lo, hi) = bodies.split_at_mut(j);
        (&mut lo[i], &mut hi[0])
    } else {
        let (lo, hi) = bodies.split_at_mut(i);
        (&mut hi[0], &mut lo[j])
    }
}

/// Cell a body splashed into
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Splash {
    pub row: usize,
    pub col: usize,
    pub deposit: f32,
}

/// Test a body against the surface cells around it
///
/// On the first overlapping cell the body's momentum (scaled by the coupling
/// factor) is added to that cell, the body is flagged and pushed downward.
/// Bodies already flagged are ignored.
pub fn splash_into_field(
    body: &mut RigidBody,
    wave: &mut WaveSolver,
    pixels: &PixelField,
    config: &SimConfig,
) -> Option<Splash> {
    if body.grid_hit {
        return None;
    }

    let body_transform = body.world_transform();
    let (row, col) = pixels
        .candidates(body.position, config.culling_radius)
        .into_iter()
        .find(|&(r, c)| {
            check_collision_sat(&body_transform, &pixels.pixel(r, c).transform).is_some()
        })?;

    let speed = body.linear_velocity.length();
    let deposit = body.mass * speed * config.collision_factor;
    wave.disturb(row, col, deposit);

    body.grid_hit = true;
    body.linear_velocity.y -= speed * config.splash_downspeed;

    Some(Splash { row, col, deposit })
}

/// Reflect velocity components that carry the body through a wall
///
/// Returns true if any component was flipped.
pub fn reflect_off_walls(body: &mut RigidBody, walls: &Walls) -> bool {
    let lo = body.position - body.half_extents();
    let hi = body.position + body.half_extents();
    let v = &mut body.linear_velocity;
    let mut reflected = false;

    // Right and left walls
    if (hi.x > walls.half_x && v.x > 0.0) || (lo.x < -walls.half_x && v.x < 0.0) {
        v.x = -v.x;
        reflected = true;
    }
    // Front and back walls
    if (hi.z > walls.half_z && v.z > 0.0) || (lo.z < -walls.half_z && v.z < 0.0) {
        v.z = -v.z;
        reflected = true;
    }
    // Ceiling
    if hi.y > walls.ceiling && v.y > 0.0 {
        v.y = -v.y;
        reflected = true;
    }

    reflected
}

/// Splashed body whose bottom has sunk below `surface`
#[inline]
pub fn is_submerged(body: &RigidBody, surface: f32) -> bool {
    body.grid_hit && body.lower_extent() < surface
}

/// Remove bodies at `indices` (ascending), keeping the rest in order
pub fn remove_indices(bodies: &mut Vec<RigidBody>, indices: &[usize]) -> Vec<RigidBody> {
    let mut removed = Vec::with_capacity(indices.len());
    for &i in indices.iter().rev() {
        removed.push(bodies.remove(i));
    }
    removed
}

/// Total linear momentum of a set of bodies
pub fn total_momentum(bodies: &[RigidBody]) -> Vec3 {
    bodies.iter().map(RigidBody::linear_momentum).sum()
}
