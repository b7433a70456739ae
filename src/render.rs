//! Renderer-facing view of the simulation
//!
//! The simulation never draws. A host either implements [`DrawHooks`] and
//! calls [`draw`], or uploads the [`BoxInstance`] arrays for instanced
//! drawing of the unit cube.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

use crate::sim::body::RigidBody;
use crate::sim::state::SimState;

/// Draw callbacks supplied by the host renderer
pub trait DrawHooks {
    /// Draw the unit cube under `transform`
    fn draw_box(&mut self, transform: Mat4, color: Vec3);
    fn draw_line(&mut self, from: Vec3, to: Vec3, color: Vec3);
    fn draw_sphere(&mut self, center: Vec3, radius: f32, color: Vec3);
}

/// Per-instance data for one unit cube
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct BoxInstance {
    pub model: [[f32; 4]; 4],
    pub color: [f32; 4],
}

impl BoxInstance {
    pub fn new(transform: Mat4, color: Vec3) -> Self {
        Self {
            model: transform.to_cols_array_2d(),
            color: color.extend(1.0).to_array(),
        }
    }
}

/// Line segments and tip marker visualising one applied force
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForceArrow {
    /// Body center
    pub anchor: Vec3,
    /// Tail of the force vector (`point - force`)
    pub tail: Vec3,
    /// Application point
    pub tip: Vec3,
}

/// Colors for scene elements
pub mod colors {
    use glam::Vec3;

    pub const BODY: Vec3 = Vec3::new(0.7, 0.75, 0.9);
    pub const SPAWNING: Vec3 = Vec3::new(0.9, 0.6, 0.3);
    pub const FORCE_LEVER: Vec3 = Vec3::new(1.0, 0.0, 0.0);
    pub const FORCE_VECTOR: Vec3 = Vec3::new(1.0, 1.0, 1.0);
}

/// Radius of the marker drawn at a force's application point
pub const FORCE_TIP_RADIUS: f32 = 0.02;

/// Force arrows of every pending force on `body`
pub fn force_arrows(body: &RigidBody) -> Vec<ForceArrow> {
    body.external_forces()
        .iter()
        .map(|f| ForceArrow {
            anchor: body.position,
            tail: f.position - f.force,
            tip: f.position,
        })
        .collect()
}

/// Instances for every surface cell
pub fn pixel_instances(state: &SimState) -> Vec<BoxInstance> {
    state
        .pixels
        .pixels()
        .iter()
        .map(|p| BoxInstance::new(p.transform, p.color))
        .collect()
}

/// Instances for every active body, plus the one being placed
pub fn body_instances(state: &SimState) -> Vec<BoxInstance> {
    let mut out: Vec<BoxInstance> = state
        .bodies
        .iter()
        .map(|b| BoxInstance::new(b.world_transform(), colors::BODY))
        .collect();
    if let Some(body) = &state.spawning {
        out.push(BoxInstance::new(body.world_transform(), colors::SPAWNING));
    }
    out
}

/// Emit the whole scene through `hooks`
pub fn draw(state: &SimState, hooks: &mut impl DrawHooks) {
    for pixel in state.pixels.pixels() {
        hooks.draw_box(pixel.transform, pixel.color);
    }

    for body in &state.bodies {
        hooks.draw_box(body.world_transform(), colors::BODY);
        for arrow in force_arrows(body) {
            hooks.draw_line(arrow.anchor, arrow.tip, colors::FORCE_LEVER);
            hooks.draw_line(arrow.tail, arrow.tip, colors::FORCE_VECTOR);
            hooks.draw_sphere(arrow.tip, FORCE_TIP_RADIUS, colors::FORCE_VECTOR);
        }
    }

    if let Some(body) = &state.spawning {
        hooks.draw_box(body.world_transform(), colors::SPAWNING);
    }
}
