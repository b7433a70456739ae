//! Deterministic simulation module
//!
//! All physics lives here. This module must be pure and deterministic:
//! - Caller-supplied timestep only
//! - No randomness
//! - Stable iteration order (bodies in creation order)
//! - No rendering or platform dependencies

pub mod body;
pub mod collision;
pub mod grid;
pub mod integrate;
pub mod pixel;
pub mod sat;
pub mod state;
pub mod tick;
pub mod wave;

pub use body::{ExternalForce, RigidBody, box_inverse_inertia};
pub use collision::{PairOutcome, Splash, apply_contact_impulse, resolve_body_pair};
pub use grid::Grid;
pub use integrate::{integrate_bodies, integrate_body, normalize_quat};
pub use pixel::{GridPixel, PixelField, SurfaceLayout, WorldBounds};
pub use sat::{CollisionInfo, Obb, check_collision_sat};
pub use state::SimState;
pub use tick::{StepReport, handle_collisions, tick};
pub use wave::{WaveParams, WaveSolver};
