//! Fixed timestep simulation tick
//!
//! Phase order within one step:
//! 1. collisions (body/body, body/surface, walls, removal of sunken bodies)
//! 2. rigid body integration
//! 3. wave solver step
//! 4. pixel projection refresh

use super::collision::{
    PairOutcome, Splash, is_submerged, pair_mut, reflect_off_walls, remove_indices,
    resolve_body_pair, splash_into_field,
};
use super::integrate::integrate_bodies;
use super::state::SimState;

/// What happened during one step
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepReport {
    /// Body pairs (by ID) that received a contact impulse
    pub impacts: Vec<(u32, u32)>,
    /// Bodies (by ID) that hit the surface, with the cell they hit
    pub splashes: Vec<(u32, Splash)>,
    /// Bodies (by ID) removed after sinking
    pub removed: Vec<u32>,
}

/// Advance the simulation by one timestep
pub fn tick(state: &mut SimState, dt: f32) -> StepReport {
    let mut report = StepReport::default();

    handle_collisions(state, &mut report);
    integrate_bodies(&mut state.bodies, dt);
    state.wave.step(dt);
    state.pixels.update(state.wave.current());

    state.time_steps += 1;
    report
}

/// Collision phase of a step
pub fn handle_collisions(state: &mut SimState, report: &mut StepReport) {
    let restitution = state.config.restitution;

    // Body/body
    for i in 0..state.bodies.len() {
        for j in 0..i {
            let (a, b) = pair_mut(&mut state.bodies, i, j);
            let outcome = resolve_body_pair(a, b, restitution);
            if outcome.in_contact() {
                // A contact overrides whatever was being pushed on either body
                a.clear_forces();
                b.clear_forces();
            }
            if let PairOutcome::Resolved { impulse } = outcome {
                log::debug!("Impact between {} and {} (J = {:.4})", a.id, b.id, impulse);
                report.impacts.push((a.id, b.id));
            }
        }
    }

    // Body/surface
    for body in &mut state.bodies {
        let splash = splash_into_field(body, &mut state.wave, &state.pixels, &state.config);
        if let Some(splash) = splash {
            log::debug!(
                "Body {} splashed into cell ({}, {}) depositing {:.3}",
                body.id,
                splash.row,
                splash.col,
                splash.deposit
            );
            report.splashes.push((body.id, splash));
        }
    }

    // Walls and sinking
    let surface = state.config.water_zero_height;
    let mut sunk = Vec::new();
    for (i, body) in state.bodies.iter_mut().enumerate() {
        reflect_off_walls(body, &state.config.walls);
        if is_submerged(body, surface) {
            sunk.push(i);
        }
    }

    for body in remove_indices(&mut state.bodies, &sunk) {
        log::info!("Body {} sank and was removed", body.id);
        report.removed.push(body.id);
    }
}
