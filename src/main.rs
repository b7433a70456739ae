//! Splashdown headless runner
//!
//! Runs the default scene for a number of fixed steps and logs what happens.
//!
//! Usage: `splashdown [steps] [config.json]` (set `RUST_LOG=debug` for
//! per-impact output).

use std::path::Path;

use splashdown::SimConfig;
use splashdown::consts::SIM_DT;
use splashdown::sim::{SimState, collision::total_momentum, tick};

/// Steps run when no count is given (five simulated seconds)
const DEFAULT_STEPS: u64 = 300;
/// Log a summary every this many steps
const SUMMARY_INTERVAL: u64 = 60;

fn main() {
    env_logger::init();
    log::info!("Splashdown (headless) starting...");

    let mut args = std::env::args().skip(1);
    let steps = match args.next() {
        Some(arg) => arg.parse().unwrap_or_else(|e| {
            log::warn!("Invalid step count {:?} ({}), using {}", arg, e, DEFAULT_STEPS);
            DEFAULT_STEPS
        }),
        None => DEFAULT_STEPS,
    };
    let config = match args.next() {
        Some(path) => SimConfig::load(Path::new(&path)),
        None => SimConfig::default(),
    };

    let mut state = SimState::new(config);
    let courant = state.wave.courant_number(SIM_DT);
    log::info!("Running {} steps at dt = {:.4} (Courant {:.3})", steps, SIM_DT, courant);

    let (mut impacts, mut splashes, mut removed) = (0, 0, 0);
    for step in 1..=steps {
        let report = tick(&mut state, SIM_DT);
        impacts += report.impacts.len();
        splashes += report.splashes.len();
        removed += report.removed.len();

        if step % SUMMARY_INTERVAL == 0 {
            let (min, max) = state.wave.current().value_interval();
            log::info!(
                "step {}: {} bodies, momentum {:?}, field [{:.3}, {:.3}]",
                step,
                state.bodies.len(),
                total_momentum(&state.bodies),
                min,
                max
            );
        }
    }

    log::info!(
        "Done: {} impacts, {} splashes, {} bodies sank, {} remaining",
        impacts,
        splashes,
        removed,
        state.bodies.len()
    );
}
