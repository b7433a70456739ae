//! Explicit finite-difference wave solver
//!
//! Second order in time: each step needs the current field and the field one
//! step behind. Border cells are Dirichlet (never written), so a zero border
//! stays zero forever.

use super::grid::Grid;
use crate::settings::SimConfig;

/// Physical parameters of the wave equation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveParams {
    pub speed: f32,
    pub spatial_delta: f32,
    /// Applied to every updated cell, keeps numerical energy from growing
    pub damping: f32,
}

impl WaveParams {
    pub fn from_config(config: &SimConfig) -> Self {
        Self {
            speed: config.wave_speed,
            spatial_delta: config.spatial_delta,
            damping: config.damping,
        }
    }
}

/// Double-buffered wave field
#[derive(Debug, Clone)]
pub struct WaveSolver {
    current: Grid,
    previous: Grid,
    stencil: Grid,
    params: WaveParams,
    warned_unstable: bool,
}

/// Above this Courant number the 2D explicit scheme diverges
pub const STABILITY_LIMIT: f32 = std::f32::consts::FRAC_1_SQRT_2;

impl WaveSolver {
    pub fn new(rows: usize, cols: usize, params: WaveParams) -> Self {
        Self {
            current: Grid::new(rows, cols),
            previous: Grid::new(rows, cols),
            stencil: Grid::laplacian_stencil(),
            params,
            warned_unstable: false,
        }
    }

    pub fn from_config(config: &SimConfig) -> Self {
        Self::new(config.grid_dim, config.grid_dim, WaveParams::from_config(config))
    }

    pub fn current(&self) -> &Grid {
        &self.current
    }

    pub fn previous(&self) -> &Grid {
        &self.previous
    }

    pub fn params(&self) -> WaveParams {
        self.params
    }

    /// Add `amount` to one cell of the current field
    #[track_caller]
    pub fn disturb(&mut self, row: usize, col: usize, amount: f32) {
        self.current.add(row, col, amount);
    }

    /// Overwrite one cell of the current field
    #[track_caller]
    pub fn set(&mut self, row: usize, col: usize, value: f32) {
        self.current.set(row, col, value);
    }

    /// Flatten both fields back to zero
    pub fn reset(&mut self) {
        self.current.clear();
        self.previous.clear();
    }

    /// `c · dt / δ`
    #[inline]
    pub fn courant_number(&self, dt: f32) -> f32 {
        self.params.speed * dt / self.params.spatial_delta
    }

    /// Discrete Laplacian of the current field over the interior cells
    ///
    /// Entry `(i, j)` belongs to field cell `(i + 1, j + 1)`.
    pub fn laplacian(&self) -> Grid {
        let inv_delta_sq = 1.0 / (self.params.spatial_delta * self.params.spatial_delta);
        self.current.convolve(&self.stencil) * inv_delta_sq
    }

    /// Advance the field by `dt`
    pub fn step(&mut self, dt: f32) {
        let courant = self.courant_number(dt);
        if courant > STABILITY_LIMIT && !self.warned_unstable {
            log::warn!(
                "Wave solver unstable: Courant number {:.3} exceeds {:.3}",
                courant,
                STABILITY_LIMIT
            );
            self.warned_unstable = true;
        }

        let (rows, cols) = (self.current.rows(), self.current.cols());
        if rows < 3 || cols < 3 {
            return;
        }

        let laplace = self.laplacian();
        let coeff = self.params.speed * self.params.speed * dt * dt;

        let mut next = self.current.clone();
        for i in 1..rows - 1 {
            for j in 1..cols - 1 {
                let u = coeff * laplace.get(i - 1, j - 1) + 2.0 * self.current.get(i, j)
                    - self.previous.get(i, j);
                next.set(i, j, u * self.params.damping);
            }
        }

        self.previous = std::mem::replace(&mut self.current, next);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const EPS: f32 = 1e-3;

    fn params() -> WaveParams {
        WaveParams {
            speed: 300.0,
            spatial_delta: 10.0,
            damping: 0.999,
        }
    }

    #[test]
    fn test_single_step_spike() {
        let dt = 1.0 / 60.0;
        let mut solver = WaveSolver::new(5, 5, params());
        solver.set(2, 2, 100.0);
        solver.step(dt);

        // c²dt² = 25, Laplacian / δ² at center = -4, at neighbours = 1
        let coeff = 300.0f32 * 300.0 * dt * dt;
        let center = (coeff * -4.0 + 2.0 * 100.0) * 0.999;
        let neighbour = coeff * 1.0 * 0.999;

        let field = solver.current();
        assert!((field.get(2, 2) - center).abs() < EPS);
        assert!((field.get(2, 2) - 99.9).abs() < EPS);
        for (r, c) in [(1, 2), (3, 2), (2, 1), (2, 3)] {
            assert!((field.get(r, c) - neighbour).abs() < EPS);
            assert!((field.get(r, c) - 24.975).abs() < EPS);
        }
        for (r, c) in [(1, 1), (1, 3), (3, 1), (3, 3)] {
            assert_eq!(field.get(r, c), 0.0);
        }

        // Previous holds the pre-step field
        assert_eq!(solver.previous().get(2, 2), 100.0);
        assert_eq!(solver.previous().get(1, 2), 0.0);
    }

    #[test]
    fn test_border_stays_zero() {
        let mut solver = WaveSolver::new(8, 6, params());
        solver.set(3, 3, 100.0);
        solver.set(1, 1, -40.0);
        for _ in 0..50 {
            solver.step(1.0 / 120.0);
        }
        let field = solver.current();
        for r in 0..field.rows() {
            for c in 0..field.cols() {
                if field.is_border(r, c) {
                    assert_eq!(field.get(r, c), 0.0, "border ({r}, {c}) changed");
                }
            }
        }
    }

    #[test]
    fn test_step_is_deterministic() {
        let mut a = WaveSolver::new(10, 10, params());
        a.disturb(5, 4, 80.0);
        let mut b = a.clone();
        for _ in 0..20 {
            a.step(1.0 / 60.0);
            b.step(1.0 / 60.0);
        }
        assert_eq!(a.current().to_vec(), b.current().to_vec());
        assert_eq!(a.previous().to_vec(), b.previous().to_vec());
    }

    #[test]
    fn test_flat_field_stays_flat() {
        let mut solver = WaveSolver::new(6, 6, params());
        solver.step(1.0 / 60.0);
        assert_eq!(solver.current().value_interval(), (0.0, 0.0));
    }

    #[test]
    fn test_reset_clears_both_fields() {
        let mut solver = WaveSolver::new(5, 5, params());
        solver.set(2, 2, 10.0);
        solver.step(1.0 / 60.0);
        solver.reset();
        assert_eq!(solver.current().value_interval(), (0.0, 0.0));
        assert_eq!(solver.previous().value_interval(), (0.0, 0.0));
    }

    #[test]
    fn test_courant_number() {
        let solver = WaveSolver::new(5, 5, params());
        assert!((solver.courant_number(1.0 / 60.0) - 0.5).abs() < 1e-6);
        assert!(solver.courant_number(1.0 / 60.0) < STABILITY_LIMIT);
    }

    proptest! {
        #[test]
        fn prop_border_invariant(
            row in 1usize..6,
            col in 1usize..6,
            amount in -200.0f32..200.0,
            steps in 1usize..30,
        ) {
            let mut solver = WaveSolver::new(7, 7, params());
            solver.disturb(row, col, amount);
            for _ in 0..steps {
                solver.step(1.0 / 60.0);
            }
            let field = solver.current();
            for r in 0..7 {
                for c in 0..7 {
                    if field.is_border(r, c) {
                        prop_assert_eq!(field.get(r, c), 0.0);
                    }
                }
            }
        }
    }
}
