//! World-space projection of the wave field
//!
//! Each field cell is shown (and collided with) as a flat box whose height
//! follows the cell value. Pixels refer to their cell by `(row, col)` into the
//! field owned by the wave solver; they cache the derived transform and color
//! and are refreshed once per step.

use glam::{Mat4, Quat, Vec3};

use super::grid::Grid;
use crate::consts::{HEIGHT_SCALE, PIXEL_MIN_THICKNESS};
use crate::settings::SimConfig;

/// Fixed mapping parameters from cell index/value to world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceLayout {
    /// World-space edge length of one cell
    pub cell_size: f32,
    /// World-space edge length of the whole field
    pub world_size: f32,
    /// Surface height for a zero cell value
    pub zero_height: f32,
}

impl SurfaceLayout {
    pub fn from_config(config: &SimConfig) -> Self {
        Self {
            cell_size: config.cell_size(),
            world_size: config.grid_world_size,
            zero_height: config.water_zero_height,
        }
    }

    /// World position of cell `(row, col)` holding `value`
    ///
    /// Rows run along X, columns along Z.
    #[inline]
    pub fn cell_position(&self, row: usize, col: usize, value: f32) -> Vec3 {
        let half = self.world_size / 2.0;
        Vec3::new(
            row as f32 * self.cell_size - half,
            value / HEIGHT_SCALE + self.zero_height,
            col as f32 * self.cell_size - half,
        )
    }
}

/// Renderable/collidable projection of one field cell
#[derive(Debug, Clone)]
pub struct GridPixel {
    pub row: usize,
    pub col: usize,
    pub position: Vec3,
    pub transform: Mat4,
    pub color: Vec3,
}

impl GridPixel {
    fn new(row: usize, col: usize) -> Self {
        Self {
            row,
            col,
            position: Vec3::ZERO,
            transform: Mat4::IDENTITY,
            color: Vec3::ONE,
        }
    }

    /// Recompute position, transform and color from the current cell value
    pub fn update(&mut self, field: &Grid, layout: &SurfaceLayout) {
        let value = field.get(self.row, self.col);
        let scaled = value / HEIGHT_SCALE;

        self.position = layout.cell_position(self.row, self.col, value);
        let scale = Vec3::new(
            layout.cell_size,
            scaled.abs() + PIXEL_MIN_THICKNESS,
            layout.cell_size,
        );
        self.transform =
            Mat4::from_scale_rotation_translation(scale, Quat::IDENTITY, self.position);

        let white = scaled.abs().min(1.0);
        self.color = Vec3::new(white, white, 1.0);
    }
}

/// Horizontal extent covered by the pixel centers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldBounds {
    pub min_x: f32,
    pub max_x: f32,
    pub min_z: f32,
    pub max_z: f32,
}

impl WorldBounds {
    #[inline]
    pub fn contains(&self, x: f32, z: f32) -> bool {
        x >= self.min_x && x <= self.max_x && z >= self.min_z && z <= self.max_z
    }
}

/// One pixel per field cell, in row-major order
#[derive(Debug, Clone)]
pub struct PixelField {
    pixels: Vec<GridPixel>,
    rows: usize,
    cols: usize,
    layout: SurfaceLayout,
    bounds: WorldBounds,
}

impl PixelField {
    pub fn new(field: &Grid, layout: SurfaceLayout) -> Self {
        let (rows, cols) = (field.rows(), field.cols());
        let mut pixels = Vec::with_capacity(rows * cols);
        for row in 0..rows {
            for col in 0..cols {
                let mut pixel = GridPixel::new(row, col);
                pixel.update(field, &layout);
                pixels.push(pixel);
            }
        }

        let first = pixels.first().expect("pixel field needs at least one cell");
        let last = pixels.last().expect("pixel field needs at least one cell");
        let bounds = WorldBounds {
            min_x: first.position.x,
            max_x: last.position.x,
            min_z: first.position.z,
            max_z: last.position.z,
        };

        Self {
            pixels,
            rows,
            cols,
            layout,
            bounds,
        }
    }

    /// Refresh every pixel from the field
    pub fn update(&mut self, field: &Grid) {
        for pixel in &mut self.pixels {
            pixel.update(field, &self.layout);
        }
    }

    pub fn pixels(&self) -> &[GridPixel] {
        &self.pixels
    }

    #[track_caller]
    pub fn pixel(&self, row: usize, col: usize) -> &GridPixel {
        assert!(
            row < self.rows && col < self.cols,
            "pixel ({row}, {col}) out of bounds for {}x{} field",
            self.rows,
            self.cols
        );
        &self.pixels[row * self.cols + col]
    }

    pub fn bounds(&self) -> WorldBounds {
        self.bounds
    }

    pub fn layout(&self) -> &SurfaceLayout {
        &self.layout
    }

    /// Nearest cell to a world position, `None` outside the field
    pub fn project(&self, position: Vec3) -> Option<(usize, usize)> {
        if !self.bounds.contains(position.x, position.z) {
            return None;
        }
        let b = &self.bounds;
        let row = lerp_index(position.x, b.min_x, b.max_x, self.rows);
        let col = lerp_index(position.z, b.min_z, b.max_z, self.cols);
        Some((row, col))
    }

    /// Interior cells within a `radius`-wide window around a world position
    ///
    /// Border cells are held fixed by the wave solver and are never returned.
    pub fn candidates(&self, position: Vec3, radius: usize) -> Vec<(usize, usize)> {
        let Some((row, col)) = self.project(position) else {
            return Vec::new();
        };
        if self.rows < 3 || self.cols < 3 {
            return Vec::new();
        }
        let half = radius / 2;
        let rows = row.saturating_sub(half).max(1)..=(row + half).min(self.rows - 2);
        let cols = col.saturating_sub(half).max(1)..=(col + half).min(self.cols - 2);

        let mut out = Vec::new();
        for r in rows {
            for c in cols.clone() {
                out.push((r, c));
            }
        }
        out
    }
}

/// Linear map of `value` in `[min, max]` onto `0..count`
#[inline]
fn lerp_index(value: f32, min: f32, max: f32, count: usize) -> usize {
    if count <= 1 || max <= min {
        return 0;
    }
    let t = (value - min) / (max - min);
    ((t * (count - 1) as f32).round() as usize).min(count - 1)
}

/// Convenience constructor from a config
pub fn pixel_field(field: &Grid, config: &SimConfig) -> PixelField {
    PixelField::new(field, SurfaceLayout::from_config(config))
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn field(dim: usize) -> (Grid, PixelField) {
        let grid = Grid::new(dim, dim);
        let config = SimConfig {
            grid_dim: dim,
            ..SimConfig::default()
        };
        let pixels = pixel_field(&grid, &config);
        (grid, pixels)
    }

    #[test]
    fn test_one_pixel_per_cell() {
        let (_, pixels) = field(40);
        assert_eq!(pixels.pixels().len(), 1600);
        let p = pixels.pixel(3, 7);
        assert_eq!((p.row, p.col), (3, 7));
    }

    #[test]
    fn test_cell_world_position() {
        let (_, pixels) = field(40);
        let p = pixels.pixel(10, 20);
        assert!(p.position.abs_diff_eq(Vec3::new(-0.5, -0.5, 0.0), EPS));

        let b = pixels.bounds();
        assert!((b.min_x + 1.0).abs() < EPS);
        assert!((b.max_x - 0.95).abs() < EPS);
    }

    #[test]
    fn test_pixel_follows_value() {
        let (mut grid, mut pixels) = field(10);
        grid.set(4, 4, 50.0);
        pixels.update(&grid);
        let p = pixels.pixel(4, 4);
        assert!((p.position.y - 0.0).abs() < EPS);
        assert!(p.color.abs_diff_eq(Vec3::new(0.5, 0.5, 1.0), EPS));
        // Thickness tracks |value| / 100
        let thickness = p.transform.y_axis.truncate().length();
        assert!((thickness - 0.51).abs() < EPS);

        grid.set(4, 4, -300.0);
        pixels.update(&grid);
        assert!(pixels.pixel(4, 4).color.abs_diff_eq(Vec3::new(1.0, 1.0, 1.0), EPS));
    }

    #[test]
    fn test_projection_roundtrip() {
        let (_, pixels) = field(40);
        let target = pixels.pixel(12, 30).position;
        assert_eq!(pixels.project(target), Some((12, 30)));
        assert_eq!(pixels.project(Vec3::new(1.5, 0.0, 0.0)), None);
        assert_eq!(pixels.project(Vec3::new(0.0, 0.0, -1.2)), None);
    }

    #[test]
    fn test_candidate_window() {
        let (_, pixels) = field(40);
        let center = pixels.pixel(20, 20).position;
        let cells = pixels.candidates(center, 6);
        assert_eq!(cells.len(), 49);
        assert!(cells.contains(&(17, 17)));
        assert!(cells.contains(&(23, 23)));
    }

    #[test]
    fn test_candidates_skip_border() {
        let (_, pixels) = field(40);
        let corner = pixels.pixel(0, 0).position;
        let cells = pixels.candidates(corner, 6);
        assert!(!cells.is_empty());
        assert!(cells.iter().all(|&(r, c)| r >= 1 && c >= 1 && r <= 3 && c <= 3));
    }
}
