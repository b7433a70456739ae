//! Separating-axis test for oriented boxes
//!
//! Each box is given as the object-to-world transform of the unit cube
//! `[-0.5, 0.5]³`, the same matrix the renderer draws with. The test checks
//! the 15 candidate axes (3 face normals per box, 9 edge cross products) and
//! reports the axis of least penetration.

use glam::{Mat4, Vec3};

/// Cross products shorter than this are treated as parallel edges
const PARALLEL_EPS: f32 = 1e-6;
/// Vertices within this depth of the deepest one belong to the contact patch
const PATCH_TOLERANCE: f32 = 1e-4;

/// Oriented bounding box extracted from a transform
#[derive(Debug, Clone, Copy)]
pub struct Obb {
    pub center: Vec3,
    /// Unit axes
    pub axes: [Vec3; 3],
    pub half_extents: Vec3,
}

impl Obb {
    /// OBB of the unit cube under `transform`
    pub fn from_transform(transform: &Mat4) -> Self {
        let cols = [
            transform.x_axis.truncate(),
            transform.y_axis.truncate(),
            transform.z_axis.truncate(),
        ];
        Self {
            center: transform.w_axis.truncate(),
            axes: cols.map(|c| c.normalize_or_zero()),
            half_extents: Vec3::new(cols[0].length(), cols[1].length(), cols[2].length()) * 0.5,
        }
    }

    /// Half-length of the box's shadow on `axis`
    #[inline]
    fn projected_radius(&self, axis: Vec3) -> f32 {
        (0..3)
            .map(|i| self.half_extents[i] * self.axes[i].dot(axis).abs())
            .sum()
    }

    pub fn vertices(&self) -> [Vec3; 8] {
        let mut out = [Vec3::ZERO; 8];
        for (i, v) in out.iter_mut().enumerate() {
            let sx = if i & 1 == 0 { -1.0 } else { 1.0 };
            let sy = if i & 2 == 0 { -1.0 } else { 1.0 };
            let sz = if i & 4 == 0 { -1.0 } else { 1.0 };
            *v = self.center
                + self.axes[0] * (sx * self.half_extents.x)
                + self.axes[1] * (sy * self.half_extents.y)
                + self.axes[2] * (sz * self.half_extents.z);
        }
        out
    }

    /// Centroid of the vertices furthest along `dir`
    fn support_patch(&self, dir: Vec3) -> Vec3 {
        let verts = self.vertices();
        let best = verts
            .iter()
            .map(|v| v.dot(dir))
            .fold(f32::NEG_INFINITY, f32::max);
        let (sum, count) = verts
            .iter()
            .filter(|v| v.dot(dir) >= best - PATCH_TOLERANCE)
            .fold((Vec3::ZERO, 0.0), |(sum, n), v| (sum + *v, n + 1.0));
        sum / count
    }

    /// The edge along `axis` furthest in `dir`, as a segment
    fn support_edge(&self, axis: usize, dir: Vec3) -> (Vec3, Vec3) {
        let mut mid = self.center;
        for i in 0..3 {
            if i != axis {
                let sign = if self.axes[i].dot(dir) >= 0.0 { 1.0 } else { -1.0 };
                mid += self.axes[i] * (sign * self.half_extents[i]);
            }
        }
        let half = self.axes[axis] * self.half_extents[axis];
        (mid - half, mid + half)
    }
}

/// Which kind of axis produced the minimum overlap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AxisKind {
    FaceA,
    FaceB,
    Edge(usize, usize),
}

/// Result of a box-box test
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionInfo {
    /// Contact normal in world space, pointing from B toward A
    pub normal: Vec3,
    /// Contact point in world space
    pub point: Vec3,
    /// Overlap along `normal`
    pub depth: f32,
}

/// Test two unit-cube transforms for overlap
///
/// Returns `None` when a separating axis exists.
pub fn check_collision_sat(a: &Mat4, b: &Mat4) -> Option<CollisionInfo> {
    let box_a = Obb::from_transform(a);
    let box_b = Obb::from_transform(b);
    let between = box_a.center - box_b.center;

    let mut best: Option<(f32, Vec3, AxisKind)> = None;
    let mut consider = |axis: Vec3, kind: AxisKind| -> bool {
        let len = axis.length();
        if len < PARALLEL_EPS {
            return true;
        }
        let axis = axis / len;
        let reach = box_a.projected_radius(axis) + box_b.projected_radius(axis);
        let overlap = reach - between.dot(axis).abs();
        if overlap < 0.0 {
            return false;
        }
        if best.is_none_or(|(d, _, _)| overlap < d) {
            let oriented = if between.dot(axis) < 0.0 { -axis } else { axis };
            best = Some((overlap, oriented, kind));
        }
        true
    };

    for i in 0..3 {
        if !consider(box_a.axes[i], AxisKind::FaceA) {
            return None;
        }
    }
    for i in 0..3 {
        if !consider(box_b.axes[i], AxisKind::FaceB) {
            return None;
        }
    }
    for i in 0..3 {
        for j in 0..3 {
            if !consider(box_a.axes[i].cross(box_b.axes[j]), AxisKind::Edge(i, j)) {
                return None;
            }
        }
    }

    let (depth, normal, kind) = best?;
    let point = match kind {
        // B's face is the reference; A's deepest vertices sit inside it
        AxisKind::FaceB => box_a.support_patch(-normal),
        // A's face is the reference; B's deepest vertices sit inside it
        AxisKind::FaceA => box_b.support_patch(normal),
        AxisKind::Edge(i, j) => {
            let edge_a = box_a.support_edge(i, -normal);
            let edge_b = box_b.support_edge(j, normal);
            let (pa, pb) = closest_points_on_segments(edge_a, edge_b);
            (pa + pb) * 0.5
        }
    };

    Some(CollisionInfo {
        normal,
        point,
        depth,
    })
}

/// Closest points between segments `p` and `q`
fn closest_points_on_segments(p: (Vec3, Vec3), q: (Vec3, Vec3)) -> (Vec3, Vec3) {
    let d1 = p.1 - p.0;
    let d2 = q.1 - q.0;
    let r = p.0 - q.0;
    let a = d1.length_squared();
    let e = d2.length_squared();
    let f = d2.dot(r);
    let c = d1.dot(r);
    let b = d1.dot(d2);
    let denom = a * e - b * b;

    let mut s = if denom > PARALLEL_EPS {
        ((b * f - c * e) / denom).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let mut t = if e > PARALLEL_EPS { (b * s + f) / e } else { 0.0 };
    if t < 0.0 {
        t = 0.0;
        s = if a > PARALLEL_EPS { (-c / a).clamp(0.0, 1.0) } else { 0.0 };
    } else if t > 1.0 {
        t = 1.0;
        s = if a > PARALLEL_EPS { ((b - c) / a).clamp(0.0, 1.0) } else { 0.0 };
    }
    (p.0 + d1 * s, q.0 + d2 * t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;
    use std::f32::consts::FRAC_PI_4;

    const EPS: f32 = 1e-4;

    fn cube(pos: Vec3, size: f32) -> Mat4 {
        Mat4::from_scale_rotation_translation(Vec3::splat(size), Quat::IDENTITY, pos)
    }

    #[test]
    fn test_separated_boxes_miss() {
        let a = cube(Vec3::new(-1.0, 0.0, 0.0), 1.0);
        let b = cube(Vec3::new(1.0, 0.0, 0.0), 1.0);
        assert!(check_collision_sat(&a, &b).is_none());
    }

    #[test]
    fn test_face_contact_normal_points_b_to_a() {
        let a = cube(Vec3::new(-0.45, 0.0, 0.0), 1.0);
        let b = cube(Vec3::new(0.45, 0.0, 0.0), 1.0);
        let info = check_collision_sat(&a, &b).expect("boxes overlap");
        assert!(info.normal.abs_diff_eq(Vec3::new(-1.0, 0.0, 0.0), EPS));
        assert!((info.depth - 0.1).abs() < EPS);
        // Contact patch centroid lies on the center line
        assert!(info.point.y.abs() < EPS && info.point.z.abs() < EPS);

        let flipped = check_collision_sat(&b, &a).expect("boxes overlap");
        assert!(flipped.normal.abs_diff_eq(Vec3::new(1.0, 0.0, 0.0), EPS));
    }

    #[test]
    fn test_stacked_boxes_vertical_normal() {
        let a = cube(Vec3::new(0.1, 0.95, 0.0), 1.0);
        let b = cube(Vec3::ZERO, 1.0);
        let info = check_collision_sat(&a, &b).expect("boxes overlap");
        assert!(info.normal.abs_diff_eq(Vec3::Y, EPS));
        assert!((info.depth - 0.05).abs() < EPS);
    }

    #[test]
    fn test_rotated_box_corner_separation() {
        // A box rotated 45° about Y reaches sqrt(2)/2 along X
        let rotated = Mat4::from_rotation_translation(Quat::from_rotation_y(FRAC_PI_4), Vec3::ZERO);
        let near = cube(Vec3::new(1.15, 0.0, 0.0), 1.0);
        let far = cube(Vec3::new(1.25, 0.0, 0.0), 1.0);
        assert!(check_collision_sat(&near, &rotated).is_some());
        assert!(check_collision_sat(&far, &rotated).is_none());
    }

    #[test]
    fn test_obb_from_scaled_transform() {
        let m = Mat4::from_scale_rotation_translation(
            Vec3::new(2.0, 4.0, 6.0),
            Quat::IDENTITY,
            Vec3::new(1.0, 1.0, 1.0),
        );
        let obb = Obb::from_transform(&m);
        assert!(obb.half_extents.abs_diff_eq(Vec3::new(1.0, 2.0, 3.0), EPS));
        assert!(obb.center.abs_diff_eq(Vec3::ONE, EPS));
        assert!(obb.axes[1].abs_diff_eq(Vec3::Y, EPS));
    }

    #[test]
    fn test_segment_closest_points() {
        let p = (Vec3::new(-1.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0));
        let q = (Vec3::new(0.0, 1.0, -1.0), Vec3::new(0.0, 1.0, 1.0));
        let (a, b) = closest_points_on_segments(p, q);
        assert!(a.abs_diff_eq(Vec3::ZERO, EPS));
        assert!(b.abs_diff_eq(Vec3::new(0.0, 1.0, 0.0), EPS));
    }
}
