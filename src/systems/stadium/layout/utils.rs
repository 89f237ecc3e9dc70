// UTILS

use bevy::prelude::*;

/// Evaluates a quadratic Bezier curve at `t` in [0, 1].
pub fn quadratic_bezier(curve: &[Vec3; 3], t: f32) -> Vec3 {
    let u = 1.0 - t;
    curve[0] * (u * u) + curve[1] * (2.0 * u * t) + curve[2] * (t * t)
}

/// Derivative of the quadratic Bezier at `t`, not normalized.
pub fn quadratic_bezier_tangent(curve: &[Vec3; 3], t: f32) -> Vec3 {
    (curve[1] - curve[0]) * (2.0 * (1.0 - t)) + (curve[2] - curve[1]) * (2.0 * t)
}

/// Closed rectangle outline in the XZ plane at height `y`, first point repeated at the end.
pub fn rectangle_outline(min: Vec2, max: Vec2, y: f32) -> Vec<Vec3> {
    vec![
        Vec3::new(min.x, y, min.y),
        Vec3::new(min.x, y, max.y),
        Vec3::new(max.x, y, max.y),
        Vec3::new(max.x, y, min.y),
        Vec3::new(min.x, y, min.y),
    ]
}

/// Points along a circular arc in the XZ plane, `segments + 1` points including both ends.
pub fn arc_points(center: Vec3, radius: f32, start_angle: f32, sweep: f32, segments: usize) -> Vec<Vec3> {
    (0..=segments)
        .map(|i| {
            let angle = start_angle + sweep * i as f32 / segments as f32;
            center + Vec3::new(angle.cos() * radius, 0.0, angle.sin() * radius)
        })
        .collect()
}

/// Ellipse outline in the XZ plane, counter-clockwise seen from above, not closed.
pub fn ellipse_points(radius_x: f32, radius_z: f32, segments: usize) -> Vec<Vec2> {
    (0..segments)
        .map(|i| {
            let angle = std::f32::consts::TAU * i as f32 / segments as f32;
            Vec2::new(angle.cos() * radius_x, angle.sin() * radius_z)
        })
        .collect()
}

/// Component-wise min/max of a point set. Returns zeros for an empty set.
pub fn point_bounds(points: impl Iterator<Item = Vec3>) -> (Vec3, Vec3) {
    points
        .fold(None, |acc: Option<(Vec3, Vec3)>, p| match acc {
            Some((min, max)) => Some((min.min(p), max.max(p))),
            None => Some((p, p)),
        })
        .unwrap_or((Vec3::ZERO, Vec3::ZERO))
}

/// Evenly spaced positions from `-length / 2` while they stay within the length.
pub fn spaced_positions(length: f32, spacing: f32) -> Vec<f32> {
    if length < 0.0 || spacing <= 0.0 {
        return Vec::new();
    }
    let count = (length / spacing + 1e-4).floor() as usize + 1;
    (0..count).map(|i| -length / 2.0 + i as f32 * spacing).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bezier_endpoints() {
        let curve = [Vec3::ZERO, Vec3::new(0.0, 13.0, 0.0), Vec3::new(0.0, 10.0, -5.0)];
        assert_eq!(quadratic_bezier(&curve, 0.0), curve[0]);
        assert!(quadratic_bezier(&curve, 1.0).abs_diff_eq(curve[2], 1e-6));
        // starts heading towards the control point
        assert!(quadratic_bezier_tangent(&curve, 0.0).normalize().abs_diff_eq(Vec3::Y, 1e-6));
    }

    #[test]
    fn test_arc_has_both_ends() {
        let arc = arc_points(Vec3::ZERO, 1.0, 0.0, std::f32::consts::FRAC_PI_2, 16);
        assert_eq!(arc.len(), 17);
        assert!(arc[0].abs_diff_eq(Vec3::X, 1e-6));
        assert!(arc[16].abs_diff_eq(Vec3::Z, 1e-6));
    }

    #[test]
    fn test_spaced_positions_include_far_end() {
        let xs = spaced_positions(20.0, 10.0);
        assert_eq!(xs, vec![-10.0, 0.0, 10.0]);
        assert_eq!(spaced_positions(9.0, 10.0).len(), 1);
        assert!(spaced_positions(-1.0, 10.0).is_empty());
    }

    #[test]
    fn test_point_bounds() {
        let (min, max) = point_bounds([Vec3::new(1.0, -2.0, 3.0), Vec3::new(-1.0, 2.0, 0.0)].into_iter());
        assert_eq!(min, Vec3::new(-1.0, -2.0, 0.0));
        assert_eq!(max, Vec3::new(1.0, 2.0, 3.0));
    }
}
