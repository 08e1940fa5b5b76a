//! Point, segment and circle queries
//!
//! All functions are total: degenerate segments collapse to their start point
//! instead of dividing by zero.

use glam::Vec2;

/// Squared segment length below which a segment is treated as a point
pub const DEGENERATE_LENGTH_SQ: f32 = 1e-4;

/// Closest point on segment `ab` to `p`, with its parameter in `[0, 1]`
pub fn closest_point_on_segment(p: Vec2, a: Vec2, b: Vec2) -> (Vec2, f32) {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq == 0.0 {
        return (a, 0.0);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    (a + ab * t, t)
}

/// Euclidean distance from `p` to segment `ab`
#[inline]
pub fn point_to_segment_distance(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let (closest, _) = closest_point_on_segment(p, a, b);
    p.distance(closest)
}

/// Whether a circle touches a segment thickened by `half_thickness`
#[inline]
pub fn circle_overlaps_segment(
    center: Vec2,
    radius: f32,
    a: Vec2,
    b: Vec2,
    half_thickness: f32,
) -> bool {
    point_to_segment_distance(center, a, b) < radius + half_thickness
}

/// Unit perpendicular of segment `ab` (left-hand side), or zero if degenerate
#[inline]
pub fn segment_normal(a: Vec2, b: Vec2) -> Vec2 {
    (b - a).perp().normalize_or_zero()
}

/// Clamp a point into an axis-aligned rectangle
#[inline]
pub fn clamp_to_rect(p: Vec2, min: Vec2, max: Vec2) -> Vec2 {
    p.clamp(min, max)
}

/// Remove the inward normal component of `velocity`, reflecting it scaled by `restitution`
///
/// Only applies when the velocity points into the surface (`v·n < 0`); the
/// tangential component is left untouched.
#[inline]
pub fn reflect_inward(velocity: Vec2, normal: Vec2, restitution: f32) -> Vec2 {
    let vn = velocity.dot(normal);
    if vn < 0.0 {
        velocity - (1.0 + restitution) * vn * normal
    } else {
        velocity
    }
}
