//! Slice detection
//!
//! The tricky part of a slicing game: deciding which moving circles a blade
//! segment crossed this tick. The predicate is the clamped closest-point
//! test: parametrize the segment as `P(t) = p1 + t*(p2 - p1)`, clamp the
//! minimizing `t` to [0, 1], and report a hit when the closest approach is
//! within the projectile radius.

use glam::Vec2;

use super::state::Projectile;

/// Squared distance from `center` to the closest point of segment p1..p2
fn closest_distance_sq(p1: Vec2, p2: Vec2, center: Vec2) -> f32 {
    let d = p2 - p1;
    let len_sq = d.length_squared();
    if len_sq <= f32::EPSILON {
        // Degenerate segment: plain point-to-center distance
        return (center - p1).length_squared();
    }
    let t = ((center - p1).dot(d) / len_sq).clamp(0.0, 1.0);
    (center - (p1 + d * t)).length_squared()
}

/// True when the segment passes within `radius` of `center`
#[inline]
pub fn segment_hits_circle(p1: Vec2, p2: Vec2, center: Vec2, radius: f32) -> bool {
    closest_distance_sq(p1, p2, center) <= radius * radius
}

/// Ids of every live projectile the blade segment intersects.
///
/// Projectiles already resolved are skipped, which keeps resolution
/// at-most-once even if the blade lingers over the same spot. All hits in
/// one pass are reported; the state machine decides what they mean.
pub fn resolve(p1: Vec2, p2: Vec2, projectiles: &[Projectile]) -> Vec<u32> {
    projectiles
        .iter()
        .filter(|p| !p.resolved)
        .filter(|p| segment_hits_circle(p1, p2, p.pos, p.radius))
        .map(|p| p.id)
        .collect()
}
