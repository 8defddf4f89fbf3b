//! Projectile motion
//!
//! Explicit Euler under constant gravity plus a spin update. Not a physics
//! engine: no collision response, no drag, no substepping. Off-screen
//! detection only reports ids; life bookkeeping belongs to the state
//! machine.

use super::state::Projectile;
use crate::consts::{OFFSCREEN_MARGIN, PLAYFIELD_HEIGHT};

/// Advance every unresolved projectile by `dt` seconds.
///
/// `pos += vel * dt; vel.y += gravity * dt; rotation += spin * dt`.
/// Returns the ids of projectiles that fell past the playfield bottom this
/// tick. With `dt == 0.0` positions and velocities are untouched.
pub fn advance(projectiles: &mut [Projectile], dt: f32) -> Vec<u32> {
    let mut expired = Vec::new();
    for p in projectiles.iter_mut() {
        if p.resolved {
            continue;
        }
        p.pos += p.vel * dt;
        p.vel.y += p.gravity * dt;
        p.rotation += p.rotation_speed * dt;

        let falling = p.vel.y > 0.0;
        if falling && p.pos.y - p.radius > PLAYFIELD_HEIGHT + OFFSCREEN_MARGIN {
            expired.push(p.id);
        }
    }
    expired
}
