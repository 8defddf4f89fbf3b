//! Wave-scheduled spawning
//!
//! Berries launch from below the bottom edge with a randomized upward
//! kick; bombs ride along with a wave-scaled probability. Cadence runs
//! entirely through the timer queue, so the spawner itself is just the
//! per-wave bookkeeping.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::schedule::{TimerAction, TimerQueue};
use super::state::{Projectile, ProjectileKind};
use crate::consts::*;

/// Target cadence for one wave
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaveSpec {
    /// Targets spawned over the wave
    pub count: u32,
    /// Ticks between consecutive spawns
    pub spawn_interval_ticks: u64,
    /// Rest before the next wave begins
    pub post_delay_ticks: u64,
}

impl WaveSpec {
    /// Cadence ramps with the wave index: more berries, shorter gaps.
    /// The interval floors out so late waves stay playable.
    pub fn for_wave(index: u32) -> Self {
        Self {
            count: 8 + index * 2,
            spawn_interval_ticks: 120u64.saturating_sub(u64::from(index) * 6).max(45),
            post_delay_ticks: 240,
        }
    }
}

/// Per-wave spawn bookkeeping
#[derive(Debug, Clone)]
pub struct Spawner {
    pub spec: WaveSpec,
    /// Targets still to spawn in the current wave
    pub remaining: u32,
}

impl Default for Spawner {
    fn default() -> Self {
        Self::new()
    }
}

impl Spawner {
    pub fn new() -> Self {
        Self {
            spec: WaveSpec::for_wave(0),
            remaining: 0,
        }
    }

    /// Arm the spawner for wave `index` and queue its first spawn
    pub fn begin_wave(&mut self, index: u32, timers: &mut TimerQueue, now: u64) {
        self.spec = WaveSpec::for_wave(index);
        self.remaining = self.spec.count;
        timers.schedule(now + self.spec.spawn_interval_ticks, TimerAction::Spawn);
        log::info!(
            "wave {} armed: {} targets every {} ticks",
            index,
            self.spec.count,
            self.spec.spawn_interval_ticks
        );
    }

    /// Percent chance that a bomb accompanies a spawn at `wave`
    pub fn hazard_chance(wave: u32) -> u32 {
        (8 + wave * 2).min(30)
    }
}

fn launch(id: u32, kind: ProjectileKind, radius: f32, rng: &mut Pcg32, tick: u64) -> Projectile {
    let x = rng.random_range(SPAWN_MARGIN_X..(PLAYFIELD_WIDTH - SPAWN_MARGIN_X));
    let vx = rng.random_range(-DRIFT_SPEED..DRIFT_SPEED);
    let vy = -rng.random_range(LAUNCH_SPEED_MIN..LAUNCH_SPEED_MAX);
    let spin = rng.random_range(-SPIN_SPEED..SPIN_SPEED);
    Projectile {
        id,
        kind,
        pos: Vec2::new(x, PLAYFIELD_HEIGHT + radius + 20.0),
        vel: Vec2::new(vx, vy),
        gravity: GRAVITY,
        radius,
        rotation: 0.0,
        rotation_speed: spin,
        resolved: false,
        spawn_tick: tick,
    }
}

/// Build a berry with randomized launch parameters
pub fn spawn_target(id: u32, rng: &mut Pcg32, tick: u64) -> Projectile {
    let skin_slot = rng.random_range(0..4u32) as u8;
    launch(
        id,
        ProjectileKind::Target { skin_slot },
        TARGET_RADIUS,
        rng,
        tick,
    )
}

/// Build a bomb with randomized launch parameters
pub fn spawn_hazard(id: u32, rng: &mut Pcg32, tick: u64) -> Projectile {
    launch(id, ProjectileKind::Hazard, HAZARD_RADIUS, rng, tick)
}
