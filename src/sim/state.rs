//! Game state and core simulation types

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::schedule::{TimerAction, TimerQueue};
use super::spawn::Spawner;
use super::trail::Trail;
use crate::consts::*;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Run ended; only a restart is accepted
    GameOver,
}

/// What slicing a projectile means
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectileKind {
    /// Score-granting berry; `skin_slot` indexes the active skin's sprites
    Target { skin_slot: u8 },
    /// Bomb: costs a life on contact
    Hazard,
}

/// A flying berry or bomb
#[derive(Debug, Clone)]
pub struct Projectile {
    pub id: u32,
    pub kind: ProjectileKind,
    pub pos: Vec2,
    pub vel: Vec2,
    pub gravity: f32,
    pub radius: f32,
    pub rotation: f32,
    pub rotation_speed: f32,
    /// Set once when sliced or struck; resolved projectiles are inert
    pub resolved: bool,
    pub spawn_tick: u64,
}

impl Projectile {
    pub fn is_target(&self) -> bool {
        matches!(self.kind, ProjectileKind::Target { .. })
    }
}

/// Consecutive-slice tracking
///
/// `generation` is bumped on every window change so expiry timers carrying
/// an older generation fire as no-ops.
#[derive(Debug, Clone, Copy, Default)]
pub struct ComboState {
    pub count: u32,
    pub generation: u64,
}

/// Events for the presentation and persistence collaborators, drained once
/// per tick by the session
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    TargetSliced { id: u32, at: Vec2, combo: u32 },
    HazardStruck { id: u32, at: Vec2 },
    TargetMissed { id: u32 },
    ComboEnded { count: u32, bonus: u64 },
    WaveStarted { index: u32 },
    RunEnded { score: u64, wave: u32 },
}

/// Slice leftovers: berry halves and juice splats. Visual only; the decay
/// collaborator owns them once spawned, the tick driver just fades them.
#[derive(Debug, Clone)]
pub struct Debris {
    pub pos: Vec2,
    pub vel: Vec2,
    pub rotation: f32,
    pub rotation_speed: f32,
    pub skin_slot: u8,
    /// 1.0 at spawn, linearly down to 0
    pub life: f32,
}

/// Complete per-run state (deterministic given seed and inputs)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Run RNG; every random draw goes through here
    pub rng: Pcg32,
    pub score: u64,
    pub lives: u8,
    /// Current wave index (0-based)
    pub wave_index: u32,
    pub phase: GamePhase,
    pub combo: ComboState,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Live projectiles, in spawn (id) order
    pub projectiles: Vec<Projectile>,
    pub debris: Vec<Debris>,
    /// Blade trail buffer
    pub trail: Trail,
    /// Camera feedback intensity, decays each tick
    pub shake: f32,
    pub spawner: Spawner,
    pub timers: TimerQueue,
    events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create a fresh run in `Playing`
    pub fn new(seed: u64) -> Self {
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            score: 0,
            lives: STARTING_LIVES,
            wave_index: 0,
            phase: GamePhase::Playing,
            combo: ComboState::default(),
            time_ticks: 0,
            projectiles: Vec::new(),
            debris: Vec::new(),
            trail: Trail::new(),
            shake: 0.0,
            spawner: Spawner::new(),
            timers: TimerQueue::new(),
            events: Vec::new(),
            next_id: 1,
        };

        // Wave 0 kicks in on the first tick
        state.timers.schedule(1, TimerAction::StartWave { index: 0 });
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take every event emitted since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Peek at pending events without draining (tests, HUD)
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }
}
