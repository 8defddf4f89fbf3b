//! Host-agnostic run driver
//!
//! Owns the fixed-timestep accumulator, buffers pointer input between
//! ticks, applies the configured blade-activation mode, and talks to the
//! injected profile store when a run ends. The wasm and native entry
//! points both drive the game exclusively through this type.

use glam::Vec2;

use crate::consts::{MAX_SUBSTEPS, SIM_DT};
use crate::persistence::ProfileStore;
use crate::profile::Profile;
use crate::render::RenderFrame;
use crate::settings::{BladeMode, Settings};
use crate::sim::{GameEvent, GamePhase, GameState, PointerSample, TickInput, tick};

pub struct GameSession<S: ProfileStore> {
    state: GameState,
    settings: Settings,
    profile: Profile,
    store: S,
    accumulator: f32,
    pending: TickInput,
    /// Pointer currently pressed (held-blade mode)
    pointer_held: bool,
    /// Events drained during the most recent frame
    events: Vec<GameEvent>,
    saved_this_run: bool,
}

impl<S: ProfileStore> GameSession<S> {
    pub fn new(seed: u64, settings: Settings, store: S) -> Self {
        let profile = store.load().unwrap_or_else(|| {
            log::warn!("No stored profile, starting with defaults");
            Profile::default()
        });
        log::info!(
            "Run starting with seed {seed}, best score {}",
            profile.high_score
        );
        Self {
            state: GameState::new(seed),
            settings,
            profile,
            store,
            accumulator: 0.0,
            pending: TickInput::default(),
            pointer_held: false,
            events: Vec::new(),
            saved_this_run: false,
        }
    }

    /// Buffer a pointer-move sample for the next tick, subject to the
    /// blade-activation mode
    pub fn pointer_moved(&mut self, x: f32, y: f32, time_ms: f64) {
        if self.settings.blade_mode == BladeMode::WhileHeld && !self.pointer_held {
            return;
        }
        self.pending.samples.push(PointerSample {
            pos: Vec2::new(x, y),
            time_ms,
        });
    }

    pub fn pointer_pressed(&mut self) {
        self.pointer_held = true;
    }

    pub fn pointer_released(&mut self) {
        self.pointer_held = false;
        if self.settings.blade_mode == BladeMode::WhileHeld {
            self.pending.end_stroke = true;
        }
    }

    /// Ask for a fresh run; honored only after game over
    pub fn request_restart(&mut self) {
        if self.state.phase == GamePhase::GameOver {
            self.pending.restart = true;
            self.saved_this_run = false;
        }
    }

    /// Advance the simulation by `dt_real` seconds of host time
    pub fn frame(&mut self, dt_real: f32) {
        let dt = dt_real.min(0.1);
        self.accumulator += dt;
        self.events.clear();

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            // Buffered input is consumed by the first substep only
            let input = std::mem::take(&mut self.pending);
            tick(&mut self.state, &input, SIM_DT);
            self.events.extend(self.state.drain_events());
            self.accumulator -= SIM_DT;
            substeps += 1;
        }

        let run_ended = self.events.iter().find_map(|e| match e {
            GameEvent::RunEnded { score, .. } => Some(*score),
            _ => None,
        });
        if let Some(score) = run_ended {
            self.finish_run(score);
        }
    }

    /// Persist the high score once per run, only on improvement
    fn finish_run(&mut self, score: u64) {
        if self.saved_this_run {
            return;
        }
        self.saved_this_run = true;
        if self.profile.record_score(score) {
            if self.store.save(&self.profile) {
                log::info!("New best score {score} saved");
            } else {
                log::warn!("Could not save best score {score}, continuing");
            }
        }
    }

    /// Events drained during the most recent `frame` call
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Draw list for the presentation layer
    pub fn render_frame(&self) -> RenderFrame {
        RenderFrame::build(&self.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{HAZARD_RADIUS, STARTING_LIVES};
    use crate::persistence::MemoryStore;
    use crate::sim::{Projectile, ProjectileKind};

    fn place_hazard(session: &mut GameSession<impl ProfileStore>, x: f32, y: f32) {
        let id = session.state.next_entity_id();
        session.state.projectiles.push(Projectile {
            id,
            kind: ProjectileKind::Hazard,
            pos: Vec2::new(x, y),
            vel: Vec2::ZERO,
            gravity: 0.0,
            radius: HAZARD_RADIUS,
            rotation: 0.0,
            rotation_speed: 0.0,
            resolved: false,
            spawn_tick: 0,
        });
    }

    fn swipe_through(session: &mut GameSession<impl ProfileStore>, y: f32) {
        session.pointer_moved(50.0, y, 0.0);
        session.pointer_moved(450.0, y, 8.0);
        session.frame(SIM_DT);
    }

    #[test]
    fn test_fixed_step_accumulation() {
        let mut session = GameSession::new(1, Settings::default(), MemoryStore::new());
        let start = session.state.time_ticks;

        // Half a step: nothing happens yet
        session.frame(SIM_DT * 0.5);
        assert_eq!(session.state.time_ticks, start);

        // The other half completes one tick
        session.frame(SIM_DT * 0.5);
        assert_eq!(session.state.time_ticks, start + 1);

        // A long frame is capped at MAX_SUBSTEPS ticks
        session.frame(10.0);
        assert_eq!(
            session.state.time_ticks,
            start + 1 + u64::from(MAX_SUBSTEPS)
        );
    }

    #[test]
    fn test_always_mode_slices_without_press() {
        let mut session = GameSession::new(1, Settings::default(), MemoryStore::new());
        place_hazard(&mut session, 200.0, 300.0);
        swipe_through(&mut session, 300.0);
        assert_eq!(session.state.lives, STARTING_LIVES - 1);
    }

    #[test]
    fn test_while_held_mode_gates_samples() {
        let settings = Settings {
            blade_mode: BladeMode::WhileHeld,
            ..Default::default()
        };
        let mut session = GameSession::new(1, settings, MemoryStore::new());
        place_hazard(&mut session, 200.0, 300.0);

        // Moves with the pointer up are ignored
        swipe_through(&mut session, 300.0);
        assert_eq!(session.state.lives, STARTING_LIVES);

        // Press, and the same swipe cuts
        session.pointer_pressed();
        swipe_through(&mut session, 300.0);
        assert_eq!(session.state.lives, STARTING_LIVES - 1);

        // Release clears the trail on the next tick
        session.pointer_released();
        session.frame(SIM_DT);
        assert!(session.state.trail.is_empty());
    }

    fn run_to_game_over(session: &mut GameSession<impl ProfileStore>, score_targets: u32) {
        // Slice some berries for score, then feed it bombs until the run ends
        for i in 0..score_targets {
            let id = session.state.next_entity_id();
            session.state.projectiles.push(Projectile {
                id,
                kind: ProjectileKind::Target { skin_slot: 0 },
                pos: Vec2::new(100.0 + 60.0 * i as f32, 300.0),
                vel: Vec2::ZERO,
                gravity: 0.0,
                radius: crate::consts::TARGET_RADIUS,
                rotation: 0.0,
                rotation_speed: 0.0,
                resolved: false,
                spawn_tick: 0,
            });
        }
        if score_targets > 0 {
            swipe_through(session, 300.0);
        }
        while session.state.phase == GamePhase::Playing {
            place_hazard(session, 200.0, 500.0);
            swipe_through(session, 500.0);
        }
    }

    #[test]
    fn test_final_score_persisted_once() {
        let mut session = GameSession::new(1, Settings::default(), MemoryStore::new());
        run_to_game_over(&mut session, 3);

        let saved = session.store().saved().expect("profile saved");
        assert_eq!(saved.high_score, session.state.score);
        assert_eq!(session.store().save_count(), 1);

        // Post-run frames do not save again
        session.frame(SIM_DT);
        session.frame(SIM_DT);
        assert_eq!(session.store().save_count(), 1);
    }

    #[test]
    fn test_save_skipped_when_not_an_improvement() {
        let mut stored = Profile::default();
        stored.record_score(1_000_000);
        let mut session = GameSession::new(
            1,
            Settings::default(),
            MemoryStore::with_profile(stored.clone()),
        );
        run_to_game_over(&mut session, 3);

        assert_eq!(session.store().save_count(), 0);
        assert_eq!(session.store().saved(), Some(stored));
    }

    #[test]
    fn test_broken_store_degrades_gracefully() {
        struct BrokenStore;
        impl ProfileStore for BrokenStore {
            fn load(&self) -> Option<Profile> {
                None
            }
            fn save(&self, _profile: &Profile) -> bool {
                false
            }
        }

        let mut session = GameSession::new(1, Settings::default(), BrokenStore);
        assert_eq!(session.profile().high_score, 0);
        run_to_game_over(&mut session, 2);

        // The run still ended cleanly and the in-memory profile kept the score
        assert_eq!(session.state.phase, GamePhase::GameOver);
        assert_eq!(session.profile().high_score, session.state.score);
    }

    #[test]
    fn test_restart_after_game_over() {
        let mut session = GameSession::new(1, Settings::default(), MemoryStore::new());
        run_to_game_over(&mut session, 1);
        assert_eq!(session.state.phase, GamePhase::GameOver);

        session.request_restart();
        session.frame(SIM_DT);
        assert_eq!(session.state.phase, GamePhase::Playing);
        assert_eq!(session.state.score, 0);
        assert_eq!(session.state.lives, STARTING_LIVES);
    }
}
