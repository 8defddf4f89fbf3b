//! Fixed timestep simulation tick
//!
//! One tick performs, in strict order: ingest buffered pointer samples,
//! slice detection against the pre-advance projectile positions, motion
//! integration, miss/expiry bookkeeping, then due timer actions (combo
//! expiry, spawns, wave starts). Pointer events arriving between ticks are
//! buffered by the session and consumed here, never inline.

use glam::Vec2;
use rand::Rng;

use super::collision;
use super::motion;
use super::schedule::TimerAction;
use super::spawn::{self, Spawner};
use super::state::{Debris, GameEvent, GamePhase, GameState, ProjectileKind};
use crate::consts::*;

/// A buffered pointer-move sample
#[derive(Debug, Clone, Copy)]
pub struct PointerSample {
    pub pos: Vec2,
    pub time_ms: f64,
}

/// Input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pointer samples gathered since the previous tick, oldest first
    pub samples: Vec<PointerSample>,
    /// The slicing stroke ended (pointer released in held-blade mode)
    pub end_stroke: bool,
    /// Restart request; honored only in GameOver
    pub restart: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if state.phase == GamePhase::GameOver {
        if input.restart {
            log::info!("restarting run");
            *state = GameState::new(state.seed.wrapping_add(1));
        }
        return;
    }

    state.time_ticks += 1;

    // 1. Ingest buffered pointer samples
    for sample in &input.samples {
        state.trail.record(sample.pos, sample.time_ms);
    }

    // 2. Slice detection against pre-advance positions, one pass per tick.
    //    Without fresh samples the blade is considered at rest; the stale
    //    segment is never re-tested.
    if !input.samples.is_empty() {
        if let Some((p1, p2)) = state.trail.latest_segment() {
            let hits = collision::resolve(p1, p2, &state.projectiles);
            apply_hits(state, &hits);
        }
    }

    if input.end_stroke {
        state.trail.clear();
    }

    // 3. Advance motion
    let expired = motion::advance(&mut state.projectiles, dt);

    // 4. Unsliced targets falling off-screen cost a life; prune everything
    //    that resolved or expired this tick
    for &id in &expired {
        apply_expiry(state, id);
    }
    state
        .projectiles
        .retain(|p| !p.resolved && !expired.contains(&p.id));

    // 5. Fire due timers; a run that just ended has already cleared them
    if state.phase == GamePhase::Playing {
        for action in state.timers.due(state.time_ticks) {
            apply_action(state, action);
        }
    }

    // Leftovers fade even on the game-over tick
    decay_debris(state, dt);
    state.shake *= 0.9;
    if state.shake < 0.01 {
        state.shake = 0.0;
    }
}

fn apply_hits(state: &mut GameState, hits: &[u32]) {
    for &id in hits {
        // Stale ids are expected across the event boundary, not an error
        let Some(p) = state.projectiles.iter_mut().find(|p| p.id == id) else {
            continue;
        };
        if p.resolved {
            continue;
        }
        p.resolved = true;
        let (kind, at, rotation) = (p.kind, p.pos, p.rotation);

        match kind {
            ProjectileKind::Target { skin_slot } => {
                state.score += BASE_POINTS;
                state.combo.count += 1;
                state.combo.generation += 1;
                state.timers.schedule(
                    state.time_ticks + COMBO_IDLE_TICKS,
                    TimerAction::ComboExpiry {
                        generation: state.combo.generation,
                    },
                );
                state.push_event(GameEvent::TargetSliced {
                    id,
                    at,
                    combo: state.combo.count,
                });
                spawn_debris(state, at, rotation, skin_slot);
            }
            ProjectileKind::Hazard => {
                // No bonus for a window ended by a bomb
                cancel_combo(state);
                state.shake = (state.shake + 0.5).min(1.0);
                state.push_event(GameEvent::HazardStruck { id, at });
                lose_life(state);
            }
        }

        if state.phase != GamePhase::Playing {
            break;
        }
    }
}

fn apply_expiry(state: &mut GameState, id: u32) {
    if state.phase != GamePhase::Playing {
        return;
    }
    let Some(p) = state.projectiles.iter().find(|p| p.id == id) else {
        return;
    };
    // Bombs fall away free of charge; sliced projectiles were already scored
    if p.resolved || !p.is_target() {
        return;
    }
    state.push_event(GameEvent::TargetMissed { id });
    lose_life(state);
}

fn apply_action(state: &mut GameState, action: TimerAction) {
    match action {
        TimerAction::ComboExpiry { generation } => {
            if generation == state.combo.generation && state.combo.count > 0 {
                close_combo(state);
            }
        }
        TimerAction::Spawn => run_spawn(state),
        TimerAction::StartWave { index } => {
            state.wave_index = index;
            state
                .spawner
                .begin_wave(index, &mut state.timers, state.time_ticks);
            state.push_event(GameEvent::WaveStarted { index });
        }
    }
}

fn run_spawn(state: &mut GameState) {
    if state.spawner.remaining == 0 {
        return;
    }
    state.spawner.remaining -= 1;

    let id = state.next_entity_id();
    let target = spawn::spawn_target(id, &mut state.rng, state.time_ticks);
    state.projectiles.push(target);

    if state.rng.random_range(0..100u32) < Spawner::hazard_chance(state.wave_index) {
        let id = state.next_entity_id();
        let hazard = spawn::spawn_hazard(id, &mut state.rng, state.time_ticks);
        state.projectiles.push(hazard);
    }

    if state.spawner.remaining > 0 {
        state.timers.schedule(
            state.time_ticks + state.spawner.spec.spawn_interval_ticks,
            TimerAction::Spawn,
        );
    } else {
        state.timers.schedule(
            state.time_ticks + state.spawner.spec.post_delay_ticks,
            TimerAction::StartWave {
                index: state.wave_index + 1,
            },
        );
    }
}

/// Close the current combo window, awarding the bonus for multi-slice runs
fn close_combo(state: &mut GameState) {
    let count = state.combo.count;
    let bonus = if count > 1 {
        u64::from(count) * COMBO_BONUS_PER_HIT
    } else {
        0
    };
    state.score += bonus;
    state.push_event(GameEvent::ComboEnded { count, bonus });
    state.combo.count = 0;
    state.combo.generation += 1;
}

fn cancel_combo(state: &mut GameState) {
    state.combo.count = 0;
    state.combo.generation += 1;
}

fn lose_life(state: &mut GameState) {
    debug_assert!(state.lives > 0, "life lost after run end");
    state.lives = state.lives.saturating_sub(1);
    if state.lives == 0 {
        end_run(state);
    }
}

fn end_run(state: &mut GameState) {
    // A window still open at the end of the run pays out before the final
    // score is reported
    if state.combo.count > 0 {
        close_combo(state);
    }
    state.timers.clear();
    state.phase = GamePhase::GameOver;
    log::info!(
        "run ended at wave {} with score {}",
        state.wave_index,
        state.score
    );
    state.push_event(GameEvent::RunEnded {
        score: state.score,
        wave: state.wave_index,
    });
}

/// Two berry halves diverging sideways, plus a few juice drops
fn spawn_debris(state: &mut GameState, at: Vec2, rotation: f32, skin_slot: u8) {
    for dir in [-1.0f32, 1.0] {
        let vx = dir * state.rng.random_range(60.0..140.0);
        let vy = state.rng.random_range(80.0..160.0);
        state.debris.push(Debris {
            pos: at + Vec2::new(dir * 12.0, 0.0),
            vel: Vec2::new(vx, vy),
            rotation: rotation + dir * 0.25,
            rotation_speed: dir * state.rng.random_range(1.0..4.0),
            skin_slot,
            life: 1.0,
        });
    }
    for _ in 0..4 {
        let vx = state.rng.random_range(-80.0..80.0);
        let vy = state.rng.random_range(40.0..120.0);
        state.debris.push(Debris {
            pos: at,
            vel: Vec2::new(vx, vy),
            rotation: 0.0,
            rotation_speed: 0.0,
            skin_slot,
            life: 0.8,
        });
    }
}

fn decay_debris(state: &mut GameState, dt: f32) {
    for d in state.debris.iter_mut() {
        d.pos += d.vel * dt;
        d.vel.y += GRAVITY * 0.5 * dt;
        d.rotation += d.rotation_speed * dt;
        d.life -= dt / DEBRIS_LIFETIME;
    }
    state.debris.retain(|d| d.life > 0.0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::spawn::WaveSpec;
    use crate::sim::state::Projectile;

    /// A run with the wave schedule disarmed, for tests that need a field
    /// free of background spawns
    fn quiet(seed: u64) -> GameState {
        let mut state = GameState::new(seed);
        state.timers.clear();
        state
    }

    fn sample(x: f32, y: f32, t: f64) -> PointerSample {
        PointerSample {
            pos: Vec2::new(x, y),
            time_ms: t,
        }
    }

    fn swipe(from: (f32, f32), to: (f32, f32)) -> TickInput {
        TickInput {
            samples: vec![sample(from.0, from.1, 0.0), sample(to.0, to.1, 8.0)],
            ..Default::default()
        }
    }

    /// A motionless projectile the tests fully control
    fn place(state: &mut GameState, kind: ProjectileKind, x: f32, y: f32) -> u32 {
        let id = state.next_entity_id();
        let radius = match kind {
            ProjectileKind::Target { .. } => TARGET_RADIUS,
            ProjectileKind::Hazard => HAZARD_RADIUS,
        };
        state.projectiles.push(Projectile {
            id,
            kind,
            pos: Vec2::new(x, y),
            vel: Vec2::ZERO,
            gravity: 0.0,
            radius,
            rotation: 0.0,
            rotation_speed: 0.0,
            resolved: false,
            spawn_tick: state.time_ticks,
        });
        id
    }

    fn place_target(state: &mut GameState, x: f32, y: f32) -> u32 {
        place(state, ProjectileKind::Target { skin_slot: 0 }, x, y)
    }

    fn idle_ticks(state: &mut GameState, n: u64) {
        let input = TickInput::default();
        for _ in 0..n {
            tick(state, &input, SIM_DT);
        }
    }

    #[test]
    fn test_slice_scores_and_prunes() {
        let mut state = GameState::new(1);
        let id = place_target(&mut state, 100.0, 100.0);

        tick(&mut state, &swipe((50.0, 100.0), (150.0, 100.0)), SIM_DT);

        assert_eq!(state.score, BASE_POINTS);
        assert_eq!(state.combo.count, 1);
        assert!(state.projectiles.iter().all(|p| p.id != id));
        assert!(!state.debris.is_empty());
        assert!(state
            .events()
            .iter()
            .any(|e| matches!(e, GameEvent::TargetSliced { id: hit, combo: 1, .. } if *hit == id)));
    }

    #[test]
    fn test_slice_tests_preadvance_positions() {
        let mut state = GameState::new(1);
        let id = place_target(&mut state, 100.0, 200.0);
        // Fast enough to cross the blade line during this tick's advance
        state.projectiles[0].vel = Vec2::new(0.0, -12_000.0);

        tick(&mut state, &swipe((50.0, 100.0), (150.0, 100.0)), SIM_DT);

        // Pre-advance distance was 100 > radius, so no slice this tick
        assert_eq!(state.score, 0);
        assert!(state.projectiles.iter().any(|p| p.id == id));
    }

    #[test]
    fn test_multi_hit_single_segment() {
        let mut state = GameState::new(1);
        place_target(&mut state, 100.0, 100.0);
        place_target(&mut state, 150.0, 100.0);
        place_target(&mut state, 200.0, 100.0);

        tick(&mut state, &swipe((50.0, 100.0), (250.0, 100.0)), SIM_DT);

        assert_eq!(state.score, 3 * BASE_POINTS);
        assert_eq!(state.combo.count, 3);
        assert!(state.projectiles.is_empty());
    }

    #[test]
    fn test_combo_bonus_awarded_once_on_window_close() {
        let mut state = quiet(1);
        place_target(&mut state, 100.0, 100.0);
        place_target(&mut state, 150.0, 100.0);
        place_target(&mut state, 200.0, 100.0);

        tick(&mut state, &swipe((50.0, 100.0), (250.0, 100.0)), SIM_DT);
        assert_eq!(state.score, 3 * BASE_POINTS);

        // Nothing more is awarded until the idle window elapses
        idle_ticks(&mut state, COMBO_IDLE_TICKS + 1);
        assert_eq!(state.score, 3 * BASE_POINTS + 3 * COMBO_BONUS_PER_HIT);
        assert_eq!(state.combo.count, 0);

        // The bonus does not repeat
        idle_ticks(&mut state, COMBO_IDLE_TICKS);
        assert_eq!(state.score, 3 * BASE_POINTS + 3 * COMBO_BONUS_PER_HIT);
    }

    #[test]
    fn test_combo_extension_defers_expiry() {
        let mut state = quiet(1);
        place_target(&mut state, 100.0, 100.0);
        tick(&mut state, &swipe((50.0, 100.0), (150.0, 100.0)), SIM_DT);

        // Second slice halfway through the window extends it
        idle_ticks(&mut state, COMBO_IDLE_TICKS / 2);
        place_target(&mut state, 100.0, 100.0);
        tick(&mut state, &swipe((50.0, 100.0), (150.0, 100.0)), SIM_DT);
        assert_eq!(state.combo.count, 2);

        // The first window's expiry tick passes without closing anything
        idle_ticks(&mut state, COMBO_IDLE_TICKS / 2);
        assert_eq!(state.combo.count, 2);

        idle_ticks(&mut state, COMBO_IDLE_TICKS);
        assert_eq!(state.combo.count, 0);
        assert_eq!(state.score, 2 * BASE_POINTS + 2 * COMBO_BONUS_PER_HIT);
    }

    #[test]
    fn test_hazard_costs_life_and_cancels_combo() {
        let mut state = quiet(1);
        place_target(&mut state, 100.0, 100.0);
        tick(&mut state, &swipe((50.0, 100.0), (150.0, 100.0)), SIM_DT);
        assert_eq!(state.combo.count, 1);

        let id = place(&mut state, ProjectileKind::Hazard, 400.0, 100.0);
        tick(&mut state, &swipe((350.0, 100.0), (450.0, 100.0)), SIM_DT);

        assert_eq!(state.lives, STARTING_LIVES - 1);
        assert_eq!(state.combo.count, 0);
        assert!(state.shake > 0.0);
        assert!(state
            .events()
            .iter()
            .any(|e| matches!(e, GameEvent::HazardStruck { id: hit, .. } if *hit == id)));

        // The canceled window never pays out
        idle_ticks(&mut state, COMBO_IDLE_TICKS + 1);
        assert_eq!(state.score, BASE_POINTS);
    }

    #[test]
    fn test_missed_target_costs_life() {
        let mut state = GameState::new(1);
        let below = PLAYFIELD_HEIGHT + OFFSCREEN_MARGIN + TARGET_RADIUS + 10.0;
        let id = place_target(&mut state, 100.0, below);
        state.projectiles[0].vel = Vec2::new(0.0, 10.0);

        tick(&mut state, &TickInput::default(), SIM_DT);

        assert_eq!(state.lives, STARTING_LIVES - 1);
        assert!(state.projectiles.is_empty());
        assert!(state
            .events()
            .iter()
            .any(|e| matches!(e, GameEvent::TargetMissed { id: missed } if *missed == id)));
    }

    #[test]
    fn test_fallen_hazard_is_free() {
        let mut state = GameState::new(1);
        let below = PLAYFIELD_HEIGHT + OFFSCREEN_MARGIN + HAZARD_RADIUS + 10.0;
        place(&mut state, ProjectileKind::Hazard, 100.0, below);
        state.projectiles[0].vel = Vec2::new(0.0, 10.0);

        tick(&mut state, &TickInput::default(), SIM_DT);

        assert_eq!(state.lives, STARTING_LIVES);
        assert!(state.projectiles.is_empty());
    }

    #[test]
    fn test_game_over_freezes_state() {
        let mut state = GameState::new(1);
        state.lives = 1;
        let below = PLAYFIELD_HEIGHT + OFFSCREEN_MARGIN + TARGET_RADIUS + 10.0;
        place_target(&mut state, 100.0, below);
        state.projectiles[0].vel = Vec2::new(0.0, 10.0);

        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.lives, 0);
        assert!(state.timers.is_empty());
        let final_score = state.score;
        assert!(state
            .events()
            .iter()
            .any(|e| matches!(e, GameEvent::RunEnded { .. })));

        // Frozen: slicing after the run ends changes nothing
        place_target(&mut state, 100.0, 100.0);
        tick(&mut state, &swipe((50.0, 100.0), (150.0, 100.0)), SIM_DT);
        assert_eq!(state.score, final_score);
        assert_eq!(state.phase, GamePhase::GameOver);
    }

    #[test]
    fn test_restart_builds_fresh_run() {
        let mut state = GameState::new(1);
        state.lives = 1;
        let id = place(&mut state, ProjectileKind::Hazard, 100.0, 100.0);
        tick(&mut state, &swipe((50.0, 100.0), (150.0, 100.0)), SIM_DT);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(state.projectiles.iter().all(|p| p.id != id));

        let input = TickInput {
            restart: true,
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);

        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.score, 0);
        assert_eq!(state.lives, STARTING_LIVES);
        assert!(state.projectiles.is_empty());
        assert!(state.trail.is_empty());
        assert!(state.debris.is_empty());
    }

    #[test]
    fn test_end_stroke_clears_trail_after_slicing() {
        let mut state = GameState::new(1);
        let id = place_target(&mut state, 100.0, 100.0);
        let input = TickInput {
            samples: vec![sample(50.0, 100.0, 0.0), sample(150.0, 100.0, 8.0)],
            end_stroke: true,
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);

        // Samples delivered with the release still slice
        assert!(state.projectiles.iter().all(|p| p.id != id));
        assert!(state.trail.is_empty());
    }

    #[test]
    fn test_wave_spawns_on_schedule() {
        let mut state = GameState::new(1);
        let first_spawn = 1 + WaveSpec::for_wave(0).spawn_interval_ticks;
        idle_ticks(&mut state, first_spawn - 1);
        assert!(state.projectiles.is_empty());

        idle_ticks(&mut state, 1);
        assert!(!state.projectiles.is_empty());
        assert!(state.projectiles.iter().any(|p| p.is_target()));
    }

    #[test]
    fn test_wave_progression() {
        let mut state = GameState::new(1);
        // Enough slack that unsliced berries never end the run
        state.lives = 200;

        let spec = WaveSpec::for_wave(0);
        let last_spawn = 1 + u64::from(spec.count) * spec.spawn_interval_ticks;
        idle_ticks(&mut state, last_spawn + spec.post_delay_ticks + 2);

        assert_eq!(state.wave_index, 1);
        assert_eq!(state.spawner.spec, WaveSpec::for_wave(1));
    }

    #[test]
    fn test_end_to_end_run() {
        let mut state = quiet(1);

        // Bomb first: a life gone, no combo
        place(&mut state, ProjectileKind::Hazard, 400.0, 100.0);
        tick(&mut state, &swipe((350.0, 100.0), (450.0, 100.0)), SIM_DT);
        assert_eq!(state.lives, 2);
        assert_eq!(state.combo.count, 0);

        // Three berries inside one window
        place_target(&mut state, 100.0, 100.0);
        place_target(&mut state, 150.0, 100.0);
        place_target(&mut state, 200.0, 100.0);
        tick(&mut state, &swipe((50.0, 100.0), (250.0, 100.0)), SIM_DT);
        assert_eq!(state.score, 30);

        // Window closes: combo bonus lands
        idle_ticks(&mut state, COMBO_IDLE_TICKS + 1);
        assert_eq!(state.score, 30 + 3 * COMBO_BONUS_PER_HIT);

        // A berry slips through
        let below = PLAYFIELD_HEIGHT + OFFSCREEN_MARGIN + TARGET_RADIUS + 10.0;
        place_target(&mut state, 100.0, below);
        state.projectiles.last_mut().unwrap().vel = Vec2::new(0.0, 10.0);
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.lives, 1);

        // Second bomb ends the run
        place(&mut state, ProjectileKind::Hazard, 400.0, 100.0);
        tick(&mut state, &swipe((350.0, 100.0), (450.0, 100.0)), SIM_DT);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.lives, 0);

        let final_score = 30 + 3 * COMBO_BONUS_PER_HIT;
        let mut drained = state.drain_events();
        drained.retain(|e| matches!(e, GameEvent::RunEnded { .. }));
        assert_eq!(
            drained,
            vec![GameEvent::RunEnded {
                score: final_score,
                wave: 0
            }]
        );
    }
}
