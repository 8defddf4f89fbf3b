//! Per-tick draw list
//!
//! The core never draws. Once per frame it flattens the game state into a
//! `RenderFrame` and hands it to whatever presentation layer the host
//! embeds (canvas, WebGPU, a test harness printing text).

use glam::Vec2;

use crate::sim::{GamePhase, GameState, ProjectileKind};

/// One sprite to draw
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpritePose {
    pub pos: Vec2,
    pub rotation: f32,
    pub radius: f32,
    /// `Some(slot)` for a berry, `None` for a bomb
    pub skin_slot: Option<u8>,
}

/// A fading slice leftover
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DebrisSprite {
    pub pos: Vec2,
    pub rotation: f32,
    pub skin_slot: u8,
    /// 0..=1 opacity
    pub alpha: f32,
}

/// Everything the presentation layer needs for one frame
#[derive(Debug, Clone)]
pub struct RenderFrame {
    pub projectiles: Vec<SpritePose>,
    pub debris: Vec<DebrisSprite>,
    /// Blade polyline, newest point first
    pub trail: Vec<Vec2>,
    pub score: u64,
    pub lives: u8,
    /// Current combo count (only worth showing at 2+)
    pub combo: u32,
    /// 1-based wave number for display
    pub wave: u32,
    /// Camera shake intensity 0..=1
    pub shake: f32,
    pub game_over: bool,
}

impl RenderFrame {
    pub fn build(state: &GameState) -> Self {
        let projectiles = state
            .projectiles
            .iter()
            .map(|p| SpritePose {
                pos: p.pos,
                rotation: p.rotation,
                radius: p.radius,
                skin_slot: match p.kind {
                    ProjectileKind::Target { skin_slot } => Some(skin_slot),
                    ProjectileKind::Hazard => None,
                },
            })
            .collect();

        let debris = state
            .debris
            .iter()
            .map(|d| DebrisSprite {
                pos: d.pos,
                rotation: d.rotation,
                skin_slot: d.skin_slot,
                alpha: d.life.clamp(0.0, 1.0),
            })
            .collect();

        Self {
            projectiles,
            debris,
            trail: state.trail.points().iter().map(|p| p.pos).collect(),
            score: state.score,
            lives: state.lives,
            combo: state.combo.count,
            wave: state.wave_index + 1,
            shake: state.shake,
            game_over: state.phase == GamePhase::GameOver,
        }
    }
}
