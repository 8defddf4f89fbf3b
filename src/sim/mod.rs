//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod motion;
pub mod schedule;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod trail;

pub use collision::{resolve, segment_hits_circle};
pub use schedule::{TimerAction, TimerQueue};
pub use spawn::{Spawner, WaveSpec};
pub use state::{
    ComboState, Debris, GameEvent, GamePhase, GameState, Projectile, ProjectileKind,
};
pub use tick::{PointerSample, TickInput, tick};
pub use trail::{Trail, TrailPoint};
