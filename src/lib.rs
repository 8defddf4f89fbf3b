//! Berry Ninja - a fruit-slicing arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (motion, slicing, game state)
//! - `session`: Host-agnostic run driver (fixed timestep, input buffering)
//! - `render`: Presentation-agnostic per-tick draw list
//! - `persistence`: Injected profile store (LocalStorage on web)
//! - `skins`: Cosmetic catalog with load-time validation

pub mod persistence;
pub mod profile;
pub mod render;
pub mod session;
pub mod settings;
pub mod sim;
pub mod skins;

pub use profile::Profile;
pub use session::GameSession;
pub use settings::{BladeMode, Settings};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz for smooth slicing)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Playfield dimensions in logical pixels; y grows downward
    pub const PLAYFIELD_WIDTH: f32 = 1280.0;
    pub const PLAYFIELD_HEIGHT: f32 = 720.0;
    /// Horizontal band at each edge kept clear of spawns
    pub const SPAWN_MARGIN_X: f32 = 100.0;
    /// How far below the bottom edge a projectile may fall before it expires
    pub const OFFSCREEN_MARGIN: f32 = 60.0;

    /// Projectile radii
    pub const TARGET_RADIUS: f32 = 30.0;
    pub const HAZARD_RADIUS: f32 = 32.0;

    /// Downward acceleration (pixels/s^2)
    pub const GRAVITY: f32 = 1200.0;
    /// Upward launch speed range (pixels/s)
    pub const LAUNCH_SPEED_MIN: f32 = 950.0;
    pub const LAUNCH_SPEED_MAX: f32 = 1300.0;
    /// Maximum horizontal drift at launch (pixels/s)
    pub const DRIFT_SPEED: f32 = 120.0;
    /// Maximum spin magnitude at launch (radians/s)
    pub const SPIN_SPEED: f32 = 3.0;

    /// Points per sliced target
    pub const BASE_POINTS: u64 = 10;
    /// Bonus per slice in a closed combo window
    pub const COMBO_BONUS_PER_HIT: u64 = 5;
    /// Combo idle window (2 seconds at 120 Hz)
    pub const COMBO_IDLE_TICKS: u64 = 240;

    pub const STARTING_LIVES: u8 = 3;

    /// Trail buffer capacity
    pub const TRAIL_CAPACITY: usize = 20;

    /// Seconds a debris piece survives before fading out
    pub const DEBRIS_LIFETIME: f32 = 0.6;
}
