//! Brawl Arena - a 2D physics-driven fighting game
//!
//! Core modules:
//! - `sim`: Simulation core (physics, combat, AI, match flow)
//! - `tuning`: Data-driven game balance
//! - `settings`: Player preferences and config loading

pub mod settings;
pub mod sim;
pub mod tuning;

#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use settings::{QualityPreset, Settings};
pub use tuning::{AiTuning, CombatTuning, KnockoutRule, PhysicsTuning, Tuning};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Nominal display-synchronized step used by headless drivers and tests
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Largest step the simulation will integrate (30 fps floor)
    pub const MAX_FRAME_DT: f32 = 1.0 / 30.0;

    /// Arena dimensions (screen space, y grows downward)
    pub const ARENA_WIDTH: f32 = 800.0;
    pub const ARENA_HEIGHT: f32 = 600.0;
    /// Projectiles are culled once this far outside the arena
    pub const PROJECTILE_MARGIN: f32 = 50.0;

    /// Spawn positions (top-left corner x) for the two slots
    pub const SPAWN_LEFT_X: f32 = 200.0;
    pub const SPAWN_RIGHT_X: f32 = 600.0;
    pub const SPAWN_Y: f32 = 300.0;

    /// Hard cap on live particles regardless of quality preset
    pub const MAX_PARTICLES: usize = 2000;
    /// Bolt projectile defaults
    pub const BOLT_SPEED: f32 = 450.0;
    pub const BOLT_SIZE: f32 = 8.0;
    pub const BOLT_LIFETIME: f32 = 3.0;
}

/// Normalize `v`, or return `fallback` when `v` has no usable length
#[inline]
pub fn unit_or(v: Vec2, fallback: Vec2) -> Vec2 {
    let len = v.length();
    if len > f32::EPSILON && len.is_finite() {
        v / len
    } else {
        fallback
    }
}

/// +1.0 when `to` lies to the right of `from` (or directly on it), -1.0 otherwise
#[inline]
pub fn horizontal_sign(from: Vec2, to: Vec2) -> f32 {
    if to.x >= from.x { 1.0 } else { -1.0 }
}

/// Converts display timestamps (ms) into clamped simulation steps.
///
/// The first call only latches the timestamp and yields a zero step.
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last_ms: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self { last_ms: None }
    }

    /// Advance to `now_ms`, returning the step in seconds
    pub fn advance(&mut self, now_ms: f64) -> f32 {
        let dt = match self.last_ms {
            Some(last) => ((now_ms - last) / 1000.0) as f32,
            None => 0.0,
        };
        self.last_ms = Some(now_ms);
        dt.clamp(0.0, consts::MAX_FRAME_DT)
    }

    /// Forget the last timestamp (after a pause or tab switch)
    pub fn reset(&mut self) {
        self.last_ms = None;
    }
}
