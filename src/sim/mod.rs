//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied timestep, clamped before use
//! - Seeded RNG only (stored in the state)
//! - Fixed slot order for every per-fighter pass
//! - No rendering or platform dependencies

pub mod ai;
pub mod catalog;
pub mod combat;
pub mod physics;
pub mod rect;
pub mod state;
pub mod tick;

pub use catalog::{AbilityKind, AbilityOutcome, CharacterKind};
pub use combat::{Controls, HitCheck};
pub use rect::Rect;
pub use state::{
    Ability, Arena, Character, Controller, Facing, GameEvent, GamePhase, GameState, MatchOutcome,
    Particle, Platform, Projectile, Slot, Weapon,
};
pub use tick::{TickInput, tick};
