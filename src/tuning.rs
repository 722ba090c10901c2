//! Data-driven game balance
//!
//! Every gameplay constant lives here so matches can be re-tuned from a JSON
//! settings file without touching the simulation code. Missing fields fall
//! back to the defaults below.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// How a simultaneous double knockout is scored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum KnockoutRule {
    /// Both fighters down in the same step is a draw
    #[default]
    Draw,
    /// Slot 0's death is checked first, so slot 1 takes the win
    FirstSlotLoses,
}

/// Integration and collision constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsTuning {
    /// Downward acceleration (units/s²)
    pub gravity: f32,
    /// Per-step angular velocity decay
    pub friction: f32,
    /// Per-step linear velocity damping for characters
    pub air_resistance: f32,
    /// Impacts slower than this come to rest instead of bouncing
    pub bounce_threshold: f32,
    /// Fraction of velocity reflected by a bounce
    pub bounce_factor: f32,
    pub projectile_gravity_scale: f32,
    pub particle_gravity_scale: f32,
    /// Per-step linear velocity damping for particles
    pub particle_damping: f32,
    /// Share of relative velocity exchanged on body contact
    pub collision_impulse: f32,
    /// Max angular kick (rad/s) on body contact
    pub collision_wobble: f32,
    /// Distance from body centre to the weapon grip
    pub weapon_offset: f32,
}

impl Default for PhysicsTuning {
    fn default() -> Self {
        Self {
            gravity: 800.0,
            friction: 0.85,
            air_resistance: 0.98,
            bounce_threshold: 50.0,
            bounce_factor: 0.3,
            projectile_gravity_scale: 0.5,
            particle_gravity_scale: 0.3,
            particle_damping: 0.99,
            collision_impulse: 0.3,
            collision_wobble: 10.0,
            weapon_offset: 30.0,
        }
    }
}

/// Combat rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatTuning {
    /// Horizontal force while a direction is held (scaled by dt)
    pub move_force: f32,
    /// Upward impulse applied on a grounded jump
    pub jump_impulse: f32,
    /// Damage of an unarmed basic attack
    pub base_damage: f32,
    /// Share of weapon damage added to the base damage
    pub weapon_damage_scale: f32,
    /// Centre-to-centre distance within which a swing connects
    pub attack_range: f32,
    /// Lunge is 10% of this along the attack direction
    pub attack_force: f32,
    /// Seconds between basic attacks
    pub attack_cooldown: f32,
    /// Seconds of ignored input after being hit
    pub hit_stun: f32,
    /// Knockback impulse (x is flipped to point away from the attacker)
    pub knockback: Vec2,
    /// Power at or above which basic attacks deal bonus damage
    pub high_power_threshold: f32,
    pub high_power_multiplier: f32,
    /// Power regained per second
    pub power_regen: f32,
    /// Max seconds between hits for a combo to continue
    pub combo_window: f32,
    /// Ceiling for weapon damage buffs, as a multiple of the base weapon damage
    pub max_weapon_buff: f32,
    /// Max angular kick (rad/s) from a weapon swing
    pub swing_wobble: f32,
}

impl Default for CombatTuning {
    fn default() -> Self {
        Self {
            move_force: 300.0,
            jump_impulse: 400.0,
            base_damage: 8.0,
            weapon_damage_scale: 0.2,
            attack_range: 80.0,
            attack_force: 200.0,
            attack_cooldown: 0.5,
            hit_stun: 0.33,
            knockback: Vec2::new(250.0, -120.0),
            high_power_threshold: 80.0,
            high_power_multiplier: 1.5,
            power_regen: 10.0,
            combo_window: 1.0,
            max_weapon_buff: 3.0,
            swing_wobble: 10.0,
        }
    }
}

/// Reflex probabilities for computer-controlled fighters (per step)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiTuning {
    /// Walk toward the opponent while farther than this
    pub engage_distance: f32,
    pub attack_chance: f64,
    pub jump_chance: f64,
    pub block_chance: f64,
    pub special_chance: f64,
}

impl Default for AiTuning {
    fn default() -> Self {
        Self {
            engage_distance: 100.0,
            attack_chance: 0.1,
            jump_chance: 0.005,
            block_chance: 0.35,
            special_chance: 0.01,
        }
    }
}

/// Complete balance sheet for a match
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub physics: PhysicsTuning,
    pub combat: CombatTuning,
    pub ai: AiTuning,
    pub knockout: KnockoutRule,
}
