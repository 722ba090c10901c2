//! Playable characters, their weapons and special abilities
//!
//! Factories return fully initialised fighters. Abilities are plain data
//! (`AbilityKind`) executed by [`apply_ability`]; cooldown and power gating
//! is the caller's job.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{Ability, Character, Facing, Weapon};
use crate::horizontal_sign;

/// Playable archetypes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CharacterKind {
    /// Balanced all-rounder
    Hero,
    /// Glass cannon with a ranged special
    DarkMage,
    /// Tanky bruiser
    Brute,
    /// Fast caster with a close-range burst
    Caster,
}

impl CharacterKind {
    pub const ALL: [CharacterKind; 4] = [
        CharacterKind::Hero,
        CharacterKind::DarkMage,
        CharacterKind::Brute,
        CharacterKind::Caster,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            CharacterKind::Hero => "hero",
            CharacterKind::DarkMage => "dark-mage",
            CharacterKind::Brute => "brute",
            CharacterKind::Caster => "caster",
        }
    }

    pub fn from_id(s: &str) -> Option<Self> {
        CharacterKind::ALL.into_iter().find(|k| k.id() == s)
    }
}

/// Special ability behaviours
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AbilityKind {
    /// Restore health and multiply weapon damage
    Heal { amount: f32, weapon_multiplier: f32 },
    /// Hit the target wherever it is, shoving it away and up
    RangedKnockback { damage: f32, knockback: f32, lift: f32 },
    /// Surge forward and upward, sharpening the weapon
    SelfBuff {
        speed_multiplier: f32,
        lift: f32,
        weapon_bonus: f32,
    },
    /// Damage and shove the target only if it is close enough
    ProximityAoe {
        radius: f32,
        damage: f32,
        knockback: f32,
    },
}

impl AbilityKind {
    /// Whether the effect does anything without a target
    pub fn needs_target(&self) -> bool {
        matches!(
            self,
            AbilityKind::RangedKnockback { .. } | AbilityKind::ProximityAoe { .. }
        )
    }
}

/// What an ability invocation actually did
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AbilityOutcome {
    pub damage: f32,
    pub healed: f32,
    /// The target was in range and affected
    pub hit_target: bool,
}

/// Run an ability's effect.
///
/// Targeted effects do nothing when `target` is `None` or already down.
/// Weapon buffs never push damage past `max_weapon_buff` times its base.
pub fn apply_ability(
    kind: &AbilityKind,
    caster: &mut Character,
    target: Option<&mut Character>,
    max_weapon_buff: f32,
) -> AbilityOutcome {
    let mut outcome = AbilityOutcome::default();
    let target = target.filter(|t| t.is_alive());

    match *kind {
        AbilityKind::Heal {
            amount,
            weapon_multiplier,
        } => {
            outcome.healed = caster.heal(amount);
            if let Some(weapon) = caster.weapon.as_mut() {
                let buffed = weapon.damage * weapon_multiplier;
                buff_weapon(weapon, buffed, max_weapon_buff);
            }
        }
        AbilityKind::RangedKnockback {
            damage,
            knockback,
            lift,
        } => {
            if let Some(target) = target {
                let dir = horizontal_sign(caster.position, target.position);
                outcome.damage = target.take_damage(damage);
                target.velocity.x += dir * knockback;
                target.velocity.y -= lift;
                outcome.hit_target = true;
            }
        }
        AbilityKind::SelfBuff {
            speed_multiplier,
            lift,
            weapon_bonus,
        } => {
            caster.velocity.x *= speed_multiplier;
            caster.velocity.y -= lift;
            if let Some(weapon) = caster.weapon.as_mut() {
                let buffed = weapon.damage + weapon_bonus;
                buff_weapon(weapon, buffed, max_weapon_buff);
            }
        }
        AbilityKind::ProximityAoe {
            radius,
            damage,
            knockback,
        } => {
            if let Some(target) = target {
                if caster.position.distance(target.position) < radius {
                    let dir = horizontal_sign(caster.position, target.position);
                    outcome.damage = target.take_damage(damage);
                    target.velocity.x += dir * knockback;
                    outcome.hit_target = true;
                }
            }
        }
    }

    outcome
}

fn buff_weapon(weapon: &mut Weapon, new_damage: f32, max_weapon_buff: f32) {
    weapon.damage = new_damage.min(weapon.base_damage * max_weapon_buff);
}

/// Build a fighter of the given archetype at its default spawn
pub fn create(kind: CharacterKind) -> Character {
    match kind {
        CharacterKind::Hero => hero(),
        CharacterKind::DarkMage => dark_mage(),
        CharacterKind::Brute => brute(),
        CharacterKind::Caster => caster(),
    }
}

struct Stats {
    name: &'static str,
    color: u32,
    health: f32,
    max_power: f32,
    size: Vec2,
    spawn: Vec2,
}

fn fighter(kind: CharacterKind, stats: Stats, weapon: Weapon, ability: Ability) -> Character {
    Character {
        id: kind.id().to_string(),
        kind,
        name: stats.name.to_string(),
        color: stats.color,
        health: stats.health,
        max_health: stats.health,
        power: 0.0,
        max_power: stats.max_power,
        position: stats.spawn,
        velocity: Vec2::ZERO,
        rotation: 0.0,
        angular_velocity: 0.0,
        is_grounded: false,
        size: stats.size,
        facing: Facing::Right,
        attacking: false,
        blocking: false,
        attack_cooldown: 0.0,
        special_cooldown: 0.0,
        stunned: 0.0,
        combo: 0,
        last_hit_time: None,
        weapon: Some(weapon),
        abilities: vec![ability],
    }
}

fn weapon(id: &str, name: &str, damage: f32, reach: f32, weight: f32, color: u32) -> Weapon {
    Weapon {
        id: id.to_string(),
        name: name.to_string(),
        damage,
        base_damage: damage,
        reach,
        weight,
        color,
        position: Vec2::ZERO,
        rotation: 0.0,
    }
}

fn ability(id: &str, name: &str, kind: AbilityKind, power_cost: f32, cooldown_ms: u32) -> Ability {
    Ability {
        id: id.to_string(),
        name: name.to_string(),
        kind,
        power_cost,
        cooldown_ms,
        last_used_ms: None,
    }
}

pub fn hero() -> Character {
    fighter(
        CharacterKind::Hero,
        Stats {
            name: "Hero",
            color: 0xFFD700,
            health: 100.0,
            max_power: 100.0,
            size: Vec2::new(40.0, 60.0),
            spawn: Vec2::new(200.0, 300.0),
        },
        weapon("power-sword", "Power Sword", 25.0, 50.0, 15.0, 0xC0C0C0),
        ability(
            "ancient-power",
            "Ancient Power",
            AbilityKind::Heal {
                amount: 30.0,
                weapon_multiplier: 1.5,
            },
            50.0,
            5000,
        ),
    )
}

pub fn dark_mage() -> Character {
    fighter(
        CharacterKind::DarkMage,
        Stats {
            name: "Dark Mage",
            color: 0x8B0000,
            health: 100.0,
            max_power: 100.0,
            size: Vec2::new(40.0, 60.0),
            spawn: Vec2::new(600.0, 300.0),
        },
        weapon("havoc-staff", "Havoc Staff", 20.0, 60.0, 12.0, 0x4B0082),
        ability(
            "dark-bolt",
            "Dark Bolt",
            AbilityKind::RangedKnockback {
                damage: 35.0,
                knockback: 200.0,
                lift: 100.0,
            },
            40.0,
            4000,
        ),
    )
}

pub fn brute() -> Character {
    fighter(
        CharacterKind::Brute,
        Stats {
            name: "Brute",
            color: 0x8B4513,
            health: 120.0,
            max_power: 80.0,
            size: Vec2::new(45.0, 65.0),
            spawn: Vec2::new(600.0, 300.0),
        },
        weapon("claws", "Claws", 18.0, 30.0, 8.0, 0x8B4513),
        ability(
            "feral-charge",
            "Feral Charge",
            AbilityKind::SelfBuff {
                speed_multiplier: 1.5,
                lift: 150.0,
                weapon_bonus: 10.0,
            },
            30.0,
            6000,
        ),
    )
}

pub fn caster() -> Character {
    fighter(
        CharacterKind::Caster,
        Stats {
            name: "Caster",
            color: 0xFF6B35,
            health: 90.0,
            max_power: 120.0,
            size: Vec2::new(35.0, 55.0),
            spawn: Vec2::new(600.0, 300.0),
        },
        weapon("sorcery-staff", "Sorcery Staff", 15.0, 55.0, 10.0, 0xFFD700),
        ability(
            "arcane-blast",
            "Arcane Blast",
            AbilityKind::ProximityAoe {
                radius: 150.0,
                damage: 25.0,
                knockback: 150.0,
            },
            35.0,
            3000,
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roster_stat_blocks() {
        let brute = create(CharacterKind::Brute);
        assert_eq!(brute.max_health, 120.0);
        assert_eq!(brute.max_power, 80.0);
        assert_eq!(brute.power, 0.0);
        assert_eq!(brute.abilities.len(), 1);

        let caster = create(CharacterKind::Caster);
        assert_eq!(caster.health, 90.0);
        assert_eq!(caster.size, Vec2::new(35.0, 55.0));

        for kind in CharacterKind::ALL {
            let c = create(kind);
            assert_eq!(c.kind, kind);
            assert_eq!(CharacterKind::from_id(&c.id), Some(kind));
            assert!(c.weapon.is_some());
        }
    }

    #[test]
    fn test_heal_buffs_weapon_up_to_cap() {
        let mut hero = hero();
        hero.take_damage(50.0);
        let kind = hero.abilities[0].kind;

        let outcome = apply_ability(&kind, &mut hero, None, 3.0);
        assert_eq!(outcome.healed, 30.0);
        assert_eq!(hero.health, 80.0);
        assert_eq!(hero.weapon.as_ref().map(|w| w.damage), Some(37.5));

        for _ in 0..10 {
            apply_ability(&kind, &mut hero, None, 3.0);
        }
        assert_eq!(hero.health, 100.0);
        assert_eq!(hero.weapon.as_ref().map(|w| w.damage), Some(75.0));
    }

    #[test]
    fn test_targeted_abilities_noop_without_target() {
        let mut mage = dark_mage();
        let kind = mage.abilities[0].kind;
        let before = mage.clone();

        let outcome = apply_ability(&kind, &mut mage, None, 3.0);
        assert_eq!(outcome, AbilityOutcome::default());
        assert_eq!(mage.velocity, before.velocity);
        assert_eq!(mage.health, before.health);
    }

    #[test]
    fn test_ranged_knockback_pushes_away() {
        let mut mage = dark_mage();
        mage.position = Vec2::new(600.0, 300.0);
        let mut hero = hero();
        hero.position = Vec2::new(100.0, 300.0);
        let kind = mage.abilities[0].kind;

        let outcome = apply_ability(&kind, &mut mage, Some(&mut hero), 3.0);
        assert!(outcome.hit_target);
        assert_eq!(outcome.damage, 35.0);
        assert_eq!(hero.health, 65.0);
        assert_eq!(hero.velocity, Vec2::new(-200.0, -100.0));
    }

    #[test]
    fn test_proximity_aoe_respects_radius() {
        let mut caster = caster();
        caster.position = Vec2::new(300.0, 300.0);
        let mut far = brute();
        far.position = Vec2::new(500.0, 300.0);
        let kind = caster.abilities[0].kind;

        let outcome = apply_ability(&kind, &mut caster, Some(&mut far), 3.0);
        assert!(!outcome.hit_target);
        assert_eq!(far.health, 120.0);

        far.position = Vec2::new(400.0, 300.0);
        let outcome = apply_ability(&kind, &mut caster, Some(&mut far), 3.0);
        assert!(outcome.hit_target);
        assert_eq!(far.health, 95.0);
        assert_eq!(far.velocity.x, 150.0);
    }

    #[test]
    fn test_self_buff() {
        let mut brute = brute();
        brute.velocity = Vec2::new(100.0, 0.0);
        let kind = brute.abilities[0].kind;

        apply_ability(&kind, &mut brute, None, 3.0);
        assert_eq!(brute.velocity, Vec2::new(150.0, -150.0));
        assert_eq!(brute.weapon.as_ref().map(|w| w.damage), Some(28.0));
    }
}
