//! Combat rules: controls to forces, attacks, hits, blocks and specials
//!
//! Functions here work on one or two fighters and return what happened;
//! the tick turns those results into particles and events.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::catalog::{self, AbilityKind, AbilityOutcome};
use super::state::{Character, Facing};
use crate::tuning::CombatTuning;
use crate::{horizontal_sign, unit_or};

/// One fighter's controls for a single step (latched by the input layer)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Controls {
    pub left: bool,
    pub right: bool,
    /// Jump
    pub up: bool,
    /// Block
    pub down: bool,
    pub attack: bool,
    pub special: bool,
    /// Aim point in world space; attacks follow facing when absent
    pub pointer: Option<Vec2>,
}

/// What a fighter did with its controls this step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControlResult {
    pub jumped: bool,
    pub attacked: bool,
    /// Special requested and not suppressed (still subject to gating)
    pub wants_special: bool,
}

/// Result of checking a swing against the opponent
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HitCheck {
    Landed { damage: f32, knockback: Vec2 },
    Blocked,
}

/// A special that went off
#[derive(Debug, Clone, PartialEq)]
pub struct SpecialCast {
    pub name: String,
    pub kind: AbilityKind,
    pub outcome: AbilityOutcome,
}

/// Turn controls into movement, jumps, blocks and attack starts.
///
/// Timers and power regen always advance. Eliminated or stunned fighters
/// ignore their controls entirely.
pub fn apply_controls<R: Rng>(
    character: &mut Character,
    controls: &Controls,
    tuning: &CombatTuning,
    dt: f32,
    rng: &mut R,
) -> ControlResult {
    let mut result = ControlResult::default();
    character.attacking = false;
    character.tick_timers(dt);

    if !character.is_alive() {
        character.blocking = false;
        return result;
    }

    regen_power(character, tuning.power_regen, dt);

    if character.stunned > 0.0 {
        character.blocking = false;
        return result;
    }

    if controls.left {
        character.apply_force(Vec2::new(-tuning.move_force * dt, 0.0));
        character.facing = Facing::Left;
    }
    if controls.right {
        character.apply_force(Vec2::new(tuning.move_force * dt, 0.0));
        character.facing = Facing::Right;
    }

    if controls.up {
        result.jumped = try_jump(character, tuning.jump_impulse);
    }

    character.blocking = controls.down;

    if controls.attack && !character.blocking {
        result.attacked = try_attack(character, controls.pointer, tuning, rng);
    }

    result.wants_special = controls.special && !character.blocking;
    result
}

/// Jump only from the ground
pub fn try_jump(character: &mut Character, impulse: f32) -> bool {
    if !character.is_grounded {
        return false;
    }
    character.apply_force(Vec2::new(0.0, -impulse));
    character.is_grounded = false;
    true
}

/// Direction of a swing: toward the pointer if given, else along facing
pub fn attack_direction(character: &Character, pointer: Option<Vec2>) -> Vec2 {
    match pointer {
        Some(target) => unit_or(target - character.center(), Vec2::X),
        None => character.facing.unit(),
    }
}

/// Start a basic attack if it is off cooldown
pub fn try_attack<R: Rng>(
    character: &mut Character,
    pointer: Option<Vec2>,
    tuning: &CombatTuning,
    rng: &mut R,
) -> bool {
    if character.attack_cooldown > 0.0 {
        return false;
    }

    let dir = attack_direction(character, pointer);
    character.attacking = true;
    character.attack_cooldown = tuning.attack_cooldown;
    if dir.x < 0.0 {
        character.facing = Facing::Left;
    } else if dir.x > 0.0 {
        character.facing = Facing::Right;
    }

    // Lunge
    character.apply_impulse(dir * tuning.attack_force * 0.1);
    let wobble = tuning.swing_wobble;
    if wobble > 0.0 {
        character.angular_velocity += rng.random_range(-wobble..wobble);
    }
    true
}

/// Centre-to-centre distance within which `attacker` connects with `defender`
pub fn reach(attacker: &Character, defender: &Character, tuning: &CombatTuning) -> f32 {
    let weapon_reach = attacker
        .weapon
        .as_ref()
        .map(|w| w.reach + (attacker.size.x + defender.size.x) * 0.5)
        .unwrap_or(0.0);
    tuning.attack_range.max(weapon_reach)
}

/// Damage of one basic hit from `attacker`
pub fn hit_damage(attacker: &Character, tuning: &CombatTuning) -> f32 {
    let weapon = attacker
        .weapon
        .as_ref()
        .map(|w| w.damage * tuning.weapon_damage_scale)
        .unwrap_or(0.0);
    let damage = tuning.base_damage + weapon;
    if attacker.power >= tuning.high_power_threshold {
        damage * tuning.high_power_multiplier
    } else {
        damage
    }
}

/// Check whether `attacker`'s swing this step connects.
///
/// Returns `None` when there is no swing, no reach, or either side is down.
pub fn evaluate_hit(
    attacker: &Character,
    defender: &Character,
    tuning: &CombatTuning,
) -> Option<HitCheck> {
    if !attacker.attacking || !attacker.is_alive() || !defender.is_alive() {
        return None;
    }
    if attacker.center().distance(defender.center()) >= reach(attacker, defender, tuning) {
        return None;
    }
    if defender.blocking {
        return Some(HitCheck::Blocked);
    }

    let away = horizontal_sign(attacker.center(), defender.center());
    Some(HitCheck::Landed {
        damage: hit_damage(attacker, tuning),
        knockback: Vec2::new(tuning.knockback.x * away, tuning.knockback.y),
    })
}

/// Apply a landed hit. Returns the damage dealt and the attacker's combo.
pub fn apply_hit(
    attacker: &mut Character,
    defender: &mut Character,
    damage: f32,
    knockback: Vec2,
    now: f32,
    tuning: &CombatTuning,
) -> (f32, u32) {
    let dealt = defender.take_damage(damage);
    defender.apply_force(knockback);
    defender.stunned = tuning.hit_stun;
    defender.blocking = false;

    let combo = register_combo(attacker, now, tuning.combo_window);
    (dealt, combo)
}

/// Count a landed hit toward the attacker's combo
pub fn register_combo(attacker: &mut Character, now: f32, window: f32) -> u32 {
    attacker.combo = match attacker.last_hit_time {
        Some(last) if now - last <= window => attacker.combo + 1,
        _ => 1,
    };
    attacker.last_hit_time = Some(now);
    attacker.combo
}

/// Drop a combo once its window has passed
pub fn expire_combo(character: &mut Character, now: f32, window: f32) {
    if let Some(last) = character.last_hit_time {
        if now - last > window {
            character.combo = 0;
        }
    }
}

/// Linear power regen, clamped to the maximum
pub fn regen_power(character: &mut Character, rate: f32, dt: f32) {
    character.add_power(rate * dt);
}

/// Fire the first ability if it is off cooldown and affordable.
///
/// A rejected attempt leaves caster and target untouched.
pub fn try_special(
    caster: &mut Character,
    target: Option<&mut Character>,
    now: f32,
    max_weapon_buff: f32,
) -> Option<SpecialCast> {
    let ability = caster.abilities.first()?;
    if caster.special_cooldown > 0.0 || caster.power < ability.power_cost {
        return None;
    }

    let kind = ability.kind;
    let name = ability.name.clone();
    let cost = ability.power_cost;
    let cooldown = ability.cooldown_secs();

    caster.add_power(-cost);
    caster.special_cooldown = cooldown;
    if let Some(ability) = caster.abilities.first_mut() {
        ability.last_used_ms = Some((now.max(0.0) * 1000.0) as u64);
    }

    let outcome = catalog::apply_ability(&kind, caster, target, max_weapon_buff);
    Some(SpecialCast {
        name,
        kind,
        outcome,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::catalog::{brute, caster, dark_mage, hero};
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const DT: f32 = 1.0 / 60.0;

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(42)
    }

    fn facing_pair() -> (Character, Character) {
        let mut a = hero();
        let mut b = dark_mage();
        a.position = Vec2::new(300.0, 480.0);
        b.position = Vec2::new(350.0, 480.0);
        (a, b)
    }

    #[test]
    fn test_jump_requires_ground() {
        let tuning = CombatTuning::default();
        let mut c = hero();
        let jump = Controls {
            up: true,
            ..Default::default()
        };

        c.is_grounded = false;
        let result = apply_controls(&mut c, &jump, &tuning, DT, &mut rng());
        assert!(!result.jumped);
        assert_eq!(c.velocity.y, 0.0);

        c.is_grounded = true;
        let result = apply_controls(&mut c, &jump, &tuning, DT, &mut rng());
        assert!(result.jumped);
        assert_eq!(c.velocity.y, -400.0);

        // Still airborne: holding jump adds nothing
        let result = apply_controls(&mut c, &jump, &tuning, DT, &mut rng());
        assert!(!result.jumped);
        assert_eq!(c.velocity.y, -400.0);
    }

    #[test]
    fn test_movement_sets_facing() {
        let tuning = CombatTuning::default();
        let mut c = hero();
        let left = Controls {
            left: true,
            ..Default::default()
        };
        apply_controls(&mut c, &left, &tuning, DT, &mut rng());
        assert_eq!(c.facing, Facing::Left);
        assert!((c.velocity.x + 300.0 * DT).abs() < 1e-4);
    }

    #[test]
    fn test_attack_cooldown_gates() {
        let tuning = CombatTuning::default();
        let mut c = hero();
        let attack = Controls {
            attack: true,
            ..Default::default()
        };

        let result = apply_controls(&mut c, &attack, &tuning, DT, &mut rng());
        assert!(result.attacked);
        assert!(c.attacking);
        assert_eq!(c.attack_cooldown, 0.5);

        let result = apply_controls(&mut c, &attack, &tuning, DT, &mut rng());
        assert!(!result.attacked);
        assert!(!c.attacking);
    }

    #[test]
    fn test_attack_direction_defaults() {
        let mut c = hero();
        c.position = Vec2::new(100.0, 100.0);
        c.facing = Facing::Left;
        assert_eq!(attack_direction(&c, None), Vec2::new(-1.0, 0.0));
        // Pointer exactly on the body centre
        assert_eq!(attack_direction(&c, Some(c.center())), Vec2::X);
        let up = attack_direction(&c, Some(c.center() + Vec2::new(0.0, -50.0)));
        assert!((up - Vec2::new(0.0, -1.0)).length() < 1e-6);
    }

    #[test]
    fn test_stunned_ignores_input_but_regens() {
        let tuning = CombatTuning::default();
        let mut c = hero();
        c.stunned = 0.3;
        c.is_grounded = true;
        let everything = Controls {
            left: true,
            up: true,
            attack: true,
            special: true,
            ..Default::default()
        };

        let result = apply_controls(&mut c, &everything, &tuning, DT, &mut rng());
        assert_eq!(result, ControlResult::default());
        assert_eq!(c.velocity, Vec2::ZERO);
        assert!((c.power - 10.0 * DT).abs() < 1e-5);
    }

    #[test]
    fn test_blocking_negates_hit() {
        let tuning = CombatTuning::default();
        let (mut a, mut b) = facing_pair();
        let attack = Controls {
            attack: true,
            ..Default::default()
        };
        let block = Controls {
            down: true,
            ..Default::default()
        };

        apply_controls(&mut a, &attack, &tuning, DT, &mut rng());
        apply_controls(&mut b, &block, &tuning, DT, &mut rng());

        assert_eq!(evaluate_hit(&a, &b, &tuning), Some(HitCheck::Blocked));
        assert_eq!(b.health, 100.0);
        assert_eq!(b.velocity, Vec2::ZERO);
        assert_eq!(a.attack_cooldown, 0.5);
    }

    #[test]
    fn test_landed_hit_damages_and_stuns() {
        let mut tuning = CombatTuning::default();
        tuning.weapon_damage_scale = 0.0;
        let (mut a, mut b) = facing_pair();
        a.attacking = true;

        let Some(HitCheck::Landed { damage, knockback }) = evaluate_hit(&a, &b, &tuning) else {
            panic!("expected a landed hit");
        };
        assert_eq!(damage, 8.0);
        assert!(knockback.x > 0.0);

        let (dealt, combo) = apply_hit(&mut a, &mut b, damage, knockback, 1.0, &tuning);
        assert_eq!(dealt, 8.0);
        assert_eq!(combo, 1);
        assert_eq!(b.health, 92.0);
        assert_eq!(b.stunned, tuning.hit_stun);
        assert_eq!(b.velocity, knockback);
    }

    #[test]
    fn test_out_of_reach_misses() {
        let tuning = CombatTuning::default();
        let (mut a, mut b) = facing_pair();
        b.position.x = 600.0;
        a.attacking = true;
        assert_eq!(evaluate_hit(&a, &b, &tuning), None);
    }

    #[test]
    fn test_high_power_bonus() {
        let mut tuning = CombatTuning::default();
        tuning.weapon_damage_scale = 0.0;
        let mut a = hero();
        a.power = 79.0;
        assert_eq!(hit_damage(&a, &tuning), 8.0);
        a.power = 80.0;
        assert_eq!(hit_damage(&a, &tuning), 12.0);
    }

    #[test]
    fn test_weapon_adds_damage() {
        let tuning = CombatTuning::default();
        let a = hero();
        assert!((hit_damage(&a, &tuning) - 13.0).abs() < 1e-4);
    }

    #[test]
    fn test_combo_window() {
        let mut a = hero();
        assert_eq!(register_combo(&mut a, 0.0, 1.0), 1);
        assert_eq!(register_combo(&mut a, 0.6, 1.0), 2);
        assert_eq!(register_combo(&mut a, 1.2, 1.0), 3);
        assert_eq!(register_combo(&mut a, 2.5, 1.0), 1);

        expire_combo(&mut a, 3.0, 1.0);
        assert_eq!(a.combo, 1);
        expire_combo(&mut a, 3.6, 1.0);
        assert_eq!(a.combo, 0);
    }

    #[test]
    fn test_special_rejected_without_power() {
        let mut mage = dark_mage();
        let mut target = hero();
        mage.power = 39.0;

        let cast = try_special(&mut mage, Some(&mut target), 5.0, 3.0);
        assert!(cast.is_none());
        assert_eq!(mage.power, 39.0);
        assert_eq!(mage.abilities[0].last_used_ms, None);
        assert_eq!(target.health, 100.0);
        assert_eq!(target.velocity, Vec2::ZERO);
    }

    #[test]
    fn test_special_rejected_on_cooldown() {
        let mut c = caster();
        let mut target = brute();
        c.power = 120.0;
        c.special_cooldown = 0.1;
        target.position = c.position;

        assert!(try_special(&mut c, Some(&mut target), 5.0, 3.0).is_none());
        assert_eq!(c.power, 120.0);
        assert_eq!(target.health, 120.0);
    }

    #[test]
    fn test_special_spends_and_stamps() {
        let mut mage = dark_mage();
        let mut target = hero();
        mage.power = 60.0;

        let cast = try_special(&mut mage, Some(&mut target), 2.5, 3.0).unwrap();
        assert_eq!(cast.name, "Dark Bolt");
        assert!(cast.outcome.hit_target);
        assert_eq!(mage.power, 20.0);
        assert_eq!(mage.special_cooldown, 4.0);
        assert_eq!(mage.abilities[0].last_used_ms, Some(2500));
        assert_eq!(target.health, 65.0);
    }

    #[test]
    fn test_dead_fighter_ignores_controls() {
        let tuning = CombatTuning::default();
        let mut c = hero();
        c.take_damage(1000.0);
        let attack = Controls {
            attack: true,
            down: true,
            ..Default::default()
        };
        let result = apply_controls(&mut c, &attack, &tuning, DT, &mut rng());
        assert_eq!(result, ControlResult::default());
        assert!(!c.blocking);
        assert_eq!(c.power, 0.0);
    }

    proptest! {
        #[test]
        fn prop_health_stays_in_range(hits in proptest::collection::vec(-50.0f32..200.0, 0..40)) {
            let mut c = brute();
            for amount in hits {
                c.take_damage(amount);
                prop_assert!(c.health >= 0.0 && c.health <= c.max_health);
            }
        }

        #[test]
        fn prop_power_stays_in_range(
            steps in proptest::collection::vec((0.0f32..0.1, -60.0f32..60.0), 0..60)
        ) {
            let mut c = caster();
            for (dt, spend) in steps {
                regen_power(&mut c, 10.0, dt);
                c.add_power(spend);
                prop_assert!(c.power >= 0.0 && c.power <= c.max_power);
            }
        }

        #[test]
        fn prop_lethal_damage_zeroes_health(extra in 0.0f32..500.0) {
            let mut c = hero();
            c.take_damage(c.health + extra);
            prop_assert_eq!(c.health, 0.0);
        }
    }
}
