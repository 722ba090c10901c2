//! Reflex AI for computer-controlled fighters
//!
//! Memoryless: every step the policy looks at both fighters and rolls a few
//! dice. The RNG is passed in so matches replay identically from a seed.

use rand::Rng;

use super::combat::{self, Controls};
use super::state::Character;
use crate::tuning::Tuning;

#[inline]
fn roll<R: Rng>(rng: &mut R, chance: f64) -> bool {
    rng.random_bool(chance.clamp(0.0, 1.0))
}

/// Whether the first ability is affordable and off cooldown
fn special_ready(me: &Character) -> bool {
    me.special_cooldown <= 0.0
        && me
            .abilities
            .first()
            .is_some_and(|ability| me.power >= ability.power_cost)
}

/// Opponent is swinging, or has a swing latched for this step
fn under_attack(opponent: &Character, intent: Option<&Controls>) -> bool {
    opponent.attacking
        || intent.is_some_and(|c| c.attack && !c.down && opponent.can_act())
}

/// Produce this step's controls for `me`.
///
/// `opponent_intent` is the opponent's latched input when it is known
/// before anything is applied (a human slot); AI opponents pass `None`.
pub fn think<R: Rng>(
    me: &Character,
    opponent: &Character,
    opponent_intent: Option<&Controls>,
    tuning: &Tuning,
    rng: &mut R,
) -> Controls {
    let ai = &tuning.ai;
    let mut controls = Controls::default();
    if !me.can_act() || !opponent.is_alive() {
        return controls;
    }

    let dx = opponent.center().x - me.center().x;
    let distance = me.center().distance(opponent.center());

    if dx.abs() > ai.engage_distance {
        if dx > 0.0 {
            controls.right = true;
        } else {
            controls.left = true;
        }
    }

    // Swing toward the opponent rather than along stale facing
    controls.pointer = Some(opponent.center());

    let threatened = distance < combat::reach(opponent, me, &tuning.combat);
    if threatened && under_attack(opponent, opponent_intent) && roll(rng, ai.block_chance) {
        controls.down = true;
        return controls;
    }

    let in_reach = distance < combat::reach(me, opponent, &tuning.combat);
    if in_reach && me.attack_cooldown <= 0.0 && roll(rng, ai.attack_chance) {
        controls.attack = true;
    }

    if me.is_grounded && roll(rng, ai.jump_chance) {
        controls.up = true;
    }

    if special_ready(me) && roll(rng, ai.special_chance) {
        controls.special = true;
    }

    controls
}
