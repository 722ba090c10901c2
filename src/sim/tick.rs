//! Per-frame simulation step
//!
//! Order inside a playing step is fixed: controls, physics, hits, entity
//! aging, eliminations, win check.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::ai;
use super::catalog::AbilityKind;
use super::combat::{self, Controls, HitCheck};
use super::physics;
use super::state::{Controller, GameEvent, GamePhase, GameState, MatchOutcome, Slot, pair_mut};
use crate::consts::*;
use crate::tuning::KnockoutRule;

/// Parry spark colour
const BLOCK_COLOR: u32 = 0x87CEEB;
/// Blood-red hit spark colour
const HIT_COLOR: u32 = 0xFF0000;

/// Input for a single step, latched by the presentation layer
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TickInput {
    /// Per-slot controls (ignored for AI-controlled slots)
    pub controls: [Controls; 2],
    /// Pause toggle
    pub pause: bool,
}

/// Advance the match by `dt` seconds (clamped to `MAX_FRAME_DT`)
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if input.pause {
        state.toggle_pause();
    }

    // Only an active match simulates
    if state.phase != GamePhase::Playing {
        return;
    }

    let dt = if dt.is_finite() {
        dt.clamp(0.0, MAX_FRAME_DT)
    } else {
        0.0
    };
    state.game_time += dt;

    state.screen_shake *= 0.9;
    if state.screen_shake < 0.01 {
        state.screen_shake = 0.0;
    }

    let alive_before = [
        state.characters[0].is_alive(),
        state.characters[1].is_alive(),
    ];

    // 1. Controls: latch every slot against the pre-step state, then apply
    let mut latched = input.controls;
    for slot in 0..2 {
        if state.controllers[slot] == Controller::Ai {
            let opponent = 1 - slot;
            let intent = (state.controllers[opponent] == Controller::Human)
                .then_some(&input.controls[opponent]);
            latched[slot] = ai::think(
                &state.characters[slot],
                &state.characters[opponent],
                intent,
                &state.tuning,
                &mut state.rng,
            );
        }
    }
    for slot in 0..2 {
        let result = combat::apply_controls(
            &mut state.characters[slot],
            &latched[slot],
            &state.tuning.combat,
            dt,
            &mut state.rng,
        );
        if result.wants_special {
            cast_special(state, slot);
        }
    }

    // 2. Physics
    let bounds = state.arena.bounds();
    for character in state.characters.iter_mut() {
        physics::step_character(
            character,
            dt,
            &state.arena.platforms,
            &bounds,
            &state.tuning.physics,
        );
    }
    {
        let [a, b] = &mut state.characters;
        if physics::characters_overlap(a, b) {
            physics::resolve_character_collision(a, b, &state.tuning.physics, &mut state.rng);
        }
    }
    for projectile in state.projectiles.iter_mut() {
        physics::step_projectile(projectile, dt, &state.tuning.physics);
    }
    for particle in state.particles.iter_mut() {
        physics::step_particle(particle, dt, &state.tuning.physics);
    }

    // 3. Hits (both sides judged before either is applied)
    let checks = [
        combat::evaluate_hit(
            &state.characters[0],
            &state.characters[1],
            &state.tuning.combat,
        ),
        combat::evaluate_hit(
            &state.characters[1],
            &state.characters[0],
            &state.tuning.combat,
        ),
    ];
    for (attacker, check) in checks.into_iter().enumerate() {
        if let Some(check) = check {
            resolve_hit(state, attacker, check);
        }
    }

    // 4. Age and prune short-lived entities
    state.projectiles.retain_mut(|p| {
        p.lifetime -= dt;
        p.lifetime > 0.0 && bounds.contains_with_margin(p.position, PROJECTILE_MARGIN)
    });
    state.particles.retain_mut(|p| {
        p.lifetime -= dt;
        p.lifetime > 0.0
    });

    let now = state.game_time;
    let window = state.tuning.combat.combo_window;
    for character in state.characters.iter_mut() {
        combat::expire_combo(character, now, window);
    }

    for slot in 0..2 {
        if alive_before[slot] && !state.characters[slot].is_alive() {
            let center = state.characters[slot].center();
            let color = state.characters[slot].color;
            log::info!("{} eliminated", state.characters[slot].name);
            state.burst(center, color, 20);
            state.shake(0.6);
            state.emit(GameEvent::Eliminated { slot });
        }
    }

    // 5. Win check
    check_winner(state);
}

fn cast_special(state: &mut GameState, slot: Slot) {
    let now = state.game_time;
    let max_buff = state.tuning.combat.max_weapon_buff;
    let (caster, target) = pair_mut(&mut state.characters, slot);
    let Some(cast) = combat::try_special(caster, Some(&mut *target), now, max_buff) else {
        return;
    };
    let origin = caster.center();
    let color = caster.color;
    let aim = target.center();

    log::debug!(
        "{} used {} (damage {:.1}, healed {:.1})",
        caster.name,
        cast.name,
        cast.outcome.damage,
        cast.outcome.healed
    );
    if cast.kind.needs_target() && !cast.outcome.hit_target {
        log::debug!("{} found no target", cast.name);
    }

    state.burst(origin, color, 15);
    state.shake(0.3);
    if matches!(cast.kind, AbilityKind::RangedKnockback { .. }) && cast.outcome.hit_target {
        state.spawn_bolt(slot, origin, aim, color);
    }
    state.emit(GameEvent::SpecialUsed {
        caster: slot,
        ability: cast.name,
        damage: cast.outcome.damage,
        healed: cast.outcome.healed,
    });
}

fn resolve_hit(state: &mut GameState, attacker: Slot, check: HitCheck) {
    let defender = 1 - attacker;
    let now = state.game_time;

    match check {
        HitCheck::Landed { damage, knockback } => {
            let (dealt, combo, position) = {
                let (a, d) = pair_mut(&mut state.characters, attacker);
                let (dealt, combo) =
                    combat::apply_hit(a, d, damage, knockback, now, &state.tuning.combat);
                log::debug!(
                    "{} hit {} for {:.1} (combo {}, {:.1} hp left)",
                    a.name,
                    d.name,
                    dealt,
                    combo,
                    d.health
                );
                (dealt, combo, d.center())
            };
            state.burst(position, HIT_COLOR, 8);
            state.shake(0.2 + 0.05 * combo.min(6) as f32);
            state.emit(GameEvent::Hit {
                attacker,
                defender,
                damage: dealt,
                combo,
                position,
            });
        }
        HitCheck::Blocked => {
            let position = midpoint(
                state.characters[attacker].center(),
                state.characters[defender].center(),
            );
            log::debug!("{} blocked", state.characters[defender].name);
            state.burst(position, BLOCK_COLOR, 4);
            state.shake(0.05);
            state.emit(GameEvent::Blocked {
                attacker,
                defender,
                position,
            });
        }
    }
}

#[inline]
fn midpoint(a: Vec2, b: Vec2) -> Vec2 {
    (a + b) * 0.5
}

/// Declare a result once at most one fighter is standing
fn check_winner(state: &mut GameState) {
    let alive = [
        state.characters[0].is_alive(),
        state.characters[1].is_alive(),
    ];
    let outcome = match alive {
        [true, true] => return,
        [true, false] => MatchOutcome::Winner(0),
        [false, true] => MatchOutcome::Winner(1),
        [false, false] => match state.tuning.knockout {
            KnockoutRule::Draw => MatchOutcome::Draw,
            KnockoutRule::FirstSlotLoses => MatchOutcome::Winner(1),
        },
    };

    state.winner = Some(outcome);
    state.phase = GamePhase::Victory;
    log::info!(
        "Match over after {:.1}s: {}",
        state.game_time,
        state.winner_name().unwrap_or("?")
    );
    state.emit(GameEvent::Victory { outcome });
}
