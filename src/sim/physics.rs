//! Kinematics and collision response
//!
//! Semi-implicit Euler: velocity picks up gravity first, then damping, then
//! position integrates the new velocity. Screen space, so +y is down.

use glam::Vec2;
use rand::Rng;

use super::rect::Rect;
use super::state::{Character, Particle, Platform, Projectile};
use crate::tuning::PhysicsTuning;

/// Reflect a velocity component on impact, or stop it when the impact is soft
#[inline]
pub fn bounce(v: f32, tuning: &PhysicsTuning) -> f32 {
    if v.abs() > tuning.bounce_threshold {
        -v * tuning.bounce_factor
    } else {
        0.0
    }
}

/// Advance a character one step and resolve it against the level.
///
/// `is_grounded` is cleared here and only re-established by a landing.
pub fn step_character(
    character: &mut Character,
    dt: f32,
    platforms: &[Platform],
    arena: &Rect,
    tuning: &PhysicsTuning,
) {
    character.velocity.y += tuning.gravity * dt;
    character.velocity *= tuning.air_resistance;
    character.position += character.velocity * dt;

    character.rotation += character.angular_velocity * dt;
    character.angular_velocity *= tuning.friction;

    character.is_grounded = false;
    for platform in platforms {
        resolve_platform(character, &platform.rect, tuning);
    }
    clamp_to_arena(character, arena, tuning);
    update_weapon_pose(character, tuning.weapon_offset);
}

/// Push a character out of a platform along the axis of least penetration
pub fn resolve_platform(character: &mut Character, platform: &Rect, tuning: &PhysicsTuning) {
    let body = character.bounds();
    if !body.overlaps(platform) {
        return;
    }
    let depth = body.overlap_depth(platform);
    if depth.x <= 0.0 || depth.y <= 0.0 {
        return;
    }

    let body_center = body.center();
    let platform_center = platform.center();

    if depth.x < depth.y {
        if body_center.x < platform_center.x {
            character.position.x = platform.left() - character.size.x;
        } else {
            character.position.x = platform.right();
        }
        character.velocity.x = bounce(character.velocity.x, tuning);
    } else if body_center.y < platform_center.y {
        // Landing on top
        character.position.y = platform.top() - character.size.y;
        character.velocity.y = bounce(character.velocity.y, tuning);
        character.is_grounded = true;
    } else {
        // Head hit the underside
        character.position.y = platform.bottom();
        character.velocity.y = bounce(character.velocity.y, tuning);
    }
}

/// Keep a character inside the world box. The bottom edge counts as floor.
pub fn clamp_to_arena(character: &mut Character, arena: &Rect, tuning: &PhysicsTuning) {
    if character.position.x < arena.left() {
        character.position.x = arena.left();
        character.velocity.x = bounce(character.velocity.x, tuning);
    }
    if character.position.x + character.size.x > arena.right() {
        character.position.x = arena.right() - character.size.x;
        character.velocity.x = bounce(character.velocity.x, tuning);
    }
    if character.position.y + character.size.y > arena.bottom() {
        character.position.y = arena.bottom() - character.size.y;
        character.velocity.y = bounce(character.velocity.y, tuning);
        character.is_grounded = true;
    }
    if character.position.y < arena.top() {
        character.position.y = arena.top();
        character.velocity.y = bounce(character.velocity.y, tuning);
    }
}

/// Place the weapon at a fixed offset from the body centre along the body angle
pub fn update_weapon_pose(character: &mut Character, offset: f32) {
    let center = character.center();
    let angle = character.rotation;
    if let Some(weapon) = character.weapon.as_mut() {
        weapon.position = center + Vec2::new(angle.cos(), angle.sin()) * offset;
        weapon.rotation = angle;
    }
}

/// Body-versus-body overlap
pub fn characters_overlap(a: &Character, b: &Character) -> bool {
    a.bounds().overlaps(&b.bounds())
}

/// Separate two overlapping bodies and trade some momentum.
///
/// Coincident centres have no separation axis and are left alone.
pub fn resolve_character_collision<R: Rng>(
    a: &mut Character,
    b: &mut Character,
    tuning: &PhysicsTuning,
    rng: &mut R,
) -> bool {
    let delta = b.center() - a.center();
    let distance = delta.length();
    if distance <= f32::EPSILON {
        return false;
    }

    let overlap = (a.size.x + b.size.x) * 0.5 - distance;
    if overlap <= 0.0 {
        return false;
    }

    let separation = delta / distance * overlap * 0.5;
    a.position -= separation;
    b.position += separation;

    let relative = b.velocity - a.velocity;
    a.velocity += relative * tuning.collision_impulse;
    b.velocity -= relative * tuning.collision_impulse;

    let wobble = tuning.collision_wobble * 0.5;
    if wobble > 0.0 {
        a.angular_velocity += rng.random_range(-wobble..wobble);
        b.angular_velocity += rng.random_range(-wobble..wobble);
    }
    true
}

/// Ballistic step for projectiles (half gravity, no drag)
pub fn step_projectile(projectile: &mut Projectile, dt: f32, tuning: &PhysicsTuning) {
    projectile.velocity.y += tuning.gravity * tuning.projectile_gravity_scale * dt;
    projectile.position += projectile.velocity * dt;
}

/// Floaty step for particles (reduced gravity, light drag)
pub fn step_particle(particle: &mut Particle, dt: f32, tuning: &PhysicsTuning) {
    particle.velocity.y += tuning.gravity * tuning.particle_gravity_scale * dt;
    particle.velocity *= tuning.particle_damping;
    particle.position += particle.velocity * dt;
}
