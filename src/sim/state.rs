//! Game state and core simulation types
//!
//! `GameState` is the single owner of everything a match mutates. The
//! presentation layer reads it between steps and drains the effect events.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::catalog::{self, AbilityKind, CharacterKind};
use super::rect::Rect;
use crate::consts::*;
use crate::tuning::Tuning;

/// Decorrelates the effects stream from the gameplay stream
const FX_SEED_SALT: u64 = 0x9E37_79B9_7F4A_7C15;

/// Index of a fighter in `GameState::characters` (0 or 1)
pub type Slot = usize;

/// Current phase of the match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Character select / title screen, nothing simulates
    Menu,
    /// Active fighting
    Playing,
    /// Frozen mid-match
    Paused,
    /// A result has been declared
    Victory,
}

/// Which way a fighter is looking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Facing {
    Left,
    Right,
}

impl Facing {
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }

    #[inline]
    pub fn unit(self) -> Vec2 {
        Vec2::new(self.sign(), 0.0)
    }
}

/// Who produces the controls for a slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Controller {
    #[default]
    Human,
    Ai,
}

/// Final result of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchOutcome {
    Winner(Slot),
    Draw,
}

/// A melee weapon carried by one character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Weapon {
    pub id: String,
    pub name: String,
    /// Current damage (buffs modify this)
    pub damage: f32,
    /// Damage as issued, used to cap buffs
    pub base_damage: f32,
    pub reach: f32,
    pub weight: f32,
    pub color: u32,
    /// Derived grip position, recomputed from the owner's pose every step
    pub position: Vec2,
    /// Derived angle, mirrors the owner's rotation
    pub rotation: f32,
}

/// A special move
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ability {
    pub id: String,
    pub name: String,
    pub kind: AbilityKind,
    pub power_cost: f32,
    pub cooldown_ms: u32,
    /// Match time (ms) of the last successful use
    pub last_used_ms: Option<u64>,
}

impl Ability {
    /// Cooldown in seconds, as loaded into `Character::special_cooldown`
    pub fn cooldown_secs(&self) -> f32 {
        self.cooldown_ms as f32 / 1000.0
    }
}

/// A fighter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Character {
    pub id: String,
    pub kind: CharacterKind,
    pub name: String,
    pub color: u32,

    pub health: f32,
    pub max_health: f32,
    pub power: f32,
    pub max_power: f32,

    /// Top-left corner of the body box
    pub position: Vec2,
    pub velocity: Vec2,
    pub rotation: f32,
    pub angular_velocity: f32,
    pub is_grounded: bool,
    pub size: Vec2,

    pub facing: Facing,
    /// True only on the step a basic attack was started
    pub attacking: bool,
    pub blocking: bool,

    /// Seconds until the next basic attack is allowed
    pub attack_cooldown: f32,
    /// Seconds until the next special is allowed
    pub special_cooldown: f32,
    /// Seconds of remaining hit stun (input ignored)
    pub stunned: f32,

    /// Consecutive hits landed inside the combo window
    pub combo: u32,
    /// Match time of the last landed hit
    pub last_hit_time: Option<f32>,

    pub weapon: Option<Weapon>,
    pub abilities: Vec<Ability>,
}

impl Character {
    /// Body box in world space
    pub fn bounds(&self) -> Rect {
        Rect::from_pos_size(self.position, self.size)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.position + self.size * 0.5
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    /// Alive and not in hit stun
    #[inline]
    pub fn can_act(&self) -> bool {
        self.is_alive() && self.stunned <= 0.0
    }

    /// Subtract health, flooring at zero. Returns the damage actually taken.
    pub fn take_damage(&mut self, amount: f32) -> f32 {
        let amount = amount.max(0.0);
        let before = self.health;
        self.health = (self.health - amount).clamp(0.0, self.max_health);
        before - self.health
    }

    /// Restore health up to the maximum. Returns the amount restored.
    pub fn heal(&mut self, amount: f32) -> f32 {
        let before = self.health;
        self.health = (self.health + amount.max(0.0)).clamp(0.0, self.max_health);
        self.health - before
    }

    /// Add (or with a negative amount, spend) power within `[0, max_power]`
    pub fn add_power(&mut self, amount: f32) {
        self.power = (self.power + amount).clamp(0.0, self.max_power);
    }

    /// Apply a velocity change
    #[inline]
    pub fn apply_force(&mut self, force: Vec2) {
        self.velocity += force;
    }

    /// Apply a velocity change that also spins the body a little
    pub fn apply_impulse(&mut self, impulse: Vec2) {
        self.velocity += impulse;
        self.angular_velocity += (impulse.x + impulse.y) * 0.1;
    }

    /// Decrement timers, never below zero
    pub fn tick_timers(&mut self, dt: f32) {
        self.attack_cooldown = (self.attack_cooldown - dt).max(0.0);
        self.special_cooldown = (self.special_cooldown - dt).max(0.0);
        self.stunned = (self.stunned - dt).max(0.0);
    }
}

/// A short-lived ballistic entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub owner: Slot,
    pub position: Vec2,
    pub velocity: Vec2,
    pub color: u32,
    pub size: f32,
    /// Seconds left to live
    pub lifetime: f32,
}

/// A visual effect particle (not gameplay-affecting)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub id: u32,
    pub position: Vec2,
    pub velocity: Vec2,
    pub color: u32,
    pub size: f32,
    /// Seconds left to live
    pub lifetime: f32,
    pub max_lifetime: f32,
}

/// Solid level geometry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Platform {
    pub rect: Rect,
    pub color: u32,
}

/// Static level: world bounds plus platforms
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
    pub platforms: Vec<Platform>,
}

impl Default for Arena {
    fn default() -> Self {
        let ledge = 0x5A4A6B;
        Self {
            width: ARENA_WIDTH,
            height: ARENA_HEIGHT,
            platforms: vec![
                // Ground slab
                Platform {
                    rect: Rect::new(0.0, ARENA_HEIGHT - 60.0, ARENA_WIDTH, 60.0),
                    color: 0x4A4A4A,
                },
                Platform {
                    rect: Rect::new(100.0, 400.0, 160.0, 20.0),
                    color: ledge,
                },
                Platform {
                    rect: Rect::new(540.0, 400.0, 160.0, 20.0),
                    color: ledge,
                },
                Platform {
                    rect: Rect::new(320.0, 280.0, 160.0, 20.0),
                    color: ledge,
                },
            ],
        }
    }
}

impl Arena {
    /// An empty box with no platforms (bottom edge acts as the floor)
    pub fn open(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            platforms: Vec::new(),
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }
}

/// One-shot notifications for the presentation layer (sound, shake, haptics)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Hit {
        attacker: Slot,
        defender: Slot,
        damage: f32,
        combo: u32,
        position: Vec2,
    },
    Blocked {
        attacker: Slot,
        defender: Slot,
        position: Vec2,
    },
    SpecialUsed {
        caster: Slot,
        ability: String,
        damage: f32,
        healed: f32,
    },
    ParticleBurst {
        position: Vec2,
        color: u32,
        count: u32,
    },
    Eliminated {
        slot: Slot,
    },
    Victory {
        outcome: MatchOutcome,
    },
}

/// Complete match state (serializable snapshot)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Match seed for reproducibility
    pub seed: u64,
    /// Drives AI reflexes and physical wobble
    pub rng: Pcg32,
    /// Particle spread and sizes only, so visual settings never shift `rng`
    pub fx_rng: Pcg32,
    pub phase: GamePhase,
    /// Selected archetypes per slot
    pub roster: [CharacterKind; 2],
    pub controllers: [Controller; 2],
    pub characters: [Character; 2],
    pub projectiles: Vec<Projectile>,
    pub particles: Vec<Particle>,
    pub arena: Arena,
    /// Seconds of simulated match time
    pub game_time: f32,
    pub winner: Option<MatchOutcome>,
    pub tuning: Tuning,
    /// Camera shake intensity (0-1), decays every step
    pub screen_shake: f32,
    /// Particle budget (from the quality preset)
    pub max_particles: usize,
    /// Events raised since the last `take_events`
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create a match in the menu phase with the given roster
    pub fn new(seed: u64, roster: [CharacterKind; 2], tuning: Tuning) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            fx_rng: Pcg32::seed_from_u64(seed ^ FX_SEED_SALT),
            phase: GamePhase::Menu,
            roster,
            controllers: [Controller::Human, Controller::Ai],
            characters: Self::spawn(roster),
            projectiles: Vec::new(),
            particles: Vec::new(),
            arena: Arena::default(),
            game_time: 0.0,
            winner: None,
            tuning,
            screen_shake: 0.0,
            max_particles: MAX_PARTICLES,
            events: Vec::new(),
            next_id: 1,
        }
    }

    fn spawn(roster: [CharacterKind; 2]) -> [Character; 2] {
        let mut left = catalog::create(roster[0]);
        left.position = Vec2::new(SPAWN_LEFT_X, SPAWN_Y);
        left.facing = Facing::Right;

        let mut right = catalog::create(roster[1]);
        right.position = Vec2::new(SPAWN_RIGHT_X, SPAWN_Y);
        right.facing = Facing::Left;

        [left, right]
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.phase == GamePhase::Paused
    }

    /// Change the roster. Only allowed from the menu.
    pub fn select_roster(&mut self, roster: [CharacterKind; 2]) -> bool {
        if self.phase != GamePhase::Menu {
            return false;
        }
        self.roster = roster;
        self.characters = Self::spawn(roster);
        true
    }

    /// Begin a fresh match (from the menu, or a rematch from victory)
    pub fn start_match(&mut self) -> bool {
        match self.phase {
            GamePhase::Menu | GamePhase::Victory => {
                self.characters = Self::spawn(self.roster);
                self.projectiles.clear();
                self.particles.clear();
                self.events.clear();
                self.game_time = 0.0;
                self.winner = None;
                self.screen_shake = 0.0;
                self.phase = GamePhase::Playing;
                log::info!(
                    "Match started: {} vs {}",
                    self.characters[0].name,
                    self.characters[1].name
                );
                true
            }
            _ => false,
        }
    }

    /// Flip between playing and paused. Other phases are unaffected.
    pub fn toggle_pause(&mut self) {
        self.phase = match self.phase {
            GamePhase::Playing => GamePhase::Paused,
            GamePhase::Paused => GamePhase::Playing,
            other => other,
        };
        log::info!("Phase now {:?}", self.phase);
    }

    /// Leave a paused or finished match
    pub fn return_to_menu(&mut self) -> bool {
        match self.phase {
            GamePhase::Paused | GamePhase::Victory => {
                self.phase = GamePhase::Menu;
                self.winner = None;
                true
            }
            _ => false,
        }
    }

    /// Drain the events raised since the last call
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    #[inline]
    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Display name of the winner (or "Draw")
    pub fn winner_name(&self) -> Option<&str> {
        self.winner.map(|outcome| match outcome {
            MatchOutcome::Winner(slot) => self.characters[slot].name.as_str(),
            MatchOutcome::Draw => "Draw",
        })
    }

    /// Add a particle unless the budget is exhausted
    pub fn spawn_particle(&mut self, position: Vec2, velocity: Vec2, color: u32, lifetime: f32) {
        if self.particles.len() >= self.max_particles {
            return;
        }
        let id = self.next_entity_id();
        let size = self.fx_rng.random::<f32>() * 4.0 + 2.0;
        self.particles.push(Particle {
            id,
            position,
            velocity,
            color,
            size,
            lifetime,
            max_lifetime: lifetime,
        });
    }

    /// Radial explosion of `count` particles
    pub fn burst(&mut self, position: Vec2, color: u32, count: u32) {
        for i in 0..count {
            let angle = std::f32::consts::TAU * i as f32 / count as f32;
            let speed: f32 = self.fx_rng.random_range(100.0..300.0);
            let lifetime: f32 = 1.0 + self.fx_rng.random::<f32>();
            let velocity = Vec2::new(angle.cos(), angle.sin()) * speed;
            self.spawn_particle(position, velocity, color, lifetime);
        }
        self.emit(GameEvent::ParticleBurst {
            position,
            color,
            count,
        });
    }

    /// Fire a cosmetic bolt from `from` toward `to`
    pub fn spawn_bolt(&mut self, owner: Slot, from: Vec2, to: Vec2, color: u32) {
        let id = self.next_entity_id();
        let dir = crate::unit_or(to - from, Vec2::X);
        self.projectiles.push(Projectile {
            id,
            owner,
            position: from,
            velocity: dir * BOLT_SPEED,
            color,
            size: BOLT_SIZE,
            lifetime: BOLT_LIFETIME,
        });
    }

    /// Bump camera shake, saturating at 1
    pub fn shake(&mut self, amount: f32) {
        self.screen_shake = (self.screen_shake + amount).min(1.0);
    }
}

/// Borrow `slot` and its opponent mutably at the same time
pub fn pair_mut(chars: &mut [Character; 2], slot: Slot) -> (&mut Character, &mut Character) {
    let (first, second) = chars.split_at_mut(1);
    if slot == 0 {
        (&mut first[0], &mut second[0])
    } else {
        (&mut second[0], &mut first[0])
    }
}
