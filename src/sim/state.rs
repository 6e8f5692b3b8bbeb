//! Game state and core simulation types
//!
//! Everything one play-through needs lives in [`GameState`]. The state is
//! `Clone`, so a run can be forked and replayed from any tick.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::clock::{SimClock, SpawnTimer};
use super::collectibles::{Collectible, Effect};
use super::difficulty::difficulty_multiplier;
use super::obstacles::{Obstacle, ObstacleClass};
use super::particles::Particle;
use crate::config::Config;

/// Stable entity identifier (never reused within a state)
pub type EntityId = u32;

/// Session phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Waiting for the first interaction
    #[default]
    NotStarted,
    /// Active gameplay
    Running,
    /// Frozen by the player or by focus loss
    Paused,
    /// Fatal collision happened; frozen until restart
    GameOver,
}

/// Play field bounds (origin at top-left, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub width: f32,
    pub height: f32,
}

impl Field {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Whether `pos` lies more than `margin` outside any edge
    pub fn is_beyond(&self, pos: Vec2, margin: f32) -> bool {
        self.is_beyond_x(pos.x, margin) || pos.y < -margin || pos.y > self.height + margin
    }

    /// Point at fractions `(u, v)` of the area inset by `margin` on every edge
    ///
    /// An axis narrower than twice the margin collapses to its center line.
    pub fn inset_point(&self, margin: f32, u: f32, v: f32) -> Vec2 {
        Vec2::new(
            inset(self.width, margin, u),
            inset(self.height, margin, v),
        )
    }

    /// Horizontal-only variant of [`Field::is_beyond`]
    pub fn is_beyond_x(&self, x: f32, margin: f32) -> bool {
        x < -margin || x > self.width + margin
    }
}

fn inset(extent: f32, margin: f32, t: f32) -> f32 {
    let span = (extent - 2.0 * margin).max(0.0);
    (extent - span) / 2.0 + t * span
}

/// The player's craft
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ship {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Facing (radians, 0 = nose up)
    pub rotation: f32,
    /// Collision radius
    pub radius: f32,
}

impl Ship {
    pub fn new(pos: Vec2, config: &Config) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            rotation: 0.0,
            radius: config.ship_radius(),
        }
    }

    /// Accelerate toward `target` with friction, then clamp inside the field
    ///
    /// `step` is the tick length in reference frames.
    pub fn steer(&mut self, target: Vec2, field: Field, config: &Config, step: f32) {
        let delta = target - self.pos;
        if delta.length() > config.min_rotation_distance {
            self.rotation = delta.y.atan2(delta.x) + std::f32::consts::FRAC_PI_2;
        }

        self.vel += delta * config.ship_acceleration * step;
        self.vel *= config.ship_friction.powf(step);
        self.pos += self.vel * step;

        // min-then-max keeps this panic-free when the field is smaller than the ship
        let half = config.ship_size / 2.0;
        self.pos.x = self.pos.x.min(field.width - half).max(half);
        self.pos.y = self.pos.y.min(field.height - half).max(half);
    }
}

/// Timed and consumable power-up effects
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActiveEffects {
    /// Simulation time at which the speed bonus ends
    pub speed_bonus_until: Option<f64>,
    pub shield_active: bool,
    /// Cosmetic shield fade-in (0 when no shield)
    pub shield_opacity: f32,
}

impl ActiveEffects {
    /// Whether the speed bonus still applies at `now_ms`
    pub fn speed_bonus_active(&self, now_ms: f64) -> bool {
        self.speed_bonus_until.is_some_and(|end| now_ms <= end)
    }

    /// Milliseconds of speed bonus left at `now_ms`
    pub fn speed_bonus_remaining_ms(&self, now_ms: f64) -> f64 {
        self.speed_bonus_until
            .map(|end| (end - now_ms).max(0.0))
            .unwrap_or(0.0)
    }
}

/// Notable things that happened during a tick
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum GameEvent {
    SessionStarted,
    Paused,
    Resumed,
    ObstacleSpawned { id: EntityId, class: ObstacleClass },
    CollectibleSpawned { id: EntityId, effect: Effect },
    CollectiblePicked { id: EntityId, effect: Effect, pos: Vec2 },
    /// An obstacle was destroyed by the shield
    ObstacleAbsorbed { id: EntityId, pos: Vec2 },
    ShieldBroken { pos: Vec2 },
    FatalCollision { id: EntityId, pos: Vec2 },
}

/// Monotonic id allocator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityIds {
    next: EntityId,
}

impl Default for EntityIds {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl EntityIds {
    pub fn next_id(&mut self) -> EntityId {
        let id = self.next;
        self.next += 1;
        id
    }
}

/// Complete simulation state for one play-through
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Injected tuning, never mutated by the simulation
    pub config: Config,
    pub rng: Pcg32,
    pub field: Field,
    pub phase: SessionPhase,
    /// Survival time
    pub clock: SimClock,
    pub obstacle_timer: SpawnTimer,
    pub collectible_timer: SpawnTimer,
    pub score: u64,
    /// Score multiplier (starts at 1, only increases)
    pub score_multiplier: f32,
    pub ship: Ship,
    /// Steering target from the latest pointer position
    pub target: Vec2,
    /// Active obstacles in insertion order
    pub obstacles: Vec<Obstacle>,
    pub collectibles: Vec<Collectible>,
    /// Visual particles (not gameplay-affecting)
    pub particles: Vec<Particle>,
    pub effects: ActiveEffects,
    /// Events produced by the most recent tick
    pub events: Vec<GameEvent>,
    pub ids: EntityIds,
}

impl GameState {
    /// Create a not-yet-started state
    pub fn new(seed: u64, config: Config, field: Field) -> Self {
        let center = field.center();
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            ship: Ship::new(center, &config),
            config,
            field,
            phase: SessionPhase::NotStarted,
            clock: SimClock::default(),
            obstacle_timer: SpawnTimer::default(),
            collectible_timer: SpawnTimer::default(),
            score: 0,
            score_multiplier: 1.0,
            target: center,
            obstacles: Vec::new(),
            collectibles: Vec::new(),
            particles: Vec::new(),
            effects: ActiveEffects::default(),
            events: Vec::new(),
            ids: EntityIds::default(),
        }
    }

    /// Reset everything session-scoped and enter `Running`
    ///
    /// Used both for the first start and for restart after game over. The RNG
    /// keeps its stream so consecutive sessions differ.
    pub fn begin_session(&mut self) {
        let center = self.field.center();
        self.ship = Ship::new(center, &self.config);
        self.obstacles.clear();
        self.collectibles.clear();
        self.particles.clear();
        self.score = 0;
        self.score_multiplier = 1.0;
        self.clock.reset();
        self.obstacle_timer.reset();
        self.collectible_timer.reset();
        self.effects = ActiveEffects::default();
        self.phase = SessionPhase::Running;
        self.events.push(GameEvent::SessionStarted);
        log::info!("Session started (seed {})", self.seed);
    }

    /// Update field bounds after a viewport change
    pub fn resize(&mut self, width: f32, height: f32) {
        self.field = Field::new(width.max(0.0), height.max(0.0));
        log::debug!("Field resized to {}x{}", self.field.width, self.field.height);
    }

    pub fn is_started(&self) -> bool {
        self.phase != SessionPhase::NotStarted
    }

    /// Paused or over: no simulation advances
    pub fn is_paused(&self) -> bool {
        matches!(self.phase, SessionPhase::Paused | SessionPhase::GameOver)
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == SessionPhase::GameOver
    }

    /// Survival time in milliseconds
    pub fn survival_ms(&self) -> f64 {
        self.clock.now_ms()
    }

    pub fn difficulty(&self) -> f32 {
        difficulty_multiplier(self.clock.now_ms(), &self.config)
    }

    pub fn speed_bonus_active(&self) -> bool {
        self.effects.speed_bonus_active(self.clock.now_ms())
    }

    /// Add points scaled by the current multiplier (rounded down)
    pub fn add_score(&mut self, points: u32) {
        self.score += (points as f64 * self.score_multiplier as f64).floor() as u64;
    }
}
