//! Obstacle spawning and lifecycles
//!
//! Three hazard variants share one [`Obstacle`] record:
//! - Asteroids drift in from a field edge on a straight line, often in batches
//! - Black holes sit still and grow, hold, then shrink away on a fixed timeline
//! - Aliens cross the field horizontally on a sine weave
//!
//! Only stable black holes are hazardous; growing and shrinking ones are
//! purely visual.

use std::f32::consts::{PI, TAU};

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::difficulty::speed_range;
use super::state::{EntityId, GameEvent, GameState};
use crate::config::Config;

/// Black hole lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlackHolePhase {
    Growing,
    Stable,
    Shrinking,
}

impl BlackHolePhase {
    /// Phase and visible size of a black hole of `size` at `age_ms`
    ///
    /// Returns `None` once the shrink phase has completed.
    pub fn at_age(age_ms: f64, size: f32, config: &Config) -> Option<(Self, f32)> {
        let age = age_ms.max(0.0);
        let growth_end = config.black_hole_growth_ms;
        let stable_end = growth_end + config.black_hole_stable_ms;
        let shrink_end = stable_end + config.black_hole_shrink_ms;

        if age < growth_end {
            let t = (age / config.black_hole_growth_ms) as f32;
            Some((Self::Growing, size * t))
        } else if age < stable_end {
            Some((Self::Stable, size))
        } else if age < shrink_end {
            let t = ((age - stable_end) / config.black_hole_shrink_ms) as f32;
            Some((Self::Shrinking, size * (1.0 - t)))
        } else {
            None
        }
    }
}

/// Variant-specific obstacle data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ObstacleKind {
    /// Constant velocity until it leaves the field
    Asteroid { vel: Vec2 },
    /// Static; lifecycle driven by age in simulation time
    BlackHole {
        created_at_ms: f64,
        phase: BlackHolePhase,
        current_size: f32,
    },
    /// Horizontal travel with a sinusoidal vertical weave
    Alien {
        initial_y: f32,
        amplitude: f32,
        frequency: f32,
        /// +1 travelling right, -1 travelling left
        direction: f32,
    },
}

/// Fieldless obstacle variant tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleClass {
    Asteroid,
    BlackHole,
    Alien,
}

/// A hazard entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: EntityId,
    pub pos: Vec2,
    pub size: f32,
    /// Facing (aliens: 0 moving right, pi moving left)
    pub rotation: f32,
    /// Radians per reference frame
    pub rotation_speed: f32,
    pub kind: ObstacleKind,
}

impl Obstacle {
    pub fn class(&self) -> ObstacleClass {
        match self.kind {
            ObstacleKind::Asteroid { .. } => ObstacleClass::Asteroid,
            ObstacleKind::BlackHole { .. } => ObstacleClass::BlackHole,
            ObstacleKind::Alien { .. } => ObstacleClass::Alien,
        }
    }

    /// Size used for the collision test, or `None` when the obstacle is harmless
    pub fn hazard_size(&self) -> Option<f32> {
        match self.kind {
            ObstacleKind::BlackHole {
                phase: BlackHolePhase::Stable,
                current_size,
                ..
            } => Some(current_size),
            ObstacleKind::BlackHole { .. } => None,
            _ => Some(self.size),
        }
    }
}

/// Uniform draw in `[0, 1)`
fn unit(rng: &mut impl Rng) -> f32 {
    rng.random::<f32>()
}

/// Uniform draw in `[min, max)`; never panics on an empty band
fn band(rng: &mut impl Rng, min: f32, max: f32) -> f32 {
    min + unit(rng) * (max - min)
}

/// Spawn one obstacle group chosen by the configured variant weights
///
/// Returns the number of obstacles added.
pub fn spawn_obstacle(state: &mut GameState, multiplier: f32) -> usize {
    let roll = unit(&mut state.rng);
    let alien_chance = state.config.alien_chance;
    let black_hole_chance = state.config.black_hole_chance;
    let before = state.obstacles.len();

    if roll < alien_chance {
        spawn_alien(state);
    } else if roll < alien_chance + black_hole_chance {
        spawn_black_hole(state);
    } else {
        spawn_asteroids(state, multiplier);
    }

    let spawned = &state.obstacles[before..];
    for obstacle in spawned {
        log::debug!(
            "Spawned {:?} #{} at ({:.0}, {:.0})",
            obstacle.class(),
            obstacle.id,
            obstacle.pos.x,
            obstacle.pos.y
        );
        state.events.push(GameEvent::ObstacleSpawned {
            id: obstacle.id,
            class: obstacle.class(),
        });
    }
    spawned.len()
}

/// Spawn a batch of asteroids just outside a random field edge
fn spawn_asteroids(state: &mut GameState, multiplier: f32) {
    let GameState {
        rng,
        config,
        field,
        ids,
        obstacles,
        ..
    } = state;

    let size = band(rng, config.min_obstacle_size, config.max_obstacle_size);
    let (min_speed, max_speed) = speed_range(multiplier, config);
    let inward = band(rng, min_speed, max_speed);
    let cross = (unit(rng) - 0.5) * max_speed;

    let (anchor, vel) = match rng.random_range(0..4u8) {
        // Top
        0 => (
            Vec2::new(unit(rng) * field.width, -size),
            Vec2::new(cross, inward),
        ),
        // Right
        1 => (
            Vec2::new(field.width + size, unit(rng) * field.height),
            Vec2::new(-inward, cross),
        ),
        // Bottom
        2 => (
            Vec2::new(unit(rng) * field.width, field.height + size),
            Vec2::new(cross, -inward),
        ),
        // Left
        _ => (
            Vec2::new(-size, unit(rng) * field.height),
            Vec2::new(inward, cross),
        ),
    };

    let spin = band(rng, config.min_rotation_speed, config.max_rotation_speed);
    let spin = if unit(rng) < 0.5 { spin } else { -spin };

    let count = ((unit(rng) * (multiplier - 1.0) + 1.0).floor() as usize).max(1);
    for _ in 0..count {
        let jitter = Vec2::new(unit(rng) - 0.5, unit(rng) - 0.5) * 2.0 * config.batch_jitter;
        obstacles.push(Obstacle {
            id: ids.next_id(),
            pos: anchor + jitter,
            size,
            rotation: unit(rng) * TAU,
            rotation_speed: spin,
            kind: ObstacleKind::Asteroid { vel },
        });
    }
}

/// Spawn a static black hole away from the field edges
fn spawn_black_hole(state: &mut GameState) {
    let now = state.clock.now_ms();
    let GameState {
        rng,
        config,
        field,
        ids,
        obstacles,
        ..
    } = state;

    let base = config.min_obstacle_size * 2.0;
    let size = base + unit(rng) * base;
    let (u, v) = (unit(rng), unit(rng));
    let pos = field.inset_point(size * 2.0, u, v);

    obstacles.push(Obstacle {
        id: ids.next_id(),
        pos,
        size,
        rotation: unit(rng) * TAU,
        rotation_speed: band(rng, config.min_rotation_speed, config.max_rotation_speed),
        kind: ObstacleKind::BlackHole {
            created_at_ms: now,
            phase: BlackHolePhase::Growing,
            current_size: 0.0,
        },
    });
}

/// Spawn an alien just outside the left or right edge
fn spawn_alien(state: &mut GameState) {
    let GameState {
        rng,
        config,
        field,
        ids,
        obstacles,
        ..
    } = state;

    let size = config.alien_size;
    let going_right = unit(rng) < 0.5;
    let x = if going_right { -size } else { field.width + size };
    let y = field.inset_point(size, 0.0, unit(rng)).y;

    obstacles.push(Obstacle {
        id: ids.next_id(),
        pos: Vec2::new(x, y),
        size,
        rotation: if going_right { 0.0 } else { PI },
        rotation_speed: 0.0,
        kind: ObstacleKind::Alien {
            initial_y: y,
            amplitude: config.alien_amplitude,
            frequency: config.alien_frequency,
            direction: if going_right { 1.0 } else { -1.0 },
        },
    });
}

/// Move, spin and age every obstacle, then prune the ones that left or expired
///
/// `step` is the tick length in reference frames.
pub fn advance_obstacles(state: &mut GameState, step: f32) {
    let now = state.clock.now_ms();
    let slow = if state.speed_bonus_active() {
        state.config.speed_bonus_factor
    } else {
        1.0
    };
    let config = &state.config;
    let field = state.field;

    state.obstacles.retain_mut(|obstacle| {
        let alive = match &mut obstacle.kind {
            ObstacleKind::Asteroid { vel } => {
                obstacle.pos += *vel * slow * step;
                !field.is_beyond(obstacle.pos, obstacle.size * 2.0)
            }
            ObstacleKind::Alien {
                initial_y,
                amplitude,
                frequency,
                direction,
            } => {
                obstacle.pos.x += *direction * config.alien_speed * slow * step;
                obstacle.pos.y = *initial_y + (obstacle.pos.x * *frequency).sin() * *amplitude;
                !field.is_beyond_x(obstacle.pos.x, obstacle.size * 2.0)
            }
            ObstacleKind::BlackHole {
                created_at_ms,
                phase,
                current_size,
            } => match BlackHolePhase::at_age(now - *created_at_ms, obstacle.size, config) {
                Some((next_phase, next_size)) => {
                    *phase = next_phase;
                    *current_size = next_size;
                    true
                }
                None => false,
            },
        };
        obstacle.rotation += obstacle.rotation_speed * step;
        alive
    });
}
