//! Simulation tuning
//!
//! Every speed, size and timing the simulation uses lives in [`Config`]. The
//! value is injected into [`GameState`](crate::sim::GameState) at creation and
//! never mutated afterwards, so tests can run with scaled-down timings.
//!
//! Motion values are expressed per reference frame (`frame_ms`), timings in
//! milliseconds of simulation time.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Errors raised while loading or validating a [`Config`]
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Config document is not valid JSON for [`Config`]
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A field holds a value the simulation cannot run with
    #[error("Invalid value for `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Simulation tuning values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Reference frame length that per-frame motion values are expressed against
    pub frame_ms: f64,

    // === Ship ===
    /// Ship sprite size (collision radius is a third of it)
    pub ship_size: f32,
    /// Fraction of the pointer offset added to velocity each frame
    pub ship_acceleration: f32,
    /// Velocity retained each frame
    pub ship_friction: f32,
    /// Pointer must be farther than this for the ship to turn toward it
    pub min_rotation_distance: f32,

    // === Difficulty ===
    /// Survival time per difficulty level
    pub difficulty_interval_ms: f64,
    /// Multiplier gained per level
    pub difficulty_step: f32,
    /// Multiplier plateau
    pub max_difficulty: f32,
    /// Obstacle spawn interval at multiplier 1
    pub base_spawn_interval_ms: f64,
    /// Obstacle spawn interval floor
    pub min_spawn_interval_ms: f64,

    // === Obstacles ===
    pub min_obstacle_size: f32,
    pub max_obstacle_size: f32,
    /// Asteroid speed band at multiplier 1 (px/frame)
    pub base_min_obstacle_speed: f32,
    pub base_max_obstacle_speed: f32,
    /// Rotation speed band (rad/frame)
    pub min_rotation_speed: f32,
    pub max_rotation_speed: f32,
    /// Half-width of the jitter box around an asteroid batch anchor
    pub batch_jitter: f32,
    /// Probability a spawn is an alien
    pub alien_chance: f32,
    /// Probability a spawn is a black hole
    pub black_hole_chance: f32,
    pub black_hole_growth_ms: f64,
    pub black_hole_stable_ms: f64,
    pub black_hole_shrink_ms: f64,
    pub alien_size: f32,
    /// Horizontal alien speed (px/frame), not scaled by difficulty
    pub alien_speed: f32,
    pub alien_amplitude: f32,
    pub alien_frequency: f32,

    // === Collectibles ===
    pub collectible_size: f32,
    pub collectible_interval_ms: f64,
    pub speed_bonus_duration_ms: f64,
    /// Obstacle translation factor while the speed bonus is active
    pub speed_bonus_factor: f32,
    pub aura_rotation_speed: f32,
    /// Aura pulse angular frequency (rad per ms of simulation time)
    pub aura_pulse_speed: f32,
    pub aura_min_scale: f32,
    pub aura_max_scale: f32,

    // === Shield ===
    pub shield_max_opacity: f32,
    pub shield_fade_speed: f32,

    // === Particles ===
    /// Oldest particles are dropped past this count
    pub max_particles: usize,
    /// Alpha lost per frame by debris (flashes decay faster)
    pub particle_decay: f32,
    pub flash_decay_factor: f32,
    pub particle_spin: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            frame_ms: 1000.0 / 60.0,

            ship_size: 80.0,
            ship_acceleration: 0.005,
            ship_friction: 0.9,
            min_rotation_distance: 5.0,

            difficulty_interval_ms: 10_000.0,
            difficulty_step: 0.2,
            max_difficulty: 3.0,
            base_spawn_interval_ms: 2000.0,
            min_spawn_interval_ms: 500.0,

            min_obstacle_size: 40.0,
            max_obstacle_size: 80.0,
            base_min_obstacle_speed: 1.0,
            base_max_obstacle_speed: 3.0,
            min_rotation_speed: 0.02,
            max_rotation_speed: 0.05,
            batch_jitter: 50.0,
            alien_chance: 0.15,
            black_hole_chance: 0.20,
            black_hole_growth_ms: 2000.0,
            black_hole_stable_ms: 3000.0,
            black_hole_shrink_ms: 1000.0,
            alien_size: 60.0,
            alien_speed: 3.0,
            alien_amplitude: 100.0,
            alien_frequency: 0.005,

            collectible_size: 40.0,
            collectible_interval_ms: 5000.0,
            speed_bonus_duration_ms: 5000.0,
            speed_bonus_factor: 0.5,
            aura_rotation_speed: 0.02,
            aura_pulse_speed: 0.003,
            aura_min_scale: 1.2,
            aura_max_scale: 1.4,

            shield_max_opacity: 0.4,
            shield_fade_speed: 0.05,

            max_particles: 512,
            particle_decay: 0.02,
            flash_decay_factor: 5.0,
            particle_spin: 0.1,
        }
    }
}

impl Config {
    /// Parse a JSON document; missing fields take their default value
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json).inspect_err(|e| {
            if let ConfigError::Invalid { .. } = e {
                log::warn!("Rejected config {}: {e}", path.display());
            }
        })?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Ship collision radius
    pub fn ship_radius(&self) -> f32 {
        self.ship_size / 3.0
    }

    /// Total black hole lifetime (growth + stable + shrink)
    pub fn black_hole_lifetime_ms(&self) -> f64 {
        self.black_hole_growth_ms + self.black_hole_stable_ms + self.black_hole_shrink_ms
    }

    /// Reject values that would break simulation invariants
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
            if value > 0.0 && value.is_finite() {
                Ok(())
            } else {
                Err(ConfigError::Invalid {
                    field,
                    reason: "must be positive",
                })
            }
        }

        positive("frame_ms", self.frame_ms)?;
        positive("ship_size", self.ship_size as f64)?;
        positive("difficulty_interval_ms", self.difficulty_interval_ms)?;
        positive("base_spawn_interval_ms", self.base_spawn_interval_ms)?;
        positive("min_spawn_interval_ms", self.min_spawn_interval_ms)?;
        positive("min_obstacle_size", self.min_obstacle_size as f64)?;
        positive("black_hole_growth_ms", self.black_hole_growth_ms)?;
        positive("black_hole_stable_ms", self.black_hole_stable_ms)?;
        positive("black_hole_shrink_ms", self.black_hole_shrink_ms)?;
        positive("alien_size", self.alien_size as f64)?;
        positive("collectible_size", self.collectible_size as f64)?;
        positive("collectible_interval_ms", self.collectible_interval_ms)?;
        positive("speed_bonus_duration_ms", self.speed_bonus_duration_ms)?;
        positive("particle_decay", self.particle_decay as f64)?;
        positive("flash_decay_factor", self.flash_decay_factor as f64)?;

        fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
            if value >= 0.0 && value.is_finite() {
                Ok(())
            } else {
                Err(ConfigError::Invalid {
                    field,
                    reason: "must be finite and not negative",
                })
            }
        }

        non_negative("difficulty_step", self.difficulty_step)?;
        non_negative("base_min_obstacle_speed", self.base_min_obstacle_speed)?;
        non_negative("base_max_obstacle_speed", self.base_max_obstacle_speed)?;
        non_negative("min_rotation_speed", self.min_rotation_speed)?;
        non_negative("max_rotation_speed", self.max_rotation_speed)?;
        non_negative("ship_acceleration", self.ship_acceleration)?;
        non_negative("alien_speed", self.alien_speed)?;

        if !(self.max_difficulty >= 1.0 && self.max_difficulty.is_finite()) {
            return Err(ConfigError::Invalid {
                field: "max_difficulty",
                reason: "must be finite and at least 1",
            });
        }
        if !(self.ship_friction > 0.0 && self.ship_friction <= 1.0) {
            return Err(ConfigError::Invalid {
                field: "ship_friction",
                reason: "must lie in (0, 1]",
            });
        }
        if self.max_obstacle_size < self.min_obstacle_size {
            return Err(ConfigError::Invalid {
                field: "max_obstacle_size",
                reason: "must not be below min_obstacle_size",
            });
        }
        if self.base_max_obstacle_speed < self.base_min_obstacle_speed {
            return Err(ConfigError::Invalid {
                field: "base_max_obstacle_speed",
                reason: "must not be below base_min_obstacle_speed",
            });
        }
        if self.max_rotation_speed < self.min_rotation_speed {
            return Err(ConfigError::Invalid {
                field: "max_rotation_speed",
                reason: "must not be below min_rotation_speed",
            });
        }
        let chances = [self.alien_chance, self.black_hole_chance];
        if chances.iter().any(|c| !(0.0..=1.0).contains(c)) || chances.iter().sum::<f32>() > 1.0 {
            return Err(ConfigError::Invalid {
                field: "alien_chance",
                reason: "spawn chances must lie in [0, 1] and sum to at most 1",
            });
        }
        if !(0.0..=1.0).contains(&self.speed_bonus_factor) {
            return Err(ConfigError::Invalid {
                field: "speed_bonus_factor",
                reason: "must lie in [0, 1]",
            });
        }
        Ok(())
    }
}
