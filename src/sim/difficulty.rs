//! Difficulty scaling
//!
//! Pure functions of survival time. The multiplier climbs one step per
//! `difficulty_interval_ms` and plateaus at `max_difficulty`.

use crate::config::Config;

/// Difficulty multiplier for a given survival time, in `[1, max_difficulty]`
pub fn difficulty_multiplier(survival_ms: f64, config: &Config) -> f32 {
    let level = (survival_ms.max(0.0) / config.difficulty_interval_ms).floor() as f32;
    (1.0 + level * config.difficulty_step).min(config.max_difficulty)
}

/// Milliseconds between obstacle spawns at a given multiplier
pub fn spawn_interval_ms(multiplier: f32, config: &Config) -> f64 {
    (config.base_spawn_interval_ms / multiplier as f64).max(config.min_spawn_interval_ms)
}

/// Asteroid speed band (px/frame) at a given multiplier
pub fn speed_range(multiplier: f32, config: &Config) -> (f32, f32) {
    (
        config.base_min_obstacle_speed * multiplier,
        config.base_max_obstacle_speed * multiplier,
    )
}
