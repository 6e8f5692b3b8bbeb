//! Read-only view of a session for hosts and renderers

use serde::Serialize;

use super::collectibles::Collectible;
use super::obstacles::Obstacle;
use super::particles::Particle;
use super::state::{Field, GameEvent, GameState, SessionPhase, Ship};

/// HUD-level session status
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Status {
    pub phase: SessionPhase,
    pub score: u64,
    pub multiplier: f32,
    pub survival_ms: f64,
    /// Survival time as `MM:SS`
    pub survival_time: String,
    pub started: bool,
    /// True while paused and after game over
    pub paused: bool,
    pub game_over: bool,
    pub speed_bonus_remaining_ms: f64,
    pub shield_active: bool,
    pub shield_opacity: f32,
    pub difficulty: f32,
}

/// Borrowed snapshot of everything a frame needs to draw
#[derive(Debug, Serialize)]
pub struct Snapshot<'a> {
    pub field: Field,
    pub ship: &'a Ship,
    pub obstacles: &'a [Obstacle],
    pub collectibles: &'a [Collectible],
    pub particles: &'a [Particle],
    /// Events from the most recent tick
    pub events: &'a [GameEvent],
    pub status: Status,
}

impl GameState {
    pub fn status(&self) -> Status {
        let now = self.clock.now_ms();
        Status {
            phase: self.phase,
            score: self.score,
            multiplier: self.score_multiplier,
            survival_ms: now,
            survival_time: format_survival_time(now),
            started: self.is_started(),
            paused: self.is_paused(),
            game_over: self.is_game_over(),
            speed_bonus_remaining_ms: self.effects.speed_bonus_remaining_ms(now),
            shield_active: self.effects.shield_active,
            shield_opacity: self.effects.shield_opacity,
            difficulty: self.difficulty(),
        }
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            field: self.field,
            ship: &self.ship,
            obstacles: &self.obstacles,
            collectibles: &self.collectibles,
            particles: &self.particles,
            events: &self.events,
            status: self.status(),
        }
    }
}

/// Format milliseconds as zero-padded `MM:SS` (minutes keep growing past 99)
pub fn format_survival_time(ms: f64) -> String {
    let total_secs = (ms.max(0.0) / 1000.0).floor() as u64;
    format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
}
