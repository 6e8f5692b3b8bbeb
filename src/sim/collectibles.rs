//! Power-up pickups
//!
//! One collectible appears on a fixed timer at a random in-field position and
//! stays until the ship touches it. Its effect is drawn uniformly from
//! [`EFFECT_TABLE`].

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::particles::emit_pickup_burst;
use super::state::{EntityId, GameEvent, GameState};
use crate::{circles_overlap, rgb};

/// What a collectible does when picked up
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "effect", content = "value")]
pub enum Effect {
    /// Points, scaled by the current multiplier
    Score(u32),
    /// Multiplier factor; the session multiplier grows by `factor - 1`
    Multiplier(f32),
    /// Temporary obstacle slow-down
    SpeedBoost,
    /// One-charge collision shield
    Shield,
}

impl Effect {
    /// Aura and particle color
    pub fn color(&self) -> u32 {
        match self {
            Effect::Score(_) => rgb(0xff, 0xd7, 0x00),
            Effect::Multiplier(_) => rgb(0xff, 0x00, 0xff),
            Effect::SpeedBoost => rgb(0x00, 0xff, 0xff),
            Effect::Shield => rgb(0x41, 0x69, 0xe1),
        }
    }
}

/// Effects a spawned collectible is drawn from, uniformly
pub const EFFECT_TABLE: [Effect; 7] = [
    Effect::Score(100),
    Effect::Score(200),
    Effect::Score(300),
    Effect::Score(500),
    Effect::Multiplier(1.5),
    Effect::SpeedBoost,
    Effect::Shield,
];

/// A pickup waiting on the field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collectible {
    pub id: EntityId,
    pub pos: Vec2,
    pub effect: Effect,
    /// Sprite rotation (cosmetic)
    pub rotation: f32,
    /// Aura rotation (cosmetic)
    pub aura_rotation: f32,
    /// Aura pulse scale (cosmetic)
    pub aura_scale: f32,
}

/// Place a new collectible at a random position inside the field margin
pub fn spawn_collectible(state: &mut GameState) -> EntityId {
    let GameState {
        rng,
        config,
        field,
        ids,
        collectibles,
        events,
        ..
    } = state;

    let effect = EFFECT_TABLE[rng.random_range(0..EFFECT_TABLE.len())];
    let (u, v) = (rng.random::<f32>(), rng.random::<f32>());
    let pos = field.inset_point(config.collectible_size, u, v);

    let id = ids.next_id();
    collectibles.push(Collectible {
        id,
        pos,
        effect,
        rotation: rng.random::<f32>() * TAU,
        aura_rotation: rng.random::<f32>() * TAU,
        aura_scale: config.aura_min_scale,
    });
    events.push(GameEvent::CollectibleSpawned { id, effect });
    log::debug!("Spawned collectible #{id} ({effect:?})");
    id
}

/// Advance the aura spin and pulse of every collectible
pub fn animate_collectibles(state: &mut GameState, step: f32) {
    let config = &state.config;
    let pulse = ((state.clock.now_ms() as f32 * config.aura_pulse_speed).sin() + 1.0) / 2.0;
    let scale = config.aura_min_scale + pulse * (config.aura_max_scale - config.aura_min_scale);

    for collectible in &mut state.collectibles {
        collectible.aura_rotation += config.aura_rotation_speed * step;
        collectible.aura_scale = scale;
    }
}

/// Apply a picked-up effect to the session
pub fn apply_effect(state: &mut GameState, effect: Effect) {
    match effect {
        Effect::Score(points) => state.add_score(points),
        Effect::Multiplier(factor) => {
            state.score_multiplier += factor - 1.0;
        }
        Effect::SpeedBoost => {
            // Re-pickup while active only moves the end time
            let until = state.clock.now_ms() + state.config.speed_bonus_duration_ms;
            state.effects.speed_bonus_until = Some(until);
        }
        Effect::Shield => {
            if !state.effects.shield_active {
                state.effects.shield_active = true;
                state.effects.shield_opacity = 0.0;
            }
        }
    }
}

/// Collect every collectible the ship currently touches
///
/// Returns the number picked up.
pub fn collect_pickups(state: &mut GameState) -> usize {
    let ship_pos = state.ship.pos;
    let ship_radius = state.ship.radius;
    let pickup_radius = state.config.collectible_size / 2.0;

    let mut picked = Vec::new();
    state.collectibles.retain(|collectible| {
        if circles_overlap(ship_pos, ship_radius, collectible.pos, pickup_radius) {
            picked.push((collectible.id, collectible.pos, collectible.effect));
            false
        } else {
            true
        }
    });

    for &(id, pos, effect) in &picked {
        emit_pickup_burst(state, pos, effect.color());
        apply_effect(state, effect);
        state
            .events
            .push(GameEvent::CollectiblePicked { id, effect, pos });
        log::debug!("Picked up collectible #{id} ({effect:?})");
    }
    picked.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::sim::state::Field;

    fn state() -> GameState {
        let mut state = GameState::new(3, Config::default(), Field::new(800.0, 600.0));
        state.begin_session();
        state
    }

    fn place(state: &mut GameState, pos: Vec2, effect: Effect) -> EntityId {
        let id = state.ids.next_id();
        state.collectibles.push(Collectible {
            id,
            pos,
            effect,
            rotation: 0.0,
            aura_rotation: 0.0,
            aura_scale: 1.2,
        });
        id
    }

    #[test]
    fn test_score_effect_uses_multiplier() {
        let mut state = state();
        apply_effect(&mut state, Effect::Score(100));
        assert_eq!(state.score, 100);

        state.score = 0;
        state.score_multiplier = 1.5;
        apply_effect(&mut state, Effect::Score(100));
        assert_eq!(state.score, 150);
    }

    #[test]
    fn test_multiplier_effect_adds_half() {
        let mut state = state();
        apply_effect(&mut state, Effect::Multiplier(1.5));
        assert_eq!(state.score_multiplier, 1.5);
        apply_effect(&mut state, Effect::Multiplier(1.5));
        assert_eq!(state.score_multiplier, 2.0);
    }

    #[test]
    fn test_speed_boost_refreshes_window() {
        let mut state = state();
        state.clock.advance(1000.0);
        apply_effect(&mut state, Effect::SpeedBoost);
        assert_eq!(state.effects.speed_bonus_until, Some(6000.0));

        state.clock.advance(3000.0);
        apply_effect(&mut state, Effect::SpeedBoost);
        assert_eq!(state.effects.speed_bonus_until, Some(9000.0));
        assert!(state.speed_bonus_active());
    }

    #[test]
    fn test_shield_does_not_stack() {
        let mut state = state();
        apply_effect(&mut state, Effect::Shield);
        assert!(state.effects.shield_active);
        state.effects.shield_opacity = 0.4;
        apply_effect(&mut state, Effect::Shield);
        assert!(state.effects.shield_active);
        // Already held: fade-in is not restarted
        assert_eq!(state.effects.shield_opacity, 0.4);
    }

    #[test]
    fn test_pickup_radius() {
        let mut state = state();
        let ship = state.ship.pos;
        let reach = state.ship.radius + state.config.collectible_size / 2.0;

        let near = place(&mut state, ship + Vec2::new(reach - 0.5, 0.0), Effect::Score(200));
        let far = place(&mut state, ship + Vec2::new(reach + 0.5, 0.0), Effect::Score(500));
        assert_eq!(collect_pickups(&mut state), 1);

        assert_eq!(state.score, 200);
        assert_eq!(state.collectibles.len(), 1);
        assert_eq!(state.collectibles[0].id, far);
        assert!(state.events.contains(&GameEvent::CollectiblePicked {
            id: near,
            effect: Effect::Score(200),
            pos: ship + Vec2::new(reach - 0.5, 0.0),
        }));
        assert_eq!(state.particles.len(), 12);
    }

    #[test]
    fn test_spawn_inside_margin() {
        let mut state = state();
        for _ in 0..200 {
            spawn_collectible(&mut state);
        }
        let margin = state.config.collectible_size;
        for collectible in &state.collectibles {
            assert!(collectible.pos.x >= margin && collectible.pos.x <= 800.0 - margin);
            assert!(collectible.pos.y >= margin && collectible.pos.y <= 600.0 - margin);
            assert!(EFFECT_TABLE.contains(&collectible.effect));
        }
        // Uniform table: every entry shows up in 200 draws
        for effect in EFFECT_TABLE {
            assert!(state.collectibles.iter().any(|c| c.effect == effect));
        }
    }

    #[test]
    fn test_spawn_on_tiny_field_stays_inside() {
        let mut state = state();
        state.resize(60.0, 50.0);
        for _ in 0..20 {
            spawn_collectible(&mut state);
        }
        for collectible in &state.collectibles {
            assert_eq!(collectible.pos, Vec2::new(30.0, 25.0));
        }
    }

    #[test]
    fn test_aura_pulse_stays_in_band() {
        let mut state = state();
        spawn_collectible(&mut state);
        let start = state.collectibles[0].aura_rotation;
        for _ in 0..100 {
            state.clock.advance(37.0);
            animate_collectibles(&mut state, 1.0);
            let scale = state.collectibles[0].aura_scale;
            assert!((1.2 - 1e-5..=1.4 + 1e-5).contains(&scale));
        }
        assert!((state.collectibles[0].aura_rotation - start - 2.0).abs() < 1e-3);
    }
}
