//! Fixed timestep simulation tick
//!
//! Advances one session by `dt_ms` of simulation time. Order within a running
//! tick: clock, spawns, ship, obstacles, collectibles, collisions, particles.

use glam::Vec2;

use super::collectibles::{animate_collectibles, collect_pickups, spawn_collectible};
use super::collision::{CollisionOutcome, resolve_obstacle_hits};
use super::difficulty::spawn_interval_ms;
use super::obstacles::{advance_obstacles, spawn_obstacle};
use super::particles::update_particles;
use super::state::{GameEvent, GameState, SessionPhase};

/// Input signals for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Start a session (click or key while not started)
    pub begin: bool,
    /// Pause toggle, or restart once the game is over
    pub toggle_or_restart: bool,
    /// Latest pointer position in field coordinates
    pub pointer: Option<Vec2>,
    /// Host window lost focus
    pub focus_lost: bool,
    /// New viewport size
    pub resize: Option<(f32, f32)>,
}

/// Advance the game state by one step of `dt_ms` milliseconds
pub fn tick(state: &mut GameState, input: &TickInput, dt_ms: f64) {
    state.events.clear();

    if let Some((width, height)) = input.resize {
        state.resize(width, height);
    }
    if let Some(pointer) = input.pointer {
        state.target = pointer;
    }

    match state.phase {
        SessionPhase::NotStarted => {
            if input.begin || input.toggle_or_restart {
                state.begin_session();
                return;
            }
        }
        SessionPhase::GameOver => {
            if input.toggle_or_restart {
                state.begin_session();
                return;
            }
        }
        SessionPhase::Running => {
            if input.toggle_or_restart || input.focus_lost {
                state.phase = SessionPhase::Paused;
                state.events.push(GameEvent::Paused);
                log::info!("Paused at {:.1}s", state.survival_ms() / 1000.0);
            }
        }
        SessionPhase::Paused => {
            // Focus loss never resumes
            if input.toggle_or_restart && !input.focus_lost {
                state.phase = SessionPhase::Running;
                state.events.push(GameEvent::Resumed);
                log::info!("Resumed");
            }
        }
    }

    if state.phase != SessionPhase::Running {
        return;
    }

    let step = (dt_ms / state.config.frame_ms) as f32;
    state.clock.advance(dt_ms);
    let now = state.clock.now_ms();

    // Spawning
    let multiplier = state.difficulty();
    let interval = spawn_interval_ms(multiplier, &state.config);
    if state.obstacle_timer.fire(now, interval) {
        spawn_obstacle(state, multiplier);
    }
    let collectible_interval = state.config.collectible_interval_ms;
    if state.collectible_timer.fire(now, collectible_interval) {
        spawn_collectible(state);
    }

    // Ship
    let GameState {
        ship,
        target,
        field,
        config,
        effects,
        ..
    } = state;
    ship.steer(*target, *field, config, step);
    if effects.shield_active {
        effects.shield_opacity =
            (effects.shield_opacity + config.shield_fade_speed * step).min(config.shield_max_opacity);
    }
    if effects.speed_bonus_until.is_some() && !effects.speed_bonus_active(now) {
        effects.speed_bonus_until = None;
        log::debug!("Speed bonus expired");
    }

    advance_obstacles(state, step);
    animate_collectibles(state, step);

    // Collisions: pickups first, then at most one obstacle
    collect_pickups(state);
    if let CollisionOutcome::Fatal(id) = resolve_obstacle_hits(state) {
        state.phase = SessionPhase::GameOver;
        log::info!(
            "Game over: hit by #{id} after {:.1}s, score {}",
            state.survival_ms() / 1000.0,
            state.score
        );
        return;
    }

    update_particles(&mut state.particles, &state.config, step);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::consts::SIM_DT_MS;
    use crate::sim::collectibles::{Collectible, Effect};
    use crate::sim::obstacles::{Obstacle, ObstacleKind};
    use crate::sim::state::{EntityId, Field};

    fn new_state(seed: u64) -> GameState {
        GameState::new(seed, Config::default(), Field::new(800.0, 600.0))
    }

    fn begin() -> TickInput {
        TickInput {
            begin: true,
            ..Default::default()
        }
    }

    fn toggle() -> TickInput {
        TickInput {
            toggle_or_restart: true,
            ..Default::default()
        }
    }

    fn running_state(seed: u64) -> GameState {
        let mut state = new_state(seed);
        tick(&mut state, &begin(), SIM_DT_MS);
        assert_eq!(state.phase, SessionPhase::Running);
        state
    }

    fn asteroid_at(state: &mut GameState, pos: Vec2) -> EntityId {
        let id = state.ids.next_id();
        state.obstacles.push(Obstacle {
            id,
            pos,
            size: 50.0,
            rotation: 0.0,
            rotation_speed: 0.0,
            kind: ObstacleKind::Asteroid { vel: Vec2::ZERO },
        });
        id
    }

    #[test]
    fn test_idle_until_begin() {
        let mut state = new_state(1);
        for _ in 0..10 {
            tick(&mut state, &TickInput::default(), SIM_DT_MS);
        }
        assert_eq!(state.phase, SessionPhase::NotStarted);
        assert_eq!(state.survival_ms(), 0.0);

        // The starting tick only resets
        tick(&mut state, &begin(), SIM_DT_MS);
        assert_eq!(state.phase, SessionPhase::Running);
        assert_eq!(state.survival_ms(), 0.0);
        assert_eq!(state.events, vec![GameEvent::SessionStarted]);

        tick(&mut state, &TickInput::default(), SIM_DT_MS);
        assert_eq!(state.survival_ms(), SIM_DT_MS);
    }

    #[test]
    fn test_toggle_starts_when_not_started() {
        let mut state = new_state(1);
        tick(&mut state, &toggle(), SIM_DT_MS);
        assert_eq!(state.phase, SessionPhase::Running);
    }

    #[test]
    fn test_difficulty_after_ten_seconds() {
        let mut state = running_state(2);
        for _ in 0..100 {
            tick(&mut state, &TickInput::default(), 100.0);
            state.obstacles.clear();
        }
        assert_eq!(state.survival_ms(), 10_000.0);
        assert!((state.difficulty() - 1.2).abs() < 1e-6);
        let interval = spawn_interval_ms(state.difficulty(), &state.config);
        assert!((interval - 1666.67).abs() < 0.01);
    }

    #[test]
    fn test_first_obstacle_after_full_interval() {
        let mut state = running_state(3);
        for _ in 0..20 {
            tick(&mut state, &TickInput::default(), 100.0);
        }
        // Exactly 2000ms is not yet more than the interval
        assert!(state.obstacles.is_empty());
        tick(&mut state, &TickInput::default(), 100.0);
        assert!(!state.obstacles.is_empty());
        assert!(
            state
                .events
                .iter()
                .any(|e| matches!(e, GameEvent::ObstacleSpawned { .. }))
        );
    }

    #[test]
    fn test_fatal_collision_ends_session() {
        let mut state = running_state(4);
        let ship = state.ship.pos;
        let id = asteroid_at(&mut state, ship);

        tick(&mut state, &TickInput::default(), SIM_DT_MS);
        assert_eq!(state.phase, SessionPhase::GameOver);
        assert!(state.is_paused());
        assert!(state.is_game_over());
        assert!(state.events.contains(&GameEvent::FatalCollision { id, pos: ship }));

        // Frozen afterwards
        let survival = state.survival_ms();
        tick(&mut state, &TickInput::default(), SIM_DT_MS);
        assert_eq!(state.survival_ms(), survival);
    }

    #[test]
    fn test_shield_saves_the_ship() {
        let mut state = running_state(5);
        let ship = state.ship.pos;
        let id = asteroid_at(&mut state, ship);
        state.effects.shield_active = true;

        tick(&mut state, &TickInput::default(), SIM_DT_MS);
        assert_eq!(state.phase, SessionPhase::Running);
        assert!(state.obstacles.is_empty());
        assert!(!state.effects.shield_active);
        assert!(state.events.contains(&GameEvent::ObstacleAbsorbed { id, pos: ship }));
    }

    #[test]
    fn test_pickup_then_collision_same_tick() {
        let mut state = running_state(6);
        let ship = state.ship.pos;
        let collectible = state.ids.next_id();
        state.collectibles.push(Collectible {
            id: collectible,
            pos: ship,
            effect: Effect::Shield,
            rotation: 0.0,
            aura_rotation: 0.0,
            aura_scale: 1.2,
        });
        asteroid_at(&mut state, ship);

        // The shield picked up this tick absorbs the hit
        tick(&mut state, &TickInput::default(), SIM_DT_MS);
        assert_eq!(state.phase, SessionPhase::Running);
        assert!(state.collectibles.is_empty());
        assert!(state.obstacles.is_empty());
        assert!(!state.effects.shield_active);
    }

    #[test]
    fn test_restart_resets_session() {
        let mut state = running_state(7);
        for _ in 0..30 {
            tick(&mut state, &TickInput::default(), SIM_DT_MS);
        }
        state.score = 1234;
        state.score_multiplier = 2.5;
        state.effects.speed_bonus_until = Some(state.survival_ms() + 1000.0);
        let ship = state.ship.pos;
        asteroid_at(&mut state, ship);
        tick(&mut state, &TickInput::default(), SIM_DT_MS);
        assert!(state.is_game_over());

        // A click does not restart a finished game
        tick(&mut state, &begin(), SIM_DT_MS);
        assert!(state.is_game_over());

        tick(&mut state, &toggle(), SIM_DT_MS);
        assert_eq!(state.phase, SessionPhase::Running);
        assert_eq!(state.score, 0);
        assert_eq!(state.score_multiplier, 1.0);
        assert_eq!(state.survival_ms(), 0.0);
        assert!(state.obstacles.is_empty());
        assert!(state.collectibles.is_empty());
        assert!(state.particles.is_empty());
        assert!(!state.effects.shield_active);
        assert_eq!(state.effects.speed_bonus_until, None);
        assert_eq!(state.ship.pos, state.field.center());
    }

    #[test]
    fn test_pause_toggle_round_trip() {
        let mut state = running_state(8);
        for _ in 0..10 {
            tick(&mut state, &TickInput::default(), SIM_DT_MS);
        }
        tick(&mut state, &toggle(), SIM_DT_MS);
        assert_eq!(state.phase, SessionPhase::Paused);
        assert_eq!(state.events, vec![GameEvent::Paused]);
        let frozen = state.survival_ms();

        for _ in 0..100 {
            tick(&mut state, &TickInput::default(), SIM_DT_MS);
        }
        assert_eq!(state.survival_ms(), frozen);

        // Resume tick advances normally
        tick(&mut state, &toggle(), SIM_DT_MS);
        assert_eq!(state.phase, SessionPhase::Running);
        assert_eq!(state.events.first(), Some(&GameEvent::Resumed));
        assert_eq!(state.survival_ms(), frozen + SIM_DT_MS);
    }

    #[test]
    fn test_pause_freezes_entities() {
        let mut state = running_state(9);
        let id = state.ids.next_id();
        state.obstacles.push(Obstacle {
            id,
            pos: Vec2::new(10.0, 10.0),
            size: 40.0,
            rotation: 0.0,
            rotation_speed: 0.03,
            kind: ObstacleKind::Asteroid {
                vel: Vec2::new(1.0, 0.0),
            },
        });
        state.effects.speed_bonus_until = Some(state.survival_ms() + 500.0);
        tick(&mut state, &toggle(), SIM_DT_MS);

        let before = state.obstacles.clone();
        let remaining = state.effects.speed_bonus_remaining_ms(state.survival_ms());
        for _ in 0..600 {
            tick(&mut state, &TickInput::default(), SIM_DT_MS);
        }
        assert_eq!(state.obstacles, before);
        assert_eq!(
            state.effects.speed_bonus_remaining_ms(state.survival_ms()),
            remaining
        );
    }

    #[test]
    fn test_focus_lost_never_resumes() {
        let mut state = running_state(10);
        let focus_lost = TickInput {
            focus_lost: true,
            ..Default::default()
        };
        tick(&mut state, &focus_lost, SIM_DT_MS);
        assert_eq!(state.phase, SessionPhase::Paused);

        tick(&mut state, &focus_lost, SIM_DT_MS);
        assert_eq!(state.phase, SessionPhase::Paused);
        assert!(state.events.is_empty());

        let both = TickInput {
            focus_lost: true,
            toggle_or_restart: true,
            ..Default::default()
        };
        tick(&mut state, &both, SIM_DT_MS);
        assert_eq!(state.phase, SessionPhase::Paused);
    }

    #[test]
    fn test_pointer_steers_ship() {
        let mut state = running_state(11);
        let start = state.ship.pos;
        let input = TickInput {
            pointer: Some(Vec2::new(700.0, 300.0)),
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT_MS);
        assert_eq!(state.target, Vec2::new(700.0, 300.0));
        // Pointer is sticky
        for _ in 0..30 {
            tick(&mut state, &TickInput::default(), SIM_DT_MS);
        }
        assert!(state.ship.pos.x > start.x);
    }

    #[test]
    fn test_shield_fades_in() {
        let mut state = running_state(12);
        state.effects.shield_active = true;
        tick(&mut state, &TickInput::default(), SIM_DT_MS);
        assert!((state.effects.shield_opacity - 0.05).abs() < 1e-5);
        for _ in 0..20 {
            tick(&mut state, &TickInput::default(), SIM_DT_MS);
        }
        assert_eq!(state.effects.shield_opacity, 0.4);
    }

    #[test]
    fn test_resize_applies_before_steering() {
        let mut state = running_state(13);
        let input = TickInput {
            resize: Some((200.0, 150.0)),
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT_MS);
        assert_eq!(state.field, Field::new(200.0, 150.0));
        assert!(state.ship.pos.x <= 160.0);
        assert!(state.ship.pos.y <= 110.0);
    }

    #[test]
    fn test_same_seed_same_run() {
        let run = |seed: u64| {
            let mut state = running_state(seed);
            for i in 0..3000u32 {
                let t = i as f32 * 0.01;
                let input = TickInput {
                    pointer: Some(Vec2::new(400.0 + t.cos() * 250.0, 300.0 + t.sin() * 200.0)),
                    ..Default::default()
                };
                tick(&mut state, &input, SIM_DT_MS);
            }
            state
        };

        let a = run(42);
        let b = run(42);
        assert_eq!(a.phase, b.phase);
        assert_eq!(a.score, b.score);
        assert_eq!(a.survival_ms(), b.survival_ms());
        assert_eq!(a.ship.pos, b.ship.pos);
        assert_eq!(a.obstacles, b.obstacles);
        assert_eq!(a.collectibles, b.collectibles);
        assert_eq!(a.particles, b.particles);
    }

    #[test]
    fn test_forked_state_replays_identically() {
        let mut state = running_state(21);
        for _ in 0..500 {
            tick(&mut state, &TickInput::default(), SIM_DT_MS);
        }
        let mut fork = state.clone();
        for _ in 0..500 {
            tick(&mut state, &TickInput::default(), SIM_DT_MS);
            tick(&mut fork, &TickInput::default(), SIM_DT_MS);
        }
        assert_eq!(state.obstacles, fork.obstacles);
        assert_eq!(state.score, fork.score);
        assert_eq!(state.phase, fork.phase);
    }
}
