//! Ship-versus-obstacle collision resolution
//!
//! Obstacles are checked newest first. The hit radius is a third of the
//! obstacle's hazard size, which keeps grazing passes survivable. A held shield
//! absorbs exactly one hit per tick; otherwise the hit ends the session.

use super::particles::{emit_destruction_burst, emit_shield_break};
use super::state::{EntityId, GameEvent, GameState};

/// Outcome of checking the ship against every obstacle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionOutcome {
    /// Nothing touched the ship
    Clear,
    /// The shield destroyed the obstacle
    Absorbed(EntityId),
    /// Unshielded hit
    Fatal(EntityId),
}

impl CollisionOutcome {
    pub fn is_fatal(&self) -> bool {
        matches!(self, CollisionOutcome::Fatal(_))
    }
}

/// Find the first obstacle touching the ship, newest first
///
/// Black holes outside their stable phase are skipped.
pub fn find_hit(state: &GameState) -> Option<usize> {
    let ship = &state.ship;
    state
        .obstacles
        .iter()
        .enumerate()
        .rev()
        .find(|(_, obstacle)| {
            obstacle.hazard_size().is_some_and(|size| {
                ship.pos.distance(obstacle.pos) < ship.radius + size / 3.0
            })
        })
        .map(|(index, _)| index)
}

/// Resolve at most one obstacle hit against the ship
///
/// The phase change on a fatal hit is left to the caller.
pub fn resolve_obstacle_hits(state: &mut GameState) -> CollisionOutcome {
    let Some(index) = find_hit(state) else {
        return CollisionOutcome::Clear;
    };

    let ship_pos = state.ship.pos;
    let (id, pos, size) = {
        let obstacle = &state.obstacles[index];
        (obstacle.id, obstacle.pos, obstacle.size)
    };

    if state.effects.shield_active {
        state.obstacles.remove(index);
        state.effects.shield_active = false;
        state.effects.shield_opacity = 0.0;
        emit_shield_break(state, ship_pos);
        emit_destruction_burst(state, pos, size);
        state.events.push(GameEvent::ShieldBroken { pos: ship_pos });
        state.events.push(GameEvent::ObstacleAbsorbed { id, pos });
        log::debug!("Shield absorbed obstacle #{id}");
        CollisionOutcome::Absorbed(id)
    } else {
        state.events.push(GameEvent::FatalCollision { id, pos });
        CollisionOutcome::Fatal(id)
    }
}
