//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only, all timers in simulation time
//! - Seeded RNG only
//! - Stable iteration order (insertion order, stable entity ids)
//! - No rendering or platform dependencies

pub mod clock;
pub mod collectibles;
pub mod collision;
pub mod difficulty;
pub mod obstacles;
pub mod particles;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use clock::{SimClock, SpawnTimer};
pub use collectibles::{Collectible, EFFECT_TABLE, Effect};
pub use collision::CollisionOutcome;
pub use difficulty::{difficulty_multiplier, spawn_interval_ms, speed_range};
pub use obstacles::{BlackHolePhase, Obstacle, ObstacleClass, ObstacleKind};
pub use particles::{Particle, ParticleKind};
pub use snapshot::{Snapshot, Status, format_survival_time};
pub use state::{ActiveEffects, EntityId, Field, GameEvent, GameState, SessionPhase, Ship};
pub use tick::{TickInput, tick};
