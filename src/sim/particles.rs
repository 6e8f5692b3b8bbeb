//! Event-driven visual particles
//!
//! Particles never affect gameplay. They are appended when the shield absorbs
//! an obstacle, when the shield breaks and when a collectible is picked up,
//! then drift and fade until their alpha runs out.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::GameState;
use crate::config::Config;
use crate::{direction, rgb};

/// Particle appearance class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleKind {
    /// Small spark that drifts outward
    Debris,
    /// Large static glow at an impact point; fades faster than debris
    Flash,
}

/// A visual particle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    /// Packed `0xRRGGBB`
    pub color: u32,
    /// 1 = opaque, removed at 0
    pub alpha: f32,
    pub rotation: f32,
    pub kind: ParticleKind,
}

const PICKUP_PARTICLE_COUNT: usize = 12;
const PICKUP_PARTICLE_SPEED: f32 = 5.0;
const PICKUP_PARTICLE_SIZE: f32 = 8.0;

const DEBRIS_PARTICLE_COUNT: usize = 15;
const DEBRIS_PARTICLE_SPEED: f32 = 6.0;
const EXPLOSION_COLORS: [u32; 3] = [
    rgb(0xff, 0x41, 0x36),
    rgb(0xff, 0x85, 0x1b),
    rgb(0xff, 0xdc, 0x00),
];
const FLASH_ALPHA: f32 = 0.8;
const FLASH_SCALE: f32 = 1.5;
const FLASH_COLOR: u32 = rgb(0xff, 0xff, 0xff);

const SHIELD_BREAK_PARTICLE_COUNT: usize = 20;
const SHIELD_BREAK_PARTICLE_SPEED: f32 = 8.0;
const SHIELD_BREAK_PARTICLE_SIZE: f32 = 3.0;
const SHIELD_BREAK_COLORS: [u32; 3] = [
    rgb(0x41, 0x69, 0xe1),
    rgb(0x00, 0xff, 0xff),
    rgb(0xff, 0xff, 0xff),
];

/// Shape of a radial burst
struct Ring<'a> {
    count: usize,
    speed: f32,
    /// Speed factor band
    speed_band: (f32, f32),
    size: f32,
    /// Size factor band
    size_band: (f32, f32),
    palette: &'a [u32],
}

fn in_band(rng: &mut impl Rng, (lo, hi): (f32, f32)) -> f32 {
    lo + rng.random::<f32>() * (hi - lo)
}

/// Append `ring.count` debris particles on evenly spaced headings around `pos`
fn emit_ring(state: &mut GameState, pos: Vec2, ring: Ring<'_>) {
    let rng = &mut state.rng;
    for i in 0..ring.count {
        let angle = TAU * i as f32 / ring.count as f32;
        let speed = ring.speed * in_band(rng, ring.speed_band);
        let size = ring.size * in_band(rng, ring.size_band);
        let color = match ring.palette {
            [single] => *single,
            palette => palette[rng.random_range(0..palette.len())],
        };
        state.particles.push(Particle {
            pos,
            vel: direction(angle) * speed,
            size,
            color,
            alpha: 1.0,
            rotation: rng.random::<f32>() * TAU,
            kind: ParticleKind::Debris,
        });
    }
    enforce_cap(&mut state.particles, state.config.max_particles);
}

/// Burst in the effect's color where a collectible was picked up
pub fn emit_pickup_burst(state: &mut GameState, pos: Vec2, color: u32) {
    emit_ring(
        state,
        pos,
        Ring {
            count: PICKUP_PARTICLE_COUNT,
            speed: PICKUP_PARTICLE_SPEED,
            speed_band: (0.5, 1.0),
            size: PICKUP_PARTICLE_SIZE,
            size_band: (0.5, 1.0),
            palette: &[color],
        },
    );
}

/// Explosion debris plus a white flash where the shield destroyed an obstacle
pub fn emit_destruction_burst(state: &mut GameState, pos: Vec2, obstacle_size: f32) {
    emit_ring(
        state,
        pos,
        Ring {
            count: DEBRIS_PARTICLE_COUNT,
            speed: DEBRIS_PARTICLE_SPEED,
            speed_band: (0.8, 1.2),
            size: obstacle_size / 4.0,
            size_band: (0.5, 1.0),
            palette: &EXPLOSION_COLORS,
        },
    );
    state.particles.push(Particle {
        pos,
        vel: Vec2::ZERO,
        size: obstacle_size * FLASH_SCALE,
        color: FLASH_COLOR,
        alpha: FLASH_ALPHA,
        rotation: 0.0,
        kind: ParticleKind::Flash,
    });
    enforce_cap(&mut state.particles, state.config.max_particles);
}

/// Shards around the ship when its shield is used up
pub fn emit_shield_break(state: &mut GameState, pos: Vec2) {
    emit_ring(
        state,
        pos,
        Ring {
            count: SHIELD_BREAK_PARTICLE_COUNT,
            speed: SHIELD_BREAK_PARTICLE_SPEED,
            speed_band: (0.8, 1.2),
            size: SHIELD_BREAK_PARTICLE_SIZE,
            size_band: (0.8, 1.2),
            palette: &SHIELD_BREAK_COLORS,
        },
    );
}

/// Drop the oldest particles beyond `max`
fn enforce_cap(particles: &mut Vec<Particle>, max: usize) {
    if particles.len() > max {
        let excess = particles.len() - max;
        particles.drain(..excess);
    }
}

/// Drift, spin and fade every particle; prune the invisible ones
pub fn update_particles(particles: &mut Vec<Particle>, config: &Config, step: f32) {
    for particle in particles.iter_mut() {
        particle.pos += particle.vel * step;
        particle.rotation += config.particle_spin * step;
        let decay = match particle.kind {
            ParticleKind::Debris => config.particle_decay,
            ParticleKind::Flash => config.particle_decay * config.flash_decay_factor,
        };
        particle.alpha -= decay * step;
    }
    particles.retain(|p| p.alpha > 0.0);
}
