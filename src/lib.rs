//! Astro Dodge - arcade survival simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, lifecycles, collisions, scoring)
//! - `driver`: Host-facing frame loop around the fixed-step `tick`
//! - `config`: Injected tuning values

pub mod config;
pub mod driver;
pub mod sim;

pub use config::{Config, ConfigError};
pub use driver::Driver;

use glam::Vec2;

/// Frame pacing constants
pub mod consts {
    /// Fixed simulation timestep in milliseconds (one reference frame at 60 Hz)
    pub const SIM_DT_MS: f64 = 1000.0 / 60.0;
    /// Maximum substeps per host frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Host frame deltas above this are clamped (tab switches, debugger stops)
    pub const MAX_FRAME_MS: f64 = 100.0;
}

/// Unit vector at angle `theta` (radians)
#[inline]
pub fn direction(theta: f32) -> Vec2 {
    Vec2::new(theta.cos(), theta.sin())
}

/// Whether two circles overlap (strictly closer than the summed radii)
#[inline]
pub fn circles_overlap(a: Vec2, a_radius: f32, b: Vec2, b_radius: f32) -> bool {
    a.distance(b) < a_radius + b_radius
}

/// Pack an RGB color as `0xRRGGBB`
#[inline]
pub const fn rgb(r: u8, g: u8, b: u8) -> u32 {
    ((r as u32) << 16) | ((g as u32) << 8) | b as u32
}
