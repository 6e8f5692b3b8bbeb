//! Host frame driver
//!
//! Hosts call [`Driver::frame`] with their own timestamps (animation frames,
//! a headless loop, tests). The driver clamps the delta, runs the fixed-step
//! simulation through an accumulator and hands queued input signals to the
//! first step only.

use glam::Vec2;

use crate::config::Config;
use crate::consts::{MAX_FRAME_MS, MAX_SUBSTEPS, SIM_DT_MS};
use crate::sim::{Field, GameEvent, GameState, Snapshot, TickInput, tick};

/// Owns one session and paces it from host frames
#[derive(Debug, Clone)]
pub struct Driver {
    state: GameState,
    input: TickInput,
    accumulator: f64,
    last_time: Option<f64>,
    running: bool,
    /// Events from every step of the latest frame
    frame_events: Vec<GameEvent>,
}

impl Driver {
    pub fn new(seed: u64, config: Config, field: Field) -> Self {
        Self {
            state: GameState::new(seed, config, field),
            input: TickInput::default(),
            accumulator: 0.0,
            last_time: None,
            running: false,
            frame_events: Vec::new(),
        }
    }

    /// Begin accepting frames; the next frame only records its timestamp
    pub fn start(&mut self) {
        self.running = true;
        self.last_time = None;
        self.accumulator = 0.0;
        log::debug!("Driver started");
    }

    /// Stop accepting frames
    pub fn stop(&mut self) {
        self.running = false;
        self.last_time = None;
        self.accumulator = 0.0;
        log::debug!("Driver stopped");
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn begin(&mut self) {
        self.input.begin = true;
    }

    pub fn toggle_or_restart(&mut self) {
        self.input.toggle_or_restart = true;
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) {
        self.input.pointer = Some(Vec2::new(x, y));
    }

    pub fn focus_lost(&mut self) {
        self.input.focus_lost = true;
    }

    pub fn viewport_resize(&mut self, width: f32, height: f32) {
        self.input.resize = Some((width, height));
    }

    /// Advance by the time since the previous frame
    ///
    /// Returns the number of fixed steps run.
    pub fn frame(&mut self, host_ms: f64) -> u32 {
        self.frame_events.clear();
        if !self.running {
            return 0;
        }
        let Some(last) = self.last_time.replace(host_ms) else {
            return 0;
        };

        let dt = (host_ms - last).clamp(0.0, MAX_FRAME_MS);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT_MS && substeps < MAX_SUBSTEPS {
            tick(&mut self.state, &self.input, SIM_DT_MS);
            self.accumulator -= SIM_DT_MS;
            substeps += 1;
            self.frame_events.extend(self.state.events.iter().cloned());

            // Clear one-shot inputs after processing
            self.input = TickInput::default();
        }
        substeps
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        self.state.snapshot()
    }

    pub fn frame_events(&self) -> &[GameEvent] {
        &self.frame_events
    }
}
