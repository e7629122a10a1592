//! Orb Field - bouncing-orb background for the landing page
//!
//! Core modules:
//! - `sim`: Deterministic simulation (orb store, stepper, collisions)
//! - `render`: Renderer binding (surface trait, transforms, pulses)
//! - `lifecycle`: Start/stop state machine driving sim + render per frame
//! - `cursor`: Page-wide mouse-follow element (init-once singleton)
//! - `config`: Tunables with documented defaults
//! - `web`: Browser host (wasm32 only)

pub mod config;
pub mod cursor;
pub mod lifecycle;
pub mod render;
pub mod sim;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use config::{ConfigError, FieldConfig};
pub use lifecycle::{LoopPhase, OrbField};
pub use render::{HeadlessSurface, OrbRenderer, OrbSurface, OrbTransform};
pub use sim::{Bounds, Orb, OrbEvent, OrbStore};

use glam::Vec2;

/// Compiled-in defaults (see `FieldConfig` for the tunable copies)
pub mod consts {
    /// Orbs per session
    pub const ORB_COUNT: usize = 12;
    /// Hard cap on orbs (pairwise collision is O(n²))
    pub const MAX_ORBS: usize = 256;

    /// Radius draw: base + spread * U(0,1), px
    pub const RADIUS_BASE: f32 = 40.0;
    pub const RADIUS_SPREAD: f32 = 120.0;
    /// Initial velocity components are drawn from [-INITIAL_SPEED, INITIAL_SPEED], px/tick
    pub const INITIAL_SPEED: f32 = 2.0;

    /// Velocity kept on wall contact
    pub const WALL_DAMPING: f32 = 0.99;
    /// Width of the cross-axis jitter added on wall contact (centered on zero)
    pub const WALL_JITTER: f32 = 1.0;
    /// Per-tick drag on both axes
    pub const DRAG: f32 = 0.999;
    /// Per-tick downward bias on vy
    pub const GRAVITY: f32 = 0.005;
    /// Speed floor, px/tick
    pub const MIN_SPEED: f32 = 1.0;

    /// Per-tick chance of kicking one random orb
    pub const IMPULSE_CHANCE: f32 = 0.01;
    pub const IMPULSE_MIN: f32 = 2.0;
    pub const IMPULSE_SPREAD: f32 = 2.0;

    /// Scale pulse on wall bounce (peak, ms per leg)
    pub const WALL_PULSE_SCALE: f32 = 1.1;
    pub const WALL_PULSE_MS: f32 = 300.0;
    /// Scale pulse on orb-orb collision (peak, ms per leg)
    pub const COLLISION_PULSE_SCALE: f32 = 1.2;
    pub const COLLISION_PULSE_MS: f32 = 200.0;

    /// Nominal frame length for headless runs (60 Hz)
    pub const FRAME_MS: f64 = 1000.0 / 60.0;
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}
