//! Deterministic simulation module
//!
//! All orb physics lives here. This module must stay pure:
//! - One tick per call, no wall-clock time
//! - Randomness only from the caller's RNG
//! - Stable iteration order (by orb index)
//! - No rendering or platform dependencies

pub mod collision;
pub mod state;
pub mod tick;

pub use collision::{
    Contact, ContactAnchor, WallContact, WallSide, elastic_response, orb_contact, resolve_pair,
    wall_contact,
};
pub use state::{Bounds, Orb, OrbStore, OrbStyle, RngState};
pub use tick::{
    Axis, OrbEvent, advance_orb, apply_impulse, enforce_min_speed, resolve_collisions, tick,
};
