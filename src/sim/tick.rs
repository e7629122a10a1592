//! Per-frame simulation tick
//!
//! Advances every orb by one discrete step. Randomness only enters through
//! the caller's RNG, so a seeded stream reproduces a run exactly.

use std::f32::consts::TAU;

use rand::Rng;

use super::collision::{ContactAnchor, WallSide, resolve_pair, wall_contact};
use super::state::{Bounds, Orb, OrbStore};
use crate::config::FieldConfig;
use crate::polar_to_cartesian;

/// Axis of a wall bounce
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// Something that happened during a tick (cosmetic; never read back by the sim)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrbEvent {
    /// Orb at `index` reflected off a wall on `axis`
    WallBounce { index: usize, axis: Axis },
    /// Orbs at `a` < `b` overlapped and were resolved
    Collision { a: usize, b: usize },
    /// Orb at `index` received a random kick
    Impulse { index: usize },
    /// Orb at `index` fell below the speed floor and got a new heading
    Reheaded { index: usize },
}

/// Advance the store by one tick
///
/// Order: per orb (integrate, walls, drag, speed floor), then every pair
/// `i < j` once, then the random impulse, then a final speed-floor pass.
pub fn tick<R: Rng + ?Sized>(
    store: &mut OrbStore,
    config: &FieldConfig,
    rng: &mut R,
    events: &mut Vec<OrbEvent>,
) {
    let bounds = store.bounds;

    for (index, orb) in store.orbs.iter_mut().enumerate() {
        advance_orb(orb, index, &bounds, config, rng, events);
    }

    resolve_collisions(&mut store.orbs, config.contact, events);

    apply_impulse(&mut store.orbs, config, rng, events);

    // Collisions and kicks can both leave an orb below the floor
    for (index, orb) in store.orbs.iter_mut().enumerate() {
        if enforce_min_speed(orb, config.min_speed, rng) {
            events.push(OrbEvent::Reheaded { index });
        }
    }
}

/// Integrate one orb and apply walls, drag and the speed floor
pub fn advance_orb<R: Rng + ?Sized>(
    orb: &mut Orb,
    index: usize,
    bounds: &Bounds,
    config: &FieldConfig,
    rng: &mut R,
    events: &mut Vec<OrbEvent>,
) {
    orb.pos += orb.vel;

    let walls = wall_contact(orb, bounds);
    if let Some(side) = walls.x {
        orb.vel.x = reflect(orb.vel.x, side, config.wall_damping);
        orb.vel.y += jitter(rng, config.wall_jitter);
        events.push(OrbEvent::WallBounce {
            index,
            axis: Axis::X,
        });
    }
    if let Some(side) = walls.y {
        orb.vel.y = reflect(orb.vel.y, side, config.wall_damping);
        orb.vel.x += jitter(rng, config.wall_jitter);
        events.push(OrbEvent::WallBounce {
            index,
            axis: Axis::Y,
        });
    }
    if walls.any() {
        orb.clamp_into(bounds);
    }

    orb.vel *= config.drag;
    orb.vel.y += config.gravity;

    if enforce_min_speed(orb, config.min_speed, rng) {
        events.push(OrbEvent::Reheaded { index });
    }
}

/// Point a velocity component back into the viewport and damp it
///
/// Unlike plain negation, an orb past the wall but already moving inward keeps its direction.
#[inline]
fn reflect(component: f32, side: WallSide, damping: f32) -> f32 {
    side.inward() * component.abs() * damping
}

/// Uniform in [-width/2, width/2)
#[inline]
fn jitter<R: Rng + ?Sized>(rng: &mut R, width: f32) -> f32 {
    (rng.random::<f32>() - 0.5) * width
}

/// Give a too-slow orb `min_speed` at a random heading. Returns true if applied.
pub fn enforce_min_speed<R: Rng + ?Sized>(orb: &mut Orb, min_speed: f32, rng: &mut R) -> bool {
    if orb.speed() >= min_speed {
        return false;
    }
    let heading = rng.random::<f32>() * TAU;
    orb.vel = polar_to_cartesian(min_speed, heading);
    true
}

/// One pass over every unordered pair in index order
///
/// No sub-stepping: a three-way pile-up may need a few ticks to come apart.
pub fn resolve_collisions(orbs: &mut [Orb], anchor: ContactAnchor, events: &mut Vec<OrbEvent>) {
    for i in 0..orbs.len() {
        let (head, tail) = orbs.split_at_mut(i + 1);
        let a = &mut head[i];
        for (offset, b) in tail.iter_mut().enumerate() {
            if resolve_pair(a, b, anchor).is_some() {
                events.push(OrbEvent::Collision {
                    a: i,
                    b: i + 1 + offset,
                });
            }
        }
    }
}

/// With probability `impulse_chance`, kick one random orb
pub fn apply_impulse<R: Rng + ?Sized>(
    orbs: &mut [Orb],
    config: &FieldConfig,
    rng: &mut R,
    events: &mut Vec<OrbEvent>,
) {
    if orbs.is_empty() || rng.random::<f32>() >= config.impulse_chance {
        return;
    }
    let index = rng.random_range(0..orbs.len());
    let heading = rng.random::<f32>() * TAU;
    let magnitude = config.impulse_min + rng.random::<f32>() * config.impulse_spread;
    orbs[index].vel += polar_to_cartesian(magnitude, heading);

    log::trace!("Impulse {:.2} on orb {}", magnitude, orbs[index].id);
    events.push(OrbEvent::Impulse { index });
}
