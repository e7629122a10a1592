//! Orb store and core simulation types
//!
//! Everything a tick reads or writes lives here. Display handles do not:
//! the renderer looks them up by orb index.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::config::FieldConfig;

/// Viewport size in px
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    /// Largest valid top-left x for a box of side `diameter`
    #[inline]
    pub fn max_x(&self, diameter: f32) -> f32 {
        (self.width - diameter).max(0.0)
    }

    /// Largest valid top-left y for a box of side `diameter`
    #[inline]
    pub fn max_y(&self, diameter: f32) -> f32 {
        (self.height - diameter).max(0.0)
    }

    /// Whether a box of side `diameter` at `pos` lies fully inside
    pub fn contains_box(&self, pos: Vec2, diameter: f32) -> bool {
        pos.x >= 0.0 && pos.y >= 0.0 && pos.x <= self.max_x(diameter) && pos.y <= self.max_y(diameter)
    }
}

/// HSLA fill of an orb
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrbStyle {
    pub hue: f32,
    pub saturation: f32,
    pub lightness: f32,
    pub alpha: f32,
}

impl OrbStyle {
    pub const LIGHT_BLUE: OrbStyle = OrbStyle {
        hue: 200.0,
        saturation: 67.0,
        lightness: 80.0,
        alpha: 1.0,
    };
}

impl Default for OrbStyle {
    fn default() -> Self {
        Self::LIGHT_BLUE
    }
}

/// A simulated orb
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Orb {
    pub id: u32,
    /// Top-left corner of the bounding box
    pub pos: Vec2,
    /// px per tick
    pub vel: Vec2,
    pub radius: f32,
    pub style: OrbStyle,
}

impl Orb {
    pub fn new(id: u32, pos: Vec2, vel: Vec2, radius: f32, style: OrbStyle) -> Self {
        debug_assert!(radius > 0.0, "orb radius must be positive");
        Self {
            id,
            pos,
            vel,
            radius,
            style,
        }
    }

    /// Side of the bounding box
    #[inline]
    pub fn diameter(&self) -> f32 {
        self.radius * 2.0
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::splat(self.radius)
    }

    /// Area-proportional mass (uniform areal density)
    #[inline]
    pub fn mass(&self) -> f32 {
        self.radius * self.radius
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.vel.length()
    }

    /// Pull the bounding box back inside `bounds`. Returns true if it moved.
    pub fn clamp_into(&mut self, bounds: &Bounds) -> bool {
        let d = self.diameter();
        let clamped = Vec2::new(
            self.pos.x.clamp(0.0, bounds.max_x(d)),
            self.pos.y.clamp(0.0, bounds.max_y(d)),
        );
        let moved = clamped != self.pos;
        self.pos = clamped;
        moved
    }
}

/// RNG state wrapper for serialization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::seed_from_u64(self.seed)
    }
}

/// Authoritative orb list plus viewport bounds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrbStore {
    pub bounds: Bounds,
    /// Sorted by id; index is the renderer's handle key
    pub orbs: Vec<Orb>,
    /// Next orb id (never reused within a session)
    next_id: u32,
}

impl OrbStore {
    pub fn new(bounds: Bounds) -> Self {
        Self {
            bounds,
            orbs: Vec::new(),
            next_id: 0,
        }
    }

    /// Allocate a new orb id
    pub fn next_orb_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn len(&self) -> usize {
        self.orbs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orbs.is_empty()
    }

    /// Replace all orbs with `count` fresh ones drawn from `rng`
    pub fn initialize<R: Rng + ?Sized>(
        &mut self,
        count: usize,
        config: &FieldConfig,
        rng: &mut R,
    ) -> &[Orb] {
        self.orbs.clear();
        self.orbs.reserve(count);

        for _ in 0..count {
            let radius = config.radius_base + config.radius_spread * rng.random::<f32>();
            let d = radius * 2.0;
            let pos = Vec2::new(
                rng.random::<f32>() * self.bounds.max_x(d),
                rng.random::<f32>() * self.bounds.max_y(d),
            );
            let vel = Vec2::new(
                (rng.random::<f32>() * 2.0 - 1.0) * config.initial_speed,
                (rng.random::<f32>() * 2.0 - 1.0) * config.initial_speed,
            );
            let id = self.next_orb_id();
            self.orbs.push(Orb::new(id, pos, vel, radius, config.style));
        }

        log::debug!(
            "Initialized {} orbs in {}x{}",
            count,
            self.bounds.width,
            self.bounds.height
        );
        &self.orbs
    }

    /// Adopt new viewport bounds, clamping (not re-randomizing) any orb
    /// that no longer fits. Velocities and ids are untouched.
    pub fn update_bounds(&mut self, bounds: Bounds) -> usize {
        self.bounds = bounds;
        let moved = self
            .orbs
            .iter_mut()
            .map(|orb| orb.clamp_into(&bounds))
            .filter(|&moved| moved)
            .count();
        log::debug!(
            "Bounds now {}x{}, {} orbs clamped",
            bounds.width,
            bounds.height,
            moved
        );
        moved
    }

    /// Drop every orb (ids keep counting)
    pub fn clear(&mut self) {
        self.orbs.clear();
    }
}
