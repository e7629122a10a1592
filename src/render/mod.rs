//! Renderer binding
//!
//! Projects orb positions onto display elements. The renderer only ever
//! borrows the orb list immutably; display handles live on the surface and
//! are addressed by orb index.

pub mod pulse;
pub mod style;

#[cfg(target_arch = "wasm32")]
pub mod dom;

#[cfg(target_arch = "wasm32")]
pub use dom::DomSurface;
pub use pulse::{Pulse, PulseTracker, bounce_out};

use crate::config::FieldConfig;
use crate::sim::{Bounds, Orb, OrbEvent};

/// Where a display surface draws orbs
pub trait OrbSurface {
    /// Current viewport size
    fn bounds(&self) -> Bounds;
    /// Create one element per orb, in index order (replacing any previous set)
    fn attach(&mut self, orbs: &[Orb]);
    /// Position element `index`
    fn draw(&mut self, index: usize, transform: &OrbTransform);
    /// Remove every element created by `attach`
    fn detach(&mut self);
}

/// Visual transform of one orb element
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbTransform {
    pub x: f32,
    pub y: f32,
    pub scale: f32,
}

impl OrbTransform {
    pub fn to_css(&self) -> String {
        if self.scale == 1.0 {
            format!("translate({}px, {}px)", self.x, self.y)
        } else {
            format!("translate({}px, {}px) scale({})", self.x, self.y, self.scale)
        }
    }
}

/// Maps simulation state to surface draws, adding bounce/collision pulses
#[derive(Debug, Clone)]
pub struct OrbRenderer {
    pulses: PulseTracker,
    config: FieldConfig,
}

impl OrbRenderer {
    pub fn new(config: FieldConfig) -> Self {
        Self {
            pulses: PulseTracker::default(),
            config,
        }
    }

    /// Forget all pulses and size slots for `count` orbs
    pub fn reset(&mut self, count: usize) {
        self.pulses.reset(count);
    }

    /// Draw every orb for this frame
    pub fn present<S: OrbSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        orbs: &[Orb],
        events: &[OrbEvent],
        now_ms: f64,
    ) {
        for event in events {
            match *event {
                OrbEvent::WallBounce { index, .. } => {
                    self.pulses.trigger(index, self.config.wall_pulse, now_ms);
                }
                OrbEvent::Collision { a, b } => {
                    self.pulses.trigger(a, self.config.collision_pulse, now_ms);
                    self.pulses.trigger(b, self.config.collision_pulse, now_ms);
                }
                OrbEvent::Impulse { .. } | OrbEvent::Reheaded { .. } => {}
            }
        }

        for (index, orb) in orbs.iter().enumerate() {
            let transform = OrbTransform {
                x: orb.pos.x,
                y: orb.pos.y,
                scale: self.pulses.scale(index, now_ms),
            };
            surface.draw(index, &transform);
        }
    }

    pub fn active_pulses(&self) -> usize {
        self.pulses.active()
    }
}

/// In-memory surface for headless runs and tests
#[derive(Debug, Clone)]
pub struct HeadlessSurface {
    pub bounds: Bounds,
    /// Latest transform per element; empty when detached
    pub transforms: Vec<OrbTransform>,
    pub draws: u64,
    pub attached: bool,
}

impl HeadlessSurface {
    pub fn new(bounds: Bounds) -> Self {
        Self {
            bounds,
            transforms: Vec::new(),
            draws: 0,
            attached: false,
        }
    }
}

impl OrbSurface for HeadlessSurface {
    fn bounds(&self) -> Bounds {
        self.bounds
    }

    fn attach(&mut self, orbs: &[Orb]) {
        self.transforms = orbs
            .iter()
            .map(|orb| OrbTransform {
                x: orb.pos.x,
                y: orb.pos.y,
                scale: 1.0,
            })
            .collect();
        self.attached = true;
    }

    fn draw(&mut self, index: usize, transform: &OrbTransform) {
        if let Some(slot) = self.transforms.get_mut(index) {
            *slot = *transform;
            self.draws += 1;
        }
    }

    fn detach(&mut self) {
        self.transforms.clear();
        self.attached = false;
    }
}
