//! Orb field lifecycle
//!
//! Owns the store, RNG, renderer and surface, and moves between two states:
//! `Stopped` and `Running`. The host calls `frame` once per display frame;
//! each call runs one tick to completion before drawing.

use rand_pcg::Pcg32;

use crate::config::FieldConfig;
use crate::render::{OrbRenderer, OrbSurface};
use crate::sim::{Bounds, OrbEvent, OrbStore, RngState, tick};

/// Frame loop state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopPhase {
    Stopped,
    Running,
}

/// A self-contained simulate-and-render loop bound to one surface
pub struct OrbField<S: OrbSurface> {
    config: FieldConfig,
    phase: LoopPhase,
    store: OrbStore,
    rng_state: RngState,
    rng: Pcg32,
    renderer: OrbRenderer,
    surface: Option<S>,
    /// Scratch buffer reused every tick
    events: Vec<OrbEvent>,
    ticks: u64,
}

impl<S: OrbSurface> OrbField<S> {
    /// Create a stopped field seeded from `config.seed` (0 when unset)
    pub fn new(config: FieldConfig) -> Self {
        let rng_state = RngState::new(config.seed.unwrap_or_default());
        Self {
            phase: LoopPhase::Stopped,
            store: OrbStore::new(Bounds::new(0.0, 0.0)),
            rng: rng_state.to_rng(),
            rng_state,
            renderer: OrbRenderer::new(config.clone()),
            surface: None,
            events: Vec::new(),
            ticks: 0,
            config,
        }
    }

    /// Create a stopped field with an explicit seed (overrides `config.seed`)
    pub fn with_seed(mut config: FieldConfig, seed: u64) -> Self {
        config.seed = Some(seed);
        Self::new(config)
    }

    /// Populate the store from the surface's bounds and start running
    ///
    /// No-op (returns false) without a surface or when already running.
    pub fn start(&mut self, surface: Option<S>, orb_count: usize) -> bool {
        if self.phase == LoopPhase::Running {
            log::warn!("Orb field already running, ignoring start");
            return false;
        }
        let Some(mut surface) = surface else {
            log::warn!("No container for orb field, not starting");
            return false;
        };

        self.store.update_bounds(surface.bounds());
        self.store.initialize(orb_count, &self.config, &mut self.rng);
        surface.attach(&self.store.orbs);

        self.renderer.reset(self.store.len());
        self.events.clear();
        self.renderer.present(&mut surface, &self.store.orbs, &[], 0.0);

        self.surface = Some(surface);
        self.phase = LoopPhase::Running;
        log::info!(
            "Orb field started: {} orbs, {}x{}, seed {}",
            self.store.len(),
            self.store.bounds.width,
            self.store.bounds.height,
            self.rng_state.seed
        );
        true
    }

    /// Tear down: remove display elements and discard the orbs
    ///
    /// Idempotent; safe before `start`. Returns true if it stopped a running field.
    pub fn stop(&mut self) -> bool {
        if self.phase == LoopPhase::Stopped {
            return false;
        }
        if let Some(mut surface) = self.surface.take() {
            surface.detach();
        }
        self.store.clear();
        self.events.clear();
        self.renderer.reset(0);
        self.phase = LoopPhase::Stopped;
        log::info!("Orb field stopped after {} ticks", self.ticks);
        true
    }

    /// Run one tick and draw it. Returns false (doing nothing) unless running,
    /// so a frame callback that fires after `stop` is harmless.
    pub fn frame(&mut self, now_ms: f64) -> bool {
        if self.phase != LoopPhase::Running {
            return false;
        }
        let Some(surface) = self.surface.as_mut() else {
            return false;
        };

        self.events.clear();
        tick(&mut self.store, &self.config, &mut self.rng, &mut self.events);
        self.renderer.present(surface, &self.store.orbs, &self.events, now_ms);
        self.ticks += 1;
        true
    }

    /// Adopt new viewport bounds without touching velocities or identities
    pub fn resize(&mut self, bounds: Bounds) {
        let clamped = self.store.update_bounds(bounds);
        if clamped > 0 {
            log::debug!("Resize pulled {} orbs back into view", clamped);
        }
    }

    /// Re-read bounds from the surface
    pub fn resize_to_surface(&mut self) {
        if let Some(bounds) = self.surface.as_ref().map(|s| s.bounds()) {
            self.resize(bounds);
        }
    }

    /// Serialize the store (positions, velocities, bounds)
    pub fn snapshot_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.store)
    }

    pub fn phase(&self) -> LoopPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == LoopPhase::Running
    }

    pub fn store(&self) -> &OrbStore {
        &self.store
    }

    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.rng_state.seed
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

impl<S: OrbSurface> Drop for OrbField<S> {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;

    use super::*;
    use crate::consts::FRAME_MS;
    use crate::render::{HeadlessSurface, OrbTransform};
    use crate::sim::Orb;

    fn surface() -> HeadlessSurface {
        HeadlessSurface::new(Bounds::new(1280.0, 720.0))
    }

    fn field(seed: u64) -> OrbField<HeadlessSurface> {
        OrbField::with_seed(FieldConfig::default(), seed)
    }

    /// Records every surface call so teardown can be observed after drop
    #[derive(Default)]
    struct Log {
        attached: usize,
        draws: usize,
        detached: usize,
    }

    struct SpySurface(Rc<RefCell<Log>>);

    impl OrbSurface for SpySurface {
        fn bounds(&self) -> Bounds {
            Bounds::new(640.0, 480.0)
        }
        fn attach(&mut self, orbs: &[Orb]) {
            self.0.borrow_mut().attached = orbs.len();
        }
        fn draw(&mut self, _index: usize, _transform: &OrbTransform) {
            self.0.borrow_mut().draws += 1;
        }
        fn detach(&mut self) {
            self.0.borrow_mut().detached += 1;
        }
    }

    #[test]
    fn test_start_and_frames() {
        let mut field = field(42);
        assert_eq!(field.phase(), LoopPhase::Stopped);
        assert!(field.start(Some(surface()), 12));
        assert!(field.is_running());
        assert_eq!(field.store().len(), 12);

        let surface = field.surface().unwrap();
        assert!(surface.attached);
        assert_eq!(surface.transforms.len(), 12);
        assert_eq!(surface.draws, 12); // initial frame

        for i in 0..10 {
            assert!(field.frame(i as f64 * FRAME_MS));
        }
        assert_eq!(field.ticks(), 10);
        assert_eq!(field.surface().unwrap().draws, 12 * 11);

        // Drawn positions track the store
        let orb = &field.store().orbs[3];
        let drawn = field.surface().unwrap().transforms[3];
        assert_eq!((drawn.x, drawn.y), (orb.pos.x, orb.pos.y));
    }

    #[test]
    fn test_missing_surface_is_noop() {
        let mut field = field(1);
        assert!(!field.start(None, 12));
        assert_eq!(field.phase(), LoopPhase::Stopped);
        assert!(field.store().is_empty());
        assert!(!field.frame(0.0));
    }

    #[test]
    fn test_double_start_and_stop_are_guarded() {
        let mut field = field(2);
        assert!(!field.stop()); // never started
        assert!(field.start(Some(surface()), 5));
        let ids: Vec<u32> = field.store().orbs.iter().map(|o| o.id).collect();

        assert!(!field.start(Some(surface()), 9));
        assert_eq!(field.store().len(), 5);
        assert_eq!(ids, field.store().orbs.iter().map(|o| o.id).collect::<Vec<_>>());

        assert!(field.stop());
        assert!(!field.stop());
        assert_eq!(field.phase(), LoopPhase::Stopped);
    }

    #[test]
    fn test_no_work_after_stop() {
        let log = Rc::new(RefCell::new(Log::default()));
        let mut field: OrbField<SpySurface> = OrbField::with_seed(FieldConfig::default(), 3);
        assert!(field.start(Some(SpySurface(log.clone())), 4));
        assert!(field.frame(16.0));
        let draws = log.borrow().draws;

        assert!(field.stop());
        assert_eq!(log.borrow().detached, 1);
        assert!(field.store().is_empty());

        // A frame callback that was already pending
        assert!(!field.frame(32.0));
        assert_eq!(log.borrow().draws, draws);
        assert_eq!(field.ticks(), 1);
    }

    #[test]
    fn test_drop_tears_down() {
        let log = Rc::new(RefCell::new(Log::default()));
        {
            let mut field: OrbField<SpySurface> = OrbField::with_seed(FieldConfig::default(), 3);
            field.start(Some(SpySurface(log.clone())), 4);
        }
        assert_eq!(log.borrow().attached, 4);
        assert_eq!(log.borrow().detached, 1);
    }

    #[test]
    fn test_restart_reinitializes_with_fresh_ids() {
        let mut field = field(5);
        field.start(Some(surface()), 3);
        field.stop();
        field.start(Some(surface()), 3);
        let ids: Vec<u32> = field.store().orbs.iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![3, 4, 5]);
    }

    #[test]
    fn test_resize_keeps_identity_and_velocity() {
        let mut field = field(6);
        field.start(Some(surface()), 12);
        field.frame(0.0);
        let before: Vec<(u32, Vec2)> = field.store().orbs.iter().map(|o| (o.id, o.vel)).collect();

        let small = Bounds::new(400.0, 350.0);
        field.resize(small);
        let after: Vec<(u32, Vec2)> = field.store().orbs.iter().map(|o| (o.id, o.vel)).collect();
        assert_eq!(before, after);
        assert_eq!(field.store().bounds, small);
        for orb in &field.store().orbs {
            assert!(small.contains_box(orb.pos, orb.diameter()));
        }
    }

    #[test]
    fn test_same_seed_same_snapshot() {
        let run = || {
            let mut field = field(777);
            field.start(Some(surface()), 12);
            for i in 0..600 {
                field.frame(i as f64 * FRAME_MS);
            }
            field.snapshot_json().unwrap()
        };
        assert_eq!(run(), run());
    }
}
