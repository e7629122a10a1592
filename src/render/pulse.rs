//! Cosmetic scale pulses triggered by bounces and collisions

use crate::config::PulseConfig;

/// Bounce ease-out on t in [0, 1]
pub fn bounce_out(t: f32) -> f32 {
    const N1: f32 = 7.5625;
    const D1: f32 = 2.75;

    let t = t.clamp(0.0, 1.0);
    if t < 1.0 / D1 {
        N1 * t * t
    } else if t < 2.0 / D1 {
        let t = t - 1.5 / D1;
        N1 * t * t + 0.75
    } else if t < 2.5 / D1 {
        let t = t - 2.25 / D1;
        N1 * t * t + 0.9375
    } else {
        let t = t - 2.625 / D1;
        N1 * t * t + 0.984375
    }
}

/// One running pulse: up to `peak` over one leg, then the same curve back
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pulse {
    peak: f32,
    leg_ms: f32,
    started_ms: f64,
}

impl Pulse {
    pub fn start(config: PulseConfig, now_ms: f64) -> Self {
        Self {
            peak: config.scale,
            leg_ms: config.duration_ms,
            started_ms: now_ms,
        }
    }

    /// Scale at `now_ms`, or `None` once both legs have played
    pub fn scale_at(&self, now_ms: f64) -> Option<f32> {
        let elapsed = (now_ms - self.started_ms).max(0.0) as f32;
        let leg = elapsed / self.leg_ms;
        let progress = if leg < 1.0 {
            leg
        } else if leg < 2.0 {
            // Yoyo: replay the forward curve in reverse
            2.0 - leg
        } else {
            return None;
        };
        Some(1.0 + (self.peak - 1.0) * bounce_out(progress))
    }
}

/// Per-orb pulse slots, indexed like the orb list
#[derive(Debug, Clone, Default)]
pub struct PulseTracker {
    slots: Vec<Option<Pulse>>,
}

impl PulseTracker {
    pub fn reset(&mut self, count: usize) {
        self.slots.clear();
        self.slots.resize(count, None);
    }

    /// Start (or restart) the pulse on `index`
    pub fn trigger(&mut self, index: usize, config: PulseConfig, now_ms: f64) {
        if let Some(slot) = self.slots.get_mut(index) {
            *slot = Some(Pulse::start(config, now_ms));
        }
    }

    /// Current scale of `index`; finished pulses are cleared
    pub fn scale(&mut self, index: usize, now_ms: f64) -> f32 {
        let Some(slot) = self.slots.get_mut(index) else {
            return 1.0;
        };
        match slot.and_then(|p| p.scale_at(now_ms)) {
            Some(scale) => scale,
            None => {
                *slot = None;
                1.0
            }
        }
    }

    pub fn active(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WALL: PulseConfig = PulseConfig {
        scale: 1.1,
        duration_ms: 300.0,
    };

    #[test]
    fn test_bounce_out_endpoints() {
        assert_eq!(bounce_out(0.0), 0.0);
        assert!((bounce_out(1.0) - 1.0).abs() < 1e-6);
        for i in 0..=100 {
            let v = bounce_out(i as f32 / 100.0);
            assert!((0.0..=1.0 + 1e-6).contains(&v));
        }
    }

    #[test]
    fn test_pulse_yoyo_shape() {
        let pulse = Pulse::start(WALL, 1000.0);
        assert!((pulse.scale_at(1000.0).unwrap() - 1.0).abs() < 1e-6);
        assert!((pulse.scale_at(1300.0).unwrap() - 1.1).abs() < 1e-5);
        // Symmetric around the peak
        let up = pulse.scale_at(1150.0).unwrap();
        let down = pulse.scale_at(1450.0).unwrap();
        assert!((up - down).abs() < 1e-5);
        assert!(pulse.scale_at(1600.0).is_none());
    }

    #[test]
    fn test_tracker_restarts_and_expires() {
        let mut tracker = PulseTracker::default();
        tracker.reset(3);
        tracker.trigger(1, WALL, 0.0);
        tracker.trigger(7, WALL, 0.0); // out of range: ignored
        assert_eq!(tracker.active(), 1);
        assert_eq!(tracker.scale(0, 100.0), 1.0);
        assert!(tracker.scale(1, 300.0) > 1.09);

        tracker.trigger(1, WALL, 500.0);
        assert!(tracker.scale(1, 800.0) > 1.09);
        assert_eq!(tracker.scale(1, 2000.0), 1.0);
        assert_eq!(tracker.active(), 0);
    }
}
