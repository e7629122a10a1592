//! Field configuration
//!
//! Every tunable of the simulation and its cosmetic pulses. Defaults mirror
//! `crate::consts`; hosts may override any subset from JSON.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::{ContactAnchor, OrbStyle};

/// Errors raised while loading or validating a `FieldConfig`
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{field} out of range: {value}")]
    OutOfRange { field: &'static str, value: f32 },
    #[error("orb_count {0} exceeds the maximum of {max}", max = MAX_ORBS)]
    TooManyOrbs(usize),
}

/// A scale pulse: ease up to `scale`, then back down, each leg `duration_ms` long
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PulseConfig {
    pub scale: f32,
    pub duration_ms: f32,
}

/// Orb field settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    // === Session ===
    /// Number of orbs created on start
    pub orb_count: usize,
    /// RNG seed; `None` lets the host pick one
    pub seed: Option<u64>,

    // === Spawn ===
    pub radius_base: f32,
    pub radius_spread: f32,
    /// Half-width of the initial velocity component range
    pub initial_speed: f32,
    pub style: OrbStyle,

    // === Motion ===
    pub wall_damping: f32,
    pub wall_jitter: f32,
    pub drag: f32,
    pub gravity: f32,
    pub min_speed: f32,
    /// Which point of each orb collision distance is measured from
    pub contact: ContactAnchor,

    // === Impulses ===
    pub impulse_chance: f32,
    pub impulse_min: f32,
    pub impulse_spread: f32,

    // === Cosmetics ===
    pub wall_pulse: PulseConfig,
    pub collision_pulse: PulseConfig,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            orb_count: ORB_COUNT,
            seed: None,

            radius_base: RADIUS_BASE,
            radius_spread: RADIUS_SPREAD,
            initial_speed: INITIAL_SPEED,
            style: OrbStyle::LIGHT_BLUE,

            wall_damping: WALL_DAMPING,
            wall_jitter: WALL_JITTER,
            drag: DRAG,
            gravity: GRAVITY,
            min_speed: MIN_SPEED,
            contact: ContactAnchor::default(),

            impulse_chance: IMPULSE_CHANCE,
            impulse_min: IMPULSE_MIN,
            impulse_spread: IMPULSE_SPREAD,

            wall_pulse: PulseConfig {
                scale: WALL_PULSE_SCALE,
                duration_ms: WALL_PULSE_MS,
            },
            collision_pulse: PulseConfig {
                scale: COLLISION_PULSE_SCALE,
                duration_ms: COLLISION_PULSE_MS,
            },
        }
    }
}

impl FieldConfig {
    /// Parse a (possibly partial) JSON object and validate the result
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse JSON, falling back to defaults (with a warning) on any error
    pub fn from_json_or_default(json: Option<&str>) -> Self {
        match json.map(Self::from_json) {
            Some(Ok(config)) => {
                log::info!("Loaded orb field config");
                config
            }
            Some(Err(e)) => {
                log::warn!("Ignoring orb field config: {}", e);
                Self::default()
            }
            None => Self::default(),
        }
    }

    /// Check every range the stepper relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.orb_count > MAX_ORBS {
            return Err(ConfigError::TooManyOrbs(self.orb_count));
        }

        let positive = [
            ("radius_base", self.radius_base),
            ("wall_pulse.duration_ms", self.wall_pulse.duration_ms),
            ("collision_pulse.duration_ms", self.collision_pulse.duration_ms),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::OutOfRange { field, value });
            }
        }

        let non_negative = [
            ("radius_spread", self.radius_spread),
            ("initial_speed", self.initial_speed),
            ("wall_jitter", self.wall_jitter),
            ("min_speed", self.min_speed),
            ("impulse_min", self.impulse_min),
            ("impulse_spread", self.impulse_spread),
            ("wall_pulse.scale", self.wall_pulse.scale),
            ("collision_pulse.scale", self.collision_pulse.scale),
        ];
        for (field, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::OutOfRange { field, value });
            }
        }

        // Multipliers must not amplify or flip velocity
        for (field, value) in [("wall_damping", self.wall_damping), ("drag", self.drag)] {
            if !(value > 0.0 && value <= 1.0) {
                return Err(ConfigError::OutOfRange { field, value });
            }
        }

        if !(0.0..=1.0).contains(&self.impulse_chance) {
            return Err(ConfigError::OutOfRange {
                field: "impulse_chance",
                value: self.impulse_chance,
            });
        }
        if !self.gravity.is_finite() {
            return Err(ConfigError::OutOfRange {
                field: "gravity",
                value: self.gravity,
            });
        }

        Ok(())
    }
}
