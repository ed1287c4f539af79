//! Effect tuning configuration

use crate::detector::TriggerPolicy;
use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};

/// Distance between adjacent tile centroids, in layout units
pub const TILE_DISTANCE: f32 = 86.6;
/// Total light sources including the ambient one
pub const MAX_SOURCES: usize = 2;
/// Transition-time hint attached to every frame record
pub const TRANSITION_TIME: u16 = 3;

/// Tuning shared by both effects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectConfig {
    /// Pattern regeneration trigger
    pub pattern: TriggerPolicy,
    /// Light spawn trigger
    pub onset: TriggerPolicy,
    /// Ambient recolor trigger
    pub recolor: TriggerPolicy,
    /// Tile spacing used to normalize distances
    pub tile_distance: f32,
    /// Light source capacity including the ambient source
    pub max_sources: usize,
    /// Light travel per invocation, in tiles
    pub light_speed_tiles: f32,
    /// Light falloff radius, in tiles
    pub light_radius: f32,
    /// Distance from center past which lights die, in tiles
    pub despawn_distance_tiles: f32,
    /// Transition-time hint passed through to the frame sink
    pub transition_time: u16,
    /// Fixed RNG seed; time-based when absent
    pub seed: Option<u64>,
}

impl Default for EffectConfig {
    fn default() -> Self {
        Self {
            pattern: TriggerPolicy::PATTERN,
            onset: TriggerPolicy::ONSET,
            recolor: TriggerPolicy::RECOLOR,
            tile_distance: TILE_DISTANCE,
            max_sources: MAX_SOURCES,
            light_speed_tiles: 2.0,
            light_radius: 1.0,
            despawn_distance_tiles: 10.0,
            transition_time: TRANSITION_TIME,
            seed: None,
        }
    }
}

impl EffectConfig {
    /// Parse and validate a configuration from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Same configuration with a fixed RNG seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Reject values that would break the per-frame invariants
    pub fn validate(&self) -> Result<()> {
        if self.max_sources < 2 {
            return Err(CoreError::InvalidConfig(format!(
                "max_sources must be at least 2 (ambient plus one light), got {}",
                self.max_sources
            )));
        }
        if !(self.tile_distance.is_finite() && self.tile_distance > 0.0) {
            return Err(CoreError::InvalidConfig(format!(
                "tile_distance must be positive, got {}",
                self.tile_distance
            )));
        }

        let non_negative = [
            ("light_speed_tiles", self.light_speed_tiles),
            ("light_radius", self.light_radius),
            ("despawn_distance_tiles", self.despawn_distance_tiles),
            ("pattern.multiplier", self.pattern.multiplier),
            ("onset.multiplier", self.onset.multiplier),
            ("recolor.multiplier", self.recolor.multiplier),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(CoreError::InvalidConfig(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }
        Ok(())
    }

    /// Light speed in layout units per invocation
    pub fn light_speed(&self) -> f32 {
        self.light_speed_tiles * self.tile_distance
    }

    /// Despawn distance in layout units
    pub fn despawn_distance(&self) -> f32 {
        self.despawn_distance_tiles * self.tile_distance
    }
}
