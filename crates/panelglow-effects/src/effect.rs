//! Host-facing effect surface

use crate::diffusion::SoftLightning;
use crate::emitter::FrameRecord;
use crate::pattern::PatternedBeats;
use panelglow_core::{
    CoreError, EffectConfig, LayoutGraph, Palette, SpectralFeatureReader, SpectralFrame,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A running panel lighting effect.
///
/// Hosts call [`start`](LightEffect::start) once, then one of the render
/// methods per invocation, then [`stop`](LightEffect::stop). Effects are
/// ready to render as soon as they are built; the lifecycle hooks leave
/// effect state untouched. Calls must not overlap; the effect is not
/// reentrant.
pub trait LightEffect: Send {
    /// Display name
    fn name(&self) -> &'static str;

    /// Lifecycle hook: effect is about to produce frames
    fn start(&mut self);

    /// Lifecycle hook: effect will produce no more frames
    fn stop(&mut self);

    /// Produce one frame into `out`, replacing its contents; returns the
    /// number of records (the panel count).
    fn render_into(&mut self, frame: &SpectralFrame, out: &mut Vec<FrameRecord>) -> usize;

    /// Produce one frame into a new buffer
    fn render(&mut self, frame: &SpectralFrame) -> Vec<FrameRecord> {
        let mut out = Vec::new();
        self.render_into(frame, &mut out);
        out
    }

    /// Poll `reader` exactly once and produce a frame from it
    fn produce(
        &mut self,
        reader: &mut dyn SpectralFeatureReader,
        out: &mut Vec<FrameRecord>,
    ) -> usize {
        let frame = reader.read_frame();
        self.render_into(&frame, out)
    }
}

/// Effects this crate can build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EffectKind {
    /// Random white/palette pattern regenerated on beats
    PatternedBeats,
    /// Lights drifting over an ambient glow
    SoftLightning,
}

impl EffectKind {
    /// Every buildable effect
    pub const ALL: [EffectKind; 2] = [EffectKind::PatternedBeats, EffectKind::SoftLightning];

    /// Display name
    pub fn name(self) -> &'static str {
        match self {
            EffectKind::PatternedBeats => "Patterned Beats",
            EffectKind::SoftLightning => "Soft Lightning",
        }
    }

    /// Build the effect. Fails on invalid configuration.
    pub fn build(
        self,
        layout: LayoutGraph,
        palette: Palette,
        config: EffectConfig,
    ) -> panelglow_core::Result<Box<dyn LightEffect>> {
        Ok(match self {
            EffectKind::PatternedBeats => Box::new(PatternedBeats::new(layout, palette, config)?),
            EffectKind::SoftLightning => Box::new(SoftLightning::new(layout, palette, config)?),
        })
    }
}

impl fmt::Display for EffectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EffectKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "patterned-beats" | "patterned beats" => Ok(EffectKind::PatternedBeats),
            "soft-lightning" | "soft lightning" => Ok(EffectKind::SoftLightning),
            other => Err(CoreError::InvalidConfig(format!("unknown effect: {other}"))),
        }
    }
}
