//! Patterned Beats: a random mask of palette-colored and white panels,
//! reshuffled on every beat.

use crate::context::EffectContext;
use crate::emitter::{FrameEmitter, RenderStrategy};
use panelglow_core::{FrameGate, Panel, Rgb, SpectralFrame};
use rand::Rng;

/// Patterned Beats effect
pub type PatternedBeats = FrameEmitter<PatternMaskRenderer>;

/// One flag per panel, index aligned with layout order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternMask {
    lit: Vec<bool>,
}

impl PatternMask {
    /// All-unlit mask for `len` panels
    pub fn new(len: usize) -> Self {
        Self {
            lit: vec![false; len],
        }
    }

    /// Redraw every flag from a fair coin, ignoring the previous mask
    pub fn regenerate<R: Rng>(&mut self, rng: &mut R) {
        for flag in &mut self.lit {
            *flag = rng.random_bool(0.5);
        }
    }

    /// Whether the panel at `index` shows the palette color
    pub fn is_lit(&self, index: usize) -> bool {
        self.lit.get(index).copied().unwrap_or(false)
    }

    /// Number of panels covered
    pub fn len(&self) -> usize {
        self.lit.len()
    }

    /// True for a zero-panel mask
    pub fn is_empty(&self) -> bool {
        self.lit.is_empty()
    }

    /// Flags in layout order
    pub fn as_slice(&self) -> &[bool] {
        &self.lit
    }
}

/// Binary-mask strategy: lit panels take the active palette color, the rest
/// are white.
#[derive(Debug, Clone)]
pub struct PatternMaskRenderer {
    mask: PatternMask,
    gate: FrameGate,
}

impl PatternMaskRenderer {
    /// Current mask
    pub fn mask(&self) -> &PatternMask {
        &self.mask
    }
}

impl RenderStrategy for PatternMaskRenderer {
    const NAME: &'static str = "Patterned Beats";

    fn from_context(ctx: &mut EffectContext) -> Self {
        let mut mask = PatternMask::new(ctx.layout.panel_count());
        mask.regenerate(&mut ctx.rng);

        Self {
            mask,
            gate: FrameGate::new(ctx.config.pattern.skip_frames),
        }
    }

    fn prepare(&mut self, ctx: &mut EffectContext, frame: &SpectralFrame) {
        let policy = ctx.config.pattern;
        if ctx.detector.detect(frame, &policy, &mut self.gate).triggered {
            self.mask.regenerate(&mut ctx.rng);
        }
        debug_assert_eq!(self.mask.len(), ctx.layout.panel_count());
    }

    fn panel_color(&self, ctx: &EffectContext, index: usize, _panel: &Panel) -> Rgb {
        if self.mask.is_lit(index) {
            ctx.active_color()
        } else {
            Rgb::WHITE
        }
    }
}
