//! Per-invocation frame production

use crate::context::EffectContext;
use crate::effect::LightEffect;
use panelglow_core::{EffectConfig, LayoutGraph, Palette, Panel, Result, Rgb, SpectralFrame};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Color assignment for one panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameRecord {
    /// Panel identifier from the layout
    pub panel_id: u32,
    /// Color to show
    pub color: Rgb,
    /// Transition-time hint, passed through unchanged
    pub transition_time: u16,
}

/// A way of turning detector output into panel colors.
///
/// Per invocation the emitter calls [`prepare`](RenderStrategy::prepare)
/// once, [`panel_color`](RenderStrategy::panel_color) for every panel in
/// layout order, then [`finish`](RenderStrategy::finish).
pub trait RenderStrategy: Send {
    /// Effect name for logging
    const NAME: &'static str;

    /// Build initial strategy state from a fresh context. Any initial
    /// randomness is drawn from `ctx.rng` here.
    fn from_context(ctx: &mut EffectContext) -> Self;

    /// Run detection for this frame and update color state
    fn prepare(&mut self, ctx: &mut EffectContext, frame: &SpectralFrame);

    /// Color of the panel at `index`
    fn panel_color(&self, ctx: &EffectContext, index: usize, panel: &Panel) -> Rgb;

    /// Post-render step
    fn finish(&mut self, _ctx: &mut EffectContext) {}
}

/// Drives a [`RenderStrategy`] over the layout, one record per panel
#[derive(Debug)]
pub struct FrameEmitter<S> {
    ctx: EffectContext,
    strategy: S,
}

impl<S: RenderStrategy> FrameEmitter<S> {
    /// Build the effect state. Fails when the configuration is invalid.
    pub fn new(layout: LayoutGraph, palette: Palette, config: EffectConfig) -> Result<Self> {
        let mut ctx = EffectContext::new(layout, palette, config)?;
        let strategy = S::from_context(&mut ctx);

        info!(
            "{} ready: {} panels, {} palette colors",
            S::NAME,
            ctx.layout.panel_count(),
            ctx.palette.len()
        );
        Ok(Self { ctx, strategy })
    }

    /// Shared effect state
    pub fn context(&self) -> &EffectContext {
        &self.ctx
    }

    /// Strategy state
    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    /// Produce one frame into `out`, replacing its contents. Returns the
    /// frame length, which is always the panel count.
    pub fn emit_into(&mut self, frame: &SpectralFrame, out: &mut Vec<FrameRecord>) -> usize {
        self.strategy.prepare(&mut self.ctx, frame);

        out.clear();
        out.reserve(self.ctx.layout.panel_count());
        let transition_time = self.ctx.config.transition_time;
        for (index, panel) in self.ctx.layout.panels().iter().enumerate() {
            out.push(FrameRecord {
                panel_id: panel.id,
                color: self.strategy.panel_color(&self.ctx, index, panel),
                transition_time,
            });
        }

        self.strategy.finish(&mut self.ctx);
        out.len()
    }
}

impl<S: RenderStrategy> LightEffect for FrameEmitter<S> {
    fn name(&self) -> &'static str {
        S::NAME
    }

    fn start(&mut self) {
        info!("{} started", S::NAME);
    }

    fn stop(&mut self) {
        info!("{} stopped", S::NAME);
    }

    fn render_into(&mut self, frame: &SpectralFrame, out: &mut Vec<FrameRecord>) -> usize {
        self.emit_into(frame, out)
    }
}
