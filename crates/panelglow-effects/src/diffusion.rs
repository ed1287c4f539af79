//! Soft Lightning: point lights diffusing over an ambient glow.

use crate::context::EffectContext;
use crate::emitter::{FrameEmitter, RenderStrategy};
use crate::lights::LightSourceField;
use glam::Vec2;
use panelglow_core::{distance, FrameGate, Panel, Rgb, SpectralFrame};

/// Soft Lightning effect
pub type SoftLightning = FrameEmitter<SoftLightningRenderer>;

/// Blends light colors into a continuous field by inverse-square falloff
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpatialDiffusionRenderer {
    tile_distance: f32,
}

impl SpatialDiffusionRenderer {
    /// Renderer normalizing distances by `tile_distance`
    pub fn new(tile_distance: f32) -> Self {
        Self { tile_distance }
    }

    /// Blend weight of a light seen from `distance` layout units away
    pub fn falloff(&self, distance: f32, radius: f32) -> f32 {
        let d = distance / self.tile_distance - radius;
        (1.0 / (f64::from(d * d) * 1.5 + 1.0)) as f32
    }

    /// Color at `point`: the ambient color, blended toward each transient
    /// light in creation order. The blend is order dependent.
    pub fn shade(&self, field: &LightSourceField, point: Vec2) -> Rgb {
        let ambient = field.ambient().color;
        let mut color = [ambient.r, ambient.g, ambient.b].map(f32::from);

        for light in field.transients() {
            let factor = self.falloff(distance(point, light.position), light.radius);
            let target = [light.color.r, light.color.g, light.color.b];
            for (channel, value) in color.iter_mut().zip(target) {
                *channel = blend(*channel, value, factor);
            }
        }

        // Truncate, do not round.
        Rgb::new(color[0] as u8, color[1] as u8, color[2] as u8)
    }
}

/// One blend step. The light term is a single-precision product; the sum is
/// taken in double precision and stored back as `f32`, which keeps equal
/// endpoints exact (white over white stays 255).
fn blend(current: f32, light: u8, factor: f32) -> f32 {
    let kept = f64::from(current) * (1.0 - f64::from(factor));
    (kept + f64::from(f32::from(light) * factor)) as f32
}

/// Diffusion strategy: onsets spawn lights, beats recolor the ambient glow,
/// lights advance after every frame the recolor gate admits.
#[derive(Debug, Clone)]
pub struct SoftLightningRenderer {
    field: LightSourceField,
    renderer: SpatialDiffusionRenderer,
    onset_gate: FrameGate,
    recolor_gate: FrameGate,
    advance: bool,
}

impl SoftLightningRenderer {
    /// Light sources
    pub fn field(&self) -> &LightSourceField {
        &self.field
    }

    /// Diffusion renderer
    pub fn renderer(&self) -> &SpatialDiffusionRenderer {
        &self.renderer
    }
}

impl RenderStrategy for SoftLightningRenderer {
    const NAME: &'static str = "Soft Lightning";

    fn from_context(ctx: &mut EffectContext) -> Self {
        // Dark until the first admitted recolor.
        Self {
            field: LightSourceField::new(&ctx.layout, &ctx.config, Rgb::BLACK),
            renderer: SpatialDiffusionRenderer::new(ctx.config.tile_distance),
            onset_gate: FrameGate::new(ctx.config.onset.skip_frames),
            recolor_gate: FrameGate::new(ctx.config.recolor.skip_frames),
            advance: false,
        }
    }

    fn prepare(&mut self, ctx: &mut EffectContext, frame: &SpectralFrame) {
        let scan = ctx.detector.observe(frame);

        if self.onset_gate.admit() && ctx.detector.is_triggered(&scan, frame, &ctx.config.onset) {
            self.field.spawn(&mut ctx.rng);
        }

        // Gated frames skip recoloring and leave the lights where they are.
        self.advance = self.recolor_gate.admit();
        if self.advance && ctx.detector.is_triggered(&scan, frame, &ctx.config.recolor) {
            let index = ctx.detector.resolve_palette_index();
            self.field.recolor(ctx.palette.color_for(index));
        }
    }

    fn panel_color(&self, _ctx: &EffectContext, _index: usize, panel: &Panel) -> Rgb {
        self.renderer.shade(&self.field, panel.centroid)
    }

    fn finish(&mut self, _ctx: &mut EffectContext) {
        if self.advance {
            self.field.propagate();
        }
    }
}
