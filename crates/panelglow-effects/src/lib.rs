//! PanelGlow Effects - Audio-Reactive Panel Lighting
//!
//! This crate turns detector output into per-panel colors:
//! - **Patterned Beats**: a random palette/white mask reshuffled on beats
//! - **Soft Lightning**: moving point lights blended over an ambient glow
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use panelglow_core::{EffectConfig, LayoutGraph, Palette, Panel, Rgb, SpectralFrame};
//! use panelglow_effects::EffectKind;
//!
//! let layout = LayoutGraph::centered(vec![Panel::new(1, 0.0, 0.0), Panel::new(2, 86.6, 0.0)])?;
//! let palette = Palette::new(vec![Rgb::new(255, 0, 0), Rgb::new(0, 0, 255)])?;
//!
//! let mut effect = EffectKind::SoftLightning.build(layout, palette, EffectConfig::default())?;
//! effect.start();
//! let records = effect.render(&SpectralFrame::silent().beat(true));
//! assert_eq!(records.len(), 2);
//! effect.stop();
//! # Ok::<(), panelglow_core::CoreError>(())
//! ```
//!
//! ## Modules
//!
//! - [`effect`] - Host-facing trait and effect selection
//! - [`emitter`] - Frame production and the strategy seam
//! - [`pattern`] - Binary-mask strategy
//! - [`lights`] - Light source field
//! - [`diffusion`] - Spatial diffusion strategy
//! - [`context`] - Shared per-effect state

#![warn(missing_docs)]

pub mod context;
pub mod diffusion;
pub mod effect;
pub mod emitter;
pub mod lights;
pub mod pattern;

pub use context::EffectContext;
pub use diffusion::{SoftLightning, SoftLightningRenderer, SpatialDiffusionRenderer};
pub use effect::{EffectKind, LightEffect};
pub use emitter::{FrameEmitter, FrameRecord, RenderStrategy};
pub use lights::{LightSource, LightSourceField};
pub use pattern::{PatternMask, PatternMaskRenderer, PatternedBeats};
