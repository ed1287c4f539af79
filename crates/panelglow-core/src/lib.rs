//! PanelGlow Core - Audio Analysis and Layout Model
//!
//! This crate contains the pieces shared by every panel lighting effect:
//! - Panel layout geometry (bounds, distances)
//! - Color palette and index mapping
//! - Spectral frame input seam
//! - Adaptive beat/onset detection with per-effect trigger policies
//! - Effect tuning configuration

#![warn(missing_docs)]

pub use glam::Vec2;

pub mod audio;
pub mod config;
pub mod detector;
pub mod error;
pub mod layout;
pub mod palette;

// --- Re-exports grouped by category ---

// Audio input
pub use audio::{SpectralFeatureReader, SpectralFrame, FFT_BINS};

// Detection
pub use detector::{
    AdaptiveBeatDetector, BinScan, Detection, DetectorState, FrameGate, TriggerPolicy,
    TriggerSignal, ENERGY_THRESHOLD,
};

// Configuration
pub use config::{EffectConfig, MAX_SOURCES, TILE_DISTANCE, TRANSITION_TIME};

// Geometry & Color
pub use layout::{distance, Bounds, LayoutGraph, Panel, MAX_PANELS};
pub use palette::{Palette, Rgb};

// Errors
pub use error::{CoreError, Result};
