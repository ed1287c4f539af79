//! Error types for layout, palette and configuration loading
use thiserror::Error;

/// Core errors
///
/// Every variant is a startup failure: an effect that cannot be built from
/// its layout, palette, and configuration does not start. The per-frame path
/// never produces these.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Palette has no colors
    #[error("Palette must contain at least one color")]
    EmptyPalette,

    /// Layout has no panels
    #[error("Layout must contain at least one panel")]
    EmptyLayout,

    /// Layout exceeds the supported panel count
    #[error("Layout has {count} panels, maximum is {max}")]
    TooManyPanels {
        /// Panels supplied
        count: usize,
        /// Supported maximum
        max: usize,
    },

    /// Panel coordinates unusable for geometry
    #[error("Invalid layout: {0}")]
    InvalidLayout(String),

    /// Tuning value out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
