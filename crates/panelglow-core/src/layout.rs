//! Panel layout geometry
//!
//! The layout is resolved from physical topology by the host and handed to
//! the core read-only. This module validates it once and provides the
//! geometric helpers the renderers need (bounding extents, distances).

use crate::error::{CoreError, Result};
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Maximum number of panels a layout may contain
pub const MAX_PANELS: usize = 50;

/// A single addressable panel
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Panel {
    /// Stable panel identifier
    pub id: u32,
    /// Centroid position in layout units
    pub centroid: Vec2,
}

impl Panel {
    /// Create a panel from an id and centroid coordinates
    pub fn new(id: u32, x: f32, y: f32) -> Self {
        Self {
            id,
            centroid: Vec2::new(x, y),
        }
    }
}

/// Axis-aligned bounding extents of a layout
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Lower-left corner
    pub min: Vec2,
    /// Upper-right corner
    pub max: Vec2,
}

impl Bounds {
    /// Width of the X range
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    /// Height of the Y range
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }
}

/// Read-only spatial graph of panels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawLayout")]
pub struct LayoutGraph {
    panels: Vec<Panel>,
    center: Vec2,
    #[serde(skip_serializing)]
    bounds: Bounds,
}

#[derive(Deserialize)]
struct RawLayout {
    panels: Vec<Panel>,
    center: Vec2,
}

impl TryFrom<RawLayout> for LayoutGraph {
    type Error = CoreError;

    fn try_from(raw: RawLayout) -> Result<Self> {
        Self::new(raw.panels, raw.center)
    }
}

impl LayoutGraph {
    /// Create a layout, rejecting empty or oversized panel sets and
    /// coordinates whose extents are not finite
    pub fn new(panels: Vec<Panel>, center: Vec2) -> Result<Self> {
        if panels.is_empty() {
            return Err(CoreError::EmptyLayout);
        }
        if panels.len() > MAX_PANELS {
            return Err(CoreError::TooManyPanels {
                count: panels.len(),
                max: MAX_PANELS,
            });
        }

        if !center.is_finite() {
            return Err(CoreError::InvalidLayout(format!(
                "center ({}, {}) is not finite",
                center.x, center.y
            )));
        }
        if let Some(panel) = panels.iter().find(|p| !p.centroid.is_finite()) {
            return Err(CoreError::InvalidLayout(format!(
                "panel {} has a non-finite centroid",
                panel.id
            )));
        }

        let bounds = compute_bounds(&panels, center);
        if !(bounds.width().is_finite() && bounds.height().is_finite()) {
            return Err(CoreError::InvalidLayout(
                "layout extents overflow".to_string(),
            ));
        }
        Ok(Self {
            panels,
            center,
            bounds,
        })
    }

    /// Create a layout whose center is the mean of all panel centroids
    pub fn centered(panels: Vec<Panel>) -> Result<Self> {
        if panels.is_empty() {
            return Err(CoreError::EmptyLayout);
        }
        let sum: Vec2 = panels.iter().map(|p| p.centroid).sum();
        let center = sum / panels.len() as f32;
        Self::new(panels, center)
    }

    /// Parse a layout from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Panels in layout order
    pub fn panels(&self) -> &[Panel] {
        &self.panels
    }

    /// Number of panels
    pub fn panel_count(&self) -> usize {
        self.panels.len()
    }

    /// Geometric center of the layout
    pub fn center(&self) -> Vec2 {
        self.center
    }

    /// Bounding extents, including the geometric center
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }
}

/// Extents start at the center and widen over every centroid, so the center
/// is always inside the bounds.
fn compute_bounds(panels: &[Panel], center: Vec2) -> Bounds {
    panels.iter().fold(
        Bounds {
            min: center,
            max: center,
        },
        |b, p| Bounds {
            min: b.min.min(p.centroid),
            max: b.max.max(p.centroid),
        },
    )
}

/// Euclidean distance between two points
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    a.distance(b)
}
