//! Color palette and bin-index color mapping

use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};

/// 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rgb {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
}

impl Rgb {
    /// Flat white, the background of the pattern effect and the color of new lights
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    /// Black
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    /// Create a color from its channels
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl From<(u8, u8, u8)> for Rgb {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self::new(r, g, b)
    }
}

impl From<Rgb> for (u8, u8, u8) {
    fn from(c: Rgb) -> Self {
        (c.r, c.g, c.b)
    }
}

/// Ordered, non-empty sequence of colors
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Rgb>", into = "Vec<Rgb>")]
pub struct Palette {
    colors: Vec<Rgb>,
}

impl TryFrom<Vec<Rgb>> for Palette {
    type Error = CoreError;

    fn try_from(colors: Vec<Rgb>) -> Result<Self> {
        Self::new(colors)
    }
}

impl From<Palette> for Vec<Rgb> {
    fn from(palette: Palette) -> Self {
        palette.colors
    }
}

impl Palette {
    /// Create a palette, rejecting an empty color list
    pub fn new(colors: Vec<Rgb>) -> Result<Self> {
        if colors.is_empty() {
            return Err(CoreError::EmptyPalette);
        }
        Ok(Self { colors })
    }

    /// Parse a palette from a JSON array of `{r, g, b}` objects
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Number of colors (always at least one)
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Always false; kept for API symmetry with slices
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// All colors in palette order
    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }

    /// Map a palette index to its color.
    ///
    /// Callers pass an index already reduced modulo [`Palette::len`]; the
    /// lookup wraps anyway so it can never go out of range.
    pub fn color_for(&self, index: usize) -> Rgb {
        self.colors[index % self.colors.len()]
    }
}
