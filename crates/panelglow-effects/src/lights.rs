//! Moving point lights for the diffusion effect.
//!
//! Slot 0 always holds the ambient light pinned at the layout center. Later
//! slots hold transient lights in creation order; they enter from the top or
//! bottom edge of the layout, travel vertically, and die once they are far
//! enough from the center.

use glam::Vec2;
use panelglow_core::{distance, Bounds, EffectConfig, LayoutGraph, Rgb};
use rand::Rng;
use tracing::{debug, trace};

/// A point light
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightSource {
    /// Position in layout units
    pub position: Vec2,
    /// Direction of travel (X is always 0 for transient lights)
    pub direction: Vec2,
    /// Travel per propagation step, in layout units
    pub speed: f32,
    /// Falloff radius, in tiles
    pub radius: f32,
    /// Emitted color
    pub color: Rgb,
}

impl LightSource {
    /// Stationary light at `position`
    pub fn ambient(position: Vec2, color: Rgb) -> Self {
        Self {
            position,
            direction: Vec2::ZERO,
            speed: 0.0,
            radius: 0.0,
            color,
        }
    }
}

/// Capacity-bounded, ordered set of lights with a permanent ambient slot
#[derive(Debug, Clone)]
pub struct LightSourceField {
    sources: Vec<LightSource>,
    center: Vec2,
    bounds: Bounds,
    capacity: usize,
    speed: f32,
    radius: f32,
    despawn_distance: f32,
}

impl LightSourceField {
    /// Create a field holding only the ambient light at the layout center.
    ///
    /// `config` must have passed [`EffectConfig::validate`], which guarantees
    /// room for at least one transient light.
    pub fn new(layout: &LayoutGraph, config: &EffectConfig, ambient_color: Rgb) -> Self {
        let capacity = config.max_sources.max(2);
        let mut sources = Vec::with_capacity(capacity);
        sources.push(LightSource::ambient(layout.center(), ambient_color));

        Self {
            sources,
            center: layout.center(),
            bounds: layout.bounds(),
            capacity,
            speed: config.light_speed(),
            radius: config.light_radius,
            despawn_distance: config.despawn_distance(),
        }
    }

    /// Spawn a white light at the top or bottom edge, evicting the oldest
    /// transient first when the field is full.
    pub fn spawn<R: Rng>(&mut self, rng: &mut R) -> &LightSource {
        let edge: f32 = rng.random();
        let (y, dir_y) = if edge >= 0.5 {
            (self.bounds.min.y, 1.0)
        } else {
            (self.bounds.max.y, -1.0)
        };
        let x = if self.bounds.width() > 0.0 {
            rng.random_range(self.bounds.min.x..self.bounds.max.x)
        } else {
            self.bounds.min.x
        };

        let spawned = self.push(LightSource {
            position: Vec2::new(x, y),
            direction: Vec2::new(0.0, dir_y),
            speed: self.speed,
            radius: self.radius,
            color: Rgb::WHITE,
        });
        debug!(
            "spawned light at ({:.1}, {:.1}) heading {}",
            spawned.position.x,
            spawned.position.y,
            if dir_y > 0.0 { "up" } else { "down" }
        );
        spawned
    }

    /// Append a transient light, evicting the oldest transient first when
    /// the field is full.
    pub fn push(&mut self, light: LightSource) -> &LightSource {
        if self.sources.len() >= self.capacity {
            let evicted = self.sources.remove(1);
            debug!("evicted light at ({:.1}, {:.1})", evicted.position.x, evicted.position.y);
        }

        self.sources.push(light);
        debug_assert!(self.sources.len() <= self.capacity);
        &self.sources[self.sources.len() - 1]
    }

    /// Advance every transient light one step and remove those past the
    /// despawn distance. Returns the number removed.
    pub fn propagate(&mut self) -> usize {
        let mut removed = 0;
        let mut i = 1;
        while i < self.sources.len() {
            let light = &mut self.sources[i];
            light.position += light.direction * light.speed;
            let d = distance(self.center, light.position);

            if d > self.despawn_distance {
                // Later lights shift down; re-examine this slot.
                self.sources.remove(i);
                removed += 1;
                trace!("light left the layout (distance {:.1})", d);
            } else {
                i += 1;
            }
        }
        removed
    }

    /// Change the ambient light's color
    pub fn recolor(&mut self, color: Rgb) {
        self.sources[0].color = color;
    }

    /// The ambient light
    pub fn ambient(&self) -> &LightSource {
        &self.sources[0]
    }

    /// Transient lights in creation order
    pub fn transients(&self) -> &[LightSource] {
        &self.sources[1..]
    }

    /// Every light, ambient first
    pub fn sources(&self) -> &[LightSource] {
        &self.sources
    }

    /// Total light count including the ambient one
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Never true: the ambient light is always present
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Maximum total light count
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Layout center the ambient light is pinned to
    pub fn center(&self) -> Vec2 {
        self.center
    }
}
