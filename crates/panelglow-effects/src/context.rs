//! Per-effect state shared by every render strategy

use panelglow_core::{AdaptiveBeatDetector, EffectConfig, LayoutGraph, Palette, Result, Rgb};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::{SystemTime, UNIX_EPOCH};

/// Everything an effect reads once at startup plus the state it mutates
/// every invocation. Owned by the [`FrameEmitter`](crate::FrameEmitter) and
/// lent to its strategy for each call.
#[derive(Debug)]
pub struct EffectContext {
    /// Panel layout (read-only)
    pub layout: LayoutGraph,
    /// Color palette (read-only)
    pub palette: Palette,
    /// Tuning
    pub config: EffectConfig,
    /// Beat detector state
    pub detector: AdaptiveBeatDetector,
    /// Random source for masks and light spawning
    pub rng: StdRng,
}

impl EffectContext {
    /// Validate the configuration and build fresh state.
    ///
    /// The RNG is seeded from `config.seed` when present, otherwise from the
    /// system clock.
    pub fn new(layout: LayoutGraph, palette: Palette, config: EffectConfig) -> Result<Self> {
        config.validate()?;
        let detector = AdaptiveBeatDetector::new(palette.len())?;
        let seed = config.seed.unwrap_or_else(clock_seed);

        Ok(Self {
            detector,
            rng: StdRng::seed_from_u64(seed),
            layout,
            palette,
            config,
        })
    }

    /// Palette color at the detector's active index
    pub fn active_color(&self) -> Rgb {
        self.palette.color_for(self.detector.palette_index())
    }
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default()
}
