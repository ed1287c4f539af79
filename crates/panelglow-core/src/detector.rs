//! Adaptive beat/onset detection over spectral frames.
//!
//! The detector classifies a frame as a trigger using either the external
//! beat/onset flag or its own threshold test: the dominant bin must stand out
//! above a decaying noise floor plus a multiple of the running bin average
//! while overall energy stays low. Dominant-bin indices are accumulated
//! between triggers and resolved to a palette index when one fires.

use crate::audio::SpectralFrame;
use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Energy level below which the threshold path is allowed to fire
pub const ENERGY_THRESHOLD: u16 = 50;

/// External flag a policy listens to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerSignal {
    /// Rhythmic beat flag
    Beat,
    /// Sound-event onset flag
    Onset,
}

impl TriggerSignal {
    /// Read this signal's flag from a frame
    pub fn is_set(self, frame: &SpectralFrame) -> bool {
        match self {
            TriggerSignal::Beat => frame.beat,
            TriggerSignal::Onset => frame.onset,
        }
    }
}

/// Tuning for one trigger call site
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TriggerPolicy {
    /// External flag that fires the trigger unconditionally
    pub signal: TriggerSignal,
    /// Multiple of the running average the dominant bin must exceed
    pub multiplier: f32,
    /// Threshold path only fires at or below this energy
    pub energy_threshold: u16,
    /// Invocations rejected between admitted ones (see [`FrameGate`])
    #[serde(default)]
    pub skip_frames: u32,
}

impl TriggerPolicy {
    /// Pattern regeneration on beats
    pub const PATTERN: TriggerPolicy = TriggerPolicy {
        signal: TriggerSignal::Beat,
        multiplier: 2.0,
        energy_threshold: ENERGY_THRESHOLD,
        skip_frames: 0,
    };

    /// Light spawning on onsets
    pub const ONSET: TriggerPolicy = TriggerPolicy {
        signal: TriggerSignal::Onset,
        multiplier: 1.8,
        energy_threshold: ENERGY_THRESHOLD,
        skip_frames: 0,
    };

    /// Ambient recoloring on beats, every other invocation
    pub const RECOLOR: TriggerPolicy = TriggerPolicy {
        signal: TriggerSignal::Beat,
        multiplier: 1.8,
        energy_threshold: ENERGY_THRESHOLD,
        skip_frames: 1,
    };
}

/// Persistent detector state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DetectorState {
    /// Decaying lower bound of dominant-bin magnitudes
    pub noise_floor: u32,
    /// Running average of contributing bins
    pub average: u32,
    /// Sum of dominant-bin indices since the last palette trigger
    pub index_sum: u64,
    /// Frames accumulated into `index_sum`
    pub sample_count: u32,
    /// Active palette index
    pub palette_index: usize,
}

/// Result of scanning one frame's bins
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BinScan {
    /// Largest magnitude in the frame (0 when every bin is 0)
    pub max_bin: u8,
    /// Index of the first bin holding `max_bin`
    pub max_bin_index: usize,
}

/// Outcome of a full detection pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Detection {
    /// Whether the trigger fired
    pub triggered: bool,
    /// Active palette index after this frame
    pub palette_index: usize,
}

/// Noise-floor tracking beat detector shared by all effects
#[derive(Debug, Clone)]
pub struct AdaptiveBeatDetector {
    state: DetectorState,
    palette_len: usize,
}

impl AdaptiveBeatDetector {
    /// Create a detector resolving indices into a palette of `palette_len` colors
    pub fn new(palette_len: usize) -> Result<Self> {
        Self::with_state(DetectorState::default(), palette_len)
    }

    /// Create a detector resuming from an existing state
    pub fn with_state(state: DetectorState, palette_len: usize) -> Result<Self> {
        if palette_len == 0 {
            return Err(CoreError::EmptyPalette);
        }
        let mut state = state;
        state.palette_index %= palette_len;
        Ok(Self { state, palette_len })
    }

    /// Current state
    pub fn state(&self) -> &DetectorState {
        &self.state
    }

    /// Active palette index
    pub fn palette_index(&self) -> usize {
        self.state.palette_index
    }

    /// Scan the frame's bins, updating the noise floor, running average and
    /// dominant-index accumulator.
    pub fn observe(&mut self, frame: &SpectralFrame) -> BinScan {
        let state = &mut self.state;
        let mut scan = BinScan::default();
        let mut sum = state.average;
        let mut contributing: u32 = 1;

        for (i, &magnitude) in frame.bins.iter().enumerate() {
            if magnitude <= scan.max_bin {
                continue;
            }
            let magnitude32 = u32::from(magnitude);
            if state.noise_floor == 0 || magnitude32 < state.noise_floor {
                state.noise_floor = magnitude32;
            } else {
                state.noise_floor = state.noise_floor.saturating_sub(1);
            }

            sum += magnitude32;
            contributing += 1;
            scan.max_bin = magnitude;
            scan.max_bin_index = i;
        }

        state.average = sum / contributing;
        state.index_sum = state.index_sum.saturating_add(scan.max_bin_index as u64);
        state.sample_count = state.sample_count.saturating_add(1);

        trace!(
            "scan: max_bin={} index={} floor={} avg={}",
            scan.max_bin,
            scan.max_bin_index,
            state.noise_floor,
            state.average
        );
        scan
    }

    /// Threshold path only: dominant bin above `floor + multiplier * avg` at
    /// low energy.
    pub fn exceeds_threshold(&self, scan: &BinScan, energy: u16, policy: &TriggerPolicy) -> bool {
        let threshold =
            self.state.noise_floor as f32 + policy.multiplier * self.state.average as f32;
        f32::from(scan.max_bin) > threshold && energy <= policy.energy_threshold
    }

    /// Full trigger test: the policy's external flag, or the threshold path
    pub fn is_triggered(&self, scan: &BinScan, frame: &SpectralFrame, policy: &TriggerPolicy) -> bool {
        policy.signal.is_set(frame) || self.exceeds_threshold(scan, frame.energy, policy)
    }

    /// Resolve the accumulated dominant indices into the active palette index
    /// and restart accumulation.
    pub fn resolve_palette_index(&mut self) -> usize {
        let state = &mut self.state;
        let mean = state
            .index_sum
            .checked_div(u64::from(state.sample_count))
            .unwrap_or(0);
        state.palette_index = (mean % self.palette_len as u64) as usize;
        state.index_sum = 0;
        state.sample_count = 0;

        debug!("palette trigger: index={}", state.palette_index);
        state.palette_index
    }

    /// Observe a frame, test it against `policy` when `gate` admits it, and
    /// resolve the palette index when it fires. The frame is observed
    /// whether or not the gate admits it.
    pub fn detect(
        &mut self,
        frame: &SpectralFrame,
        policy: &TriggerPolicy,
        gate: &mut FrameGate,
    ) -> Detection {
        let scan = self.observe(frame);
        let triggered = gate.admit() && self.is_triggered(&scan, frame, policy);
        if triggered {
            self.resolve_palette_index();
        }
        Detection {
            triggered,
            palette_index: self.state.palette_index,
        }
    }
}

/// Rejects `skip_frames` invocations, admits one, and repeats.
///
/// The counter advances on every call whether or not anything would have
/// triggered, so with one skip frame admissions strictly alternate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameGate {
    skip_frames: u32,
    count: u32,
}

impl FrameGate {
    /// Create a gate that skips `skip_frames` invocations between admissions
    pub fn new(skip_frames: u32) -> Self {
        Self {
            skip_frames,
            count: 0,
        }
    }

    /// Advance the gate; true when this invocation is admitted
    pub fn admit(&mut self) -> bool {
        if self.count < self.skip_frames {
            self.count += 1;
            false
        } else {
            self.count = 0;
            true
        }
    }
}
