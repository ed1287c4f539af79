//! Spectral features supplied by the external audio front end.

/// Number of FFT bins delivered per frame
pub const FFT_BINS: usize = 32;

/// One invocation's worth of audio features
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SpectralFrame {
    /// Bin magnitudes, low to high frequency
    pub bins: [u8; FFT_BINS],
    /// Aggregate energy level
    pub energy: u16,
    /// Rhythmic beat reported by the front end
    pub beat: bool,
    /// Sound-event onset reported by the front end
    pub onset: bool,
}

impl SpectralFrame {
    /// Silent frame with no flags set
    pub fn silent() -> Self {
        Self::default()
    }

    /// Frame with the given bins and energy, flags cleared
    pub fn with_bins(bins: [u8; FFT_BINS], energy: u16) -> Self {
        Self {
            bins,
            energy,
            beat: false,
            onset: false,
        }
    }

    /// Set the beat flag
    pub fn beat(mut self, beat: bool) -> Self {
        self.beat = beat;
        self
    }

    /// Set the onset flag
    pub fn onset(mut self, onset: bool) -> Self {
        self.onset = onset;
        self
    }
}

/// Source of spectral frames, polled once per invocation.
pub trait SpectralFeatureReader {
    /// Fetch the features for the current invocation
    fn read_frame(&mut self) -> SpectralFrame;
}

impl<F> SpectralFeatureReader for F
where
    F: FnMut() -> SpectralFrame,
{
    fn read_frame(&mut self) -> SpectralFrame {
        self()
    }
}
