//! Frequency-domain feature extraction
//!
//! Everything in this module is total: empty bin arrays, empty or
//! out-of-range band windows, and silent input all produce well-defined
//! values instead of panicking. Frames arrive as byte-scaled spectrum bins
//! (0-255 per bin, like the host's analyser output) and all derived
//! features are normalized to `[0, 1]`.

use std::ops::Range;

use serde::{Deserialize, Serialize};

/// One spectrum snapshot handed to the drawing pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioFrame {
    /// Byte-scaled frequency bins, lowest frequency first. The capture
    /// backend produces a power-of-two count (typically 128 or 256).
    pub bins: Vec<u8>,

    /// Overall level in `[0, 1]`, always `mean(bins) / 255`
    pub volume: f32,

    /// Estimated pitch of the dominant bin in Hz
    pub pitch_hz: f32,
}

impl AudioFrame {
    /// Build a frame from raw bins, deriving volume and pitch
    #[must_use]
    pub fn from_bins(bins: Vec<u8>, sample_rate: u32) -> Self {
        let volume = volume(&bins);
        let pitch_hz = pitch_hz(&bins, sample_rate);
        Self {
            bins,
            volume,
            pitch_hz,
        }
    }

    /// A silent frame with `bin_count` zeroed bins
    #[must_use]
    pub fn silent(bin_count: usize) -> Self {
        Self {
            bins: vec![0; bin_count],
            volume: 0.0,
            pitch_hz: 0.0,
        }
    }

    /// Low/mid/high band averages of this frame's bins
    #[must_use]
    pub fn bands(&self) -> BandProfile {
        band_profile(&self.bins)
    }
}

/// Averages over the low/mid/high thirds of the spectrum
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BandProfile {
    /// Average of the lowest third, `[0, 1]`
    pub low: f32,

    /// Average of the middle third, `[0, 1]`
    pub mid: f32,

    /// Average of the highest third, `[0, 1]`
    pub high: f32,
}

/// Mean of a bin slice, normalized to `[0, 1]`
#[allow(clippy::cast_precision_loss)]
fn mean_level(bins: &[u8]) -> f32 {
    if bins.is_empty() {
        return 0.0;
    }
    let sum: f32 = bins.iter().map(|&b| f32::from(b)).sum();
    sum / bins.len() as f32 / 255.0
}

/// Overall volume of a frame: `mean(bins) / 255`
///
/// Empty input yields 0.0.
#[must_use]
pub fn volume(bins: &[u8]) -> f32 {
    mean_level(bins)
}

/// Average level over a half-open bin window, `[0, 1]`
///
/// The window is clipped to the available bins; an empty or fully
/// out-of-range window yields 0.0.
#[must_use]
pub fn band_average(bins: &[u8], window: Range<usize>) -> f32 {
    let lo = window.start.min(bins.len());
    let hi = window.end.min(bins.len());
    if lo >= hi {
        return 0.0;
    }
    mean_level(&bins[lo..hi])
}

/// Index of the loudest bin; ties resolve to the first maximum
///
/// Empty input yields 0.
#[must_use]
pub fn dominant_bin_index(bins: &[u8]) -> usize {
    let mut best = 0usize;
    let mut best_value = 0u8;
    for (i, &b) in bins.iter().enumerate() {
        if b > best_value {
            best = i;
            best_value = b;
        }
    }
    best
}

/// Pitch estimate of the dominant bin in Hz
///
/// The bin array spans `0..sample_rate / 2`, so the dominant bin index
/// scales linearly into that range. Empty input yields 0.0.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn pitch_hz(bins: &[u8], sample_rate: u32) -> f32 {
    if bins.is_empty() {
        return 0.0;
    }
    let position = dominant_bin_index(bins) as f32 / bins.len() as f32;
    position * (sample_rate as f32 / 2.0)
}

/// Low/mid/high windows as thirds of a `len`-bin spectrum
#[must_use]
pub const fn band_thirds(len: usize) -> [Range<usize>; 3] {
    let third = len / 3;
    [0..third, third..third * 2, third * 2..len]
}

/// Low/mid/high band averages over thirds of the spectrum
#[must_use]
pub fn band_profile(bins: &[u8]) -> BandProfile {
    let [low, mid, high] = band_thirds(bins.len());
    BandProfile {
        low: band_average(bins, low),
        mid: band_average(bins, mid),
        high: band_average(bins, high),
    }
}
