//! Audio-to-position mapping
//!
//! Two mapping families feed the engine. Audio mode steers the pen by the
//! spectral balance of the frame (band differences scaled by volume), so
//! bass-heavy input pulls one way and treble the other. Pattern mode draws
//! a parametric figure whose amplitude tracks the level. Both clamp the
//! result to a safety margin inside the viewport.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::audio::BandProfile;
use crate::board::{DrawPoint, Viewport};

/// Default safety margin kept between strokes and the viewport edge
pub const DEFAULT_MARGIN: f32 = 50.0;

/// Parametric figure traced in pattern mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrawPattern {
    /// Lissajous-style horizontal wave
    Wave,
    /// Outward-sweeping spiral
    Spiral,
    /// Jitter weighted by the level of a volume-selected bin
    Frequency,
    /// Circular sweep whose speed tracks the level
    Radial,
}

/// Brush width derivation from the audio level
///
/// The level is boosted by `gain` and capped at 100, then divided down and
/// clamped into a pixel range. The engine and visualizer call sites ship
/// different tunings and both are kept.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BrushDynamics {
    /// Level multiplier before the 100 cap
    pub gain: f32,

    /// Divisor from capped level to pixels
    pub divisor: f32,

    /// Smallest brush width in pixels
    pub min_px: f32,

    /// Largest brush width in pixels
    pub max_px: f32,
}

impl BrushDynamics {
    /// Tuning used by the audio-reactive engine path
    pub const ENGINE: Self = Self {
        gain: 200.0,
        divisor: 5.0,
        min_px: 3.0,
        max_px: 20.0,
    };

    /// Tuning used by the pattern visualizer path
    pub const PATTERN: Self = Self {
        gain: 100.0,
        divisor: 2.0,
        min_px: 5.0,
        max_px: 25.0,
    };

    /// Brush width in pixels for a level in `[0, 1]`
    #[must_use]
    pub fn size_for(&self, volume: f32) -> f32 {
        let boosted = (volume * self.gain).min(100.0);
        (boosted / self.divisor).clamp(self.min_px, self.max_px)
    }
}

/// Maps audio features and patterns to clamped surface positions
#[derive(Debug, Clone, Copy)]
pub struct PositionMapper {
    viewport: Viewport,
    margin: f32,
}

impl PositionMapper {
    /// Create a mapper for a viewport with the given safety margin
    #[must_use]
    pub const fn new(viewport: Viewport, margin: f32) -> Self {
        Self { viewport, margin }
    }

    /// Position driven by spectral balance
    ///
    /// Band differences scaled by volume nudge the pen away from center;
    /// bass pulls +x, treble pulls +y, both relative to the mid band.
    #[must_use]
    pub fn from_audio(&self, bands: BandProfile, volume: f32) -> DrawPoint {
        let (cx, cy) = self.viewport.center();
        let x = cx + (bands.low - bands.mid) * volume * 2.0;
        let y = cy + (bands.high - bands.mid) * volume * 2.0;
        let (x, y) = self.viewport.constrain(x, y, self.margin);
        DrawPoint::new(x, y, volume)
    }

    /// Position on a parametric figure
    ///
    /// `elapsed` is seconds since the session started; `None` for the
    /// pattern scatters points around the center instead of tracing a
    /// figure. The amplitude of every figure is the level scaled to
    /// `[0, 100]`.
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn from_pattern<R: Rng>(
        &self,
        pattern: Option<DrawPattern>,
        volume: f32,
        elapsed: f32,
        bins: &[u8],
        rng: &mut R,
    ) -> DrawPoint {
        let amplitude = (volume * 100.0).min(100.0);
        let (cx, cy) = self.viewport.center();

        let (x, y) = match pattern {
            Some(DrawPattern::Wave) => (
                cx + (elapsed * 2.0).sin() * amplitude * 2.0,
                cy + (elapsed * 3.0).cos() * amplitude * 1.5,
            ),
            Some(DrawPattern::Spiral) => {
                let angle = elapsed * 2.0;
                (
                    cx + angle.cos() * amplitude,
                    cy + angle.sin() * amplitude,
                )
            }
            Some(DrawPattern::Frequency) => {
                let weight = if bins.is_empty() {
                    0.0
                } else {
                    let idx = ((bins.len() as f32 * volume).floor() as usize) % bins.len();
                    f32::from(bins[idx]) / 255.0
                };
                (
                    cx + rng.gen_range(-0.5..0.5) * amplitude * weight,
                    cy + rng.gen_range(-0.5..0.5) * amplitude * weight,
                )
            }
            Some(DrawPattern::Radial) => {
                let angle = elapsed * amplitude / 10.0;
                (
                    cx + angle.cos() * amplitude,
                    cy + angle.sin() * amplitude,
                )
            }
            None => (
                cx + rng.gen_range(-0.5..0.5) * amplitude,
                cy + rng.gen_range(-0.5..0.5) * amplitude,
            ),
        };

        let (x, y) = self.viewport.constrain(x, y, self.margin);
        DrawPoint::new(x, y, volume)
    }

    /// Viewport this mapper clamps into
    #[must_use]
    pub const fn viewport(&self) -> Viewport {
        self.viewport
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn mapper() -> PositionMapper {
        PositionMapper::new(Viewport::new(800.0, 600.0), DEFAULT_MARGIN)
    }

    #[test]
    fn test_silent_audio_maps_to_center() {
        let point = mapper().from_audio(BandProfile::default(), 0.0);
        assert!((point.x - 400.0).abs() < f32::EPSILON);
        assert!((point.y - 300.0).abs() < f32::EPSILON);
        assert!((point.intensity - 0.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_band_balance_steers_the_pen() {
        let bands = BandProfile {
            low: 1.0,
            mid: 0.0,
            high: 0.5,
        };
        let point = mapper().from_audio(bands, 1.0);
        assert!((point.x - 402.0).abs() < 1e-4);
        assert!((point.y - 301.0).abs() < 1e-4);
    }

    #[test]
    fn test_positions_respect_the_margin() {
        let tight = PositionMapper::new(Viewport::new(120.0, 120.0), 50.0);
        let bands = BandProfile {
            low: 1.0,
            mid: 0.0,
            high: 1.0,
        };
        let point = tight.from_audio(bands, 1.0);
        assert!((50.0..=70.0).contains(&point.x));
        assert!((50.0..=70.0).contains(&point.y));
    }

    #[test]
    fn test_wave_pattern_is_deterministic() {
        let mut rng = StdRng::seed_from_u64(7);
        let a = mapper().from_pattern(Some(DrawPattern::Wave), 0.5, 1.0, &[], &mut rng);
        let b = mapper().from_pattern(Some(DrawPattern::Wave), 0.5, 1.0, &[], &mut rng);
        assert!((a.x - b.x).abs() < f32::EPSILON);
        assert!((a.y - b.y).abs() < f32::EPSILON);

        let expected_x = 400.0 + 2.0_f32.sin() * 50.0 * 2.0;
        let expected_y = 300.0 + 3.0_f32.cos() * 50.0 * 1.5;
        assert!((a.x - expected_x).abs() < 1e-3);
        assert!((a.y - expected_y).abs() < 1e-3);
    }

    #[test]
    fn test_spiral_radius_tracks_level() {
        let mut rng = StdRng::seed_from_u64(7);
        let point = mapper().from_pattern(Some(DrawPattern::Spiral), 0.8, 0.25, &[], &mut rng);
        let dx = point.x - 400.0;
        let dy = point.y - 300.0;
        let radius = (dx * dx + dy * dy).sqrt();
        assert!((radius - 80.0).abs() < 1e-2);
    }

    #[test]
    fn test_frequency_pattern_uses_selected_bin() {
        let mut rng = StdRng::seed_from_u64(42);
        // volume 0.5 selects the middle bin; zero there pins the point
        let mut bins = vec![255u8; 8];
        bins[4] = 0;
        let point = mapper().from_pattern(Some(DrawPattern::Frequency), 0.5, 0.0, &bins, &mut rng);
        assert!((point.x - 400.0).abs() < f32::EPSILON);
        assert!((point.y - 300.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_frequency_pattern_tolerates_empty_bins() {
        let mut rng = StdRng::seed_from_u64(42);
        let point = mapper().from_pattern(Some(DrawPattern::Frequency), 0.9, 0.0, &[], &mut rng);
        assert!((point.x - 400.0).abs() < f32::EPSILON);
        assert!((point.y - 300.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_default_pattern_scatters_within_amplitude() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..32 {
            let point = mapper().from_pattern(None, 1.0, 0.0, &[], &mut rng);
            assert!((point.x - 400.0).abs() <= 50.0);
            assert!((point.y - 300.0).abs() <= 50.0);
        }
    }

    #[test]
    fn test_brush_dynamics_tunings() {
        // engine tuning: min(v*200, 100) / 5 clamped to [3, 20]
        assert!((BrushDynamics::ENGINE.size_for(0.0) - 3.0).abs() < f32::EPSILON);
        assert!((BrushDynamics::ENGINE.size_for(0.25) - 10.0).abs() < f32::EPSILON);
        assert!((BrushDynamics::ENGINE.size_for(1.0) - 20.0).abs() < f32::EPSILON);

        // pattern tuning: v*100 / 2 clamped to [5, 25]
        assert!((BrushDynamics::PATTERN.size_for(0.0) - 5.0).abs() < f32::EPSILON);
        assert!((BrushDynamics::PATTERN.size_for(0.3) - 15.0).abs() < f32::EPSILON);
        assert!((BrushDynamics::PATTERN.size_for(1.0) - 25.0).abs() < f32::EPSILON);
    }
}
