//! Exponential path smoothing
//!
//! Raw mapped positions jitter with every spectrum frame. Strokes are run
//! through a light exponential moving average before they reach the
//! surface so the pen appears to glide instead of teleporting.

use crate::board::DrawPoint;

/// Default smoothing factor; higher values follow the raw input faster
pub const DEFAULT_FACTOR: f32 = 0.3;

/// Exponential moving average over stroke positions
///
/// The first point after construction or [`reset`](Self::reset) passes
/// through unchanged; every later point moves `factor` of the way from the
/// previous smoothed position toward the raw one. Intensity is not
/// smoothed, it always carries the latest sample's value.
#[derive(Debug, Clone)]
pub struct PathSmoother {
    factor: f32,
    last: Option<(f32, f32)>,
}

impl PathSmoother {
    /// Create a smoother with an explicit factor
    #[must_use]
    pub const fn new(factor: f32) -> Self {
        Self { factor, last: None }
    }

    /// Smooth one raw point
    pub fn smooth(&mut self, raw: DrawPoint) -> DrawPoint {
        let (x, y) = match self.last {
            Some((px, py)) => (
                px + (raw.x - px) * self.factor,
                py + (raw.y - py) * self.factor,
            ),
            None => (raw.x, raw.y),
        };
        self.last = Some((x, y));
        DrawPoint::new(x, y, raw.intensity)
    }

    /// Forget the smoothing history; the next point passes through raw
    pub fn reset(&mut self) {
        self.last = None;
    }
}

impl Default for PathSmoother {
    fn default() -> Self {
        Self::new(DEFAULT_FACTOR)
    }
}
