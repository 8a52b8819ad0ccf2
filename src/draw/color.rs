//! Volume-driven stroke color selection

/// Stroke color for quiet input
pub const QUIET_BLUE: &str = "#3b82f6";

/// Stroke color for soft input
pub const SOFT_GREEN: &str = "#10b981";

/// Stroke color for moderate input
pub const MODERATE_YELLOW: &str = "#f59e0b";

/// Stroke color for loud input
pub const LOUD_RED: &str = "#ef4444";

/// Stroke color for very loud input
pub const PEAK_PURPLE: &str = "#8b5cf6";

/// Accent used when high-frequency content dominates
pub const TREBLE_PINK: &str = "#ec4899";

/// High-band level above which the treble accent takes over
pub const TREBLE_ACCENT_THRESHOLD: f32 = 0.7;

/// Map an overall volume in `[0, 1]` to a stroke color
#[must_use]
pub fn color_for_volume(volume: f32) -> &'static str {
    if volume < 0.2 {
        QUIET_BLUE
    } else if volume < 0.4 {
        SOFT_GREEN
    } else if volume < 0.6 {
        MODERATE_YELLOW
    } else if volume < 0.8 {
        LOUD_RED
    } else {
        PEAK_PURPLE
    }
}

/// Map volume plus high-band level to a stroke color
///
/// Strong treble overrides the volume ladder with the pink accent.
#[must_use]
pub fn color_for_frame(volume: f32, high_band: f32) -> &'static str {
    if high_band > TREBLE_ACCENT_THRESHOLD {
        TREBLE_PINK
    } else {
        color_for_volume(volume)
    }
}
