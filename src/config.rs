//! Engine configuration
//!
//! Typed settings with working defaults, plus an optional TOML overlay the
//! host application can ship. All file fields are optional; the file is a
//! partial overlay on top of the defaults, and a missing or broken file
//! falls back to defaults with a warning rather than failing startup.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::board::Viewport;
use crate::draw::mapper::DEFAULT_MARGIN;
use crate::draw::smoother::DEFAULT_FACTOR;
use crate::{Error, Result};

/// Environment variable naming the optional TOML settings file
pub const CONFIG_PATH_ENV: &str = "VOICEBRUSH_CONFIG";

/// Complete engine configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Host surface dimensions
    pub viewport: Viewport,

    /// Drawing engine tunables
    pub engine: EngineConfig,

    /// Continuous-drawing walk tunables
    pub walk: WalkConfig,

    /// Audio capture tunables
    pub capture: CaptureConfig,
}

/// Drawing engine tunables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// EMA factor applied to stroke positions
    pub smoothing_factor: f32,

    /// Minimum milliseconds between accepted samples
    pub sample_interval_ms: u64,

    /// Most recent stroke points retained for the trail
    pub path_capacity: usize,

    /// Margin strokes keep from the viewport edge, in pixels
    pub edge_margin: f32,

    /// Level at or below which pattern-mode frames are skipped
    pub silence_gate: f32,

    /// Milliseconds between consecutive shape outline points
    pub shape_point_delay_ms: u64,
}

impl EngineConfig {
    /// Throttle window between accepted samples
    #[must_use]
    pub const fn sample_interval(&self) -> Duration {
        Duration::from_millis(self.sample_interval_ms)
    }

    /// Delay between consecutive shape points
    #[must_use]
    pub const fn shape_point_delay(&self) -> Duration {
        Duration::from_millis(self.shape_point_delay_ms)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            smoothing_factor: DEFAULT_FACTOR,
            sample_interval_ms: 50,
            path_capacity: 100,
            edge_margin: DEFAULT_MARGIN,
            silence_gate: 0.1,
            shape_point_delay_ms: 20,
        }
    }
}

/// Continuous-drawing walk tunables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalkConfig {
    /// Milliseconds between walk steps
    pub interval_ms: u64,

    /// Maximum per-axis step distance in pixels
    pub step: f32,

    /// Margin the walk keeps from the viewport edge, in pixels
    pub edge_margin: f32,
}

impl WalkConfig {
    /// Interval between walk steps
    #[must_use]
    pub const fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self {
            interval_ms: 100,
            step: 25.0,
            edge_margin: DEFAULT_MARGIN,
        }
    }
}

/// Audio capture tunables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// FFT window size in samples; the spectrum has half as many bins.
    /// Rounded up to a power of two at use.
    pub fft_size: usize,

    /// Milliseconds between frame reads (display refresh cadence)
    pub tick_ms: u64,
}

impl CaptureConfig {
    /// Interval between frame reads
    #[must_use]
    pub const fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    /// FFT size normalized to a power of two
    #[must_use]
    pub fn normalized_fft_size(&self) -> usize {
        if self.fft_size.is_power_of_two() {
            self.fft_size
        } else {
            let rounded = self.fft_size.next_power_of_two().max(2);
            tracing::warn!(
                configured = self.fft_size,
                rounded,
                "fft_size is not a power of two, rounding up"
            );
            rounded
        }
    }
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            fft_size: 512,
            tick_ms: 16,
        }
    }
}

/// Top-level TOML file schema (partial overlay)
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    viewport: ViewportFile,

    #[serde(default)]
    engine: EngineFile,

    #[serde(default)]
    walk: WalkFile,

    #[serde(default)]
    capture: CaptureFile,
}

#[derive(Debug, Default, Deserialize)]
struct ViewportFile {
    width: Option<f32>,
    height: Option<f32>,
}

#[derive(Debug, Default, Deserialize)]
struct EngineFile {
    smoothing_factor: Option<f32>,
    sample_interval_ms: Option<u64>,
    path_capacity: Option<usize>,
    edge_margin: Option<f32>,
    silence_gate: Option<f32>,
    shape_point_delay_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct WalkFile {
    interval_ms: Option<u64>,
    step: Option<f32>,
    edge_margin: Option<f32>,
}

#[derive(Debug, Default, Deserialize)]
struct CaptureFile {
    fft_size: Option<usize>,
    tick_ms: Option<u64>,
}

impl Config {
    /// Load configuration with `path > $VOICEBRUSH_CONFIG > defaults`
    /// precedence
    ///
    /// A missing or unparseable file logs a warning and yields defaults.
    #[must_use]
    pub fn load(path: Option<&Path>) -> Self {
        let resolved = path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var(CONFIG_PATH_ENV).ok().map(PathBuf::from));

        let Some(resolved) = resolved else {
            return Self::default();
        };

        let file = match load_config_file(&resolved) {
            Ok(file) => {
                tracing::info!(path = %resolved.display(), "loaded config file");
                file
            }
            Err(e) => {
                tracing::warn!(
                    path = %resolved.display(),
                    error = %e,
                    "config file unusable, using defaults"
                );
                ConfigFile::default()
            }
        };
        Self::from_overlay(&file)
    }

    fn from_overlay(file: &ConfigFile) -> Self {
        let defaults = Self::default();
        Self {
            viewport: Viewport::new(
                file.viewport.width.unwrap_or(defaults.viewport.width),
                file.viewport.height.unwrap_or(defaults.viewport.height),
            ),
            engine: EngineConfig {
                smoothing_factor: file
                    .engine
                    .smoothing_factor
                    .unwrap_or(defaults.engine.smoothing_factor),
                sample_interval_ms: file
                    .engine
                    .sample_interval_ms
                    .unwrap_or(defaults.engine.sample_interval_ms),
                path_capacity: file
                    .engine
                    .path_capacity
                    .unwrap_or(defaults.engine.path_capacity),
                edge_margin: file
                    .engine
                    .edge_margin
                    .unwrap_or(defaults.engine.edge_margin),
                silence_gate: file
                    .engine
                    .silence_gate
                    .unwrap_or(defaults.engine.silence_gate),
                shape_point_delay_ms: file
                    .engine
                    .shape_point_delay_ms
                    .unwrap_or(defaults.engine.shape_point_delay_ms),
            },
            walk: WalkConfig {
                interval_ms: file.walk.interval_ms.unwrap_or(defaults.walk.interval_ms),
                step: file.walk.step.unwrap_or(defaults.walk.step),
                edge_margin: file.walk.edge_margin.unwrap_or(defaults.walk.edge_margin),
            },
            capture: CaptureConfig {
                fft_size: file.capture.fft_size.unwrap_or(defaults.capture.fft_size),
                tick_ms: file.capture.tick_ms.unwrap_or(defaults.capture.tick_ms),
            },
        }
    }
}

/// Read and parse the TOML overlay
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    if !path.exists() {
        return Err(Error::Config(format!(
            "config file not found: {}",
            path.display()
        )));
    }

    let content = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_shipped_tunables() {
        let config = Config::default();
        assert!((config.viewport.width - 1280.0).abs() < f32::EPSILON);
        assert!((config.viewport.height - 720.0).abs() < f32::EPSILON);
        assert!((config.engine.smoothing_factor - 0.3).abs() < f32::EPSILON);
        assert_eq!(config.engine.sample_interval_ms, 50);
        assert_eq!(config.engine.path_capacity, 100);
        assert_eq!(config.walk.interval_ms, 100);
        assert!((config.walk.step - 25.0).abs() < f32::EPSILON);
        assert_eq!(config.capture.fft_size, 512);
    }

    #[test]
    fn test_partial_overlay_keeps_defaults_elsewhere() {
        let file: ConfigFile = toml::from_str(
            r"
            [engine]
            sample_interval_ms = 33

            [viewport]
            width = 1920.0
            ",
        )
        .unwrap();
        let config = Config::from_overlay(&file);

        assert_eq!(config.engine.sample_interval_ms, 33);
        assert!((config.viewport.width - 1920.0).abs() < f32::EPSILON);
        // untouched fields keep defaults
        assert!((config.viewport.height - 720.0).abs() < f32::EPSILON);
        assert_eq!(config.engine.path_capacity, 100);
    }

    #[test]
    fn test_missing_config_file_falls_back_to_defaults() {
        let missing = Path::new("/nonexistent/voicebrush.toml");
        let err = load_config_file(missing).unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        let config = Config::load(Some(missing));
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_fft_size_rounds_up_to_power_of_two() {
        let capture = CaptureConfig {
            fft_size: 500,
            tick_ms: 16,
        };
        assert_eq!(capture.normalized_fft_size(), 512);

        let exact = CaptureConfig::default();
        assert_eq!(exact.normalized_fft_size(), 512);
    }
}
