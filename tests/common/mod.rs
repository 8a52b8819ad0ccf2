//! Shared test utilities

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tracing_subscriber::EnvFilter;
use voicebrush::{AudioFrame, DrawPoint, DrawSurface, Error, Result, ToolType};

/// One surface call, in the order the engine issued it
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceOp {
    Tool(ToolType),
    BrushColor(String),
    BrushSize(f32),
    Background(String),
    Point(DrawPoint),
    Clear,
}

/// Recording stand-in for the host whiteboard
///
/// Every call is appended to an ordered log. Flip [`reject_all`] to make
/// the surface refuse everything instead, for resilience tests.
///
/// [`reject_all`]: Self::reject_all
#[derive(Default)]
pub struct RecordingSurface {
    ops: Mutex<Vec<SurfaceOp>>,
    rejecting: AtomicBool,
}

impl RecordingSurface {
    /// Refuse every call from now on
    pub fn reject_all(&self) {
        self.rejecting.store(true, Ordering::Relaxed);
    }

    /// Full call log, oldest first
    #[must_use]
    pub fn ops(&self) -> Vec<SurfaceOp> {
        self.ops.lock().expect("surface log poisoned").clone()
    }

    /// Just the emitted stroke points
    #[must_use]
    pub fn points(&self) -> Vec<DrawPoint> {
        self.ops()
            .into_iter()
            .filter_map(|op| match op {
                SurfaceOp::Point(point) => Some(point),
                _ => None,
            })
            .collect()
    }

    /// Just the selected tools
    #[must_use]
    pub fn tools(&self) -> Vec<ToolType> {
        self.ops()
            .into_iter()
            .filter_map(|op| match op {
                SurfaceOp::Tool(tool) => Some(tool),
                _ => None,
            })
            .collect()
    }

    /// Just the brush colors, as `#rrggbb` strings
    #[must_use]
    pub fn brush_colors(&self) -> Vec<String> {
        self.ops()
            .into_iter()
            .filter_map(|op| match op {
                SurfaceOp::BrushColor(hex) => Some(hex),
                _ => None,
            })
            .collect()
    }

    /// How many times the board was wiped
    #[must_use]
    pub fn clear_count(&self) -> usize {
        self.ops()
            .iter()
            .filter(|op| matches!(op, SurfaceOp::Clear))
            .count()
    }

    fn record(&self, op: SurfaceOp) -> Result<()> {
        if self.rejecting.load(Ordering::Relaxed) {
            return Err(Error::Surface("rejected by test surface".to_string()));
        }
        self.ops.lock().expect("surface log poisoned").push(op);
        Ok(())
    }
}

#[async_trait]
impl DrawSurface for RecordingSurface {
    fn name(&self) -> &'static str {
        "recording"
    }

    async fn set_tool(&self, tool: ToolType) -> Result<()> {
        self.record(SurfaceOp::Tool(tool))
    }

    async fn set_brush_color(&self, hex: &str) -> Result<()> {
        self.record(SurfaceOp::BrushColor(hex.to_string()))
    }

    async fn set_brush_size(&self, size: f32) -> Result<()> {
        self.record(SurfaceOp::BrushSize(size))
    }

    async fn set_background(&self, hex: &str) -> Result<()> {
        self.record(SurfaceOp::Background(hex.to_string()))
    }

    async fn draw_point(&self, point: DrawPoint) -> Result<()> {
        self.record(SurfaceOp::Point(point))
    }

    async fn clear(&self) -> Result<()> {
        self.record(SurfaceOp::Clear)
    }
}

/// Spectrum frame with every bin at `level`
#[must_use]
pub fn flat_frame(level: u8) -> AudioFrame {
    AudioFrame::from_bins(vec![level; 96], 48_000)
}

/// Route engine logs into the test harness output
///
/// Safe to call from every test; later calls are no-ops.
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init()
        .ok();
}
