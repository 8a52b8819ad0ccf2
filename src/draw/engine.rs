//! Drawing session lifecycle and the audio-to-stroke pipeline
//!
//! The engine owns one optional session at a time. Frames flow in, get
//! gated and throttled, mapped to a position, smoothed, appended to the
//! trail, and emitted to the surface together with the volume-derived
//! brush width and color. Shape outlines stream out on their own task so
//! they can be cancelled mid-trace.

use std::collections::VecDeque;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, trace, warn};
use uuid::Uuid;

use crate::Result;
use crate::audio::{AudioFrame, FrameConsumer};
use crate::board::{DrawPoint, DrawSurface, ToolType, Viewport};
use crate::config::EngineConfig;
use crate::draw::color;
use crate::draw::mapper::{BrushDynamics, DrawPattern, PositionMapper};
use crate::draw::shape::{self, ShapeKind};
use crate::draw::smoother::PathSmoother;

/// How an active session turns frames into positions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawMode {
    /// Spectral-balance steering (band differences move the pen)
    Reactive,
    /// Parametric figure; `None` scatters points around the center
    Pattern(Option<DrawPattern>),
}

/// Surface state applied when a session starts
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Mapping mode for the session
    pub mode: DrawMode,

    /// Tool selected on the surface
    pub tool: ToolType,

    /// Initial brush color, if the session should override it
    pub brush_color: Option<String>,

    /// Initial brush width in pixels, if the session should override it
    pub brush_size: Option<f32>,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            mode: DrawMode::Reactive,
            tool: ToolType::Pen,
            brush_color: None,
            brush_size: None,
        }
    }
}

impl SessionOptions {
    /// Options for a pattern session
    #[must_use]
    pub fn pattern(pattern: Option<DrawPattern>) -> Self {
        Self {
            mode: DrawMode::Pattern(pattern),
            ..Self::default()
        }
    }
}

/// Session snapshot for the host UI
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DrawingStats {
    /// Whether a session is active
    pub active: bool,

    /// Pattern the session traces, for pattern sessions
    pub pattern: Option<DrawPattern>,

    /// Points currently in the trail
    pub path_len: usize,

    /// Most recent smoothed position
    pub last_position: Option<DrawPoint>,
}

struct Session {
    id: Uuid,
    mode: DrawMode,
    smoother: PathSmoother,
    path: VecDeque<DrawPoint>,
    started: Instant,
    last_emit: Option<Instant>,
}

/// Audio-reactive drawing engine bound to one surface
pub struct DrawingEngine {
    surface: Arc<dyn DrawSurface>,
    config: EngineConfig,
    mapper: PositionMapper,
    rng: StdRng,
    session: Option<Session>,
    shape_task: Option<JoinHandle<()>>,
}

impl DrawingEngine {
    /// Create an engine drawing onto `surface` within `viewport`
    #[must_use]
    pub fn new(surface: Arc<dyn DrawSurface>, viewport: Viewport, config: EngineConfig) -> Self {
        let mapper = PositionMapper::new(viewport, config.edge_margin);
        Self {
            surface,
            config,
            mapper,
            rng: StdRng::from_entropy(),
            session: None,
            shape_task: None,
        }
    }

    /// Begin a drawing session
    ///
    /// Applies the options' tool, color, and size to the surface, then
    /// accepts frames until [`stop`](Self::stop). Returns `false` without
    /// touching anything if a session is already active. Any in-flight
    /// shape trace is cancelled.
    ///
    /// # Errors
    ///
    /// Currently infallible; surface rejections while applying options are
    /// logged and skipped.
    pub async fn start(&mut self, options: SessionOptions) -> Result<bool> {
        if self.session.is_some() {
            debug!("drawing session already active, ignoring start");
            return Ok(false);
        }

        self.cancel_shape_trace();

        if let Err(e) = self.surface.set_tool(options.tool).await {
            warn!(error = %e, "surface rejected tool selection");
        }
        if let Some(hex) = &options.brush_color {
            if let Err(e) = self.surface.set_brush_color(hex).await {
                warn!(error = %e, "surface rejected brush color");
            }
        }
        if let Some(size) = options.brush_size {
            if let Err(e) = self.surface.set_brush_size(size).await {
                warn!(error = %e, "surface rejected brush size");
            }
        }

        let id = Uuid::new_v4();
        info!(session = %id, mode = ?options.mode, "drawing session started");
        self.session = Some(Session {
            id,
            mode: options.mode,
            smoother: PathSmoother::new(self.config.smoothing_factor),
            path: VecDeque::with_capacity(self.config.path_capacity),
            started: Instant::now(),
            last_emit: None,
        });
        Ok(true)
    }

    /// Feed one audio frame into the active session
    ///
    /// Frames while idle are ignored. Pattern sessions skip frames at or
    /// below the silence gate. Accepted frames are throttled to one per
    /// sample interval; each accepted frame emits brush size, color, and a
    /// smoothed point to the surface. Surface rejections are logged and
    /// the session keeps running.
    pub async fn feed(&mut self, frame: &AudioFrame) {
        let Some(session) = &mut self.session else {
            trace!("frame while idle, ignoring");
            return;
        };

        if matches!(session.mode, DrawMode::Pattern(_)) && frame.volume <= self.config.silence_gate
        {
            trace!(volume = frame.volume, "below silence gate, skipping");
            return;
        }

        let now = Instant::now();
        if let Some(last) = session.last_emit {
            if now.duration_since(last) < self.config.sample_interval() {
                trace!("throttled sample");
                return;
            }
        }
        session.last_emit = Some(now);

        let bands = frame.bands();
        let (raw, brush_size) = match session.mode {
            DrawMode::Reactive => (
                self.mapper.from_audio(bands, frame.volume),
                BrushDynamics::ENGINE.size_for(frame.volume),
            ),
            DrawMode::Pattern(pattern) => {
                let elapsed = session.started.elapsed().as_secs_f32();
                (
                    self.mapper.from_pattern(
                        pattern,
                        frame.volume,
                        elapsed,
                        &frame.bins,
                        &mut self.rng,
                    ),
                    BrushDynamics::PATTERN.size_for(frame.volume),
                )
            }
        };

        let point = session.smoother.smooth(raw);
        session.path.push_back(point);
        while session.path.len() > self.config.path_capacity {
            session.path.pop_front();
        }

        let stroke_color = color::color_for_frame(frame.volume, bands.high);

        if let Err(e) = self.surface.set_brush_size(brush_size).await {
            warn!(error = %e, "surface rejected brush size");
        }
        if let Err(e) = self.surface.set_brush_color(stroke_color).await {
            warn!(error = %e, "surface rejected brush color");
        }
        if let Err(e) = self.surface.draw_point(point).await {
            warn!(error = %e, "surface rejected stroke point");
        }
    }

    /// Stop the active session
    ///
    /// Idempotent. Cancels any in-flight shape trace, drops the trail, and
    /// resets smoothing state.
    pub fn stop(&mut self) {
        self.cancel_shape_trace();
        if let Some(session) = self.session.take() {
            info!(session = %session.id, points = session.path.len(), "drawing session stopped");
        } else {
            debug!("stop with no active session");
        }
    }

    /// Wipe the surface
    ///
    /// # Errors
    ///
    /// Returns the surface rejection, if any.
    pub async fn clear(&self) -> Result<()> {
        self.surface.clear().await
    }

    /// Stream a shape outline to the surface
    ///
    /// Points are emitted on a background task with a fixed delay between
    /// consecutive points. A trace already in flight is cancelled and
    /// replaced.
    pub fn trace_shape(&mut self, kind: ShapeKind, x: f32, y: f32, size: f32) {
        let points = shape::outline(kind, x, y, size);
        debug!(shape = kind.name(), points = points.len(), "tracing shape");
        self.spawn_shape_trace(points);
    }

    /// Resolve a shape by name and stream it to the surface
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::UnsupportedShape`] for unknown names; nothing
    /// is emitted or cancelled in that case.
    pub fn trace_shape_named(&mut self, name: &str, x: f32, y: f32, size: f32) -> Result<()> {
        let kind = ShapeKind::from_str(name)?;
        self.trace_shape(kind, x, y, size);
        Ok(())
    }

    /// Snapshot of the active session
    #[must_use]
    pub fn stats(&self) -> DrawingStats {
        self.session.as_ref().map_or(
            DrawingStats {
                active: false,
                pattern: None,
                path_len: 0,
                last_position: None,
            },
            |session| DrawingStats {
                active: true,
                pattern: match session.mode {
                    DrawMode::Reactive => None,
                    DrawMode::Pattern(pattern) => pattern,
                },
                path_len: session.path.len(),
                last_position: session.path.back().copied(),
            },
        )
    }

    /// Recent trail of smoothed points, oldest first
    #[must_use]
    pub fn path(&self) -> Vec<DrawPoint> {
        self.session
            .as_ref()
            .map_or_else(Vec::new, |session| session.path.iter().copied().collect())
    }

    /// Whether a session is currently active
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.session.is_some()
    }

    fn spawn_shape_trace(&mut self, points: Vec<DrawPoint>) {
        self.cancel_shape_trace();
        let surface = Arc::clone(&self.surface);
        let delay = self.config.shape_point_delay();
        self.shape_task = Some(tokio::spawn(async move {
            for (index, point) in points.into_iter().enumerate() {
                if index > 0 {
                    tokio::time::sleep(delay).await;
                }
                if let Err(e) = surface.draw_point(point).await {
                    warn!(error = %e, "surface rejected shape point");
                }
            }
        }));
    }

    fn cancel_shape_trace(&mut self) {
        if let Some(task) = self.shape_task.take() {
            if !task.is_finished() {
                task.abort();
                debug!("cancelled in-flight shape trace");
            }
        }
    }
}

impl Drop for DrawingEngine {
    fn drop(&mut self) {
        self.cancel_shape_trace();
    }
}

#[async_trait(?Send)]
impl FrameConsumer for DrawingEngine {
    async fn consume(&mut self, frame: &AudioFrame) {
        self.feed(frame).await;
    }
}
