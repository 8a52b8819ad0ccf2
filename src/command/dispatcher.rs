//! Recognized-speech dispatch onto the drawing surface
//!
//! The dispatcher takes utterances that already came out of speech
//! recognition, resolves them against the rule table, and executes the
//! matched action on the surface. It also owns the continuous drawing
//! walk, a repeating task that nudges a persistent position by a bounded
//! random step and emits it as a stroke point.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::board::{DrawPoint, DrawSurface, ToolType, Viewport};
use crate::command::rules::{CommandAction, NOT_RECOGNIZED, match_rule};
use crate::config::WalkConfig;

/// Intensity attached to walk points, which have no audio level behind them
const WALK_INTENSITY: f32 = 0.5;

/// Executes voice commands against one surface
pub struct CommandDispatcher {
    surface: Arc<dyn DrawSurface>,
    viewport: Viewport,
    walk: WalkConfig,
    position: Arc<Mutex<(f32, f32)>>,
    walker: Option<JoinHandle<()>>,
}

impl CommandDispatcher {
    /// Create a dispatcher bound to `surface`
    ///
    /// The walk position starts at the viewport center and persists across
    /// start/stop cycles.
    #[must_use]
    pub fn new(surface: Arc<dyn DrawSurface>, viewport: Viewport, walk: WalkConfig) -> Self {
        let position = Arc::new(Mutex::new(viewport.center()));
        Self {
            surface,
            viewport,
            walk,
            position,
            walker: None,
        }
    }

    /// Resolve one recognized utterance and execute its action
    ///
    /// Matching is case-insensitive substring containment, first rule in
    /// the table wins. Returns the matched rule's feedback text, or the
    /// not-recognized help text when nothing matches. Surface rejections
    /// are logged and do not change the feedback.
    pub async fn dispatch(&mut self, utterance: &str) -> &'static str {
        let Some(rule) = match_rule(utterance) else {
            debug!(text = utterance, "no command rule matched");
            return NOT_RECOGNIZED;
        };

        info!(feedback = rule.feedback, "voice command matched");
        self.apply(rule.action).await;
        rule.feedback
    }

    /// Start the continuous drawing walk
    ///
    /// Selects the pen tool and spawns the walk timer. Returns `false`
    /// without side effects if the walk is already running.
    pub async fn start_continuous_drawing(&mut self) -> bool {
        if self.is_walking() {
            debug!("continuous drawing already active, ignoring start");
            return false;
        }

        if let Err(e) = self.surface.set_tool(ToolType::Pen).await {
            warn!(error = %e, "surface rejected tool selection");
        }

        self.walker = Some(self.spawn_walker());
        info!("continuous drawing started");
        true
    }

    /// Stop the continuous drawing walk
    ///
    /// Idempotent. The walk position is kept so a later start resumes from
    /// where the pen left off.
    pub fn stop_continuous_drawing(&mut self) -> bool {
        if let Some(task) = self.walker.take() {
            if !task.is_finished() {
                task.abort();
                info!("continuous drawing stopped");
                return true;
            }
        }
        debug!("stop with no active walk");
        false
    }

    /// Whether the walk timer is currently running
    #[must_use]
    pub fn is_walking(&self) -> bool {
        self.walker.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Current walk position
    pub async fn position(&self) -> (f32, f32) {
        *self.position.lock().await
    }

    /// Stop background work before the dispatcher goes away
    pub fn shutdown(&mut self) {
        self.stop_continuous_drawing();
    }

    async fn apply(&mut self, action: CommandAction) {
        match action {
            CommandAction::SelectTool(tool) => {
                if let Err(e) = self.surface.set_tool(tool).await {
                    warn!(error = %e, "surface rejected tool selection");
                }
            }
            CommandAction::SetColor(hex) => {
                if let Err(e) = self.surface.set_brush_color(hex).await {
                    warn!(error = %e, "surface rejected brush color");
                }
            }
            CommandAction::SetSize(px) => {
                if let Err(e) = self.surface.set_brush_size(px).await {
                    warn!(error = %e, "surface rejected brush size");
                }
            }
            CommandAction::SetBackground(hex) => {
                if let Err(e) = self.surface.set_background(hex).await {
                    warn!(error = %e, "surface rejected background color");
                }
            }
            CommandAction::StartContinuous => {
                self.start_continuous_drawing().await;
            }
            CommandAction::StopContinuous => {
                self.stop_continuous_drawing();
            }
            CommandAction::Clear => {
                if let Err(e) = self.surface.clear().await {
                    warn!(error = %e, "surface rejected clear");
                }
            }
        }
    }

    fn spawn_walker(&self) -> JoinHandle<()> {
        let surface = Arc::clone(&self.surface);
        let position = Arc::clone(&self.position);
        let viewport = self.viewport;
        let step = self.walk.step;
        let margin = self.walk.edge_margin;
        let period = self.walk.interval();

        tokio::spawn(async move {
            let mut rng = StdRng::from_entropy();
            let mut ticker = tokio::time::interval(period);
            loop {
                ticker.tick().await;
                let point = {
                    let mut pos = position.lock().await;
                    let x = pos.0 + rng.gen_range(-step..=step);
                    let y = pos.1 + rng.gen_range(-step..=step);
                    *pos = viewport.constrain(x, y, margin);
                    DrawPoint::new(pos.0, pos.1, WALK_INTENSITY)
                };
                if let Err(e) = surface.draw_point(point).await {
                    warn!(error = %e, "surface rejected walk point");
                }
            }
        })
    }
}

impl Drop for CommandDispatcher {
    fn drop(&mut self) {
        if let Some(task) = self.walker.take() {
            task.abort();
        }
    }
}
