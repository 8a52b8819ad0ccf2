//! Capture pipeline integration tests
//!
//! Drives a scripted spectrum source through the capture session into the
//! drawing engine, checking the strokes that reach the surface. No audio
//! hardware required.

mod common;

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use common::{RecordingSurface, flat_frame};
use tokio::sync::mpsc;
use voicebrush::config::{CaptureConfig, EngineConfig};
use voicebrush::{
    AudioCaptureSession, AudioFrame, CaptureSource, DrawingEngine, Error, Result, SessionOptions,
    ToolType, Viewport,
};

fn engine_on(surface: Arc<RecordingSurface>) -> DrawingEngine {
    DrawingEngine::new(
        surface,
        Viewport::new(800.0, 600.0),
        EngineConfig::default(),
    )
}

/// Plays back a fixed frame list, one frame per tick, while open
struct ScriptedMicrophone {
    frames: VecDeque<AudioFrame>,
    open: bool,
}

impl ScriptedMicrophone {
    fn with_frames(count: usize, level: u8) -> Self {
        Self {
            frames: (0..count).map(|_| flat_frame(level)).collect(),
            open: false,
        }
    }
}

#[async_trait(?Send)]
impl CaptureSource for ScriptedMicrophone {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn open(&mut self) -> Result<()> {
        self.open = true;
        Ok(())
    }

    fn read_frame(&mut self) -> Option<AudioFrame> {
        if self.open { self.frames.pop_front() } else { None }
    }

    fn close(&mut self) {
        self.open = false;
    }
}

/// Never manages to acquire a device
struct UnpluggedMicrophone;

#[async_trait(?Send)]
impl CaptureSource for UnpluggedMicrophone {
    fn name(&self) -> &'static str {
        "unplugged"
    }

    async fn open(&mut self) -> Result<()> {
        Err(Error::CaptureUnavailable("no device attached".to_string()))
    }

    fn read_frame(&mut self) -> Option<AudioFrame> {
        None
    }

    fn close(&mut self) {}
}

#[tokio::test(start_paused = true)]
async fn test_microphone_frames_drive_strokes_end_to_end() {
    common::init_logging();
    let surface = Arc::new(RecordingSurface::default());
    let mut engine = engine_on(Arc::clone(&surface));
    engine.start(SessionOptions::default()).await.unwrap();

    let source = ScriptedMicrophone::with_frames(8, 200);
    let mut session = AudioCaptureSession::new(Box::new(source), &CaptureConfig::default());
    session.open().await.unwrap();
    assert!(session.is_open());

    // Eight 16ms ticks span 112ms; the 50ms throttle accepts two samples
    let (tx, mut rx) = mpsc::channel(1);
    tokio::join!(session.pump(&mut engine, &mut rx), async {
        tokio::time::sleep(Duration::from_millis(130)).await;
        tx.send(()).await.expect("pump stopped early");
    });

    assert_eq!(surface.points().len(), 2);
    assert_eq!(surface.tools(), vec![ToolType::Pen]);
    assert_eq!(engine.stats().path_len, 2);

    session.close();
    assert!(!session.is_open());
}

#[tokio::test]
async fn test_session_lifecycle_is_idempotent() {
    let source = ScriptedMicrophone::with_frames(0, 0);
    let mut session = AudioCaptureSession::new(Box::new(source), &CaptureConfig::default());

    session.open().await.unwrap();
    session.open().await.unwrap();
    assert!(session.is_open());

    session.close();
    assert!(!session.is_open());
    session.close();

    // A closed session can be reopened
    session.open().await.unwrap();
    assert!(session.is_open());
}

#[tokio::test]
async fn test_unplugged_microphone_surfaces_the_failure() {
    common::init_logging();
    let mut session = AudioCaptureSession::new(Box::new(UnpluggedMicrophone), &CaptureConfig::default());

    let err = session.open().await.unwrap_err();
    assert!(matches!(err, Error::CaptureUnavailable(_)));
    assert!(!session.is_open());

    // Pumping a session that never opened returns straight away
    let surface = Arc::new(RecordingSurface::default());
    let mut engine = engine_on(Arc::clone(&surface));
    let (_tx, mut rx) = mpsc::channel::<()>(1);
    session.pump(&mut engine, &mut rx).await;
    assert!(surface.ops().is_empty());
}
