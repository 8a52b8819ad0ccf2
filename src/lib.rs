//! Voicebrush - voice and audio reactive drawing for shared whiteboards
//!
//! This library turns microphone input and recognized speech into drawing
//! activity on a host whiteboard:
//! - Spectral feature extraction (volume, band balance, dominant pitch)
//! - Audio-reactive and pattern-driven stroke generation
//! - Animated parametric shape tracing
//! - Voice command dispatch (tools, colors, sizes, backgrounds, clears)
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                      Inputs                         │
//! │   Microphone (cpal)   │   Recognized speech text    │
//! └────────────────────┬────────────────────────────────┘
//!                      │
//! ┌────────────────────▼────────────────────────────────┐
//! │                 Drawing Pipeline                    │
//! │   Capture  │  Features  │  Engine  │  Commands      │
//! └────────────────────┬────────────────────────────────┘
//!                      │
//! ┌────────────────────▼────────────────────────────────┐
//! │          DrawSurface (host whiteboard)              │
//! │   tools  │  colors  │  sizes  │  points  │  clear   │
//! └─────────────────────────────────────────────────────┘
//! ```

pub mod audio;
pub mod board;
pub mod command;
pub mod config;
pub mod draw;
pub mod error;

pub use audio::{
    AudioCaptureSession, AudioFrame, BandProfile, CaptureSource, FrameConsumer, SpectrumCapture,
};
pub use board::{DrawPoint, DrawSurface, ToolType, Viewport};
pub use command::CommandDispatcher;
pub use config::Config;
pub use draw::{DrawMode, DrawPattern, DrawingEngine, DrawingStats, SessionOptions, ShapeKind};
pub use error::{Error, Result};
