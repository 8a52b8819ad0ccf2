//! Audio-reactive stroke generation
//!
//! Position mapping, smoothing, and color selection run over incoming
//! frames, with [`DrawingEngine`] orchestrating sessions, throttling, and
//! shape traces against the host surface.

pub mod color;
pub mod engine;
pub mod mapper;
pub mod shape;
pub mod smoother;

pub use engine::{DrawMode, DrawingEngine, DrawingStats, SessionOptions};
pub use mapper::{BrushDynamics, DrawPattern, PositionMapper};
pub use shape::ShapeKind;
pub use smoother::PathSmoother;
