//! Drawing surface vocabulary shared with the host whiteboard
//!
//! The engine never renders anything itself. Everything it produces is
//! expressed against the [`DrawSurface`] trait, which the host application
//! implements on top of its actual board (local canvas, collaborative
//! session, test recorder).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::Result;

/// A single brush point emitted to the surface
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DrawPoint {
    /// Horizontal position in surface pixels
    pub x: f32,

    /// Vertical position in surface pixels
    pub y: f32,

    /// Stroke intensity in `[0, 1]`, derived from audio level
    pub intensity: f32,
}

impl DrawPoint {
    /// Create a point with an explicit intensity
    #[must_use]
    pub const fn new(x: f32, y: f32, intensity: f32) -> Self {
        Self { x, y, intensity }
    }

    /// Create a full-intensity point (shape outlines)
    #[must_use]
    pub const fn at(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            intensity: 1.0,
        }
    }
}

/// Drawable area of the host surface, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Surface width
    pub width: f32,

    /// Surface height
    pub height: f32,
}

impl Viewport {
    /// Create a viewport from pixel dimensions
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Center of the viewport
    #[must_use]
    pub fn center(&self) -> (f32, f32) {
        (self.width / 2.0, self.height / 2.0)
    }

    /// Clamp a position to at least `margin` pixels inside the bounds
    ///
    /// A viewport narrower than twice the margin collapses to the margin
    /// itself rather than panicking, so this stays a min/max chain.
    #[must_use]
    #[allow(clippy::manual_clamp)]
    pub fn constrain(&self, x: f32, y: f32, margin: f32) -> (f32, f32) {
        (
            x.min(self.width - margin).max(margin),
            y.min(self.height - margin).max(margin),
        )
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 720.0)
    }
}

/// Tool identifiers understood by the host whiteboard
///
/// The numeric codes are the host's wire values and must stay stable. They
/// look like bitmask bits but are never combined; this is a closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum ToolType {
    /// No tool selected
    None,
    /// Freehand pen
    Pen,
    /// Text insertion
    Text,
    /// Straight line
    Line,
    /// Rectangle
    Rect,
    /// Ellipse / circle
    Ellipse,
    /// Selection tool
    Selector,
    /// Eraser
    Eraser,
}

impl ToolType {
    /// Wire code used by the host board protocol
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::None => 0,
            Self::Pen => 1,
            Self::Text => 2,
            Self::Line => 4,
            Self::Rect => 8,
            Self::Ellipse => 16,
            Self::Selector => 32,
            Self::Eraser => 64,
        }
    }

    /// Resolve a wire code back to a tool
    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::None),
            1 => Some(Self::Pen),
            2 => Some(Self::Text),
            4 => Some(Self::Line),
            8 => Some(Self::Rect),
            16 => Some(Self::Ellipse),
            32 => Some(Self::Selector),
            64 => Some(Self::Eraser),
            _ => None,
        }
    }
}

impl From<ToolType> for u8 {
    fn from(tool: ToolType) -> Self {
        tool.code()
    }
}

impl TryFrom<u8> for ToolType {
    type Error = String;

    fn try_from(code: u8) -> std::result::Result<Self, Self::Error> {
        Self::from_code(code).ok_or_else(|| format!("unknown tool code: {code}"))
    }
}

/// Trait for drawing surface adapters
///
/// All methods are fallible; a rejected operation is reported to the caller
/// and the engine logs it and keeps going rather than tearing the session
/// down.
#[async_trait]
pub trait DrawSurface: Send + Sync {
    /// Get the surface name (used in log context)
    fn name(&self) -> &'static str;

    /// Select the active tool
    async fn set_tool(&self, tool: ToolType) -> Result<()>;

    /// Set the brush stroke color (`#rrggbb`)
    async fn set_brush_color(&self, hex: &str) -> Result<()>;

    /// Set the brush stroke width in pixels
    async fn set_brush_size(&self, size: f32) -> Result<()>;

    /// Set the board background color (`#rrggbb`)
    async fn set_background(&self, hex: &str) -> Result<()>;

    /// Emit a single brush point
    async fn draw_point(&self, point: DrawPoint) -> Result<()>;

    /// Wipe the board
    async fn clear(&self) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_codes_roundtrip() {
        for tool in [
            ToolType::None,
            ToolType::Pen,
            ToolType::Text,
            ToolType::Line,
            ToolType::Rect,
            ToolType::Ellipse,
            ToolType::Selector,
            ToolType::Eraser,
        ] {
            assert_eq!(ToolType::from_code(tool.code()), Some(tool));
        }
    }

    #[test]
    fn test_unknown_tool_code_is_rejected() {
        assert_eq!(ToolType::from_code(3), None);
        assert_eq!(ToolType::from_code(255), None);
        assert!(ToolType::try_from(7u8).is_err());
    }

    #[test]
    fn test_tool_serializes_as_wire_code() {
        let json = serde_json::to_string(&ToolType::Ellipse).unwrap();
        assert_eq!(json, "16");

        let tool: ToolType = serde_json::from_str("64").unwrap();
        assert_eq!(tool, ToolType::Eraser);
    }

    #[test]
    fn test_constrain_keeps_margin() {
        let viewport = Viewport::new(800.0, 600.0);

        let (x, y) = viewport.constrain(-20.0, 700.0, 50.0);
        assert!((x - 50.0).abs() < f32::EPSILON);
        assert!((y - 550.0).abs() < f32::EPSILON);

        // interior points pass through
        let (x, y) = viewport.constrain(400.0, 300.0, 50.0);
        assert!((x - 400.0).abs() < f32::EPSILON);
        assert!((y - 300.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_constrain_narrow_viewport_collapses_to_margin() {
        let viewport = Viewport::new(60.0, 60.0);
        let (x, y) = viewport.constrain(10.0, 55.0, 50.0);
        assert!((x - 50.0).abs() < f32::EPSILON);
        assert!((y - 50.0).abs() < f32::EPSILON);
    }
}
