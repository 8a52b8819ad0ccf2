//! Named shape outlines as point sequences
//!
//! Shapes are emitted as ordered full-intensity points that the surface
//! connects into a stroke. Point counts are part of the contract with the
//! host renderer and stay fixed.

use std::f32::consts::{PI, TAU};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::board::DrawPoint;
use crate::{Error, Result};

/// Shapes the engine can trace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    /// 60-segment circle
    Circle,
    /// Axis-aligned square anchored at its top-left corner
    Rectangle,
    /// Equilateral triangle, apex up
    Triangle,
    /// Five-pointed star
    Star,
    /// Classic parametric heart curve
    Heart,
}

impl FromStr for ShapeKind {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self> {
        match name.trim().to_lowercase().as_str() {
            "circle" => Ok(Self::Circle),
            "rectangle" => Ok(Self::Rectangle),
            "triangle" => Ok(Self::Triangle),
            "star" => Ok(Self::Star),
            "heart" => Ok(Self::Heart),
            other => Err(Error::UnsupportedShape(other.to_string())),
        }
    }
}

impl ShapeKind {
    /// Lowercase shape name
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Circle => "circle",
            Self::Rectangle => "rectangle",
            Self::Triangle => "triangle",
            Self::Star => "star",
            Self::Heart => "heart",
        }
    }
}

/// Trace a shape's outline around `(x, y)` with the given size
///
/// Closed shapes repeat their first point at the end. The rectangle is the
/// one corner-anchored shape: `(x, y)` is its top-left corner and `size`
/// its side length; every other shape treats `(x, y)` as its center.
#[must_use]
pub fn outline(kind: ShapeKind, x: f32, y: f32, size: f32) -> Vec<DrawPoint> {
    match kind {
        ShapeKind::Circle => circle(x, y, size),
        ShapeKind::Rectangle => rectangle(x, y, size),
        ShapeKind::Triangle => triangle(x, y, size),
        ShapeKind::Star => star(x, y, size),
        ShapeKind::Heart => heart(x, y, size),
    }
}

/// Resolve a shape by name and trace it
///
/// # Errors
///
/// Returns [`Error::UnsupportedShape`] for names outside the supported set,
/// without emitting anything.
pub fn outline_named(name: &str, x: f32, y: f32, size: f32) -> Result<Vec<DrawPoint>> {
    let kind = ShapeKind::from_str(name)?;
    Ok(outline(kind, x, y, size))
}

#[allow(clippy::cast_precision_loss)]
fn circle(cx: f32, cy: f32, radius: f32) -> Vec<DrawPoint> {
    const SEGMENTS: usize = 60;
    (0..=SEGMENTS)
        .map(|i| {
            let angle = i as f32 / SEGMENTS as f32 * TAU;
            DrawPoint::at(cx + angle.cos() * radius, cy + angle.sin() * radius)
        })
        .collect()
}

fn rectangle(x: f32, y: f32, side: f32) -> Vec<DrawPoint> {
    vec![
        DrawPoint::at(x, y),
        DrawPoint::at(x + side, y),
        DrawPoint::at(x + side, y + side),
        DrawPoint::at(x, y + side),
        DrawPoint::at(x, y),
    ]
}

fn triangle(cx: f32, cy: f32, side: f32) -> Vec<DrawPoint> {
    let height = side * 3.0_f32.sqrt() / 2.0;
    let apex = DrawPoint::at(cx, cy - height / 2.0);
    vec![
        apex,
        DrawPoint::at(cx - side / 2.0, cy + height / 2.0),
        DrawPoint::at(cx + side / 2.0, cy + height / 2.0),
        apex,
    ]
}

#[allow(clippy::cast_precision_loss)]
fn star(cx: f32, cy: f32, outer: f32) -> Vec<DrawPoint> {
    const VERTICES: usize = 10;
    let inner = outer * 0.4;
    let mut points: Vec<DrawPoint> = (0..VERTICES)
        .map(|i| {
            let angle = i as f32 / VERTICES as f32 * TAU - PI / 2.0;
            let radius = if i % 2 == 0 { outer } else { inner };
            DrawPoint::at(cx + angle.cos() * radius, cy + angle.sin() * radius)
        })
        .collect();
    points.push(points[0]);
    points
}

#[allow(clippy::cast_precision_loss)]
fn heart(cx: f32, cy: f32, size: f32) -> Vec<DrawPoint> {
    const STEPS: usize = 100;
    (0..=STEPS)
        .map(|i| {
            let t = i as f32 / STEPS as f32 * TAU;
            // only the y polynomial is normalized by 16; x keeps the
            // curve's full 16 * size amplitude
            let hx = 16.0 * t.sin().powi(3);
            let hy = 13.0 * t.cos()
                - 5.0 * (2.0 * t).cos()
                - 2.0 * (3.0 * t).cos()
                - (4.0 * t).cos();
            DrawPoint::at(cx + hx * size, cy - hy * size / 16.0)
        })
        .collect()
}
