//! Vision Layer
//!
//! Turns recognizer output into team-number detections and maps their
//! frame-space geometry onto the on-screen preview.
//!
//! Coordinates come in two spaces that must never be mixed:
//! - frame space: the raw sensor frame in its native landscape orientation
//! - display space: the rendered preview after rotation and aspect-fill cropping

pub mod extract;
pub mod geometry;
pub mod recognition;

use serde::{Deserialize, Serialize};

use crate::directory::TeamInfo;

pub use extract::NumberExtractor;
pub use geometry::{AspectFill, DisplayTransform, OverlayBox, Rect};
pub use recognition::{RecognitionResult, TextBlock, TextElement, TextLine, TextSymbol};

/// A coordinate pair in either frame or display space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point in the same space
    pub fn distance(&self, other: &Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

/// Sensor frame dimensions in native (landscape) orientation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameSize {
    pub width: f64,
    pub height: f64,
}

impl FrameSize {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Dimensions after a quarter turn (landscape <-> portrait)
    pub fn rotated(&self) -> Self {
        Self {
            width: self.height,
            height: self.width,
        }
    }

    /// True when either side is zero, negative, or not finite.
    ///
    /// A preview that has not been laid out yet reports 0x0.
    pub fn is_degenerate(&self) -> bool {
        !(self.width.is_finite() && self.height.is_finite())
            || self.width <= 0.0
            || self.height <= 0.0
    }

    pub fn aspect(&self) -> f64 {
        self.width / self.height
    }
}

/// Four corners in fixed order: top-left, top-right, bottom-right, bottom-left
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quad(pub [Point; 4]);

impl Quad {
    pub const fn new(top_left: Point, top_right: Point, bottom_right: Point, bottom_left: Point) -> Self {
        Self([top_left, top_right, bottom_right, bottom_left])
    }

    /// Build a quad from recognizer corner points.
    ///
    /// Returns `None` unless exactly four points are present.
    pub fn from_points(points: &[Point]) -> Option<Self> {
        match points {
            [a, b, c, d] => Some(Self([*a, *b, *c, *d])),
            _ => None,
        }
    }

    /// Quad covering a run of glyphs, from the left edge of `first`
    /// to the right edge of `last`
    pub fn spanning(first: &Quad, last: &Quad) -> Self {
        Self::new(
            first.top_left(),
            last.top_right(),
            last.bottom_right(),
            first.bottom_left(),
        )
    }

    pub fn top_left(&self) -> Point {
        self.0[0]
    }

    pub fn top_right(&self) -> Point {
        self.0[1]
    }

    pub fn bottom_right(&self) -> Point {
        self.0[2]
    }

    pub fn bottom_left(&self) -> Point {
        self.0[3]
    }

    pub fn points(&self) -> &[Point; 4] {
        &self.0
    }

    /// Apply `f` to every corner, preserving corner order
    pub fn map(&self, mut f: impl FnMut(Point) -> Point) -> Self {
        Self(self.0.map(&mut f))
    }
}

/// A numeric token surfaced from one analyzed frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedNumber {
    /// 3-5 ASCII digits
    pub text: String,
    /// Corners in the source frame's coordinate space
    pub corner_points: Quad,
    /// Directory record, filled in by enrichment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_info: Option<TeamInfo>,
}

impl DetectedNumber {
    pub fn new(text: impl Into<String>, corner_points: Quad) -> Self {
        Self {
            text: text.into(),
            corner_points,
            team_info: None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.team_info.is_some()
    }
}
