//! Frame-to-display coordinate mapping
//!
//! The sensor delivers landscape frames while the preview is portrait and
//! rendered with aspect-fill (center crop). Mapping a frame point onto the
//! preview is a quarter-turn clockwise followed by a uniform scale and a
//! symmetric crop offset on one axis.

use super::{FrameSize, Point, Quad};

/// Rotate a landscape frame point into portrait orientation (90° clockwise).
///
/// `frame` is the landscape frame size; `(x, y)` becomes `(H - y, x)`.
pub fn rotate_to_portrait(point: Point, frame: FrameSize) -> Point {
    Point::new(frame.height - point.y, point.x)
}

/// Inverse of [`rotate_to_portrait`] for the same landscape `frame`
pub fn rotate_from_portrait(point: Point, frame: FrameSize) -> Point {
    Point::new(point.y, frame.height - point.x)
}

/// Uniform scale plus crop offset for center-crop rendering
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AspectFill {
    pub scale: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl AspectFill {
    /// Compute the fill for a frame of `frame` size rendered into `preview`.
    ///
    /// Both sizes must be in the same orientation. Returns `None` when either
    /// is degenerate.
    pub fn compute(frame: FrameSize, preview: FrameSize) -> Option<Self> {
        if frame.is_degenerate() || preview.is_degenerate() {
            return None;
        }

        if preview.aspect() > frame.aspect() {
            // Preview is wider: top and bottom are cropped
            let scale = preview.width / frame.width;
            let offset_y = (frame.height * scale - preview.height) / 2.0;
            Some(Self { scale, offset_x: 0.0, offset_y })
        } else {
            // Preview is taller: left and right are cropped
            let scale = preview.height / frame.height;
            let offset_x = (frame.width * scale - preview.width) / 2.0;
            Some(Self { scale, offset_x, offset_y: 0.0 })
        }
    }

    pub fn apply(&self, point: Point) -> Point {
        Point::new(
            point.x * self.scale - self.offset_x,
            point.y * self.scale - self.offset_y,
        )
    }

    pub fn invert(&self, point: Point) -> Point {
        Point::new(
            (point.x + self.offset_x) / self.scale,
            (point.y + self.offset_y) / self.scale,
        )
    }
}

/// Aspect-fill a point already in the preview's orientation
pub fn aspect_fill(point: Point, frame: FrameSize, preview: FrameSize) -> Option<Point> {
    AspectFill::compute(frame, preview).map(|fill| fill.apply(point))
}

/// Inverse of [`aspect_fill`] for the same sizes
pub fn inverse_aspect_fill(point: Point, frame: FrameSize, preview: FrameSize) -> Option<Point> {
    AspectFill::compute(frame, preview).map(|fill| fill.invert(point))
}

/// Full frame-to-display mapping for one frame size and preview size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayTransform {
    /// Landscape frame size the points were detected in
    frame: FrameSize,
    fill: AspectFill,
}

impl DisplayTransform {
    /// Build the transform, or `None` if the frame or preview is degenerate
    /// (a preview that has not been laid out yet)
    pub fn new(frame: FrameSize, preview: FrameSize) -> Option<Self> {
        let fill = AspectFill::compute(frame.rotated(), preview)?;
        Some(Self { frame, fill })
    }

    pub fn fill(&self) -> AspectFill {
        self.fill
    }

    pub fn to_display(&self, point: Point) -> Point {
        self.fill.apply(rotate_to_portrait(point, self.frame))
    }

    pub fn from_display(&self, point: Point) -> Point {
        rotate_from_portrait(self.fill.invert(point), self.frame)
    }

    /// Map all four corners of a frame-space quad
    pub fn quad_to_display(&self, quad: &Quad) -> Quad {
        quad.map(|p| self.to_display(p))
    }
}

/// Map one frame-space point onto the preview
pub fn to_display(point: Point, frame: FrameSize, preview: FrameSize) -> Option<Point> {
    DisplayTransform::new(frame, preview).map(|t| t.to_display(point))
}

/// Map one preview point back into frame space
pub fn from_display(point: Point, frame: FrameSize, preview: FrameSize) -> Option<Point> {
    DisplayTransform::new(frame, preview).map(|t| t.from_display(point))
}

/// Axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Rect {
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.min_x && point.x <= self.max_x && point.y >= self.min_y && point.y <= self.max_y
    }
}

/// Rotated rectangle for drawing one overlay in display space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayBox {
    /// Top-left corner, the rotation pivot
    pub origin: Point,
    /// Length of the top edge
    pub width: f64,
    /// Length of the left edge
    pub height: f64,
    /// Rotation of the top edge in radians
    pub angle: f64,
    /// Axis-aligned bounds of all four corners
    pub bounds: Rect,
}

impl OverlayBox {
    /// Derive the box from a display-space quad.
    ///
    /// Side lengths are Euclidean so skewed text keeps its true size.
    pub fn from_quad(quad: &Quad) -> Self {
        let tl = quad.top_left();
        let tr = quad.top_right();
        let bl = quad.bottom_left();

        let points = quad.points();
        let bounds = Rect {
            min_x: points.iter().map(|p| p.x).fold(f64::INFINITY, f64::min),
            min_y: points.iter().map(|p| p.y).fold(f64::INFINITY, f64::min),
            max_x: points.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max),
            max_y: points.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max),
        };

        Self {
            origin: tl,
            width: tl.distance(&tr),
            height: tl.distance(&bl),
            angle: (tr.y - tl.y).atan2(tr.x - tl.x),
            bounds,
        }
    }

    pub fn angle_degrees(&self) -> f64 {
        self.angle.to_degrees()
    }
}
