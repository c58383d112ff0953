//! Geometry primitives shared by every validation step: line segments
//! between integer contour vertices and floating-point circles.

use opencv::core::{Point, Point2f, Vec3f, Vector};
use serde::{Deserialize, Serialize};

/// Closed polygon boundary as produced by the contour tracer.
pub type Contour = Vector<Point>;

/// Directed segment between two integer contour vertices.
///
/// Not stored in any result type; built on the fly wherever edge lengths
/// or corner angles are needed.
#[derive(Debug, Clone, Copy)]
pub struct Segment {
    a: Point,
    b: Point,
}

impl Segment {
    pub fn new(a: Point, b: Point) -> Self {
        Self { a, b }
    }

    /// Exact squared Euclidean length. Integer arithmetic, so ratio
    /// comparisons on squared lengths carry no square-root error.
    pub fn length_sq(&self) -> i64 {
        let dx = (self.a.x - self.b.x) as i64;
        let dy = (self.a.y - self.b.y) as i64;
        dx * dx + dy * dy
    }

    pub fn length(&self) -> f32 {
        (self.length_sq() as f32).sqrt()
    }

    /// Angle in degrees, in [0, 180], between two segments sharing an
    /// origin vertex, via the dot-product/arccos identity on f64
    /// direction vectors.
    ///
    /// Returns `None` when either segment has zero length; the angle is
    /// undefined there and callers must treat the candidate as invalid
    /// rather than receive a NaN.
    pub fn angle_deg(u: &Segment, v: &Segment) -> Option<f64> {
        let (ux, uy) = ((u.a.x - u.b.x) as f64, (u.a.y - u.b.y) as f64);
        let (vx, vy) = ((v.a.x - v.b.x) as f64, (v.a.y - v.b.y) as f64);

        let norm_sq = (ux * ux + uy * uy) * (vx * vx + vy * vy);
        if norm_sq == 0.0 {
            return None;
        }

        let cos = (ux * vx + uy * vy) / norm_sq.sqrt();
        // Rounding can push |cos| a hair past 1, which acos turns into NaN.
        Some(cos.clamp(-1.0, 1.0).acos().to_degrees())
    }
}

/// Circle detected by the Hough transform: sub-pixel center and radius.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
}

impl Circle {
    pub fn new(x: f32, y: f32, radius: f32) -> Self {
        Self { x, y, radius }
    }

    pub fn center(&self) -> Point2f {
        Point2f::new(self.x, self.y)
    }

    /// Center rounded to integer pixel coordinates, for rendering.
    pub fn center_i(&self) -> Point {
        Point::new(self.x.round() as i32, self.y.round() as i32)
    }

    /// Radius rounded to whole pixels, for rendering.
    pub fn radius_i(&self) -> i32 {
        self.radius.round() as i32
    }

    /// Returns a copy shifted by `(dx, dy)`. Used to map a circle found
    /// in a cropped sub-image back into full-image coordinates.
    pub fn translate(&self, dx: f32, dy: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            radius: self.radius,
        }
    }
}

impl From<Vec3f> for Circle {
    fn from(v: Vec3f) -> Self {
        Self {
            x: v[0],
            y: v[1],
            radius: v[2],
        }
    }
}
