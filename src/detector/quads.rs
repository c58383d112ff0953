//! Quad validation: decides whether a simplified polygon is a plausible
//! square symbol frame.

use crate::geometry::{Contour, Segment};
use crate::Result;
use opencv::core::Size;
use opencv::imgproc;
use opencv::prelude::VectorToVec;

/// Maximum allowed ratio between the longest and shortest side of a
/// candidate square. Bounds the aspect ratio so elongated rectangles are
/// rejected. Kept at the historical value; see DESIGN.md.
pub const SIDE_RATIO_MAX: f64 = 1.15;

/// Tolerance window around the 90 degree corner angle, in degrees.
pub const ANGLE_MIN_DEG: f64 = 80.0;
pub const ANGLE_MAX_DEG: f64 = 100.0;

/// Size/shape gate: exactly 4 vertices, convex, and an enclosed area
/// above `max(image_area / 128, 256)` pixels. The floor scales with the
/// image resolution but never drops below 256 for tiny images, which
/// filters contour noise and frames too small to carry a symbol.
pub fn is_quad(contour: &Contour, image_size: Size) -> Result<bool> {
    if contour.len() != 4 {
        return Ok(false);
    }

    let image_area = image_size.width as f64 * image_size.height as f64;
    let area_floor = (image_area / 128.0).max(256.0);

    Ok(imgproc::is_contour_convex(contour)? && imgproc::contour_area(contour, false)? > area_floor)
}

/// Squareness gate: every interior angle within [80, 100] degrees and the
/// squared side-length ratio within `SIDE_RATIO_MAX^2`.
///
/// A degenerate edge (two coincident vertices) makes the corner angle
/// undefined; such a candidate is rejected outright.
pub fn is_quad_square(quad: &Contour) -> bool {
    debug_assert_eq!(quad.len(), 4);
    let pts = quad.to_vec();

    let mut side_lengths_sq = [0i64; 4];
    for i in 0..4 {
        let j = (i + 1) % 4;
        let k = (i + 2) % 4;
        let u = Segment::new(pts[j], pts[i]);
        let v = Segment::new(pts[j], pts[k]);

        let angle = match Segment::angle_deg(&u, &v) {
            Some(angle) => angle,
            None => return false,
        };
        if !(ANGLE_MIN_DEG..=ANGLE_MAX_DEG).contains(&angle) {
            return false;
        }

        side_lengths_sq[i] = u.length_sq();
    }

    side_lengths_sq.sort_unstable();
    let ratio_sq = side_lengths_sq[3] as f64 / side_lengths_sq[0] as f64;
    ratio_sq <= SIDE_RATIO_MAX * SIDE_RATIO_MAX
}
