//! Square extraction from raw contours and elimination of nested
//! duplicates (a drawn border traces as two concentric quads).

use super::quads;
use crate::geometry::Contour;
use crate::Result;
use opencv::core::{Point, Point2f, Size, Vector};
use opencv::imgproc;

/// Simplify each raw contour to a polygon and keep the ones that pass
/// both validation gates. The size/shape gate runs first so the angle
/// computation is skipped for contours that are cheap to reject;
/// correctness does not depend on the ordering.
pub fn find_squares(
    contours: &Vector<Contour>,
    image_size: Size,
    poly_accuracy: f64,
) -> Result<Vec<Contour>> {
    let mut squares = Vec::new();

    for contour in contours.iter() {
        let epsilon = imgproc::arc_length(&contour, true)? * poly_accuracy;
        let mut approx = Contour::new();
        imgproc::approx_poly_dp(&contour, &mut approx, epsilon, true)?;

        if quads::is_quad(&approx, image_size)? && quads::is_quad_square(&approx) {
            squares.push(approx);
        }
    }

    log::debug!(
        "{} of {} contours validated as squares",
        squares.len(),
        contours.len()
    );
    Ok(squares)
}

/// True when every vertex of `inner` lies inside or on the boundary of
/// `outer`.
fn encloses(outer: &Contour, inner: &Contour) -> Result<bool> {
    for point in inner.iter() {
        let placement = imgproc::point_polygon_test(
            outer,
            Point2f::new(point.x as f32, point.y as f32),
            false,
        )?;
        if placement < 0.0 {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Remove quads that are nested inside another candidate, keeping only
/// the maximal/outer ones. Pure over the input slice; the survivors keep
/// their input order.
///
/// Exactly congruent quads dominate each other; the tie breaks toward
/// the candidate seen earlier in the input, so the output is
/// deterministic and never empty for a non-empty input. Running the
/// elimination on its own output is a no-op. O(n^2) in the candidate
/// count, which stays trivial at the tens of symbols a real image holds.
pub fn remove_inner_quads(quads: &[Contour]) -> Result<Vec<Contour>> {
    let mut result = Vec::new();

    for (i, quad) in quads.iter().enumerate() {
        let mut dominated = false;
        for (j, other) in quads.iter().enumerate() {
            if i == j || !encloses(other, quad)? {
                continue;
            }
            // Mutual domination means congruent duplicates; only a later
            // occurrence is discarded in favor of an earlier one.
            if j < i || !encloses(quad, other)? {
                dominated = true;
                break;
            }
        }

        if !dominated {
            result.push(quad.clone());
        }
    }

    if result.len() < quads.len() {
        log::debug!("removed {} nested duplicate quads", quads.len() - result.len());
    }
    Ok(result)
}

/// Mean of the four vertices.
pub fn quad_center(quad: &Contour) -> Point2f {
    let mut sum = Point::new(0, 0);
    for point in quad.iter() {
        sum.x += point.x;
        sum.y += point.y;
    }
    Point2f::new(sum.x as f32 / 4.0, sum.y as f32 / 4.0)
}
