//! Circle association: per surviving square, run the Hough circle
//! detector on the cropped frame interior and keep squares that enclose
//! at least one circular mark.

use super::SquareWithCircles;
use crate::geometry::{Circle, Contour};
use crate::imageops;
use crate::Result;
use opencv::core::{Mat, Vec3f, Vector};
use opencv::imgproc;
use opencv::prelude::*;
use rayon::prelude::*;

/// Detect circles in a single-channel region. The radius window is
/// derived from the crop size: a mark can be at most half the frame and
/// is ignored below 7px (or a fiftieth of the frame, whichever is
/// larger). Returned coordinates are local to the region.
pub fn find_circles(region: &Mat, circle_accuracy: f64) -> Result<Vec<Circle>> {
    let max_radius = region.cols().min(region.rows()) / 2;
    let min_radius = (max_radius / 50).max(7);
    let min_dist = (min_radius * 2) as f64;

    let mut raw = Vector::<Vec3f>::new();
    imgproc::hough_circles(
        region,
        &mut raw,
        imgproc::HOUGH_GRADIENT_ALT,
        1.5,
        min_dist,
        300.0,
        circle_accuracy,
        min_radius,
        max_radius,
    )?;

    Ok(raw.iter().map(Circle::from).collect())
}

/// Associate circles with each validated square. Crops are taken
/// sequentially, the per-square Hough searches fan out across the rayon
/// pool (they are independent), and the fan-in preserves input order so
/// the outcome never depends on completion order. Squares with no
/// detected circle are dropped: a bare frame is not a symbol.
pub fn associate_circles(
    gray: &Mat,
    squares: &[Contour],
    circle_accuracy: f64,
) -> Result<Vec<SquareWithCircles>> {
    let mut crops = Vec::with_capacity(squares.len());
    for square in squares {
        let rect = imageops::bounding_region(square)?;
        let slice = imageops::region_slice(gray, rect)?;
        crops.push((slice, rect.x as f32, rect.y as f32));
    }

    let detected: Vec<Vec<Circle>> = crops
        .into_par_iter()
        .map(|(slice, dx, dy)| {
            let circles = find_circles(&slice, circle_accuracy)?
                .into_iter()
                .map(|c| c.translate(dx, dy))
                .collect();
            Ok(circles)
        })
        .collect::<Result<_>>()?;

    let mut result = Vec::new();
    for (square, circles) in squares.iter().zip(detected) {
        if circles.is_empty() {
            log::debug!("dropping square with no enclosed circles");
            continue;
        }
        result.push(SquareWithCircles {
            square: square.clone(),
            circles,
        });
    }

    Ok(result)
}
