//! Drawing helpers for annotated output and the side-by-side debug
//! composite. Purely observational; nothing here feeds back into the
//! returned detections.

use crate::detector::{ranking, SquareWithCircles};
use crate::geometry::{Circle, Contour};
use crate::Result;
use opencv::core::{self, Mat, Point, Scalar, Size, Vector};
use opencv::imgproc;
use opencv::prelude::*;

/// Overlay line thickness scaled to the image, with a 1px floor.
pub fn line_thickness(size: Size) -> i32 {
    (size.width.min(size.height) / 500).max(1)
}

pub fn draw_contours(
    image: &mut Mat,
    contours: &Vector<Contour>,
    color: Scalar,
    thickness: i32,
) -> Result<()> {
    imgproc::draw_contours(
        image,
        contours,
        -1,
        color,
        thickness,
        imgproc::LINE_8,
        &core::no_array(),
        i32::MAX,
        Point::new(0, 0),
    )?;
    Ok(())
}

pub fn draw_squares(
    image: &mut Mat,
    squares: &[Contour],
    color: Scalar,
    thickness: i32,
) -> Result<()> {
    let contours: Vector<Contour> = squares.iter().cloned().collect();
    draw_contours(image, &contours, color, thickness)
}

pub fn draw_circles(
    image: &mut Mat,
    circles: &[Circle],
    color: Scalar,
    thickness: i32,
) -> Result<()> {
    for circle in circles {
        imgproc::circle(
            image,
            circle.center_i(),
            circle.radius_i(),
            color,
            thickness,
            imgproc::LINE_8,
            0,
        )?;
    }
    Ok(())
}

/// Draw the final detections: squares in green, optionally their circles
/// in yellow.
pub fn draw_result(
    image: &mut Mat,
    detections: &[SquareWithCircles],
    paint_circles: bool,
    thickness: i32,
) -> Result<()> {
    let squares: Vec<Contour> = detections.iter().map(|sq| sq.square.clone()).collect();
    draw_squares(image, &squares, Scalar::new(0.0, 255.0, 0.0, 0.0), thickness)?;

    if paint_circles {
        for sq in detections {
            draw_circles(image, &sq.circles, Scalar::new(0.0, 255.0, 255.0, 0.0), thickness)?;
        }
    }
    Ok(())
}

/// Collects same-sized stage images and concatenates them horizontally
/// for side-by-side inspection. Pushed images are normalized to 8-bit
/// BGR so binary masks sit next to color frames.
#[derive(Default)]
pub struct ImageStacker {
    images: Vec<Mat>,
}

impl ImageStacker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a stage image and return a mutable handle to the stored
    /// copy, so callers can draw overlays onto it in place.
    pub fn push(&mut self, image: &Mat) -> Result<&mut Mat> {
        let mut normalized = Mat::default();
        if image.channels() == 1 {
            let mut bgr = Mat::default();
            imgproc::cvt_color(
                image,
                &mut bgr,
                imgproc::COLOR_GRAY2BGR,
                0,
            )?;
            bgr.convert_to(&mut normalized, core::CV_8U, 1.0, 0.0)?;
        } else {
            image.convert_to(&mut normalized, core::CV_8U, 1.0, 0.0)?;
        }

        self.images.push(normalized);
        Ok(self.images.last_mut().unwrap())
    }

    /// Horizontal concatenation of everything pushed so far.
    pub fn stack(&self) -> Result<Mat> {
        if self.images.is_empty() {
            return Err(anyhow::anyhow!("No stage images to stack"));
        }

        let mats: Vector<Mat> = self.images.iter().cloned().collect();
        let mut stacked = Mat::default();
        core::hconcat(&mats, &mut stacked)?;
        Ok(stacked)
    }
}

pub fn print_results(results: &[SquareWithCircles]) {
    println!("=== Detected Symbols ===");
    for (rank, sq) in results.iter().enumerate() {
        let vertices: Vec<String> = sq
            .square
            .iter()
            .map(|p| format!("({}; {})", p.x, p.y))
            .collect();
        println!("#{} {}", rank + 1, vertices.join(" "));
        println!("  Side length: {:.1}px", sq.side_length());
        println!("  Circles: {}", sq.circles.len());
        println!("  Centering score: {:.3}", ranking::centering_score(sq));
        println!();
    }
}
