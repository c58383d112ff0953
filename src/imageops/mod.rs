//! Thin wrappers over the OpenCV primitives the pipeline delegates to:
//! pre-filtering, edge extraction, contour tracing, region cropping and
//! image loading. No domain logic lives here.

use crate::geometry::Contour;
use crate::Result;
use image::GrayImage;
use opencv::core::{self, Mat, Point, Rect, Size, Vector};
use opencv::imgcodecs;
use opencv::imgproc;
use opencv::prelude::*;

/// Load a color image from disk. Fails fast when the file is missing or
/// unreadable; no pipeline stage runs on a bad input.
pub fn load_image(path: &std::path::Path) -> Result<Mat> {
    if !path.exists() {
        return Err(anyhow::anyhow!(
            "Image file does not exist: {}",
            path.display()
        ));
    }

    let image = imgcodecs::imread(
        path.to_str()
            .ok_or_else(|| anyhow::anyhow!("Non-UTF-8 image path: {}", path.display()))?,
        imgcodecs::IMREAD_COLOR,
    )?;

    if image.empty() {
        return Err(anyhow::anyhow!("Cannot read image: {}", path.display()));
    }

    Ok(image)
}

/// Validate that image has reasonable dimensions
pub fn validate_image_size(image: &Mat, min_size: u32, max_size: u32) -> Result<()> {
    let (width, height) = (image.cols() as u32, image.rows() as u32);

    if width < min_size || height < min_size {
        return Err(anyhow::anyhow!(
            "Image too small: {}x{}, minimum: {}x{}",
            width,
            height,
            min_size,
            min_size
        ));
    }

    if width > max_size || height > max_size {
        return Err(anyhow::anyhow!(
            "Image too large: {}x{}, maximum: {}x{}",
            width,
            height,
            max_size,
            max_size
        ));
    }

    Ok(())
}

/// Pre-filter: 7x7 Gaussian blur followed by a cubic resize to the
/// working size. Deterministic; the orchestrator passes the source's own
/// size, which normalizes the buffer without rescaling content.
pub fn blur_and_resize(source: &Mat, target_size: Size) -> Result<Mat> {
    let mut blurred = Mat::default();
    imgproc::gaussian_blur(
        source,
        &mut blurred,
        Size::new(7, 7),
        0.0,
        0.0,
        core::BORDER_DEFAULT,
    )?;

    let mut resized = Mat::default();
    imgproc::resize(&blurred, &mut resized, target_size, 0.0, 0.0, imgproc::INTER_CUBIC)?;
    Ok(resized)
}

/// Edge extraction. Either a single Canny pass on the grayscale image, or
/// one pass per color channel with the binary masks max-combined so edges
/// visible in only one channel are not discarded. A 5x5 elliptical
/// dilation closes small gaps in the traced edges either way.
pub fn edge_map(source: &Mat, low: f64, high: f64, grayscale_only: bool) -> Result<Mat> {
    let mut edges = Mat::default();

    if grayscale_only || source.channels() == 1 {
        let gray = to_gray(source)?;
        imgproc::canny(&gray, &mut edges, low, high, 3, false)?;
    } else {
        for c in 0..source.channels() {
            let mut channel = Mat::default();
            core::extract_channel(source, &mut channel, c)?;

            let mut channel_edges = Mat::default();
            imgproc::canny(&channel, &mut channel_edges, low, high, 3, false)?;

            if c == 0 {
                edges = channel_edges;
            } else {
                let mut combined = Mat::default();
                core::max(&edges, &channel_edges, &mut combined)?;
                edges = combined;
            }
        }
    }

    let kernel = imgproc::get_structuring_element(
        imgproc::MORPH_ELLIPSE,
        Size::new(5, 5),
        Point::new(-1, -1),
    )?;
    let mut dilated = Mat::default();
    imgproc::dilate(
        &edges,
        &mut dilated,
        &kernel,
        Point::new(-1, -1),
        1,
        core::BORDER_CONSTANT,
        imgproc::morphology_default_border_value()?,
    )?;
    Ok(dilated)
}

/// Trace closed boundaries in a binary edge mask. List retrieval (no
/// hierarchy) with simplified point encoding.
pub fn trace_contours(mask: &Mat) -> Result<Vector<Contour>> {
    let mut contours = Vector::<Contour>::new();
    imgproc::find_contours(
        mask,
        &mut contours,
        imgproc::RETR_LIST,
        imgproc::CHAIN_APPROX_SIMPLE,
        Point::new(0, 0),
    )?;
    Ok(contours)
}

/// Axis-aligned bounding rectangle of a contour in full-image coordinates.
pub fn bounding_region(contour: &Contour) -> Result<Rect> {
    Ok(imgproc::bounding_rect(contour)?)
}

/// Crop `rect` out of `source` into an owned buffer.
pub fn region_slice(source: &Mat, rect: Rect) -> Result<Mat> {
    Ok(source.roi(rect)?.clone_pointee())
}

/// Single-channel view of the image. 1-channel inputs pass through, so
/// grayscale sources run the pipeline without a BGR conversion.
pub fn to_gray(source: &Mat) -> Result<Mat> {
    if source.channels() == 1 {
        return Ok(source.clone());
    }

    let mut gray = Mat::default();
    imgproc::cvt_color(
        source,
        &mut gray,
        imgproc::COLOR_BGR2GRAY,
        0,
    )?;
    Ok(gray)
}

/// Convert a GrayImage to an OpenCV Mat
pub fn grayimage_to_mat(image: &GrayImage) -> Result<Mat> {
    let (width, height) = image.dimensions();
    let data = image.as_raw();

    let mut mat = Mat::zeros(height as i32, width as i32, core::CV_8UC1)?.to_mat()?;

    for y in 0..height {
        for x in 0..width {
            let pixel = data[(y * width + x) as usize];
            *mat.at_2d_mut::<u8>(y as i32, x as i32)? = pixel;
        }
    }

    Ok(mat)
}

/// Convert a single-channel OpenCV Mat to a GrayImage
pub fn mat_to_grayimage(mat: &Mat) -> Result<GrayImage> {
    let rows = mat.rows();
    let cols = mat.cols();

    let mut data = Vec::with_capacity((rows * cols) as usize);

    for y in 0..rows {
        for x in 0..cols {
            let pixel = mat.at_2d::<u8>(y, x)?;
            data.push(*pixel);
        }
    }

    let gray_image = GrayImage::from_raw(cols as u32, rows as u32, data)
        .ok_or_else(|| anyhow::anyhow!("Failed to create GrayImage from Mat"))?;

    Ok(gray_image)
}
