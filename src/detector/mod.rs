//! The detection pipeline: raw image -> pre-filter -> edge map -> contour
//! trace -> square extraction -> nested-duplicate elimination -> circle
//! association -> centering-score ranking.

pub mod circles;
pub mod quads;
pub mod ranking;
pub mod squares;

use crate::config::{Config, DetectorConfig};
use crate::geometry::{Circle, Contour, Segment};
use crate::imageops;
use crate::visualization::{self, ImageStacker};
use crate::Result;
use opencv::core::{Mat, Point2f, Scalar};
use opencv::prelude::*;
use serde::{Deserialize, Serialize};

/// A detected symbol: one validated square frame and the non-empty set
/// of circles found inside it, all in full-image coordinates.
#[derive(Debug, Clone)]
pub struct SquareWithCircles {
    pub square: Contour,
    pub circles: Vec<Circle>,
}

impl SquareWithCircles {
    /// Mean of the four edge lengths.
    pub fn side_length(&self) -> f32 {
        let pts = self.square.to_vec();
        let mut total = 0.0;
        for i in 0..4 {
            let j = (i + 1) % 4;
            total += Segment::new(pts[i], pts[j]).length();
        }
        total / 4.0
    }

    /// Mean of the four vertices.
    pub fn center(&self) -> Point2f {
        squares::quad_center(&self.square)
    }
}

/// Serializable summary of one detected symbol, for JSON output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionRecord {
    pub vertices: Vec<(i32, i32)>,
    pub circles: Vec<Circle>,
    pub centering_score: f32,
}

impl From<&SquareWithCircles> for DetectionRecord {
    fn from(sq: &SquareWithCircles) -> Self {
        Self {
            vertices: sq.square.iter().map(|p| (p.x, p.y)).collect(),
            circles: sq.circles.clone(),
            centering_score: ranking::centering_score(sq),
        }
    }
}

enum Render {
    Off,
    Annotated,
    Stages,
}

/// Square-framed symbol detector.
///
/// Holds the tunable sensitivity parameters; each `detect*` call runs
/// the full pipeline from scratch on one image and returns the ranked
/// detections. No state is shared or cached between calls.
#[derive(Debug, Clone)]
pub struct SymbolDetector {
    config: DetectorConfig,
    image_limits: (u32, u32),
}

impl Default for SymbolDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolDetector {
    pub fn new() -> Self {
        Self::with_config(DetectorConfig::default())
    }

    pub fn with_config(config: DetectorConfig) -> Self {
        let limits = crate::config::ImageConfig::default();
        Self {
            config,
            image_limits: (limits.min_size, limits.max_size),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            config: config.detector.clone(),
            image_limits: (config.image.min_size, config.image.max_size),
        }
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Run the pipeline and return the detections ranked ascending by
    /// centering score. Finding nothing is not an error; the result is
    /// simply empty.
    pub fn detect(&self, source: &Mat) -> Result<Vec<SquareWithCircles>> {
        Ok(self.run(source, Render::Off)?.0)
    }

    /// Like [`detect`](Self::detect), additionally returning the filtered
    /// image with validated squares (green) and their circles (yellow)
    /// drawn on it.
    pub fn detect_annotated(&self, source: &Mat) -> Result<(Vec<SquareWithCircles>, Mat)> {
        let (result, rendered) = self.run(source, Render::Annotated)?;
        Ok((result, rendered.unwrap_or_default()))
    }

    /// Like [`detect`](Self::detect), additionally returning a horizontal
    /// composite of every intermediate stage for side-by-side inspection:
    /// filtered input, edge map, raw contours, surviving squares, final
    /// squares with circles.
    pub fn detect_stages(&self, source: &Mat) -> Result<(Vec<SquareWithCircles>, Mat)> {
        let (result, rendered) = self.run(source, Render::Stages)?;
        Ok((result, rendered.unwrap_or_default()))
    }

    fn run(&self, source: &Mat, render: Render) -> Result<(Vec<SquareWithCircles>, Option<Mat>)> {
        imageops::validate_image_size(source, self.image_limits.0, self.image_limits.1)?;

        let size = source.size()?;
        let thickness = visualization::line_thickness(size);
        let mut stacker = ImageStacker::new();

        let filtered = imageops::blur_and_resize(source, size)?;
        if let Render::Stages = render {
            stacker.push(&filtered)?;
        }

        let edges = imageops::edge_map(
            &filtered,
            self.config.edge_low,
            self.config.edge_high,
            self.config.grayscale_only,
        )?;
        if let Render::Stages = render {
            stacker.push(&edges)?;
        }

        let contours = imageops::trace_contours(&edges)?;
        log::debug!("traced {} raw contours", contours.len());
        if let Render::Stages = render {
            let overlay = stacker.push(&filtered)?;
            visualization::draw_contours(overlay, &contours, Scalar::new(0.0, 0.0, 255.0, 0.0), thickness)?;
        }

        let candidates =
            squares::find_squares(&contours, size, self.config.poly_accuracy)?;
        let surviving = squares::remove_inner_quads(&candidates)?;
        if let Render::Stages = render {
            let overlay = stacker.push(&filtered)?;
            visualization::draw_squares(overlay, &surviving, Scalar::new(0.0, 0.0, 255.0, 0.0), thickness)?;
        }

        let gray = imageops::to_gray(&filtered)?;
        let associated = circles::associate_circles(&gray, &surviving, self.config.circle_accuracy)?;
        log::info!(
            "{} squares validated, {} with circles",
            surviving.len(),
            associated.len()
        );

        let rendered = match render {
            Render::Off => None,
            Render::Annotated => {
                let mut annotated = filtered.clone();
                visualization::draw_result(&mut annotated, &associated, true, thickness)?;
                Some(annotated)
            }
            Render::Stages => {
                let overlay = stacker.push(&filtered)?;
                visualization::draw_result(overlay, &associated, true, thickness)?;
                Some(stacker.stack()?)
            }
        };

        Ok((ranking::rank(associated), rendered))
    }
}
