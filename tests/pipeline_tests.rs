use image::{GrayImage, Luma};
use opencv::core::Size;
use opencv::prelude::*;
use symdetect::config::Config;
use symdetect::detector::ranking::centering_score;
use symdetect::{
    edge_map, grayimage_to_mat, load_image, mat_to_grayimage, trace_contours, validate_image_size,
    SymbolDetector,
};

const BLACK: Luma<u8> = Luma([0]);
const WHITE: Luma<u8> = Luma([255]);

/// One square symbol frame with a dead-center ring, an empty square
/// frame, and a square too small to clear the area floor.
fn synthetic_scene() -> GrayImage {
    GrayImage::from_fn(400, 400, |x, y| {
        let on_border = |x0: u32, y0: u32, side: u32, width: u32| {
            let (x1, y1) = (x0 + side, y0 + side);
            let outside = x < x0 || x > x1 || y < y0 || y > y1;
            let in_hole =
                x > x0 + width && x < x1 - width && y > y0 + width && y < y1 - width;
            !outside && !in_hole
        };

        // Symbol frame: 104px square with a ring of radius 12 at its center.
        if on_border(148, 148, 104, 5) {
            return BLACK;
        }
        let (dx, dy) = (x as f32 - 200.0, y as f32 - 200.0);
        if ((dx * dx + dy * dy).sqrt() - 12.0).abs() <= 2.0 {
            return BLACK;
        }

        // Empty frame: a valid square with nothing inside.
        if on_border(280, 60, 80, 5) {
            return BLACK;
        }

        // Noise: far below the area floor (400x400 / 128 = 1250px^2).
        if on_border(30, 30, 12, 3) {
            return BLACK;
        }

        WHITE
    })
}

#[test]
fn test_grayimage_mat_round_trip() {
    let img = GrayImage::from_fn(32, 32, |x, y| {
        if (x + y) % 2 == 0 { WHITE } else { BLACK }
    });

    let mat = grayimage_to_mat(&img).unwrap();
    assert_eq!(mat.cols(), 32);
    assert_eq!(mat.rows(), 32);

    let back = mat_to_grayimage(&mat).unwrap();
    assert_eq!(back, img);
}

#[test]
fn test_size_validation() {
    let small = grayimage_to_mat(&GrayImage::new(4, 4)).unwrap();
    let ok = grayimage_to_mat(&GrayImage::new(64, 64)).unwrap();

    assert!(validate_image_size(&small, 8, 10000).is_err());
    assert!(validate_image_size(&ok, 8, 10000).is_ok());
    assert!(validate_image_size(&ok, 8, 32).is_err());
}

#[test]
fn test_load_missing_image_fails_fast() {
    let err = load_image(std::path::Path::new("/nonexistent/image.png")).unwrap_err();
    assert!(err.to_string().contains("does not exist"));
}

#[test]
fn test_edge_map_and_contour_trace() {
    let mat = grayimage_to_mat(&synthetic_scene()).unwrap();

    let edges = edge_map(&mat, 1.0, 5.0, false).unwrap();
    assert_eq!(edges.size().unwrap(), Size::new(400, 400));

    let contours = trace_contours(&edges).unwrap();
    assert!(!contours.is_empty());
}

#[test]
fn test_end_to_end_detection() {
    let source = grayimage_to_mat(&synthetic_scene()).unwrap();
    let detector = SymbolDetector::new();

    let results = detector.detect(&source).unwrap();
    assert!(!results.is_empty(), "expected the symbol frame to be found");

    // Only the ringed frame may survive: the empty frame has no circles
    // and the noise square is under the area floor.
    for sq in &results {
        let center = sq.center();
        assert!(
            (center.x - 200.0).abs() < 30.0 && (center.y - 200.0).abs() < 30.0,
            "unexpected detection at ({}, {})",
            center.x,
            center.y
        );
        assert!(!sq.circles.is_empty());
    }

    // Ranked first: the frame with the dead-center ring, score near zero.
    let best = &results[0];
    assert!(best.side_length() > 85.0 && best.side_length() < 125.0);
    assert!(centering_score(best) < 0.15);
}

#[test]
fn test_blank_image_yields_empty_result() {
    let blank = grayimage_to_mat(&GrayImage::from_fn(200, 200, |_, _| WHITE)).unwrap();
    let detector = SymbolDetector::new();

    let results = detector.detect(&blank).unwrap();
    assert!(results.is_empty());
}

#[test]
fn test_annotated_output_matches_source_size() {
    let source = grayimage_to_mat(&synthetic_scene()).unwrap();
    let detector = SymbolDetector::new();

    let (_, annotated) = detector.detect_annotated(&source).unwrap();
    assert_eq!(annotated.size().unwrap(), Size::new(400, 400));
}

#[test]
fn test_stage_composite_stacks_horizontally() {
    let source = grayimage_to_mat(&synthetic_scene()).unwrap();
    let detector = SymbolDetector::new();

    let (_, composite) = detector.detect_stages(&source).unwrap();
    assert_eq!(composite.rows(), 400);
    // Five stages side by side.
    assert_eq!(composite.cols(), 5 * 400);
}

#[test]
fn test_detector_honors_config() {
    let mut config = Config::default();
    config.image.min_size = 500;
    let detector = SymbolDetector::from_config(&config);

    let source = grayimage_to_mat(&synthetic_scene()).unwrap();
    assert!(detector.detect(&source).is_err());
}
