use opencv::core::{Point, Size};
use symdetect::detector::quads::{is_quad, is_quad_square};
use symdetect::geometry::Contour;

fn contour(points: &[(i32, i32)]) -> Contour {
    points.iter().map(|&(x, y)| Point::new(x, y)).collect()
}

const IMAGE: Size = Size {
    width: 640,
    height: 480,
};

#[test]
fn test_perfect_square_passes_both_gates() {
    let square = contour(&[(100, 100), (200, 100), (200, 200), (100, 200)]);
    assert!(is_quad(&square, IMAGE).unwrap());
    assert!(is_quad_square(&square));
}

#[test]
fn test_axis_aligned_square_of_any_size_is_square() {
    for side in [30, 100, 300] {
        let square = contour(&[(0, 0), (side, 0), (side, side), (0, side)]);
        assert!(is_quad_square(&square), "side {} failed", side);
    }
}

#[test]
fn test_stretched_rectangle_fails_squareness() {
    // Stretched by more than 32% in one axis: angle test passes, side
    // ratio does not.
    let stretched = contour(&[(0, 0), (133, 0), (133, 100), (0, 100)]);
    assert!(!is_quad_square(&stretched));
}

#[test]
fn test_mild_rectangle_within_ratio_passes() {
    let mild = contour(&[(0, 0), (110, 0), (110, 100), (0, 100)]);
    assert!(is_quad_square(&mild));
}

#[test]
fn test_angle_tolerance_boundary() {
    // Rhombi with equal sides isolate the angle test. Interior angles
    // alternate between theta and 180 - theta.
    let rhombus = |theta_deg: f64| {
        let (sin, cos) = theta_deg.to_radians().sin_cos();
        let dx = (100.0 * cos).round() as i32;
        let dy = (100.0 * sin).round() as i32;
        contour(&[(0, 0), (100, 0), (100 + dx, dy), (dx, dy)])
    };

    // 79 degrees sits below the 80 degree bound.
    assert!(!is_quad_square(&rhombus(79.0)));
    // 81 degrees is inside [80, 100] on every corner.
    assert!(is_quad_square(&rhombus(81.0)));
}

#[test]
fn test_degenerate_edge_rejected_not_crashed() {
    let degenerate = contour(&[(0, 0), (0, 0), (100, 100), (0, 100)]);
    assert!(!is_quad_square(&degenerate));
}

#[test]
fn test_wrong_vertex_count_fails_size_gate() {
    let triangle = contour(&[(0, 0), (200, 0), (100, 200)]);
    let pentagon = contour(&[(0, 0), (200, 0), (260, 160), (100, 280), (-60, 160)]);
    assert!(!is_quad(&triangle, IMAGE).unwrap());
    assert!(!is_quad(&pentagon, IMAGE).unwrap());
}

#[test]
fn test_concave_quad_fails_size_gate() {
    let concave = contour(&[(0, 0), (200, 0), (50, 50), (0, 200)]);
    assert!(!is_quad(&concave, IMAGE).unwrap());
}

#[test]
fn test_area_floor_scales_with_image() {
    // 640x480 -> floor is 2400px^2; a 40px square (1600px^2) is noise
    // there but valid in a small image where the floor bottoms out at 256.
    let small = contour(&[(0, 0), (40, 0), (40, 40), (0, 40)]);
    assert!(!is_quad(&small, IMAGE).unwrap());
    assert!(is_quad(&small, Size::new(100, 100)).unwrap());
}
