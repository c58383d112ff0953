use opencv::core::Point;
use symdetect::geometry::{Circle, Segment};

#[test]
fn test_segment_length_exact() {
    let seg = Segment::new(Point::new(0, 0), Point::new(3, 4));
    assert_eq!(seg.length_sq(), 25);
    assert!((seg.length() - 5.0).abs() < 1e-6);
}

#[test]
fn test_right_angle() {
    // Two perpendicular edges meeting at the origin.
    let u = Segment::new(Point::new(0, 0), Point::new(10, 0));
    let v = Segment::new(Point::new(0, 0), Point::new(0, 10));
    let angle = Segment::angle_deg(&u, &v).unwrap();
    assert!((angle - 90.0).abs() < 1e-9);
}

#[test]
fn test_collinear_angles() {
    let u = Segment::new(Point::new(0, 0), Point::new(10, 0));
    let same = Segment::new(Point::new(0, 0), Point::new(5, 0));
    let opposite = Segment::new(Point::new(0, 0), Point::new(-5, 0));

    assert!(Segment::angle_deg(&u, &same).unwrap().abs() < 1e-9);
    assert!((Segment::angle_deg(&u, &opposite).unwrap() - 180.0).abs() < 1e-9);
}

#[test]
fn test_zero_length_segment_has_no_angle() {
    let degenerate = Segment::new(Point::new(5, 5), Point::new(5, 5));
    let v = Segment::new(Point::new(5, 5), Point::new(10, 5));

    assert!(Segment::angle_deg(&degenerate, &v).is_none());
    assert!(Segment::angle_deg(&v, &degenerate).is_none());
}

#[test]
fn test_circle_translate_maps_crop_to_full_image() {
    // A circle found at (5, 5) in a region cropped at (100, 200) sits at
    // (105, 205) in the full image.
    let local = Circle::new(5.0, 5.0, 10.0);
    let full = local.translate(100.0, 200.0);

    assert_eq!(full.x, 105.0);
    assert_eq!(full.y, 205.0);
    assert_eq!(full.radius, 10.0);
    // Pure: the input circle is untouched.
    assert_eq!(local.x, 5.0);
    assert_eq!(local.y, 5.0);
}

#[test]
fn test_circle_rounding_for_rendering() {
    let circle = Circle::new(10.6, 20.4, 7.5);
    let center = circle.center_i();
    assert_eq!((center.x, center.y), (11, 20));
    assert_eq!(circle.radius_i(), 8);
}
