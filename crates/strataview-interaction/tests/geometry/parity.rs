use proptest::prelude::*;
use strataview_interaction::{point_in_polygon, Point2};

fn ring(points: &[(f64, f64)]) -> Vec<Point2> {
    points.iter().map(|&(x, y)| Point2::new(x, y)).collect()
}

fn unit_square() -> Vec<Point2> {
    ring(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)])
}

/// Concave "L" covering [0,4]x[0,1] and [0,1]x[0,4].
fn l_shape() -> Vec<Point2> {
    ring(&[
        (0.0, 0.0),
        (4.0, 0.0),
        (4.0, 1.0),
        (1.0, 1.0),
        (1.0, 4.0),
        (0.0, 4.0),
    ])
}

#[test]
fn test_unit_square_interior_and_exterior() {
    let square = unit_square();
    assert!(point_in_polygon(&Point2::new(0.5, 0.5), &square));
    assert!(!point_in_polygon(&Point2::new(1.5, 0.5), &square));
    assert!(!point_in_polygon(&Point2::new(-0.5, 0.5), &square));
    assert!(!point_in_polygon(&Point2::new(0.5, 1.5), &square));
}

#[test]
fn test_unit_square_edge_tie_break() {
    let square = unit_square();
    // top and right edges are inside
    assert!(point_in_polygon(&Point2::new(0.5, 1.0), &square));
    assert!(point_in_polygon(&Point2::new(1.0, 0.5), &square));
    // bottom and left edges are outside
    assert!(!point_in_polygon(&Point2::new(0.5, 0.0), &square));
    assert!(!point_in_polygon(&Point2::new(0.0, 0.5), &square));
}

#[test]
fn test_concave_notch_is_outside() {
    let shape = l_shape();
    assert!(point_in_polygon(&Point2::new(3.0, 0.5), &shape));
    assert!(point_in_polygon(&Point2::new(0.5, 3.0), &shape));
    assert!(!point_in_polygon(&Point2::new(2.5, 2.5), &shape));
}

#[test]
fn test_degenerate_rings() {
    assert!(!point_in_polygon(&Point2::new(0.0, 0.0), &[]));
    assert!(!point_in_polygon(
        &Point2::new(0.0, 0.0),
        &ring(&[(0.0, -1.0), (0.0, 1.0)])
    ));
}

proptest! {
    #[test]
    fn points_strictly_inside_a_box_are_inside(
        x0 in -1000.0..1000.0f64,
        y0 in -1000.0..1000.0f64,
        width in 1.0..500.0f64,
        height in 1.0..500.0f64,
        fx in 0.01..0.99f64,
        fy in 0.01..0.99f64,
    ) {
        let rect = ring(&[(x0, y0), (x0 + width, y0), (x0 + width, y0 + height), (x0, y0 + height)]);
        let point = Point2::new(x0 + fx * width, y0 + fy * height);
        prop_assert!(point_in_polygon(&point, &rect));
    }

    #[test]
    fn points_beyond_a_box_are_outside(
        x0 in -1000.0..1000.0f64,
        y0 in -1000.0..1000.0f64,
        width in 1.0..500.0f64,
        height in 1.0..500.0f64,
        gap in 0.1..100.0f64,
        fy in 0.0..1.0f64,
    ) {
        let rect = ring(&[(x0, y0), (x0 + width, y0), (x0 + width, y0 + height), (x0, y0 + height)]);
        let y = y0 + fy * height;
        prop_assert!(!point_in_polygon(&Point2::new(x0 + width + gap, y), &rect));
        prop_assert!(!point_in_polygon(&Point2::new(x0 - gap, y), &rect));
    }

    #[test]
    fn result_does_not_depend_on_ring_start(
        x in -1.0..5.0f64,
        y in -1.0..5.0f64,
        shift in 0usize..6,
    ) {
        let shape = l_shape();
        let mut rotated = shape.clone();
        rotated.rotate_left(shift);
        let point = Point2::new(x, y);
        prop_assert_eq!(point_in_polygon(&point, &shape), point_in_polygon(&point, &rotated));
    }
}
