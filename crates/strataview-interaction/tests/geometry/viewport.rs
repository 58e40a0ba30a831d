use strataview_interaction::{BoundingBox, Point2, VerticalAxis, Viewport};

fn assert_close(actual: Point2, expected: Point2) {
    assert!(
        actual.distance_to(&expected) < 1e-9,
        "{:?} != {:?}",
        actual,
        expected
    );
}

#[test]
fn test_pixel_world_round_trip_depth_down() {
    let mut viewport = Viewport::new(800.0, 600.0);
    viewport.set_zoom(2.0);
    viewport.set_pan(40.0, -100.0);

    let world = Point2::new(120.0, 1500.0);
    let pixel = viewport.world_to_pixel(world);
    assert_close(pixel, Point2::new(280.0, 2900.0));
    assert_close(viewport.pixel_to_world(pixel), world);
}

#[test]
fn test_vertical_axis_up_flips_y() {
    let mut viewport = Viewport::new(800.0, 600.0).with_vertical_axis(VerticalAxis::Up);
    viewport.set_pan(0.0, 0.0);

    assert_close(viewport.world_to_pixel(Point2::new(0.0, 0.0)), Point2::new(0.0, 600.0));
    assert_close(viewport.pixel_to_world(Point2::new(10.0, 500.0)), Point2::new(10.0, 100.0));
}

#[test]
fn test_zoom_limits_are_ignored() {
    let mut viewport = Viewport::default();
    viewport.set_zoom(0.01);
    assert_eq!(viewport.zoom(), 1.0);
    viewport.set_zoom(500.0);
    assert_eq!(viewport.zoom(), 1.0);
    viewport.zoom_in();
    assert!((viewport.zoom() - 1.2).abs() < 1e-12);
}

#[test]
fn test_zoom_to_point_keeps_anchor_pixel() {
    let mut viewport = Viewport::new(800.0, 600.0);
    let anchor = Point2::new(100.0, 80.0);
    let before = viewport.world_to_pixel(anchor);

    viewport.zoom_in_at(anchor);
    assert_close(viewport.world_to_pixel(anchor), before);
    viewport.zoom_out_at(anchor);
    assert_close(viewport.world_to_pixel(anchor), before);
}

#[test]
fn test_fit_to_bounds_centers_content() {
    let mut viewport = Viewport::new(1200.0, 500.0);
    let bounds = BoundingBox::new(Point2::new(0.0, 1000.0), Point2::new(200.0, 1100.0));
    viewport.fit_to_bounds(&bounds, 0.0);

    // height limits the zoom: 500 px for 100 world units
    assert!((viewport.zoom() - 5.0).abs() < 1e-12);
    let center = viewport.world_to_pixel(Point2::new(100.0, 1050.0));
    assert_close(center, Point2::new(600.0, 250.0));
}

#[test]
fn test_fit_ignores_empty_bounds() {
    let mut viewport = Viewport::default();
    let point = Point2::new(3.0, 3.0);
    viewport.fit_to_view(&BoundingBox::new(point, point));
    assert_eq!(viewport.zoom(), 1.0);
}

#[test]
fn test_center_on_and_reset() {
    let mut viewport = Viewport::new(800.0, 600.0);
    viewport.center_on(Point2::new(50.0, 50.0));
    assert_close(viewport.world_to_pixel(Point2::new(50.0, 50.0)), Point2::new(400.0, 300.0));

    viewport.reset();
    assert_eq!(viewport.zoom(), 1.0);
    assert_eq!((viewport.pan_x(), viewport.pan_y()), (5.0, 5.0));
}
