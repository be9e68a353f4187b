use super::*;
use crate::surface::{DrawCommand, RecordingSurface};

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn dot_is_filled_disc() {
    let mut s = RecordingSurface::new();
    let log = s.log();
    draw_item(&mut s, &Item::new(Shape::Dot { center: Point::new(1.0, 2.0), radius: 3.0 }, "#f00"));
    assert_eq!(
        *log.borrow(),
        vec![
            DrawCommand::BeginPath,
            DrawCommand::Arc { center: Point::new(1.0, 2.0), radius: 3.0 },
            DrawCommand::Fill("#f00".to_owned()),
        ]
    );
}

#[test]
fn circle_is_stroked() {
    let mut s = RecordingSurface::new();
    let log = s.log();
    draw_item(&mut s, &Item::new(Shape::Circle { center: Point::new(0.0, 0.0), radius: 5.0 }, "#0f0"));
    assert!(log.borrow().contains(&DrawCommand::Stroke { color: "#0f0".to_owned(), width: CIRCLE_STROKE }));
}

#[test]
fn arrowhead_points_along_last_segment() {
    let path = [Point::new(0.0, 0.0), Point::new(10.0, 0.0)];
    let [tip, left, right] = arrowhead(&path, 1.0).expect("head");
    assert_eq!(tip, Point::new(10.0, 0.0));
    assert!(left.x < tip.x && right.x < tip.x);
    assert!(approx_eq(left.y, -right.y));
    assert!(approx_eq(tip.distance(left), arrowhead_length(1.0)));
}

#[test]
fn arrowhead_skips_repeated_tip() {
    let path = [Point::new(0.0, 0.0), Point::new(0.0, 5.0), Point::new(0.0, 5.0)];
    let [_, left, _] = arrowhead(&path, 1.0).expect("head");
    assert!(left.y < 5.0);
    assert!(arrowhead(&[Point::new(1.0, 1.0)], 1.0).is_none());
}

#[test]
fn arrow_draws_polyline_then_head() {
    let mut s = RecordingSurface::new();
    let log = s.log();
    let path = vec![Point::new(0.0, 0.0), Point::new(5.0, 5.0), Point::new(10.0, 0.0)];
    draw_item(&mut s, &Item::new(Shape::Arrow { path, width: 2.0 }, "#00f"));
    let cmds = log.borrow();
    let line_tos = cmds.iter().filter(|c| matches!(c, DrawCommand::LineTo(_))).count();
    assert_eq!(line_tos, 4);
    assert_eq!(cmds.last(), Some(&DrawCommand::Fill("#00f".to_owned())));
}

#[test]
fn path_length_sums_segments() {
    let path = [Point::new(0.0, 0.0), Point::new(3.0, 4.0), Point::new(3.0, 10.0)];
    assert!(approx_eq(path_length(&path), 11.0));
    assert!(approx_eq(path_length(&[]), 0.0));
}

#[test]
fn rescale_is_linear_about_origin() {
    let old = GeoProjection::new(1000.0, 500.0, Point::new(0.0, 0.0));
    let new = GeoProjection::new(2000.0, 1000.0, Point::new(0.0, 0.0));
    let mut shape = Shape::Dot { center: Point::new(600.0, 250.0), radius: 4.0 };
    shape.rescale(&old, &new);
    assert_eq!(shape, Shape::Dot { center: Point::new(1200.0, 500.0), radius: 8.0 });
}

#[test]
fn polygons_close_every_ring() {
    let mut s = RecordingSurface::new();
    let log = s.log();
    let ring = vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0), Point::new(1.0, 1.0)];
    draw_polygons(&mut s, &[vec![ring.clone(), ring]], "#111", "#222", 0.5);
    let cmds = log.borrow();
    assert_eq!(cmds.iter().filter(|c| **c == DrawCommand::ClosePath).count(), 2);
    assert_eq!(cmds.iter().filter(|c| matches!(c, DrawCommand::Fill(_))).count(), 1);
}
