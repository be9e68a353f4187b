use std::cell::RefCell;
use std::rc::Rc;

use super::*;

fn projection() -> GeoProjection {
    GeoProjection::new(960.0, 500.0, Point::new(0.0, 0.0))
}

fn ctx(projection: &GeoProjection) -> LayerContext<'_> {
    LayerContext { projection, countries: None, now_ms: 0.0 }
}

type Events = Rc<RefCell<Vec<String>>>;

fn recording_handlers(events: &Events) -> TouchHandlers {
    let (h, l, c) = (Rc::clone(events), Rc::clone(events), Rc::clone(events));
    TouchHandlers {
        on_hover: Some(Box::new(move |id: &str| h.borrow_mut().push(format!("hover:{id}")))),
        on_leave: Some(Box::new(move |id: &str| l.borrow_mut().push(format!("leave:{id}")))),
        on_click: Some(Box::new(move |id: &str| c.borrow_mut().push(format!("click:{id}")))),
    }
}

#[test]
fn rendered_radius_is_zoom_invariant() {
    let proj = projection();
    let mut touch = TouchLayer::new(proj);
    touch.apply_transform(&ZoomTransform::new(0.0, 0.0, 2.0), &ctx(&proj));
    assert!(touch.add("a", GeoPoint::new(0.0, 0.0), 12.0, TouchHandlers::default()));
    assert!((touch.rendered_radius("a").expect("radius") - 12.0).abs() < 1e-12);
    assert!((touch.get("a").expect("element").local_radius() - 6.0).abs() < 1e-12);

    touch.apply_transform(&ZoomTransform::new(-500.0, -300.0, 37.0), &ctx(&proj));
    assert!((touch.rendered_radius("a").expect("radius") - 12.0).abs() < 1e-12);
}

#[test]
fn add_rejects_invalid_and_duplicates() {
    let mut touch = TouchLayer::new(projection());
    assert!(!touch.add("a", GeoPoint::new(f64::NAN, 0.0), 5.0, TouchHandlers::default()));
    assert!(!touch.add("a", GeoPoint::new(0.0, 0.0), f64::NAN, TouchHandlers::default()));
    assert!(touch.add("a", GeoPoint::new(0.0, 0.0), 5.0, TouchHandlers::default()));
    assert!(!touch.add("a", GeoPoint::new(10.0, 10.0), 5.0, TouchHandlers::default()));
    assert_eq!(touch.len(), 1);
}

#[test]
fn remove_and_erase() {
    let mut touch = TouchLayer::new(projection());
    touch.add("a", GeoPoint::new(0.0, 0.0), 5.0, TouchHandlers::default());
    touch.add("b", GeoPoint::new(10.0, 10.0), 5.0, TouchHandlers::default());
    assert!(touch.remove("a"));
    assert!(!touch.remove("a"));
    touch.erase();
    assert!(touch.is_empty());
}

#[test]
fn hover_leave_click_dispatch() {
    let proj = projection();
    let events: Events = Rc::default();
    let mut touch = TouchLayer::new(proj);
    touch.add("a", GeoPoint::new(0.0, 0.0), 5.0, recording_handlers(&events));
    let center = proj.project(GeoPoint::new(0.0, 0.0));

    assert!(touch.pointer_move(center));
    assert!(touch.pointer_move(Point::new(center.x + 1.0, center.y)));
    assert!(!touch.pointer_move(Point::new(center.x + 50.0, center.y)));
    assert!(touch.click(center));
    assert!(!touch.click(Point::new(0.0, 0.0)));
    assert_eq!(*events.borrow(), vec!["hover:a", "leave:a", "click:a"]);
}

#[test]
fn hit_test_uses_local_radius() {
    let proj = projection();
    let mut touch = TouchLayer::new(proj);
    touch.add("a", GeoPoint::new(0.0, 0.0), 8.0, TouchHandlers::default());
    let center = proj.project(GeoPoint::new(0.0, 0.0));
    assert_eq!(touch.hit_test(Point::new(center.x + 6.0, center.y)), Some("a"));
    touch.apply_transform(&ZoomTransform::new(0.0, 0.0, 4.0), &ctx(&proj));
    assert_eq!(touch.hit_test(Point::new(center.x + 6.0, center.y)), None);
    assert_eq!(touch.hit_test(Point::new(center.x + 1.5, center.y)), Some("a"));
}

#[test]
fn rescale_moves_positions() {
    let mut touch = TouchLayer::new(projection());
    let geo = GeoPoint::new(20.0, 30.0);
    touch.add("a", geo, 5.0, TouchHandlers::default());
    let bigger = GeoProjection::new(1920.0, 1000.0, Point::new(10.0, 0.0));
    touch.rescale(&bigger);
    let c = touch.get("a").expect("element").center();
    let expected = bigger.project(geo);
    assert!((c.x - expected.x).abs() < 1e-6 && (c.y - expected.y).abs() < 1e-6);
    assert_eq!(touch.rendered_radius("a"), Some(5.0));
}
