use super::*;
use crate::surface::{DrawCommand, RecordingFactory};

fn projection() -> GeoProjection {
    GeoProjection::new(960.0, 500.0, Point::new(0.0, 0.0))
}

fn layers_with(ids: &[&str]) -> (StaticLayers, RecordingFactory) {
    let mut factory = RecordingFactory::new();
    let mut layers = StaticLayers::new(projection());
    for id in ids {
        assert!(layers.add(id, &mut factory));
    }
    (layers, factory)
}

fn ctx(projection: &GeoProjection) -> LayerContext<'_> {
    LayerContext { projection, countries: None, now_ms: 0.0 }
}

// =============================================================
// Layer registry
// =============================================================

#[test]
fn add_rejects_duplicates() {
    let (mut layers, mut factory) = layers_with(&["a"]);
    assert!(!layers.add("a", &mut factory));
    assert_eq!(layers.ids(), vec!["a"]);
}

#[test]
fn remove_and_unknown_ids() {
    let (mut layers, _) = layers_with(&["a", "b"]);
    assert!(layers.remove("a"));
    assert!(!layers.remove("a"));
    assert!(!layers.erase("zzz"));
    assert!(!layers.dot("zzz", GeoPoint::new(0.0, 0.0), 2.0, "#fff"));
    assert_eq!(layers.ids(), vec!["b"]);
}

#[test]
fn unavailable_surface_gives_inert_layer() {
    let mut factory = RecordingFactory::unavailable();
    let mut layers = StaticLayers::new(projection());
    assert!(layers.add("a", &mut factory));
    assert!(layers.dot("a", GeoPoint::new(0.0, 0.0), 2.0, "#fff"));
    assert_eq!(layers.items("a").map(<[Item]>::len), Some(1));
}

// =============================================================
// Drawing and validation
// =============================================================

#[test]
fn dot_projects_to_unprojected_space() {
    let (mut layers, _) = layers_with(&["a"]);
    let geo = GeoPoint::new(10.0, 20.0);
    assert!(layers.dot("a", geo, 3.0, "#f00"));
    let items = layers.items("a").expect("items");
    assert_eq!(items[0], Item::new(Shape::Dot { center: projection().project(geo), radius: 3.0 }, "#f00"));
}

#[test]
fn invalid_input_is_rejected_without_mutation() {
    let (mut layers, _) = layers_with(&["a"]);
    let ok = GeoPoint::new(0.0, 0.0);
    assert!(!layers.dot("a", GeoPoint::new(f64::NAN, 0.0), 2.0, "#fff"));
    assert!(!layers.dot("a", GeoPoint::new(95.0, 0.0), 2.0, "#fff"));
    assert!(!layers.circle("a", ok, f64::INFINITY, "#fff"));
    assert!(!layers.circle("a", ok, -1.0, "#fff"));
    assert!(!layers.arrow("a", ok, GeoPoint::new(0.0, f64::NAN), 1.0, "#fff"));
    assert!(!layers.arrow("a", ok, GeoPoint::new(10.0, 10.0), 0.0, "#fff"));
    assert!(!layers.arrow("a", ok, GeoPoint::new(10.0, 10.0), f64::NAN, "#fff"));
    assert_eq!(layers.items("a").map(<[Item]>::len), Some(0));
}

#[test]
fn arrow_samples_great_circle() {
    let (mut layers, _) = layers_with(&["a"]);
    let from = GeoPoint::new(40.0, -70.0);
    let to = GeoPoint::new(50.0, 0.0);
    assert!(layers.arrow("a", from, to, 1.5, "#0ff"));
    let Shape::Arrow { path, width } = &layers.items("a").expect("items")[0].shape else {
        panic!("expected arrow");
    };
    assert_eq!(path.len(), GEODESIC_STEPS as usize + 1);
    assert_eq!(path[0], projection().project(from));
    assert_eq!(*path.last().expect("tip"), projection().project(to));
    assert!((width - 1.5).abs() < 1e-12);
}

#[test]
fn erase_clears_content_and_surface() {
    let (mut layers, factory) = layers_with(&["a"]);
    layers.dot("a", GeoPoint::new(0.0, 0.0), 2.0, "#fff");
    assert!(layers.erase("a"));
    assert_eq!(layers.items("a").map(<[Item]>::len), Some(0));
    let log = factory.log("static:a").expect("log");
    assert!(!log.borrow().iter().any(|c| matches!(c, DrawCommand::Arc { .. })));
}

// =============================================================
// Transform, highlight, resize
// =============================================================

#[test]
fn transform_change_replays_at_unprojected_positions() {
    let (mut layers, factory) = layers_with(&["a"]);
    let geo = GeoPoint::new(0.0, 0.0);
    layers.dot("a", geo, 2.0, "#fff");
    let t = ZoomTransform::new(-480.0, -250.0, 2.0);
    let proj = projection();
    layers.apply_transform(&t, &ctx(&proj));

    let log = factory.log("static:a").expect("log");
    let cmds = log.borrow();
    assert_eq!(
        *cmds,
        vec![
            DrawCommand::Clear,
            DrawCommand::Save,
            DrawCommand::SetAlpha(1.0),
            DrawCommand::SetTransform(t),
            DrawCommand::BeginPath,
            DrawCommand::Arc { center: proj.project(geo), radius: 2.0 },
            DrawCommand::Fill("#fff".to_owned()),
            DrawCommand::Restore,
        ]
    );
}

#[test]
fn highlight_dims_other_layers() {
    let (mut layers, _) = layers_with(&["a", "b"]);
    assert!(layers.highlight(Some("b")));
    assert_eq!(layers.opacity("a"), Some(LAYER_DIM_OPACITY));
    assert_eq!(layers.opacity("b"), Some(1.0));
    assert!(!layers.highlight(Some("zzz")));
    assert!(layers.highlight(None));
    assert_eq!(layers.opacity("a"), Some(1.0));
}

#[test]
fn resize_rescales_instead_of_reprojecting() {
    let (mut layers, _) = layers_with(&["a"]);
    let geo = GeoPoint::new(30.0, 60.0);
    layers.dot("a", geo, 4.0, "#fff");
    let bigger = GeoProjection::new(1920.0, 1000.0, Point::new(0.0, 0.0));
    layers.rescale(&bigger);
    let Shape::Dot { center, radius } = layers.items("a").expect("items")[0].shape else {
        panic!("expected dot");
    };
    let expected = bigger.project(geo);
    assert!((center.x - expected.x).abs() < 1e-6);
    assert!((center.y - expected.y).abs() < 1e-6);
    assert!((radius - 8.0).abs() < 1e-9);
}
