use super::*;

#[test]
fn defaults() {
    let c = MapConfig::default();
    assert_eq!(c.map_path, DEFAULT_MAP_PATH);
    assert_eq!(c.tile_provider, None);
    assert!(!c.no_zoom);
    assert!(!c.dynamic_follows_zoom);
}

#[test]
fn from_json_camel_case_with_defaults() {
    let c = MapConfig::from_json(r##"{"mapPath":"maps/eu.json","centerX":12.5,"noZoom":true,"tileProvider":"osm"}"##)
        .expect("config");
    assert_eq!(c.map_path, "maps/eu.json");
    assert!((c.center_x - 12.5).abs() < 1e-12);
    assert!(c.no_zoom);
    assert_eq!(c.tile_provider.as_deref(), Some("osm"));
    assert!((c.width - DEFAULT_WIDTH).abs() < 1e-12);
    assert_eq!(c.foreground, DEFAULT_FOREGROUND);
}

#[test]
fn from_json_rejects_mistyped_fields() {
    assert!(matches!(MapConfig::from_json(r#"{"width":"wide"}"#), Err(MapError::Parse(_))));
    assert!(MapConfig::from_json("not json").is_err());
}

#[test]
fn chained_setters() {
    let c = MapConfig::default()
        .with_map_path("a.json")
        .with_size(800.0, 400.0)
        .with_center(-10.0, 5.0)
        .with_colors("#000", "#111", "#222")
        .with_tile_provider(Some("carto-light"))
        .with_no_zoom(true)
        .with_dynamic_follows_zoom(true);
    assert_eq!(c.center(), Point::new(-10.0, 5.0));
    assert_eq!(c.colors().foreground, "#111");
    assert_eq!(c.tile_provider.as_deref(), Some("carto-light"));
    assert!(c.no_zoom && c.dynamic_follows_zoom);
    assert!((c.width - 800.0).abs() < 1e-12);
}
