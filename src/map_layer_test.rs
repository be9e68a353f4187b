use super::*;
use crate::fixtures::world_descriptor;
use crate::projection::GeoProjection;
use crate::surface::{DrawCommand, RecordingSurface};
use crate::topology::decode;

fn registry() -> CountryRegistry {
    let projection = GeoProjection::new(960.0, 500.0, Point::new(0.0, 0.0));
    CountryRegistry::from_records(decode(&world_descriptor()).expect("decode"), &projection)
}

fn colors() -> MapColors {
    MapColors { background: "#000000".to_owned(), foreground: "#336699".to_owned(), border: "#ffffff".to_owned() }
}

fn layer() -> MapLayer {
    MapLayer::new(Some(Box::new(RecordingSurface::new())), colors())
}

// =============================================================
// Focus
// =============================================================

#[test]
fn click_unfocused_country_focuses_and_zooms() {
    let reg = registry();
    let mut map = layer();
    let east = reg.id("Eastia").expect("id");
    let req = map.click(Some(east), &reg);
    assert_eq!(req, ZoomRequest::ToBounds(reg.get(east).expect("country").screen.bounds));
    assert_eq!(map.focus_state(east), FocusState::Focused);
    assert_eq!(map.focused(), Some(east));
}

#[test]
fn at_most_one_focused() {
    let reg = registry();
    let mut map = layer();
    let a = CountryId(0);
    let b = CountryId(1);
    map.click(Some(a), &reg);
    map.click(Some(b), &reg);
    let focused = reg.iter().filter(|c| map.focus_state(c.id) == FocusState::Focused).count();
    assert_eq!(focused, 1);
    assert_eq!(map.focused(), Some(b));
}

#[test]
fn click_focused_country_resets() {
    let reg = registry();
    let mut map = layer();
    map.click(Some(CountryId(0)), &reg);
    assert_eq!(map.click(Some(CountryId(0)), &reg), ZoomRequest::Reset);
    assert_eq!(map.focused(), None);
}

#[test]
fn click_background_resets() {
    let reg = registry();
    let mut map = layer();
    map.click(Some(CountryId(2)), &reg);
    assert_eq!(map.click(None, &reg), ZoomRequest::Reset);
    assert_eq!(map.focus_state(CountryId(2)), FocusState::Unfocused);
}

// =============================================================
// Hover / styling
// =============================================================

#[test]
fn hover_reports_changes_only() {
    let mut map = layer();
    assert_eq!(map.hover(Some(CountryId(1))), Some(HoverChange { left: None, entered: Some(CountryId(1)) }));
    assert_eq!(map.hover(Some(CountryId(1))), None);
    assert_eq!(map.hover(None), Some(HoverChange { left: Some(CountryId(1)), entered: None }));
}

#[test]
fn hover_brightens_without_changing_focus() {
    let reg = registry();
    let mut map = layer();
    let sq = reg.get(CountryId(0)).expect("country");
    assert_eq!(map.fill_for(sq), "#336699");
    map.hover(Some(CountryId(0)));
    let expected = Rgb::parse("#336699").expect("rgb").brighter(HOVER_BRIGHTEN).to_css();
    assert_eq!(map.fill_for(sq), expected);
    assert_eq!(map.focused(), None);
}

#[test]
fn dim_clamps_level() {
    let mut map = layer();
    map.dim(0.25);
    assert!((map.opacity() - 0.75).abs() < 1e-12);
    map.dim(3.0);
    assert!(map.opacity().abs() < 1e-12);
    map.dim(-1.0);
    assert!((map.opacity() - 1.0).abs() < 1e-12);
}

#[test]
fn highlight_expires_after_duration() {
    let reg = registry();
    let mut map = layer();
    map.highlight(Some(CountryId(1)), None, Some(500.0), 1000.0);
    assert_eq!(map.highlight_color(CountryId(1)), Some(DEFAULT_HIGHLIGHT_COLOR));
    assert_eq!(map.fill_for(reg.get(CountryId(1)).expect("country")), DEFAULT_HIGHLIGHT_COLOR);
    assert!(!map.expire(1499.0));
    assert!(map.expire(1500.0));
    assert_eq!(map.highlight_color(CountryId(1)), None);
}

#[test]
fn persistent_highlight_until_cleared() {
    let mut map = layer();
    map.highlight(Some(CountryId(0)), Some("#ff0000"), None, 0.0);
    map.highlight(Some(CountryId(1)), Some("#00ff00"), None, 0.0);
    assert!(!map.expire(1e9));
    map.highlight(None, None, None, 0.0);
    assert_eq!(map.highlight_color(CountryId(0)), None);
    assert_eq!(map.highlight_color(CountryId(1)), None);
}

#[test]
fn selector_fill_applies_to_marked_countries() {
    let mut reg = registry();
    let mut map = layer();
    reg.mark(CountryId(2), "c__g");
    map.set_selector_fill("c__g", "#abcdef");
    assert_eq!(map.fill_for(reg.get(CountryId(2)).expect("country")), "#abcdef");
    assert_eq!(map.fill_for(reg.get(CountryId(1)).expect("country")), "#336699");
}

// =============================================================
// Rendering
// =============================================================

#[test]
fn render_uses_transform_and_scaled_border() {
    let reg = registry();
    let surface = RecordingSurface::new();
    let log = surface.log();
    let mut map = MapLayer::new(Some(Box::new(surface)), colors());
    let t = ZoomTransform::new(-100.0, -50.0, 4.0);
    let ctx = LayerContext { projection: reg.projection(), countries: Some(&reg), now_ms: 0.0 };
    map.apply_transform(&t, &ctx);

    let cmds = log.borrow();
    assert_eq!(cmds.first(), Some(&DrawCommand::Clear));
    assert!(cmds.contains(&DrawCommand::SetTransform(t)));
    assert!(cmds.contains(&DrawCommand::Stroke { color: "#ffffff".to_owned(), width: BORDER_WIDTH_PX / 4.0 }));
    assert_eq!(cmds.last(), Some(&DrawCommand::Restore));
}

#[test]
fn inert_layer_keeps_state() {
    let reg = registry();
    let mut map = MapLayer::new(None, colors());
    assert!(map.is_inert());
    map.render(&reg);
    map.click(Some(CountryId(0)), &reg);
    assert_eq!(map.focused(), Some(CountryId(0)));
}
