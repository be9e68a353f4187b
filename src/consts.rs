//! Shared numeric constants for the map component.

// ── Zoom ────────────────────────────────────────────────────────

/// Smallest allowed zoom scale (identity).
pub const MIN_SCALE: f64 = 1.0;

/// Largest allowed zoom scale.
pub const MAX_SCALE: f64 = 128.0;

/// How far the viewport may drift beyond the map edges, as a fraction of widget size.
pub const TRANSLATE_DRIFT: f64 = 0.3;

/// Share of the viewport a country fills after click-to-zoom.
pub const FIT_PADDING: f64 = 0.8;

/// Duration of zoom-to-bounds and reset transitions.
pub const ZOOM_TRANSITION_MS: f64 = 750.0;

/// Wheel delta multiplier for pixel-mode wheel events.
pub const WHEEL_DELTA_FACTOR: f64 = 0.002;

/// Scale multiplier applied by a double click.
pub const DOUBLE_CLICK_FACTOR: f64 = 2.0;

/// Pointer travel (screen px) below which a press-release is a click, not a pan.
pub const CLICK_SLOP_PX: f64 = 4.0;

// ── Projection ──────────────────────────────────────────────────

/// Latitude limit where Mercator is clamped to stay finite.
pub const MAX_MERCATOR_LAT: f64 = 85.051_128_779_806_59;

// ── Content layers ──────────────────────────────────────────────

/// Number of great-circle samples used for arrow paths.
pub const GEODESIC_STEPS: u32 = 64;

/// Arrowhead half-angle in radians (~30°).
pub const ARROW_ANGLE: f64 = std::f64::consts::PI / 6.0;

/// Arrowhead length as a multiple of stroke width.
pub const ARROWHEAD_RATIO: f64 = 4.0;

/// Stroke width of outline circles.
pub const CIRCLE_STROKE: f64 = 1.5;

/// Opacity of layers that are not the highlighted one.
pub const LAYER_DIM_OPACITY: f64 = 0.2;

// ── Dynamic layer ───────────────────────────────────────────────

/// Age after which dynamic content is evicted by the sweep.
pub const DYNAMIC_TTL_MS: f64 = 10_000.0;

/// Period of the dynamic layer's TTL sweep.
pub const SWEEP_PERIOD_MS: f64 = 2_000.0;

/// Default duration of the shrinking circle animation.
pub const CIRCLE_ANIMATION_MS: f64 = 700.0;

/// Interval between arrow path extensions.
pub const ARROW_TICK_MS: f64 = 16.0;

/// Path length (unprojected px) an arrow extends per tick.
pub const ARROW_STEP_PX: f64 = 6.0;

/// Fade-out duration once an animation completes.
pub const FADE_MS: f64 = 300.0;

// ── Map layer ───────────────────────────────────────────────────

/// Border stroke width in screen pixels.
pub const BORDER_WIDTH_PX: f64 = 0.5;

/// `brighter` factor applied to a hovered country.
pub const HOVER_BRIGHTEN: f64 = 1.0;

/// Fill used by `highlight` when the caller omits a color.
pub const DEFAULT_HIGHLIGHT_COLOR: &str = "#ffb300";

// ── Tiles ───────────────────────────────────────────────────────

/// Tile zoom calibration: one 256 px tile spans the world at tile zoom 0.
pub const TILE_ZOOM_CALIBRATION: f64 = 1.0 / 256.0;
