//! Map render layer: country polygons, focus, hover, dimming and highlights.
//!
//! Focus is an explicit two-state value per country with at most one country
//! focused at a time; the layer stores only the focused id, so the invariant
//! holds by construction. Clicks do not zoom by themselves: [`MapLayer::click`]
//! returns a [`ZoomRequest`] for the owner to hand to the zoom controller.

#[cfg(test)]
#[path = "map_layer_test.rs"]
mod map_layer_test;

use std::collections::BTreeMap;

use crate::camera::{Bounds, Point, ZoomTransform};
use crate::color::Rgb;
use crate::consts::{BORDER_WIDTH_PX, DEFAULT_HIGHLIGHT_COLOR, HOVER_BRIGHTEN};
use crate::countries::{Country, CountryId, CountryRegistry};
use crate::render;
use crate::schedule::Timeout;
use crate::surface::Surface;
use crate::zoom::{LayerContext, TransformSink};

/// Per-country focus state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusState {
    Unfocused,
    Focused,
}

/// What a click asks of the zoom controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ZoomRequest {
    /// Fit these unprojected bounds.
    ToBounds(Bounds),
    /// Back to identity.
    Reset,
}

/// Hover moved from one country (or none) to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoverChange {
    pub left: Option<CountryId>,
    pub entered: Option<CountryId>,
}

/// Map palette.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapColors {
    pub background: String,
    pub foreground: String,
    pub border: String,
}

#[derive(Debug)]
struct Highlight {
    color: String,
    expiry: Option<Timeout>,
}

pub struct MapLayer {
    surface: Option<Box<dyn Surface>>,
    colors: MapColors,
    focused: Option<CountryId>,
    hovered: Option<CountryId>,
    opacity: f64,
    highlights: BTreeMap<CountryId, Highlight>,
    selector_fills: BTreeMap<String, String>,
    transform: ZoomTransform,
}

impl MapLayer {
    /// `surface` is `None` when the host could not provide one; the layer then
    /// keeps state but draws nothing.
    #[must_use]
    pub fn new(surface: Option<Box<dyn Surface>>, colors: MapColors) -> Self {
        Self {
            surface,
            colors,
            focused: None,
            hovered: None,
            opacity: 1.0,
            highlights: BTreeMap::new(),
            selector_fills: BTreeMap::new(),
            transform: ZoomTransform::IDENTITY,
        }
    }

    #[must_use]
    pub fn is_inert(&self) -> bool {
        self.surface.is_none()
    }

    // --- Focus ---

    #[must_use]
    pub fn focused(&self) -> Option<CountryId> {
        self.focused
    }

    #[must_use]
    pub fn focus_state(&self, id: CountryId) -> FocusState {
        if self.focused == Some(id) { FocusState::Focused } else { FocusState::Unfocused }
    }

    /// Click on a country (or the background when `hit` is `None`).
    ///
    /// An unfocused country becomes the only focused one and the map zooms to
    /// it. A focused country or the background clears focus and resets.
    pub fn click(&mut self, hit: Option<CountryId>, countries: &CountryRegistry) -> ZoomRequest {
        match hit.and_then(|id| countries.get(id)) {
            Some(country) if self.focused != Some(country.id) => {
                tracing::debug!(country = %country.name, "focus");
                self.focused = Some(country.id);
                ZoomRequest::ToBounds(country.screen.bounds)
            }
            _ => {
                self.focused = None;
                ZoomRequest::Reset
            }
        }
    }

    /// Focus a country directly (zoom-to-country), returning its bounds.
    pub fn focus(&mut self, id: CountryId, countries: &CountryRegistry) -> Option<Bounds> {
        let country = countries.get(id)?;
        self.focused = Some(id);
        Some(country.screen.bounds)
    }

    pub fn clear_focus(&mut self) {
        self.focused = None;
    }

    // --- Hover ---

    #[must_use]
    pub fn hovered(&self) -> Option<CountryId> {
        self.hovered
    }

    /// Track the hovered country. `None` when nothing changed.
    pub fn hover(&mut self, hit: Option<CountryId>) -> Option<HoverChange> {
        if hit == self.hovered {
            return None;
        }
        let change = HoverChange { left: self.hovered, entered: hit };
        self.hovered = hit;
        Some(change)
    }

    // --- Styling ---

    /// Fade the whole map: opacity becomes `1 - level`, `level` clamped to `[0, 1]`.
    pub fn dim(&mut self, level: f64) {
        let level = if level.is_nan() { 0.0 } else { level.clamp(0.0, 1.0) };
        self.opacity = 1.0 - level;
    }

    #[must_use]
    pub fn opacity(&self) -> f64 {
        self.opacity
    }

    /// Paint `id` with `color` until `now_ms + duration_ms`, or until cleared when
    /// `duration_ms` is `None`. `id = None` clears every highlight.
    pub fn highlight(&mut self, id: Option<CountryId>, color: Option<&str>, duration_ms: Option<f64>, now_ms: f64) {
        let Some(id) = id else {
            for h in self.highlights.values() {
                if let Some(t) = &h.expiry {
                    t.handle().cancel();
                }
            }
            self.highlights.clear();
            return;
        };
        let expiry = duration_ms.filter(|d| d.is_finite()).map(|d| Timeout::new(now_ms + d.max(0.0)));
        let color = color.unwrap_or(DEFAULT_HIGHLIGHT_COLOR).to_owned();
        if let Some(old) = self.highlights.insert(id, Highlight { color, expiry }) {
            if let Some(t) = old.expiry {
                t.handle().cancel();
            }
        }
    }

    #[must_use]
    pub fn highlight_color(&self, id: CountryId) -> Option<&str> {
        self.highlights.get(&id).map(|h| h.color.as_str())
    }

    /// Drop highlights whose duration has elapsed. Returns whether any did.
    pub fn expire(&mut self, now_ms: f64) -> bool {
        let before = self.highlights.len();
        self.highlights.retain(|_, h| match h.expiry.as_mut() {
            Some(t) => !t.poll(now_ms) && !t.is_done(),
            None => true,
        });
        self.highlights.len() != before
    }

    /// Fill countries marked with `selector` using `color`.
    pub fn set_selector_fill(&mut self, selector: &str, color: &str) {
        self.selector_fills.insert(selector.to_owned(), color.to_owned());
    }

    pub fn clear_selector_fill(&mut self, selector: &str) -> bool {
        self.selector_fills.remove(selector).is_some()
    }

    /// Effective fill: highlight, then selector fill, then foreground; hover brightens.
    #[must_use]
    pub fn fill_for(&self, country: &Country) -> String {
        let base = self
            .highlights
            .get(&country.id)
            .map(|h| h.color.as_str())
            .or_else(|| country.marks.iter().find_map(|m| self.selector_fills.get(m).map(String::as_str)))
            .unwrap_or(self.colors.foreground.as_str());
        if self.hovered != Some(country.id) {
            return base.to_owned();
        }
        match Rgb::parse(base) {
            Some(rgb) => rgb.brighter(HOVER_BRIGHTEN).to_css(),
            None => base.to_owned(),
        }
    }

    // --- Drawing ---

    pub fn resize(&mut self, width: f64, height: f64) {
        if let Some(s) = self.surface.as_mut() {
            s.resize(width, height);
        }
    }

    /// Repaint every country under the current transform.
    pub fn render(&mut self, countries: &CountryRegistry) {
        let fills = countries.iter().map(|c| self.fill_for(c)).collect::<Vec<_>>();
        let Some(surface) = self.surface.as_deref_mut() else {
            return;
        };
        let projection = countries.projection();
        let (w, h) = (projection.width(), projection.height());

        surface.clear();
        surface.save();
        surface.set_alpha(self.opacity);
        surface.begin_path();
        surface.move_to(Point::new(0.0, 0.0));
        surface.line_to(Point::new(w, 0.0));
        surface.line_to(Point::new(w, h));
        surface.line_to(Point::new(0.0, h));
        surface.close_path();
        surface.fill(&self.colors.background);

        surface.set_transform(&self.transform);
        let border_width = BORDER_WIDTH_PX / self.transform.k;
        for (country, fill) in countries.iter().zip(&fills) {
            render::draw_polygons(surface, &country.screen.polygons, fill, &self.colors.border, border_width);
        }
        surface.restore();
    }

    /// Cancel pending highlight expiries.
    pub fn dispose(&mut self) {
        for h in self.highlights.values() {
            if let Some(t) = &h.expiry {
                t.handle().cancel();
            }
        }
    }
}

impl TransformSink for MapLayer {
    fn apply_transform(&mut self, transform: &ZoomTransform, ctx: &LayerContext<'_>) {
        self.transform = *transform;
        if let Some(countries) = ctx.countries {
            self.render(countries);
        }
    }
}
