//! Static layer manager: named persistent overlays of dots, circles and arrows.
//!
//! Content lives in unprojected screen space. Every transform change clears
//! each layer's surface and replays its items under the new transform. A
//! resize rescales stored items linearly into the new projection instead of
//! re-projecting from geographic coordinates, so items never keep their
//! source lat/lon.

#[cfg(test)]
#[path = "static_layer_test.rs"]
mod static_layer_test;

use crate::camera::{Point, ZoomTransform};
use crate::consts::{GEODESIC_STEPS, LAYER_DIM_OPACITY};
use crate::geo::{self, GeoPoint};
use crate::projection::GeoProjection;
use crate::render::{self, Item, Shape};
use crate::surface::{self, Surface, SurfaceFactory};
use crate::zoom::{LayerContext, TransformSink};

// =============================================================
// Primitive construction (shared with the dynamic layer)
// =============================================================

/// Sizes must be finite and non-negative.
pub(crate) fn valid_size(v: f64) -> bool {
    v.is_finite() && v >= 0.0
}

pub(crate) fn dot_shape(projection: &GeoProjection, geo: GeoPoint, radius: f64) -> Option<Shape> {
    (geo.is_valid() && valid_size(radius)).then(|| Shape::Dot { center: projection.project(geo), radius })
}

pub(crate) fn circle_shape(projection: &GeoProjection, geo: GeoPoint, radius: f64) -> Option<Shape> {
    (geo.is_valid() && valid_size(radius)).then(|| Shape::Circle { center: projection.project(geo), radius })
}

/// Great-circle path from `from` to `to`, sampled and projected.
pub(crate) fn arrow_path(projection: &GeoProjection, from: GeoPoint, to: GeoPoint) -> Option<Vec<Point>> {
    if !from.is_valid() || !to.is_valid() {
        return None;
    }
    Some(geo::great_circle(from, to, GEODESIC_STEPS).into_iter().map(|g| projection.project(g)).collect())
}

/// Arrow widths must be finite and strictly positive.
pub(crate) fn valid_width(width: f64) -> bool {
    width.is_finite() && width > 0.0
}

/// Opacity of `layer` given the currently highlighted layer.
pub(crate) fn layer_opacity(layer: &str, highlighted: Option<&str>) -> f64 {
    match highlighted {
        Some(h) if h != layer => LAYER_DIM_OPACITY,
        _ => 1.0,
    }
}

// =============================================================
// Layers
// =============================================================

pub struct StaticLayer {
    id: String,
    surface: Option<Box<dyn Surface>>,
    items: Vec<Item>,
}

impl StaticLayer {
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    fn draw(&mut self, transform: &ZoomTransform, opacity: f64) {
        let Some(s) = self.surface.as_deref_mut() else {
            return;
        };
        s.clear();
        s.save();
        s.set_alpha(opacity);
        s.set_transform(transform);
        for item in &self.items {
            render::draw_item(s, item);
        }
        s.restore();
    }
}

pub struct StaticLayers {
    layers: Vec<StaticLayer>,
    highlighted: Option<String>,
    projection: GeoProjection,
    transform: ZoomTransform,
}

impl StaticLayers {
    #[must_use]
    pub fn new(projection: GeoProjection) -> Self {
        Self { layers: Vec::new(), highlighted: None, projection, transform: ZoomTransform::IDENTITY }
    }

    /// Create a layer on top of the existing ones. Duplicate ids are rejected.
    pub fn add(&mut self, id: &str, factory: &mut dyn SurfaceFactory) -> bool {
        if self.index(id).is_some() {
            tracing::warn!(layer = id, "static layer already exists");
            return false;
        }
        let mut surface = surface::create_or_inert(factory, &format!("static:{id}"));
        if let Some(s) = surface.as_deref_mut() {
            s.resize(self.projection.width(), self.projection.height());
        }
        self.layers.push(StaticLayer { id: id.to_owned(), surface, items: Vec::new() });
        true
    }

    pub fn remove(&mut self, id: &str) -> bool {
        let Some(i) = self.index(id) else {
            return false;
        };
        let mut layer = self.layers.remove(i);
        if let Some(s) = layer.surface.as_deref_mut() {
            s.clear();
        }
        if self.highlighted.as_deref() == Some(id) {
            self.highlighted = None;
            self.redraw_all();
        }
        true
    }

    /// Drop every item of a layer, keeping the layer.
    pub fn erase(&mut self, id: &str) -> bool {
        let Some(i) = self.index(id) else {
            return false;
        };
        self.layers[i].items.clear();
        self.redraw(i);
        true
    }

    /// Show `id` at full opacity and dim the rest; `None` restores all.
    pub fn highlight(&mut self, id: Option<&str>) -> bool {
        if let Some(id) = id {
            if self.index(id).is_none() {
                return false;
            }
        }
        self.highlighted = id.map(str::to_owned);
        self.redraw_all();
        true
    }

    #[must_use]
    pub fn opacity(&self, id: &str) -> Option<f64> {
        self.index(id).map(|_| layer_opacity(id, self.highlighted.as_deref()))
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&StaticLayer> {
        self.layers.iter().find(|l| l.id == id)
    }

    #[must_use]
    pub fn items(&self, id: &str) -> Option<&[Item]> {
        self.get(id).map(StaticLayer::items)
    }

    /// Layer ids, bottom first.
    #[must_use]
    pub fn ids(&self) -> Vec<&str> {
        self.layers.iter().map(|l| l.id.as_str()).collect()
    }

    // --- Drawing ---

    /// Filled dot of `radius` unprojected px.
    pub fn dot(&mut self, id: &str, geo: GeoPoint, radius: f64, color: &str) -> bool {
        let shape = dot_shape(&self.projection, geo, radius);
        self.push(id, shape, color)
    }

    /// Outline circle of `radius` unprojected px.
    pub fn circle(&mut self, id: &str, geo: GeoPoint, radius: f64, color: &str) -> bool {
        let shape = circle_shape(&self.projection, geo, radius);
        self.push(id, shape, color)
    }

    /// Geodesic arrow from `from` to `to`.
    pub fn arrow(&mut self, id: &str, from: GeoPoint, to: GeoPoint, width: f64, color: &str) -> bool {
        let shape = valid_width(width)
            .then(|| arrow_path(&self.projection, from, to))
            .flatten()
            .map(|path| Shape::Arrow { path, width });
        self.push(id, shape, color)
    }

    fn push(&mut self, id: &str, shape: Option<Shape>, color: &str) -> bool {
        let (Some(i), Some(shape)) = (self.index(id), shape) else {
            return false;
        };
        self.layers[i].items.push(Item::new(shape, color));
        self.redraw(i);
        true
    }

    // --- Projection / transform ---

    /// Move all content into `projection` space and resize the surfaces.
    pub fn rescale(&mut self, projection: &GeoProjection) {
        let old = self.projection;
        for layer in &mut self.layers {
            for item in &mut layer.items {
                item.shape.rescale(&old, projection);
            }
            if let Some(s) = layer.surface.as_deref_mut() {
                s.resize(projection.width(), projection.height());
            }
        }
        self.projection = *projection;
        self.redraw_all();
    }

    pub fn redraw_all(&mut self) {
        for i in 0..self.layers.len() {
            self.redraw(i);
        }
    }

    fn redraw(&mut self, i: usize) {
        let opacity = layer_opacity(&self.layers[i].id, self.highlighted.as_deref());
        let transform = self.transform;
        self.layers[i].draw(&transform, opacity);
    }

    fn index(&self, id: &str) -> Option<usize> {
        self.layers.iter().position(|l| l.id == id)
    }
}

impl TransformSink for StaticLayers {
    fn apply_transform(&mut self, transform: &ZoomTransform, _ctx: &LayerContext<'_>) {
        self.transform = *transform;
        self.redraw_all();
    }
}
