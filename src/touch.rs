//! Touch layer: invisible circular hit regions with hover/leave/click callbacks.
//!
//! Each element stores its position in unprojected space and a local radius of
//! `radius / k`. The zoom transform scales the local radius back up, so the
//! on-screen hit radius stays equal to the requested `radius` at every zoom
//! level.

#[cfg(test)]
#[path = "touch_test.rs"]
mod touch_test;

use crate::camera::{Point, ZoomTransform};
use crate::geo::GeoPoint;
use crate::hit;
use crate::projection::GeoProjection;
use crate::static_layer::valid_size;
use crate::zoom::{LayerContext, TransformSink};

/// Touch callback; receives the element id.
pub type TouchCallback = Box<dyn FnMut(&str)>;

/// Optional callbacks attached to an element.
#[derive(Default)]
pub struct TouchHandlers {
    pub on_hover: Option<TouchCallback>,
    pub on_leave: Option<TouchCallback>,
    pub on_click: Option<TouchCallback>,
}

pub struct TouchElement {
    id: String,
    center: Point,
    radius: f64,
    local_radius: f64,
    handlers: TouchHandlers,
}

impl TouchElement {
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn center(&self) -> Point {
        self.center
    }

    /// Radius in unprojected space under the current transform.
    #[must_use]
    pub fn local_radius(&self) -> f64 {
        self.local_radius
    }
}

pub struct TouchLayer {
    elements: Vec<TouchElement>,
    hovered: Option<String>,
    projection: GeoProjection,
    k: f64,
}

impl TouchLayer {
    #[must_use]
    pub fn new(projection: GeoProjection) -> Self {
        Self { elements: Vec::new(), hovered: None, projection, k: 1.0 }
    }

    /// Place a hit region of on-screen `radius` at `geo`.
    ///
    /// Invalid coordinates, a bad radius or an id already in use return `false`.
    pub fn add(&mut self, id: &str, geo: GeoPoint, radius: f64, handlers: TouchHandlers) -> bool {
        if !geo.is_valid() || !valid_size(radius) {
            return false;
        }
        if self.index(id).is_some() {
            tracing::warn!(element = id, "touch element already exists");
            return false;
        }
        self.elements.push(TouchElement {
            id: id.to_owned(),
            center: self.projection.project(geo),
            radius,
            local_radius: radius / self.k,
            handlers,
        });
        true
    }

    pub fn remove(&mut self, id: &str) -> bool {
        let Some(i) = self.index(id) else {
            return false;
        };
        self.elements.remove(i);
        if self.hovered.as_deref() == Some(id) {
            self.hovered = None;
        }
        true
    }

    /// Remove every element.
    pub fn erase(&mut self) {
        self.elements.clear();
        self.hovered = None;
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&TouchElement> {
        self.elements.iter().find(|e| e.id == id)
    }

    /// On-screen hit radius after the zoom transform.
    #[must_use]
    pub fn rendered_radius(&self, id: &str) -> Option<f64> {
        self.get(id).map(|e| e.local_radius * self.k)
    }

    /// Topmost element under an unprojected point.
    #[must_use]
    pub fn hit_test(&self, p: Point) -> Option<&str> {
        self.elements
            .iter()
            .rev()
            .find(|e| hit::point_in_circle(p, e.center, e.local_radius))
            .map(|e| e.id.as_str())
    }

    /// Track hover at an unprojected point, firing leave/hover on change.
    /// Returns whether an element is under the pointer.
    pub fn pointer_move(&mut self, p: Point) -> bool {
        let hit = self.hit_test(p).map(str::to_owned);
        if hit != self.hovered {
            if let Some(prev) = self.hovered.take() {
                self.fire(&prev, |h| h.on_leave.as_mut());
            }
            if let Some(next) = &hit {
                self.fire(next, |h| h.on_hover.as_mut());
            }
            self.hovered = hit.clone();
        }
        hit.is_some()
    }

    /// Pointer left the widget.
    pub fn pointer_leave(&mut self) {
        if let Some(prev) = self.hovered.take() {
            self.fire(&prev, |h| h.on_leave.as_mut());
        }
    }

    /// Click at an unprojected point. Returns whether an element took it.
    pub fn click(&mut self, p: Point) -> bool {
        let Some(id) = self.hit_test(p).map(str::to_owned) else {
            return false;
        };
        self.fire(&id, |h| h.on_click.as_mut());
        true
    }

    /// Move element positions into `projection` space. Radii are screen sizes and stay.
    pub fn rescale(&mut self, projection: &GeoProjection) {
        for e in &mut self.elements {
            e.center = projection.rescale_from(&self.projection, e.center);
        }
        self.projection = *projection;
    }

    fn fire(&mut self, id: &str, pick: impl FnOnce(&mut TouchHandlers) -> Option<&mut TouchCallback>) {
        if let Some(e) = self.elements.iter_mut().find(|e| e.id == id) {
            if let Some(callback) = pick(&mut e.handlers) {
                callback(id);
            }
        }
    }

    fn index(&self, id: &str) -> Option<usize> {
        self.elements.iter().position(|e| e.id == id)
    }
}

impl TransformSink for TouchLayer {
    fn apply_transform(&mut self, transform: &ZoomTransform, _ctx: &LayerContext<'_>) {
        self.k = transform.k;
        for e in &mut self.elements {
            e.local_radius = e.radius / transform.k;
        }
    }
}
