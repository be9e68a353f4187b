//! Dynamic layer manager: transient, animated, self-expiring overlays.
//!
//! Draw calls mirror the static layer, but every item records its birth time.
//! Circles shrink to nothing and arrows travel along their great circle, each
//! firing a completion callback when done. A sweep running every
//! [`SWEEP_PERIOD_MS`] evicts anything older than [`DYNAMIC_TTL_MS`] in case
//! an animation never completes. Evicted items leave the content list at once
//! and fade out over [`FADE_MS`] on a separate list that is drawn but never
//! reported as content; their completion callbacks never fire.
//!
//! Time comes from the host through [`DynamicLayers::advance`]; every timer is
//! cancelled by [`DynamicLayers::dispose`] or when the manager is dropped.

#[cfg(test)]
#[path = "dynamic_layer_test.rs"]
mod dynamic_layer_test;

use crate::camera::{Point, ZoomTransform};
use crate::consts::{ARROW_STEP_PX, ARROW_TICK_MS, CIRCLE_ANIMATION_MS, DYNAMIC_TTL_MS, FADE_MS, SWEEP_PERIOD_MS};
use crate::ease::exp_in_out;
use crate::geo::GeoPoint;
use crate::projection::GeoProjection;
use crate::render::{self, Item, Shape};
use crate::schedule::{Interval, TaskHandle};
use crate::static_layer::{arrow_path, circle_shape, dot_shape, layer_opacity, valid_width};
use crate::surface::{self, Surface, SurfaceFactory};
use crate::zoom::{LayerContext, TransformSink};

/// Completion callback for animated primitives.
pub type OnDone = Box<dyn FnOnce()>;

enum Animation {
    /// Stays until the TTL sweep.
    Still,
    /// Radius eases from `radius` down to zero.
    Shrink { start_ms: f64, duration_ms: f64, radius: f64, on_done: Option<OnDone> },
    /// Path grows along `full` one step per tick.
    Travel { full: Vec<Point>, drawn: f64, ticker: Interval, on_done: Option<OnDone> },
    /// Fading out after completion.
    Fade { start_ms: f64 },
}

/// One dynamic item: a primitive, its birth time, and its animation.
pub struct DynamicItem {
    pub item: Item,
    pub born_ms: f64,
    alpha: f64,
    animation: Animation,
}

impl DynamicItem {
    #[must_use]
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    fn cancel(&self) {
        if let Animation::Travel { ticker, .. } = &self.animation {
            ticker.handle().cancel();
        }
    }

    /// Step the animation. Returns `false` once the item should be removed.
    /// A completion callback, if due, is pushed to `done`.
    fn step(&mut self, now_ms: f64, done: &mut Vec<OnDone>) -> bool {
        match &mut self.animation {
            Animation::Still => true,
            Animation::Shrink { start_ms, duration_ms, radius, on_done } => {
                let t = if *duration_ms > 0.0 { (now_ms - *start_ms) / *duration_ms } else { 1.0 };
                if t >= 1.0 {
                    done.extend(on_done.take());
                    return false;
                }
                let r = *radius * (1.0 - exp_in_out(t));
                if let Shape::Circle { radius: current, .. } = &mut self.item.shape {
                    *current = r;
                }
                true
            }
            Animation::Travel { full, drawn, ticker, on_done } => {
                let Shape::Arrow { path, width } = &mut self.item.shape else {
                    return false;
                };
                if !ticker.poll(now_ms) {
                    return true;
                }
                *drawn += ARROW_STEP_PX;
                let total = render::path_length(full);
                if total - *drawn <= render::arrowhead_length(*width) {
                    *path = std::mem::take(full);
                    ticker.handle().cancel();
                    done.extend(on_done.take());
                    self.animation = Animation::Fade { start_ms: now_ms };
                } else {
                    *path = truncate_path(full, *drawn);
                }
                true
            }
            Animation::Fade { start_ms } => {
                let t = (now_ms - *start_ms) / FADE_MS;
                if t >= 1.0 {
                    return false;
                }
                self.alpha = 1.0 - t.max(0.0);
                true
            }
        }
    }
}

/// Prefix of `path` with arc length `len`, ending on an interpolated point.
#[must_use]
pub fn truncate_path(path: &[Point], len: f64) -> Vec<Point> {
    let mut out = Vec::with_capacity(path.len());
    let Some(first) = path.first() else {
        return out;
    };
    out.push(*first);
    let mut remaining = len;
    for w in path.windows(2) {
        let seg = w[0].distance(w[1]);
        if remaining >= seg {
            out.push(w[1]);
            remaining -= seg;
            continue;
        }
        if remaining > 0.0 {
            let f = remaining / seg;
            out.push(Point::new(w[0].x + (w[1].x - w[0].x) * f, w[0].y + (w[1].y - w[0].y) * f));
        }
        break;
    }
    out
}

pub struct DynamicLayer {
    id: String,
    surface: Option<Box<dyn Surface>>,
    items: Vec<DynamicItem>,
    /// Swept items still fading out.
    fading: Vec<DynamicItem>,
}

impl DynamicLayer {
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn items(&self) -> &[DynamicItem] {
        &self.items
    }

    #[must_use]
    pub fn fading(&self) -> &[DynamicItem] {
        &self.fading
    }

    fn draw(&mut self, transform: &ZoomTransform, opacity: f64) {
        let Some(s) = self.surface.as_deref_mut() else {
            return;
        };
        s.clear();
        s.save();
        s.set_transform(transform);
        for d in self.fading.iter().chain(&self.items) {
            s.set_alpha(opacity * d.alpha);
            render::draw_item(s, &d.item);
        }
        s.restore();
    }
}

pub struct DynamicLayers {
    layers: Vec<DynamicLayer>,
    highlighted: Option<String>,
    projection: GeoProjection,
    transform: ZoomTransform,
    sweep: Option<Interval>,
    now_ms: f64,
    disposed: bool,
}

impl DynamicLayers {
    #[must_use]
    pub fn new(projection: GeoProjection) -> Self {
        Self {
            layers: Vec::new(),
            highlighted: None,
            projection,
            transform: ZoomTransform::IDENTITY,
            sweep: None,
            now_ms: 0.0,
            disposed: false,
        }
    }

    pub fn add(&mut self, id: &str, factory: &mut dyn SurfaceFactory) -> bool {
        if self.index(id).is_some() {
            tracing::warn!(layer = id, "dynamic layer already exists");
            return false;
        }
        let mut surface = surface::create_or_inert(factory, &format!("dynamic:{id}"));
        if let Some(s) = surface.as_deref_mut() {
            s.resize(self.projection.width(), self.projection.height());
        }
        self.layers.push(DynamicLayer { id: id.to_owned(), surface, items: Vec::new(), fading: Vec::new() });
        true
    }

    /// Remove a layer, cancelling its animations. Pending callbacks never fire.
    pub fn remove(&mut self, id: &str) -> bool {
        let Some(i) = self.index(id) else {
            return false;
        };
        let mut layer = self.layers.remove(i);
        layer.items.iter().for_each(DynamicItem::cancel);
        if let Some(s) = layer.surface.as_deref_mut() {
            s.clear();
        }
        if self.highlighted.as_deref() == Some(id) {
            self.highlighted = None;
            self.redraw_all();
        }
        true
    }

    pub fn erase(&mut self, id: &str) -> bool {
        let Some(i) = self.index(id) else {
            return false;
        };
        self.layers[i].items.iter().for_each(DynamicItem::cancel);
        self.layers[i].items.clear();
        self.layers[i].fading.clear();
        self.redraw(i);
        true
    }

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
    pub fn items(&self, id: &str) -> Option<&[DynamicItem]> {
        self.layers.iter().find(|l| l.id == id).map(DynamicLayer::items)
    }

    /// Items swept from `id` that are still fading out.
    #[must_use]
    pub fn fading(&self, id: &str) -> Option<&[DynamicItem]> {
        self.layers.iter().find(|l| l.id == id).map(DynamicLayer::fading)
    }

    #[must_use]
    pub fn ids(&self) -> Vec<&str> {
        self.layers.iter().map(|l| l.id.as_str()).collect()
    }

    /// Time of the latest `advance`, used as the birth time of new items.
    #[must_use]
    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    // --- Drawing ---

    /// A dot that stays until the TTL sweep or an erase.
    pub fn dot(&mut self, id: &str, geo: GeoPoint, radius: f64, color: &str) -> bool {
        let shape = dot_shape(&self.projection, geo, radius);
        self.push(id, shape, color, Animation::Still)
    }

    /// A circle shrinking to zero over `duration_ms` (default [`CIRCLE_ANIMATION_MS`]).
    pub fn circle(
        &mut self,
        id: &str,
        geo: GeoPoint,
        radius: f64,
        color: &str,
        duration_ms: Option<f64>,
        on_done: Option<OnDone>,
    ) -> bool {
        let duration_ms = duration_ms.unwrap_or(CIRCLE_ANIMATION_MS);
        if !(duration_ms.is_finite() && duration_ms >= 0.0) {
            return false;
        }
        let shape = circle_shape(&self.projection, geo, radius);
        let animation = Animation::Shrink { start_ms: self.now_ms, duration_ms, radius, on_done };
        self.push(id, shape, color, animation)
    }

    /// An arrow that travels from `from` to `to`, then fades.
    pub fn arrow(
        &mut self,
        id: &str,
        from: GeoPoint,
        to: GeoPoint,
        width: f64,
        color: &str,
        on_done: Option<OnDone>,
    ) -> bool {
        let Some(full) = valid_width(width).then(|| arrow_path(&self.projection, from, to)).flatten() else {
            return false;
        };
        let start = full.first().copied().map(|p| vec![p]).unwrap_or_default();
        let animation =
            Animation::Travel { full, drawn: 0.0, ticker: Interval::new(self.now_ms, ARROW_TICK_MS), on_done };
        self.push(id, Some(Shape::Arrow { path: start, width }), color, animation)
    }

    fn push(&mut self, id: &str, shape: Option<Shape>, color: &str, animation: Animation) -> bool {
        let (Some(i), Some(shape)) = (self.index(id), shape) else {
            return false;
        };
        let born_ms = self.now_ms;
        self.layers[i].items.push(DynamicItem { item: Item::new(shape, color), born_ms, alpha: 1.0, animation });
        self.redraw(i);
        true
    }

    // --- Time ---

    /// Advance animations and the TTL sweep to `now_ms`, then fire completion
    /// callbacks. Returns whether anything changed on screen.
    pub fn advance(&mut self, now_ms: f64) -> bool {
        if self.disposed {
            return false;
        }
        self.now_ms = now_ms;
        let sweep = self.sweep.get_or_insert_with(|| Interval::new(now_ms, SWEEP_PERIOD_MS));
        let mut changed = sweep.poll(now_ms) && self.sweep(now_ms) > 0;

        let mut done = Vec::new();
        for i in 0..self.layers.len() {
            let layer = &mut self.layers[i];
            let animating = !layer.items.iter().all(|d| matches!(d.animation, Animation::Still));
            if !animating && layer.fading.is_empty() {
                continue;
            }
            layer.items.retain_mut(|d| d.step(now_ms, &mut done));
            layer.fading.retain_mut(|d| d.step(now_ms, &mut done));
            self.redraw(i);
            changed = true;
        }
        for callback in done {
            callback();
        }
        changed
    }

    /// Evict items aged [`DYNAMIC_TTL_MS`] or more. Returns how many were removed.
    ///
    /// Each layer's list is replaced in one step, so a sweep never observes a
    /// half-filtered list. Evicted items start fading out from `now_ms`.
    pub fn sweep(&mut self, now_ms: f64) -> usize {
        let mut removed = 0;
        for i in 0..self.layers.len() {
            let items = std::mem::take(&mut self.layers[i].items);
            let before = items.len();
            let (kept, expired): (Vec<_>, Vec<_>) =
                items.into_iter().partition(|d| now_ms - d.born_ms < DYNAMIC_TTL_MS);
            removed += before - kept.len();
            let layer = &mut self.layers[i];
            layer.items = kept;
            if expired.is_empty() {
                continue;
            }
            for mut d in expired {
                d.cancel();
                d.animation = Animation::Fade { start_ms: now_ms };
                layer.fading.push(d);
            }
            self.redraw(i);
        }
        if removed > 0 {
            tracing::debug!(removed, "dynamic sweep evicted stale items");
        }
        removed
    }

    /// Handle of the TTL sweep, once started.
    #[must_use]
    pub fn sweep_handle(&self) -> Option<TaskHandle> {
        self.sweep.as_ref().map(Interval::handle)
    }

    /// Cancel every timer. Further `advance` calls do nothing.
    pub fn dispose(&mut self) {
        if let Some(sweep) = &self.sweep {
            sweep.handle().cancel();
        }
        for layer in &self.layers {
            layer.items.iter().for_each(DynamicItem::cancel);
        }
        self.disposed = true;
    }

    // --- Projection / transform ---

    pub fn rescale(&mut self, projection: &GeoProjection) {
        let old = self.projection;
        for layer in &mut self.layers {
            for d in &mut layer.fading {
                d.item.shape.rescale(&old, projection);
            }
            for d in &mut layer.items {
                d.item.shape.rescale(&old, projection);
                match &mut d.animation {
                    Animation::Travel { full, drawn, .. } => {
                        for p in full.iter_mut() {
                            *p = projection.rescale_from(&old, *p);
                        }
                        *drawn *= projection.rescale_ratio(&old);
                    }
                    Animation::Shrink { radius, .. } => *radius *= projection.rescale_ratio(&old),
                    Animation::Still | Animation::Fade { .. } => {}
                }
            }
            if let Some(s) = layer.surface.as_deref_mut() {
                s.resize(projection.width(), projection.height());
            }
        }
        self.projection = *projection;
        self.redraw_all();
    }

    fn redraw_all(&mut self) {
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

impl Drop for DynamicLayers {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl TransformSink for DynamicLayers {
    fn apply_transform(&mut self, transform: &ZoomTransform, _ctx: &LayerContext<'_>) {
        self.transform = *transform;
        self.redraw_all();
    }
}
