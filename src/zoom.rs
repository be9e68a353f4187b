//! Zoom/transform controller.
//!
//! Owns the one [`ZoomTransform`] every synchronized layer renders with.
//! Gestures update it directly; programmatic zooms (`zoom_to_bounds`,
//! `reset`) animate toward a target over [`ZOOM_TRANSITION_MS`], advanced by
//! [`ZoomController::tick`]. The controller never draws: after each change
//! the owner calls [`ZoomController::publish`] and every registered
//! [`TransformSink`] receives the latest transform.
//!
//! Bounds: the scale always stays within `[MIN_SCALE, MAX_SCALE]`. Gestures
//! also constrain the translation so the viewport never drifts more than
//! [`TRANSLATE_DRIFT`] of the widget size beyond the map edges; programmatic
//! targets keep their translation so a fitted country stays centered.

#[cfg(test)]
#[path = "zoom_test.rs"]
mod zoom_test;

use crate::camera::{Bounds, Point, ZoomTransform};
use crate::consts::{FIT_PADDING, MAX_SCALE, MIN_SCALE, TRANSLATE_DRIFT, WHEEL_DELTA_FACTOR, ZOOM_TRANSITION_MS};
use crate::countries::CountryRegistry;
use crate::ease::cubic_in_out;
use crate::input::WheelDelta;
use crate::projection::GeoProjection;
use crate::schedule::TaskHandle;

/// Shared state a layer may consult while retransforming.
pub struct LayerContext<'a> {
    pub projection: &'a GeoProjection,
    pub countries: Option<&'a CountryRegistry>,
    pub now_ms: f64,
}

/// A layer that follows the shared zoom transform.
pub trait TransformSink {
    /// Re-render or retransform content for `transform`.
    ///
    /// Implementations must not keep an older transform once a newer one arrives.
    fn apply_transform(&mut self, transform: &ZoomTransform, ctx: &LayerContext<'_>);
}

#[derive(Debug)]
struct Transition {
    from: ZoomTransform,
    to: ZoomTransform,
    start_ms: f64,
    duration_ms: f64,
    handle: TaskHandle,
}

#[derive(Debug)]
pub struct ZoomController {
    transform: ZoomTransform,
    width: f64,
    height: f64,
    enabled: bool,
    transition: Option<Transition>,
    dirty: bool,
}

impl ZoomController {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            transform: ZoomTransform::IDENTITY,
            width: width.max(1.0),
            height: height.max(1.0),
            enabled: true,
            transition: None,
            dirty: false,
        }
    }

    #[must_use]
    pub fn transform(&self) -> ZoomTransform {
        self.transform
    }

    /// Gesture zoom/pan on or off. Programmatic zooms always apply.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.transition.as_ref().is_some_and(|t| !t.handle.is_cancelled())
    }

    /// Update the viewport and pull the transform back inside the new bounds.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width.max(1.0);
        self.height = height.max(1.0);
        let constrained = self.constrain(self.transform);
        self.set(constrained);
    }

    // --- Constraints ---

    /// Clamp the scale, then shift the translation back inside the drift extent.
    #[must_use]
    pub fn constrain(&self, t: ZoomTransform) -> ZoomTransform {
        let k = t.k.clamp(MIN_SCALE, MAX_SCALE);
        let t = ZoomTransform::new(t.x, t.y, k);

        let (w, h) = (self.width, self.height);
        let (ext_x0, ext_y0) = (-TRANSLATE_DRIFT * w, -TRANSLATE_DRIFT * h);
        let (ext_x1, ext_y1) = ((1.0 + TRANSLATE_DRIFT) * w, (1.0 + TRANSLATE_DRIFT) * h);

        let dx0 = t.invert_x(0.0) - ext_x0;
        let dx1 = t.invert_x(w) - ext_x1;
        let dy0 = t.invert_y(0.0) - ext_y0;
        let dy1 = t.invert_y(h) - ext_y1;
        t.translate(extent_shift(dx0, dx1), extent_shift(dy0, dy1))
    }

    /// Fit `bounds` into the viewport: `k = clamp(0.8 / max(dx/W, dy/H))`,
    /// centered on the bounds. `None` for non-finite bounds.
    ///
    /// Only the scale is clamped; the translation is left outside the drift
    /// extent when needed so the bounds center lands on the viewport center.
    #[must_use]
    pub fn target_for_bounds(&self, bounds: &Bounds) -> Option<ZoomTransform> {
        let (dx, dy) = (bounds.width(), bounds.height());
        let c = bounds.center();
        if !(dx.is_finite() && dy.is_finite() && c.x.is_finite() && c.y.is_finite()) {
            return None;
        }
        let k = (FIT_PADDING / (dx / self.width).max(dy / self.height)).clamp(MIN_SCALE, MAX_SCALE);
        Some(ZoomTransform::new(self.width * 0.5 - k * c.x, self.height * 0.5 - k * c.y, k))
    }

    // --- Gestures ---

    /// Drag pan by a screen delta. Ignored while zoom is disabled.
    pub fn pan_by(&mut self, dx: f64, dy: f64) -> bool {
        if !self.enabled {
            return false;
        }
        self.interrupt();
        let t = self.transform;
        let next = self.constrain(ZoomTransform::new(t.x + dx, t.y + dy, t.k));
        self.set(next)
    }

    /// Multiply the scale by `factor`, keeping the point under `anchor` fixed.
    /// Ignored while zoom is disabled.
    pub fn zoom_at(&mut self, anchor: Point, factor: f64) -> bool {
        if !self.enabled || !factor.is_finite() || factor <= 0.0 {
            return false;
        }
        self.interrupt();
        let t = self.transform;
        let pinned = t.invert(anchor);
        let k = (t.k * factor).clamp(MIN_SCALE, MAX_SCALE);
        let next = self.constrain(ZoomTransform::new(anchor.x - pinned.x * k, anchor.y - pinned.y * k, k));
        self.set(next)
    }

    /// Wheel zoom around the pointer: `k' = k * 2^(-dy * 0.002)`.
    pub fn wheel(&mut self, anchor: Point, delta: WheelDelta) -> bool {
        self.zoom_at(anchor, (-delta.dy * WHEEL_DELTA_FACTOR).exp2())
    }

    // --- Programmatic ---

    /// Animate to the transform that fits `bounds`. `None` if the bounds are unusable.
    pub fn zoom_to_bounds(&mut self, bounds: &Bounds, now_ms: f64) -> Option<TaskHandle> {
        let target = self.target_for_bounds(bounds)?;
        Some(self.animate_to(target, now_ms))
    }

    /// Animate back to identity.
    pub fn reset(&mut self, now_ms: f64) -> TaskHandle {
        self.animate_to(ZoomTransform::IDENTITY, now_ms)
    }

    /// Start a transition from the current transform, replacing any in flight.
    ///
    /// The target scale is clamped but its translation is taken as given;
    /// the drift extent applies to gestures only.
    pub fn animate_to(&mut self, target: ZoomTransform, now_ms: f64) -> TaskHandle {
        self.interrupt();
        let handle = TaskHandle::new();
        self.transition = Some(Transition {
            from: self.transform,
            to: ZoomTransform::new(target.x, target.y, target.k.clamp(MIN_SCALE, MAX_SCALE)),
            start_ms: now_ms,
            duration_ms: ZOOM_TRANSITION_MS,
            handle: handle.clone(),
        });
        handle
    }

    /// Jump straight to `target` (constrained).
    pub fn set_transform(&mut self, target: ZoomTransform) -> bool {
        self.interrupt();
        let next = self.constrain(target);
        self.set(next)
    }

    /// Cancel any transition in flight.
    pub fn interrupt(&mut self) {
        if let Some(t) = self.transition.take() {
            t.handle.cancel();
        }
    }

    /// Advance the transition in flight. Returns whether the transform changed.
    pub fn tick(&mut self, now_ms: f64) -> bool {
        let Some(tr) = self.transition.as_ref() else {
            return false;
        };
        if tr.handle.is_cancelled() {
            self.transition = None;
            return false;
        }
        let t = if tr.duration_ms > 0.0 { (now_ms - tr.start_ms) / tr.duration_ms } else { 1.0 };
        if t >= 1.0 {
            let to = tr.to;
            self.transition = None;
            return self.set(to);
        }
        let next = interpolate(tr.from, tr.to, cubic_in_out(t), self.width, self.height);
        self.set(next)
    }

    // --- Distribution ---

    /// Whether the transform changed since the last `publish`.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Hand the current transform to every sink.
    pub fn publish(&mut self, sinks: &mut [&mut dyn TransformSink], ctx: &LayerContext<'_>) {
        for sink in sinks.iter_mut() {
            sink.apply_transform(&self.transform, ctx);
        }
        self.dirty = false;
    }

    fn set(&mut self, next: ZoomTransform) -> bool {
        if next == self.transform {
            return false;
        }
        self.transform = next;
        self.dirty = true;
        true
    }
}

/// Shift along one axis to bring the viewport back inside the extent.
///
/// If the viewport is wider than the extent it is centered; otherwise it is
/// pushed back from whichever edge it crossed.
fn extent_shift(d0: f64, d1: f64) -> f64 {
    if d1 > d0 {
        return (d0 + d1) * 0.5;
    }
    let low = d0.min(0.0);
    if low != 0.0 { low } else { d1.max(0.0) }
}

/// Interpolate the viewport-center point linearly and the scale geometrically.
fn interpolate(from: ZoomTransform, to: ZoomTransform, s: f64, width: f64, height: f64) -> ZoomTransform {
    let mid = Point::new(width * 0.5, height * 0.5);
    let c0 = from.invert(mid);
    let c1 = to.invert(mid);
    let k = from.k * (to.k / from.k).powf(s);
    let c = Point::new(c0.x + (c1.x - c0.x) * s, c0.y + (c1.y - c0.y) * s);
    ZoomTransform::new(mid.x - c.x * k, mid.y - c.y * k, k)
}
