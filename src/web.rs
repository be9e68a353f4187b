//! Browser bindings: canvas-backed surfaces, resource fetch, and the clock.
//!
//! Compiled only with the `web` feature. Every layer gets its own `<canvas>`
//! stacked inside one container element, in creation order, so the map sits
//! under static, dynamic and touch content.

use std::f64::consts::TAU;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, Document, Element, HtmlCanvasElement};

use crate::camera::{Point, ZoomTransform};
use crate::error::MapError;
use crate::surface::{Surface, SurfaceFactory};

/// Milliseconds since the epoch from the host clock. Feed this to `advance`.
#[must_use]
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

/// Fetch the map resource descriptor as text.
///
/// # Errors
///
/// Returns [`MapError::Fetch`] on network failure or a non-2xx status.
pub async fn fetch_descriptor(url: &str) -> Result<String, MapError> {
    let resp = gloo_net::http::Request::get(url)
        .send()
        .await
        .map_err(|e| MapError::Fetch(e.to_string()))?;
    if !(200..300).contains(&resp.status()) {
        return Err(MapError::Fetch(format!("{url}: status {}", resp.status())));
    }
    resp.text().await.map_err(|e| MapError::Fetch(e.to_string()))
}

fn js_error(err: &JsValue) -> String {
    err.as_string().unwrap_or_else(|| format!("{err:?}"))
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn px(v: f64) -> u32 {
    if v.is_finite() { v.max(0.0).round() as u32 } else { 0 }
}

/// [`Surface`] over a `CanvasRenderingContext2d`.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    /// # Errors
    ///
    /// Returns [`MapError::SurfaceUnavailable`] if the canvas has no 2D context.
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, MapError> {
        let ctx = canvas
            .get_context("2d")
            .map_err(|e| MapError::SurfaceUnavailable(js_error(&e)))?
            .ok_or_else(|| MapError::SurfaceUnavailable("no 2d context".to_owned()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| MapError::SurfaceUnavailable("context is not 2d".to_owned()))?;
        Ok(Self { canvas, ctx })
    }

    #[must_use]
    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }
}

impl Surface for CanvasSurface {
    fn resize(&mut self, width: f64, height: f64) {
        self.canvas.set_width(px(width));
        self.canvas.set_height(px(height));
    }

    fn clear(&mut self) {
        if let Err(e) = self.ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0) {
            tracing::warn!(error = %js_error(&e), "canvas reset transform failed");
        }
        let (w, h) = (f64::from(self.canvas.width()), f64::from(self.canvas.height()));
        self.ctx.clear_rect(0.0, 0.0, w, h);
    }

    fn save(&mut self) {
        self.ctx.save();
    }

    fn restore(&mut self) {
        self.ctx.restore();
    }

    fn set_transform(&mut self, t: &ZoomTransform) {
        if let Err(e) = self.ctx.set_transform(t.k, 0.0, 0.0, t.k, t.x, t.y) {
            tracing::warn!(error = %js_error(&e), "canvas set_transform failed");
        }
    }

    fn set_alpha(&mut self, alpha: f64) {
        self.ctx.set_global_alpha(alpha);
    }

    fn begin_path(&mut self) {
        self.ctx.begin_path();
    }

    fn move_to(&mut self, p: Point) {
        self.ctx.move_to(p.x, p.y);
    }

    fn line_to(&mut self, p: Point) {
        self.ctx.line_to(p.x, p.y);
    }

    fn close_path(&mut self) {
        self.ctx.close_path();
    }

    fn arc(&mut self, center: Point, radius: f64) {
        self.ctx.move_to(center.x + radius, center.y);
        if let Err(e) = self.ctx.arc(center.x, center.y, radius.max(0.0), 0.0, TAU) {
            tracing::warn!(error = %js_error(&e), "canvas arc failed");
        }
    }

    fn fill(&mut self, color: &str) {
        self.ctx.set_fill_style_str(color);
        self.ctx.fill();
    }

    fn stroke(&mut self, color: &str, width: f64) {
        self.ctx.set_stroke_style_str(color);
        self.ctx.set_line_width(width);
        self.ctx.stroke();
    }
}

/// [`SurfaceFactory`] that appends one absolutely positioned canvas per layer
/// to a container element.
pub struct CanvasStack {
    document: Document,
    container: Element,
    width: f64,
    height: f64,
}

impl CanvasStack {
    /// Stack canvases inside the element with id `container_id`.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::SurfaceUnavailable`] without a document or container.
    pub fn new(container_id: &str, width: f64, height: f64) -> Result<Self, MapError> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| MapError::SurfaceUnavailable("no document".to_owned()))?;
        let container = document
            .get_element_by_id(container_id)
            .ok_or_else(|| MapError::SurfaceUnavailable(format!("no element #{container_id}")))?;
        Ok(Self { document, container, width, height })
    }
}

impl SurfaceFactory for CanvasStack {
    fn create(&mut self, name: &str) -> Result<Box<dyn Surface>, MapError> {
        let canvas = self
            .document
            .create_element("canvas")
            .map_err(|e| MapError::SurfaceUnavailable(js_error(&e)))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| MapError::SurfaceUnavailable("element is not a canvas".to_owned()))?;
        canvas.set_width(px(self.width));
        canvas.set_height(px(self.height));
        canvas
            .set_attribute("data-layer", name)
            .and_then(|()| canvas.set_attribute("style", "position:absolute;left:0;top:0;pointer-events:none"))
            .map_err(|e| MapError::SurfaceUnavailable(js_error(&e)))?;
        self.container
            .append_child(&canvas)
            .map_err(|e| MapError::SurfaceUnavailable(js_error(&e)))?;
        tracing::debug!(layer = name, "canvas created");
        Ok(Box::new(CanvasSurface::new(canvas)?))
    }
}
