//! `MapCore`: owns every component, routes input, and drives time.
//!
//! The core is headless. Drawing goes through the [`SurfaceFactory`] handed
//! in at construction, time comes from the host through [`MapCore::advance`],
//! and input arrives as screen-space pointer events. Host bindings (see
//! `crate::web`) wrap this type; tests drive it directly with
//! [`crate::surface::RecordingFactory`].

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use std::path::Path;

use crate::camera::{Point, ZoomTransform};
use crate::clustering::{ClusteringRegistry, Groups};
use crate::config::MapConfig;
use crate::consts::DOUBLE_CLICK_FACTOR;
use crate::countries::{CountryId, CountryRegistry};
use crate::dynamic_layer::DynamicLayers;
use crate::error::MapError;
use crate::input::{Button, Gesture, InputState, WheelDelta};
use crate::map_layer::{MapLayer, ZoomRequest};
use crate::projection::GeoProjection;
use crate::static_layer::StaticLayers;
use crate::surface::{self, SurfaceFactory};
use crate::tiles::{TileAdapter, TileRenderer};
use crate::topology::{self, Descriptor};
use crate::touch::TouchLayer;
use crate::zoom::{LayerContext, TransformSink, ZoomController};

/// Events reported from input handlers for the host to act on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    CountryClicked(String),
    CountryHovered(String),
    CountryLeft(String),
    /// A touch element took the click.
    TouchClicked(String),
    /// The zoom transform changed and every synchronized layer was updated.
    TransformChanged,
}

/// Caller callback receiving a country name.
pub type CountryCallback = Box<dyn FnMut(&str)>;

#[derive(Default)]
struct CountryCallbacks {
    click: Option<CountryCallback>,
    hover: Option<CountryCallback>,
    leave: Option<CountryCallback>,
}

pub struct MapCore {
    config: MapConfig,
    factory: Box<dyn SurfaceFactory>,
    projection: GeoProjection,
    countries: Option<CountryRegistry>,
    zoom: ZoomController,
    map: MapLayer,
    statics: StaticLayers,
    dynamics: DynamicLayers,
    touch: TouchLayer,
    tile_renderer: Option<Box<dyn TileRenderer>>,
    tiles: Option<TileAdapter>,
    clustering: ClusteringRegistry,
    input: InputState,
    callbacks: CountryCallbacks,
    now_ms: f64,
    disposed: bool,
}

impl MapCore {
    /// Create the component. Nothing is loaded until one of the `build` calls.
    #[must_use]
    pub fn new(config: MapConfig, mut factory: Box<dyn SurfaceFactory>) -> Self {
        let projection = GeoProjection::new(config.width, config.height, config.center());
        let mut map = MapLayer::new(surface::create_or_inert(factory.as_mut(), "map"), config.colors());
        map.resize(projection.width(), projection.height());
        let mut zoom = ZoomController::new(projection.width(), projection.height());
        zoom.set_enabled(!config.no_zoom);

        Self {
            factory,
            projection,
            countries: None,
            zoom,
            map,
            statics: StaticLayers::new(projection),
            dynamics: DynamicLayers::new(projection),
            touch: TouchLayer::new(projection),
            tile_renderer: None,
            tiles: None,
            clustering: ClusteringRegistry::new(),
            input: InputState::default(),
            callbacks: CountryCallbacks::default(),
            now_ms: 0.0,
            disposed: false,
            config,
        }
    }

    // --- Build ---

    /// Load countries from a descriptor JSON string.
    ///
    /// `on_ready` always runs, with the outcome, before this returns.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::Parse`] or [`MapError::Topology`] when the
    /// descriptor cannot be decoded; the map stays unbuilt.
    pub fn build<F>(&mut self, json: &str, on_ready: F) -> Result<(), MapError>
    where
        F: FnOnce(Result<(), &MapError>),
    {
        let result = self.install(json);
        report(&result, on_ready);
        result
    }

    /// Read the descriptor from a file, then [`Self::build`].
    ///
    /// # Errors
    ///
    /// Returns [`MapError::Io`] if the file cannot be read, otherwise as [`Self::build`].
    pub fn build_from_path<F>(&mut self, path: impl AsRef<Path>, on_ready: F) -> Result<(), MapError>
    where
        F: FnOnce(Result<(), &MapError>),
    {
        match std::fs::read_to_string(path) {
            Ok(json) => self.build(&json, on_ready),
            Err(e) => {
                let result = Err(MapError::from(e));
                report(&result, on_ready);
                result
            }
        }
    }

    /// Build from the configured `map_path`.
    ///
    /// # Errors
    ///
    /// As [`Self::build_from_path`].
    pub fn load<F>(&mut self, on_ready: F) -> Result<(), MapError>
    where
        F: FnOnce(Result<(), &MapError>),
    {
        let path = self.config.map_path.clone();
        self.build_from_path(path, on_ready)
    }

    fn install(&mut self, json: &str) -> Result<(), MapError> {
        let descriptor = Descriptor::from_json(json)?;
        let records = topology::decode(&descriptor)?;
        let mut registry = CountryRegistry::from_records(records, &self.projection);
        self.clustering.apply_all(&mut registry);
        tracing::info!(countries = registry.len(), "map built");
        self.countries = Some(registry);
        self.attach_tiles();
        self.publish();
        Ok(())
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.countries.is_some()
    }

    // --- Queries ---

    /// The country registry, once built.
    #[must_use]
    pub fn countries(&self) -> Option<&CountryRegistry> {
        self.countries.as_ref()
    }

    #[must_use]
    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    #[must_use]
    pub fn projection(&self) -> &GeoProjection {
        &self.projection
    }

    #[must_use]
    pub fn transform(&self) -> ZoomTransform {
        self.zoom.transform()
    }

    #[must_use]
    pub fn zoom(&self) -> &ZoomController {
        &self.zoom
    }

    #[must_use]
    pub fn map_layer(&self) -> &MapLayer {
        &self.map
    }

    // --- Layers ---

    pub fn add_static_layer(&mut self, id: &str) -> bool {
        self.statics.add(id, self.factory.as_mut())
    }

    #[must_use]
    pub fn static_layers(&self) -> &StaticLayers {
        &self.statics
    }

    pub fn static_layers_mut(&mut self) -> &mut StaticLayers {
        &mut self.statics
    }

    pub fn add_dynamic_layer(&mut self, id: &str) -> bool {
        self.dynamics.add(id, self.factory.as_mut())
    }

    #[must_use]
    pub fn dynamic_layers(&self) -> &DynamicLayers {
        &self.dynamics
    }

    pub fn dynamic_layers_mut(&mut self) -> &mut DynamicLayers {
        &mut self.dynamics
    }

    #[must_use]
    pub fn touch(&self) -> &TouchLayer {
        &self.touch
    }

    pub fn touch_mut(&mut self) -> &mut TouchLayer {
        &mut self.touch
    }

    /// Hand over the external tile renderer. Attached now if the map is built.
    pub fn set_tile_renderer(&mut self, renderer: Box<dyn TileRenderer>) {
        self.tiles = None;
        self.tile_renderer = Some(renderer);
        if self.is_ready() {
            self.attach_tiles();
        }
    }

    #[must_use]
    pub fn tiles(&self) -> Option<&TileAdapter> {
        self.tiles.as_ref()
    }

    fn attach_tiles(&mut self) {
        let Some(provider) = self.config.tile_provider.as_deref() else {
            return;
        };
        let Some(renderer) = self.tile_renderer.take() else {
            return;
        };
        self.tiles = TileAdapter::new(provider, renderer);
        if let Some(tiles) = self.tiles.as_mut() {
            tiles.attach(&self.zoom.transform(), &self.projection);
        }
    }

    // --- Clustering ---

    pub fn add_clustering(&mut self, id: &str, groups: Groups) -> bool {
        let added = self.clustering.add(id, groups, self.countries.as_mut());
        if added {
            self.render_map();
        }
        added
    }

    pub fn remove_clustering(&mut self, id: &str) -> bool {
        let removed = self.clustering.remove(id, self.countries.as_mut());
        if removed {
            self.render_map();
        }
        removed
    }

    #[must_use]
    pub fn clustering(&self) -> &ClusteringRegistry {
        &self.clustering
    }

    // --- Map styling ---

    /// Fade the map layer; `level` in `[0, 1]`.
    pub fn dim(&mut self, level: f64) {
        self.map.dim(level);
        self.render_map();
    }

    /// Highlight a country by name, or clear all highlights with `None`.
    /// Unknown names return `false`.
    pub fn highlight(&mut self, name: Option<&str>, color: Option<&str>, duration_ms: Option<f64>) -> bool {
        let id = match name {
            Some(name) => match self.country_id(name) {
                Some(id) => Some(id),
                None => return false,
            },
            None => None,
        };
        self.map.highlight(id, color, duration_ms, self.now_ms);
        self.render_map();
        true
    }

    pub fn set_selector_fill(&mut self, selector: &str, color: &str) {
        self.map.set_selector_fill(selector, color);
        self.render_map();
    }

    // --- Zoom ---

    /// Focus and animate to a country. Unknown names return `false`.
    pub fn zoom_to_country(&mut self, name: &str) -> bool {
        let Some(countries) = self.countries.as_ref() else {
            return false;
        };
        let Some(bounds) = countries.id(name).and_then(|id| self.map.focus(id, countries)) else {
            return false;
        };
        self.zoom.zoom_to_bounds(&bounds, self.now_ms).is_some()
    }

    /// Clear focus and animate back to identity.
    pub fn reset_zoom(&mut self) {
        self.map.clear_focus();
        self.zoom.reset(self.now_ms);
    }

    // --- Viewport ---

    pub fn resize(&mut self, width: f64, height: f64) {
        self.config.width = width;
        self.config.height = height;
        self.reproject();
    }

    pub fn set_center(&mut self, x: f64, y: f64) {
        self.config.center_x = x;
        self.config.center_y = y;
        self.reproject();
    }

    /// Rebuild the projection and bring every component into its space.
    fn reproject(&mut self) {
        let projection = GeoProjection::new(self.config.width, self.config.height, self.config.center());
        if let Some(countries) = self.countries.as_mut() {
            countries.reproject(&projection);
        }
        self.statics.rescale(&projection);
        self.dynamics.rescale(&projection);
        self.touch.rescale(&projection);
        self.map.resize(projection.width(), projection.height());
        self.zoom.resize(projection.width(), projection.height());
        self.projection = projection;
        self.publish();
    }

    // --- Callbacks ---

    pub fn on_country_click(&mut self, callback: impl FnMut(&str) + 'static) {
        self.callbacks.click = Some(Box::new(callback));
    }

    pub fn on_country_hover(&mut self, callback: impl FnMut(&str) + 'static) {
        self.callbacks.hover = Some(Box::new(callback));
    }

    pub fn on_country_leave(&mut self, callback: impl FnMut(&str) + 'static) {
        self.callbacks.leave = Some(Box::new(callback));
    }

    // --- Input handlers ---

    pub fn on_pointer_down(&mut self, screen_pt: Point, button: Button) {
        self.input.press(screen_pt, button);
    }

    pub fn on_pointer_move(&mut self, screen_pt: Point) -> Vec<Action> {
        match self.input.motion(screen_pt) {
            Gesture::Hover(p) => self.hover_at(p),
            Gesture::Pan { dx, dy } => self.pan(dx, dy),
            Gesture::None | Gesture::Click(_) => Vec::new(),
        }
    }

    pub fn on_pointer_up(&mut self, screen_pt: Point) -> Vec<Action> {
        match self.input.release(screen_pt) {
            Gesture::Click(p) => self.click_at(p),
            Gesture::Pan { dx, dy } => self.pan(dx, dy),
            Gesture::None | Gesture::Hover(_) => Vec::new(),
        }
    }

    pub fn on_pointer_leave(&mut self) -> Vec<Action> {
        self.input.cancel();
        self.touch.pointer_leave();
        self.set_hover(None)
    }

    /// Wheel zoom around the pointer.
    pub fn on_wheel(&mut self, screen_pt: Point, delta: WheelDelta) -> Vec<Action> {
        if self.zoom.wheel(screen_pt, delta) {
            self.publish();
            return vec![Action::TransformChanged];
        }
        Vec::new()
    }

    /// Double click zooms in around the pointer.
    pub fn on_double_click(&mut self, screen_pt: Point) -> Vec<Action> {
        if self.zoom.zoom_at(screen_pt, DOUBLE_CLICK_FACTOR) {
            self.publish();
            return vec![Action::TransformChanged];
        }
        Vec::new()
    }

    fn pan(&mut self, dx: f64, dy: f64) -> Vec<Action> {
        if self.zoom.pan_by(dx, dy) {
            self.publish();
            return vec![Action::TransformChanged];
        }
        Vec::new()
    }

    fn hover_at(&mut self, screen_pt: Point) -> Vec<Action> {
        let p = self.zoom.transform().invert(screen_pt);
        if self.touch.pointer_move(p) {
            return self.set_hover(None);
        }
        let hit = self.countries.as_ref().and_then(|c| c.country_at(p));
        self.set_hover(hit)
    }

    fn set_hover(&mut self, hit: Option<CountryId>) -> Vec<Action> {
        let Some(change) = self.map.hover(hit) else {
            return Vec::new();
        };
        let mut actions = Vec::new();
        if let Some(name) = change.left.and_then(|id| self.country_name(id)) {
            if let Some(cb) = self.callbacks.leave.as_mut() {
                cb(&name);
            }
            actions.push(Action::CountryLeft(name));
        }
        if let Some(name) = change.entered.and_then(|id| self.country_name(id)) {
            if let Some(cb) = self.callbacks.hover.as_mut() {
                cb(&name);
            }
            actions.push(Action::CountryHovered(name));
        }
        self.render_map();
        actions
    }

    fn click_at(&mut self, screen_pt: Point) -> Vec<Action> {
        let p = self.zoom.transform().invert(screen_pt);
        if let Some(id) = self.touch.hit_test(p).map(str::to_owned) {
            self.touch.click(p);
            return vec![Action::TouchClicked(id)];
        }
        let Some(countries) = self.countries.as_ref() else {
            return Vec::new();
        };
        let hit = countries.country_at(p);
        match self.map.click(hit, countries) {
            ZoomRequest::ToBounds(bounds) => {
                self.zoom.zoom_to_bounds(&bounds, self.now_ms);
            }
            ZoomRequest::Reset => {
                self.zoom.reset(self.now_ms);
            }
        }
        let Some(name) = hit.and_then(|id| self.country_name(id)) else {
            return Vec::new();
        };
        if let Some(cb) = self.callbacks.click.as_mut() {
            cb(&name);
        }
        vec![Action::CountryClicked(name)]
    }

    // --- Time ---

    /// Advance transitions, highlight expiries and dynamic content to `now_ms`.
    /// Returns whether anything changed on screen. No-op after [`Self::dispose`].
    pub fn advance(&mut self, now_ms: f64) -> bool {
        if self.disposed {
            return false;
        }
        self.now_ms = now_ms;
        let mut changed = self.zoom.tick(now_ms);
        if self.zoom.is_dirty() {
            self.publish();
        }
        if self.map.expire(now_ms) {
            self.render_map();
            changed = true;
        }
        changed |= self.dynamics.advance(now_ms);
        changed
    }

    /// Cancel every timer and stop reacting to time.
    pub fn dispose(&mut self) {
        self.zoom.interrupt();
        self.dynamics.dispose();
        self.map.dispose();
        self.disposed = true;
        tracing::debug!("map disposed");
    }

    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    // --- Internals ---

    /// Push the current transform to every synchronized layer.
    fn publish(&mut self) {
        let ctx = LayerContext { projection: &self.projection, countries: self.countries.as_ref(), now_ms: self.now_ms };
        let mut sinks: Vec<&mut dyn TransformSink> = Vec::with_capacity(5);
        sinks.push(&mut self.map);
        sinks.push(&mut self.statics);
        sinks.push(&mut self.touch);
        if self.config.dynamic_follows_zoom {
            sinks.push(&mut self.dynamics);
        }
        if let Some(tiles) = self.tiles.as_mut() {
            sinks.push(tiles);
        }
        self.zoom.publish(&mut sinks, &ctx);
    }

    fn render_map(&mut self) {
        if let Some(countries) = self.countries.as_ref() {
            self.map.render(countries);
        }
    }

    fn country_id(&self, name: &str) -> Option<CountryId> {
        self.countries.as_ref()?.id(name)
    }

    fn country_name(&self, id: CountryId) -> Option<String> {
        self.countries.as_ref()?.name(id).map(str::to_owned)
    }
}

fn report<F>(result: &Result<(), MapError>, on_ready: F)
where
    F: FnOnce(Result<(), &MapError>),
{
    match result {
        Ok(()) => on_ready(Ok(())),
        Err(e) => {
            tracing::warn!(error = %e, "map build failed");
            on_ready(Err(e));
        }
    }
}
