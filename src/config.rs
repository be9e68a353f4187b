//! Map configuration, parsed from JSON or built with chained setters.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Serialize};

use crate::camera::Point;
use crate::error::MapError;
use crate::map_layer::MapColors;

pub const DEFAULT_MAP_PATH: &str = "world.json";
pub const DEFAULT_WIDTH: f64 = 960.0;
pub const DEFAULT_HEIGHT: f64 = 500.0;
pub const DEFAULT_BACKGROUND: &str = "#ffffff";
pub const DEFAULT_FOREGROUND: &str = "#cccccc";
pub const DEFAULT_BORDER: &str = "#ffffff";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MapConfig {
    /// Path or URL of the resource descriptor.
    pub map_path: String,
    pub width: f64,
    pub height: f64,
    /// Center offset in pixels.
    pub center_x: f64,
    pub center_y: f64,
    pub background: String,
    pub foreground: String,
    pub border: String,
    /// Tile provider id; `None` disables the tile adapter.
    pub tile_provider: Option<String>,
    /// Ignore zoom/pan gestures. Programmatic zoom still applies.
    pub no_zoom: bool,
    /// Retransform dynamic layers on zoom like the other layers.
    pub dynamic_follows_zoom: bool,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            map_path: DEFAULT_MAP_PATH.to_owned(),
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            center_x: 0.0,
            center_y: 0.0,
            background: DEFAULT_BACKGROUND.to_owned(),
            foreground: DEFAULT_FOREGROUND.to_owned(),
            border: DEFAULT_BORDER.to_owned(),
            tile_provider: None,
            no_zoom: false,
            dynamic_follows_zoom: false,
        }
    }
}

impl MapConfig {
    /// Parse a JSON object; absent fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::Parse`] on malformed JSON or mistyped fields.
    pub fn from_json(json: &str) -> Result<Self, MapError> {
        Ok(serde_json::from_str(json)?)
    }

    #[must_use]
    pub fn with_map_path(mut self, path: impl Into<String>) -> Self {
        self.map_path = path.into();
        self
    }

    #[must_use]
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    #[must_use]
    pub fn with_center(mut self, x: f64, y: f64) -> Self {
        self.center_x = x;
        self.center_y = y;
        self
    }

    #[must_use]
    pub fn with_colors(mut self, background: &str, foreground: &str, border: &str) -> Self {
        self.background = background.to_owned();
        self.foreground = foreground.to_owned();
        self.border = border.to_owned();
        self
    }

    #[must_use]
    pub fn with_tile_provider(mut self, id: Option<&str>) -> Self {
        self.tile_provider = id.map(str::to_owned);
        self
    }

    #[must_use]
    pub fn with_no_zoom(mut self, no_zoom: bool) -> Self {
        self.no_zoom = no_zoom;
        self
    }

    #[must_use]
    pub fn with_dynamic_follows_zoom(mut self, follows: bool) -> Self {
        self.dynamic_follows_zoom = follows;
        self
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.center_x, self.center_y)
    }

    #[must_use]
    pub fn colors(&self) -> MapColors {
        MapColors {
            background: self.background.clone(),
            foreground: self.foreground.clone(),
            border: self.border.clone(),
        }
    }
}
