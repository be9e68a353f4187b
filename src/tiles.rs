//! Tile adapter: keeps an external raster tile renderer in step with the map.
//!
//! The tile library works in logarithmic zoom levels centered on a lat/lon,
//! the map in a linear scale `k` over unprojected pixels. The adapter converts
//! one into the other on every transform change.

#[cfg(test)]
#[path = "tiles_test.rs"]
mod tiles_test;

use crate::camera::{Point, ZoomTransform};
use crate::consts::TILE_ZOOM_CALIBRATION;
use crate::geo::GeoPoint;
use crate::projection::GeoProjection;
use crate::zoom::{LayerContext, TransformSink};

/// Known raster tile sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileProvider {
    Osm,
    CartoLight,
    CartoDark,
    EsriImagery,
}

impl TileProvider {
    /// Look up a provider by its configuration id.
    #[must_use]
    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "osm" => Some(Self::Osm),
            "carto-light" => Some(Self::CartoLight),
            "carto-dark" => Some(Self::CartoDark),
            "esri-imagery" => Some(Self::EsriImagery),
            _ => None,
        }
    }

    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            Self::Osm => "osm",
            Self::CartoLight => "carto-light",
            Self::CartoDark => "carto-dark",
            Self::EsriImagery => "esri-imagery",
        }
    }

    /// `{z}/{x}/{y}` URL template.
    #[must_use]
    pub fn url_template(self) -> &'static str {
        match self {
            Self::Osm => "https://tile.openstreetmap.org/{z}/{x}/{y}.png",
            Self::CartoLight => "https://basemaps.cartocdn.com/light_all/{z}/{x}/{y}.png",
            Self::CartoDark => "https://basemaps.cartocdn.com/dark_all/{z}/{x}/{y}.png",
            Self::EsriImagery => {
                "https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/{z}/{y}/{x}"
            }
        }
    }

    #[must_use]
    pub fn attribution(self) -> &'static str {
        match self {
            Self::Osm => "© OpenStreetMap contributors",
            Self::CartoLight | Self::CartoDark => "© OpenStreetMap contributors © CARTO",
            Self::EsriImagery => "Tiles © Esri",
        }
    }

    /// Everything the renderer needs to fetch and credit this provider's tiles.
    #[must_use]
    pub fn source(self) -> TileSource {
        TileSource { provider: self, url_template: self.url_template(), attribution: self.attribution() }
    }
}

/// Tile source handed to the renderer on attach.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileSource {
    pub provider: TileProvider,
    pub url_template: &'static str,
    /// Credit line the renderer must display.
    pub attribution: &'static str,
}

/// The external tile library, seen only through these two calls.
pub trait TileRenderer {
    fn set_source(&mut self, source: &TileSource);
    fn set_view(&mut self, center: GeoPoint, zoom: f64);
}

/// Tile zoom level for linear scale `k` on a widget `width` px wide.
#[must_use]
pub fn tile_zoom(k: f64, width: f64) -> f64 {
    (TILE_ZOOM_CALIBRATION * k * width).log2()
}

/// Geographic point under the viewport center.
#[must_use]
pub fn view_center(transform: &ZoomTransform, projection: &GeoProjection) -> GeoPoint {
    let mid = Point::new(projection.width() * 0.5, projection.height() * 0.5);
    projection.invert(transform.invert(mid))
}

pub struct TileAdapter {
    provider: TileProvider,
    renderer: Box<dyn TileRenderer>,
}

impl TileAdapter {
    /// `None` (logged) when `provider_id` is not a known provider.
    #[must_use]
    pub fn new(provider_id: &str, renderer: Box<dyn TileRenderer>) -> Option<Self> {
        let Some(provider) = TileProvider::from_id(provider_id) else {
            tracing::warn!(provider = provider_id, "unknown tile provider; tiles disabled");
            return None;
        };
        Some(Self { provider, renderer })
    }

    #[must_use]
    pub fn provider(&self) -> TileProvider {
        self.provider
    }

    /// Point the renderer at the provider and the initial view.
    pub fn attach(&mut self, transform: &ZoomTransform, projection: &GeoProjection) {
        self.renderer.set_source(&self.provider.source());
        self.sync(transform, projection);
    }

    fn sync(&mut self, transform: &ZoomTransform, projection: &GeoProjection) {
        let zoom = tile_zoom(transform.k, projection.width());
        self.renderer.set_view(view_center(transform, projection), zoom);
    }
}

impl TransformSink for TileAdapter {
    fn apply_transform(&mut self, transform: &ZoomTransform, ctx: &LayerContext<'_>) {
        self.sync(transform, ctx.projection);
    }
}
