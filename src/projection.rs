//! Mercator projection between geographic and unprojected screen space.
//!
//! The scale is fixed to `width / 2π` so the full longitude range spans the
//! widget width. The projection origin sits at the widget center shifted by
//! the user-settable center offset. A new `GeoProjection` is built whenever
//! the widget dimensions or the offset change; nothing mutates one in place.

#[cfg(test)]
#[path = "projection_test.rs"]
mod projection_test;

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, TAU};

use crate::camera::Point;
use crate::consts::MAX_MERCATOR_LAT;
use crate::geo::GeoPoint;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoProjection {
    width: f64,
    height: f64,
    center: Point,
    scale: f64,
    origin: Point,
}

impl GeoProjection {
    /// Build the projection for a widget of `width` x `height` with the given center offset.
    #[must_use]
    pub fn new(width: f64, height: f64, center: Point) -> Self {
        let width = width.max(1.0);
        let height = height.max(1.0);
        Self {
            width,
            height,
            center,
            scale: width / TAU,
            origin: Point::new(width * 0.5 + center.x, height * 0.5 + center.y),
        }
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.height
    }

    #[must_use]
    pub fn center(&self) -> Point {
        self.center
    }

    /// Pixels per radian.
    #[must_use]
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Forward mapping. Latitudes beyond the Mercator limit are clamped.
    #[must_use]
    pub fn project(&self, geo: GeoPoint) -> Point {
        let lambda = geo.lon.to_radians();
        let phi = geo.lat.clamp(-MAX_MERCATOR_LAT, MAX_MERCATOR_LAT).to_radians();
        Point::new(
            self.origin.x + self.scale * lambda,
            self.origin.y - self.scale * (FRAC_PI_4 + phi * 0.5).tan().ln(),
        )
    }

    /// Project a `(lon, lat)` pair as stored in topology rings.
    #[must_use]
    pub fn project_lon_lat(&self, lon_lat: [f64; 2]) -> Point {
        self.project(GeoPoint::new(lon_lat[1], lon_lat[0]))
    }

    /// Inverse mapping.
    #[must_use]
    pub fn invert(&self, p: Point) -> GeoPoint {
        let lambda = (p.x - self.origin.x) / self.scale;
        let phi = 2.0 * ((self.origin.y - p.y) / self.scale).exp().atan() - FRAC_PI_2;
        GeoPoint::new(phi.to_degrees(), lambda.to_degrees())
    }

    /// Move a point recorded under `old` into this projection's space.
    ///
    /// Both projections are linear in the same Mercator coordinates, so the
    /// mapping is a uniform scale about the origins; no geographic source
    /// coordinates are needed.
    #[must_use]
    pub fn rescale_from(&self, old: &GeoProjection, p: Point) -> Point {
        let ratio = self.rescale_ratio(old);
        Point::new(
            self.origin.x + (p.x - old.origin.x) * ratio,
            self.origin.y + (p.y - old.origin.y) * ratio,
        )
    }

    /// Linear size coefficient between `old` and this projection.
    #[must_use]
    pub fn rescale_ratio(&self, old: &GeoProjection) -> f64 {
        self.scale / old.scale
    }
}
