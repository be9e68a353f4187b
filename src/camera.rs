//! Screen-space geometry and the shared zoom transform.
//!
//! Layers store content in *unprojected* screen space: the coordinates the
//! projection produces before any zoom is applied. `ZoomTransform` maps that
//! space to the pixels the user sees.

#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

/// A point in screen or unprojected screen space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Point,
    pub max: Point,
}

impl Bounds {
    #[must_use]
    pub fn new(min: Point, max: Point) -> Self {
        Self { min, max }
    }

    /// Smallest box containing every point, or `None` for an empty iterator.
    pub fn from_points<I: IntoIterator<Item = Point>>(points: I) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut bounds = Self::new(first, first);
        for p in iter {
            bounds.min.x = bounds.min.x.min(p.x);
            bounds.min.y = bounds.min.y.min(p.y);
            bounds.max.x = bounds.max.x.max(p.x);
            bounds.max.y = bounds.max.y.max(p.y);
        }
        Some(bounds)
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point::new((self.min.x + self.max.x) * 0.5, (self.min.y + self.max.y) * 0.5)
    }

    /// Grow this box to also cover `other`.
    #[must_use]
    pub fn union(self, other: Bounds) -> Bounds {
        Bounds::new(
            Point::new(self.min.x.min(other.min.x), self.min.y.min(other.min.y)),
            Point::new(self.max.x.max(other.max.x), self.max.y.max(other.max.y)),
        )
    }
}

/// The single pan/zoom state shared by every synchronized layer.
///
/// `x` / `y` are the translation in screen pixels, `k` is the scale factor.
/// A screen point is `unprojected * k + (x, y)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomTransform {
    pub x: f64,
    pub y: f64,
    pub k: f64,
}

impl Default for ZoomTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl ZoomTransform {
    pub const IDENTITY: Self = Self { x: 0.0, y: 0.0, k: 1.0 };

    #[must_use]
    pub fn new(x: f64, y: f64, k: f64) -> Self {
        Self { x, y, k }
    }

    /// Map an unprojected point to the screen.
    #[must_use]
    pub fn apply(&self, p: Point) -> Point {
        Point { x: p.x * self.k + self.x, y: p.y * self.k + self.y }
    }

    /// Map a screen point back to unprojected space.
    #[must_use]
    pub fn invert(&self, screen: Point) -> Point {
        Point { x: (screen.x - self.x) / self.k, y: (screen.y - self.y) / self.k }
    }

    #[must_use]
    pub fn invert_x(&self, x: f64) -> f64 {
        (x - self.x) / self.k
    }

    #[must_use]
    pub fn invert_y(&self, y: f64) -> f64 {
        (y - self.y) / self.k
    }

    /// Shift by `(dx, dy)` unprojected units (scaled by `k` on screen).
    #[must_use]
    pub fn translate(&self, dx: f64, dy: f64) -> Self {
        Self { x: self.x + self.k * dx, y: self.y + self.k * dy, k: self.k }
    }

    /// Convert a screen distance to unprojected distance.
    #[must_use]
    pub fn screen_dist_to_unprojected(&self, screen_dist: f64) -> f64 {
        screen_dist / self.k
    }

    #[must_use]
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }
}
