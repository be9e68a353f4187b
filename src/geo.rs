//! Geographic coordinates and great-circle interpolation.

#[cfg(test)]
#[path = "geo_test.rs"]
mod geo_test;

/// A (latitude, longitude) pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    #[must_use]
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Finite and inside `[-90, 90] x [-180, 180]`.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite() && self.lon.is_finite() && self.lat.abs() <= 90.0 && self.lon.abs() <= 180.0
    }

    /// Unit vector on the sphere pointing at this location.
    #[must_use]
    pub fn to_unit(&self) -> Vec3 {
        let lat = self.lat.to_radians();
        let lon = self.lon.to_radians();
        Vec3::new(lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin())
    }

    /// Location a unit (or any non-zero) vector points at.
    #[must_use]
    pub fn from_unit(v: Vec3) -> Self {
        let n = v.normalize();
        Self { lat: n.z.clamp(-1.0, 1.0).asin().to_degrees(), lon: n.y.atan2(n.x).to_degrees() }
    }
}

impl From<[f64; 2]> for GeoPoint {
    /// `[lat, lon]`, the order callers pass coordinates in.
    fn from(lat_lon: [f64; 2]) -> Self {
        Self::new(lat_lon[0], lat_lon[1])
    }
}

/// Three-component vector used for spherical math.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    #[must_use]
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    #[must_use]
    pub fn dot(self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    #[must_use]
    pub fn cross(self, other: Self) -> Self {
        Self::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    #[must_use]
    pub fn scale(self, s: f64) -> Self {
        Self::new(self.x * s, self.y * s, self.z * s)
    }

    #[must_use]
    pub fn length(self) -> f64 {
        self.dot(self).sqrt()
    }

    /// Unit vector in the same direction; the zero vector stays zero.
    #[must_use]
    pub fn normalize(self) -> Self {
        let len = self.length();
        if len == 0.0 { self } else { self.scale(1.0 / len) }
    }
}

impl std::ops::Add for Vec3 {
    type Output = Self;

    fn add(self, other: Self) -> Self::Output {
        Self::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}

impl std::ops::Sub for Vec3 {
    type Output = Self;

    fn sub(self, other: Self) -> Self::Output {
        Self::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

/// Sample the great circle from `from` to `to` at `steps` equal angular steps.
///
/// Returns `steps + 1` points including both endpoints. Coincident or
/// antipodal endpoints have no unique great circle; those return just the two
/// endpoints.
#[must_use]
pub fn great_circle(from: GeoPoint, to: GeoPoint, steps: u32) -> Vec<GeoPoint> {
    let u = from.to_unit();
    let v = to.to_unit();
    let angle = u.dot(v).clamp(-1.0, 1.0).acos();
    // (u x v) x u: the part of v orthogonal to u, inside the great-circle plane.
    let w = u.cross(v).cross(u);
    if steps == 0 || angle < 1e-12 || w.length() < 1e-12 {
        return vec![from, to];
    }
    let w = w.normalize();

    let n = f64::from(steps);
    let mut points = Vec::with_capacity(steps as usize + 1);
    points.push(from);
    for t in 1..steps {
        let theta = f64::from(t) * angle / n;
        points.push(GeoPoint::from_unit(u.scale(theta.cos()) + w.scale(theta.sin())));
    }
    points.push(to);
    points
}
