//! Hit-testing: ray-casting containment and circular hit regions.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::camera::Point;

/// Rings with less absolute area than this never contain anything.
const MIN_RING_AREA: f64 = 1e-12;

/// Number of ring edges crossed by a ray cast from `p` toward +x.
#[must_use]
pub fn ring_crossings(p: Point, ring: &[Point]) -> usize {
    let n = ring.len();
    if n < 3 {
        return 0;
    }
    let mut crossings = 0;
    let mut j = n - 1;
    for i in 0..n {
        let (a, b) = (ring[i], ring[j]);
        if (a.y > p.y) != (b.y > p.y) && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x {
            crossings += 1;
        }
        j = i;
    }
    crossings
}

/// Even-odd containment for a single ring.
#[must_use]
pub fn point_in_ring(p: Point, ring: &[Point]) -> bool {
    ring_area(ring).abs() >= MIN_RING_AREA && ring_crossings(p, ring) % 2 == 1
}

/// Even-odd containment over a polygon's rings, so holes subtract.
#[must_use]
pub fn point_in_polygon(p: Point, rings: &[Vec<Point>]) -> bool {
    let crossings: usize = rings
        .iter()
        .filter(|ring| ring_area(ring).abs() >= MIN_RING_AREA)
        .map(|ring| ring_crossings(p, ring))
        .sum();
    crossings % 2 == 1
}

/// Signed shoelace area; sign depends on winding.
#[must_use]
pub fn ring_area(ring: &[Point]) -> f64 {
    let n = ring.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    let mut j = n - 1;
    for i in 0..n {
        sum += ring[j].x * ring[i].y - ring[i].x * ring[j].y;
        j = i;
    }
    sum * 0.5
}

/// Whether `p` lies within `radius` of `center`.
#[must_use]
pub fn point_in_circle(p: Point, center: Point, radius: f64) -> bool {
    radius > 0.0 && p.distance(center) <= radius
}
