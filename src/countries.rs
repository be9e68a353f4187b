//! Country registry: stable ids, metadata lookups, and screen-space geometry.
//!
//! Each country keeps its source rings in `(lon, lat)` and a derived
//! [`ScreenGeometry`] in unprojected screen space. The derived data is rebuilt
//! for every country in one pass by [`CountryRegistry::reproject`], and the
//! registry keeps the projection it was built with, so containment queries
//! and zoom-to-country always see geometry consistent with the projection.

#[cfg(test)]
#[path = "countries_test.rs"]
mod countries_test;

use std::collections::{BTreeSet, HashMap};

use crate::camera::{Bounds, Point};
use crate::geo::GeoPoint;
use crate::hit;
use crate::projection::GeoProjection;
use crate::topology::{CountryRecord, Polygon};

/// Stable country id, assigned in order of appearance at load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CountryId(pub usize);

/// Derived geometry in unprojected screen space.
#[derive(Debug, Clone, PartialEq)]
pub struct ScreenGeometry {
    /// Polygons, each a list of rings (exterior first).
    pub polygons: Vec<Vec<Vec<Point>>>,
    pub bounds: Bounds,
    pub centroid: Point,
}

impl ScreenGeometry {
    fn project(polygons: &[Polygon], projection: &GeoProjection) -> Self {
        let polygons: Vec<Vec<Vec<Point>>> = polygons
            .iter()
            .map(|rings| {
                rings
                    .iter()
                    .map(|ring| ring.iter().map(|&lon_lat| projection.project_lon_lat(lon_lat)).collect())
                    .collect()
            })
            .collect();

        let origin = Point::new(0.0, 0.0);
        let bounds = Bounds::from_points(polygons.iter().flat_map(|rings| rings.iter().flatten().copied()))
            .unwrap_or(Bounds::new(origin, origin));
        let centroid = area_centroid(&polygons).unwrap_or_else(|| bounds.center());
        Self { polygons, bounds, centroid }
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.bounds.width()
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.bounds.height()
    }

    /// True if `p` is inside at least one polygon.
    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        let b = &self.bounds;
        if p.x < b.min.x || p.x > b.max.x || p.y < b.min.y || p.y > b.max.y {
            return false;
        }
        self.polygons.iter().any(|rings| hit::point_in_polygon(p, rings))
    }
}

/// Area-weighted centroid over every ring; `None` when the total area vanishes.
fn area_centroid(polygons: &[Vec<Vec<Point>>]) -> Option<Point> {
    let (mut area, mut cx, mut cy) = (0.0, 0.0, 0.0);
    for ring in polygons.iter().flatten() {
        let n = ring.len();
        if n < 3 {
            continue;
        }
        let mut j = n - 1;
        for i in 0..n {
            let (a, b) = (ring[j], ring[i]);
            let cross = a.x * b.y - b.x * a.y;
            area += cross;
            cx += (a.x + b.x) * cross;
            cy += (a.y + b.y) * cross;
            j = i;
        }
    }
    if area.abs() < 1e-9 {
        return None;
    }
    Some(Point::new(cx / (3.0 * area), cy / (3.0 * area)))
}

#[derive(Debug, Clone)]
pub struct Country {
    pub id: CountryId,
    pub name: String,
    pub capital: Option<String>,
    pub population: Option<u64>,
    /// Source rings in `(lon, lat)`.
    pub geometry: Vec<Polygon>,
    pub screen: ScreenGeometry,
    /// Clustering selectors this country is marked with.
    pub marks: BTreeSet<String>,
}

/// `{id, name}` pair returned by [`CountryRegistry::list`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountrySummary {
    pub id: CountryId,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct CountryRegistry {
    countries: Vec<Country>,
    by_name: HashMap<String, CountryId>,
    projection: GeoProjection,
}

impl CountryRegistry {
    /// Load decoded records, assigning ids in order. Later duplicates of a name are dropped.
    #[must_use]
    pub fn from_records(records: Vec<CountryRecord>, projection: &GeoProjection) -> Self {
        let mut countries = Vec::with_capacity(records.len());
        let mut by_name = HashMap::with_capacity(records.len());
        for record in records {
            if by_name.contains_key(&record.name) {
                tracing::warn!(name = %record.name, "duplicate country name ignored");
                continue;
            }
            let id = CountryId(countries.len());
            by_name.insert(record.name.clone(), id);
            countries.push(Country {
                id,
                screen: ScreenGeometry::project(&record.polygons, projection),
                name: record.name,
                capital: record.capital,
                population: record.population,
                geometry: record.polygons,
                marks: BTreeSet::new(),
            });
        }
        Self { countries, by_name, projection: *projection }
    }

    /// Recompute every country's derived geometry for a new projection.
    pub fn reproject(&mut self, projection: &GeoProjection) {
        let screens: Vec<ScreenGeometry> =
            self.countries.iter().map(|c| ScreenGeometry::project(&c.geometry, projection)).collect();
        for (country, screen) in self.countries.iter_mut().zip(screens) {
            country.screen = screen;
        }
        self.projection = *projection;
    }

    /// The projection the derived geometry was computed with.
    #[must_use]
    pub fn projection(&self) -> &GeoProjection {
        &self.projection
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.countries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Country> {
        self.countries.iter()
    }

    #[must_use]
    pub fn id(&self, name: &str) -> Option<CountryId> {
        self.by_name.get(name).copied()
    }

    #[must_use]
    pub fn get(&self, id: CountryId) -> Option<&Country> {
        self.countries.get(id.0)
    }

    pub fn get_mut(&mut self, id: CountryId) -> Option<&mut Country> {
        self.countries.get_mut(id.0)
    }

    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<&Country> {
        self.id(name).and_then(|id| self.get(id))
    }

    #[must_use]
    pub fn name(&self, id: CountryId) -> Option<&str> {
        self.get(id).map(|c| c.name.as_str())
    }

    #[must_use]
    pub fn list(&self) -> Vec<CountrySummary> {
        self.countries.iter().map(|c| CountrySummary { id: c.id, name: c.name.clone() }).collect()
    }

    #[must_use]
    pub fn capital(&self, name: &str) -> Option<&str> {
        self.by_name(name)?.capital.as_deref()
    }

    /// `(name, capital)` for every country, in id order.
    #[must_use]
    pub fn capitals(&self) -> Vec<(&str, Option<&str>)> {
        self.countries.iter().map(|c| (c.name.as_str(), c.capital.as_deref())).collect()
    }

    #[must_use]
    pub fn population(&self, name: &str) -> Option<u64> {
        self.by_name(name)?.population
    }

    /// `(name, population)` for every country, in id order.
    #[must_use]
    pub fn populations(&self) -> Vec<(&str, Option<u64>)> {
        self.countries.iter().map(|c| (c.name.as_str(), c.population)).collect()
    }

    /// Whether the named country contains the geographic location.
    ///
    /// Unknown names and invalid coordinates are `false`.
    #[must_use]
    pub fn contains_geo_loc(&self, name: &str, geo: GeoPoint) -> bool {
        if !geo.is_valid() {
            return false;
        }
        let p = self.projection.project(geo);
        self.by_name(name).is_some_and(|c| c.screen.contains(p))
    }

    /// Topmost (last loaded) country containing an unprojected point.
    #[must_use]
    pub fn country_at(&self, p: Point) -> Option<CountryId> {
        self.countries.iter().rev().find(|c| c.screen.contains(p)).map(|c| c.id)
    }

    /// Mark a country with a selector.
    pub fn mark(&mut self, id: CountryId, selector: &str) -> bool {
        match self.get_mut(id) {
            Some(c) => c.marks.insert(selector.to_owned()),
            None => false,
        }
    }

    /// Remove a selector from every country carrying it.
    pub fn unmark_all(&mut self, selector: &str) {
        for c in &mut self.countries {
            c.marks.remove(selector);
        }
    }
}
