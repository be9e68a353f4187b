//! Resource descriptor and TopoJSON decoding.
//!
//! The descriptor bundles a TopoJSON topology with a metadata list. Decoding
//! turns the topology's polygon geometries into plain `(lon, lat)` rings and
//! pairs them with metadata, yielding records the country registry can load.
//!
//! TopoJSON details handled here:
//! - quantized topologies carry a `transform`; their arc positions are
//!   delta-encoded and restart at every arc
//! - a negative arc index `i` refers to arc `!i`, traversed in reverse
//! - consecutive arcs in a ring share their junction point, so each arc after
//!   the first drops its leading point
//! - rings shorter than four points are padded with their first point

#[cfg(test)]
#[path = "topology_test.rs"]
mod topology_test;

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

use crate::error::MapError;

/// A closed ring of `(lon, lat)` positions.
pub type Ring = Vec<[f64; 2]>;

/// A polygon: exterior ring followed by holes.
pub type Polygon = Vec<Ring>;

/// Top-level resource descriptor.
#[derive(Debug, Clone, Deserialize)]
pub struct Descriptor {
    pub topology: Topology,
    /// Name of the topology object holding country geometries.
    #[serde(default)]
    pub object: Option<String>,
    /// Metadata list, parallel to (or keyed by id into) the geometries.
    #[serde(default)]
    pub metadata: Vec<CountryMeta>,
}

impl Descriptor {
    /// # Errors
    ///
    /// Returns [`MapError::Parse`] if the JSON is malformed or misshapen.
    pub fn from_json(json: &str) -> Result<Self, MapError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// One metadata row.
#[derive(Debug, Clone, Deserialize)]
pub struct CountryMeta {
    #[serde(default)]
    pub id: Option<Value>,
    pub name: String,
    #[serde(default)]
    pub capital: Option<String>,
    /// Whole, non-negative counts only; any other number reads as unknown.
    #[serde(default, deserialize_with = "whole_count")]
    pub population: Option<u64>,
}

fn whole_count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<f64>::deserialize(deserializer)?;
    Ok(raw.and_then(count_from_f64))
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
fn count_from_f64(v: f64) -> Option<u64> {
    if v.is_finite() && v >= 0.0 && v.fract() == 0.0 && v <= u64::MAX as f64 { Some(v as u64) } else { None }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Topology {
    #[serde(default)]
    pub transform: Option<TopoTransform>,
    #[serde(default)]
    pub arcs: Vec<Vec<Vec<f64>>>,
    pub objects: BTreeMap<String, TopoGeometry>,
}

/// Quantization transform.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct TopoTransform {
    pub scale: [f64; 2],
    pub translate: [f64; 2],
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum TopoGeometry {
    GeometryCollection {
        geometries: Vec<TopoGeometry>,
    },
    Polygon {
        arcs: Vec<Vec<i64>>,
        #[serde(default)]
        id: Option<Value>,
        #[serde(default)]
        properties: Option<Value>,
    },
    MultiPolygon {
        arcs: Vec<Vec<Vec<i64>>>,
        #[serde(default)]
        id: Option<Value>,
        #[serde(default)]
        properties: Option<Value>,
    },
    /// Points, lines and anything else a country layer cannot use.
    #[serde(other)]
    Unsupported,
}

/// A decoded country: metadata plus polygons.
#[derive(Debug, Clone, PartialEq)]
pub struct CountryRecord {
    pub name: String,
    pub capital: Option<String>,
    pub population: Option<u64>,
    pub polygons: Vec<Polygon>,
}

/// Decode the descriptor into country records, in geometry order.
///
/// # Errors
///
/// Returns [`MapError::Topology`] if the requested object is missing or an
/// arc index is out of range.
pub fn decode(descriptor: &Descriptor) -> Result<Vec<CountryRecord>, MapError> {
    let topology = &descriptor.topology;
    let object = select_object(topology, descriptor.object.as_deref())?;
    let arcs = absolute_arcs(topology);

    let mut shapes = Vec::new();
    flatten(object, &arcs, &mut shapes)?;

    let by_id: BTreeMap<String, &CountryMeta> = descriptor
        .metadata
        .iter()
        .filter_map(|m| m.id.as_ref().and_then(normalize_id).map(|id| (id, m)))
        .collect();

    let mut records = Vec::with_capacity(shapes.len());
    for (index, shape) in shapes.into_iter().enumerate() {
        let meta = match shape.id.as_ref() {
            Some(id) => by_id.get(id).copied(),
            None => descriptor.metadata.get(index),
        };
        let record = match (meta, shape.name) {
            (Some(m), _) => CountryRecord {
                name: m.name.clone(),
                capital: m.capital.clone(),
                population: m.population,
                polygons: shape.polygons,
            },
            (None, Some(name)) => CountryRecord { name, capital: None, population: None, polygons: shape.polygons },
            (None, None) => {
                tracing::debug!(index, id = ?shape.id, "geometry without metadata skipped");
                continue;
            }
        };
        records.push(record);
    }
    Ok(records)
}

struct Shape {
    id: Option<String>,
    name: Option<String>,
    polygons: Vec<Polygon>,
}

fn select_object<'a>(topology: &'a Topology, name: Option<&str>) -> Result<&'a TopoGeometry, MapError> {
    match name {
        Some(name) => topology
            .objects
            .get(name)
            .ok_or_else(|| MapError::Topology(format!("object {name:?} not found"))),
        None => topology
            .objects
            .get("countries")
            .or_else(|| topology.objects.values().next())
            .ok_or_else(|| MapError::Topology("topology has no objects".to_owned())),
    }
}

/// Decode every arc into absolute `(lon, lat)` positions.
fn absolute_arcs(topology: &Topology) -> Vec<Vec<[f64; 2]>> {
    topology
        .arcs
        .iter()
        .map(|arc| {
            let positions = arc.iter().filter(|p| p.len() >= 2);
            match topology.transform {
                Some(t) => {
                    let (mut x, mut y) = (0.0, 0.0);
                    positions
                        .map(|p| {
                            x += p[0];
                            y += p[1];
                            [x * t.scale[0] + t.translate[0], y * t.scale[1] + t.translate[1]]
                        })
                        .collect::<Vec<_>>()
                }
                None => positions.map(|p| [p[0], p[1]]).collect::<Vec<_>>(),
            }
        })
        .collect()
}

fn flatten(geometry: &TopoGeometry, arcs: &[Vec<[f64; 2]>], out: &mut Vec<Shape>) -> Result<(), MapError> {
    match geometry {
        TopoGeometry::GeometryCollection { geometries } => {
            for g in geometries {
                flatten(g, arcs, out)?;
            }
        }
        TopoGeometry::Polygon { arcs: rings, id, properties } => {
            out.push(Shape {
                id: id.as_ref().and_then(normalize_id),
                name: property_name(properties.as_ref()),
                polygons: vec![polygon(rings, arcs)?],
            });
        }
        TopoGeometry::MultiPolygon { arcs: polys, id, properties } => {
            out.push(Shape {
                id: id.as_ref().and_then(normalize_id),
                name: property_name(properties.as_ref()),
                polygons: polys.iter().map(|rings| polygon(rings, arcs)).collect::<Result<_, _>>()?,
            });
        }
        TopoGeometry::Unsupported => {}
    }
    Ok(())
}

fn polygon(rings: &[Vec<i64>], arcs: &[Vec<[f64; 2]>]) -> Result<Polygon, MapError> {
    rings.iter().map(|indices| ring(indices, arcs)).collect()
}

fn ring(indices: &[i64], arcs: &[Vec<[f64; 2]>]) -> Result<Ring, MapError> {
    let mut points: Ring = Vec::new();
    for &i in indices {
        let reversed = i < 0;
        let index = usize::try_from(if reversed { !i } else { i })
            .map_err(|_| MapError::Topology(format!("arc index {i} out of range")))?;
        let arc = arcs
            .get(index)
            .ok_or_else(|| MapError::Topology(format!("arc index {i} out of range")))?;
        points.pop();
        let start = points.len();
        points.extend_from_slice(arc);
        if reversed {
            points[start..].reverse();
        }
    }
    if let Some(&first) = points.first() {
        while points.len() < 4 {
            points.push(first);
        }
    }
    Ok(points)
}

/// Numeric ids compare as integers so `"004"` matches `4`.
fn normalize_id(id: &Value) -> Option<String> {
    match id {
        Value::Number(n) => Some(n.as_u64().map_or_else(|| n.to_string(), |v| v.to_string())),
        Value::String(s) => {
            let s = s.trim();
            Some(s.parse::<u64>().map_or_else(|_| s.to_owned(), |v| v.to_string()))
        }
        _ => None,
    }
}

fn property_name(properties: Option<&Value>) -> Option<String> {
    properties?.get("name")?.as_str().map(str::to_owned)
}
