//! Reading plan geometry values from their JSON representation.
//!
//! A category value in the dataset is one of:
//!
//! - `null`: the category has no geometry;
//! - a GeoJSON geometry object (`Point`, `LineString`, `Polygon`, the three
//!   `Multi*` kinds or a `GeometryCollection`);
//! - a WKT string, for datasets that were themselves produced from an export;
//! - an array whose elements are any of the above (nested arrays allowed).
//!
//! Only planar positions are accepted: a position with other than two
//! ordinates is malformed.

use geo::{
    Coord, Geometry, GeometryCollection, LineString, MultiLineString, MultiPoint, MultiPolygon,
    Point, Polygon,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{wkt, AtomicGeometry, GeometryValue};

// ============================================================================
// GeoJSON Schema Types
// ============================================================================

type Position = Vec<f64>;

/// A GeoJSON geometry object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GeoJsonGeometry {
    Point { coordinates: Position },
    LineString { coordinates: Vec<Position> },
    Polygon { coordinates: Vec<Vec<Position>> },
    MultiPoint { coordinates: Vec<Position> },
    MultiLineString { coordinates: Vec<Vec<Position>> },
    MultiPolygon { coordinates: Vec<Vec<Vec<Position>>> },
    GeometryCollection { geometries: Vec<GeoJsonGeometry> },
}

impl GeoJsonGeometry {
    /// Converts to a `geo` geometry, checking that every position is 2-D.
    pub fn to_geo(&self) -> Result<Geometry<f64>, String> {
        Ok(match self {
            GeoJsonGeometry::Point { coordinates } if coordinates.is_empty() => {
                // GeoJSON's empty point; it flattens to nothing.
                Geometry::MultiPoint(MultiPoint::new(vec![]))
            }
            GeoJsonGeometry::Point { coordinates } => Geometry::Point(Point(coord(coordinates)?)),
            GeoJsonGeometry::LineString { coordinates } => {
                Geometry::LineString(line_string(coordinates)?)
            }
            GeoJsonGeometry::Polygon { coordinates } => Geometry::Polygon(polygon(coordinates)?),
            GeoJsonGeometry::MultiPoint { coordinates } => Geometry::MultiPoint(MultiPoint::new(
                coordinates
                    .iter()
                    .map(|p| coord(p).map(Point))
                    .collect::<Result<_, _>>()?,
            )),
            GeoJsonGeometry::MultiLineString { coordinates } => {
                Geometry::MultiLineString(MultiLineString::new(
                    coordinates
                        .iter()
                        .map(|ls| line_string(ls))
                        .collect::<Result<_, _>>()?,
                ))
            }
            GeoJsonGeometry::MultiPolygon { coordinates } => {
                Geometry::MultiPolygon(MultiPolygon::new(
                    coordinates
                        .iter()
                        .map(|rings| polygon(rings))
                        .collect::<Result<_, _>>()?,
                ))
            }
            GeoJsonGeometry::GeometryCollection { geometries } => {
                Geometry::GeometryCollection(GeometryCollection(
                    geometries
                        .iter()
                        .map(GeoJsonGeometry::to_geo)
                        .collect::<Result<_, _>>()?,
                ))
            }
        })
    }
}

impl From<&AtomicGeometry> for GeoJsonGeometry {
    fn from(geom: &AtomicGeometry) -> Self {
        fn ring(ls: &LineString<f64>) -> Vec<Position> {
            ls.0.iter().map(|c| vec![c.x, c.y]).collect()
        }

        match geom {
            AtomicGeometry::Point(p) => GeoJsonGeometry::Point {
                coordinates: vec![p.x(), p.y()],
            },
            AtomicGeometry::LineString(ls) => GeoJsonGeometry::LineString {
                coordinates: ring(ls),
            },
            AtomicGeometry::Polygon(poly) => GeoJsonGeometry::Polygon {
                coordinates: std::iter::once(poly.exterior())
                    .chain(poly.interiors())
                    .map(ring)
                    .collect(),
            },
        }
    }
}

fn coord(position: &[f64]) -> Result<Coord<f64>, String> {
    match position {
        [x, y] => Ok(Coord { x: *x, y: *y }),
        other => Err(format!(
            "expected a 2-D position, found {} ordinate(s)",
            other.len()
        )),
    }
}

fn line_string(positions: &[Position]) -> Result<LineString<f64>, String> {
    positions
        .iter()
        .map(|p| coord(p))
        .collect::<Result<Vec<_>, _>>()
        .map(LineString::new)
}

fn polygon(rings: &[Vec<Position>]) -> Result<Polygon<f64>, String> {
    let mut rings = rings.iter();
    let exterior = match rings.next() {
        Some(ring) => line_string(ring)?,
        None => LineString::new(vec![]),
    };
    let interiors = rings.map(|r| line_string(r)).collect::<Result<_, _>>()?;
    Ok(Polygon::new(exterior, interiors))
}

// ============================================================================
// Public API
// ============================================================================

/// Reads a category value from JSON.
///
/// Returns `Ok(None)` for `null`. Errors describe what was malformed, without
/// the category name; callers attach that.
pub fn geometry_value_from_json(value: &Value) -> Result<Option<GeometryValue>, String> {
    match value {
        Value::Null => Ok(None),
        Value::Array(items) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                if let Some(v) = geometry_value_from_json(item)? {
                    out.push(v);
                }
            }
            Ok(Some(GeometryValue::List(out)))
        }
        Value::Object(_) => {
            let geojson = GeoJsonGeometry::deserialize(value).map_err(|e| e.to_string())?;
            Ok(Some(GeometryValue::Single(geojson.to_geo()?)))
        }
        Value::String(text) => {
            let atom = wkt::decode(text).map_err(|e| e.to_string())?;
            Ok(Some(GeometryValue::Single(atom.into())))
        }
        Value::Bool(_) | Value::Number(_) => Err(format!(
            "expected a GeoJSON geometry, WKT string, list or null, found {value}"
        )),
    }
}
