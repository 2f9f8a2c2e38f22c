//! Geometry model for floorplan regions.
//!
//! Plans store each category as a polymorphic value: a single geometry, a
//! (possibly nested) list of geometries, or a multi-part geometry. The export
//! pipeline only ever works with [`AtomicGeometry`] values, produced by
//! [`flatten`]:
//!
//! - atomic kinds are points, line strings and polygons;
//! - multi-part geometries and collections are expanded in their intrinsic
//!   part order;
//! - lists are expanded depth-first, preserving order;
//! - empty geometries carry no coordinates and are dropped.
//!
//! # Example
//!
//! ```
//! use geo::{point, Geometry};
//! use resplan_export::geometry::{flatten, GeometryValue};
//!
//! let value = GeometryValue::List(vec![
//!     GeometryValue::Single(Geometry::Point(point!(x: 1.0, y: 2.0))),
//!     GeometryValue::Single(Geometry::Point(point!(x: 3.0, y: 4.0))),
//! ]);
//! assert_eq!(flatten(Some(&value)).len(), 2);
//! assert!(flatten(None).is_empty());
//! ```

mod bounds;
pub mod geojson;
pub mod wkt;

pub use bounds::{bounds, Bounds};

use geo::{
    Area, BoundingRect, CoordsIter, EuclideanDistance, Geometry, LineString, Point, Polygon,
};

/// A point, line string or polygon: a geometry that is not a container of
/// further geometries.
#[derive(Clone, Debug, PartialEq)]
pub enum AtomicGeometry {
    Point(Point<f64>),
    LineString(LineString<f64>),
    Polygon(Polygon<f64>),
}

impl AtomicGeometry {
    /// Returns true if the geometry has no coordinates.
    pub fn is_empty(&self) -> bool {
        match self {
            AtomicGeometry::Point(_) => false,
            AtomicGeometry::LineString(ls) => ls.0.is_empty(),
            AtomicGeometry::Polygon(poly) => poly.exterior().0.is_empty(),
        }
    }

    pub fn is_polygon(&self) -> bool {
        matches!(self, AtomicGeometry::Polygon(_))
    }

    /// Axis-aligned bounding rectangle, or `None` for an empty geometry.
    pub fn bounds(&self) -> Option<Bounds> {
        let rect = match self {
            AtomicGeometry::Point(p) => Some(p.bounding_rect()),
            AtomicGeometry::LineString(ls) => ls.bounding_rect(),
            AtomicGeometry::Polygon(poly) => poly.bounding_rect(),
        }?;
        Some(Bounds::from_xyxy(
            rect.min().x,
            rect.min().y,
            rect.max().x,
            rect.max().y,
        ))
    }

    /// Returns true if every coordinate is finite.
    pub fn is_finite(&self) -> bool {
        let finite = |c: geo::Coord<f64>| c.x.is_finite() && c.y.is_finite();
        match self {
            AtomicGeometry::Point(p) => finite(p.0),
            AtomicGeometry::LineString(ls) => ls.coords_iter().all(finite),
            AtomicGeometry::Polygon(poly) => poly.coords_iter().all(finite),
        }
    }

    /// Planar area; zero for points and line strings.
    pub fn area(&self) -> f64 {
        match self {
            AtomicGeometry::Polygon(poly) => poly.unsigned_area(),
            _ => 0.0,
        }
    }

    /// Euclidean distance between two geometries; zero when they intersect.
    pub fn distance(&self, other: &AtomicGeometry) -> f64 {
        use AtomicGeometry as A;
        match (self, other) {
            (A::Point(a), A::Point(b)) => a.euclidean_distance(b),
            (A::Point(a), A::LineString(b)) => a.euclidean_distance(b),
            (A::Point(a), A::Polygon(b)) => a.euclidean_distance(b),
            (A::LineString(a), A::Point(b)) => a.euclidean_distance(b),
            (A::LineString(a), A::LineString(b)) => a.euclidean_distance(b),
            (A::LineString(a), A::Polygon(b)) => a.euclidean_distance(b),
            (A::Polygon(a), A::Point(b)) => a.euclidean_distance(b),
            (A::Polygon(a), A::LineString(b)) => a.euclidean_distance(b),
            (A::Polygon(a), A::Polygon(b)) => a.euclidean_distance(b),
        }
    }
}

impl From<Point<f64>> for AtomicGeometry {
    fn from(p: Point<f64>) -> Self {
        AtomicGeometry::Point(p)
    }
}

impl From<LineString<f64>> for AtomicGeometry {
    fn from(ls: LineString<f64>) -> Self {
        AtomicGeometry::LineString(ls)
    }
}

impl From<Polygon<f64>> for AtomicGeometry {
    fn from(poly: Polygon<f64>) -> Self {
        AtomicGeometry::Polygon(poly)
    }
}

impl From<AtomicGeometry> for Geometry<f64> {
    fn from(atom: AtomicGeometry) -> Self {
        match atom {
            AtomicGeometry::Point(p) => Geometry::Point(p),
            AtomicGeometry::LineString(ls) => Geometry::LineString(ls),
            AtomicGeometry::Polygon(poly) => Geometry::Polygon(poly),
        }
    }
}

/// The value stored under a plan category.
#[derive(Clone, Debug, PartialEq)]
pub enum GeometryValue {
    /// A single geometry, atomic or multi-part.
    Single(Geometry<f64>),
    /// An ordered list whose elements may themselves be lists or multi-part geometries.
    List(Vec<GeometryValue>),
}

impl From<Geometry<f64>> for GeometryValue {
    fn from(geom: Geometry<f64>) -> Self {
        GeometryValue::Single(geom)
    }
}

/// Expands a category value into its ordered atomic geometries.
///
/// Absent values flatten to an empty sequence. The input is never modified.
pub fn flatten(value: Option<&GeometryValue>) -> Vec<AtomicGeometry> {
    let mut out = Vec::new();
    if let Some(value) = value {
        push_value(value, &mut out);
    }
    out
}

fn push_value(value: &GeometryValue, out: &mut Vec<AtomicGeometry>) {
    match value {
        GeometryValue::Single(geom) => push_geometry(geom, out),
        GeometryValue::List(items) => {
            for item in items {
                push_value(item, out);
            }
        }
    }
}

fn push_geometry(geom: &Geometry<f64>, out: &mut Vec<AtomicGeometry>) {
    let atom = match geom {
        Geometry::Point(p) => AtomicGeometry::Point(*p),
        Geometry::Line(line) => {
            AtomicGeometry::LineString(LineString::new(vec![line.start, line.end]))
        }
        Geometry::LineString(ls) => AtomicGeometry::LineString(ls.clone()),
        Geometry::Polygon(poly) => AtomicGeometry::Polygon(poly.clone()),
        Geometry::Rect(rect) => AtomicGeometry::Polygon(rect.to_polygon()),
        Geometry::Triangle(tri) => AtomicGeometry::Polygon(tri.to_polygon()),
        Geometry::MultiPoint(mp) => {
            out.extend(mp.iter().map(|p| AtomicGeometry::Point(*p)));
            return;
        }
        Geometry::MultiLineString(mls) => {
            for ls in mls {
                push_atom(AtomicGeometry::LineString(ls.clone()), out);
            }
            return;
        }
        Geometry::MultiPolygon(mp) => {
            for poly in mp {
                push_atom(AtomicGeometry::Polygon(poly.clone()), out);
            }
            return;
        }
        Geometry::GeometryCollection(gc) => {
            for part in gc {
                push_geometry(part, out);
            }
            return;
        }
    };
    push_atom(atom, out);
}

fn push_atom(atom: AtomicGeometry, out: &mut Vec<AtomicGeometry>) {
    if !atom.is_empty() {
        out.push(atom);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{line_string, point, polygon, GeometryCollection, MultiPolygon};

    fn square(x: f64, y: f64, size: f64) -> Polygon<f64> {
        polygon![
            (x: x, y: y),
            (x: x + size, y: y),
            (x: x + size, y: y + size),
            (x: x, y: y + size),
        ]
    }

    #[test]
    fn test_flatten_absent_is_empty() {
        assert!(flatten(None).is_empty());
        assert!(flatten(Some(&GeometryValue::List(vec![]))).is_empty());
    }

    #[test]
    fn test_flatten_atomic_is_identity() {
        let poly = square(0.0, 0.0, 10.0);
        let value = GeometryValue::Single(Geometry::Polygon(poly.clone()));
        assert_eq!(flatten(Some(&value)), vec![AtomicGeometry::Polygon(poly)]);
    }

    #[test]
    fn test_flatten_multipolygon_keeps_part_order() {
        let a = square(0.0, 0.0, 1.0);
        let b = square(5.0, 5.0, 2.0);
        let value = GeometryValue::Single(Geometry::MultiPolygon(MultiPolygon::new(vec![
            a.clone(),
            b.clone(),
        ])));

        assert_eq!(
            flatten(Some(&value)),
            vec![AtomicGeometry::Polygon(a), AtomicGeometry::Polygon(b)]
        );
    }

    #[test]
    fn test_flatten_list_is_depth_first() {
        let p1 = point!(x: 1.0, y: 1.0);
        let p2 = point!(x: 2.0, y: 2.0);
        let p3 = point!(x: 3.0, y: 3.0);
        let value = GeometryValue::List(vec![
            GeometryValue::Single(Geometry::Point(p1)),
            GeometryValue::List(vec![
                GeometryValue::Single(Geometry::GeometryCollection(GeometryCollection(vec![
                    Geometry::Point(p2),
                ]))),
                GeometryValue::Single(Geometry::Point(p3)),
            ]),
        ]);

        let flat = flatten(Some(&value));
        assert_eq!(
            flat,
            vec![
                AtomicGeometry::Point(p1),
                AtomicGeometry::Point(p2),
                AtomicGeometry::Point(p3)
            ]
        );
    }

    #[test]
    fn test_flatten_drops_empty_parts() {
        let value = GeometryValue::List(vec![
            GeometryValue::Single(Geometry::LineString(LineString::new(vec![]))),
            GeometryValue::Single(Geometry::LineString(line_string![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0)])),
        ]);
        assert_eq!(flatten(Some(&value)).len(), 1);
    }

    #[test]
    fn test_atomic_bounds_and_area() {
        let poly = AtomicGeometry::Polygon(square(2.0, 3.0, 4.0));
        assert_eq!(poly.bounds(), Some(Bounds::from_xyxy(2.0, 3.0, 6.0, 7.0)));
        assert_eq!(poly.area(), 16.0);

        let pt = AtomicGeometry::Point(point!(x: 5.0, y: 0.0));
        assert_eq!(pt.bounds(), Some(Bounds::from_xyxy(5.0, 0.0, 5.0, 0.0)));
        assert_eq!(pt.area(), 0.0);
    }

    #[test]
    fn test_distance_between_separated_squares() {
        let a = AtomicGeometry::Polygon(square(0.0, 0.0, 1.0));
        let b = AtomicGeometry::Polygon(square(3.0, 0.0, 1.0));
        assert!((a.distance(&b) - 2.0).abs() < 1e-12);

        let inside = AtomicGeometry::Point(point!(x: 0.5, y: 0.5));
        assert_eq!(inside.distance(&a), 0.0);
    }
}
