//! Axis-aligned bounding rectangles.

use serde::{Deserialize, Serialize};

use super::AtomicGeometry;

/// An axis-aligned bounding rectangle (minx, miny, maxx, maxy).
///
/// Serializes as the four-element array `[minx, miny, maxx, maxy]`, the shape
/// consumers of the export bundle read.
#[derive(Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    /// Creates bounds from explicit coordinates.
    #[inline]
    pub fn from_xyxy(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Midpoint of the rectangle as `(cx, cy)`.
    #[inline]
    pub fn center(&self) -> (f64, f64) {
        (
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// Returns true if all coordinates are finite (not NaN or infinite).
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.min_x.is_finite()
            && self.min_y.is_finite()
            && self.max_x.is_finite()
            && self.max_y.is_finite()
    }

    /// Smallest rectangle containing both `self` and `other`.
    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds::from_xyxy(
            self.min_x.min(other.min_x),
            self.min_y.min(other.min_y),
            self.max_x.max(other.max_x),
            self.max_y.max(other.max_y),
        )
    }

    /// Returns true if `other` lies entirely inside `self` (edges included).
    pub fn contains(&self, other: &Bounds) -> bool {
        self.min_x <= other.min_x
            && self.min_y <= other.min_y
            && self.max_x >= other.max_x
            && self.max_y >= other.max_y
    }

    pub fn to_array(&self) -> [f64; 4] {
        [self.min_x, self.min_y, self.max_x, self.max_y]
    }
}

/// Reduces geometries to the coordinate-wise min/max of their rectangles.
///
/// Returns `None` when no geometry contributes a rectangle; callers pick
/// their own default for that case.
pub fn bounds<'a, I>(geoms: I) -> Option<Bounds>
where
    I: IntoIterator<Item = &'a AtomicGeometry>,
{
    geoms
        .into_iter()
        .filter_map(AtomicGeometry::bounds)
        .reduce(|acc, b| acc.union(&b))
}

impl std::fmt::Debug for Bounds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bounds")
            .field("min_x", &self.min_x)
            .field("min_y", &self.min_y)
            .field("max_x", &self.max_x)
            .field("max_y", &self.max_y)
            .finish()
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::from_xyxy(0.0, 0.0, 0.0, 0.0)
    }
}

impl From<[f64; 4]> for Bounds {
    fn from(a: [f64; 4]) -> Self {
        Bounds::from_xyxy(a[0], a[1], a[2], a[3])
    }
}

impl Serialize for Bounds {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_array().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Bounds {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        <[f64; 4]>::deserialize(deserializer).map(Bounds::from)
    }
}
