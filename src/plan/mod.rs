//! Floorplan records as read from the dataset.
//!
//! A [`Plan`] is a loosely-typed mapping from key to JSON value. Geometry
//! categories are parsed lazily, on request, so that a malformed category is
//! reported as a per-plan failure at export time rather than failing the
//! whole dataset load.

mod keys;

pub use keys::{CanonicalKeys, KeyNormalizer, NoopKeys};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ExportError;
use crate::geometry::{flatten, geojson, AtomicGeometry, GeometryValue};

/// Keys that carry plan metadata rather than geometry.
pub const RESERVED_KEYS: [&str; 6] = ["graph", "id", "unitType", "area", "net_area", "land"];

/// A region category, in canonical export order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Living,
    Bedroom,
    Bathroom,
    Kitchen,
    Door,
    Window,
    Wall,
    FrontDoor,
    Balcony,
}

impl Category {
    /// Every category, in the order the exporter enumerates them.
    pub const ALL: [Category; 9] = [
        Category::Living,
        Category::Bedroom,
        Category::Bathroom,
        Category::Kitchen,
        Category::Door,
        Category::Window,
        Category::Wall,
        Category::FrontDoor,
        Category::Balcony,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Living => "living",
            Category::Bedroom => "bedroom",
            Category::Bathroom => "bathroom",
            Category::Kitchen => "kitchen",
            Category::Door => "door",
            Category::Window => "window",
            Category::Wall => "wall",
            Category::FrontDoor => "front_door",
            Category::Balcony => "balcony",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("unknown category '{s}'"))
    }
}

/// One floorplan: a mapping from category (or reserved key) to value.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Plan {
    entries: Map<String, Value>,
}

impl Plan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a key, returning the plan for chaining.
    pub fn with(mut self, key: impl Into<String>, value: Value) -> Self {
        self.entries.insert(key.into(), value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.entries.insert(key.into(), value)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.remove(key)
    }

    /// All keys currently present, in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parses the value stored under `category`.
    ///
    /// Returns `Ok(None)` when the category is absent or null.
    pub fn geometry(&self, category: Category) -> Result<Option<GeometryValue>, ExportError> {
        match self.entries.get(category.as_str()) {
            None => Ok(None),
            Some(value) => geojson::geometry_value_from_json(value)
                .map_err(|message| ExportError::malformed(category.as_str(), message)),
        }
    }

    /// The category's atomic geometries, flattened in order.
    pub fn atoms(&self, category: Category) -> Result<Vec<AtomicGeometry>, ExportError> {
        Ok(flatten(self.geometry(category)?.as_ref()))
    }
}
