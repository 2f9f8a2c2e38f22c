//! Contact-based adjacency between rooms, doors and windows.
//!
//! Regions are connected when they come within a small buffer distance of
//! each other. "Geometry A intersects geometry B buffered by d" holds exactly
//! when the Euclidean distance between A and B is at most d, and buffering
//! twice by d is buffering once by 2d, so every rule below is a distance
//! threshold.
//!
//! Rules, in the order edges are added (the first type recorded for a pair
//! wins):
//!
//! 1. `front_door` – `living` within one buffer: `direct`
//! 2. `kitchen`/`bedroom` – `living` within three buffers: `adjacency`
//! 3. `bathroom`/`balcony` – `living`/`bedroom` through a door (`via_door`)
//!    or window (`via_window`) that is within one buffer of both rooms

use std::collections::BTreeMap;

use serde_json::Value;

use super::{AdjacencyGraph, GraphDeriver};
use crate::error::ExportError;
use crate::geometry::AtomicGeometry;
use crate::plan::{Category, Plan};

/// Nominal wall thickness in plan units.
const WALL_WIDTH: f64 = 0.1;
const BUFFER_FACTOR: f64 = 0.75;
const MIN_BUFFER: f64 = 0.01;

/// Room categories that become graph nodes, in node-creation order.
const ROOM_TYPES: [Category; 5] = [
    Category::Living,
    Category::Kitchen,
    Category::Bedroom,
    Category::Bathroom,
    Category::Balcony,
];

/// Derives adjacency from geometric contact.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ContactGraph {
    /// Buffer distance used by every contact test.
    pub buffer: f64,
}

impl Default for ContactGraph {
    fn default() -> Self {
        Self {
            buffer: (WALL_WIDTH * BUFFER_FACTOR).max(MIN_BUFFER),
        }
    }
}

struct Region {
    id: String,
    geom: AtomicGeometry,
}

impl GraphDeriver for ContactGraph {
    fn derive(&self, plan: &Plan) -> Result<AdjacencyGraph, ExportError> {
        let mut graph = AdjacencyGraph::new();
        let mut regions: BTreeMap<Category, Vec<Region>> = BTreeMap::new();

        for category in ROOM_TYPES {
            for (i, geom) in plan.atoms(category)?.into_iter().enumerate() {
                if geom.is_polygon() {
                    add_region(&mut graph, &mut regions, category, i, geom);
                }
            }
        }
        for (i, geom) in plan.atoms(Category::FrontDoor)?.into_iter().enumerate() {
            add_region(&mut graph, &mut regions, Category::FrontDoor, i, geom);
        }

        let openings: Vec<(AtomicGeometry, &str)> = plan
            .atoms(Category::Door)?
            .into_iter()
            .map(|g| (g, "via_door"))
            .chain(
                plan.atoms(Category::Window)?
                    .into_iter()
                    .map(|g| (g, "via_window")),
            )
            .collect();

        let of = |category: Category| regions_of(&regions, category);
        let buf = self.buffer;

        for door in of(Category::FrontDoor) {
            for living in of(Category::Living) {
                if door.geom.distance(&living.geom) <= buf {
                    connect(&mut graph, door, living, "direct");
                }
            }
        }

        for category in [Category::Kitchen, Category::Bedroom] {
            for room in of(category) {
                for living in of(Category::Living) {
                    if room.geom.distance(&living.geom) <= 3.0 * buf {
                        connect(&mut graph, room, living, "adjacency");
                    }
                }
            }
        }

        for category in [Category::Bathroom, Category::Balcony] {
            for room in of(category) {
                for (opening, kind) in &openings {
                    if opening.distance(&room.geom) > buf {
                        continue;
                    }
                    for target in of(Category::Living).iter().chain(of(Category::Bedroom)) {
                        if opening.distance(&target.geom) <= buf {
                            connect(&mut graph, room, target, kind);
                        }
                    }
                }
            }
        }

        Ok(graph)
    }
}

fn add_region(
    graph: &mut AdjacencyGraph,
    regions: &mut BTreeMap<Category, Vec<Region>>,
    category: Category,
    index: usize,
    geom: AtomicGeometry,
) {
    let id = format!("{category}_{index}");
    graph.add_node(
        id.as_str(),
        Some(Value::from(category.as_str())),
        Some(Value::from(geom.area())),
    );
    regions.entry(category).or_default().push(Region { id, geom });
}

fn regions_of(regions: &BTreeMap<Category, Vec<Region>>, category: Category) -> &[Region] {
    regions.get(&category).map(Vec::as_slice).unwrap_or(&[])
}

fn connect(graph: &mut AdjacencyGraph, a: &Region, b: &Region, kind: &str) {
    graph.add_edge(a.id.as_str(), b.id.as_str(), Some(Value::from(kind)));
}
