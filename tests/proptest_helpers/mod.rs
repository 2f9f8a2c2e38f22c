#![allow(dead_code)]

use std::collections::BTreeSet;

use geo::{Coord, Geometry, LineString, Point, Polygon};
use proptest::prelude::*;
use proptest::strategy::BoxedStrategy;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};
use resplan_export::geometry::{AtomicGeometry, GeometryValue};
use resplan_export::graph::AdjacencyGraph;
use serde_json::json;

pub fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(64);

    let mut config = ProptestConfig::with_failure_persistence(FileFailurePersistence::WithSource(
        "proptest-regressions",
    ));
    config.cases = cases;
    config.max_shrink_iters = 1024;
    config
}

/// Plan-scale coordinates: a few kilometres either side of the origin.
pub fn arb_ordinate() -> impl Strategy<Value = f64> {
    -5_000.0..5_000.0f64
}

pub fn arb_coord() -> impl Strategy<Value = Coord<f64>> {
    (arb_ordinate(), arb_ordinate()).prop_map(|(x, y)| Coord { x, y })
}

pub fn arb_point() -> impl Strategy<Value = AtomicGeometry> {
    arb_coord().prop_map(|c| AtomicGeometry::Point(Point(c)))
}

pub fn arb_line_string() -> impl Strategy<Value = AtomicGeometry> {
    prop::collection::vec(arb_coord(), 2..6)
        .prop_map(|coords| AtomicGeometry::LineString(LineString::new(coords)))
}

/// Axis-aligned rectangles with positive extent.
pub fn arb_rectangle() -> impl Strategy<Value = AtomicGeometry> {
    (arb_coord(), 0.01..500.0f64, 0.01..500.0f64).prop_map(|(min, w, h)| {
        let ring = vec![
            min,
            Coord { x: min.x + w, y: min.y },
            Coord {
                x: min.x + w,
                y: min.y + h,
            },
            Coord { x: min.x, y: min.y + h },
            min,
        ];
        AtomicGeometry::Polygon(Polygon::new(LineString::new(ring), vec![]))
    })
}

pub fn arb_atomic() -> BoxedStrategy<AtomicGeometry> {
    prop_oneof![arb_point(), arb_line_string(), arb_rectangle()].boxed()
}

pub fn to_geometry(atom: AtomicGeometry) -> Geometry<f64> {
    Geometry::from(atom)
}

/// Category values nested up to three lists deep.
pub fn arb_geometry_value() -> BoxedStrategy<GeometryValue> {
    let leaf = arb_atomic().prop_map(|a| GeometryValue::Single(to_geometry(a)));
    leaf.prop_recursive(3, 24, 4, |inner| {
        prop::collection::vec(inner, 0..4).prop_map(GeometryValue::List)
    })
    .boxed()
}

/// A node-id set and a set of distinct undirected edges over it.
#[derive(Clone, Debug)]
pub struct GraphShape {
    pub ids: Vec<String>,
    pub edges: Vec<(usize, usize)>,
}

pub fn arb_graph_shape() -> BoxedStrategy<GraphShape> {
    prop::collection::btree_set("[a-z]{1,3}_[0-9]", 1..8)
        .prop_flat_map(|ids| {
            let ids: Vec<String> = ids.into_iter().collect();
            let n = ids.len();
            let edges = prop::collection::btree_set((0..n, 0..n), 0..12).prop_map(|pairs| {
                pairs
                    .into_iter()
                    .filter(|(a, b)| a < b)
                    .collect::<BTreeSet<_>>()
                    .into_iter()
                    .collect::<Vec<_>>()
            });
            (Just(ids), edges)
        })
        .prop_map(|(ids, edges)| GraphShape { ids, edges })
        .boxed()
}

/// Builds a graph, inserting nodes in `node_order` and edges in
/// `edge_order`, with each edge endpoint pair optionally reversed.
pub fn build_graph(
    shape: &GraphShape,
    node_order: &[usize],
    edge_order: &[usize],
    reverse: bool,
) -> AdjacencyGraph {
    let mut graph = AdjacencyGraph::new();
    for &i in node_order {
        let id = &shape.ids[i];
        graph.add_node(id.as_str(), Some(json!("room")), Some(json!(i)));
    }
    for &e in edge_order {
        let (a, b) = shape.edges[e];
        let (u, v) = if reverse { (b, a) } else { (a, b) };
        let kind = format!("k{a}{b}");
        graph.add_edge(shape.ids[u].as_str(), shape.ids[v].as_str(), Some(json!(kind)));
    }
    graph
}
