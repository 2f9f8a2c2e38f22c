//! Canonical serialization of adjacency graphs.
//!
//! # Deterministic Output
//!
//! Two runs over the same logical graph must produce byte-identical output,
//! whatever order the deriver stored nodes and edges in. The serializer
//! therefore:
//!
//! 1. coerces every identifier and type to a string and every area to a real;
//! 2. orients each undirected edge so that `source <= target`;
//! 3. sorts nodes by id and edges by `(source, target)`, both lexicographic;
//! 4. collapses duplicate edges onto their first occurrence.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::AdjacencyGraph;
use crate::error::ExportError;

/// A node as exported: all fields present, all strings except `area`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: String,

    #[serde(rename = "type")]
    pub kind: String,

    pub area: f64,
}

/// An edge as exported, oriented so that `source <= target`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub source: String,
    pub target: String,

    #[serde(rename = "type")]
    pub kind: String,
}

/// The `reference_graph` block of an export record.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ReferenceGraph {
    pub nodes: Vec<NodeRecord>,
    pub edges: Vec<EdgeRecord>,
}

/// Converts a graph into its canonical exported form.
///
/// # Errors
/// Fails if two nodes coerce to the same id, an edge references a missing
/// node, or an area is not a finite non-negative number.
pub fn serialize(graph: &AdjacencyGraph) -> Result<ReferenceGraph, ExportError> {
    let mut nodes = graph
        .nodes
        .iter()
        .map(|node| {
            let id = coerce_string(&node.id);
            Ok(NodeRecord {
                kind: node.kind.as_ref().map(coerce_string).unwrap_or_default(),
                area: coerce_area(node.area.as_ref()).map_err(|message| {
                    ExportError::Graph(format!("node '{id}': {message}"))
                })?,
                id,
            })
        })
        .collect::<Result<Vec<_>, ExportError>>()?;
    nodes.sort_by(|a, b| a.id.cmp(&b.id));

    if let Some(pair) = nodes.windows(2).find(|pair| pair[0].id == pair[1].id) {
        return Err(ExportError::Graph(format!(
            "duplicate node id '{}'",
            pair[0].id
        )));
    }

    let mut edges = Vec::with_capacity(graph.edges.len());
    for edge in &graph.edges {
        let mut source = coerce_string(&edge.source);
        let mut target = coerce_string(&edge.target);
        for endpoint in [&source, &target] {
            if nodes.binary_search_by(|n| n.id.as_str().cmp(endpoint.as_str())).is_err() {
                return Err(ExportError::Graph(format!(
                    "edge endpoint '{endpoint}' is not a node"
                )));
            }
        }
        if source > target {
            std::mem::swap(&mut source, &mut target);
        }
        edges.push(EdgeRecord {
            source,
            target,
            kind: edge.kind.as_ref().map(coerce_string).unwrap_or_default(),
        });
    }
    edges.sort_by(|a, b| (&a.source, &a.target).cmp(&(&b.source, &b.target)));
    edges.dedup_by(|later, earlier| later.source == earlier.source && later.target == earlier.target);

    Ok(ReferenceGraph { nodes, edges })
}

/// Locale-independent string form of a JSON scalar.
///
/// Strings pass through unquoted, numbers use their shortest round-trip form,
/// and `null` becomes the empty string.
fn coerce_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

fn coerce_area(value: Option<&Value>) -> Result<f64, String> {
    let area = match value {
        None | Some(Value::Null) => return Ok(0.0),
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(_) => None,
    };
    match area {
        Some(a) if a.is_finite() && a >= 0.0 => Ok(a),
        _ => Err(format!(
            "area {} is not a finite non-negative number",
            value.map(Value::to_string).unwrap_or_default()
        )),
    }
}
