//! Adjacency graphs between plan regions.
//!
//! A [`GraphDeriver`] turns a plan into an [`AdjacencyGraph`]; the
//! [`serialize`](serialize::serialize) step then turns that graph into the
//! canonical, deterministically ordered [`ReferenceGraph`] that is exported.
//!
//! Node identifiers and attributes are kept as raw JSON values here because
//! derivers (notably [`StoredGraph`]) may produce numeric or otherwise
//! loosely-typed identifiers; coercion to strings and reals happens only at
//! serialization time.
//!
//! Available derivers:
//!
//! - [`ContactGraph`]: connects regions that touch within a small buffer
//! - [`StoredGraph`]: reads a node-link graph stored under the plan's `graph` key
//! - [`EmptyGraph`]: always empty, for when no deriver is wanted

mod contact;
pub mod serialize;

pub use contact::ContactGraph;
pub use serialize::{serialize, EdgeRecord, NodeRecord, ReferenceGraph};

use serde::Deserialize;
use serde_json::Value;

use crate::error::ExportError;
use crate::plan::Plan;

/// A graph node with its optional semantic type and area.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphNode {
    pub id: Value,
    pub kind: Option<Value>,
    pub area: Option<Value>,
}

/// An undirected edge between two node identifiers.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphEdge {
    pub source: Value,
    pub target: Value,
    pub kind: Option<Value>,
}

/// An undirected graph over plan regions.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AdjacencyGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl AdjacencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_node(&self, id: &Value) -> bool {
        self.nodes.iter().any(|n| &n.id == id)
    }

    /// Adds a node; an existing node with the same id is left unchanged.
    pub fn add_node(&mut self, id: impl Into<Value>, kind: Option<Value>, area: Option<Value>) {
        let id = id.into();
        if !self.has_node(&id) {
            self.nodes.push(GraphNode { id, kind, area });
        }
    }

    /// Returns true if an edge joins `u` and `v` in either direction.
    pub fn has_edge(&self, u: &Value, v: &Value) -> bool {
        self.edges.iter().any(|e| {
            (&e.source == u && &e.target == v) || (&e.source == v && &e.target == u)
        })
    }

    /// Adds an undirected edge unless the pair is already connected.
    pub fn add_edge(&mut self, u: impl Into<Value>, v: impl Into<Value>, kind: Option<Value>) {
        let (source, target) = (u.into(), v.into());
        if !self.has_edge(&source, &target) {
            self.edges.push(GraphEdge {
                source,
                target,
                kind,
            });
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }
}

/// Produces a plan's adjacency graph. Called once per exported plan.
pub trait GraphDeriver {
    fn derive(&self, plan: &Plan) -> Result<AdjacencyGraph, ExportError>;
}

/// Deriver that always yields an empty graph.
#[derive(Clone, Copy, Debug, Default)]
pub struct EmptyGraph;

impl GraphDeriver for EmptyGraph {
    fn derive(&self, _plan: &Plan) -> Result<AdjacencyGraph, ExportError> {
        Ok(AdjacencyGraph::new())
    }
}

/// Deriver that reads a node-link graph from the plan's `graph` key.
///
/// The stored value looks like
/// `{"nodes": [{"id": ..., "type": ..., "area": ...}], "links": [{"source": ..., "target": ..., "type": ...}]}`;
/// `"edges"` is accepted in place of `"links"`. A plan without a `graph` key
/// yields an empty graph.
#[derive(Clone, Copy, Debug, Default)]
pub struct StoredGraph;

#[derive(Debug, Deserialize)]
struct NodeLinkGraph {
    #[serde(default)]
    nodes: Vec<NodeLinkNode>,

    #[serde(default, alias = "edges")]
    links: Vec<NodeLinkEdge>,
}

#[derive(Debug, Deserialize)]
struct NodeLinkNode {
    id: Value,

    #[serde(default, rename = "type")]
    kind: Option<Value>,

    #[serde(default)]
    area: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct NodeLinkEdge {
    source: Value,
    target: Value,

    #[serde(default, rename = "type")]
    kind: Option<Value>,
}

impl GraphDeriver for StoredGraph {
    fn derive(&self, plan: &Plan) -> Result<AdjacencyGraph, ExportError> {
        let stored = match plan.get("graph") {
            None | Some(Value::Null) => return Ok(AdjacencyGraph::new()),
            Some(value) => NodeLinkGraph::deserialize(value)
                .map_err(|e| ExportError::Graph(format!("stored graph is not node-link JSON: {e}")))?,
        };

        let mut graph = AdjacencyGraph::new();
        for node in stored.nodes {
            graph.add_node(node.id, node.kind, node.area);
        }
        for edge in stored.links {
            for endpoint in [&edge.source, &edge.target] {
                if !graph.has_node(endpoint) {
                    return Err(ExportError::Graph(format!(
                        "edge endpoint {endpoint} is not a node"
                    )));
                }
            }
            graph.add_edge(edge.source, edge.target, edge.kind);
        }
        Ok(graph)
    }
}

/// Deriver selection for the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum GraphKind {
    /// Connect regions that touch within a small buffer.
    Contact,
    /// Read the node-link graph stored in each plan.
    Stored,
    /// Export empty graphs.
    None,
}

impl GraphKind {
    /// Builds the deriver this selection names.
    pub fn deriver(self) -> Box<dyn GraphDeriver> {
        match self {
            GraphKind::Contact => Box::new(ContactGraph::default()),
            GraphKind::Stored => Box::new(StoredGraph),
            GraphKind::None => Box::new(EmptyGraph),
        }
    }
}
