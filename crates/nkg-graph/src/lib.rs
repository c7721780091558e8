//! NKG Graph - Statement/attribute graph
//!
//! Builds a directed graph from deduplicated event records: one statement
//! node per event, one shared attribute node per distinct value, and one
//! labeled edge per present field. The graph is read-only once built and is
//! handed to external renderers through the exporters.

use std::collections::HashMap;

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use serde::{Deserialize, Serialize};

use nkg_core::{AttributeKind, OutputFormat, Relation, Result};

pub mod builder;
pub mod export;

pub use builder::GraphBuilder;
pub use export::{exporter_for, DotExporter, JsonExporter, NodeLinkEdge, NodeLinkGraph, NodeLinkNode};

/// Prefix of statement node identifiers
pub const STATEMENT_PREFIX: &str = "Statement";

/// Trait for graph exporters consumed by renderers
pub trait GraphExporter: Send + Sync {
    /// Serialize the graph
    fn export(&self, graph: &NarrativeGraph) -> Result<String>;

    /// Output format produced by this exporter
    fn format(&self) -> OutputFormat;
}

// ============================================================================
// Nodes and Edges
// ============================================================================

/// Node type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Statement,
    Attribute(AttributeKind),
}

impl NodeKind {
    /// Type label ("Statement", "Situation", ...)
    pub fn label(&self) -> &'static str {
        match self {
            Self::Statement => STATEMENT_PREFIX,
            Self::Attribute(kind) => kind.as_str(),
        }
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A node of the narrative graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    /// `Statement_<n>` or the literal attribute value
    pub id: String,

    /// Node type
    pub kind: NodeKind,
}

impl GraphNode {
    /// Check if this is a statement node
    pub fn is_statement(&self) -> bool {
        self.kind == NodeKind::Statement
    }

    /// Human-friendly label: "Statement 3" for statements, the value otherwise
    pub fn display_label(&self) -> String {
        match self.kind {
            NodeKind::Statement => self.id.replacen('_', " ", 1),
            NodeKind::Attribute(_) => self.id.clone(),
        }
    }
}

impl std::fmt::Display for GraphNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id)
    }
}

/// A directed, labeled edge from a statement to an attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphEdge<'a> {
    pub source: &'a GraphNode,
    pub target: &'a GraphNode,
    pub relation: Relation,
}

/// Identity of a node; statements and attributes never collide
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum NodeKey {
    Statement(usize),
    Attribute(String),
}

// ============================================================================
// Narrative Graph
// ============================================================================

/// Directed statement/attribute graph
#[derive(Debug, Clone, Default)]
pub struct NarrativeGraph {
    graph: DiGraph<GraphNode, Relation>,
    index: HashMap<NodeKey, NodeIndex>,
    statements: usize,
}

impl NarrativeGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the next statement node and return its 1-based number
    pub(crate) fn add_statement(&mut self) -> usize {
        self.statements += 1;
        let number = self.statements;

        let idx = self.graph.add_node(GraphNode {
            id: format!("{STATEMENT_PREFIX}_{number}"),
            kind: NodeKind::Statement,
        });
        self.index.insert(NodeKey::Statement(number), idx);
        number
    }

    /// Link a statement to the attribute node for `value`, creating it once;
    /// a reused node takes the kind of the latest field linking to it
    pub(crate) fn link_attribute(&mut self, statement: usize, kind: AttributeKind, value: &str) {
        let Some(&source) = self.index.get(&NodeKey::Statement(statement)) else {
            return;
        };

        let key = NodeKey::Attribute(value.to_string());
        let target = match self.index.get(&key) {
            Some(&idx) => {
                self.graph[idx].kind = NodeKind::Attribute(kind);
                idx
            }
            None => {
                let idx = self.graph.add_node(GraphNode {
                    id: value.to_string(),
                    kind: NodeKind::Attribute(kind),
                });
                self.index.insert(key, idx);
                idx
            }
        };

        self.graph.add_edge(source, target, kind.relation());
    }

    /// Iterate nodes in creation order
    pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> + '_ {
        self.graph.node_weights()
    }

    /// Iterate edges in creation order
    pub fn edges(&self) -> impl Iterator<Item = GraphEdge<'_>> + '_ {
        self.graph.edge_references().map(|e| GraphEdge {
            source: &self.graph[e.source()],
            target: &self.graph[e.target()],
            relation: *e.weight(),
        })
    }

    /// Look up a statement node by its 1-based number
    pub fn statement(&self, number: usize) -> Option<&GraphNode> {
        self.index
            .get(&NodeKey::Statement(number))
            .map(|&idx| &self.graph[idx])
    }

    /// Look up a node by id: `Statement_<n>` first, then attribute values
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        let statement = id
            .strip_prefix(STATEMENT_PREFIX)
            .and_then(|rest| rest.strip_prefix('_'))
            .and_then(|number| number.parse::<usize>().ok())
            .and_then(|number| self.statement(number));

        statement.or_else(|| self.attribute(id))
    }

    /// Look up the attribute node holding `value`
    pub fn attribute(&self, value: &str) -> Option<&GraphNode> {
        self.index
            .get(&NodeKey::Attribute(value.to_string()))
            .map(|&idx| &self.graph[idx])
    }

    /// Attributes linked from a statement, in field order
    pub fn statement_attributes(&self, number: usize) -> Vec<(Relation, &GraphNode)> {
        let Some(&idx) = self.index.get(&NodeKey::Statement(number)) else {
            return Vec::new();
        };

        let mut edges: Vec<_> = self
            .graph
            .edges_directed(idx, Direction::Outgoing)
            .collect();
        edges.sort_by_key(|e| e.id());

        edges
            .into_iter()
            .map(|e| (*e.weight(), &self.graph[e.target()]))
            .collect()
    }

    /// Number of outgoing edges of a statement
    pub fn out_degree(&self, number: usize) -> usize {
        self.index
            .get(&NodeKey::Statement(number))
            .map(|&idx| self.graph.edges_directed(idx, Direction::Outgoing).count())
            .unwrap_or(0)
    }

    /// Number of statements linked to the attribute holding `value`
    pub fn in_degree(&self, value: &str) -> usize {
        self.index
            .get(&NodeKey::Attribute(value.to_string()))
            .map(|&idx| self.graph.edges_directed(idx, Direction::Incoming).count())
            .unwrap_or(0)
    }

    /// Number of statement nodes
    pub fn statement_count(&self) -> usize {
        self.statements
    }

    /// Number of attribute nodes
    pub fn attribute_count(&self) -> usize {
        self.graph.node_count() - self.statements
    }

    /// Total number of nodes
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Total number of edges
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Check if the graph has no nodes
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Underlying petgraph graph
    pub fn inner(&self) -> &DiGraph<GraphNode, Relation> {
        &self.graph
    }
}

// ============================================================================
// Tests
// ============================================================================
