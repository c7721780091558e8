//! Graph export for external renderers
//!
//! - Node-link JSON: `{ directed, nodes: [{id, label, kind}], edges: [{source, target, relation}] }`
//! - Graphviz DOT via `petgraph::dot`

use petgraph::dot::Dot;
use serde::{Deserialize, Serialize};

use nkg_core::{NkgError, OutputFormat, Result};

use crate::{GraphExporter, NarrativeGraph};

/// Node entry of the node-link document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeLinkNode {
    pub id: String,
    pub label: String,
    pub kind: String,
}

/// Edge entry of the node-link document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeLinkEdge {
    pub source: String,
    pub target: String,
    pub relation: String,
}

/// Plain node-link representation of a narrative graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeLinkGraph {
    pub directed: bool,
    pub nodes: Vec<NodeLinkNode>,
    pub edges: Vec<NodeLinkEdge>,
}

impl NarrativeGraph {
    /// Convert to the node-link representation
    pub fn to_node_link(&self) -> NodeLinkGraph {
        NodeLinkGraph {
            directed: true,
            nodes: self
                .nodes()
                .map(|n| NodeLinkNode {
                    id: n.id.clone(),
                    label: n.display_label(),
                    kind: n.kind.label().to_string(),
                })
                .collect(),
            edges: self
                .edges()
                .map(|e| NodeLinkEdge {
                    source: e.source.id.clone(),
                    target: e.target.id.clone(),
                    relation: e.relation.to_string(),
                })
                .collect(),
        }
    }

    /// Render as Graphviz DOT
    pub fn to_dot(&self) -> String {
        format!("{}", Dot::new(self.inner()))
    }
}

/// Pretty-printed node-link JSON
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonExporter;

impl GraphExporter for JsonExporter {
    fn export(&self, graph: &NarrativeGraph) -> Result<String> {
        serde_json::to_string_pretty(&graph.to_node_link())
            .map_err(|e| NkgError::ExportError(format!("JSON serialization failed: {e}")))
    }

    fn format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

/// Graphviz DOT
#[derive(Debug, Clone, Copy, Default)]
pub struct DotExporter;

impl GraphExporter for DotExporter {
    fn export(&self, graph: &NarrativeGraph) -> Result<String> {
        Ok(graph.to_dot())
    }

    fn format(&self) -> OutputFormat {
        OutputFormat::Dot
    }
}

/// Exporter for a configured output format
pub fn exporter_for(format: OutputFormat) -> Box<dyn GraphExporter> {
    match format {
        OutputFormat::Json => Box::new(JsonExporter),
        OutputFormat::Dot => Box::new(DotExporter),
    }
}

// ============================================================================
// Tests
// ============================================================================
