//! petgraph-based directed graph over a workflow document, keyed by node id.

use std::collections::HashMap;

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};

use super::types::{Port, WorkflowDocument};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeLabel {
    pub source_port: Port,
    pub target_port: Port,
}

/// One graph node per distinct node id; duplicate ids collapse onto their
/// first occurrence. Connections whose endpoints do not resolve are left out.
pub struct WorkflowGraph {
    pub graph: DiGraph<String, EdgeLabel>,
    pub node_indices: HashMap<String, NodeIndex>,
    name_indices: HashMap<String, NodeIndex>,
}

impl WorkflowGraph {
    pub fn build(document: &WorkflowDocument) -> Self {
        let mut graph = DiGraph::new();
        let mut node_indices = HashMap::new();
        let mut name_indices = HashMap::new();

        for node in &document.nodes {
            if node_indices.contains_key(&node.id) {
                continue;
            }
            let idx = graph.add_node(node.id.clone());
            node_indices.insert(node.id.clone(), idx);
            if let Some(name) = &node.name {
                name_indices.entry(name.clone()).or_insert(idx);
            }
        }

        let mut wg = WorkflowGraph {
            graph,
            node_indices,
            name_indices,
        };

        for conn in &document.connections {
            if let (Some(s), Some(t)) = (wg.resolve(&conn.source), wg.resolve(&conn.target)) {
                wg.graph.add_edge(
                    s,
                    t,
                    EdgeLabel {
                        source_port: conn.source_port.clone(),
                        target_port: conn.target_port.clone(),
                    },
                );
            }
        }

        wg
    }

    /// Resolve a connection endpoint: node id first, then node name.
    pub fn resolve(&self, reference: &str) -> Option<NodeIndex> {
        self.node_indices
            .get(reference)
            .or_else(|| self.name_indices.get(reference))
            .copied()
    }

    /// Node id that a connection endpoint resolves to.
    pub fn resolve_id(&self, reference: &str) -> Option<&str> {
        self.resolve(reference).map(|idx| self.graph[idx].as_str())
    }

    pub fn successors(&self, node_id: &str) -> Vec<&str> {
        self.neighbors(node_id, Direction::Outgoing)
    }

    pub fn predecessors(&self, node_id: &str) -> Vec<&str> {
        self.neighbors(node_id, Direction::Incoming)
    }

    fn neighbors(&self, node_id: &str, dir: Direction) -> Vec<&str> {
        let Some(&idx) = self.node_indices.get(node_id) else {
            return vec![];
        };
        self.graph
            .neighbors_directed(idx, dir)
            .map(|n| self.graph[n].as_str())
            .collect()
    }

    /// Inbound edges from other nodes. Self-loops do not count.
    pub fn incoming_count(&self, node_id: &str) -> usize {
        self.predecessors(node_id)
            .into_iter()
            .filter(|p| *p != node_id)
            .count()
    }

    pub fn outgoing_count(&self, node_id: &str) -> usize {
        self.successors(node_id).len()
    }

    /// Sub-nodes (chat models, memories, tools) attach to their parent through
    /// an `ai_*` output and never receive inbound connections.
    pub fn is_sub_node(&self, node_id: &str) -> bool {
        let Some(&idx) = self.node_indices.get(node_id) else {
            return false;
        };
        self.graph
            .edges_directed(idx, Direction::Outgoing)
            .any(|e| e.weight().source_port.is_ai())
    }

    pub fn has_self_loop(&self, node_id: &str) -> bool {
        self.node_indices
            .get(node_id)
            .is_some_and(|&idx| self.graph.find_edge(idx, idx).is_some())
    }
}
