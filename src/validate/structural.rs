//! Graph-level structural rules: unique ids (3), endpoint resolution (4),
//! reachability (6) and cycles (7).

use std::collections::{HashMap, HashSet};

use petgraph::algo::tarjan_scc;
use petgraph::visit::Bfs;

use crate::config::CycleMode;
use crate::error::{Check, Finding, Severity};
use crate::parse::graph::WorkflowGraph;
use crate::parse::types::{Node, WorkflowDocument};
use crate::registry::{NodeKind, NodeTypeRegistry};

pub fn s005_unique_node_ids(document: &WorkflowDocument, findings: &mut Vec<Finding>) {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut order = Vec::new();
    for node in &document.nodes {
        let count = counts.entry(node.id.as_str()).or_insert(0);
        if *count == 0 {
            order.push(node.id.as_str());
        }
        *count += 1;
    }

    for id in order {
        let count = counts[id];
        if count > 1 {
            findings.push(Finding::error(
                Check::UniqueIds,
                "S005",
                format!("duplicate node id '{}' ({} occurrences)", id, count),
                Some(id.to_string()),
            ));
        }
    }
}

/// One finding per unresolved endpoint. A dangling destination is reported
/// against the resolved source node.
pub fn s006_s007_endpoints_resolve(
    document: &WorkflowDocument,
    graph: &WorkflowGraph,
    findings: &mut Vec<Finding>,
) {
    for conn in &document.connections {
        let source = graph.resolve_id(&conn.source);
        if source.is_none() {
            findings.push(Finding::error(
                Check::Endpoints,
                "S006",
                format!(
                    "connection references unknown source node '{}'",
                    conn.source
                ),
                None,
            ));
        }
        if graph.resolve(&conn.target).is_none() {
            findings.push(Finding::error(
                Check::Endpoints,
                "S007",
                format!(
                    "connection references unknown destination node '{}'",
                    conn.target
                ),
                source.map(str::to_string),
            ));
        }
    }
}

pub fn r001_has_trigger(
    document: &WorkflowDocument,
    registry: &NodeTypeRegistry,
    severity: Severity,
    findings: &mut Vec<Finding>,
) {
    if !document
        .nodes
        .iter()
        .any(|n| registry.is_trigger(&n.node_type))
    {
        findings.push(Finding::with_severity(
            severity,
            Check::Reachability,
            "R001",
            "workflow has no trigger node",
            None,
        ));
    }
}

/// Orphans (R002) have no inbound connection at all; unreachable nodes (R003)
/// have inbound connections but no path from any trigger. Triggers,
/// annotations, disabled nodes and sub-nodes are exempt. Without any trigger
/// there is nothing to be reachable from, and R001 already covers that.
pub fn r002_r003_reachable(
    document: &WorkflowDocument,
    graph: &WorkflowGraph,
    registry: &NodeTypeRegistry,
    findings: &mut Vec<Finding>,
) {
    let nodes = distinct_nodes(document);

    let mut reachable = HashSet::new();
    let mut has_trigger = false;
    for node in nodes.iter().filter(|n| registry.is_trigger(&n.node_type)) {
        has_trigger = true;
        let Some(&start) = graph.node_indices.get(&node.id) else {
            continue;
        };
        let mut bfs = Bfs::new(&graph.graph, start);
        while let Some(nx) = bfs.next(&graph.graph) {
            reachable.insert(nx);
        }
    }

    if !has_trigger {
        return;
    }

    for node in nodes {
        if node.disabled
            || graph.is_sub_node(&node.id)
            || registry.is_trigger(&node.node_type)
            || registry.kind_of(&node.node_type) == Some(NodeKind::Annotation)
        {
            continue;
        }

        if graph.incoming_count(&node.id) == 0 {
            findings.push(Finding::warning(
                Check::Reachability,
                "R002",
                format!("node '{}' has no inbound connection", node.label()),
                Some(node.id.clone()),
            ));
            continue;
        }

        let Some(idx) = graph.node_indices.get(&node.id) else {
            continue;
        };
        if !reachable.contains(idx) {
            findings.push(Finding::warning(
                Check::Reachability,
                "R003",
                format!("node '{}' is not reachable from any trigger", node.label()),
                Some(node.id.clone()),
            ));
        }
    }
}

pub fn c001_c002_cycles(
    document: &WorkflowDocument,
    graph: &WorkflowGraph,
    mode: CycleMode,
    findings: &mut Vec<Finding>,
) {
    for node in distinct_nodes(document) {
        if graph.has_self_loop(&node.id) {
            findings.push(Finding::warning(
                Check::Cycles,
                "C002",
                format!("node '{}' is connected to itself", node.label()),
                Some(node.id.clone()),
            ));
        }
    }

    let Some(severity) = mode.severity() else {
        return;
    };

    for component in tarjan_scc(&graph.graph) {
        if component.len() < 2 {
            continue;
        }
        let mut ids: Vec<&str> = component.iter().map(|&idx| graph.graph[idx].as_str()).collect();
        ids.sort_unstable();
        findings.push(Finding::with_severity(
            severity,
            Check::Cycles,
            "C001",
            format!("cycle detected between nodes: {}", ids.join(", ")),
            Some(ids[0].to_string()),
        ));
    }
}

/// Nodes with duplicate ids collapse onto their first occurrence.
fn distinct_nodes(document: &WorkflowDocument) -> Vec<&Node> {
    let mut seen = HashSet::new();
    document
        .nodes
        .iter()
        .filter(|n| seen.insert(n.id.as_str()))
        .collect()
}
