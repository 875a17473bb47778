//! Compiled-in default data sets.
//!
//! These are the offline defaults every install starts from; edited copies
//! live in the mutable store under their own keys and can be reset back to
//! these at any time.

use serde::Deserialize;

use fieldserve_core::{DomainError, DomainResult};

use crate::graph::{ChecklistGraph, ChecklistNode};
use crate::procedure::Procedure;

const DEFAULT_FLOW: &str = include_str!("../data/troubleshooting_flow.json");
const DEFAULT_PROCEDURES: &str = include_str!("../data/procedures.json");

#[derive(Debug, Deserialize)]
struct FlowFile {
    entry: String,
    nodes: Vec<ChecklistNode>,
}

/// Parse and validate the shipped troubleshooting flow.
pub fn default_graph() -> DomainResult<ChecklistGraph> {
    let file: FlowFile = serde_json::from_str(DEFAULT_FLOW)
        .map_err(|e| DomainError::data_integrity(format!("default flow is malformed: {e}")))?;
    ChecklistGraph::from_nodes(file.entry, file.nodes)
}

/// Parse the shipped knowledge-base procedures.
pub fn default_procedures() -> DomainResult<Vec<Procedure>> {
    serde_json::from_str(DEFAULT_PROCEDURES)
        .map_err(|e| DomainError::data_integrity(format!("default procedures are malformed: {e}")))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use proptest::prelude::*;

    use super::*;

    #[test]
    fn shipped_flow_is_valid() {
        let graph = default_graph().unwrap();
        assert_eq!(graph.entry(), ChecklistGraph::ENTRY);
        assert!(graph.len() > 20);
    }

    #[test]
    fn shipped_procedures_parse() {
        let procedures = default_procedures().unwrap();
        assert!(!procedures.is_empty());
        assert!(procedures.iter().all(|p| !p.id.is_empty()));
    }

    /// Depth-first cycle check over option edges.
    fn is_acyclic(graph: &ChecklistGraph) -> bool {
        fn visit(
            graph: &ChecklistGraph,
            id: &str,
            in_progress: &mut BTreeSet<String>,
            done: &mut BTreeSet<String>,
        ) -> bool {
            if done.contains(id) {
                return true;
            }
            if !in_progress.insert(id.to_string()) {
                return false;
            }
            if let Some(ChecklistNode::Question { options, .. }) = graph.node(id) {
                for option in options {
                    if !visit(graph, &option.target, in_progress, done) {
                        return false;
                    }
                }
            }
            in_progress.remove(id);
            done.insert(id.to_string());
            true
        }

        let mut in_progress = BTreeSet::new();
        let mut done = BTreeSet::new();
        graph
            .nodes()
            .all(|n| visit(graph, n.id(), &mut in_progress, &mut done))
    }

    #[test]
    fn shipped_flow_is_a_dag() {
        let graph = default_graph().unwrap();
        assert!(is_acyclic(&graph));
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 64,
            ..ProptestConfig::default()
        })]

        /// From any node reachable via a fixed answer pattern, walking the
        /// flow terminates within the graph's node count.
        #[test]
        fn any_answer_pattern_terminates(choices in prop::collection::vec(0usize..3, 1..64)) {
            let graph = default_graph().unwrap();
            let mut session = crate::session::ChecklistSession::start(&graph);

            let mut steps = 0usize;
            for choice in choices {
                if session.is_finished() {
                    break;
                }
                // Clamp into range so every pick is a legal answer.
                let options = match session.current() {
                    ChecklistNode::Question { options, .. } => options.len(),
                    ChecklistNode::Terminal { .. } => unreachable!(),
                };
                session.choose(choice % options).unwrap();
                steps += 1;
                prop_assert!(steps <= graph.len());
            }
        }
    }
}
