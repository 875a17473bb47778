//! Checklist traversal: a cursor over an immutable graph.

use fieldserve_core::{DomainError, DomainResult};

use crate::graph::{ChecklistGraph, ChecklistNode};

/// A single guided walk through the troubleshooting flow.
///
/// Traversal is deterministic: the same node id and option index always yield
/// the same next node. The session only moves its cursor; it has no other
/// side effects. The visited trail exists purely so a presentation layer can
/// offer a "back" affordance.
#[derive(Debug, Clone)]
pub struct ChecklistSession<'a> {
    graph: &'a ChecklistGraph,
    current: String,
    visited: Vec<String>,
}

impl<'a> ChecklistSession<'a> {
    /// Start a session at the graph's entry node.
    pub fn start(graph: &'a ChecklistGraph) -> Self {
        Self {
            graph,
            current: graph.entry().to_string(),
            visited: Vec::new(),
        }
    }

    /// The node the cursor is on.
    ///
    /// The graph was validated at load, so the cursor can only point at an
    /// existing node.
    pub fn current(&self) -> &ChecklistNode {
        self.graph
            .node(&self.current)
            .expect("session cursor points at a validated node")
    }

    /// Answer the current question by option index and move the cursor.
    pub fn choose(&mut self, option_index: usize) -> DomainResult<&ChecklistNode> {
        let next = match self.current() {
            ChecklistNode::Terminal { .. } => {
                return Err(DomainError::validation(
                    "cannot answer a terminal node; restart instead",
                ));
            }
            ChecklistNode::Question { options, .. } => options
                .get(option_index)
                .map(|o| o.target.clone())
                .ok_or_else(|| {
                    DomainError::validation(format!(
                        "option index {option_index} out of range ({} options)",
                        options.len()
                    ))
                })?,
        };

        self.visited.push(std::mem::replace(&mut self.current, next));
        Ok(self.current())
    }

    /// Step back to the previously visited node, if any.
    ///
    /// Returns `false` when already at the start of the trail.
    pub fn back(&mut self) -> bool {
        match self.visited.pop() {
            Some(previous) => {
                self.current = previous;
                true
            }
            None => false,
        }
    }

    /// Reset the cursor to the entry node, clearing the trail.
    pub fn restart(&mut self) {
        self.current = self.graph.entry().to_string();
        self.visited.clear();
    }

    /// Ids of the nodes answered so far, oldest first.
    pub fn trail(&self) -> &[String] {
        &self.visited
    }

    pub fn is_finished(&self) -> bool {
        self.current().is_terminal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::ChecklistOption;

    fn scenario_graph() -> ChecklistGraph {
        // start --A--> q1 --C--> terminal2
        //   \----B--> terminal1
        ChecklistGraph::from_nodes(
            "start",
            vec![
                ChecklistNode::Question {
                    id: "start".into(),
                    prompt: "pick".into(),
                    options: vec![
                        ChecklistOption {
                            label: "A".into(),
                            target: "q1".into(),
                        },
                        ChecklistOption {
                            label: "B".into(),
                            target: "terminal1".into(),
                        },
                    ],
                },
                ChecklistNode::Question {
                    id: "q1".into(),
                    prompt: "pick again".into(),
                    options: vec![ChecklistOption {
                        label: "C".into(),
                        target: "terminal2".into(),
                    }],
                },
                ChecklistNode::Terminal {
                    id: "terminal1".into(),
                    resolution: "resolved X".into(),
                },
                ChecklistNode::Terminal {
                    id: "terminal2".into(),
                    resolution: "resolved Y".into(),
                },
            ],
        )
        .unwrap()
    }

    #[test]
    fn selecting_a_then_c_reaches_terminal2() {
        let graph = scenario_graph();
        let mut session = ChecklistSession::start(&graph);

        session.choose(0).unwrap();
        let node = session.choose(0).unwrap();

        assert_eq!(node.id(), "terminal2");
        match node {
            ChecklistNode::Terminal { resolution, .. } => {
                assert_eq!(resolution, "resolved Y");
            }
            _ => panic!("expected terminal node"),
        }
        assert!(session.is_finished());
    }

    #[test]
    fn out_of_range_option_does_not_move_cursor() {
        let graph = scenario_graph();
        let mut session = ChecklistSession::start(&graph);

        let err = session.choose(7).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(session.current().id(), "start");
        assert!(session.trail().is_empty());
    }

    #[test]
    fn terminal_only_offers_restart() {
        let graph = scenario_graph();
        let mut session = ChecklistSession::start(&graph);
        session.choose(1).unwrap();
        assert!(session.is_finished());

        let err = session.choose(0).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        session.restart();
        assert_eq!(session.current().id(), "start");
        assert!(session.trail().is_empty());
    }

    #[test]
    fn back_revisits_previous_question() {
        let graph = scenario_graph();
        let mut session = ChecklistSession::start(&graph);

        assert!(!session.back());
        session.choose(0).unwrap();
        assert_eq!(session.current().id(), "q1");
        assert_eq!(session.trail(), ["start".to_string()]);

        assert!(session.back());
        assert_eq!(session.current().id(), "start");
    }
}
