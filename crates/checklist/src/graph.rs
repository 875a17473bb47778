//! Checklist graph: node types and load-time validation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use fieldserve_core::{DomainError, DomainResult};

/// An answer a technician can pick on a question node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistOption {
    pub label: String,
    /// Id of the node this answer leads to.
    pub target: String,
}

/// A node in the troubleshooting flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ChecklistNode {
    Question {
        id: String,
        prompt: String,
        options: Vec<ChecklistOption>,
    },
    Terminal {
        id: String,
        resolution: String,
    },
}

impl ChecklistNode {
    pub fn id(&self) -> &str {
        match self {
            ChecklistNode::Question { id, .. } => id,
            ChecklistNode::Terminal { id, .. } => id,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ChecklistNode::Terminal { .. })
    }
}

/// Immutable troubleshooting graph with a single entry node.
///
/// Construction validates referential integrity once; after that, lookups
/// cannot dangle and traversal needs no per-step checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistGraph {
    entry: String,
    nodes: BTreeMap<String, ChecklistNode>,
}

impl ChecklistGraph {
    /// Entry node id of the shipped data set.
    pub const ENTRY: &'static str = "start";

    /// Build a graph from a node list, refusing malformed data sets.
    ///
    /// Fails with [`DomainError::DataIntegrity`] on duplicate node ids, a
    /// missing entry node, or any option target that does not resolve.
    pub fn from_nodes(entry: impl Into<String>, nodes: Vec<ChecklistNode>) -> DomainResult<Self> {
        let entry = entry.into();
        let mut map = BTreeMap::new();
        for node in nodes {
            let id = node.id().to_string();
            if map.insert(id.clone(), node).is_some() {
                return Err(DomainError::data_integrity(format!(
                    "duplicate checklist node id '{id}'"
                )));
            }
        }

        let graph = Self { entry, nodes: map };
        graph.validate()?;
        Ok(graph)
    }

    /// Validate referential integrity of the whole graph.
    pub fn validate(&self) -> DomainResult<()> {
        if !self.nodes.contains_key(&self.entry) {
            return Err(DomainError::data_integrity(format!(
                "entry node '{}' is missing",
                self.entry
            )));
        }

        for node in self.nodes.values() {
            if let ChecklistNode::Question { id, options, .. } = node {
                if options.is_empty() {
                    return Err(DomainError::data_integrity(format!(
                        "question node '{id}' has no options"
                    )));
                }
                for option in options {
                    if !self.nodes.contains_key(&option.target) {
                        return Err(DomainError::data_integrity(format!(
                            "node '{id}' references missing target '{}'",
                            option.target
                        )));
                    }
                }
            }
        }

        Ok(())
    }

    pub fn entry(&self) -> &str {
        &self.entry
    }

    pub fn node(&self, id: &str) -> Option<&ChecklistNode> {
        self.nodes.get(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &ChecklistNode> {
        self.nodes.values()
    }
}
