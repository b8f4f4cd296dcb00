use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{AdweaveError, Result};
use crate::types::ContentType;

/// A node in a task graph.
///
/// Each node binds one agent capability to a static input payload. The
/// `depends_on` edges reference other node ids within the same plan; the
/// executor feeds those nodes' outputs into this node's payload under a
/// `dependencies` key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanNode {
    /// Unique identifier within the plan.
    pub id: String,
    /// Name of the agent capability that executes this node.
    pub agent: String,
    /// Static input payload handed to the agent.
    #[serde(default)]
    pub input: serde_json::Value,
    /// Ids of nodes whose outputs this node consumes.
    #[serde(default)]
    pub depends_on: Vec<String>,
}

impl PlanNode {
    pub fn new(id: impl Into<String>, agent: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            agent: agent.into(),
            input: serde_json::Value::Null,
            depends_on: vec![],
        }
    }

    pub fn with_input(mut self, input: serde_json::Value) -> Self {
        self.input = input;
        self
    }

    pub fn depends_on(mut self, ids: Vec<String>) -> Self {
        self.depends_on = ids;
        self
    }
}

/// An immutable task-graph description: nodes plus dependency edges.
///
/// Declaration order matters — the executor scans nodes in this order on
/// every pass, so it is also the tie-break among simultaneously-ready nodes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plan {
    pub description: String,
    pub content_types: Vec<ContentType>,
    pub nodes: Vec<PlanNode>,
}

impl Plan {
    pub fn new(description: impl Into<String>, content_types: Vec<ContentType>) -> Self {
        Self {
            description: description.into(),
            content_types,
            nodes: vec![],
        }
    }

    pub fn with_nodes(mut self, nodes: Vec<PlanNode>) -> Self {
        self.nodes = nodes;
        self
    }

    pub fn node(&self, id: &str) -> Option<&PlanNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Check structural invariants: node ids unique, every dependency
    /// references another node in this plan, no self-dependencies.
    ///
    /// Cycles are not rejected here — the executor detects them at runtime
    /// as graph stagnation.
    pub fn validate(&self) -> Result<()> {
        if self.nodes.is_empty() {
            return Err(AdweaveError::Config("Plan has no nodes".into()));
        }

        let mut seen = HashSet::new();
        for node in &self.nodes {
            if !seen.insert(node.id.as_str()) {
                return Err(AdweaveError::Config(format!(
                    "Duplicate node id in plan: '{}'",
                    node.id
                )));
            }
        }

        for node in &self.nodes {
            for dep in &node.depends_on {
                if dep == &node.id {
                    return Err(AdweaveError::Config(format!(
                        "Node '{}' depends on itself",
                        node.id
                    )));
                }
                if !seen.contains(dep.as_str()) {
                    return Err(AdweaveError::Config(format!(
                        "Node '{}' depends on unknown node '{}'",
                        node.id, dep
                    )));
                }
            }
        }

        Ok(())
    }
}
