//! Edge weights for the scenario execution graph.
//!
//! An edge orders two observations in time. Most edges are unlabeled; an edge
//! is labeled with the virtual user when execution crosses into a different
//! vUser's timeline.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Directed edge weight. An empty label means "unlabeled".
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LabeledEdge {
    label: String,
}

impl LabeledEdge {
    pub fn unlabeled() -> Self {
        LabeledEdge::default()
    }

    pub fn labeled(label: impl Into<String>) -> Self {
        LabeledEdge {
            label: label.into(),
        }
    }

    /// Label marking entry into a virtual user's execution: `vUser <id>`.
    pub fn for_v_user(v_user: &str) -> Self {
        LabeledEdge::labeled(format!("vUser {v_user}"))
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_labeled(&self) -> bool {
        !self.label.is_empty()
    }
}

impl fmt::Display for LabeledEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}
