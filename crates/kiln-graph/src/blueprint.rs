// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Serializable description of a node subgraph.
//!
//! A blueprint records class names and input order only; node parameters
//! and cached data are not part of it. Shared inputs are written once per
//! consumer, so rebuilding a blueprint yields a tree.

use serde::{Deserialize, Serialize};

/// One node of a blueprint tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeBlueprint {
    /// Class name used to recreate the node through the node manager.
    pub class: String,
    /// Input subtrees, in input order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inputs: Vec<NodeBlueprint>,
}

impl NodeBlueprint {
    /// A blueprint node without inputs.
    pub fn new(class: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            inputs: Vec::new(),
        }
    }

    /// Appends an input subtree.
    pub fn with_input(mut self, input: Self) -> Self {
        self.inputs.push(input);
        self
    }

    /// Number of nodes in the tree, this one included.
    pub fn node_count(&self) -> usize {
        1 + self.inputs.iter().map(Self::node_count).sum::<usize>()
    }
}
