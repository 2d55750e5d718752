// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

// Generator role: leaves that produce data from parameters alone.

use tracing::trace;

use super::{Node, NodeRef};
use crate::data::NodeDataRef;
use crate::error::GraphError;

pub(super) fn reject_input(node: &Node) -> Result<(), GraphError> {
    Err(node.report(GraphError::GeneratorInput {
        class: node.class(),
    }))
}

pub(super) fn update(this: &NodeRef) -> bool {
    let mut node = this.0.borrow_mut();
    if node.refresh_parameters() {
        node.invalidate_data();
    }
    let dirty = node.is_data_dirty();
    trace!(class = node.class(), dirty, "generator updated");
    dirty
}

pub(super) fn get_updated_data(this: &NodeRef, updated: &mut bool) -> Option<NodeDataRef> {
    let mut node = this.0.borrow_mut();
    let data = node.ensure_data().ok()?;
    if data.is_dirty() {
        node.regenerate(&data, &[]);
        *updated = true;
    }
    Some(data)
}
