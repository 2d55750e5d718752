// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

// Output role: a dataless root forwarding to its single input.

use super::{Node, NodeRef};
use crate::data::NodeDataRef;
use crate::error::GraphError;

pub(super) fn check_add_input(node: &Node) -> Result<(), GraphError> {
    if node.inputs.is_empty() {
        return Ok(());
    }
    Err(node.report(GraphError::OutputAlreadyConnected {
        class: node.class(),
    }))
}

pub(super) fn check_replace_input(node: &Node, index: usize) -> Result<(), GraphError> {
    if index != 0 {
        return Err(node.report(GraphError::InputIndexOutOfRange {
            class: node.class(),
            index,
            count: node.inputs.len(),
        }));
    }
    if node.inputs.is_empty() {
        return Err(node.report(GraphError::OutputNotConnected {
            class: node.class(),
        }));
    }
    Ok(())
}

fn connected_input(this: &NodeRef) -> Option<NodeRef> {
    let node = this.0.borrow();
    let input = node.inputs.first().cloned();
    if input.is_none() {
        node.report(GraphError::OutputNotConnected {
            class: node.class(),
        });
    }
    input
}

pub(super) fn update(this: &NodeRef) -> bool {
    connected_input(this).is_some_and(|input| input.update())
}

pub(super) fn get_updated_data(this: &NodeRef, updated: &mut bool) -> Option<NodeDataRef> {
    connected_input(this)?.get_updated_data(updated)
}
