// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

// Operator role: bounded fan-in. Both walks visit every input in order, even
// after one has reported a change, so each input subtree is refreshed on
// every pass.

use tracing::trace;

use super::{InputBounds, Node, NodeRef};
use crate::data::NodeDataRef;
use crate::error::GraphError;

pub(super) fn check_add_input(node: &Node, bounds: InputBounds) -> Result<(), GraphError> {
    if node.inputs.len() >= bounds.max() {
        return Err(node.report(GraphError::OperatorInputLimit {
            class: node.class(),
            max: bounds.max(),
        }));
    }
    Ok(())
}

fn check_input_count(node: &Node, bounds: InputBounds) -> Result<(), GraphError> {
    let count = node.inputs.len();
    if bounds.contains(count) {
        return Ok(());
    }
    Err(node.report(GraphError::InputCountOutOfBounds {
        class: node.class(),
        count,
        min: bounds.min(),
        max: bounds.max(),
    }))
}

pub(super) fn update(this: &NodeRef, bounds: InputBounds) -> bool {
    let inputs = {
        let node = this.0.borrow();
        if check_input_count(&node, bounds).is_err() {
            return node.is_data_dirty();
        }
        node.inputs.clone()
    };

    let mut dirty = false;
    for input in &inputs {
        dirty |= input.update();
    }

    let mut node = this.0.borrow_mut();
    dirty |= node.refresh_parameters();
    trace!(class = node.class(), dirty, inputs = inputs.len(), "operator updated");
    if dirty {
        node.invalidate_data();
        return true;
    }
    node.is_data_dirty()
}

pub(super) fn get_updated_data(
    this: &NodeRef,
    bounds: InputBounds,
    updated: &mut bool,
) -> Option<NodeDataRef> {
    let (data, inputs) = {
        let mut node = this.0.borrow_mut();
        if check_input_count(&node, bounds).is_err() {
            return node.data.clone().filter(|data| !data.is_dirty());
        }
        (node.ensure_data().ok()?, node.inputs.clone())
    };

    let mut input_updated = false;
    let mut input_data = Vec::with_capacity(inputs.len());
    let mut missing = None;
    for (index, input) in inputs.iter().enumerate() {
        match input.get_updated_data(&mut input_updated) {
            Some(data) => input_data.push(data),
            None => {
                missing.get_or_insert(index);
            }
        }
    }

    let mut node = this.0.borrow_mut();
    if let Some(index) = missing {
        // Keep the previous content rather than generating from a partial
        // input set. Content that was never generated is not handed out.
        node.report(GraphError::InputDataUnavailable {
            class: node.class(),
            index,
        });
        return (!data.is_dirty()).then_some(data);
    }
    if input_updated || data.is_dirty() {
        node.regenerate(&data, &input_data);
        *updated = true;
    }
    Some(data)
}
