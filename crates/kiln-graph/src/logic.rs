// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Extension point implemented by concrete node types.

use std::any::Any;

use crate::data::{DataContent, NodeData, NodeDataRef};

/// Type-specific behavior plugged into a generator or operator node.
///
/// The graph core owns the protocol (allocation timing, dirty tracking,
/// input walks); implementors only say how to build empty content and how to
/// fill it.
pub trait NodeLogic: Any {
    /// Class name of this node type, as registered in the node manager.
    fn class_name(&self) -> &'static str;

    /// Builds empty, correctly typed content. No generation happens here.
    ///
    /// Returning `None` reports an allocation failure.
    fn allocate_data(&self) -> Option<DataContent>;

    /// Fills `data` from the current parameters and the inputs' data.
    ///
    /// `inputs` holds one entry per input, in input order; generators get an
    /// empty slice. The node validates `data` after this returns, so
    /// implementations never touch the dirty flag.
    fn generate_data(&mut self, data: &NodeData, inputs: &[NodeDataRef]);

    /// Called with the input index right before that input is removed.
    fn on_remove_input(&mut self, _index: usize) {}

    /// Reports and clears pending parameter changes.
    fn take_parameter_changes(&mut self) -> bool {
        false
    }
}
