// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Graph fixture with observable allocators.

use std::rc::Rc;

use kiln_graph::{
    GraphError, NodeAllocators, NodeContext, NodeManager, NodeRef, TrackingAllocator,
};

use crate::nodes::register_test_nodes;

/// Tracking allocators plus a manager with the scalar test classes registered.
///
/// # Example
///
/// ```
/// use kiln_dry_tests::{GraphFixture, VALUE_GENERATOR};
///
/// let fx = GraphFixture::new();
/// let node = fx.create(VALUE_GENERATOR).unwrap();
/// assert_eq!(fx.live_nodes(), 1);
/// drop(node);
/// assert_eq!(fx.live_nodes(), 0);
/// ```
#[derive(Debug)]
pub struct GraphFixture {
    /// Allocator recording node bookkeeping.
    pub nodes: Rc<TrackingAllocator>,
    /// Allocator recording node data.
    pub data: Rc<TrackingAllocator>,
    /// Manager wired to both allocators.
    pub manager: NodeManager,
}

impl GraphFixture {
    /// Fresh allocators, default config, test classes registered.
    #[allow(clippy::expect_used)]
    pub fn new() -> Self {
        let nodes = Rc::new(TrackingAllocator::new("test-nodes"));
        let data = Rc::new(TrackingAllocator::new("test-node-data"));
        let ctx = NodeContext::with_allocators(NodeAllocators::new(nodes.clone(), data.clone()));
        let mut manager = NodeManager::new(ctx);
        register_test_nodes(&mut manager)
            .expect("scalar test classes should register in a fresh manager");
        Self {
            nodes,
            data,
            manager,
        }
    }

    /// Context shared by every node built through the fixture.
    pub fn ctx(&self) -> &NodeContext {
        self.manager.context()
    }

    /// Instantiates a registered class.
    pub fn create(&self, class_name: &str) -> Result<NodeRef, GraphError> {
        self.manager.create_node(class_name)
    }

    /// Nodes currently alive.
    pub fn live_nodes(&self) -> usize {
        self.nodes.live_objects()
    }

    /// Node data instances currently alive.
    pub fn live_data(&self) -> usize {
        self.data.live_objects()
    }
}

impl Default for GraphFixture {
    fn default() -> Self {
        Self::new()
    }
}
