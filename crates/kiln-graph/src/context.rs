// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Construction context handed to every node.

use std::rc::Rc;

use crate::alloc::{NodeAllocators, TrackingAllocator};
use crate::config::{ConfigError, GraphConfig};

/// Allocators and configuration shared by nodes built together.
///
/// Cloning is cheap: both members are reference counted.
#[derive(Debug, Clone)]
pub struct NodeContext {
    allocators: NodeAllocators,
    config: Rc<GraphConfig>,
}

impl NodeContext {
    /// Builds a context from explicit allocators and a validated config.
    pub fn new(allocators: NodeAllocators, config: GraphConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            allocators,
            config: Rc::new(config),
        })
    }

    /// Context with the default config.
    pub fn with_allocators(allocators: NodeAllocators) -> Self {
        Self {
            allocators,
            config: Rc::new(GraphConfig::default()),
        }
    }

    /// Context with default config and fresh tracking allocators named
    /// `"node"` and `"node-data"`.
    pub fn tracking() -> Self {
        Self::with_allocators(NodeAllocators::new(
            Rc::new(TrackingAllocator::new("node")),
            Rc::new(TrackingAllocator::new("node-data")),
        ))
    }

    /// The node and node-data allocators.
    pub fn allocators(&self) -> &NodeAllocators {
        &self.allocators
    }

    /// Shared graph configuration.
    pub fn config(&self) -> &GraphConfig {
        &self.config
    }
}
