// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Name-based node factory.
//!
//! Every concrete node type registers a constructor once, at composition-root
//! startup; afterwards nodes are created by class name. The manager is an
//! ordinary value passed to whatever builds graphs, not a global.

use tracing::{debug, warn};

use crate::blueprint::NodeBlueprint;
use crate::config::GraphConfig;
use crate::context::NodeContext;
use crate::diagnostic;
use crate::error::GraphError;
use crate::node::NodeRef;

/// Constructor stored in the registry. Receives the manager's context.
pub type CreateNodeFn = fn(&NodeContext) -> NodeRef;

#[derive(Debug)]
struct NodeEntry {
    class_name: String,
    create: CreateNodeFn,
}

/// Registry mapping class names to node constructors.
#[derive(Debug)]
pub struct NodeManager {
    ctx: NodeContext,
    entries: Vec<NodeEntry>,
}

impl NodeManager {
    /// Creates an empty registry whose nodes are built with `ctx`.
    pub fn new(ctx: NodeContext) -> Self {
        let capacity = ctx.config().max_registered_classes;
        Self {
            ctx,
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Context handed to every registered constructor.
    pub fn context(&self) -> &NodeContext {
        &self.ctx
    }

    /// Shorthand for `self.context().config()`.
    pub fn config(&self) -> &GraphConfig {
        self.ctx.config()
    }

    /// Registers `create` under `class_name`.
    ///
    /// Names outside the configured length range and registrations past the
    /// table capacity are rejected. Registering a name twice is allowed but
    /// logged; lookups keep returning the first registration.
    pub fn register_node(
        &mut self,
        class_name: &str,
        create: CreateNodeFn,
    ) -> Result<(), GraphError> {
        let config = self.ctx.config();
        if class_name.len() < config.min_class_name_len {
            return Err(diagnostic::report(
                config,
                GraphError::ClassNameTooShort {
                    name: class_name.to_owned(),
                    min: config.min_class_name_len,
                },
            ));
        }
        if class_name.len() > config.max_class_name_len {
            return Err(diagnostic::report(
                config,
                GraphError::ClassNameTooLong {
                    name: class_name.to_owned(),
                    max: config.max_class_name_len,
                },
            ));
        }
        if self.entries.len() >= config.max_registered_classes {
            return Err(diagnostic::report(
                config,
                GraphError::RegistryFull {
                    capacity: config.max_registered_classes,
                },
            ));
        }
        if self.is_registered(class_name) {
            warn!(class = class_name, "node class registered twice, keeping the first constructor");
        }
        self.entries.push(NodeEntry {
            class_name: class_name.to_owned(),
            create,
        });
        debug!(class = class_name, registered = self.entries.len(), "node class registered");
        Ok(())
    }

    /// Instantiates the node class registered as `class_name`.
    pub fn create_node(&self, class_name: &str) -> Result<NodeRef, GraphError> {
        let Some(entry) = self.entries.iter().find(|e| e.class_name == class_name) else {
            return Err(diagnostic::report(
                self.ctx.config(),
                GraphError::UnknownClass {
                    name: class_name.to_owned(),
                },
            ));
        };
        Ok((entry.create)(&self.ctx))
    }

    /// Rebuilds a blueprint tree, attaching inputs in order.
    ///
    /// Stops at the first failure; nodes built so far are dropped.
    pub fn instantiate(&self, blueprint: &NodeBlueprint) -> Result<NodeRef, GraphError> {
        let node = self.create_node(&blueprint.class)?;
        for input in &blueprint.inputs {
            let input = self.instantiate(input)?;
            node.add_input(&input)?;
        }
        Ok(node)
    }

    /// Returns `true` if a constructor is registered under `class_name`.
    pub fn is_registered(&self, class_name: &str) -> bool {
        self.entries.iter().any(|e| e.class_name == class_name)
    }

    /// Number of registrations, duplicates included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered class names, in registration order.
    pub fn class_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|e| e.class_name.as_str())
    }
}
