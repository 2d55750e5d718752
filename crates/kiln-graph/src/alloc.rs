// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Allocator handles supplied to every node and node-data instance.
//!
//! Node bookkeeping and node data are accounted against two distinct
//! allocators so an embedding application can budget them separately. The
//! core never falls back to a global allocator: whoever builds a
//! [`NodeContext`](crate::NodeContext) chooses both.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use tracing::error;

/// Accounting interface consumed by the graph core.
///
/// The core reports the footprint of each object it creates and the same
/// footprint when that object is destroyed. Implementations must not call
/// back into the graph.
pub trait Allocator: fmt::Debug {
    /// Human-readable allocator name for logs.
    fn name(&self) -> &str;

    /// Records the creation of an object of `bytes` bytes.
    fn on_allocate(&self, bytes: usize);

    /// Records the destruction of an object previously reported through
    /// [`on_allocate`](Allocator::on_allocate).
    fn on_release(&self, bytes: usize);
}

/// Allocator that counts live objects and bytes.
///
/// An optional byte budget is advisory: allocations always succeed, but
/// [`is_over_budget`](TrackingAllocator::is_over_budget) reports when the
/// budget is exceeded.
#[derive(Debug)]
pub struct TrackingAllocator {
    name: String,
    live_objects: Cell<usize>,
    live_bytes: Cell<usize>,
    allocations: Cell<u64>,
    releases: Cell<u64>,
    max_bytes: Option<usize>,
}

impl TrackingAllocator {
    /// Creates an allocator with no byte budget.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            live_objects: Cell::new(0),
            live_bytes: Cell::new(0),
            allocations: Cell::new(0),
            releases: Cell::new(0),
            max_bytes: None,
        }
    }

    /// Creates an allocator with an advisory byte budget.
    pub fn with_budget(name: impl Into<String>, max_bytes: usize) -> Self {
        Self {
            max_bytes: Some(max_bytes),
            ..Self::new(name)
        }
    }

    /// Objects allocated and not yet released.
    pub fn live_objects(&self) -> usize {
        self.live_objects.get()
    }

    /// Bytes held by live objects.
    pub fn live_bytes(&self) -> usize {
        self.live_bytes.get()
    }

    /// Total allocations since creation.
    pub fn allocations(&self) -> u64 {
        self.allocations.get()
    }

    /// Total releases since creation.
    pub fn releases(&self) -> u64 {
        self.releases.get()
    }

    /// Returns `true` if live bytes exceed the configured budget.
    ///
    /// Always `false` when no budget was set.
    pub fn is_over_budget(&self) -> bool {
        self.max_bytes.is_some_and(|max| self.live_bytes.get() > max)
    }
}

impl Allocator for TrackingAllocator {
    fn name(&self) -> &str {
        &self.name
    }

    fn on_allocate(&self, bytes: usize) {
        self.live_objects.set(self.live_objects.get() + 1);
        self.live_bytes.set(self.live_bytes.get() + bytes);
        self.allocations.set(self.allocations.get() + 1);
    }

    fn on_release(&self, bytes: usize) {
        if self.live_objects.get() == 0 {
            error!(allocator = %self.name, bytes, "release without a matching allocation");
        }
        self.live_objects.set(self.live_objects.get().saturating_sub(1));
        self.live_bytes.set(self.live_bytes.get().saturating_sub(bytes));
        self.releases.set(self.releases.get() + 1);
    }
}

/// The pair of allocators handed to every node constructor.
#[derive(Debug, Clone)]
pub struct NodeAllocators {
    /// Accounts node bookkeeping (the node itself, its input list).
    pub node: Rc<dyn Allocator>,
    /// Accounts node data instances.
    pub data: Rc<dyn Allocator>,
}

impl NodeAllocators {
    /// Bundles the node and node-data allocators.
    pub fn new(node: Rc<dyn Allocator>, data: Rc<dyn Allocator>) -> Self {
        Self { node, data }
    }
}
