// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Nodes: one vertex of a computation DAG.
//!
//! A node owns its inputs (shared [`NodeRef`] handles, stored contiguously)
//! and at most one [`NodeData`]. Its role decides how many inputs it accepts
//! and how `update` / `get_updated_data` walk the graph:
//!
//! * **generator** leaves have no inputs and regenerate when dirty;
//! * **operator** nodes take a bounded number of inputs, refresh every input
//!   on each pass, then regenerate if anything changed;
//! * **output** roots take exactly one input, own no data and forward the
//!   input's data handle unchanged.
//!
//! Every topology violation goes through the diagnostic channel and leaves
//! the node untouched.

mod generator;
mod operator;
mod output;

use std::any::Any;
use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use tracing::{debug, trace};

use crate::blueprint::NodeBlueprint;
use crate::config::GraphConfig;
use crate::context::NodeContext;
use crate::data::{NodeData, NodeDataRef};
use crate::diagnostic;
use crate::error::GraphError;
use crate::handle::{Handle, WeakHandle};
use crate::logic::NodeLogic;

/// Structural role of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Leaf producer, no inputs.
    Generator,
    /// Interior node with a bounded number of inputs.
    Operator,
    /// Dataless root with exactly one input.
    Output,
}

/// Inclusive range of input counts accepted by an operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InputBounds {
    min: usize,
    max: usize,
}

impl InputBounds {
    /// Bounds `[min, max]`. Requires `min <= max` and `max >= 1`.
    pub fn new(min: usize, max: usize) -> Result<Self, GraphError> {
        if min > max || max == 0 {
            return Err(GraphError::InvalidInputBounds { min, max });
        }
        Ok(Self { min, max })
    }

    /// Exactly `count` inputs (at least one).
    pub const fn exactly(count: usize) -> Self {
        let count = if count == 0 { 1 } else { count };
        Self {
            min: count,
            max: count,
        }
    }

    /// Between one and `max` inputs (`max` of zero is treated as one).
    pub const fn one_to(max: usize) -> Self {
        Self {
            min: 1,
            max: if max == 0 { 1 } else { max },
        }
    }

    /// Smallest accepted input count.
    pub const fn min(&self) -> usize {
        self.min
    }

    /// Largest accepted input count.
    pub const fn max(&self) -> usize {
        self.max
    }

    /// Returns `true` if `count` inputs satisfy the bounds.
    pub const fn contains(&self, count: usize) -> bool {
        count >= self.min && count <= self.max
    }
}

#[derive(Debug, Clone, Copy)]
enum Role {
    Generator,
    Operator(InputBounds),
    Output,
}

// Output nodes carry no type-specific behavior; this only supplies the class
// name.
struct OutputLogic {
    class: &'static str,
}

impl NodeLogic for OutputLogic {
    fn class_name(&self) -> &'static str {
        self.class
    }

    fn allocate_data(&self) -> Option<crate::data::DataContent> {
        None
    }

    fn generate_data(&mut self, _data: &NodeData, _inputs: &[NodeDataRef]) {}
}

pub(crate) struct Node {
    role: Role,
    logic: Box<dyn NodeLogic>,
    inputs: Vec<NodeRef>,
    data: Option<NodeDataRef>,
    ctx: NodeContext,
    #[cfg(feature = "debug-names")]
    name: Option<String>,
}

impl Node {
    fn footprint(config: &GraphConfig) -> usize {
        std::mem::size_of::<RefCell<Self>>() + config.max_inputs * std::mem::size_of::<NodeRef>()
    }

    fn class(&self) -> &'static str {
        self.logic.class_name()
    }

    fn report(&self, violation: GraphError) -> GraphError {
        diagnostic::report(self.ctx.config(), violation)
    }

    fn invalidate_data(&self) {
        if let Some(data) = &self.data {
            data.invalidate();
        }
    }

    fn is_data_dirty(&self) -> bool {
        self.data.as_ref().is_none_or(|data| data.is_dirty())
    }

    // Parameter edits invalidate allocated data; pending changes are consumed
    // either way.
    fn refresh_parameters(&mut self) -> bool {
        self.logic.take_parameter_changes() && self.data.is_some()
    }

    fn ensure_data(&mut self) -> Result<NodeDataRef, GraphError> {
        if let Some(data) = &self.data {
            return Ok(data.clone());
        }
        if matches!(self.role, Role::Output) {
            return Err(self.report(GraphError::OutputHasNoData {
                class: self.class(),
            }));
        }
        let Some(content) = self.logic.allocate_data() else {
            return Err(self.report(GraphError::DataAllocationFailed {
                class: self.class(),
            }));
        };
        let data = Handle::new(NodeData::new(
            content,
            Rc::clone(&self.ctx.allocators().data),
        ));
        debug!(class = self.class(), "node data allocated");
        self.data = Some(data.clone());
        Ok(data)
    }

    // Invalidate first so the GPU copy is flagged even when only an input
    // changed.
    fn regenerate(&mut self, data: &NodeData, inputs: &[NodeDataRef]) {
        data.invalidate();
        self.logic.generate_data(data, inputs);
        data.validate();
        debug!(class = self.class(), inputs = inputs.len(), "node data regenerated");
    }

    fn detach_all_inputs(&mut self) -> usize {
        let count = self.inputs.len();
        for index in (0..count).rev() {
            self.logic.on_remove_input(index);
            self.inputs.pop();
        }
        count
    }
}

impl Drop for Node {
    fn drop(&mut self) {
        self.detach_all_inputs();
        self.data = None;
        self.ctx
            .allocators()
            .node
            .on_release(Self::footprint(self.ctx.config()));
        debug!(class = self.class(), "node destroyed");
    }
}

/// Owned handle to a node.
///
/// Cloning adds an owner; the node is destroyed when the last handle is
/// dropped, releasing its inputs and its data at that point. Equality is
/// identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeRef(Handle<RefCell<Node>>);

impl NodeRef {
    fn from_parts(ctx: &NodeContext, role: Role, logic: Box<dyn NodeLogic>) -> Self {
        let config = ctx.config();
        ctx.allocators().node.on_allocate(Node::footprint(config));
        debug!(class = logic.class_name(), "node created");
        Self(Handle::new(RefCell::new(Node {
            role,
            logic,
            inputs: Vec::with_capacity(config.max_inputs),
            data: None,
            ctx: ctx.clone(),
            #[cfg(feature = "debug-names")]
            name: None,
        })))
    }

    /// Creates a leaf node driven by `logic`.
    pub fn generator(ctx: &NodeContext, logic: impl NodeLogic) -> Self {
        Self::from_parts(ctx, Role::Generator, Box::new(logic))
    }

    /// Creates an interior node accepting between `bounds.min()` and
    /// `bounds.max()` inputs.
    pub fn operator(ctx: &NodeContext, bounds: InputBounds, logic: impl NodeLogic) -> Self {
        Self::from_parts(ctx, Role::Operator(bounds), Box::new(logic))
    }

    /// Creates a dataless root registered as `class_name`.
    pub fn output(ctx: &NodeContext, class_name: &'static str) -> Self {
        Self::from_parts(ctx, Role::Output, Box::new(OutputLogic { class: class_name }))
    }

    // ── Introspection ───────────────────────────────────────────────────

    /// Structural role of this node.
    pub fn kind(&self) -> NodeKind {
        match self.0.borrow().role {
            Role::Generator => NodeKind::Generator,
            Role::Operator(_) => NodeKind::Operator,
            Role::Output => NodeKind::Output,
        }
    }

    /// Accepted input counts: `[0, 0]` for generators, `[1, 1]` for outputs.
    pub fn input_bounds(&self) -> (usize, usize) {
        match self.0.borrow().role {
            Role::Generator => (0, 0),
            Role::Operator(bounds) => (bounds.min(), bounds.max()),
            Role::Output => (1, 1),
        }
    }

    /// Class name this node was created under.
    pub fn class_name(&self) -> &'static str {
        self.0.borrow().class()
    }

    /// Number of live owners of this node.
    pub fn ref_count(&self) -> usize {
        Handle::ref_count(&self.0)
    }

    /// Non-owning observer, used to check when a node is destroyed.
    pub fn downgrade(&self) -> WeakNodeRef {
        WeakNodeRef(Handle::downgrade(&self.0))
    }

    /// Sets the debug name shown in logs and DOT output.
    #[cfg(feature = "debug-names")]
    pub fn set_name(&self, name: impl Into<String>) {
        self.0.borrow_mut().name = Some(name.into());
    }

    /// Debug name, if one was set.
    #[cfg(feature = "debug-names")]
    pub fn name(&self) -> Option<String> {
        self.0.borrow().name.clone()
    }

    // ── Topology ────────────────────────────────────────────────────────

    /// Number of attached inputs.
    pub fn num_inputs(&self) -> usize {
        self.0.borrow().inputs.len()
    }

    /// Snapshot of the inputs, in order.
    pub fn inputs(&self) -> Vec<Self> {
        self.0.borrow().inputs.clone()
    }

    /// Input at `index`, or `None` with a diagnostic when out of range.
    pub fn get_input(&self, index: usize) -> Option<Self> {
        let node = self.0.borrow();
        if let Some(input) = node.inputs.get(index) {
            return Some(input.clone());
        }
        node.report(GraphError::InputIndexOutOfRange {
            class: node.class(),
            index,
            count: node.inputs.len(),
        });
        None
    }

    /// Returns `true` if `node` is one of the direct inputs.
    pub fn is_input(&self, node: &Self) -> bool {
        self.0.borrow().inputs.contains(node)
    }

    /// Appends `input` to the input list and invalidates this node's data.
    ///
    /// Rejected (no change) when the role forbids another input, when the
    /// input capacity is exhausted, or when `input` already depends on this
    /// node.
    pub fn add_input(&self, input: &Self) -> Result<(), GraphError> {
        {
            let node = self.0.borrow();
            match node.role {
                Role::Generator => generator::reject_input(&node)?,
                Role::Operator(bounds) => operator::check_add_input(&node, bounds)?,
                Role::Output => output::check_add_input(&node)?,
            }
            let capacity = node.ctx.config().max_inputs;
            if node.inputs.len() >= capacity {
                return Err(node.report(GraphError::InputCapacityExceeded {
                    class: node.class(),
                    capacity,
                }));
            }
        }
        self.check_acyclic(input)?;

        let mut node = self.0.borrow_mut();
        node.inputs.push(input.clone());
        node.invalidate_data();
        trace!(
            class = node.class(),
            input = input.class_name(),
            inputs = node.inputs.len(),
            "input added"
        );
        Ok(())
    }

    /// Removes every occurrence of `input`, keeping the remaining inputs in
    /// order. The remove hook runs once per occurrence, last one first,
    /// before that occurrence is dropped. Returns the number removed.
    pub fn remove_input(&self, input: &Self) -> Result<usize, GraphError> {
        let mut node = self.0.borrow_mut();
        let mut removed = 0;
        for index in (0..node.inputs.len()).rev() {
            if node.inputs[index] == *input {
                node.logic.on_remove_input(index);
                node.inputs.remove(index);
                removed += 1;
            }
        }
        if removed == 0 {
            return Err(node.report(GraphError::InputNotFound {
                class: node.class(),
            }));
        }
        node.invalidate_data();
        trace!(class = node.class(), removed, inputs = node.inputs.len(), "input removed");
        Ok(removed)
    }

    /// Removes all inputs from last to first, calling the remove hook for
    /// each. Invalidates the data if anything was removed.
    pub fn remove_all_inputs(&self) -> usize {
        let mut node = self.0.borrow_mut();
        let removed = node.detach_all_inputs();
        if removed > 0 {
            node.invalidate_data();
        }
        removed
    }

    /// Swaps the input at `index` for `input`. Replacing an input with
    /// itself changes nothing; otherwise the data is invalidated.
    pub fn replace_input(&self, index: usize, input: &Self) -> Result<(), GraphError> {
        {
            let node = self.0.borrow();
            match node.role {
                Role::Generator => generator::reject_input(&node)?,
                Role::Operator(_) => {}
                Role::Output => output::check_replace_input(&node, index)?,
            }
            match node.inputs.get(index) {
                None => {
                    return Err(node.report(GraphError::InputIndexOutOfRange {
                        class: node.class(),
                        index,
                        count: node.inputs.len(),
                    }))
                }
                Some(current) if current == input => return Ok(()),
                Some(_) => {}
            }
        }
        self.check_acyclic(input)?;

        let mut node = self.0.borrow_mut();
        let previous = std::mem::replace(&mut node.inputs[index], input.clone());
        node.invalidate_data();
        trace!(class = node.class(), index, "input replaced");
        drop(node);
        drop(previous);
        Ok(())
    }

    fn check_acyclic(&self, input: &Self) -> Result<(), GraphError> {
        if !input.depends_on(self) {
            return Ok(());
        }
        let node = self.0.borrow();
        Err(node.report(GraphError::CycleDetected {
            class: node.class(),
            input: input.class_name(),
        }))
    }

    // True when `target` is this node or reachable through its inputs.
    fn depends_on(&self, target: &Self) -> bool {
        let mut stack = vec![self.clone()];
        let mut seen = HashSet::new();
        while let Some(node) = stack.pop() {
            if node == *target {
                return true;
            }
            if seen.insert(node.clone()) {
                stack.extend(node.0.borrow().inputs.iter().cloned());
            }
        }
        false
    }

    // ── Data ────────────────────────────────────────────────────────────

    /// The node's own data handle, as is (possibly dirty, possibly absent).
    ///
    /// Output nodes never own data and always return `None`.
    pub fn data(&self) -> Option<NodeDataRef> {
        self.0.borrow().data.clone()
    }

    /// Returns `true` once the node's own data has been allocated.
    pub fn is_data_allocated(&self) -> bool {
        self.0.borrow().data.is_some()
    }

    /// Returns `true` when the node's own data is dirty or not allocated.
    pub fn is_data_dirty(&self) -> bool {
        self.0.borrow().is_data_dirty()
    }

    /// Marks the node's own data dirty, if allocated.
    pub fn invalidate_data(&self) {
        self.0.borrow().invalidate_data();
    }

    /// Releases this node's data, then does the same for every input.
    ///
    /// Topology is preserved; the next `get_updated_data` reallocates and
    /// regenerates.
    pub fn release_data_and_propagate(&self) {
        let (released, inputs) = {
            let mut node = self.0.borrow_mut();
            let released = node.data.take();
            if released.is_some() {
                debug!(class = node.class(), "node data handle released");
            }
            (released, node.inputs.clone())
        };
        drop(released);
        for input in &inputs {
            input.release_data_and_propagate();
        }
    }

    // ── Evaluation ──────────────────────────────────────────────────────

    /// Refreshes parameters along the subgraph and reports whether this
    /// node's data (or any input's) is dirty.
    ///
    /// Call once per frame, before [`get_updated_data`](Self::get_updated_data),
    /// when external state may have changed.
    pub fn update(&self) -> bool {
        let role = self.0.borrow().role;
        match role {
            Role::Generator => generator::update(self),
            Role::Operator(bounds) => operator::update(self, bounds),
            Role::Output => output::update(self),
        }
    }

    /// Returns up-to-date data, regenerating whatever is dirty on the way.
    ///
    /// `updated` is set to `true` when this call regenerated the returned
    /// data; it is never cleared, so one flag can collect several calls.
    /// Never returns dirty data. `None` follows a reported violation
    /// (allocation failure, unconnected output, an operator outside its
    /// bounds or missing input data) when no earlier generation is valid.
    pub fn get_updated_data(&self, updated: &mut bool) -> Option<NodeDataRef> {
        let role = self.0.borrow().role;
        match role {
            Role::Generator => generator::get_updated_data(self, updated),
            Role::Operator(bounds) => operator::get_updated_data(self, bounds, updated),
            Role::Output => output::get_updated_data(self, updated),
        }
    }

    /// [`get_updated_data`](Self::get_updated_data) without the flag.
    pub fn updated_data(&self) -> Option<NodeDataRef> {
        let mut updated = false;
        self.get_updated_data(&mut updated)
    }

    // ── Logic access ────────────────────────────────────────────────────

    /// Runs `f` on the node logic if it is a `T`.
    pub fn with_logic<T: NodeLogic, R>(&self, f: impl FnOnce(&T) -> R) -> Option<R> {
        let node = self.0.borrow();
        let logic: &dyn Any = &*node.logic;
        logic.downcast_ref::<T>().map(f)
    }

    /// Runs `f` on the node logic mutably if it is a `T`.
    ///
    /// Use this to edit [`Parameter`](crate::Parameter)s; the next `update`
    /// picks the change up.
    pub fn with_logic_mut<T: NodeLogic, R>(&self, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        let mut node = self.0.borrow_mut();
        let logic: &mut dyn Any = &mut *node.logic;
        logic.downcast_mut::<T>().map(f)
    }

    /// Exports the subgraph rooted here as a tree of class names.
    pub fn blueprint(&self) -> NodeBlueprint {
        let (class, inputs) = {
            let node = self.0.borrow();
            (node.class(), node.inputs.clone())
        };
        NodeBlueprint {
            class: class.to_owned(),
            inputs: inputs.iter().map(Self::blueprint).collect(),
        }
    }
}

/// Non-owning observer of a node.
#[derive(Debug, Clone)]
pub struct WeakNodeRef(WeakHandle<RefCell<Node>>);

impl WeakNodeRef {
    /// Re-acquires ownership if the node is still alive.
    pub fn upgrade(&self) -> Option<NodeRef> {
        self.0.upgrade().map(NodeRef)
    }

    /// Returns `true` once the node has been destroyed.
    pub fn is_released(&self) -> bool {
        self.0.is_released()
    }
}
