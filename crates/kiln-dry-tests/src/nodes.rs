// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Scalar node doubles.
//!
//! Content is a [`Scalar`]: generators publish their parameter value,
//! operators publish the sum of their inputs plus a bias. Every double counts
//! its `generate_data` calls through a [`CallCounter`].

use std::cell::RefCell;
use std::rc::Rc;

use kiln_graph::{
    DataContent, GraphError, InputBounds, NodeContext, NodeData, NodeDataRef, NodeLogic,
    NodeManager, NodeRef, Parameter,
};

use crate::counter::CallCounter;

/// Class name of [`ValueGenerator`].
pub const VALUE_GENERATOR: &str = "ValueGenerator";
/// Class name of [`SumOperator`].
pub const SUM_OPERATOR: &str = "SumOperator";
/// Class name of the scalar output node.
pub const SCALAR_OUTPUT: &str = "ScalarOutput";

/// Content produced by every double.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Scalar(pub i64);

/// Generator publishing a single editable value.
#[derive(Debug)]
pub struct ValueGenerator {
    value: Parameter<i64>,
    generations: CallCounter,
}

impl ValueGenerator {
    /// Generator publishing `value`, with a fresh counter.
    pub fn new(value: i64) -> Self {
        Self::with_counter(value, CallCounter::new())
    }

    /// Generator publishing `value`, counting into `generations`.
    pub fn with_counter(value: i64, generations: CallCounter) -> Self {
        Self {
            value: Parameter::new(value),
            generations,
        }
    }

    /// Current parameter value.
    pub fn value(&self) -> i64 {
        *self.value.get()
    }

    /// Edits the parameter; picked up by the next `update` pass.
    pub fn set_value(&mut self, value: i64) {
        self.value.set(value);
    }

    /// Counter of `generate_data` calls.
    pub fn generations(&self) -> &CallCounter {
        &self.generations
    }
}

impl NodeLogic for ValueGenerator {
    fn class_name(&self) -> &'static str {
        VALUE_GENERATOR
    }

    fn allocate_data(&self) -> Option<DataContent> {
        Some(Box::new(Scalar::default()))
    }

    fn generate_data(&mut self, data: &NodeData, _inputs: &[NodeDataRef]) {
        self.generations.hit();
        if let Some(mut scalar) = data.content_mut::<Scalar>() {
            *scalar = Scalar(*self.value.get());
        }
    }

    fn take_parameter_changes(&mut self) -> bool {
        self.value.take_dirty()
    }
}

/// Operator summing its inputs plus an editable bias.
#[derive(Debug, Default)]
pub struct SumOperator {
    bias: Parameter<i64>,
    generations: CallCounter,
    removals: Rc<RefCell<Vec<usize>>>,
}

impl SumOperator {
    /// Operator with zero bias and a fresh counter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Operator counting into `generations`.
    pub fn with_counter(generations: CallCounter) -> Self {
        Self {
            generations,
            ..Self::default()
        }
    }

    /// Edits the bias; picked up by the next `update` pass.
    pub fn set_bias(&mut self, bias: i64) {
        self.bias.set(bias);
    }

    /// Counter of `generate_data` calls.
    pub fn generations(&self) -> &CallCounter {
        &self.generations
    }

    /// Indices passed to `on_remove_input`, in call order.
    pub fn removals(&self) -> Vec<usize> {
        self.removals.borrow().clone()
    }
}

impl NodeLogic for SumOperator {
    fn class_name(&self) -> &'static str {
        SUM_OPERATOR
    }

    fn allocate_data(&self) -> Option<DataContent> {
        Some(Box::new(Scalar::default()))
    }

    fn generate_data(&mut self, data: &NodeData, inputs: &[NodeDataRef]) {
        self.generations.hit();
        let total = inputs.iter().filter_map(scalar).sum::<i64>() + *self.bias.get();
        if let Some(mut scalar) = data.content_mut::<Scalar>() {
            *scalar = Scalar(total);
        }
    }

    fn on_remove_input(&mut self, index: usize) {
        self.removals.borrow_mut().push(index);
    }

    fn take_parameter_changes(&mut self) -> bool {
        self.bias.take_dirty()
    }
}

/// Reads the scalar stored in `data`.
pub fn scalar(data: &NodeDataRef) -> Option<i64> {
    data.content::<Scalar>().map(|s| s.0)
}

/// Generator node publishing `value`, plus its generation counter.
pub fn value_node(ctx: &NodeContext, value: i64) -> (NodeRef, CallCounter) {
    let counter = CallCounter::new();
    let node = NodeRef::generator(ctx, ValueGenerator::with_counter(value, counter.clone()));
    (node, counter)
}

/// Sum operator with `bounds`, plus its generation counter.
pub fn sum_node(ctx: &NodeContext, bounds: InputBounds) -> (NodeRef, CallCounter) {
    let counter = CallCounter::new();
    let node = NodeRef::operator(ctx, bounds, SumOperator::with_counter(counter.clone()));
    (node, counter)
}

/// Unconnected scalar output node.
pub fn output_node(ctx: &NodeContext) -> NodeRef {
    NodeRef::output(ctx, SCALAR_OUTPUT)
}

fn create_value(ctx: &NodeContext) -> NodeRef {
    NodeRef::generator(ctx, ValueGenerator::new(0))
}

fn create_sum(ctx: &NodeContext) -> NodeRef {
    NodeRef::operator(ctx, InputBounds::one_to(ctx.config().max_inputs), SumOperator::new())
}

/// Registers the three scalar classes with `manager`.
pub fn register_test_nodes(manager: &mut NodeManager) -> Result<(), GraphError> {
    manager.register_node(VALUE_GENERATOR, create_value)?;
    manager.register_node(SUM_OPERATOR, create_sum)?;
    manager.register_node(SCALAR_OUTPUT, output_node)?;
    Ok(())
}
