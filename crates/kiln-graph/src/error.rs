// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Violations reported by the graph core.

use thiserror::Error;

/// Topology, lookup and factory violations.
///
/// Every value of this type has already gone through the diagnostic channel
/// (logged, or halted under [`ViolationPolicy::Halt`](crate::ViolationPolicy))
/// by the time the caller sees it. The operation that produced it left the
/// graph unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// Generators are leaves; no input can be attached or replaced.
    #[error("generator node `{class}` does not accept inputs")]
    GeneratorInput {
        /// Class of the generator.
        class: &'static str,
    },
    /// An output node already has its single input.
    #[error("output node `{class}` already has an input")]
    OutputAlreadyConnected {
        /// Class of the output node.
        class: &'static str,
    },
    /// An output node was used before its input was attached.
    #[error("output node `{class}` has no input attached")]
    OutputNotConnected {
        /// Class of the output node.
        class: &'static str,
    },
    /// An operator reached its declared maximum number of inputs.
    #[error("operator node `{class}` accepts at most {max} inputs")]
    OperatorInputLimit {
        /// Class of the operator.
        class: &'static str,
        /// Declared maximum.
        max: usize,
    },
    /// The fixed input capacity shared by all nodes is exhausted.
    #[error("node `{class}` is at its input capacity ({capacity})")]
    InputCapacityExceeded {
        /// Class of the node.
        class: &'static str,
        /// Configured capacity.
        capacity: usize,
    },
    /// The node to remove is not one of the inputs.
    #[error("node `{class}` does not have the given node as an input")]
    InputNotFound {
        /// Class of the node.
        class: &'static str,
    },
    /// Input index past the end of the input list.
    #[error("input index {index} out of range for node `{class}` ({count} inputs)")]
    InputIndexOutOfRange {
        /// Class of the node.
        class: &'static str,
        /// Requested index.
        index: usize,
        /// Current number of inputs.
        count: usize,
    },
    /// An operator was evaluated with an input count outside its bounds.
    #[error("node `{class}` has {count} inputs, expected between {min} and {max}")]
    InputCountOutOfBounds {
        /// Class of the operator.
        class: &'static str,
        /// Current number of inputs.
        count: usize,
        /// Declared minimum.
        min: usize,
        /// Declared maximum.
        max: usize,
    },
    /// Operator bounds with `min > max` or `max == 0`.
    #[error("invalid input bounds [{min}, {max}]")]
    InvalidInputBounds {
        /// Requested minimum.
        min: usize,
        /// Requested maximum.
        max: usize,
    },
    /// The input already depends on the node it would feed.
    #[error("attaching `{input}` to `{class}` would create a cycle")]
    CycleDetected {
        /// Class of the node receiving the input.
        class: &'static str,
        /// Class of the rejected input.
        input: &'static str,
    },
    /// Output nodes forward their input's data and never own any.
    #[error("output node `{class}` owns no data")]
    OutputHasNoData {
        /// Class of the output node.
        class: &'static str,
    },
    /// The node logic declined to allocate its data.
    #[error("node `{class}` failed to allocate its data")]
    DataAllocationFailed {
        /// Class of the node.
        class: &'static str,
    },
    /// An input subtree produced no data, so the node kept its previous data.
    #[error("input {index} of node `{class}` produced no data")]
    InputDataUnavailable {
        /// Class of the consuming node.
        class: &'static str,
        /// Index of the failing input.
        index: usize,
    },
    /// Registered class names must have a minimum length.
    #[error("class name `{name}` is shorter than {min} bytes")]
    ClassNameTooShort {
        /// Rejected name.
        name: String,
        /// Configured minimum.
        min: usize,
    },
    /// Registered class names are bounded.
    #[error("class name `{name}` is longer than {max} bytes")]
    ClassNameTooLong {
        /// Rejected name.
        name: String,
        /// Configured maximum.
        max: usize,
    },
    /// The factory table is full.
    #[error("node registry is full ({capacity} classes)")]
    RegistryFull {
        /// Configured capacity.
        capacity: usize,
    },
    /// No constructor is registered under this name.
    #[error("node class `{name}` is not registered")]
    UnknownClass {
        /// Requested class name.
        name: String,
    },
}
