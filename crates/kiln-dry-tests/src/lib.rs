// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Shared test doubles and fixtures for Kiln crates.
//!
//! # Modules
//!
//! - [`counter`] - Shared call counters observed by the doubles
//! - [`nodes`] - Scalar generator/operator doubles and their constructors
//! - [`fixtures`] - Allocator-tracking graph fixture with a populated manager
//! - [`logging`] - Idempotent `tracing` subscriber setup for tests
#![forbid(unsafe_code)]

pub mod counter;
pub mod fixtures;
pub mod logging;
pub mod nodes;

// Re-export commonly used items at crate root for convenience
pub use counter::CallCounter;
pub use fixtures::GraphFixture;
pub use logging::init_test_tracing;
pub use nodes::{
    output_node, register_test_nodes, scalar, sum_node, value_node, Scalar, SumOperator,
    ValueGenerator, SCALAR_OUTPUT, SUM_OPERATOR, VALUE_GENERATOR,
};
