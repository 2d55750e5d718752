// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! kiln-graph: lazily recomputed procedural-content node graphs.
//!
//! Meshes, textures and shader programs are described as small DAGs of
//! nodes. Each node caches its result in a [`NodeData`] and regenerates it
//! only when the data is dirty or one of its inputs changed. Evaluation is
//! single-threaded, synchronous and depth-first: asking an output node for
//! its data walks the graph from the root down and back up.
//!
//! Concrete node types implement [`NodeLogic`] and are wrapped in one of
//! three roles by [`NodeRef::generator`], [`NodeRef::operator`] or
//! [`NodeRef::output`]. A [`NodeManager`] maps class names to constructors.
//!
//! ```
//! use kiln_graph::{
//!     DataContent, InputBounds, NodeContext, NodeData, NodeDataRef, NodeLogic, NodeRef,
//! };
//!
//! struct Seed;
//! impl NodeLogic for Seed {
//!     fn class_name(&self) -> &'static str { "SeedGenerator" }
//!     fn allocate_data(&self) -> Option<DataContent> { Some(Box::new(0_u32)) }
//!     fn generate_data(&mut self, data: &NodeData, _inputs: &[NodeDataRef]) {
//!         if let Some(mut v) = data.content_mut::<u32>() { *v = 21; }
//!     }
//! }
//!
//! struct Double;
//! impl NodeLogic for Double {
//!     fn class_name(&self) -> &'static str { "DoubleOperator" }
//!     fn allocate_data(&self) -> Option<DataContent> { Some(Box::new(0_u32)) }
//!     fn generate_data(&mut self, data: &NodeData, inputs: &[NodeDataRef]) {
//!         let input = inputs.first().and_then(|d| d.content::<u32>().map(|v| *v)).unwrap_or(0);
//!         if let Some(mut v) = data.content_mut::<u32>() { *v = input * 2; }
//!     }
//! }
//!
//! let ctx = NodeContext::tracking();
//! let seed = NodeRef::generator(&ctx, Seed);
//! let double = NodeRef::operator(&ctx, InputBounds::exactly(1), Double);
//! let output = NodeRef::output(&ctx, "NumberOutput");
//! double.add_input(&seed).ok();
//! output.add_input(&double).ok();
//!
//! let mut updated = false;
//! let data = output.get_updated_data(&mut updated).unwrap();
//! assert!(updated);
//! assert_eq!(*data.content::<u32>().unwrap(), 42);
//! ```
#![forbid(unsafe_code)]
#![deny(missing_docs, rust_2018_idioms, unused_must_use)]
#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::cargo,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro,
    clippy::print_stdout,
    clippy::print_stderr
)]
#![allow(
    clippy::must_use_candidate,
    clippy::return_self_not_must_use,
    clippy::missing_const_for_fn,
    clippy::redundant_pub_crate,
    clippy::module_name_repetitions,
    clippy::use_self
)]

mod alloc;
mod blueprint;
mod config;
mod context;
mod data;
mod diagnostic;
/// Graphviz rendering of node subgraphs.
#[cfg(feature = "dot")]
pub mod dot;
mod error;
mod handle;
mod logic;
mod manager;
mod node;
mod parameter;

pub use alloc::{Allocator, NodeAllocators, TrackingAllocator};
pub use blueprint::NodeBlueprint;
pub use config::{ConfigError, GraphConfig, ViolationPolicy};
pub use context::NodeContext;
pub use data::{DataContent, NodeData, NodeDataRef};
pub use error::GraphError;
pub use handle::{Handle, WeakHandle};
pub use logic::NodeLogic;
pub use manager::{CreateNodeFn, NodeManager};
pub use node::{InputBounds, NodeKind, NodeRef, WeakNodeRef};
pub use parameter::Parameter;
