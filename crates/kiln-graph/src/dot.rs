// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Graphviz rendering of a node subgraph, for debugging.

use std::collections::HashMap;
use std::fmt;

use crate::node::{NodeKind, NodeRef};

/// Renders every node reachable from `root` as a DOT digraph.
///
/// Shared nodes appear once. Edges point from an input to its consumer, in
/// input order. Nodes whose own data is dirty or not yet allocated are drawn
/// dashed.
pub fn describe(root: &NodeRef) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    write_dot(root, &mut out).ok();
    out
}

/// Streams the [`describe`] output into `out`.
pub fn write_dot(root: &NodeRef, out: &mut impl fmt::Write) -> fmt::Result {
    let mut ids: HashMap<NodeRef, usize> = HashMap::new();
    let mut order = Vec::new();
    let mut stack = vec![root.clone()];
    while let Some(node) = stack.pop() {
        if ids.contains_key(&node) {
            continue;
        }
        ids.insert(node.clone(), order.len());
        stack.extend(node.inputs().into_iter().rev());
        order.push(node);
    }

    writeln!(out, "digraph kiln {{")?;
    for (id, node) in order.iter().enumerate() {
        let dashed = node.kind() != NodeKind::Output && node.is_data_dirty();
        let style = if dashed { ", style=dashed" } else { "" };
        writeln!(out, "    n{id} [label=\"{}\"{style}];", label(node))?;
    }
    for (id, node) in order.iter().enumerate() {
        for input in node.inputs() {
            if let Some(from) = ids.get(&input) {
                writeln!(out, "    n{from} -> n{id};")?;
            }
        }
    }
    writeln!(out, "}}")
}

#[cfg(feature = "debug-names")]
fn label(node: &NodeRef) -> String {
    match node.name() {
        Some(name) => format!("{}\\n{}", node.class_name(), name.replace('"', "\\\"")),
        None => node.class_name().to_owned(),
    }
}

#[cfg(not(feature = "debug-names"))]
fn label(node: &NodeRef) -> String {
    node.class_name().to_owned()
}
