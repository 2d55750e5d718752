// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

// Single channel for every violation raised by the core.

use tracing::error;

use crate::config::{GraphConfig, ViolationPolicy};
use crate::error::GraphError;

/// Logs `violation` and halts when the policy asks for it.
///
/// Returns the violation so call sites can `return Err(report(..))`.
pub(crate) fn report(config: &GraphConfig, violation: GraphError) -> GraphError {
    error!(target: "kiln_graph", %violation, "graph violation");
    if config.violation_policy == ViolationPolicy::Halt {
        halt(&violation);
    }
    violation
}

#[cold]
#[allow(clippy::panic)]
fn halt(violation: &GraphError) -> ! {
    panic!("graph violation: {violation}");
}
