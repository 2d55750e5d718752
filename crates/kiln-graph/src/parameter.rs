// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! External node parameters with change tracking.

/// A value edited from outside the graph (editor, script, timeline).
///
/// Setting a different value marks the parameter dirty; node logic reports
/// pending changes from
/// [`NodeLogic::take_parameter_changes`](crate::NodeLogic::take_parameter_changes)
/// so the next `update` pass invalidates the node's data.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Parameter<T> {
    value: T,
    dirty: bool,
}

impl<T> Parameter<T> {
    /// Creates a clean parameter.
    pub const fn new(value: T) -> Self {
        Self {
            value,
            dirty: false,
        }
    }

    /// Current value.
    pub const fn get(&self) -> &T {
        &self.value
    }

    /// Returns `true` if the value changed since the last
    /// [`take_dirty`](Self::take_dirty).
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Clears the dirty flag and returns its previous state.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}

impl<T: PartialEq> Parameter<T> {
    /// Stores `value`; marks the parameter dirty only if it differs.
    pub fn set(&mut self, value: T) {
        if self.value != value {
            self.value = value;
            self.dirty = true;
        }
    }
}
