// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Shared call counters.

use std::cell::Cell;
use std::rc::Rc;

/// A counter shared between a test double and the test observing it.
///
/// Clones observe the same count, so a double can be moved into a node while
/// the test keeps a handle.
///
/// # Example
///
/// ```
/// use kiln_dry_tests::CallCounter;
///
/// let counter = CallCounter::new();
/// let observer = counter.clone();
/// counter.hit();
/// assert_eq!(observer.get(), 1);
/// assert_eq!(observer.take(), 1);
/// assert_eq!(counter.get(), 0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CallCounter {
    count: Rc<Cell<usize>>,
}

impl CallCounter {
    /// Create a counter at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one call.
    pub fn hit(&self) {
        self.count.set(self.count.get() + 1);
    }

    /// Calls recorded so far.
    pub fn get(&self) -> usize {
        self.count.get()
    }

    /// Return the count and reset it to zero.
    ///
    /// Handy for "exactly N calls since the last check" assertions.
    pub fn take(&self) -> usize {
        self.count.replace(0)
    }
}
