// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Cached node results and their dirty/valid lifecycle.
//!
//! A [`NodeData`] is passive storage: typed content, a dirty flag and a
//! GPU-side dirty flag for the backend. It never knows how its content was
//! produced; the owning node regenerates it in place.

use std::any::Any;
use std::cell::{Cell, Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

use tracing::debug;

use crate::alloc::Allocator;
use crate::handle::Handle;

/// Type-erased content stored inside a [`NodeData`].
pub type DataContent = Box<dyn Any>;

/// Shared handle to a [`NodeData`].
///
/// Output nodes hand out their input's handle itself, so identity
/// comparison (`==`) tells whether two results are the same instance.
pub type NodeDataRef = Handle<NodeData>;

/// The cached, derived result of a node.
pub struct NodeData {
    content: RefCell<DataContent>,
    dirty: Cell<bool>,
    gpu_dirty: Cell<bool>,
    gpu_data: RefCell<Option<Box<dyn Any>>>,
    allocator: Rc<dyn Allocator>,
    footprint: usize,
}

impl NodeData {
    /// Wraps freshly allocated, not yet generated content. Starts dirty.
    pub(crate) fn new(content: DataContent, allocator: Rc<dyn Allocator>) -> Self {
        let footprint = std::mem::size_of::<Self>() + std::mem::size_of_val(&*content);
        allocator.on_allocate(footprint);
        Self {
            content: RefCell::new(content),
            dirty: Cell::new(true),
            gpu_dirty: Cell::new(true),
            gpu_data: RefCell::new(None),
            allocator,
            footprint,
        }
    }

    /// Marks the content (and its GPU copy) as needing regeneration.
    pub fn invalidate(&self) {
        self.dirty.set(true);
        self.gpu_dirty.set(true);
    }

    /// Marks the content as up to date. The GPU flag is left untouched: the
    /// backend clears it after re-uploading.
    pub(crate) fn validate(&self) {
        self.dirty.set(false);
    }

    /// Returns `true` when the content must be regenerated before use.
    pub fn is_dirty(&self) -> bool {
        self.dirty.get()
    }

    /// Returns `true` when the backend copy is out of date.
    pub fn is_gpu_data_dirty(&self) -> bool {
        self.gpu_dirty.get()
    }

    /// Called by the backend once its copy matches the content.
    pub fn validate_gpu_data(&self) {
        self.gpu_dirty.set(false);
    }

    /// Attaches (or clears) the backend's opaque resource for this data.
    ///
    /// Clearing the slot marks the GPU copy dirty again.
    pub fn set_gpu_data(&self, gpu_data: Option<Box<dyn Any>>) {
        if gpu_data.is_none() {
            self.gpu_dirty.set(true);
        }
        if let Ok(mut slot) = self.gpu_data.try_borrow_mut() {
            *slot = gpu_data;
        }
    }

    /// Borrows the backend resource as `T`, if one of that type is attached.
    pub fn gpu_data<T: Any>(&self) -> Option<Ref<'_, T>> {
        let slot = self.gpu_data.try_borrow().ok()?;
        Ref::filter_map(slot, |slot| slot.as_ref().and_then(|b| b.downcast_ref::<T>())).ok()
    }

    /// Borrows the content as `T`.
    ///
    /// Returns `None` when the content has another type or is currently
    /// borrowed mutably.
    pub fn content<T: Any>(&self) -> Option<Ref<'_, T>> {
        let content = self.content.try_borrow().ok()?;
        Ref::filter_map(content, |c| c.downcast_ref::<T>()).ok()
    }

    /// Mutably borrows the content as `T`. Used by node logic while
    /// generating.
    pub fn content_mut<T: Any>(&self) -> Option<RefMut<'_, T>> {
        let content = self.content.try_borrow_mut().ok()?;
        RefMut::filter_map(content, |c| c.downcast_mut::<T>()).ok()
    }

    /// Bytes accounted against the data allocator for this instance.
    pub fn footprint(&self) -> usize {
        self.footprint
    }
}

impl Drop for NodeData {
    fn drop(&mut self) {
        self.allocator.on_release(self.footprint);
        debug!(allocator = self.allocator.name(), bytes = self.footprint, "node data released");
    }
}

impl fmt::Debug for NodeData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeData")
            .field("dirty", &self.dirty.get())
            .field("gpu_dirty", &self.gpu_dirty.get())
            .field("footprint", &self.footprint)
            .finish_non_exhaustive()
    }
}
