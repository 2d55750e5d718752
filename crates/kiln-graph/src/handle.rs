// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Reference-counted ownership primitive shared by nodes and node data.
//!
//! A [`Handle`] is one logical owner of a heap object. The object is destroyed
//! exactly when the last handle is released; cloning a handle adds an owner.
//! Handles compare and hash by identity, never by value: two handles are equal
//! only when they point at the same allocation.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::rc::{Rc, Weak};

/// Shared-ownership handle with identity semantics.
///
/// Associated functions (`Handle::ref_count(&h)`) are used instead of methods
/// so they never shadow methods of the pointee reached through `Deref`.
pub struct Handle<T: ?Sized> {
    inner: Rc<T>,
}

impl<T> Handle<T> {
    /// Moves `value` to the heap and returns its first owner.
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(value),
        }
    }
}

impl<T: ?Sized> Handle<T> {
    /// Number of live owners of the pointee.
    pub fn ref_count(this: &Self) -> usize {
        Rc::strong_count(&this.inner)
    }

    /// Returns `true` when both handles point at the same allocation.
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        std::ptr::eq(Self::addr(a), Self::addr(b))
    }

    /// Creates a non-owning observer of the pointee.
    pub fn downgrade(this: &Self) -> WeakHandle<T> {
        WeakHandle {
            inner: Rc::downgrade(&this.inner),
        }
    }

    fn addr(this: &Self) -> *const () {
        Rc::as_ptr(&this.inner).cast::<()>()
    }
}

impl<T: ?Sized> Clone for Handle<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: ?Sized> Deref for Handle<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.inner
    }
}

impl<T: ?Sized> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        Self::ptr_eq(self, other)
    }
}

impl<T: ?Sized> Eq for Handle<T> {}

impl<T: ?Sized> Hash for Handle<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::ptr::hash(Self::addr(self), state);
    }
}

impl<T: ?Sized> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle({:p}, refs={})", Self::addr(self), Self::ref_count(self))
    }
}

/// Non-owning observer of a [`Handle`] pointee.
///
/// Does not keep the pointee alive; [`upgrade`](WeakHandle::upgrade) yields
/// `None` once the last owner is gone.
pub struct WeakHandle<T: ?Sized> {
    inner: Weak<T>,
}

impl<T: ?Sized> WeakHandle<T> {
    /// Re-acquires ownership if the pointee is still alive.
    pub fn upgrade(&self) -> Option<Handle<T>> {
        self.inner.upgrade().map(|inner| Handle { inner })
    }

    /// Returns `true` once every owner has been released.
    pub fn is_released(&self) -> bool {
        self.inner.strong_count() == 0
    }
}

impl<T: ?Sized> Clone for WeakHandle<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Weak::clone(&self.inner),
        }
    }
}

impl<T: ?Sized> fmt::Debug for WeakHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WeakHandle(released={})", self.is_released())
    }
}
