// Copyright (c) 2020 kprotty
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// 	http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use core::{cell::UnsafeCell, fmt};

use crate::{raw::RwLockable, scoped, sys::RwLock};

/// A value guarded by its own reader-writer lock.
///
/// Readers get `&T` and may run concurrently with each other. Writers get
/// `&mut T` and run alone.
///
/// ```
/// use lockwrap::RwLockedValue;
///
/// let config = RwLockedValue::new(vec!["a"]);
/// config.with_write_lock(|v| v.push("b"));
/// assert_eq!(config.with_read_lock(|v| v.len()), 2);
/// ```
pub struct RwLockedValue<T, L = RwLock> {
    lock: L,
    value: UnsafeCell<T>,
}

unsafe impl<T: Send, L: Send> Send for RwLockedValue<T, L> {}
unsafe impl<T: Send + Sync, L: Sync> Sync for RwLockedValue<T, L> {}

impl<T, L> fmt::Debug for RwLockedValue<T, L>
where
    L: RwLockable,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RwLockedValue")
            .field("lock", &L::name())
            .finish_non_exhaustive()
    }
}

impl<T: Default, L: RwLockable + Default> Default for RwLockedValue<T, L> {
    fn default() -> Self {
        Self::from(T::default())
    }
}

impl<T, L: RwLockable + Default> From<T> for RwLockedValue<T, L> {
    fn from(value: T) -> Self {
        Self::from_parts(value, L::default())
    }
}

impl<T> RwLockedValue<T> {
    /// Guards `value` with a fresh [`RwLock`].
    pub fn new(value: T) -> Self {
        Self::from_parts(value, RwLock::new())
    }
}

impl<T, L: RwLockable> RwLockedValue<T, L> {
    /// Guards `value` with `lock`, which becomes owned by the wrapper.
    pub fn from_parts(value: T, lock: L) -> Self {
        Self {
            lock,
            value: UnsafeCell::new(value),
        }
    }

    /// Runs `f` with exclusive access through the lock's plain
    /// [`lock`](crate::Lockable::lock), which is a write acquisition.
    #[inline]
    pub fn with_lock<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        scoped::with_lock(&self.lock, || f(unsafe { &mut *self.value.get() }))
    }

    /// Runs `f` with shared access. Other readers may run at the same time.
    ///
    /// Taking the write side of the same value from inside `f` deadlocks or
    /// panics, depending on the backend.
    #[inline]
    pub fn with_read_lock<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        scoped::with_read_lock(&self.lock, || f(unsafe { &*self.value.get() }))
    }

    /// Runs `f` with exclusive access.
    #[inline]
    pub fn with_write_lock<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        scoped::with_write_lock(&self.lock, || f(unsafe { &mut *self.value.get() }))
    }

    /// Clones the value out under a read lock.
    pub fn value(&self) -> T
    where
        T: Clone,
    {
        self.with_read_lock(T::clone)
    }

    /// Borrowing `self` mutably proves there is no reader or writer left, so
    /// no locking takes place.
    pub fn get_mut(&mut self) -> &mut T {
        self.value.get_mut()
    }

    /// Consumes the wrapper and returns the value. The lock is dropped with it.
    pub fn into_inner(self) -> T {
        self.value.into_inner()
    }
}
