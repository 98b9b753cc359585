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

//! The capability traits every lock in this crate implements.
//!
//! Both traits only acquire and release. Pairing is up to the caller, so
//! [`Lockable::unlock`] is unsafe.
//! Safe, scoped access lives in [`crate::scoped`] and in the value wrappers.

/// A mutual-exclusion lock.
///
/// # Safety
///
/// Implementors must guarantee that between a return from [`lock`] and the
/// matching [`unlock`], no other caller returns from [`lock`] on the same
/// instance. The value wrappers hand out `&mut T` on the strength of this
/// promise.
///
/// Locks are not reentrant: calling [`lock`] again on a thread that already
/// holds the lock deadlocks (or aborts, depending on the platform).
///
/// [`lock`]: Lockable::lock
/// [`unlock`]: Lockable::unlock
pub unsafe trait Lockable {
    /// Human readable name of the underlying primitive.
    fn name() -> &'static str
    where
        Self: Sized,
    {
        core::any::type_name::<Self>()
    }

    /// Blocks the calling thread until it holds the lock exclusively.
    fn lock(&self);

    /// Releases the lock.
    ///
    /// # Safety
    ///
    /// The lock must be held by the current call path through a prior
    /// acquisition that has not been released yet.
    unsafe fn unlock(&self);
}

/// A reader-writer lock.
///
/// [`Lockable::lock`] is always a write acquisition, and [`Lockable::unlock`]
/// ends an acquisition of either kind.
///
/// # Safety
///
/// On top of the [`Lockable`] contract, implementors must guarantee that a
/// write acquisition never overlaps any other acquisition, and that read
/// acquisitions only ever overlap other read acquisitions.
pub unsafe trait RwLockable: Lockable {
    /// Blocks until no writer holds the lock, then acquires shared access.
    fn read_lock(&self);

    /// Blocks until no reader or writer holds the lock, then acquires
    /// exclusive access.
    fn write_lock(&self);
}

#[cfg(feature = "std")]
unsafe impl<L: Lockable + ?Sized> Lockable for Box<L> {
    #[inline]
    fn lock(&self) {
        (**self).lock()
    }

    #[inline]
    unsafe fn unlock(&self) {
        (**self).unlock()
    }
}

#[cfg(feature = "std")]
unsafe impl<L: RwLockable + ?Sized> RwLockable for Box<L> {
    #[inline]
    fn read_lock(&self) {
        (**self).read_lock()
    }

    #[inline]
    fn write_lock(&self) {
        (**self).write_lock()
    }
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;
    use crate::sys::{SpinLock, SpinRwLock};

    #[test]
    fn boxed_trait_objects_forward() {
        let lock: Box<dyn RwLockable + Send + Sync> = Box::new(SpinRwLock::new());
        lock.read_lock();
        lock.read_lock();
        unsafe {
            lock.unlock();
            lock.unlock();
        }
        lock.lock();
        unsafe { lock.unlock() }
    }

    #[test]
    fn default_name_is_type_name() {
        struct Dummy;
        unsafe impl Lockable for Dummy {
            fn lock(&self) {}
            unsafe fn unlock(&self) {}
        }

        assert!(Dummy::name().ends_with("Dummy"));
        assert_eq!(SpinLock::name(), "spin_lock");
    }
}
