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

//! Lock backends, and the default [`UnfairLock`] / [`RwLock`] picked from
//! them.
//!
//! Preference order is the operating system's own primitives (`os`),
//! then parking_lot (`std`), then spinning.

use core::fmt;

use crate::raw::{Lockable, RwLockable};

mod spin;
pub use spin::{SpinLock, SpinRwLock};

#[cfg(feature = "std")]
mod parking;
#[cfg(feature = "std")]
pub use parking::{ParkingLotMutex, ParkingLotRwLock};

#[cfg(all(feature = "os", any(unix, windows)))]
pub mod os;

#[cfg(all(feature = "os", any(unix, windows)))]
type DefaultMutex = os::OsMutex;
#[cfg(all(feature = "std", not(all(feature = "os", any(unix, windows)))))]
type DefaultMutex = ParkingLotMutex;
#[cfg(not(feature = "std"))]
type DefaultMutex = SpinLock;

#[cfg(all(feature = "os", any(unix, windows)))]
type DefaultRwLock = os::OsRwLock;
#[cfg(all(feature = "std", not(all(feature = "os", any(unix, windows)))))]
type DefaultRwLock = ParkingLotRwLock;
#[cfg(not(feature = "std"))]
type DefaultRwLock = SpinRwLock;

/// Fast, non-fair, non-reentrant mutual exclusion.
///
/// A thread releasing the lock may immediately take it again ahead of
/// threads that have waited longer. Taking it twice on one thread deadlocks.
/// This is the default lock of [`LockedValue`](crate::LockedValue).
#[derive(Default)]
pub struct UnfairLock(DefaultMutex);

impl fmt::Debug for UnfairLock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("UnfairLock").field(&self.0).finish()
    }
}

impl UnfairLock {
    pub fn new() -> Self {
        Self(DefaultMutex::default())
    }
}

unsafe impl Lockable for UnfairLock {
    fn name() -> &'static str {
        DefaultMutex::name()
    }

    #[inline]
    fn lock(&self) {
        self.0.lock()
    }

    #[inline]
    unsafe fn unlock(&self) {
        self.0.unlock()
    }
}

/// Reader-writer lock over the platform primitive.
///
/// [`lock`](Lockable::lock) is a write acquisition, so code written against
/// plain [`Lockable`] always gets exclusive access. This is the default lock
/// of [`RwLockedValue`](crate::RwLockedValue).
///
/// No preference between readers and writers is promised; either side may
/// starve under sustained contention.
#[derive(Default)]
pub struct RwLock(DefaultRwLock);

impl fmt::Debug for RwLock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RwLock").field(&self.0).finish()
    }
}

impl RwLock {
    pub fn new() -> Self {
        Self(DefaultRwLock::default())
    }
}

unsafe impl Lockable for RwLock {
    fn name() -> &'static str {
        DefaultRwLock::name()
    }

    #[inline]
    fn lock(&self) {
        self.write_lock()
    }

    #[inline]
    unsafe fn unlock(&self) {
        self.0.unlock()
    }
}

unsafe impl RwLockable for RwLock {
    #[inline]
    fn read_lock(&self) {
        self.0.read_lock()
    }

    #[inline]
    fn write_lock(&self) {
        self.0.write_lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_report_backend_name() {
        #[cfg(all(feature = "os", target_vendor = "apple"))]
        assert_eq!(UnfairLock::name(), "os_unfair_lock");
        #[cfg(all(feature = "os", unix, not(target_vendor = "apple")))]
        assert_eq!(UnfairLock::name(), "pthread_mutex_t");
        #[cfg(all(feature = "os", unix))]
        assert_eq!(RwLock::name(), "pthread_rwlock_t");
        #[cfg(all(feature = "os", windows))]
        assert_eq!(RwLock::name(), "SRWLOCK");
        #[cfg(not(feature = "std"))]
        assert_eq!(UnfairLock::name(), "spin_lock");
    }

    #[test]
    fn plain_lock_is_exclusive() {
        let lock = RwLock::new();
        lock.lock();
        unsafe { lock.unlock() };
        lock.read_lock();
        lock.read_lock();
        unsafe {
            lock.unlock();
            lock.unlock();
        }
    }
}
