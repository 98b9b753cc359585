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

use core::{
    fmt,
    sync::atomic::{AtomicBool, Ordering},
};

use parking_lot::lock_api::{RawMutex as _, RawRwLock as _};

use crate::raw::{Lockable, RwLockable};

/// [`parking_lot::RawMutex`] behind the [`Lockable`] interface.
pub struct ParkingLotMutex {
    inner: parking_lot::RawMutex,
}

impl Default for ParkingLotMutex {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ParkingLotMutex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParkingLotMutex")
            .field("locked", &self.inner.is_locked())
            .finish()
    }
}

impl ParkingLotMutex {
    pub const NAME: &'static str = "parking_lot::RawMutex";

    pub const fn new() -> Self {
        Self {
            inner: parking_lot::RawMutex::INIT,
        }
    }
}

unsafe impl Lockable for ParkingLotMutex {
    fn name() -> &'static str {
        Self::NAME
    }

    #[inline]
    fn lock(&self) {
        self.inner.lock()
    }

    #[inline]
    unsafe fn unlock(&self) {
        self.inner.unlock()
    }
}

/// [`parking_lot::RawRwLock`] behind the [`RwLockable`] interface.
///
/// parking_lot releases shared and exclusive holds through different calls,
/// so the lock remembers whether its current holder is a writer.
pub struct ParkingLotRwLock {
    inner: parking_lot::RawRwLock,
    exclusive: AtomicBool,
}

impl Default for ParkingLotRwLock {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ParkingLotRwLock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParkingLotRwLock")
            .field("locked", &self.inner.is_locked())
            .field("exclusive", &self.exclusive.load(Ordering::Relaxed))
            .finish()
    }
}

impl ParkingLotRwLock {
    pub const NAME: &'static str = "parking_lot::RawRwLock";

    pub const fn new() -> Self {
        Self {
            inner: parking_lot::RawRwLock::INIT,
            exclusive: AtomicBool::new(false),
        }
    }
}

unsafe impl Lockable for ParkingLotRwLock {
    fn name() -> &'static str {
        Self::NAME
    }

    #[inline]
    fn lock(&self) {
        self.write_lock()
    }

    #[inline]
    unsafe fn unlock(&self) {
        // Only the writer ever observes `true`: the flag is set after the
        // exclusive acquire and cleared before the exclusive release.
        if self.exclusive.load(Ordering::Relaxed) {
            self.exclusive.store(false, Ordering::Relaxed);
            self.inner.unlock_exclusive();
        } else {
            self.inner.unlock_shared();
        }
    }
}

unsafe impl RwLockable for ParkingLotRwLock {
    #[inline]
    fn read_lock(&self) {
        self.inner.lock_shared()
    }

    #[inline]
    fn write_lock(&self) {
        self.inner.lock_exclusive();
        self.exclusive.store(true, Ordering::Relaxed);
    }
}
