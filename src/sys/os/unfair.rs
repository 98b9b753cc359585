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

use std::{cell::UnsafeCell, fmt};

use crate::{error::Result, raw::Lockable};

#[allow(non_camel_case_types)]
#[repr(C)]
struct os_unfair_lock {
    _opaque: u32,
}

extern "C" {
    fn os_unfair_lock_lock(lock: *mut os_unfair_lock);
    fn os_unfair_lock_unlock(lock: *mut os_unfair_lock);
}

/// Darwin's `os_unfair_lock`.
///
/// The lock word records the owning thread, so unlocking from another
/// thread aborts the process.
pub struct OsUnfairLock {
    inner: UnsafeCell<os_unfair_lock>,
}

unsafe impl Send for OsUnfairLock {}
unsafe impl Sync for OsUnfairLock {}

impl Default for OsUnfairLock {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for OsUnfairLock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OsUnfairLock").finish_non_exhaustive()
    }
}

impl OsUnfairLock {
    pub const NAME: &'static str = "os_unfair_lock";

    pub const fn new() -> Self {
        Self {
            inner: UnsafeCell::new(os_unfair_lock { _opaque: 0 }),
        }
    }

    /// Never fails, `OS_UNFAIR_LOCK_INIT` is a constant.
    pub fn try_new() -> Result<Self> {
        Ok(Self::new())
    }
}

unsafe impl Lockable for OsUnfairLock {
    fn name() -> &'static str {
        Self::NAME
    }

    #[inline]
    fn lock(&self) {
        unsafe { os_unfair_lock_lock(self.inner.get()) }
    }

    #[inline]
    unsafe fn unlock(&self) {
        os_unfair_lock_unlock(self.inner.get())
    }
}
