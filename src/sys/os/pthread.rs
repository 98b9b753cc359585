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

use std::{cell::UnsafeCell, ffi::c_void, fmt, io, os::raw::c_int, ptr};

use crate::{
    error::{Error, Result},
    raw::{Lockable, RwLockable},
};

// Opaque storage, sized for the largest libc layout we build against
// (macOS: 64 byte mutex, 200 byte rwlock).
#[allow(non_camel_case_types)]
#[repr(C, align(16))]
struct pthread_mutex_t {
    _opaque: [u8; 64],
}

#[allow(non_camel_case_types)]
#[repr(C, align(16))]
struct pthread_rwlock_t {
    _opaque: [u8; 256],
}

extern "C" {
    fn pthread_mutex_init(p: *mut pthread_mutex_t, attr: *const c_void) -> c_int;
    fn pthread_mutex_destroy(p: *mut pthread_mutex_t) -> c_int;
    fn pthread_mutex_lock(p: *mut pthread_mutex_t) -> c_int;
    fn pthread_mutex_unlock(p: *mut pthread_mutex_t) -> c_int;

    fn pthread_rwlock_init(p: *mut pthread_rwlock_t, attr: *const c_void) -> c_int;
    fn pthread_rwlock_destroy(p: *mut pthread_rwlock_t) -> c_int;
    fn pthread_rwlock_rdlock(p: *mut pthread_rwlock_t) -> c_int;
    fn pthread_rwlock_wrlock(p: *mut pthread_rwlock_t) -> c_int;
    fn pthread_rwlock_unlock(p: *mut pthread_rwlock_t) -> c_int;
}

/// Acquire calls must never return without the lock. `EDEADLK` (the caller
/// already holds it) and `EAGAIN` (reader count exhausted) would otherwise
/// hand out a second reference next to a live `&mut T`, so any failure panics
/// in release builds too.
#[inline]
fn check_acquire(op: &'static str, rc: c_int) {
    if rc != 0 {
        acquire_failed(op, rc)
    }
}

#[cold]
#[inline(never)]
fn acquire_failed(op: &'static str, rc: c_int) -> ! {
    let err = io::Error::from_raw_os_error(rc);
    tracing::error!(op, code = rc, "lock acquisition refused");
    panic!("{} failed: {} (recursive acquisition would deadlock)", op, err)
}

/// A default-attribute `pthread_mutex_t`.
///
/// The primitive lives on the heap since pthread objects must not move once
/// initialized, while Rust values move freely.
pub struct PthreadMutex {
    inner: Box<UnsafeCell<pthread_mutex_t>>,
}

unsafe impl Send for PthreadMutex {}
unsafe impl Sync for PthreadMutex {}

impl Default for PthreadMutex {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PthreadMutex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PthreadMutex").finish_non_exhaustive()
    }
}

impl Drop for PthreadMutex {
    fn drop(&mut self) {
        let rc = unsafe { pthread_mutex_destroy(self.inner.get()) };
        if rc != 0 {
            tracing::warn!(primitive = Self::NAME, code = rc, "destroy failed, lock still held?");
        } else {
            tracing::trace!(primitive = Self::NAME, "destroyed");
        }
        debug_assert_eq!(rc, 0);
    }
}

impl PthreadMutex {
    pub const NAME: &'static str = "pthread_mutex_t";

    /// # Panics
    ///
    /// Panics if `pthread_mutex_init` fails. See [`PthreadMutex::try_new`].
    pub fn new() -> Self {
        Self::try_new().unwrap_or_else(|err| panic!("{}", err))
    }

    pub fn try_new() -> Result<Self> {
        let inner = Box::new(UnsafeCell::new(pthread_mutex_t { _opaque: [0; 64] }));
        let rc = unsafe { pthread_mutex_init(inner.get(), ptr::null()) };
        if rc != 0 {
            return Err(Error::Init {
                primitive: Self::NAME,
                code: rc,
            });
        }

        tracing::trace!(primitive = Self::NAME, "initialized");
        Ok(Self { inner })
    }
}

unsafe impl Lockable for PthreadMutex {
    fn name() -> &'static str {
        Self::NAME
    }

    #[inline]
    fn lock(&self) {
        let rc = unsafe { pthread_mutex_lock(self.inner.get()) };
        check_acquire("pthread_mutex_lock", rc);
    }

    #[inline]
    unsafe fn unlock(&self) {
        let rc = pthread_mutex_unlock(self.inner.get());
        debug_assert_eq!(rc, 0);
    }
}

/// A default-attribute `pthread_rwlock_t`, heap allocated like
/// [`PthreadMutex`].
pub struct PthreadRwLock {
    inner: Box<UnsafeCell<pthread_rwlock_t>>,
}

unsafe impl Send for PthreadRwLock {}
unsafe impl Sync for PthreadRwLock {}

impl Default for PthreadRwLock {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PthreadRwLock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PthreadRwLock").finish_non_exhaustive()
    }
}

impl Drop for PthreadRwLock {
    fn drop(&mut self) {
        let rc = unsafe { pthread_rwlock_destroy(self.inner.get()) };
        if rc != 0 {
            tracing::warn!(primitive = Self::NAME, code = rc, "destroy failed, lock still held?");
        } else {
            tracing::trace!(primitive = Self::NAME, "destroyed");
        }
        debug_assert_eq!(rc, 0);
    }
}

impl PthreadRwLock {
    pub const NAME: &'static str = "pthread_rwlock_t";

    /// # Panics
    ///
    /// Panics if `pthread_rwlock_init` fails. See [`PthreadRwLock::try_new`].
    pub fn new() -> Self {
        Self::try_new().unwrap_or_else(|err| panic!("{}", err))
    }

    pub fn try_new() -> Result<Self> {
        let inner = Box::new(UnsafeCell::new(pthread_rwlock_t { _opaque: [0; 256] }));
        let rc = unsafe { pthread_rwlock_init(inner.get(), ptr::null()) };
        if rc != 0 {
            return Err(Error::Init {
                primitive: Self::NAME,
                code: rc,
            });
        }

        tracing::trace!(primitive = Self::NAME, "initialized");
        Ok(Self { inner })
    }
}

unsafe impl Lockable for PthreadRwLock {
    fn name() -> &'static str {
        Self::NAME
    }

    #[inline]
    fn lock(&self) {
        self.write_lock()
    }

    #[inline]
    unsafe fn unlock(&self) {
        let rc = pthread_rwlock_unlock(self.inner.get());
        debug_assert_eq!(rc, 0);
    }
}

unsafe impl RwLockable for PthreadRwLock {
    #[inline]
    fn read_lock(&self) {
        let rc = unsafe { pthread_rwlock_rdlock(self.inner.get()) };
        check_acquire("pthread_rwlock_rdlock", rc);
    }

    #[inline]
    fn write_lock(&self) {
        let rc = unsafe { pthread_rwlock_wrlock(self.inner.get()) };
        check_acquire("pthread_rwlock_wrlock", rc);
    }
}
