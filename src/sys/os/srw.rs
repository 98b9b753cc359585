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

use std::{
    cell::UnsafeCell,
    fmt,
    sync::atomic::{AtomicBool, Ordering},
};

use crate::{
    error::Result,
    raw::{Lockable, RwLockable},
};

#[link(name = "kernel32")]
extern "system" {
    fn AcquireSRWLockExclusive(p: *mut usize);
    fn ReleaseSRWLockExclusive(p: *mut usize);
    fn AcquireSRWLockShared(p: *mut usize);
    fn ReleaseSRWLockShared(p: *mut usize);
}

/// An `SRWLOCK` only ever taken in exclusive mode.
pub struct SrwLock(UnsafeCell<usize>);

unsafe impl Send for SrwLock {}
unsafe impl Sync for SrwLock {}

impl Default for SrwLock {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SrwLock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SrwLock").finish_non_exhaustive()
    }
}

impl SrwLock {
    pub const NAME: &'static str = "SRWLOCK";

    pub const fn new() -> Self {
        Self(UnsafeCell::new(0))
    }

    /// Never fails, `SRWLOCK_INIT` is a constant.
    pub fn try_new() -> Result<Self> {
        Ok(Self::new())
    }
}

unsafe impl Lockable for SrwLock {
    fn name() -> &'static str {
        Self::NAME
    }

    #[inline]
    fn lock(&self) {
        unsafe { AcquireSRWLockExclusive(self.0.get()) }
    }

    #[inline]
    unsafe fn unlock(&self) {
        ReleaseSRWLockExclusive(self.0.get())
    }
}

/// An `SRWLOCK` used in both shared and exclusive mode.
///
/// Windows releases the two modes through different calls, so the holder
/// kind is tracked next to the lock word.
pub struct SrwRwLock {
    inner: UnsafeCell<usize>,
    exclusive: AtomicBool,
}

unsafe impl Send for SrwRwLock {}
unsafe impl Sync for SrwRwLock {}

impl Default for SrwRwLock {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SrwRwLock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SrwRwLock")
            .field("exclusive", &self.exclusive.load(Ordering::Relaxed))
            .finish()
    }
}

impl SrwRwLock {
    pub const NAME: &'static str = "SRWLOCK";

    pub const fn new() -> Self {
        Self {
            inner: UnsafeCell::new(0),
            exclusive: AtomicBool::new(false),
        }
    }

    /// Never fails, `SRWLOCK_INIT` is a constant.
    pub fn try_new() -> Result<Self> {
        Ok(Self::new())
    }
}

unsafe impl Lockable for SrwRwLock {
    fn name() -> &'static str {
        Self::NAME
    }

    #[inline]
    fn lock(&self) {
        self.write_lock()
    }

    #[inline]
    unsafe fn unlock(&self) {
        if self.exclusive.load(Ordering::Relaxed) {
            self.exclusive.store(false, Ordering::Relaxed);
            ReleaseSRWLockExclusive(self.inner.get())
        } else {
            ReleaseSRWLockShared(self.inner.get())
        }
    }
}

unsafe impl RwLockable for SrwRwLock {
    #[inline]
    fn read_lock(&self) {
        unsafe { AcquireSRWLockShared(self.inner.get()) }
    }

    #[inline]
    fn write_lock(&self) {
        unsafe { AcquireSRWLockExclusive(self.inner.get()) }
        self.exclusive.store(true, Ordering::Relaxed);
    }
}
