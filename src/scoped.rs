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

//! Scoped acquisition: take a lock, run some code, release on every exit.
//!
//! The guards release in `Drop`, so a panic unwinding out of the protected
//! code still releases the lock before the panic reaches the caller.

use core::{fmt, marker::PhantomData};

use crate::raw::{Lockable, RwLockable};

// Platform locks must be released on the thread that acquired them.
type NotSend = PhantomData<*const ()>;

/// Holds a [`Lockable`] through [`Lockable::lock`] until dropped.
#[must_use = "if unused the lock is released immediately"]
pub struct LockGuard<'a, L: Lockable + ?Sized> {
    lock: &'a L,
    _not_send: NotSend,
}

impl<'a, L: Lockable + ?Sized> LockGuard<'a, L> {
    #[inline]
    pub fn new(lock: &'a L) -> Self {
        lock.lock();
        Self {
            lock,
            _not_send: PhantomData,
        }
    }
}

impl<'a, L: Lockable + ?Sized> Drop for LockGuard<'a, L> {
    #[inline]
    fn drop(&mut self) {
        unsafe { self.lock.unlock() }
    }
}

impl<'a, L: Lockable + ?Sized> fmt::Debug for LockGuard<'a, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LockGuard").finish_non_exhaustive()
    }
}

/// Holds shared access to a [`RwLockable`] until dropped.
#[must_use = "if unused the lock is released immediately"]
pub struct ReadGuard<'a, L: RwLockable + ?Sized> {
    lock: &'a L,
    _not_send: NotSend,
}

impl<'a, L: RwLockable + ?Sized> ReadGuard<'a, L> {
    #[inline]
    pub fn new(lock: &'a L) -> Self {
        lock.read_lock();
        Self {
            lock,
            _not_send: PhantomData,
        }
    }
}

impl<'a, L: RwLockable + ?Sized> Drop for ReadGuard<'a, L> {
    #[inline]
    fn drop(&mut self) {
        unsafe { self.lock.unlock() }
    }
}

impl<'a, L: RwLockable + ?Sized> fmt::Debug for ReadGuard<'a, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReadGuard").finish_non_exhaustive()
    }
}

/// Holds exclusive access to a [`RwLockable`] until dropped.
#[must_use = "if unused the lock is released immediately"]
pub struct WriteGuard<'a, L: RwLockable + ?Sized> {
    lock: &'a L,
    _not_send: NotSend,
}

impl<'a, L: RwLockable + ?Sized> WriteGuard<'a, L> {
    #[inline]
    pub fn new(lock: &'a L) -> Self {
        lock.write_lock();
        Self {
            lock,
            _not_send: PhantomData,
        }
    }
}

impl<'a, L: RwLockable + ?Sized> Drop for WriteGuard<'a, L> {
    #[inline]
    fn drop(&mut self) {
        unsafe { self.lock.unlock() }
    }
}

impl<'a, L: RwLockable + ?Sized> fmt::Debug for WriteGuard<'a, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WriteGuard").finish_non_exhaustive()
    }
}

/// Runs `f` while holding `lock` through its plain [`Lockable::lock`].
#[inline]
pub fn with_lock<L, R>(lock: &L, f: impl FnOnce() -> R) -> R
where
    L: Lockable + ?Sized,
{
    let _guard = LockGuard::new(lock);
    f()
}

/// Runs `f` while holding shared access to `lock`.
#[inline]
pub fn with_read_lock<L, R>(lock: &L, f: impl FnOnce() -> R) -> R
where
    L: RwLockable + ?Sized,
{
    let _guard = ReadGuard::new(lock);
    f()
}

/// Runs `f` while holding exclusive access to `lock`.
#[inline]
pub fn with_write_lock<L, R>(lock: &L, f: impl FnOnce() -> R) -> R
where
    L: RwLockable + ?Sized,
{
    let _guard = WriteGuard::new(lock);
    f()
}
