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

use crate::{raw::Lockable, scoped, sys::UnfairLock};

/// A value that can only be reached while holding its own lock.
///
/// The lock is private to the value and every access goes through
/// [`with_lock`](LockedValue::with_lock), which passes `&mut T` to a closure
/// and releases the lock when the closure returns or unwinds.
///
/// ```
/// use lockwrap::LockedValue;
///
/// let hits = LockedValue::new(0u32);
/// hits.with_lock(|n| *n += 1);
/// assert_eq!(hits.value(), 1);
/// ```
pub struct LockedValue<T, L = UnfairLock> {
    lock: L,
    value: UnsafeCell<T>,
}

unsafe impl<T: Send, L: Send> Send for LockedValue<T, L> {}
unsafe impl<T: Send, L: Sync> Sync for LockedValue<T, L> {}

impl<T, L> fmt::Debug for LockedValue<T, L>
where
    L: Lockable,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LockedValue")
            .field("lock", &L::name())
            .finish_non_exhaustive()
    }
}

impl<T: Default, L: Lockable + Default> Default for LockedValue<T, L> {
    fn default() -> Self {
        Self::from(T::default())
    }
}

impl<T, L: Lockable + Default> From<T> for LockedValue<T, L> {
    fn from(value: T) -> Self {
        Self::from_parts(value, L::default())
    }
}

impl<T> LockedValue<T> {
    /// Guards `value` with a fresh [`UnfairLock`].
    pub fn new(value: T) -> Self {
        Self::from_parts(value, UnfairLock::new())
    }
}

impl<T, L: Lockable> LockedValue<T, L> {
    /// Guards `value` with `lock`, which becomes owned by the wrapper.
    pub fn from_parts(value: T, lock: L) -> Self {
        Self {
            lock,
            value: UnsafeCell::new(value),
        }
    }

    /// Runs `f` on the value while holding the lock and returns its result.
    ///
    /// Calling any access method of the same `LockedValue` from inside `f`
    /// deadlocks or panics, depending on the backend. It never grants a
    /// second `&mut T`.
    #[inline]
    pub fn with_lock<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        scoped::with_lock(&self.lock, || f(unsafe { &mut *self.value.get() }))
    }

    /// Clones the value out under the lock.
    pub fn value(&self) -> T
    where
        T: Clone,
    {
        self.with_lock(|value| value.clone())
    }

    /// Borrowing `self` mutably proves there is no other accessor, so no
    /// locking takes place.
    pub fn get_mut(&mut self) -> &mut T {
        self.value.get_mut()
    }

    pub fn into_inner(self) -> T {
        self.value.into_inner()
    }
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;
    use crate::sys::SpinLock;
    use std::{
        panic::{catch_unwind, AssertUnwindSafe},
        sync::Arc,
        thread,
    };

    #[test]
    fn with_lock_returns_closure_result() {
        let list = LockedValue::new(vec![1, 2, 3]);
        let len = list.with_lock(|v| {
            v.push(4);
            v.len()
        });
        assert_eq!(len, 4);
        assert_eq!(list.value(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn custom_lock() {
        let value = LockedValue::from_parts(String::from("a"), SpinLock::new());
        value.with_lock(|s| s.push('b'));
        assert_eq!(value.into_inner(), "ab");
    }

    #[test]
    fn boxed_dyn_lock() {
        let lock: Box<dyn Lockable + Send + Sync> = Box::new(SpinLock::new());
        let value = Arc::new(LockedValue::from_parts(0usize, lock));

        let threads: Vec<_> = (0..4)
            .map(|_| {
                let value = value.clone();
                thread::spawn(move || (0..100).for_each(|_| value.with_lock(|n| *n += 1)))
            })
            .collect();
        threads.into_iter().for_each(|t| t.join().unwrap());
        assert_eq!(value.value(), 400);
    }

    #[test]
    fn get_mut_skips_lock() {
        let mut value: LockedValue<u8> = LockedValue::default();
        *value.get_mut() = 9;
        assert_eq!(value.value(), 9);
    }

    #[test]
    fn panic_releases_lock() {
        let value: LockedValue<i32> = LockedValue::from(1);
        let result = catch_unwind(AssertUnwindSafe(|| {
            value.with_lock(|n| {
                *n = 2;
                panic!("boom");
            })
        }));
        assert!(result.is_err());
        // writes made before the panic stay, there is no poisoning
        assert_eq!(value.value(), 2);
    }

    #[test]
    fn debug_hides_value() {
        let value = LockedValue::from_parts("secret", SpinLock::new());
        let printed = format!("{:?}", value);
        assert!(printed.contains("spin_lock"));
        assert!(!printed.contains("secret"));
    }
}
