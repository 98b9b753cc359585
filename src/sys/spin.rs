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
    hint::spin_loop,
    sync::atomic::{AtomicBool, AtomicUsize, Ordering},
};

use crate::{
    config::SpinConfig,
    raw::{Lockable, RwLockable},
};

#[derive(Copy, Clone, Debug)]
struct Spin {
    round: u32,
    config: SpinConfig,
}

impl Spin {
    fn new(config: SpinConfig) -> Self {
        Self { round: 0, config }
    }

    fn wait(&mut self) {
        if self.config.should_yield(self.round) {
            #[cfg(feature = "std")]
            std::thread::yield_now();
        } else {
            let shift = self.config.burst_shift(self.round);
            (0..(1u32 << shift)).for_each(|_| spin_loop());
        }
        self.round = self.round.saturating_add(1);
    }
}

/// Test-and-test-and-set spin lock. Unfair and not reentrant.
pub struct SpinLock {
    locked: AtomicBool,
    config: SpinConfig,
}

impl Default for SpinLock {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SpinLock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpinLock")
            .field("locked", &self.locked.load(Ordering::Relaxed))
            .finish()
    }
}

impl SpinLock {
    pub const NAME: &'static str = "spin_lock";

    pub const fn new() -> Self {
        Self::with_config(SpinConfig::new())
    }

    pub const fn with_config(config: SpinConfig) -> Self {
        Self {
            locked: AtomicBool::new(false),
            config,
        }
    }

    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    #[inline]
    fn try_acquire(&self) -> bool {
        !self.locked.swap(true, Ordering::Acquire)
    }

    #[cfg(not(any(target_arch = "x86", target_arch = "x86_64")))]
    #[inline]
    fn try_acquire(&self) -> bool {
        self.locked
            .compare_exchange_weak(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_ok()
    }

    #[cold]
    fn lock_slow(&self) {
        let mut spin = Spin::new(self.config);
        loop {
            while self.locked.load(Ordering::Relaxed) {
                spin.wait();
            }
            if self.try_acquire() {
                return;
            }
        }
    }
}

unsafe impl Lockable for SpinLock {
    fn name() -> &'static str {
        Self::NAME
    }

    #[inline]
    fn lock(&self) {
        if !self.try_acquire() {
            self.lock_slow();
        }
    }

    #[inline]
    unsafe fn unlock(&self) {
        self.locked.store(false, Ordering::Release);
    }
}

const WRITER: usize = 1;
const READER: usize = 2;

/// Spinning reader-writer lock.
///
/// Readers only wait for an active writer, so a steady stream of readers can
/// starve writers indefinitely.
pub struct SpinRwLock {
    state: AtomicUsize,
    config: SpinConfig,
}

impl Default for SpinRwLock {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SpinRwLock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.load(Ordering::Relaxed);
        f.debug_struct("SpinRwLock")
            .field("writer", &(state & WRITER != 0))
            .field("readers", &(state / READER))
            .finish()
    }
}

impl SpinRwLock {
    pub const NAME: &'static str = "spin_rwlock";

    pub const fn new() -> Self {
        Self::with_config(SpinConfig::new())
    }

    pub const fn with_config(config: SpinConfig) -> Self {
        Self {
            state: AtomicUsize::new(0),
            config,
        }
    }
}

unsafe impl Lockable for SpinRwLock {
    fn name() -> &'static str {
        Self::NAME
    }

    #[inline]
    fn lock(&self) {
        self.write_lock()
    }

    #[inline]
    unsafe fn unlock(&self) {
        // While a writer holds the lock no reader can, so the caller is the
        // writer iff the bit is set.
        if self.state.load(Ordering::Relaxed) & WRITER != 0 {
            self.state.store(0, Ordering::Release);
        } else {
            self.state.fetch_sub(READER, Ordering::Release);
        }
    }
}

unsafe impl RwLockable for SpinRwLock {
    fn read_lock(&self) {
        let mut spin = Spin::new(self.config);
        let mut state = self.state.load(Ordering::Relaxed);
        loop {
            if state & WRITER != 0 {
                spin.wait();
                state = self.state.load(Ordering::Relaxed);
                continue;
            }
            let new_state = state
                .checked_add(READER)
                .expect("SpinRwLock reader count overflowed");
            match self.state.compare_exchange_weak(
                state,
                new_state,
                Ordering::Acquire,
                Ordering::Relaxed,
            ) {
                Ok(_) => return,
                Err(e) => state = e,
            }
        }
    }

    fn write_lock(&self) {
        let mut spin = Spin::new(self.config);
        loop {
            match self.state.compare_exchange_weak(
                0,
                WRITER,
                Ordering::Acquire,
                Ordering::Relaxed,
            ) {
                Ok(_) => return,
                Err(_) => {
                    while self.state.load(Ordering::Relaxed) != 0 {
                        spin.wait();
                    }
                }
            }
        }
    }
}
