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

/// Largest accepted `spin_limit`; a round never issues more than
/// `1 << MAX_SPIN_LIMIT` spin hints.
pub const MAX_SPIN_LIMIT: u32 = 16;

/// Backoff tuning for [`SpinLock`](crate::sys::SpinLock) and
/// [`SpinRwLock`](crate::sys::SpinRwLock).
///
/// A contended acquire waits in rounds. Round `n` issues `1 << n` spin-loop
/// hints, growing until `spin_limit`. Once `yield_after` rounds have gone by
/// every further round yields the thread to the OS scheduler instead (only
/// with the `std` feature; without it the waiter keeps spinning at the
/// largest burst size).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpinConfig {
    /// Largest exponent of a spin burst, clamped to [`MAX_SPIN_LIMIT`].
    pub spin_limit: u32,
    /// Rounds to wait before switching to yielding, `None` to never yield.
    pub yield_after: Option<u32>,
}

impl Default for SpinConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl SpinConfig {
    pub const fn new() -> Self {
        Self {
            spin_limit: 6,
            yield_after: Some(10),
        }
    }

    /// Burns CPU for the lowest hand-off latency. Only sensible when the
    /// critical sections are tiny and there are fewer threads than cores.
    pub const fn low_latency() -> Self {
        Self {
            spin_limit: 10,
            yield_after: None,
        }
    }

    /// Gives up the core early, for oversubscribed machines.
    pub const fn low_cpu() -> Self {
        Self {
            spin_limit: 3,
            yield_after: Some(3),
        }
    }

    pub const fn with_spin_limit(mut self, spin_limit: u32) -> Self {
        self.spin_limit = if spin_limit > MAX_SPIN_LIMIT {
            MAX_SPIN_LIMIT
        } else {
            spin_limit
        };
        self
    }

    pub const fn with_yield_after(mut self, yield_after: Option<u32>) -> Self {
        self.yield_after = yield_after;
        self
    }

    #[inline]
    pub(crate) fn burst_shift(&self, round: u32) -> u32 {
        round.min(self.spin_limit).min(MAX_SPIN_LIMIT)
    }

    #[inline]
    pub(crate) fn should_yield(&self, round: u32) -> bool {
        cfg!(feature = "std") && self.yield_after.map_or(false, |after| round >= after)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spin_limit_is_clamped() {
        let config = SpinConfig::new().with_spin_limit(64);
        assert_eq!(config.spin_limit, MAX_SPIN_LIMIT);
        assert_eq!(config.burst_shift(1000), MAX_SPIN_LIMIT);

        // fields are public, so the clamp is also applied at use
        let raw = SpinConfig {
            spin_limit: 40,
            yield_after: None,
        };
        assert_eq!(raw.burst_shift(40), MAX_SPIN_LIMIT);
    }

    #[test]
    fn bursts_grow_then_plateau() {
        let config = SpinConfig::new().with_spin_limit(4);
        let expected = [0, 1, 2, 3, 4, 4, 4];
        for (round, &shift) in expected.iter().enumerate() {
            assert_eq!(config.burst_shift(round as u32), shift);
        }
    }

    #[test]
    fn never_yields_without_threshold() {
        let config = SpinConfig::low_latency();
        assert!(!config.should_yield(u32::MAX));
    }

    #[cfg(feature = "std")]
    #[test]
    fn yields_after_threshold() {
        let config = SpinConfig::new().with_yield_after(Some(2));
        assert!(!config.should_yield(1));
        assert!(config.should_yield(2));
        assert!(config.should_yield(3));
    }
}
