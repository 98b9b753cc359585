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

//! Mutex and reader-writer lock traits, and values bound to their lock.
//!
//! [`LockedValue`] and [`RwLockedValue`] own their data together with a
//! lock, and only hand the data to closures that run while the lock is held.
//! Any [`Lockable`] / [`RwLockable`] can be plugged in; by default they use
//! [`UnfairLock`] and [`RwLock`], which wrap the platform's primitives.

#![cfg_attr(not(feature = "std"), no_std)]

mod config;
mod locked;
mod rw_locked;

pub mod raw;
pub mod scoped;
pub mod sys;

#[cfg(feature = "std")]
mod error;
#[cfg(feature = "std")]
pub use error::{Error, Result};

pub use config::{SpinConfig, MAX_SPIN_LIMIT};
pub use locked::LockedValue;
pub use raw::{Lockable, RwLockable};
pub use rw_locked::RwLockedValue;
pub use sys::{RwLock, UnfairLock};
