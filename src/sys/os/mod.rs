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

//! Locks backed directly by the operating system.

#[cfg(unix)]
mod pthread;
#[cfg(unix)]
pub use pthread::{PthreadMutex, PthreadRwLock};

#[cfg(target_vendor = "apple")]
mod unfair;
#[cfg(target_vendor = "apple")]
pub use unfair::OsUnfairLock;

#[cfg(windows)]
mod srw;
#[cfg(windows)]
pub use srw::{SrwLock, SrwRwLock};

/// The platform's cheapest exclusive lock.
#[cfg(target_vendor = "apple")]
pub type OsMutex = OsUnfairLock;
#[cfg(all(unix, not(target_vendor = "apple")))]
pub type OsMutex = PthreadMutex;
#[cfg(windows)]
pub type OsMutex = SrwLock;

/// The platform's reader-writer lock.
#[cfg(unix)]
pub type OsRwLock = PthreadRwLock;
#[cfg(windows)]
pub type OsRwLock = SrwRwLock;
