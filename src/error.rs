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

use thiserror::Error;

/// Failures while setting up a platform primitive.
///
/// Lock and unlock never fail with a value: misuse of a lock (double
/// release, recursive acquire) is undefined at the platform level and is not
/// reported here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    #[error("failed to initialize {primitive} (error code {code})")]
    Init { primitive: &'static str, code: i32 },
}

pub type Result<T> = core::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_primitive_and_code() {
        let err = Error::Init {
            primitive: "pthread_mutex_t",
            code: 12,
        };
        assert_eq!(
            err.to_string(),
            "failed to initialize pthread_mutex_t (error code 12)"
        );
    }
}
