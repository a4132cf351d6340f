// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use serde::{Deserialize, Serialize};

/// Counters describing how the cache has been used.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    /// Entries currently stored.
    pub entries: usize,
    /// Requests answered from the store.
    pub hits: u64,
    /// Requests that had to go to a backend.
    pub misses: u64,
    /// Asynchronous requests that joined an already pending backend call.
    pub coalesced: u64,
    /// Backend calls that produced nothing.
    pub failures: u64,
    /// Entries removed by the sweep.
    pub evictions: u64,
}

impl CacheStats {
    /// Fraction of requests answered from the store, 0.0 when idle.
    pub fn hit_ratio(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}
