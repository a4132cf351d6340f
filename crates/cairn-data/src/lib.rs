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

//! # Cairn Data
//!
//! The in-memory side of the cache: the path to entry map, the lifetime of
//! every entry, and the sweep that ages and evicts them.

#![warn(missing_docs)]

mod stats;
mod store;

pub use stats::CacheStats;
pub use store::{CacheEntry, CacheStore};
