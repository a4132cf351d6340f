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

//! The public-facing SDK for the Cairn resource cache.
//!
//! Applications build one [`ResourceCache`] from a [`CacheConfig`], share it
//! (it is cheap to clone) and drive its sweep either from their own frame
//! loop through [`ResourceCache::update`] or from a background task through
//! [`ResourceCache::spawn_sweeper`].

#![warn(missing_docs)]

mod cache;
mod config;
mod logging;

pub use cache::ResourceCache;
pub use config::{CacheConfig, ConfigError};
pub use logging::init_logging;

/// The types most applications need, in one import.
pub mod prelude {
    pub use cairn_agents::{LoadTicket, TypeCheck};
    pub use cairn_core::asset::{
        Asset, AssetHandle, BinaryAsset, Lifetime, PayloadType, TextAsset,
    };
    pub use cairn_core::{AssetBackend, LoadError, LoadMode};
    pub use cairn_data::CacheStats;

    pub use crate::{CacheConfig, ResourceCache};
}
