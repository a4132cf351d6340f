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

//! The interface the cache drives to fetch payloads it does not hold yet.

use crate::asset::{AssetHandle, PayloadType};
use crate::error::LoadError;
use async_trait::async_trait;

/// Selects which backend a load request goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LoadMode {
    /// The primary backend, rooted at the bundled resources.
    #[default]
    Resources,
    /// An optional secondary backend for packaged bundles.
    Bundle,
}

/// A source of truth for payloads, given a cache key and a declared type.
///
/// The cache treats a backend as opaque: it may read a local directory, an
/// archive, the network, or an in-memory table. The blocking form is called
/// by synchronous loads and must be fast; anything that performs network I/O
/// should only be reached through [`AssetBackend::load_async`].
///
/// Completion of `load_async` happens on whichever runtime thread polls the
/// future; the cache does not move it anywhere else.
#[async_trait]
pub trait AssetBackend: Send + Sync {
    /// A short name used in log messages.
    fn name(&self) -> &str;

    /// Loads the payload stored under `key`, blocking the caller.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::NotFound`] when nothing is stored under `key`, and
    /// [`LoadError::Backend`] or [`LoadError::Decode`] when reading or decoding
    /// the payload failed.
    fn load(&self, key: &str, payload_type: PayloadType) -> Result<AssetHandle, LoadError>;

    /// Loads the payload stored under `key` without blocking the caller.
    ///
    /// The default implementation runs the blocking [`AssetBackend::load`].
    async fn load_async(
        &self,
        key: &str,
        payload_type: PayloadType,
    ) -> Result<AssetHandle, LoadError> {
        self.load(key, payload_type)
    }

    /// Releases backend-side resources no longer referenced by anyone.
    ///
    /// Never called implicitly by a cache clear.
    fn unload_unused(&self) {}
}
