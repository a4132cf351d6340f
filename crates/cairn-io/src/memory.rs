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

//! An in-memory backend, used for preloaded content and as a test double.

use async_trait::async_trait;
use cairn_core::asset::{normalize, Asset, AssetHandle, PayloadType};
use cairn_core::{AssetBackend, LoadError};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;
use std::time::Duration;

/// A backend serving payloads from a table held in memory.
///
/// Like a resource lookup by type, a typed request only succeeds when the
/// stored payload has that type. An optional latency is applied to
/// asynchronous loads to stand in for a slow source.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    assets: RwLock<HashMap<String, AssetHandle>>,
    latency: Option<Duration>,
    loads: AtomicUsize,
}

impl MemoryBackend {
    /// Creates an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Delays every asynchronous load by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Stores `asset` under `path` and returns `self` for chaining.
    pub fn with_asset<A: Asset>(self, path: &str, asset: A) -> Self {
        self.insert(path, AssetHandle::new(asset));
        self
    }

    /// Stores `handle` under `path`, replacing what was there.
    pub fn insert(&self, path: &str, handle: AssetHandle) {
        let mut assets = self.assets.write().unwrap_or_else(|e| e.into_inner());
        assets.insert(normalize(path).to_string(), handle);
    }

    /// Removes what is stored under `path`.
    pub fn remove(&self, path: &str) -> Option<AssetHandle> {
        let mut assets = self.assets.write().unwrap_or_else(|e| e.into_inner());
        assets.remove(normalize(path))
    }

    /// How many times the backend has been asked for a payload.
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    fn lookup(&self, key: &str, payload_type: PayloadType) -> Result<AssetHandle, LoadError> {
        self.loads.fetch_add(1, Ordering::SeqCst);

        let assets = self.assets.read().unwrap_or_else(|e| e.into_inner());
        match assets.get(key) {
            Some(handle) if payload_type.accepts(handle.payload_type()) => Ok(handle.clone()),
            _ => Err(LoadError::NotFound {
                path: key.to_string(),
            }),
        }
    }
}

#[async_trait]
impl AssetBackend for MemoryBackend {
    fn name(&self) -> &str {
        "memory"
    }

    fn load(&self, key: &str, payload_type: PayloadType) -> Result<AssetHandle, LoadError> {
        self.lookup(key, payload_type)
    }

    async fn load_async(
        &self,
        key: &str,
        payload_type: PayloadType,
    ) -> Result<AssetHandle, LoadError> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        self.lookup(key, payload_type)
    }
}
