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

use crate::config::{CacheConfig, ConfigError};
use cairn_agents::{LoadCoordinator, LoadTicket, SweepTicker};
use cairn_core::asset::{Asset, AssetHandle, Lifetime, PayloadType};
use cairn_core::{AssetBackend, LoadMode};
use cairn_data::CacheStats;
use cairn_io::{FileSystemBackend, MemoryBackend};
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// The resource cache applications talk to.
///
/// Wraps a [`LoadCoordinator`] and the [`SweepTicker`] that ages it. Clones
/// share the same cache and the same ticker.
#[derive(Clone)]
pub struct ResourceCache {
    coordinator: LoadCoordinator,
    ticker: Arc<Mutex<SweepTicker>>,
}

impl ResourceCache {
    /// Builds a cache from `config`, serving `config.asset_root` from disk,
    /// or nothing at all when no root is set.
    pub fn new(config: &CacheConfig, runtime: Handle) -> Result<Self, ConfigError> {
        let backend: Arc<dyn AssetBackend> = match &config.asset_root {
            Some(root) => Arc::new(FileSystemBackend::new(root)),
            None => Arc::new(MemoryBackend::new()),
        };
        Self::with_backends(backend, None, config, runtime)
    }

    /// Builds a cache whose misses go to `resources`, and to `bundle` for
    /// [`LoadMode::Bundle`] requests.
    pub fn with_backends(
        resources: Arc<dyn AssetBackend>,
        bundle: Option<Arc<dyn AssetBackend>>,
        config: &CacheConfig,
        runtime: Handle,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut builder = LoadCoordinator::builder(resources)
            .type_check(config.type_check)
            .default_lifetime(config.default_lifetime()?);
        if let Some(bundle) = bundle {
            builder = builder.bundle_backend(bundle);
        }

        Ok(Self {
            coordinator: builder.build(runtime),
            ticker: Arc::new(Mutex::new(SweepTicker::new(config.sweep_interval()))),
        })
    }

    /// The coordinator behind this cache, for the less common operations.
    pub fn coordinator(&self) -> &LoadCoordinator {
        &self.coordinator
    }

    /// Returns the payload for `path`, loading it on a miss. Blocks the caller
    /// until the backend answers.
    pub fn get(&self, path: &str, payload_type: PayloadType) -> Option<AssetHandle> {
        self.coordinator.load_sync(path, payload_type)
    }

    /// [`ResourceCache::get`] from the backend selected by `mode`.
    pub fn get_from(&self, path: &str, payload_type: PayloadType, mode: LoadMode) -> Option<AssetHandle> {
        self.coordinator.load_sync_from(path, payload_type, mode)
    }

    /// Typed form of [`ResourceCache::get`]. Yields `None` when the cached
    /// payload is of another type.
    pub fn get_as<A: Asset>(&self, path: &str) -> Option<Arc<A>> {
        self.get(path, PayloadType::of::<A>())?.downcast::<A>()
    }

    /// Returns the payload for `path` through `on_complete`, without blocking.
    /// See [`LoadCoordinator::load_async`] for when the callback runs.
    pub fn get_async<F>(&self, path: &str, payload_type: PayloadType, on_complete: F) -> LoadTicket
    where
        F: FnOnce(Option<AssetHandle>) + Send + 'static,
    {
        self.coordinator.load_async(path, payload_type, on_complete)
    }

    /// [`ResourceCache::get_async`] from the backend selected by `mode`.
    pub fn get_async_from<F>(
        &self,
        path: &str,
        payload_type: PayloadType,
        mode: LoadMode,
        on_complete: F,
    ) -> LoadTicket
    where
        F: FnOnce(Option<AssetHandle>) + Send + 'static,
    {
        self.coordinator
            .load_async_from(path, payload_type, mode, on_complete)
    }

    /// Untyped load started on the next scheduler turn.
    pub fn get_deferred<F>(&self, path: &str, on_complete: F)
    where
        F: FnOnce(Option<AssetHandle>) + Send + 'static,
    {
        self.coordinator.load_deferred(path, on_complete);
    }

    /// Withdraws a callback registered by [`ResourceCache::get_async`].
    pub fn cancel(&self, ticket: &LoadTicket) -> bool {
        self.coordinator.cancel(ticket)
    }

    /// Loads `path` as text, blocking on a miss.
    pub fn load_text(&self, path: &str) -> Option<String> {
        self.coordinator.load_text(path)
    }

    /// Loads `path` as text and hands `(name, text)` to `on_complete`.
    pub fn load_text_async<F>(&self, path: &str, name: &str, on_complete: F) -> LoadTicket
    where
        F: FnOnce(&str, Option<String>) + Send + 'static,
    {
        self.coordinator.load_text_async(path, name, on_complete)
    }

    /// Loads `path` as text, or an empty string if that fails.
    pub fn read_text(&self, path: &str) -> String {
        self.coordinator.read_text(path)
    }

    /// Reads a file straight from storage, bypassing the cache.
    pub fn read_raw<F>(&self, path: impl AsRef<Path>, name: &str, on_complete: F)
    where
        F: FnOnce(&str, Option<Vec<u8>>),
    {
        self.coordinator.read_raw(path, name, on_complete);
    }

    /// Non-blocking form of [`ResourceCache::read_raw`]; `on_complete` runs
    /// on a runtime worker thread.
    pub fn read_raw_async<F>(&self, path: impl AsRef<Path>, name: &str, on_complete: F)
    where
        F: FnOnce(&str, Option<Vec<u8>>) + Send + 'static,
    {
        self.coordinator.read_raw_async(path, name, on_complete);
    }

    /// Caches `handle` under `path` with an explicit lifetime.
    pub fn insert(&self, path: &str, handle: AssetHandle, lifetime: Lifetime) -> bool {
        self.coordinator.insert(path, handle, lifetime)
    }

    /// Caches `asset` under `path` for the whole session.
    pub fn insert_permanent<A: Asset>(&self, path: &str, asset: A) -> bool {
        self.insert(path, AssetHandle::new(asset), Lifetime::Permanent)
    }

    /// Drops the entry cached for `path`.
    pub fn unload(&self, path: &str) -> bool {
        self.coordinator.unload(path)
    }

    /// Drops every cached entry.
    pub fn clear_all(&self) {
        self.coordinator.clear_all();
    }

    /// Asks the backends to free what is no longer referenced.
    pub fn reclaim_unused(&self) {
        self.coordinator.reclaim_unused();
    }

    /// Advances the sweep clock by `delta`. Call it once per frame.
    ///
    /// Returns `true` if the cache was swept.
    pub fn update(&self, delta: Duration) -> bool {
        self.ticker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .update(delta, &self.coordinator)
    }

    /// Sweeps on a timer instead of through [`ResourceCache::update`].
    ///
    /// Uses a fresh ticker with this cache's interval; do not combine with
    /// `update`, or entries age twice as fast.
    pub fn spawn_sweeper(&self) -> JoinHandle<()> {
        let interval = self
            .ticker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .interval();
        log::info!("Starting background sweeper ({interval:?} interval)");
        SweepTicker::new(interval).spawn(self.coordinator.clone())
    }

    /// A snapshot of the cache counters.
    pub fn stats(&self) -> CacheStats {
        self.coordinator.stats()
    }
}
