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

//! The LoadCoordinator answers every load request against the cache.
//!
//! A request is keyed by its normalized path. A hit is answered from the
//! [`CacheStore`] without touching the entry's lifetime. A miss goes to a
//! backend: synchronously for [`LoadCoordinator::load_sync`], on the tokio
//! runtime for [`LoadCoordinator::load_async`]. While an asynchronous miss is
//! in flight, further requests for the same key join it instead of calling
//! the backend again, and are all answered in the order they arrived.
//!
//! One mutex guards the store, the pending requests and the counters.
//! Callbacks are always invoked after that mutex has been released, so a
//! callback may freely call back into the coordinator.

mod builder;
mod pending;
mod text;

pub use builder::CoordinatorBuilder;
pub use pending::LoadTicket;

use cairn_core::asset::{normalize, normalize_key, AssetHandle, Lifetime, PayloadType};
use cairn_core::{AssetBackend, LoadError, LoadMode};
use cairn_data::{CacheStats, CacheStore};
use pending::{LoadCallback, PendingRequest, Waiter, WaiterId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::runtime::Handle;

/// Whether the declared type of a request is enforced.
///
/// `Lenient` hands back whatever is cached under a path, whatever type the
/// request declared. `Strict` turns a mismatch into
/// [`LoadError::TypeMismatch`]: the caller gets nothing and a failed load is
/// not cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeCheck {
    /// Declared types are informational only.
    #[default]
    Lenient,
    /// Declared types must match the payload.
    Strict,
}

struct CoordinatorState {
    store: CacheStore,
    pending: HashMap<String, PendingRequest>,
    stats: CacheStats,
    next_waiter: WaiterId,
}

impl CoordinatorState {
    fn next_waiter(&mut self) -> WaiterId {
        self.next_waiter += 1;
        self.next_waiter
    }
}

struct Shared {
    state: Mutex<CoordinatorState>,
    resources: Arc<dyn AssetBackend>,
    bundle: Option<Arc<dyn AssetBackend>>,
    type_check: TypeCheck,
}

/// What an asynchronous request turned into once registered.
enum Begin {
    /// Answered on the spot, from the store or with an error.
    Ready(LoadCallback, Result<AssetHandle, LoadError>),
    /// Joined a backend call already in flight.
    Waiting(LoadTicket),
    /// First request for this key: the caller must start the backend call.
    Fetch(LoadTicket, Arc<dyn AssetBackend>),
}

fn report(err: &LoadError) {
    log::warn!("Failed to load asset: {err}");
}

/// The type recorded for a freshly loaded entry.
fn stored_type(requested: PayloadType, handle: &AssetHandle) -> PayloadType {
    if requested.is_any() {
        handle.payload_type()
    } else {
        requested
    }
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, CoordinatorState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn backend(&self, mode: LoadMode) -> Result<&Arc<dyn AssetBackend>, LoadError> {
        match mode {
            LoadMode::Resources => Ok(&self.resources),
            LoadMode::Bundle => self.bundle.as_ref().ok_or(LoadError::Unsupported { mode }),
        }
    }

    fn checked(
        &self,
        key: &str,
        requested: PayloadType,
        handle: AssetHandle,
    ) -> Result<AssetHandle, LoadError> {
        if self.type_check == TypeCheck::Strict && !requested.accepts(handle.payload_type()) {
            return Err(LoadError::TypeMismatch {
                path: key.to_string(),
                expected: requested.to_string(),
                actual: handle.payload_type().to_string(),
            });
        }
        Ok(handle)
    }

    /// Decides whether a freshly fetched payload may be cached.
    ///
    /// Under `Strict` it is enough for one remaining waiter to accept the
    /// payload; waiters that do not are turned away individually. With no
    /// waiter left, the type of the request that started the fetch decides.
    fn admitted(
        &self,
        key: &str,
        requested: PayloadType,
        waiters: &[Waiter],
        handle: AssetHandle,
    ) -> Result<AssetHandle, LoadError> {
        let actual = handle.payload_type();
        if waiters
            .iter()
            .any(|waiter| waiter.payload_type.accepts(actual))
        {
            return Ok(handle);
        }
        self.checked(key, requested, handle)
    }

    /// Answers from the store, counting the hit or the miss.
    fn lookup(&self, key: &str, payload_type: PayloadType) -> Option<Result<AssetHandle, LoadError>> {
        let mut state = self.lock();
        let cached = state.store.get_payload(key);
        match cached {
            Some(handle) => {
                state.stats.hits += 1;
                drop(state);
                log::trace!("Cache hit for '{key}'");
                Some(self.checked(key, payload_type, handle))
            }
            None => {
                state.stats.misses += 1;
                None
            }
        }
    }

    /// Records the outcome of a synchronous backend call.
    fn store(
        &self,
        key: &str,
        payload_type: PayloadType,
        loaded: Result<AssetHandle, LoadError>,
    ) -> Result<AssetHandle, LoadError> {
        let outcome = loaded.and_then(|handle| self.checked(key, payload_type, handle));
        let mut state = self.lock();
        match &outcome {
            Ok(handle) => {
                state
                    .store
                    .put(key, handle.clone(), stored_type(payload_type, handle));
            }
            Err(_) => state.stats.failures += 1,
        }
        outcome
    }

    fn begin(
        &self,
        key: &str,
        payload_type: PayloadType,
        mode: LoadMode,
        callback: LoadCallback,
    ) -> Begin {
        let mut state = self.lock();

        if let Some(handle) = state.store.get_payload(key) {
            state.stats.hits += 1;
            return Begin::Ready(callback, self.checked(key, payload_type, handle));
        }
        state.stats.misses += 1;

        let id = state.next_waiter();
        let waiter = Waiter {
            id,
            payload_type,
            callback,
        };

        if let Some(pending) = state.pending.get_mut(key) {
            pending.join(waiter);
            let waiting = pending.waiters.len();
            state.stats.coalesced += 1;
            log::debug!("Coalesced request for '{key}' ({waiting} waiting)");
            return Begin::Waiting(LoadTicket::waiting(key, id));
        }

        let backend = match self.backend(mode) {
            Ok(backend) => Arc::clone(backend),
            Err(err) => {
                state.stats.failures += 1;
                return Begin::Ready(waiter.callback, Err(err));
            }
        };

        state
            .pending
            .insert(key.to_string(), PendingRequest::new(waiter));
        Begin::Fetch(LoadTicket::waiting(key, id), backend)
    }

    /// Stores the outcome of an asynchronous backend call and answers every
    /// waiter, in arrival order.
    fn finish(&self, key: &str, loaded: Result<AssetHandle, LoadError>) {
        let (waiters, outcome) = {
            let mut state = self.lock();
            let (requested, waiters) = match state.pending.remove(key) {
                Some(pending) => (pending.payload_type, pending.waiters),
                None => (PayloadType::Any, Vec::new()),
            };

            let outcome = loaded.and_then(|handle| self.admitted(key, requested, &waiters, handle));
            match &outcome {
                Ok(handle) => {
                    let payload_type = if requested.accepts(handle.payload_type()) {
                        stored_type(requested, handle)
                    } else {
                        handle.payload_type()
                    };
                    state.store.put(key, handle.clone(), payload_type);
                }
                Err(_) => state.stats.failures += 1,
            }

            (waiters, outcome)
        };

        if let Err(err) = &outcome {
            report(err);
        }
        log::debug!("Resolved '{key}' for {} waiter(s)", waiters.len());

        for waiter in waiters {
            let delivered = match &outcome {
                Ok(handle) => self
                    .checked(key, waiter.payload_type, handle.clone())
                    .map_err(|err| report(&err))
                    .ok(),
                Err(_) => None,
            };
            (waiter.callback)(delivered);
        }
    }
}

/// Resolves load requests against the cache and drives backends on misses.
///
/// A coordinator is cheap to clone; clones share one cache. It is built once
/// (see [`LoadCoordinator::builder`]) and handed to whoever needs assets.
#[derive(Clone)]
pub struct LoadCoordinator {
    shared: Arc<Shared>,
    runtime: Handle,
}

impl LoadCoordinator {
    /// Starts building a coordinator whose misses go to `resources`.
    pub fn builder(resources: Arc<dyn AssetBackend>) -> CoordinatorBuilder {
        CoordinatorBuilder::new(resources)
    }

    /// The runtime asynchronous loads are spawned on.
    pub fn runtime(&self) -> &Handle {
        &self.runtime
    }

    /// The type checking policy in force.
    pub fn type_check(&self) -> TypeCheck {
        self.shared.type_check
    }

    /// Loads `path`, blocking the caller on a miss. Failures are logged and
    /// yield `None`.
    pub fn load_sync(&self, path: &str, payload_type: PayloadType) -> Option<AssetHandle> {
        self.load_sync_from(path, payload_type, LoadMode::Resources)
    }

    /// [`LoadCoordinator::load_sync`] against the backend selected by `mode`.
    pub fn load_sync_from(
        &self,
        path: &str,
        payload_type: PayloadType,
        mode: LoadMode,
    ) -> Option<AssetHandle> {
        self.try_load_sync_from(path, payload_type, mode)
            .map_err(|err| report(&err))
            .ok()
    }

    /// Loads `path`, blocking the caller on a miss.
    ///
    /// # Errors
    ///
    /// Returns the reason no payload could be produced. Nothing is cached on
    /// failure.
    pub fn try_load_sync(
        &self,
        path: &str,
        payload_type: PayloadType,
    ) -> Result<AssetHandle, LoadError> {
        self.try_load_sync_from(path, payload_type, LoadMode::Resources)
    }

    /// [`LoadCoordinator::try_load_sync`] against the backend selected by `mode`.
    ///
    /// # Errors
    ///
    /// Same as [`LoadCoordinator::try_load_sync`], plus
    /// [`LoadError::Unsupported`] when `mode` has no backend.
    pub fn try_load_sync_from(
        &self,
        path: &str,
        payload_type: PayloadType,
        mode: LoadMode,
    ) -> Result<AssetHandle, LoadError> {
        let key = normalize_key(path)?;

        if let Some(hit) = self.shared.lookup(key, payload_type) {
            return hit;
        }

        // The backend call runs without the lock held.
        let loaded = match self.shared.backend(mode) {
            Ok(backend) => backend.load(key, payload_type),
            Err(err) => Err(err),
        };
        self.shared.store(key, payload_type, loaded)
    }

    /// Loads `path` without blocking and hands the outcome to `on_complete`.
    ///
    /// On a hit `on_complete` runs before this call returns. On a miss it runs
    /// on a runtime worker thread once the backend resolves; a miss for a key
    /// that is already being fetched waits for that fetch instead of starting
    /// another.
    pub fn load_async<F>(&self, path: &str, payload_type: PayloadType, on_complete: F) -> LoadTicket
    where
        F: FnOnce(Option<AssetHandle>) + Send + 'static,
    {
        self.load_async_from(path, payload_type, LoadMode::Resources, on_complete)
    }

    /// [`LoadCoordinator::load_async`] against the backend selected by `mode`.
    pub fn load_async_from<F>(
        &self,
        path: &str,
        payload_type: PayloadType,
        mode: LoadMode,
        on_complete: F,
    ) -> LoadTicket
    where
        F: FnOnce(Option<AssetHandle>) + Send + 'static,
    {
        let key = match normalize_key(path) {
            Ok(key) => key,
            Err(err) => {
                report(&err);
                on_complete(None);
                return LoadTicket::resolved();
            }
        };

        match self
            .shared
            .begin(key, payload_type, mode, Box::new(on_complete))
        {
            Begin::Ready(callback, outcome) => {
                callback(outcome.map_err(|err| report(&err)).ok());
                LoadTicket::resolved()
            }
            Begin::Waiting(ticket) => ticket,
            Begin::Fetch(ticket, backend) => {
                self.spawn_fetch(key, payload_type, backend);
                ticket
            }
        }
    }

    /// Untyped load that starts no earlier than the next scheduler turn.
    ///
    /// Used to move a load out of the caller's current frame. Apart from the
    /// delay it behaves like [`LoadCoordinator::load_async`].
    pub fn load_deferred<F>(&self, path: &str, on_complete: F)
    where
        F: FnOnce(Option<AssetHandle>) + Send + 'static,
    {
        self.load_deferred_typed(path, PayloadType::Any, on_complete);
    }

    /// Typed form of [`LoadCoordinator::load_deferred`].
    pub fn load_deferred_typed<F>(&self, path: &str, payload_type: PayloadType, on_complete: F)
    where
        F: FnOnce(Option<AssetHandle>) + Send + 'static,
    {
        let coordinator = self.clone();
        let path = path.to_string();
        self.runtime.spawn(async move {
            tokio::task::yield_now().await;
            coordinator.load_async(&path, payload_type, on_complete);
        });
    }

    /// Withdraws the callback behind `ticket` if its backend call has not
    /// resolved yet. The backend call itself carries on and its result is
    /// still cached.
    ///
    /// Returns `true` if the callback was withdrawn.
    pub fn cancel(&self, ticket: &LoadTicket) -> bool {
        let Some((key, id)) = ticket.waiter() else {
            return false;
        };
        let mut state = self.shared.lock();
        let removed = state
            .pending
            .get_mut(key)
            .is_some_and(|pending| pending.remove(id));
        if removed {
            log::debug!("Cancelled a waiter for '{key}'");
        }
        removed
    }

    /// Puts an already loaded payload in the cache with an explicit lifetime,
    /// e.g. [`Lifetime::Permanent`] for assets that must never be evicted.
    ///
    /// Returns `false`, caching nothing, if `path` normalizes to an empty key
    /// or `lifetime` is already expired (`Seconds(0)`).
    pub fn insert(&self, path: &str, handle: AssetHandle, lifetime: Lifetime) -> bool {
        if normalize(path).is_empty() {
            report(&LoadError::InvalidPath {
                path: path.to_string(),
            });
            return false;
        }
        if lifetime.is_expired() {
            log::warn!("Refusing to cache '{path}' with an expired lifetime");
            return false;
        }
        let payload_type = handle.payload_type();
        self.shared
            .lock()
            .store
            .put_with_lifetime(path, handle, payload_type, lifetime);
        true
    }

    /// Looks at the cache only: no backend call, no counters, no lifetime change.
    pub fn peek(&self, path: &str, payload_type: PayloadType) -> Option<AssetHandle> {
        let state = self.shared.lock();
        state
            .store
            .get(path, payload_type)
            .map(|entry| entry.payload().clone())
    }

    /// Returns `true` if `path` is cached.
    pub fn contains(&self, path: &str) -> bool {
        self.shared.lock().store.contains(path)
    }

    /// The remaining lifetime of the entry cached for `path`.
    pub fn remaining_lifetime(&self, path: &str) -> Option<Lifetime> {
        self.shared.lock().store.remaining_lifetime(path)
    }

    /// Drops the entry cached for `path`. Returns `true` if there was one.
    pub fn unload(&self, path: &str) -> bool {
        self.shared.lock().store.remove(path).is_some()
    }

    /// Drops every cached entry, permanent and session ones included.
    ///
    /// Loads still in flight are not affected and will cache their result
    /// when they resolve. Backend resources are not released; see
    /// [`LoadCoordinator::reclaim_unused`].
    pub fn clear_all(&self) {
        let mut state = self.shared.lock();
        let count = state.store.len();
        state.store.clear();
        log::info!("Cleared {count} cached asset(s)");
    }

    /// Asks every backend to release resources nobody references any more.
    pub fn reclaim_unused(&self) {
        self.shared.resources.unload_unused();
        if let Some(bundle) = &self.shared.bundle {
            bundle.unload_unused();
        }
    }

    /// Ages every entry by one tick and evicts the expired ones.
    ///
    /// Runs under the cache lock, so no load observes a half-swept store.
    pub fn sweep(&self) -> Vec<String> {
        let mut state = self.shared.lock();
        let evicted = state.store.sweep();
        state.stats.evictions += evicted.len() as u64;
        evicted
    }

    /// A snapshot of the cache counters.
    pub fn stats(&self) -> CacheStats {
        let state = self.shared.lock();
        CacheStats {
            entries: state.store.len(),
            ..state.stats
        }
    }

    /// Number of entries cached.
    pub fn cached_count(&self) -> usize {
        self.shared.lock().store.len()
    }

    /// Number of keys with a backend call in flight.
    pub fn pending_count(&self) -> usize {
        self.shared.lock().pending.len()
    }

    fn spawn_fetch(&self, key: &str, payload_type: PayloadType, backend: Arc<dyn AssetBackend>) {
        let shared = Arc::clone(&self.shared);
        let key = key.to_string();
        log::debug!("Fetching '{key}' from the {} backend", backend.name());

        self.runtime.spawn(async move {
            // The backend call runs in its own task so that a panic inside it
            // still resolves the pending request.
            let fetch = {
                let key = key.clone();
                tokio::spawn(async move { backend.load_async(&key, payload_type).await })
            };
            let loaded = fetch.await.unwrap_or_else(|err| {
                Err(LoadError::Backend {
                    path: key.clone(),
                    reason: format!("backend task failed: {err}"),
                })
            });
            shared.finish(&key, loaded);
        });
    }
}
