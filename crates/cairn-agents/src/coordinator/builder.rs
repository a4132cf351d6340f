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

use super::{CoordinatorState, LoadCoordinator, Shared, TypeCheck};
use cairn_core::asset::Lifetime;
use cairn_core::AssetBackend;
use cairn_data::{CacheStats, CacheStore};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::runtime::Handle;

/// Configures a [`LoadCoordinator`] before it starts serving requests.
pub struct CoordinatorBuilder {
    resources: Arc<dyn AssetBackend>,
    bundle: Option<Arc<dyn AssetBackend>>,
    type_check: TypeCheck,
    default_lifetime: Lifetime,
}

impl CoordinatorBuilder {
    pub(crate) fn new(resources: Arc<dyn AssetBackend>) -> Self {
        Self {
            resources,
            bundle: None,
            type_check: TypeCheck::default(),
            default_lifetime: Lifetime::default(),
        }
    }

    /// Registers the backend used by [`LoadMode::Bundle`](cairn_core::LoadMode::Bundle) requests.
    pub fn bundle_backend(mut self, backend: Arc<dyn AssetBackend>) -> Self {
        self.bundle = Some(backend);
        self
    }

    /// Sets the type checking policy.
    pub fn type_check(mut self, type_check: TypeCheck) -> Self {
        self.type_check = type_check;
        self
    }

    /// Sets the lifetime of entries cached by a load.
    ///
    /// `Seconds(0)` would expire entries before they are stored; it is
    /// logged and the current lifetime is kept.
    pub fn default_lifetime(mut self, lifetime: Lifetime) -> Self {
        if lifetime.is_expired() {
            log::warn!(
                "Ignoring expired default lifetime, keeping {:?}",
                self.default_lifetime
            );
            return self;
        }
        self.default_lifetime = lifetime;
        self
    }

    /// Builds the coordinator. Asynchronous loads are spawned on `runtime`.
    pub fn build(self, runtime: Handle) -> LoadCoordinator {
        log::info!(
            "LoadCoordinator initialized (backend: {}, bundle: {}, type check: {:?}, lifetime: {:?})",
            self.resources.name(),
            self.bundle.as_ref().map_or("none", |bundle| bundle.name()),
            self.type_check,
            self.default_lifetime,
        );

        let state = CoordinatorState {
            store: CacheStore::with_default_lifetime(self.default_lifetime),
            pending: HashMap::new(),
            stats: CacheStats::default(),
            next_waiter: 0,
        };

        LoadCoordinator {
            shared: Arc::new(Shared {
                state: Mutex::new(state),
                resources: self.resources,
                bundle: self.bundle,
                type_check: self.type_check,
            }),
            runtime,
        }
    }
}
