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

//! Shared test doubles for the coordinator tests.

#![allow(dead_code)]

use async_trait::async_trait;
use cairn_core::asset::{normalize, Asset, AssetHandle, PayloadType};
use cairn_core::{AssetBackend, LoadError};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::sync::Semaphore;

/// A backend whose asynchronous loads wait until the test opens the gate.
pub struct GatedBackend {
    name: &'static str,
    assets: Mutex<HashMap<String, AssetHandle>>,
    gate: Semaphore,
    calls: AtomicUsize,
    unloads: AtomicUsize,
}

impl GatedBackend {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            assets: Mutex::new(HashMap::new()),
            gate: Semaphore::new(0),
            calls: AtomicUsize::new(0),
            unloads: AtomicUsize::new(0),
        }
    }

    pub fn with_asset<A: Asset>(self, path: &str, asset: A) -> Self {
        self.assets
            .lock()
            .unwrap()
            .insert(normalize(path).to_string(), AssetHandle::new(asset));
        self
    }

    /// Lets `n` pending asynchronous loads through.
    pub fn release(&self, n: usize) {
        self.gate.add_permits(n);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn unloads(&self) -> usize {
        self.unloads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AssetBackend for GatedBackend {
    fn name(&self) -> &str {
        self.name
    }

    fn load(&self, key: &str, _payload_type: PayloadType) -> Result<AssetHandle, LoadError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.assets
            .lock()
            .unwrap()
            .get(key)
            .cloned()
            .ok_or_else(|| LoadError::NotFound {
                path: key.to_string(),
            })
    }

    async fn load_async(
        &self,
        key: &str,
        payload_type: PayloadType,
    ) -> Result<AssetHandle, LoadError> {
        self.gate
            .acquire()
            .await
            .expect("gate closed")
            .forget();
        self.load(key, payload_type)
    }

    fn unload_unused(&self) {
        self.unloads.fetch_add(1, Ordering::SeqCst);
    }
}

/// A backend that panics on every load.
#[derive(Default)]
pub struct PanickingBackend {
    calls: AtomicUsize,
}

impl PanickingBackend {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl AssetBackend for PanickingBackend {
    fn name(&self) -> &str {
        "panicking"
    }

    fn load(&self, key: &str, _payload_type: PayloadType) -> Result<AssetHandle, LoadError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        panic!("storage for '{key}' is corrupted");
    }
}
