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

//! Text-specialized loads and the raw byte read that bypasses the cache.

use super::{report, LoadCoordinator, LoadTicket};
use cairn_core::asset::{AssetHandle, PayloadType, TextAsset};
use std::path::Path;

fn text_of(path: &str, handle: &AssetHandle) -> Option<String> {
    match handle.downcast_ref::<TextAsset>() {
        Some(asset) => Some(asset.text().to_string()),
        None => {
            log::warn!(
                "Asset '{path}' holds a {}, not text",
                handle.payload_type()
            );
            None
        }
    }
}

impl LoadCoordinator {
    /// Loads `path` as text, blocking on a miss.
    pub fn load_text(&self, path: &str) -> Option<String> {
        self.load_sync(path, PayloadType::of::<TextAsset>())
            .and_then(|handle| text_of(path, &handle))
    }

    /// Loads `path` as text, falling back to an empty string (and a warning)
    /// when it cannot be loaded.
    pub fn read_text(&self, path: &str) -> String {
        self.load_text(path).unwrap_or_else(|| {
            log::warn!("Failed to read text file '{path}'");
            String::new()
        })
    }

    /// Loads `path` as text without blocking and hands `(name, text)` to
    /// `on_complete`.
    pub fn load_text_async<F>(&self, path: &str, name: &str, on_complete: F) -> LoadTicket
    where
        F: FnOnce(&str, Option<String>) + Send + 'static,
    {
        let owned_path = path.to_string();
        let name = name.to_string();
        self.load_async(path, PayloadType::of::<TextAsset>(), move |handle| {
            let text = handle.and_then(|handle| text_of(&owned_path, &handle));
            on_complete(&name, text);
        })
    }

    /// Reads the file at `path` straight from storage and hands `(name, bytes)`
    /// to `on_complete`, blocking the caller.
    ///
    /// For files outside the bundled resources: the cache and the backends
    /// are never consulted and nothing is cached.
    pub fn read_raw<F>(&self, path: impl AsRef<Path>, name: &str, on_complete: F)
    where
        F: FnOnce(&str, Option<Vec<u8>>),
    {
        let bytes = cairn_io::read_raw(path).map_err(|err| report(&err)).ok();
        on_complete(name, bytes);
    }

    /// Non-blocking form of [`LoadCoordinator::read_raw`]; `on_complete` runs
    /// on a runtime worker thread.
    pub fn read_raw_async<F>(&self, path: impl AsRef<Path>, name: &str, on_complete: F)
    where
        F: FnOnce(&str, Option<Vec<u8>>) + Send + 'static,
    {
        let path = path.as_ref().to_path_buf();
        let name = name.to_string();
        self.runtime.spawn(async move {
            let bytes = cairn_io::read_raw_async(&path)
                .await
                .map_err(|err| report(&err))
                .ok();
            on_complete(&name, bytes);
        });
    }
}
