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

//! A backend that resolves cache keys against a directory of asset files.

use crate::decoders::AssetDecoder;
use crate::registry::DecoderRegistry;
use async_trait::async_trait;
use cairn_core::asset::{Asset, AssetHandle, PayloadType};
use cairn_core::{AssetBackend, LoadError};
use std::io;
use std::path::{Path, PathBuf};

/// Loads assets from files under a root directory.
///
/// A key has no extension, so the backend asks its [`DecoderRegistry`] which
/// extensions can produce the requested type and takes the first
/// `root/<key>.<ext>` that exists. The matching decoder turns the bytes into
/// the payload.
pub struct FileSystemBackend {
    root: PathBuf,
    decoders: DecoderRegistry,
}

impl FileSystemBackend {
    /// Creates a backend rooted at `root` with the built-in decoders.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_decoders(root, DecoderRegistry::with_defaults())
    }

    /// Creates a backend rooted at `root` with a custom decoder registry.
    pub fn with_decoders(root: impl Into<PathBuf>, decoders: DecoderRegistry) -> Self {
        Self {
            root: root.into(),
            decoders,
        }
    }

    /// Registers a decoder for asset type `A`.
    pub fn register_decoder<A: Asset>(
        &mut self,
        extensions: &[&str],
        decoder: impl AssetDecoder<A> + Send + Sync + 'static,
    ) {
        self.decoders.register::<A>(extensions, decoder);
    }

    /// The directory keys are resolved against.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Candidate files for a request, in the order they are tried.
    fn candidate_paths(&self, key: &str, payload_type: PayloadType) -> Vec<(PathBuf, PayloadType)> {
        self.decoders
            .candidates(payload_type)
            .into_iter()
            .map(|(ext, found_type)| (self.root.join(format!("{key}.{ext}")), found_type))
            .collect()
    }

    /// Finds the first file that can satisfy the request.
    fn resolve(&self, key: &str, payload_type: PayloadType) -> Option<(PathBuf, PayloadType)> {
        self.candidate_paths(key, payload_type)
            .into_iter()
            .find(|(path, _)| path.is_file())
    }

    /// [`FileSystemBackend::resolve`] without blocking the runtime thread.
    async fn resolve_async(
        &self,
        key: &str,
        payload_type: PayloadType,
    ) -> Option<(PathBuf, PayloadType)> {
        for (path, found_type) in self.candidate_paths(key, payload_type) {
            if let Ok(metadata) = tokio::fs::metadata(&path).await {
                if metadata.is_file() {
                    return Some((path, found_type));
                }
            }
        }
        None
    }

    fn decode(
        &self,
        key: &str,
        payload_type: PayloadType,
        bytes: io::Result<Vec<u8>>,
    ) -> Result<AssetHandle, LoadError> {
        let bytes = bytes.map_err(|e| LoadError::Backend {
            path: key.to_string(),
            reason: e.to_string(),
        })?;

        self.decoders
            .decode(payload_type, &bytes)
            .map_err(|e| LoadError::Decode {
                path: key.to_string(),
                reason: format!("{e:#}"),
            })
    }

    fn not_found(&self, key: &str, payload_type: PayloadType) -> LoadError {
        log::trace!(
            "No {payload_type} file for '{key}' under {}",
            self.root.display()
        );
        LoadError::NotFound {
            path: key.to_string(),
        }
    }
}

#[async_trait]
impl AssetBackend for FileSystemBackend {
    fn name(&self) -> &str {
        "filesystem"
    }

    fn load(&self, key: &str, payload_type: PayloadType) -> Result<AssetHandle, LoadError> {
        let Some((path, found_type)) = self.resolve(key, payload_type) else {
            return Err(self.not_found(key, payload_type));
        };
        self.decode(key, found_type, std::fs::read(&path))
    }

    async fn load_async(
        &self,
        key: &str,
        payload_type: PayloadType,
    ) -> Result<AssetHandle, LoadError> {
        let Some((path, found_type)) = self.resolve_async(key, payload_type).await else {
            return Err(self.not_found(key, payload_type));
        };
        let bytes = tokio::fs::read(&path).await;
        self.decode(key, found_type, bytes)
    }
}
