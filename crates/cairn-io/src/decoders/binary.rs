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

use super::AssetDecoder;
use cairn_core::asset::BinaryAsset;

/// Keeps file bytes as they are.
#[derive(Debug, Clone, Copy, Default)]
pub struct BinaryDecoder;

impl BinaryDecoder {
    /// File extensions the binary decoder is registered for by default.
    pub const EXTENSIONS: &'static [&'static str] = &["bin", "bytes"];
}

impl AssetDecoder<BinaryAsset> for BinaryDecoder {
    fn decode(
        &self,
        bytes: &[u8],
    ) -> Result<BinaryAsset, Box<dyn std::error::Error + Send + Sync + 'static>> {
        Ok(BinaryAsset::new(bytes.to_vec()))
    }
}
