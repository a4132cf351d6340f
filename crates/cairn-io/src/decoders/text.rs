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
use anyhow::Context;
use cairn_core::asset::TextAsset;

/// Decodes UTF-8 text files.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextDecoder;

impl TextDecoder {
    /// File extensions the text decoder is registered for by default.
    pub const EXTENSIONS: &'static [&'static str] = &["txt", "json", "xml", "csv", "ron", "bytes"];
}

impl AssetDecoder<TextAsset> for TextDecoder {
    fn decode(
        &self,
        bytes: &[u8],
    ) -> Result<TextAsset, Box<dyn std::error::Error + Send + Sync + 'static>> {
        let asset = TextAsset::from_utf8(bytes.to_vec()).context("Text asset is not valid UTF-8")?;
        Ok(asset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_utf8() {
        let asset = TextDecoder.decode("héllo".as_bytes()).unwrap();
        assert_eq!(asset.text(), "héllo");
    }

    #[test]
    fn rejects_invalid_utf8() {
        let err = TextDecoder.decode(&[0xc3, 0x28]).unwrap_err();
        assert!(err.to_string().contains("UTF-8"));
    }
}
