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

//! Built-in payload types for text and raw binary files.

use super::Asset;

/// A decoded text file.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TextAsset {
    text: String,
}

impl TextAsset {
    /// Wraps already decoded text.
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Decodes UTF-8 bytes into a text asset.
    pub fn from_utf8(bytes: Vec<u8>) -> Result<Self, std::string::FromUtf8Error> {
        String::from_utf8(bytes).map(|text| Self { text })
    }

    /// The file contents.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The file contents as bytes.
    pub fn bytes(&self) -> &[u8] {
        self.text.as_bytes()
    }
}

impl Asset for TextAsset {}

/// An undecoded binary file.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BinaryAsset {
    bytes: Vec<u8>,
}

impl BinaryAsset {
    /// Wraps the raw bytes.
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// The file contents.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl Asset for BinaryAsset {}
