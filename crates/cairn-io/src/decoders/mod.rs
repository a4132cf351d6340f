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

//! Decoders that turn raw file bytes into engine-ready payloads.

use cairn_core::asset::Asset;
use std::error::Error;

mod binary;
mod text;

pub use binary::BinaryDecoder;
pub use text::TextDecoder;

/// A trait for types that can decode a specific kind of asset from a byte slice.
///
/// Implementors do the potentially CPU-intensive work of parsing raw file data
/// into a usable payload. Each decoder is specialized for a single asset type `A`.
pub trait AssetDecoder<A: Asset> {
    /// Parses a byte slice and converts it into an instance of the asset `A`.
    ///
    /// # Errors
    ///
    /// Returns a boxed, thread-safe error when the bytes are not a valid `A`.
    fn decode(&self, bytes: &[u8]) -> Result<A, Box<dyn Error + Send + Sync>>;
}
