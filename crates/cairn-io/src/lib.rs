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

//! # Cairn IO
//!
//! Everything that reaches outside the process for payloads: the
//! [`AssetBackend`](cairn_core::AssetBackend) implementations, the decoders
//! that turn file bytes into assets, and the raw byte read that bypasses the
//! cache entirely.

#![warn(missing_docs)]

pub mod decoders;
mod filesystem;
mod memory;
mod raw;
mod registry;

pub use decoders::{AssetDecoder, BinaryDecoder, TextDecoder};
pub use filesystem::FileSystemBackend;
pub use memory::MemoryBackend;
pub use raw::{read_raw, read_raw_async};
pub use registry::DecoderRegistry;
