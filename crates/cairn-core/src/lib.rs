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

//! # Cairn Core
//!
//! Foundational crate containing the contracts shared by every layer of the
//! resource cache: what an asset is, how paths become cache keys, how long an
//! entry lives, and what a loading backend must provide.

#![warn(missing_docs)]

pub mod asset;
pub mod backend;
pub mod error;

pub use asset::{
    normalize, normalize_key, Asset, AssetHandle, BinaryAsset, Lifetime, PayloadType, TextAsset,
    DEFAULT_LIFETIME_SECS,
};
pub use backend::{AssetBackend, LoadMode};
pub use error::LoadError;
