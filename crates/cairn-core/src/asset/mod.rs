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

//! Provides the foundational traits and primitive types for Cairn's asset cache.
//!
//! This module defines the "common language" for every cache operation. It
//! has no knowledge of how assets are loaded or where they are stored.
//!
//! The key components are:
//! - The [`Asset`] trait: a marker for all types that can be cached.
//! - [`AssetHandle`]: a cheap, shared, type-erased reference to a payload.
//! - [`PayloadType`]: the declared type tag a request carries.
//! - [`Lifetime`]: how long an entry may stay in the cache.
//! - [`normalize`]: the rule that turns a request path into a cache key.

mod handle;
mod lifetime;
mod path;
mod payload_type;
mod text;

pub use handle::*;
pub use lifetime::*;
pub use path::*;
pub use payload_type::*;
pub use text::*;

/// A marker trait for types that can be managed by the asset cache.
///
/// The supertraits enforce the guarantees the cache relies on:
/// - `Send` + `Sync`: payloads are shared between the caller and the
///   runtime thread that completes an asynchronous load.
/// - `'static`: payloads can be stored for as long as the cache lives.
///
/// # Examples
///
/// ```
/// use cairn_core::asset::Asset;
///
/// struct Sprite {
///     width: u32,
///     height: u32,
/// }
///
/// impl Asset for Sprite {}
/// ```
pub trait Asset: Send + Sync + 'static {}
