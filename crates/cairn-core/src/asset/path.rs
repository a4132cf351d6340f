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

//! The rule that turns a request path into a cache key.

use crate::error::LoadError;

/// Returns the cache key for `path`: everything before the first `.`.
///
/// A path without a `.` is its own key and an empty path yields an empty key.
/// The rule is applied literally, so `"./icon.png"` maps to `""`.
///
/// ```
/// use cairn_core::asset::normalize;
///
/// assert_eq!(normalize("icons/a.png"), "icons/a");
/// assert_eq!(normalize("archive.tar.gz"), "archive");
/// assert_eq!(normalize("noext"), "noext");
/// ```
pub fn normalize(path: &str) -> &str {
    match path.split_once('.') {
        Some((key, _)) => key,
        None => path,
    }
}

/// Like [`normalize`], but an empty key is an [`LoadError::InvalidPath`].
pub fn normalize_key(path: &str) -> Result<&str, LoadError> {
    let key = normalize(path);
    if key.is_empty() {
        return Err(LoadError::InvalidPath {
            path: path.to_string(),
        });
    }
    Ok(key)
}
