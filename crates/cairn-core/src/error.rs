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

//! Defines the error type shared by the cache, its backends and its decoders.

use crate::backend::LoadMode;
use thiserror::Error;

/// Why a load produced no payload.
///
/// None of these are fatal: the cache logs them and hands the caller an
/// absent result. A failed load never inserts an entry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    /// The path is empty or normalizes to an empty key.
    #[error("invalid asset path '{path}'")]
    InvalidPath {
        /// The path as requested.
        path: String,
    },
    /// The backend has nothing stored under this path.
    #[error("asset '{path}' not found")]
    NotFound {
        /// The path as requested.
        path: String,
    },
    /// The backend failed while reading the payload.
    #[error("failed to load '{path}': {reason}")]
    Backend {
        /// The path as requested.
        path: String,
        /// The underlying I/O or backend error.
        reason: String,
    },
    /// The payload was read but could not be decoded.
    #[error("failed to decode '{path}': {reason}")]
    Decode {
        /// The path as requested.
        path: String,
        /// The decoder's error message.
        reason: String,
    },
    /// The cached or loaded payload is not of the requested type.
    #[error("asset '{path}' holds a {actual}, expected {expected}")]
    TypeMismatch {
        /// The path as requested.
        path: String,
        /// The requested type name.
        expected: String,
        /// The stored type name.
        actual: String,
    },
    /// No backend is registered for the requested load mode.
    #[error("no backend registered for {mode:?} loads")]
    Unsupported {
        /// The requested mode.
        mode: LoadMode,
    },
}

impl LoadError {
    /// The path the failed request was for, if the error carries one.
    pub fn path(&self) -> Option<&str> {
        match self {
            LoadError::InvalidPath { path }
            | LoadError::NotFound { path }
            | LoadError::Backend { path, .. }
            | LoadError::Decode { path, .. }
            | LoadError::TypeMismatch { path, .. } => Some(path),
            LoadError::Unsupported { .. } => None,
        }
    }

    /// Returns `true` for the "nothing there" family: missing asset, bad path
    /// or missing backend.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            LoadError::NotFound { .. }
                | LoadError::InvalidPath { .. }
                | LoadError::Unsupported { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_path() {
        let err = LoadError::NotFound {
            path: "icons/a.png".to_string(),
        };
        assert_eq!(err.to_string(), "asset 'icons/a.png' not found");
        assert_eq!(err.path(), Some("icons/a.png"));
    }

    #[test]
    fn decode_errors_carry_the_reason() {
        let err = LoadError::Decode {
            path: "data/cfg".to_string(),
            reason: "invalid utf-8".to_string(),
        };
        assert_eq!(err.to_string(), "failed to decode 'data/cfg': invalid utf-8");
        assert!(!err.is_not_found());
    }

    #[test]
    fn unsupported_mode_has_no_path() {
        let err = LoadError::Unsupported {
            mode: LoadMode::Bundle,
        };
        assert_eq!(err.path(), None);
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "no backend registered for Bundle loads");
    }
}
