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

//! Reads whole files straight from storage, outside the cache and any backend.

use cairn_core::LoadError;
use std::io;
use std::path::Path;

fn map_io_error(path: &Path, err: io::Error) -> LoadError {
    let path = path.display().to_string();
    if err.kind() == io::ErrorKind::NotFound {
        LoadError::NotFound { path }
    } else {
        LoadError::Backend {
            path,
            reason: err.to_string(),
        }
    }
}

/// Reads the full contents of the file at `path`.
///
/// This is the bypass for files that live outside the bundled resources:
/// nothing is looked up in or inserted into the cache.
///
/// # Errors
///
/// [`LoadError::NotFound`] if the file does not exist, [`LoadError::Backend`]
/// for any other I/O failure.
pub fn read_raw(path: impl AsRef<Path>) -> Result<Vec<u8>, LoadError> {
    let path = path.as_ref();
    std::fs::read(path).map_err(|e| map_io_error(path, e))
}

/// Asynchronous form of [`read_raw`].
///
/// # Errors
///
/// Same as [`read_raw`].
pub async fn read_raw_async(path: impl AsRef<Path>) -> Result<Vec<u8>, LoadError> {
    let path = path.as_ref();
    tokio::fs::read(path).await.map_err(|e| map_io_error(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn reads_every_byte() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("save.dat");
        std::fs::write(&path, [0u8, 1, 2, 255]).unwrap();

        assert_eq!(read_raw(&path).unwrap(), vec![0u8, 1, 2, 255]);
    }

    #[test]
    fn missing_files_are_not_found() {
        let dir = tempdir().unwrap();
        let err = read_raw(dir.path().join("missing.dat")).unwrap_err();
        assert!(matches!(err, LoadError::NotFound { .. }));
    }

    #[test]
    fn directories_are_backend_failures() {
        let dir = tempdir().unwrap();
        let err = read_raw(dir.path()).unwrap_err();
        assert!(matches!(err, LoadError::Backend { .. }));
    }

    #[tokio::test]
    async fn async_read_matches_the_blocking_one() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "abc").unwrap();

        assert_eq!(read_raw_async(&path).await.unwrap(), b"abc".to_vec());
    }
}
