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

use anyhow::Result;
use cairn_core::asset::{Asset, BinaryAsset, PayloadType, TextAsset};
use cairn_core::{AssetBackend, LoadError};
use cairn_io::{AssetDecoder, FileSystemBackend};
use std::error::Error;
use tempfile::tempdir;

// --- Test Setup: Dummy Asset and Decoder ---
#[derive(Debug, PartialEq)]
struct TestTexture {
    id: u32,
}
impl Asset for TestTexture {}

struct TestTextureDecoder;
impl AssetDecoder<TestTexture> for TestTextureDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<TestTexture, Box<dyn Error + Send + Sync>> {
        let id = u32::from_le_bytes(bytes.try_into()?);
        Ok(TestTexture { id })
    }
}
// ---

#[test]
fn test_load_text_by_key_without_extension() -> Result<()> {
    let dir = tempdir()?;
    std::fs::create_dir_all(dir.path().join("data"))?;
    std::fs::write(dir.path().join("data/cfg.json"), r#"{"volume":3}"#)?;

    let backend = FileSystemBackend::new(dir.path());
    let handle = backend.load("data/cfg", PayloadType::of::<TextAsset>())?;

    assert_eq!(
        handle.downcast_ref::<TextAsset>().map(TextAsset::text),
        Some(r#"{"volume":3}"#)
    );
    Ok(())
}

#[test]
fn test_load_custom_asset_through_registered_decoder() -> Result<()> {
    let dir = tempdir()?;
    std::fs::write(dir.path().join("hero.tex"), 1234u32.to_le_bytes())?;

    let mut backend = FileSystemBackend::new(dir.path());
    backend.register_decoder(&["tex"], TestTextureDecoder);

    let handle = backend.load("hero", PayloadType::of::<TestTexture>())?;
    assert_eq!(handle.downcast_ref::<TestTexture>(), Some(&TestTexture { id: 1234 }));

    // The untyped form finds the same file through the same decoder.
    let untyped = backend.load("hero", PayloadType::Any)?;
    assert!(untyped.is::<TestTexture>());
    Ok(())
}

#[test]
fn test_missing_files_are_not_found() {
    let dir = tempdir().unwrap();
    let backend = FileSystemBackend::new(dir.path());

    let err = backend
        .load("icons/missing", PayloadType::of::<TextAsset>())
        .unwrap_err();

    assert_eq!(
        err,
        LoadError::NotFound {
            path: "icons/missing".to_string()
        }
    );
}

#[test]
fn test_files_of_another_type_are_not_picked() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("blob.bin"), [1u8, 2, 3]).unwrap();

    let backend = FileSystemBackend::new(dir.path());

    assert!(backend.load("blob", PayloadType::of::<TextAsset>()).is_err());
    let binary = backend
        .load("blob", PayloadType::of::<BinaryAsset>())
        .unwrap();
    assert_eq!(binary.downcast_ref::<BinaryAsset>().unwrap().bytes(), &[1, 2, 3]);
}

#[test]
fn test_invalid_text_is_a_decode_error() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("broken.txt"), [0xffu8, 0xfe]).unwrap();

    let backend = FileSystemBackend::new(dir.path());
    let err = backend
        .load("broken", PayloadType::of::<TextAsset>())
        .unwrap_err();

    assert!(matches!(err, LoadError::Decode { ref path, .. } if path == "broken"));
}

#[tokio::test]
async fn test_async_load_reads_the_same_file() -> Result<()> {
    let dir = tempdir()?;
    std::fs::write(dir.path().join("readme.txt"), "hello")?;

    let backend = FileSystemBackend::new(dir.path());
    let handle = backend
        .load_async("readme", PayloadType::of::<TextAsset>())
        .await?;

    assert_eq!(handle.downcast_ref::<TextAsset>().unwrap().text(), "hello");
    Ok(())
}

#[tokio::test]
async fn test_async_resolution_skips_directories_and_missing_files() -> Result<()> {
    let dir = tempdir()?;
    // A directory that looks like the first candidate must not be picked.
    std::fs::create_dir_all(dir.path().join("cfg.txt"))?;
    std::fs::write(dir.path().join("cfg.json"), "{}")?;

    let backend = FileSystemBackend::new(dir.path());
    let handle = backend
        .load_async("cfg", PayloadType::of::<TextAsset>())
        .await?;
    assert_eq!(handle.downcast_ref::<TextAsset>().unwrap().text(), "{}");

    let missing = backend.load_async("nothing", PayloadType::Any).await;
    assert!(matches!(missing, Err(LoadError::NotFound { .. })));
    Ok(())
}
