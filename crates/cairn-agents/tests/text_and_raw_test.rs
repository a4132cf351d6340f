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
use cairn_agents::LoadCoordinator;
use cairn_core::asset::{BinaryAsset, PayloadType};
use cairn_io::FileSystemBackend;
use std::sync::Arc;
use std::time::Duration;
use tempfile::tempdir;
use tokio::runtime::Handle;

fn coordinator(root: &std::path::Path) -> LoadCoordinator {
    LoadCoordinator::builder(Arc::new(FileSystemBackend::new(root))).build(Handle::current())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn text_loads_resolve_by_key() -> Result<()> {
    let dir = tempdir()?;
    std::fs::create_dir_all(dir.path().join("locale"))?;
    std::fs::write(dir.path().join("locale/en.json"), r#"{"hello":"Hello"}"#)?;
    let coordinator = coordinator(dir.path());

    assert_eq!(
        coordinator.load_text("locale/en.txt").as_deref(),
        Some(r#"{"hello":"Hello"}"#)
    );
    assert_eq!(coordinator.read_text("locale/en"), r#"{"hello":"Hello"}"#);
    assert_eq!(coordinator.read_text("locale/fr"), "");
    assert!(!coordinator.contains("locale/fr"));

    let (tx, rx) = flume::unbounded();
    coordinator.load_text_async("locale/en", "strings", move |name, text| {
        tx.send((name.to_string(), text)).unwrap();
    });
    let (name, text) = tokio::time::timeout(Duration::from_secs(5), rx.recv_async()).await??;
    assert_eq!(name, "strings");
    assert_eq!(text.as_deref(), Some(r#"{"hello":"Hello"}"#));
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn text_of_a_binary_payload_is_absent() -> Result<()> {
    let dir = tempdir()?;
    std::fs::write(dir.path().join("blob.bin"), [0u8, 1, 2])?;
    let coordinator = coordinator(dir.path());

    let handle = coordinator.load_sync("blob", PayloadType::of::<BinaryAsset>());
    assert!(handle.is_some());
    assert_eq!(coordinator.load_text("blob"), None);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn async_text_load_of_a_missing_file_yields_none() -> Result<()> {
    let dir = tempdir()?;
    let coordinator = coordinator(dir.path());

    let (tx, rx) = flume::unbounded();
    coordinator.load_text_async("nowhere", "missing", move |name, text| {
        tx.send((name.to_string(), text)).unwrap();
    });
    let (name, text) = tokio::time::timeout(Duration::from_secs(5), rx.recv_async()).await??;
    assert_eq!(name, "missing");
    assert!(text.is_none());
    assert_eq!(coordinator.cached_count(), 0);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn raw_reads_bypass_the_cache() -> Result<()> {
    let assets = tempdir()?;
    let outside = tempdir()?;
    let save = outside.path().join("save.dat");
    std::fs::write(&save, b"\x00slot-1")?;
    let coordinator = coordinator(assets.path());

    let mut received = None;
    coordinator.read_raw(&save, "save", |name, bytes| {
        received = Some((name.to_string(), bytes));
    });
    assert_eq!(received, Some(("save".to_string(), Some(b"\x00slot-1".to_vec()))));

    let mut missing = None;
    coordinator.read_raw(outside.path().join("none.dat"), "none", |_, bytes| {
        missing = Some(bytes);
    });
    assert_eq!(missing, Some(None));

    let (tx, rx) = flume::unbounded();
    coordinator.read_raw_async(save.clone(), "save", move |name, bytes| {
        tx.send((name.to_string(), bytes)).unwrap();
    });
    let (_, bytes) = tokio::time::timeout(Duration::from_secs(5), rx.recv_async()).await??;
    assert_eq!(bytes.as_deref(), Some(&b"\x00slot-1"[..]));

    let stats = coordinator.stats();
    assert_eq!(coordinator.cached_count(), 0);
    assert_eq!((stats.hits, stats.misses), (0, 0));
    Ok(())
}
