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

// Sandbox for the resource cache: loads a few assets through every call
// shape, then runs a short frame loop so entries age out.
// Run with: cargo run -p sandbox -- --frames 240 --lifetime 2

use anyhow::Result;
use cairn_sdk::prelude::*;
use cairn_sdk::{init_logging, CacheConfig, ResourceCache};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Parser)]
#[command(name = "sandbox")]
#[command(about = "Exercise the Cairn resource cache", long_about = None)]
struct Args {
    /// RON cache config; defaults apply when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Asset directory; a generated demo directory is used when omitted
    #[arg(long)]
    root: Option<PathBuf>,

    /// Lifetime given to loaded entries, overriding the config
    #[arg(long)]
    lifetime: Option<i32>,

    /// Number of simulated frames
    #[arg(long, default_value = "240")]
    frames: u32,

    /// Simulated frame time in milliseconds
    #[arg(long, default_value = "16")]
    frame_ms: u64,
}

fn write_demo_assets(root: &Path) -> Result<()> {
    std::fs::create_dir_all(root.join("data"))?;
    std::fs::create_dir_all(root.join("ui"))?;
    std::fs::write(root.join("data/cfg.json"), r#"{ "volume": 0.8, "lang": "en" }"#)?;
    std::fs::write(root.join("ui/title.txt"), "Cairn Sandbox")?;
    std::fs::write(root.join("ui/atlas.bin"), [0x89u8, 0x50, 0x4e, 0x47])?;
    Ok(())
}

fn main() -> Result<()> {
    init_logging("info");
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => CacheConfig::from_file(path)?,
        None => CacheConfig::default(),
    };
    if let Some(lifetime) = args.lifetime {
        config.default_lifetime_secs = lifetime;
    }

    // Keeps the generated directory alive until the end of main.
    let demo_dir = tempfile::tempdir()?;
    let root = match args.root.clone().or_else(|| config.asset_root.clone()) {
        Some(root) => root,
        None => {
            write_demo_assets(demo_dir.path())?;
            demo_dir.path().to_path_buf()
        }
    };
    config.asset_root = Some(root.clone());
    log::info!("Serving assets from {}", root.display());

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()?;
    let cache = ResourceCache::new(&config, runtime.handle().clone())?;

    // --- Blocking loads ---
    let title = cache.read_text("ui/title.txt");
    log::info!("Title: {title:?}");
    match cache.get_as::<BinaryAsset>("ui/atlas.png") {
        Some(atlas) => log::info!("Atlas: {} byte(s)", atlas.bytes().len()),
        None => log::warn!("Atlas missing"),
    }

    // --- Concurrent requests for one key share a single backend call ---
    let (tx, rx) = flume::unbounded();
    for caller in ["menu", "options", "hud"] {
        let tx = tx.clone();
        cache.load_text_async("data/cfg.json", caller, move |name, text| {
            let _ = tx.send(format!("{name} <- {}", text.unwrap_or_default()));
        });
    }
    let tx_deferred = tx.clone();
    cache.get_deferred("ui/title", move |handle| {
        let _ = tx_deferred.send(format!("deferred <- {}", handle.is_some()));
    });
    drop(tx);
    // Ends once every callback has run and dropped its sender.
    for line in rx.iter() {
        log::info!("{line}");
    }

    // --- Raw read: straight from disk, never cached ---
    cache.read_raw(root.join("ui/atlas.bin"), "atlas", |name, bytes| {
        log::info!("Raw read of {name}: {:?}", bytes.map(|b| b.len()));
    });

    // --- Frame loop driving the sweep ---
    let frame = Duration::from_millis(args.frame_ms);
    for _ in 0..args.frames {
        if cache.update(frame) {
            log::debug!("{} asset(s) cached", cache.stats().entries);
        }
    }

    let stats = cache.stats();
    log::info!(
        "Done: {} cached, {} hit(s), {} miss(es), {} coalesced, {} evicted, hit ratio {:.2}",
        stats.entries,
        stats.hits,
        stats.misses,
        stats.coalesced,
        stats.evictions,
        stats.hit_ratio()
    );

    cache.clear_all();
    cache.reclaim_unused();
    Ok(())
}
