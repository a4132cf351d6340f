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

//! The path-keyed payload store and its eviction sweep.

use cairn_core::asset::{normalize, AssetHandle, Lifetime, PayloadType};
use std::collections::HashMap;

/// A payload held by the store, with its declared type and remaining lifetime.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    payload: AssetHandle,
    payload_type: PayloadType,
    remaining: Lifetime,
}

impl CacheEntry {
    /// The cached payload.
    pub fn payload(&self) -> &AssetHandle {
        &self.payload
    }

    /// The type the payload was declared with when it was inserted.
    pub fn payload_type(&self) -> PayloadType {
        self.payload_type
    }

    /// How long the entry has left before the sweep evicts it.
    pub fn remaining(&self) -> Lifetime {
        self.remaining
    }
}

/// The central, in-memory map from normalized asset paths to cached payloads.
///
/// Every path is normalized with [`normalize`] before it touches the map, so
/// `"icons/a.png"` and `"icons/a"` address the same entry. Inserting a key
/// that already exists replaces the old entry and its lifetime outright.
///
/// Lookups never change an entry's lifetime; only [`CacheStore::sweep`] does.
/// The store does not check the declared type on reads: that policy belongs
/// to the caller.
#[derive(Debug)]
pub struct CacheStore {
    entries: HashMap<String, CacheEntry>,
    default_lifetime: Lifetime,
}

impl CacheStore {
    /// Creates an empty store whose entries live [`Lifetime::default`].
    pub fn new() -> Self {
        Self::with_default_lifetime(Lifetime::default())
    }

    /// Creates an empty store with a different default lifetime for [`CacheStore::put`].
    ///
    /// An already expired lifetime is ignored in favor of [`Lifetime::default`].
    pub fn with_default_lifetime(default_lifetime: Lifetime) -> Self {
        let default_lifetime = if default_lifetime.is_expired() {
            log::warn!("Ignoring an expired default lifetime, using {:?}", Lifetime::default());
            Lifetime::default()
        } else {
            default_lifetime
        };
        Self {
            entries: HashMap::new(),
            default_lifetime,
        }
    }

    /// The lifetime given to entries inserted through [`CacheStore::put`].
    pub fn default_lifetime(&self) -> Lifetime {
        self.default_lifetime
    }

    /// Inserts a payload with the default lifetime, replacing any entry
    /// already stored under the same key.
    ///
    /// Returns the replaced entry, if there was one.
    pub fn put(
        &mut self,
        path: &str,
        payload: AssetHandle,
        payload_type: PayloadType,
    ) -> Option<CacheEntry> {
        self.put_with_lifetime(path, payload, payload_type, self.default_lifetime)
    }

    /// Inserts a payload with an explicit lifetime, replacing any entry
    /// already stored under the same key.
    ///
    /// Paths that normalize to an empty key and already expired lifetimes
    /// (`Seconds(0)`) are refused and logged.
    pub fn put_with_lifetime(
        &mut self,
        path: &str,
        payload: AssetHandle,
        payload_type: PayloadType,
        lifetime: Lifetime,
    ) -> Option<CacheEntry> {
        let key = normalize(path);
        if key.is_empty() {
            log::warn!("Refusing to cache an asset under the empty path '{path}'");
            return None;
        }
        if lifetime.is_expired() {
            log::warn!("Refusing to cache '{key}' with an expired lifetime");
            return None;
        }

        self.entries.insert(
            key.to_string(),
            CacheEntry {
                payload,
                payload_type,
                remaining: lifetime,
            },
        )
    }

    /// Looks up the entry for `path`.
    ///
    /// `payload_type` is accepted for symmetry with the load calls but is not
    /// compared with the stored type.
    pub fn get(&self, path: &str, _payload_type: PayloadType) -> Option<&CacheEntry> {
        self.entries.get(normalize(path))
    }

    /// Returns a clone of the payload stored for `path`.
    pub fn get_payload(&self, path: &str) -> Option<AssetHandle> {
        self.entries
            .get(normalize(path))
            .map(|entry| entry.payload.clone())
    }

    /// The remaining lifetime of the entry for `path`.
    pub fn remaining_lifetime(&self, path: &str) -> Option<Lifetime> {
        self.entries.get(normalize(path)).map(|entry| entry.remaining)
    }

    /// Checks whether an entry exists for `path`.
    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(normalize(path))
    }

    /// Removes and returns the entry for `path`.
    pub fn remove(&mut self, path: &str) -> Option<CacheEntry> {
        self.entries.remove(normalize(path))
    }

    /// Number of entries stored.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over the stored keys, in no particular order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Drops every entry, whatever its lifetime.
    ///
    /// Only the store's references go away; freeing backend-side resources is
    /// a separate step for the caller.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Ages every evictable entry by one tick and evicts those that expire.
    ///
    /// Expired keys are collected during the pass over the map and removed
    /// afterwards. Returns the evicted keys.
    pub fn sweep(&mut self) -> Vec<String> {
        let expired: Vec<String> = self
            .entries
            .iter_mut()
            .filter_map(|(key, entry)| entry.remaining.tick().then(|| key.clone()))
            .collect();

        for key in &expired {
            self.entries.remove(key);
            log::debug!("Evicted expired asset '{key}'");
        }

        expired
    }
}

impl Default for CacheStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cairn_core::asset::{Asset, TextAsset, DEFAULT_LIFETIME_SECS};

    #[derive(Debug, PartialEq)]
    struct Sprite(u32);
    impl Asset for Sprite {}

    fn sprite(id: u32) -> AssetHandle {
        AssetHandle::new(Sprite(id))
    }

    fn sprite_type() -> PayloadType {
        PayloadType::of::<Sprite>()
    }

    #[test]
    fn put_normalizes_the_key() {
        let mut store = CacheStore::new();
        store.put("icons/a.png", sprite(1), sprite_type());

        assert!(store.contains("icons/a"));
        assert!(store.contains("icons/a.jpg"));
        assert_eq!(store.keys().collect::<Vec<_>>(), vec!["icons/a"]);
    }

    #[test]
    fn put_uses_the_default_lifetime() {
        let mut store = CacheStore::new();
        store.put("icons/a.png", sprite(1), sprite_type());

        assert_eq!(
            store.remaining_lifetime("icons/a"),
            Some(Lifetime::Seconds(DEFAULT_LIFETIME_SECS))
        );
    }

    #[test]
    fn reinsertion_overwrites_and_resets_the_lifetime() {
        let mut store = CacheStore::new();
        store.put("icons/a.png", sprite(1), sprite_type());
        for _ in 0..10 {
            store.sweep();
        }
        assert_eq!(
            store.remaining_lifetime("icons/a"),
            Some(Lifetime::Seconds(DEFAULT_LIFETIME_SECS - 10))
        );

        let previous = store.put("icons/a.png", sprite(2), sprite_type());

        assert!(previous.is_some());
        let entry = store.get("icons/a", sprite_type()).unwrap();
        assert_eq!(entry.payload().downcast_ref::<Sprite>(), Some(&Sprite(2)));
        assert_eq!(entry.remaining(), Lifetime::Seconds(DEFAULT_LIFETIME_SECS));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn get_does_not_touch_the_lifetime() {
        let mut store = CacheStore::new();
        store.put_with_lifetime("a", sprite(1), sprite_type(), Lifetime::Seconds(5));
        store.sweep();

        for _ in 0..100 {
            assert!(store.get("a", sprite_type()).is_some());
            assert!(store.get_payload("a").is_some());
        }

        assert_eq!(store.remaining_lifetime("a"), Some(Lifetime::Seconds(4)));
    }

    #[test]
    fn get_ignores_the_declared_type() {
        let mut store = CacheStore::new();
        store.put("a", sprite(1), sprite_type());

        let entry = store.get("a", PayloadType::of::<TextAsset>()).unwrap();
        assert_eq!(entry.payload_type(), sprite_type());
    }

    #[test]
    fn missing_keys_are_absent() {
        let store = CacheStore::new();
        assert!(store.get("nothing", sprite_type()).is_none());
        assert!(store.remaining_lifetime("nothing").is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn empty_keys_are_refused() {
        let mut store = CacheStore::new();
        assert!(store.put("", sprite(1), sprite_type()).is_none());
        store.put(".png", sprite(1), sprite_type());
        assert!(store.is_empty());
    }

    #[test]
    fn expired_lifetimes_are_refused() {
        let mut store = CacheStore::new();
        store.put("a", sprite(1), sprite_type());

        let replaced = store.put_with_lifetime("a", sprite(2), sprite_type(), Lifetime::Seconds(0));

        assert!(replaced.is_none());
        let entry = store.get("a", sprite_type()).unwrap();
        assert_eq!(entry.payload().downcast_ref::<Sprite>(), Some(&Sprite(1)));
        assert!(store
            .put_with_lifetime("b", sprite(3), sprite_type(), Lifetime::Seconds(0))
            .is_none());
        assert!(!store.contains("b"));
    }

    #[test]
    fn expired_default_lifetime_falls_back() {
        let store = CacheStore::with_default_lifetime(Lifetime::Seconds(0));
        assert_eq!(store.default_lifetime(), Lifetime::default());
    }

    #[test]
    fn entry_is_evicted_after_exactly_k_sweeps() {
        let mut store = CacheStore::new();
        store.put_with_lifetime("a", sprite(1), sprite_type(), Lifetime::Seconds(3));

        assert!(store.sweep().is_empty());
        assert!(store.sweep().is_empty());
        assert!(store.contains("a"));
        assert_eq!(store.sweep(), vec!["a".to_string()]);
        assert!(!store.contains("a"));
    }

    #[test]
    fn permanent_and_session_entries_survive_the_sweep() {
        let mut store = CacheStore::new();
        store.put_with_lifetime("p", sprite(1), sprite_type(), Lifetime::Permanent);
        store.put_with_lifetime("s", sprite(2), sprite_type(), Lifetime::Session);

        for _ in 0..10_000 {
            store.sweep();
        }

        assert_eq!(store.remaining_lifetime("p"), Some(Lifetime::Permanent));
        assert_eq!(store.remaining_lifetime("s"), Some(Lifetime::Session));
    }

    #[test]
    fn sweep_evicts_a_batch_in_one_pass() {
        let mut store = CacheStore::new();
        store.put_with_lifetime("a", sprite(1), sprite_type(), Lifetime::Seconds(1));
        store.put_with_lifetime("b", sprite(2), sprite_type(), Lifetime::Seconds(1));
        store.put_with_lifetime("c", sprite(3), sprite_type(), Lifetime::Seconds(2));

        let mut evicted = store.sweep();
        evicted.sort();

        assert_eq!(evicted, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(store.len(), 1);
        assert_eq!(store.remaining_lifetime("c"), Some(Lifetime::Seconds(1)));
    }

    #[test]
    fn clear_drops_every_lifetime_class() {
        let mut store = CacheStore::new();
        store.put_with_lifetime("p", sprite(1), sprite_type(), Lifetime::Permanent);
        store.put_with_lifetime("s", sprite(2), sprite_type(), Lifetime::Session);
        store.put("t", sprite(3), sprite_type());

        store.clear();

        assert!(store.is_empty());
    }

    #[test]
    fn eviction_only_drops_the_store_reference() {
        let mut store = CacheStore::new();
        let handle = sprite(9);
        store.put_with_lifetime("a", handle.clone(), sprite_type(), Lifetime::Seconds(1));
        assert_eq!(handle.strong_count(), 2);

        store.sweep();

        assert_eq!(handle.strong_count(), 1);
        assert_eq!(handle.downcast_ref::<Sprite>(), Some(&Sprite(9)));
    }

    #[test]
    fn remove_takes_the_entry_out() {
        let mut store = CacheStore::new();
        store.put("ui/logo.png", sprite(4), sprite_type());

        let removed = store.remove("ui/logo").unwrap();

        assert_eq!(removed.payload().downcast_ref::<Sprite>(), Some(&Sprite(4)));
        assert!(store.is_empty());
    }
}
