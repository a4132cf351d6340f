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

use super::{Asset, PayloadType};
use std::{any::Any, fmt, sync::Arc};

/// A thread-safe, reference-counted, type-erased handle to a loaded payload.
///
/// Cloning a handle is cheap, as it only increments the reference count.
/// The handle remembers the [`PayloadType`] it was created with so that the
/// cache can report (and optionally enforce) what a path actually holds.
///
/// The payload is deallocated when the last handle is dropped; the cache
/// dropping its own clone on eviction does not invalidate handles that
/// consumers still hold.
#[derive(Clone)]
pub struct AssetHandle {
    payload: Arc<dyn Any + Send + Sync>,
    payload_type: PayloadType,
}

impl AssetHandle {
    /// Creates a new `AssetHandle` that takes ownership of the asset data.
    pub fn new<A: Asset>(asset: A) -> Self {
        Self::from_arc(Arc::new(asset))
    }

    /// Wraps an already shared asset without copying it.
    pub fn from_arc<A: Asset>(asset: Arc<A>) -> Self {
        Self {
            payload: asset,
            payload_type: PayloadType::of::<A>(),
        }
    }

    /// The concrete type this handle was created with.
    pub fn payload_type(&self) -> PayloadType {
        self.payload_type
    }

    /// Returns `true` if the payload is an `A`.
    pub fn is<A: Asset>(&self) -> bool {
        self.payload.is::<A>()
    }

    /// Returns a typed, shared reference to the payload, or `None` if the
    /// payload is not an `A`.
    pub fn downcast<A: Asset>(&self) -> Option<Arc<A>> {
        Arc::clone(&self.payload).downcast::<A>().ok()
    }

    /// Borrows the payload as an `A`, or `None` if the payload is not an `A`.
    pub fn downcast_ref<A: Asset>(&self) -> Option<&A> {
        self.payload.downcast_ref::<A>()
    }

    /// Returns `true` if both handles point at the same payload allocation.
    pub fn ptr_eq(&self, other: &AssetHandle) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.payload), Arc::as_ptr(&other.payload))
    }

    /// Number of live handles to this payload, the cache's own included.
    pub fn strong_count(&self) -> usize {
        Arc::strong_count(&self.payload)
    }
}

impl fmt::Debug for AssetHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssetHandle")
            .field("payload_type", &self.payload_type)
            .field("strong_count", &self.strong_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Sprite {
        id: u32,
    }
    impl Asset for Sprite {}

    struct Sound;
    impl Asset for Sound {}

    #[test]
    fn downcast_returns_the_original_payload() {
        let handle = AssetHandle::new(Sprite { id: 7 });

        assert!(handle.is::<Sprite>());
        assert_eq!(handle.downcast_ref::<Sprite>(), Some(&Sprite { id: 7 }));
        assert_eq!(handle.downcast::<Sprite>().map(|s| s.id), Some(7));
        assert_eq!(handle.payload_type(), PayloadType::of::<Sprite>());
    }

    #[test]
    fn downcast_to_the_wrong_type_is_none() {
        let handle = AssetHandle::new(Sprite { id: 1 });

        assert!(!handle.is::<Sound>());
        assert!(handle.downcast::<Sound>().is_none());
        assert!(handle.downcast_ref::<Sound>().is_none());
    }

    #[test]
    fn clones_share_the_same_allocation() {
        let handle = AssetHandle::new(Sprite { id: 3 });
        let clone = handle.clone();

        assert!(handle.ptr_eq(&clone));
        assert_eq!(handle.strong_count(), 2);
        assert!(!handle.ptr_eq(&AssetHandle::new(Sprite { id: 3 })));
    }
}
