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

//! Bookkeeping for backend calls that have not resolved yet.

use cairn_core::asset::{AssetHandle, PayloadType};

/// The continuation invoked once a load has an outcome. `None` means the
/// asset could not be loaded; the reason has already been logged.
pub(crate) type LoadCallback = Box<dyn FnOnce(Option<AssetHandle>) + Send + 'static>;

/// Identifies one waiter across every pending request.
pub(crate) type WaiterId = u64;

pub(crate) struct Waiter {
    pub(crate) id: WaiterId,
    pub(crate) payload_type: PayloadType,
    pub(crate) callback: LoadCallback,
}

/// An in-flight backend call and everyone waiting for it, in arrival order.
pub(crate) struct PendingRequest {
    pub(crate) payload_type: PayloadType,
    pub(crate) waiters: Vec<Waiter>,
}

impl PendingRequest {
    pub(crate) fn new(first: Waiter) -> Self {
        Self {
            payload_type: first.payload_type,
            waiters: vec![first],
        }
    }

    pub(crate) fn join(&mut self, waiter: Waiter) {
        self.waiters.push(waiter);
    }

    /// Drops a waiter; the backend call itself keeps running.
    pub(crate) fn remove(&mut self, id: WaiterId) -> bool {
        let before = self.waiters.len();
        self.waiters.retain(|waiter| waiter.id != id);
        self.waiters.len() != before
    }
}

/// A receipt for an asynchronous load, used to cancel it.
///
/// A ticket for a request answered on the spot (cache hit or immediate
/// failure) refers to nothing and cannot be cancelled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    pending: Option<(String, WaiterId)>,
}

impl LoadTicket {
    pub(crate) fn waiting(key: &str, id: WaiterId) -> Self {
        Self {
            pending: Some((key.to_string(), id)),
        }
    }

    pub(crate) fn resolved() -> Self {
        Self { pending: None }
    }

    /// Returns `true` if the callback already ran before the load call returned.
    pub fn resolved_immediately(&self) -> bool {
        self.pending.is_none()
    }

    /// The cache key the ticket is waiting on, if any.
    pub fn key(&self) -> Option<&str> {
        self.pending.as_ref().map(|(key, _)| key.as_str())
    }

    pub(crate) fn waiter(&self) -> Option<(&str, WaiterId)> {
        self.pending.as_ref().map(|(key, id)| (key.as_str(), *id))
    }
}
