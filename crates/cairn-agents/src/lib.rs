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

//! # Cairn Agents
//!
//! The active parts of the cache. The [`LoadCoordinator`] answers every load
//! request, from the store when it can and from a backend when it must,
//! making sure concurrent requests for one path share a single backend call.
//! The [`SweepTicker`] ages the store on a coarse clock.

#![warn(missing_docs)]

pub mod coordinator;
pub mod sweep;

pub use coordinator::{CoordinatorBuilder, LoadCoordinator, LoadTicket, TypeCheck};
pub use sweep::SweepTicker;
