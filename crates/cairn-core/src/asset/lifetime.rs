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

/// Remaining lifetime, in sweep ticks, given to entries inserted without an
/// explicit lifetime.
pub const DEFAULT_LIFETIME_SECS: u32 = 180;

/// How long a cache entry may stay in the store.
///
/// The variants map onto the signed integer encoding used by callers that
/// persist or exchange lifetimes: `-2` is [`Lifetime::Permanent`], `-1` is
/// [`Lifetime::Session`] and any positive value is [`Lifetime::Seconds`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lifetime {
    /// Never evicted by the sweep.
    Permanent,
    /// Tied to the current session: never evicted by the sweep, only dropped
    /// by a full clear.
    Session,
    /// Evicted once this many sweep ticks have elapsed.
    Seconds(u32),
}

impl Lifetime {
    /// Raw encoding of [`Lifetime::Permanent`].
    pub const PERMANENT_RAW: i32 = -2;
    /// Raw encoding of [`Lifetime::Session`].
    pub const SESSION_RAW: i32 = -1;

    /// Decodes the signed representation. `0` and values below `-2` have no
    /// meaning and yield `None`.
    pub fn from_raw(raw: i32) -> Option<Self> {
        match raw {
            Self::PERMANENT_RAW => Some(Lifetime::Permanent),
            Self::SESSION_RAW => Some(Lifetime::Session),
            n if n > 0 => Some(Lifetime::Seconds(n as u32)),
            _ => None,
        }
    }

    /// Encodes the lifetime as a signed integer.
    pub fn as_raw(self) -> i32 {
        match self {
            Lifetime::Permanent => Self::PERMANENT_RAW,
            Lifetime::Session => Self::SESSION_RAW,
            Lifetime::Seconds(n) => i32::try_from(n).unwrap_or(i32::MAX),
        }
    }

    /// Returns `true` if the sweep can ever evict an entry with this lifetime.
    pub fn is_evictable(self) -> bool {
        matches!(self, Lifetime::Seconds(_))
    }

    /// Returns `true` for `Seconds(0)`, a lifetime that has already run out
    /// and must never be stored.
    pub fn is_expired(self) -> bool {
        self == Lifetime::Seconds(0)
    }

    /// Ages the lifetime by one sweep tick and reports whether it expired.
    ///
    /// `Permanent` and `Session` are left untouched and never expire.
    pub fn tick(&mut self) -> bool {
        match self {
            Lifetime::Seconds(remaining) => {
                *remaining = remaining.saturating_sub(1);
                *remaining == 0
            }
            Lifetime::Permanent | Lifetime::Session => false,
        }
    }
}

impl Default for Lifetime {
    fn default() -> Self {
        Lifetime::Seconds(DEFAULT_LIFETIME_SECS)
    }
}
