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

use super::Asset;
use std::{any::TypeId, fmt};

/// The declared type of a payload, carried by every load request.
///
/// `Any` means "whatever the backend finds under this path" and is what the
/// untyped, deferred call shape uses. `Typed` pins a concrete Rust type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PayloadType {
    /// No expectation about the payload's concrete type.
    Any,
    /// A concrete asset type.
    Typed {
        /// The `TypeId` of the asset type.
        id: TypeId,
        /// The asset type's name, for diagnostics only.
        name: &'static str,
    },
}

impl PayloadType {
    /// Returns the tag for the asset type `A`.
    pub fn of<A: Asset>() -> Self {
        PayloadType::Typed {
            id: TypeId::of::<A>(),
            name: std::any::type_name::<A>(),
        }
    }

    /// Returns `true` if this is the untyped tag.
    pub fn is_any(&self) -> bool {
        matches!(self, PayloadType::Any)
    }

    /// Returns `true` if a payload of type `actual` satisfies a request for `self`.
    pub fn accepts(&self, actual: PayloadType) -> bool {
        match (self, actual) {
            (PayloadType::Any, _) => true,
            (PayloadType::Typed { id, .. }, PayloadType::Typed { id: other, .. }) => *id == other,
            (PayloadType::Typed { .. }, PayloadType::Any) => false,
        }
    }

    /// A human readable name.
    pub fn name(&self) -> &'static str {
        match self {
            PayloadType::Any => "any",
            PayloadType::Typed { name, .. } => name,
        }
    }
}

impl fmt::Display for PayloadType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::TextAsset;

    struct Mesh;
    impl Asset for Mesh {}

    #[test]
    fn any_accepts_everything() {
        assert!(PayloadType::Any.accepts(PayloadType::of::<Mesh>()));
        assert!(PayloadType::Any.accepts(PayloadType::Any));
    }

    #[test]
    fn typed_accepts_only_its_own_type() {
        let mesh = PayloadType::of::<Mesh>();
        assert!(mesh.accepts(PayloadType::of::<Mesh>()));
        assert!(!mesh.accepts(PayloadType::of::<TextAsset>()));
        assert!(!mesh.accepts(PayloadType::Any));
    }

    #[test]
    fn display_uses_the_type_name() {
        assert_eq!(PayloadType::Any.to_string(), "any");
        assert!(PayloadType::of::<Mesh>().to_string().ends_with("Mesh"));
    }
}
