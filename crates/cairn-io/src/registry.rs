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

//! A registry of decoders, letting a backend pick one by payload type and file extension.

use crate::decoders::{AssetDecoder, BinaryDecoder, TextDecoder};
use anyhow::{anyhow, Result};
use cairn_core::asset::{Asset, AssetHandle, PayloadType};
use std::marker::PhantomData;

/// Internal trait for decoding any asset type into a type-erased handle.
trait AnyDecoder: Send + Sync {
    fn decode_any(&self, bytes: &[u8]) -> Result<AssetHandle>;
}

/// A "wrapper" that takes a generic `AssetDecoder<A>` and implements `AnyDecoder`.
struct AssetDecoderWrapper<A: Asset, D: AssetDecoder<A>>(D, PhantomData<fn() -> A>);

impl<A: Asset, D: AssetDecoder<A> + Send + Sync> AnyDecoder for AssetDecoderWrapper<A, D> {
    fn decode_any(&self, bytes: &[u8]) -> Result<AssetHandle> {
        // Call the GENERIC and TYPE-SAFE decode() method...
        let asset: A = self.0.decode(bytes).map_err(|e| anyhow!(e.to_string()))?;

        // ...and erase its type behind a shared handle.
        Ok(AssetHandle::new(asset))
    }
}

struct Registration {
    payload_type: PayloadType,
    extensions: Vec<String>,
    decoder: Box<dyn AnyDecoder>,
}

/// Maps payload types to the decoder and file extensions that produce them.
///
/// Registrations are kept in insertion order, which is also the order in
/// which an untyped request tries them.
#[derive(Default)]
pub struct DecoderRegistry {
    registrations: Vec<Registration>,
}

impl DecoderRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with the built-in text and binary decoders.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(TextDecoder::EXTENSIONS, TextDecoder);
        registry.register(BinaryDecoder::EXTENSIONS, BinaryDecoder);
        registry
    }

    /// Registers the decoder for asset type `A`, replacing any earlier one.
    pub fn register<A: Asset>(
        &mut self,
        extensions: &[&str],
        decoder: impl AssetDecoder<A> + Send + Sync + 'static,
    ) {
        let payload_type = PayloadType::of::<A>();
        self.registrations
            .retain(|registration| registration.payload_type != payload_type);
        self.registrations.push(Registration {
            payload_type,
            extensions: extensions
                .iter()
                .map(|ext| ext.trim_start_matches('.').to_string())
                .collect(),
            decoder: Box::new(AssetDecoderWrapper(decoder, PhantomData)),
        });
    }

    /// Returns `true` if a decoder produces `payload_type`.
    pub fn is_registered(&self, payload_type: PayloadType) -> bool {
        self.registrations
            .iter()
            .any(|registration| registration.payload_type == payload_type)
    }

    /// The `(extension, payload type)` pairs a request for `payload_type`
    /// should try, in order. An untyped request tries every registration.
    pub fn candidates(&self, payload_type: PayloadType) -> Vec<(&str, PayloadType)> {
        self.registrations
            .iter()
            .filter(|registration| payload_type.accepts(registration.payload_type))
            .flat_map(|registration| {
                registration
                    .extensions
                    .iter()
                    .map(move |ext| (ext.as_str(), registration.payload_type))
            })
            .collect()
    }

    /// Decodes `bytes` into a payload of type `payload_type`.
    ///
    /// # Errors
    ///
    /// Fails if no decoder is registered for `payload_type` or the decoder
    /// rejects the bytes.
    pub fn decode(&self, payload_type: PayloadType, bytes: &[u8]) -> Result<AssetHandle> {
        let registration = self
            .registrations
            .iter()
            .find(|registration| registration.payload_type == payload_type)
            .ok_or_else(|| anyhow!("No decoder registered for asset type '{payload_type}'"))?;

        registration.decoder.decode_any(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cairn_core::asset::{BinaryAsset, TextAsset};
    use std::error::Error;

    #[derive(Debug, PartialEq)]
    struct Level(u32);
    impl Asset for Level {}

    struct LevelDecoder;
    impl AssetDecoder<Level> for LevelDecoder {
        fn decode(&self, bytes: &[u8]) -> Result<Level, Box<dyn Error + Send + Sync>> {
            let raw: [u8; 4] = bytes.try_into()?;
            Ok(Level(u32::from_le_bytes(raw)))
        }
    }

    #[test]
    fn decodes_through_the_registered_decoder() {
        let mut registry = DecoderRegistry::new();
        registry.register(&["lvl"], LevelDecoder);

        let handle = registry
            .decode(PayloadType::of::<Level>(), &42u32.to_le_bytes())
            .unwrap();

        assert_eq!(handle.downcast_ref::<Level>(), Some(&Level(42)));
        assert_eq!(handle.payload_type(), PayloadType::of::<Level>());
    }

    #[test]
    fn decoder_errors_are_reported() {
        let mut registry = DecoderRegistry::new();
        registry.register(&["lvl"], LevelDecoder);

        assert!(registry.decode(PayloadType::of::<Level>(), &[1, 2]).is_err());
    }

    #[test]
    fn unknown_types_fail() {
        let registry = DecoderRegistry::new();
        let err = registry
            .decode(PayloadType::of::<Level>(), &[])
            .unwrap_err();
        assert!(err.to_string().contains("No decoder registered"));
    }

    #[test]
    fn typed_candidates_only_list_the_matching_decoder() {
        let registry = DecoderRegistry::with_defaults();

        let candidates = registry.candidates(PayloadType::of::<BinaryAsset>());

        assert_eq!(
            candidates,
            vec![
                ("bin", PayloadType::of::<BinaryAsset>()),
                ("bytes", PayloadType::of::<BinaryAsset>())
            ]
        );
    }

    #[test]
    fn untyped_candidates_follow_registration_order() {
        let registry = DecoderRegistry::with_defaults();

        let candidates = registry.candidates(PayloadType::Any);

        assert_eq!(candidates.first(), Some(&("txt", PayloadType::of::<TextAsset>())));
        assert_eq!(candidates.last(), Some(&("bytes", PayloadType::of::<BinaryAsset>())));
    }

    #[test]
    fn registering_twice_replaces_the_extensions() {
        let mut registry = DecoderRegistry::new();
        registry.register(&["lvl"], LevelDecoder);
        registry.register(&[".level"], LevelDecoder);

        assert_eq!(
            registry.candidates(PayloadType::of::<Level>()),
            vec![("level", PayloadType::of::<Level>())]
        );
        assert!(registry.is_registered(PayloadType::of::<Level>()));
    }
}
