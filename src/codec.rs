//! Codec Module
//!
//! Pluggable value serialization. The engine never inspects encoded bytes;
//! any codec that round-trips the caller's types satisfies the contract.

use serde::de::DeserializeOwned;
use serde::Serialize;

// == Codec Trait ==
/// Typed encode/decode pair used by the engine's `put`/`get` operations.
pub trait Codec: Send + Sync {
    /// Codec-specific failure, surfaced to callers as a
    /// serialization/deserialization error naming the affected key.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Encodes a value to an opaque byte sequence.
    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>, Self::Error>;

    /// Decodes a byte sequence back into the requested shape.
    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, Self::Error>;
}

// == JSON Codec ==
/// Default codec backed by serde_json.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    type Error = serde_json::Error;

    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>, Self::Error> {
        serde_json::to_vec(value)
    }

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, Self::Error> {
        serde_json::from_slice(bytes)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Session {
        user: String,
        visits: u32,
    }

    #[test]
    fn test_json_codec_roundtrip() {
        let codec = JsonCodec;
        let session = Session {
            user: "a".to_string(),
            visits: 3,
        };

        let bytes = codec.encode(&session).unwrap();
        let decoded: Session = codec.decode(&bytes).unwrap();

        assert_eq!(decoded, session);
    }

    #[test]
    fn test_json_codec_decode_mismatch() {
        let codec = JsonCodec;
        let bytes = codec.encode("just a string").unwrap();

        let result: Result<Session, _> = codec.decode(&bytes);
        assert!(result.is_err());
    }

    #[test]
    fn test_json_codec_decode_garbage() {
        let codec = JsonCodec;

        let result: Result<Session, _> = codec.decode(b"\xff\xfe not json");
        assert!(result.is_err());
    }
}
