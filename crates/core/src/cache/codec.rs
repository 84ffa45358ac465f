//! Codecs for turning collections into cache blobs and back.
//!
//! A collection is first serialized to JSON, then handed to a [`Codec`]
//! which produces the bytes actually written to the medium. The codec is
//! injected so the compression algorithm can change without touching
//! repository logic.

use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

/// Errors that can occur while encoding or decoding a cache blob.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Failed to serialize a collection to JSON.
    #[error("Failed to serialize: {0}")]
    SerializeFailed(String),
    /// Stored JSON did not parse to the declared item type.
    #[error("Failed to deserialize: {0}")]
    DeserializeFailed(String),
    #[error("Failed to compress: {0}")]
    CompressFailed(String),
    #[error("Failed to decompress: {0}")]
    DecompressFailed(String),
}

/// Result type for codec operations.
pub type Result<T> = std::result::Result<T, CodecError>;

/// A lossless, symmetric transformation applied at the cache boundary.
pub trait Codec: Send + Sync + fmt::Debug {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    fn compress(&self, raw: &[u8]) -> Result<Vec<u8>>;

    fn decompress(&self, stored: &[u8]) -> Result<Vec<u8>>;
}

/// zstd frame wrapped in base64, so stored values are plain text.
#[derive(Debug, Clone, Copy)]
pub struct ZstdCodec {
    level: i32,
}

impl ZstdCodec {
    /// Default compression level (zstd's own default).
    pub const DEFAULT_LEVEL: i32 = 3;

    pub fn new(level: i32) -> Self {
        Self { level }
    }

    pub fn level(&self) -> i32 {
        self.level
    }
}

impl Default for ZstdCodec {
    fn default() -> Self {
        Self::new(Self::DEFAULT_LEVEL)
    }
}

impl Codec for ZstdCodec {
    fn name(&self) -> &'static str {
        "zstd+base64"
    }

    fn compress(&self, raw: &[u8]) -> Result<Vec<u8>> {
        let frame = zstd::encode_all(raw, self.level)
            .map_err(|e| CodecError::CompressFailed(e.to_string()))?;
        Ok(STANDARD.encode(frame).into_bytes())
    }

    fn decompress(&self, stored: &[u8]) -> Result<Vec<u8>> {
        let frame = STANDARD
            .decode(stored)
            .map_err(|e| CodecError::DecompressFailed(e.to_string()))?;
        zstd::decode_all(frame.as_slice()).map_err(|e| CodecError::DecompressFailed(e.to_string()))
    }
}

/// Stores the JSON as-is. Handy when inspecting a cache directory by hand.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainCodec;

impl Codec for PlainCodec {
    fn name(&self) -> &'static str {
        "plain"
    }

    fn compress(&self, raw: &[u8]) -> Result<Vec<u8>> {
        Ok(raw.to_vec())
    }

    fn decompress(&self, stored: &[u8]) -> Result<Vec<u8>> {
        Ok(stored.to_vec())
    }
}

/// Serializes a collection to JSON and compresses it.
pub fn encode_collection<T: Serialize>(items: &[T], codec: &dyn Codec) -> Result<Vec<u8>> {
    let json =
        serde_json::to_vec(items).map_err(|e| CodecError::SerializeFailed(e.to_string()))?;
    codec.compress(&json)
}

/// Decompresses a blob and parses it as a collection of `T`.
pub fn decode_collection<T: DeserializeOwned>(stored: &[u8], codec: &dyn Codec) -> Result<Vec<T>> {
    let json = codec.decompress(stored)?;
    serde_json::from_slice(&json).map_err(|e| CodecError::DeserializeFailed(e.to_string()))
}
