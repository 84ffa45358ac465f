mod codec;
mod error;
mod keys;
mod traits;

pub use codec::{
    decode_collection, encode_collection, Codec, CodecError, PlainCodec, ZstdCodec,
};
pub use error::{CacheError, Result};
pub use keys::{all_collection_keys, collection_key, is_valid_key, namespaced_key};
pub use traits::KeyValueStore;
