//! Serialization support for [`Hash`].
//!
//! If the format is human-readable the hash is written as its lowercase hex
//! string, otherwise as its raw 32 bytes.
//!
//! # Example:
//!
//! ```
//! use blossom_hash::{compute_hash, Hash};
//!
//! let hash = compute_hash("Hello, world!");
//! let str = serde_json::to_string(&hash).unwrap();
//! let parsed: Hash = serde_json::from_str(&str).unwrap();
//! assert_eq!(parsed, hash);
//! ```
use std::borrow::Cow;

use serde::de::Error;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::Hash;

impl Serialize for Hash {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if serializer.is_human_readable() {
            self.hex().serialize(serializer)
        } else {
            serializer.serialize_bytes(self.as_bytes())
        }
    }
}

impl<'de> Deserialize<'de> for Hash {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        if deserializer.is_human_readable() {
            let str = Cow::<'de, str>::deserialize(deserializer)?;
            super::parse_hash(str.as_ref()).map_err(Error::custom)
        } else {
            let bytes = serde_bytes::ByteBuf::deserialize(deserializer)?;
            Hash::from_slice(&bytes).map_err(Error::custom)
        }
    }
}
