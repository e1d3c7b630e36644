#![deny(missing_docs)]

//! Content addresses for blossom blobs.
//!
//! Every blob is named by the SHA-256 digest of its full content. This crate
//! provides the [`Hash`] type that represents such a digest together with the
//! functions to compute one from bytes, readers or files, and to parse one
//! back from its textual form.
//!
//! # Examples
//!
//! ```
//! use blossom_hash::{compute_hash, parse_hash};
//!
//! let hash = compute_hash("Hello, world!");
//! assert_eq!(
//!     hash.hex(),
//!     "315f5bdb76d078c43b8ac0064e4a0164612b1fce77c869345bfc94c75894edd3"
//! );
//! assert_eq!(parse_hash(&hash.hex()).unwrap(), hash);
//! ```
//!
//! # Storage form
//!
//! Storage layers persist hashes through the explicit
//! [`Hash::to_storage_form`] / [`Hash::from_storage_form`] pair. A hash is
//! written as its hex string and can be read back from either the hex string
//! or the raw 32 bytes.

#[cfg(feature = "serde")]
pub mod serde;

use std::{
    fmt::{Debug, Display, Formatter, LowerHex},
    fs::File,
    io::Read,
    path::Path,
    str::FromStr,
};

use digest::Digest;
pub use sha2::Sha256;
use thiserror::Error;

/// The number of bytes in a [`Hash`].
pub const HASH_LEN: usize = 32;

/// The number of characters in the hexadecimal form of a [`Hash`].
pub const HASH_HEX_LEN: usize = HASH_LEN * 2;

/// The SHA-256 digest of a blob's content.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, std::hash::Hash)]
pub struct Hash([u8; HASH_LEN]);

/// An error that occurs when a [`Hash`] cannot be decoded from text, bytes or
/// a storage value.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseHashError {
    /// The textual form does not have the right number of characters.
    #[error("invalid hash length: expected 64 hex characters, got {0}")]
    InvalidLength(usize),

    /// The textual form contains a character that is not a hex digit.
    #[error("invalid hex character {character:?} at position {index}")]
    InvalidCharacter {
        /// The offending character.
        character: char,
        /// The byte offset of the offending character.
        index: usize,
    },

    /// The binary form does not have the right number of bytes.
    #[error("invalid hash length: expected 32 bytes, got {0}")]
    InvalidByteLength(usize),

    /// A storage value was NULL.
    #[error("NULL cannot be decoded into a hash")]
    Null,

    /// A storage value has a type that can never hold a hash.
    #[error("cannot decode a {0} value into a hash")]
    UnsupportedType(&'static str),
}

/// A scalar value as exchanged with a storage layer.
#[derive(Debug, Clone, PartialEq)]
pub enum StorageValue {
    /// The SQL `NULL` value.
    Null,
    /// A signed integer.
    Integer(i64),
    /// A floating point number.
    Real(f64),
    /// A string.
    Text(String),
    /// A raw byte sequence.
    Bytes(Vec<u8>),
}

impl StorageValue {
    fn type_name(&self) -> &'static str {
        match self {
            StorageValue::Null => "null",
            StorageValue::Integer(_) => "integer",
            StorageValue::Real(_) => "real",
            StorageValue::Text(_) => "text",
            StorageValue::Bytes(_) => "bytes",
        }
    }
}

impl Hash {
    /// Constructs a hash from its raw bytes.
    pub const fn from_bytes(bytes: [u8; HASH_LEN]) -> Self {
        Self(bytes)
    }

    /// Constructs a hash from a byte slice that must be exactly
    /// [`HASH_LEN`] bytes long.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, ParseHashError> {
        let bytes: [u8; HASH_LEN] = bytes
            .try_into()
            .map_err(|_| ParseHashError::InvalidByteLength(bytes.len()))?;
        Ok(Self(bytes))
    }

    /// Returns the raw bytes of the hash.
    pub const fn as_bytes(&self) -> &[u8; HASH_LEN] {
        &self.0
    }

    /// Returns the canonical lowercase hexadecimal representation.
    pub fn hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Converts the hash into the scalar a storage layer should persist.
    pub fn to_storage_form(&self) -> StorageValue {
        StorageValue::Text(self.hex())
    }

    /// Decodes a hash from a value previously read from a storage layer.
    ///
    /// Accepts the hex string form or the raw byte form. Any other scalar,
    /// including NULL, is rejected.
    pub fn from_storage_form(value: &StorageValue) -> Result<Self, ParseHashError> {
        match value {
            StorageValue::Text(text) => parse_hash(text),
            StorageValue::Bytes(bytes) => Self::from_slice(bytes),
            StorageValue::Null => Err(ParseHashError::Null),
            other => Err(ParseHashError::UnsupportedType(other.type_name())),
        }
    }
}

impl From<[u8; HASH_LEN]> for Hash {
    fn from(bytes: [u8; HASH_LEN]) -> Self {
        Self(bytes)
    }
}

impl From<Hash> for [u8; HASH_LEN] {
    fn from(hash: Hash) -> Self {
        hash.0
    }
}

impl AsRef<[u8]> for Hash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl FromStr for Hash {
    type Err = ParseHashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_hash(s)
    }
}

impl Display for Hash {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:x}")
    }
}

impl Debug for Hash {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Hash({self:x})")
    }
}

impl LowerHex for Hash {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

/// Compute the hash of the specified bytes.
pub fn compute_hash(bytes: impl AsRef<[u8]>) -> Hash {
    Hash(Sha256::digest(bytes).into())
}

/// Compute the hash of everything that can be read from `reader`.
pub fn compute_reader_hash(mut reader: impl Read) -> Result<Hash, std::io::Error> {
    let mut hasher = Sha256::default();
    std::io::copy(&mut reader, &mut hasher)?;
    Ok(Hash(hasher.finalize().into()))
}

/// Compute the hash of the file at the specified location.
pub fn compute_file_hash(path: impl AsRef<Path>) -> Result<Hash, std::io::Error> {
    compute_reader_hash(File::open(path)?)
}

/// Parses a hash from exactly 64 hexadecimal characters.
///
/// Only the format is validated, the hash is not checked against any content.
pub fn parse_hash(input: &str) -> Result<Hash, ParseHashError> {
    if input.len() != HASH_HEX_LEN {
        return Err(ParseHashError::InvalidLength(input.len()));
    }

    let mut bytes = [0u8; HASH_LEN];
    hex::decode_to_slice(input, &mut bytes).map_err(|err| match err {
        hex::FromHexError::InvalidHexCharacter { c, index } => ParseHashError::InvalidCharacter {
            character: c,
            index,
        },
        hex::FromHexError::OddLength | hex::FromHexError::InvalidStringLength => {
            ParseHashError::InvalidLength(input.len())
        }
    })?;
    Ok(Hash(bytes))
}

#[cfg(test)]
mod test {
    use super::*;
    use assert_matches::assert_matches;
    use rstest::rstest;

    #[rstest]
    #[case(
        "1234567890",
        "c775e7b757ede630cd0aa1113bd102661ab38829ca52a6422ab782862f268646"
    )]
    #[case(
        "Hello, world!",
        "315f5bdb76d078c43b8ac0064e4a0164612b1fce77c869345bfc94c75894edd3"
    )]
    #[case(
        "",
        "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
    )]
    fn test_compute_hash(#[case] input: &str, #[case] expected_hash: &str) {
        assert_eq!(compute_hash(input).hex(), expected_hash);
        assert_eq!(
            compute_reader_hash(std::io::Cursor::new(input)).unwrap(),
            compute_hash(input)
        );
    }

    #[test]
    fn test_compute_file_hash() {
        let temp_dir = tempfile::tempdir().unwrap();
        let file_path = temp_dir.path().join("test");
        std::fs::write(&file_path, "1234567890").unwrap();
        let hash = compute_file_hash(&file_path).unwrap();

        assert_eq!(
            format!("{hash:x}"),
            "c775e7b757ede630cd0aa1113bd102661ab38829ca52a6422ab782862f268646"
        );
    }

    #[rstest]
    #[case(b"".as_slice())]
    #[case(b"a".as_slice())]
    #[case(b"\x00\xff\x10 binary".as_slice())]
    fn test_hex_roundtrip(#[case] data: &[u8]) {
        let hash = compute_hash(data);
        assert_eq!(parse_hash(&hash.hex()).unwrap(), hash);
        assert_eq!(hash.to_string(), hash.hex());
        assert_eq!(hash.hex().len(), HASH_HEX_LEN);
        assert!(hash.hex().chars().all(|c| matches!(c, '0'..='9' | 'a'..='f')));
    }

    #[test]
    fn test_parse_accepts_uppercase() {
        let hash = compute_hash("abc");
        let upper = hash.hex().to_uppercase();
        assert_eq!(upper.parse::<Hash>().unwrap(), hash);
    }

    #[rstest]
    #[case("", 0)]
    #[case("abc", 3)]
    #[case(&"a".repeat(63), 63)]
    #[case(&"a".repeat(65), 65)]
    fn test_parse_rejects_wrong_length(#[case] input: &str, #[case] len: usize) {
        assert_eq!(parse_hash(input), Err(ParseHashError::InvalidLength(len)));
    }

    #[test]
    fn test_parse_rejects_non_hex() {
        let input = format!("{}g", "0".repeat(63));
        assert_matches!(
            parse_hash(&input),
            Err(ParseHashError::InvalidCharacter {
                character: 'g',
                index: 63
            })
        );
    }

    #[test]
    fn test_storage_form_roundtrip() {
        let hash = compute_hash("blob");
        let stored = hash.to_storage_form();
        assert_eq!(stored, StorageValue::Text(hash.hex()));
        assert_eq!(Hash::from_storage_form(&stored).unwrap(), hash);
        assert_eq!(
            Hash::from_storage_form(&StorageValue::Bytes(hash.as_bytes().to_vec())).unwrap(),
            hash
        );
    }

    #[test]
    fn test_storage_form_rejects_invalid_values() {
        assert_eq!(
            Hash::from_storage_form(&StorageValue::Null),
            Err(ParseHashError::Null)
        );
        assert_eq!(
            Hash::from_storage_form(&StorageValue::Text("abcd".to_owned())),
            Err(ParseHashError::InvalidLength(4))
        );
        assert_eq!(
            Hash::from_storage_form(&StorageValue::Bytes(vec![0; 31])),
            Err(ParseHashError::InvalidByteLength(31))
        );
        assert_eq!(
            Hash::from_storage_form(&StorageValue::Integer(42)),
            Err(ParseHashError::UnsupportedType("integer"))
        );
        assert_eq!(
            Hash::from_storage_form(&StorageValue::Real(1.5)),
            Err(ParseHashError::UnsupportedType("real"))
        );
        assert_eq!(
            Hash::from_storage_form(&StorageValue::Text(format!("{}z", "0".repeat(63)))),
            Err(ParseHashError::InvalidCharacter {
                character: 'z',
                index: 63
            })
        );

        let err = Hash::from_storage_form(&StorageValue::Bytes(vec![0; 64])).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid hash length: expected 32 bytes, got 64"
        );
    }
}
