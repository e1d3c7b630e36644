use std::io::{Read, Seek};

use blossom_hash::Hash;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Blob, BlobError};

/// Describes a stored blob.
///
/// Storage layers persist these records keyed by [`BlobMeta::hash`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlobMeta {
    /// The SHA-256 hash of the content.
    pub hash: Hash,

    /// The media type of the content without parameters.
    #[serde(rename = "type")]
    pub media_type: String,

    /// The exact number of bytes of the content.
    pub size: u64,

    /// When the blob was stored, serialized as Unix seconds.
    #[serde(with = "chrono::serde::ts_seconds")]
    pub created_at: DateTime<Utc>,
}

impl BlobMeta {
    /// Derives the metadata of a blob. The blob is read in full to compute
    /// its hash and is positioned at the start afterwards.
    pub fn from_blob<R: Read + Seek>(
        blob: &mut Blob<R>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, BlobError> {
        Ok(Self {
            hash: blob.hash()?,
            media_type: blob.media_type()?,
            size: blob.size()?,
            created_at,
        })
    }

    /// Returns the file extension matching the media type of the blob.
    pub fn extension(&self) -> String {
        crate::sniff::extension_for_media_type(&self.media_type)
    }
}
