#![deny(missing_docs)]

//! Primitives to serve content-addressed blobs as described by BUD-01.
//!
//! A blob is named by the SHA-256 hash of its content (see [`Hash`]) and is
//! served with a `Content-Type` that is sniffed from its leading bytes and a
//! `Content-Length` that matches the number of transferred bytes exactly.
//!
//! # Components
//!
//! - [`Blob`]: wraps a seekable source and derives its size, media type and
//!   extension without disturbing a subsequent transfer.
//! - [`sniff`]: media type and extension detection from raw bytes.
//! - [`write_blob`]: streams a blob to a [`ResponseSink`] with the right
//!   framing headers.
//! - [`write_error`]: reports a [`TransferError`] through the status code and
//!   the `X-Reason` header.
//! - [`BlobMeta`]: the record a storage layer keeps for every blob.
//!
//! # Usage
//!
//! ```rust
//! use std::io::Cursor;
//! use blossom::{write_blob, Blob};
//!
//! let mut response = http::Response::new(Vec::new());
//! let mut blob = Blob::new(Cursor::new(b"Hello, world!".to_vec()));
//! write_blob(&mut response, &mut blob).unwrap();
//!
//! assert_eq!(response.headers()["content-type"], "text/plain");
//! assert_eq!(response.headers()["content-length"], "13");
//! ```
//!
//! Opening and closing the underlying sources, routing requests by hash and
//! persisting [`BlobMeta`] records are left to the caller.

mod blob;
mod error;
mod meta;
pub mod sniff;
mod transfer;

pub use blob::Blob;
pub use blossom_hash::{compute_hash, parse_hash, Hash, ParseHashError, StorageValue};
pub use error::{BlobError, TransferError};
pub use meta::BlobMeta;
pub use transfer::{write_blob, write_error, ResponseSink, X_REASON};
