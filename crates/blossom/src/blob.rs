use std::io::{Read, Seek, SeekFrom};

use blossom_hash::Hash;

use crate::sniff::{self, OCTET_STREAM, SNIFF_LEN};

/// A blob backed by a seekable byte source.
///
/// Metadata such as the size and the media type is derived on demand. Every
/// derivation reads what it needs and then seeks the source back to the
/// start, so derivations can be repeated in any order and a subsequent
/// [`crate::write_blob`] still transfers the full content.
///
/// The blob never closes its source. Use [`Blob::into_inner`] to get it back.
///
/// All methods that move the cursor take `&mut self`; share a blob between
/// threads only behind a lock.
#[derive(Debug)]
pub struct Blob<R> {
    data: Option<R>,
}

impl<R> Default for Blob<R> {
    fn default() -> Self {
        Self::detached()
    }
}

impl<R> Blob<R> {
    /// Constructs a blob that has no underlying source. It reports a size of
    /// zero and the generic binary media type.
    pub fn detached() -> Self {
        Self { data: None }
    }

    /// Returns true if the blob has an underlying source.
    pub fn has_source(&self) -> bool {
        self.data.is_some()
    }

    /// Returns a reference to the underlying source.
    pub fn get_ref(&self) -> Option<&R> {
        self.data.as_ref()
    }

    /// Returns a mutable reference to the underlying source.
    ///
    /// Moving the cursor through this reference breaks the guarantee that
    /// the blob is positioned at the start between derivations.
    pub fn get_mut(&mut self) -> Option<&mut R> {
        self.data.as_mut()
    }

    /// Consumes the blob and returns the underlying source.
    pub fn into_inner(self) -> Option<R> {
        self.data
    }
}

impl<R: Read + Seek> Blob<R> {
    /// Wraps a seekable source.
    pub fn new(data: R) -> Self {
        Self { data: Some(data) }
    }

    /// Returns the total number of bytes of the source.
    ///
    /// The size is determined by seeking to the end, after which the cursor
    /// is moved back to the start.
    pub fn size(&mut self) -> std::io::Result<u64> {
        let Some(data) = self.data.as_mut() else {
            return Ok(0);
        };
        let size = data.seek(SeekFrom::End(0))?;
        data.seek(SeekFrom::Start(0))?;
        tracing::trace!(size, "measured blob size");
        Ok(size)
    }

    /// Returns the sniffed content type, including parameters such as the
    /// charset (e.g. `text/plain; charset=utf-8`).
    ///
    /// Up to [`SNIFF_LEN`] bytes are read from the current position, after
    /// which the cursor is moved back to the start. Reading fewer bytes is
    /// not an error, the available bytes are sniffed as they are.
    pub fn content_type(&mut self) -> std::io::Result<&'static str> {
        let Some(data) = self.data.as_mut() else {
            return Ok(OCTET_STREAM);
        };

        let mut prefix = Vec::with_capacity(SNIFF_LEN);
        data.by_ref().take(SNIFF_LEN as u64).read_to_end(&mut prefix)?;
        data.seek(SeekFrom::Start(0))?;

        let content_type = sniff::detect_content_type(&prefix);
        tracing::trace!(content_type, sniffed = prefix.len(), "sniffed blob");
        Ok(content_type)
    }

    /// Returns the sniffed media type without parameters (e.g. `image/png`).
    ///
    /// See [`Blob::content_type`] for how the source is read.
    pub fn media_type(&mut self) -> std::io::Result<String> {
        let content_type = self.content_type()?;
        Ok(sniff::essence(content_type).unwrap_or_else(|| OCTET_STREAM.to_owned()))
    }

    /// Returns the file extension matching the media type of the blob,
    /// including the leading dot.
    ///
    /// Never fails: if the media type cannot be determined the generic
    /// `.bin` extension is returned.
    pub fn extension(&mut self) -> String {
        match self.media_type() {
            Ok(media_type) => sniff::extension_for_media_type(&media_type),
            Err(err) => {
                tracing::debug!("failed to determine media type of blob: {err}");
                sniff::FALLBACK_EXTENSION.to_owned()
            }
        }
    }

    /// Computes the hash of the full content and moves the cursor back to
    /// the start.
    pub fn hash(&mut self) -> std::io::Result<Hash> {
        let Some(data) = self.data.as_mut() else {
            return Ok(blossom_hash::compute_hash(b""));
        };
        data.seek(SeekFrom::Start(0))?;
        let hash = blossom_hash::compute_reader_hash(data.by_ref())?;
        data.seek(SeekFrom::Start(0))?;
        Ok(hash)
    }
}

impl<R: Read> Read for Blob<R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        match self.data.as_mut() {
            Some(data) => data.read(buf),
            None => Ok(0),
        }
    }
}
