use std::io::{Cursor, Read, Seek, SeekFrom};

use assert_matches::assert_matches;
use blossom::{write_blob, write_error, Blob, BlobError, TransferError, X_REASON};
use http::{
    header::{CONTENT_LENGTH, CONTENT_TYPE},
    Response, StatusCode,
};
use rstest::rstest;

/// A source whose reported length is off by `delta` bytes from the bytes it
/// actually yields, like a file that changes between measuring its size and the
/// copy.
struct MisreportingSource {
    inner: Cursor<Vec<u8>>,
    delta: i64,
}

impl Read for MisreportingSource {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.inner.read(buf)
    }
}

impl Seek for MisreportingSource {
    fn seek(&mut self, pos: SeekFrom) -> std::io::Result<u64> {
        let position = self.inner.seek(pos)?;
        Ok(match pos {
            SeekFrom::End(_) => position.saturating_add_signed(self.delta),
            _ => position,
        })
    }
}

/// A source that cannot seek at all.
struct BrokenSource;

impl Read for BrokenSource {
    fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
        Ok(0)
    }
}

impl Seek for BrokenSource {
    fn seek(&mut self, _pos: SeekFrom) -> std::io::Result<u64> {
        Err(std::io::Error::other("seek not supported"))
    }
}

#[test]
fn transfer_after_deriving_metadata() {
    let content = b"<!DOCTYPE html><html><body>blossom</body></html>".to_vec();
    let mut blob = Blob::new(Cursor::new(content.clone()));

    // Derive in arbitrary order before the transfer.
    assert_eq!(blob.extension(), ".html");
    assert_eq!(blob.size().unwrap(), content.len() as u64);
    assert_eq!(blob.media_type().unwrap(), "text/html");
    assert_eq!(blob.size().unwrap(), content.len() as u64);

    let mut response = Response::new(Vec::new());
    let written = write_blob(&mut response, &mut blob).unwrap();

    assert_eq!(written, content.len() as u64);
    assert_eq!(response.headers()[CONTENT_TYPE], "text/html");
    assert_eq!(
        response.headers()[CONTENT_LENGTH],
        content.len().to_string().as_str()
    );
    assert_eq!(response.body(), &content);
}

#[rstest]
#[case::shrunk(5, 21, 16)]
#[case::grown(-4, 12, 16)]
fn transfer_detects_size_mismatch(
    #[case] delta: i64,
    #[case] declared: u64,
    #[case] transferred: u64,
) {
    let mut blob = Blob::new(MisreportingSource {
        inner: Cursor::new(b"0123456789abcdef".to_vec()),
        delta,
    });
    let mut response = Response::new(Vec::new());

    let err = write_blob(&mut response, &mut blob).unwrap_err();
    assert_matches!(
        err,
        BlobError::SizeMismatch { declared: d, transferred: t } if d == declared && t == transferred
    );
}

#[test]
fn transfer_surfaces_io_errors() {
    let mut blob = Blob::new(BrokenSource);
    let mut response = Response::new(Vec::new());

    let err = write_blob(&mut response, &mut blob).unwrap_err();
    assert_matches!(err, BlobError::Io(_));

    // The extension never fails, it falls back.
    assert_eq!(blob.extension(), ".bin");
}

#[test]
fn failed_transfer_is_reported_as_error() {
    let mut blob = Blob::new(MisreportingSource {
        inner: Cursor::new(b"partial".to_vec()),
        delta: 100,
    });
    let mut response = Response::new(Vec::new());

    let err = write_blob(&mut response, &mut blob).unwrap_err();
    write_error(&mut response, TransferError::from(&err));

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.headers()[X_REASON],
        "copied size mismatch: expected 107 bytes, wrote 7"
    );
    assert!(response.headers().get(CONTENT_TYPE).is_none());
    assert_eq!(response.headers()[CONTENT_LENGTH], "0");
    assert!(response.body().is_empty());
}

#[test]
fn not_found_is_reported_with_reason() {
    let mut response = Response::new(Vec::new());
    write_error(
        &mut response,
        TransferError::with_reason(StatusCode::NOT_FOUND, "not found"),
    );

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(response.headers()[X_REASON], "not found");
    assert!(response.body().is_empty());
}
