use std::io::{Read, Seek, Write};

use http::{
    header::{CONTENT_LENGTH, CONTENT_TYPE},
    HeaderMap, HeaderName, HeaderValue, Response, StatusCode,
};

use crate::{Blob, BlobError, TransferError};

/// The header that carries the human-readable reason of a failed request.
pub const X_REASON: HeaderName = HeaderName::from_static("x-reason");

/// The response a blob or an error is written to.
///
/// The transport layer supplies the implementation, typically a response that
/// is later handed to an HTTP server.
pub trait ResponseSink {
    /// The type the body is written to.
    type Body: Write;

    /// Returns the headers of the response.
    fn headers_mut(&mut self) -> &mut HeaderMap;

    /// Sets the status code of the response.
    fn set_status(&mut self, status: StatusCode);

    /// Returns the body of the response.
    fn body(&mut self) -> &mut Self::Body;

    /// Drops everything written to the body so far.
    fn discard_body(&mut self);
}

impl ResponseSink for Response<Vec<u8>> {
    type Body = Vec<u8>;

    fn headers_mut(&mut self) -> &mut HeaderMap {
        Response::headers_mut(self)
    }

    fn set_status(&mut self, status: StatusCode) {
        *self.status_mut() = status;
    }

    fn body(&mut self) -> &mut Vec<u8> {
        self.body_mut()
    }

    fn discard_body(&mut self) {
        self.body_mut().clear();
    }
}

/// Writes the blob to the response.
///
/// The `Content-Type` and `Content-Length` headers are set from the sniffed
/// media type and the size of the blob as per BUD-01, after which the content
/// is copied from the current position of the blob. Returns the number of
/// bytes written.
///
/// Fails with [`BlobError::SizeMismatch`] if the number of copied bytes does
/// not match the announced size. In that case the response must not be
/// treated as delivered.
pub fn write_blob<S, R>(sink: &mut S, blob: &mut Blob<R>) -> Result<u64, BlobError>
where
    S: ResponseSink + ?Sized,
    R: Read + Seek,
{
    let media_type = blob.media_type()?;
    let size = blob.size()?;

    let headers = sink.headers_mut();
    headers.insert(
        CONTENT_TYPE,
        HeaderValue::from_str(&media_type)
            .unwrap_or_else(|_| HeaderValue::from_static(crate::sniff::OCTET_STREAM)),
    );
    headers.insert(CONTENT_LENGTH, HeaderValue::from(size));

    let written = std::io::copy(blob, sink.body())?;
    if written != size {
        tracing::warn!(
            declared = size,
            transferred = written,
            "blob changed while it was transferred"
        );
        return Err(BlobError::SizeMismatch {
            declared: size,
            transferred: written,
        });
    }

    tracing::debug!(%media_type, size, "transferred blob");
    Ok(written)
}

/// Writes the error to the response.
///
/// If the error has a non-empty reason it is written to the `X-Reason`
/// header as per BUD-01. The response gets the status code of the error and
/// an empty body. Framing headers of an earlier, failed [`write_blob`] are
/// removed.
pub fn write_error<S>(sink: &mut S, err: TransferError)
where
    S: ResponseSink + ?Sized,
{
    let headers = sink.headers_mut();
    headers.remove(CONTENT_TYPE);
    headers.remove(X_REASON);

    if let Some(reason) = err.reason() {
        match HeaderValue::from_str(reason) {
            Ok(value) => {
                headers.insert(X_REASON, value);
            }
            Err(_) => {
                tracing::warn!(
                    code = err.code.as_u16(),
                    "reason cannot be encoded as a header value, omitting it"
                );
            }
        }
    }
    headers.insert(CONTENT_LENGTH, HeaderValue::from(0u64));

    sink.discard_body();
    sink.set_status(err.code);
}
