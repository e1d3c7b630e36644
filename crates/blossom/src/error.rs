use std::fmt::{Display, Formatter};

use blossom_hash::ParseHashError;
use http::StatusCode;
use thiserror::Error;

/// An error that is reported to a remote party as an HTTP status code and an
/// optional reason.
///
/// A non-empty reason is written to the `X-Reason` header as per BUD-01, see
/// [`crate::write_error`]. Two errors are equal when both the code and the
/// reason are equal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferError {
    /// The status code of the response.
    pub code: StatusCode,
    /// A human-readable explanation of the failure.
    pub reason: Option<String>,
}

impl TransferError {
    /// Constructs an error without a reason.
    pub fn new(code: StatusCode) -> Self {
        Self { code, reason: None }
    }

    /// Constructs an error with a reason.
    pub fn with_reason(code: StatusCode, reason: impl Into<String>) -> Self {
        Self {
            code,
            reason: Some(reason.into()),
        }
    }

    /// Returns the reason if one is present and not empty.
    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref().filter(|reason| !reason.is_empty())
    }
}

impl Display for TransferError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "code: {}, reason: {}",
            self.code.as_u16(),
            self.reason.as_deref().unwrap_or_default()
        )
    }
}

impl std::error::Error for TransferError {}

/// Errors that can occur while inspecting or transferring a blob.
#[derive(Debug, Error)]
pub enum BlobError {
    /// Seeking or reading the underlying source failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The number of transferred bytes differs from the size that was
    /// declared in the response headers.
    #[error("copied size mismatch: expected {declared} bytes, wrote {transferred}")]
    SizeMismatch {
        /// The size announced in the `Content-Length` header.
        declared: u64,
        /// The number of bytes actually copied.
        transferred: u64,
    },

    /// A hash supplied by a caller is malformed.
    #[error(transparent)]
    InvalidHash(#[from] ParseHashError),

    /// An error that should be reported to the remote party as is.
    #[error(transparent)]
    Transfer(#[from] TransferError),
}

impl BlobError {
    /// Returns true if this is a [`BlobError::Transfer`] with exactly the same
    /// code and reason as `other`.
    pub fn is_transfer_error(&self, other: &TransferError) -> bool {
        matches!(self, BlobError::Transfer(err) if err == other)
    }
}

impl From<&BlobError> for TransferError {
    fn from(err: &BlobError) -> Self {
        match err {
            BlobError::Transfer(err) => err.clone(),
            BlobError::InvalidHash(err) => {
                TransferError::with_reason(StatusCode::BAD_REQUEST, err.to_string())
            }
            BlobError::Io(err) if err.kind() == std::io::ErrorKind::NotFound => {
                TransferError::with_reason(StatusCode::NOT_FOUND, "blob not found")
            }
            other => {
                TransferError::with_reason(StatusCode::INTERNAL_SERVER_ERROR, other.to_string())
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_equality_covers_code_and_reason() {
        let not_found = TransferError::with_reason(StatusCode::NOT_FOUND, "not found");
        assert_eq!(
            not_found,
            TransferError::with_reason(StatusCode::NOT_FOUND, "not found")
        );
        assert_ne!(
            not_found,
            TransferError::with_reason(StatusCode::NOT_FOUND, "gone")
        );
        assert_ne!(
            not_found,
            TransferError::with_reason(StatusCode::GONE, "not found")
        );
        assert_ne!(
            TransferError::new(StatusCode::BAD_REQUEST),
            TransferError::with_reason(StatusCode::BAD_REQUEST, "")
        );
    }

    #[test]
    fn test_is_transfer_error() {
        let err = BlobError::from(TransferError::with_reason(
            StatusCode::UNAUTHORIZED,
            "missing auth",
        ));
        assert!(err.is_transfer_error(&TransferError::with_reason(
            StatusCode::UNAUTHORIZED,
            "missing auth"
        )));
        assert!(!err.is_transfer_error(&TransferError::new(StatusCode::UNAUTHORIZED)));

        let io = BlobError::from(std::io::Error::other("boom"));
        assert!(!io.is_transfer_error(&TransferError::new(StatusCode::INTERNAL_SERVER_ERROR)));
    }

    #[test]
    fn test_display() {
        let err = TransferError::with_reason(StatusCode::NOT_FOUND, "not found");
        assert_eq!(err.to_string(), "code: 404, reason: not found");
        assert_eq!(
            TransferError::new(StatusCode::BAD_REQUEST).to_string(),
            "code: 400, reason: "
        );
    }

    #[test]
    fn test_map_to_transfer_error() {
        let not_found = BlobError::from(std::io::Error::from(std::io::ErrorKind::NotFound));
        assert_eq!(
            TransferError::from(&not_found),
            TransferError::with_reason(StatusCode::NOT_FOUND, "blob not found")
        );

        let invalid = BlobError::from(blossom_hash::parse_hash("xyz").unwrap_err());
        assert_eq!(TransferError::from(&invalid).code, StatusCode::BAD_REQUEST);

        let mismatch = BlobError::SizeMismatch {
            declared: 10,
            transferred: 4,
        };
        assert_eq!(
            TransferError::from(&mismatch),
            TransferError::with_reason(
                StatusCode::INTERNAL_SERVER_ERROR,
                "copied size mismatch: expected 10 bytes, wrote 4"
            )
        );
    }
}
