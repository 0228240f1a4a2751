//! Error types for gateway operations.

use std::fmt;

/// Result type for gateway operations.
pub type MediaResult<T> = Result<T, MediaError>;

/// Errors that can occur during gateway operations.
///
/// Item-level variants carry the identifier of the failing object, so a batch
/// error always names the one item it is paired with.
#[derive(Debug)]
pub enum MediaError {
    /// Cannot reach the store or apply the bucket policy at startup. Fatal;
    /// surfaced to process startup and not retried here.
    Connectivity { source: anyhow::Error },

    /// A put or delete failed against a reachable store.
    Store {
        object_id: String,
        source: anyhow::Error,
    },

    /// Presigned URL generation failed.
    Presign { object_id: String, reason: String },

    /// Configuration rejected at load time.
    InvalidConfig { reason: String },
}

impl MediaError {
    /// The object this error is paired with, if it is item-level.
    pub fn object_id(&self) -> Option<&str> {
        match self {
            MediaError::Store { object_id, .. } | MediaError::Presign { object_id, .. } => {
                Some(object_id)
            }
            _ => None,
        }
    }
}

impl fmt::Display for MediaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaError::Connectivity { source } => {
                write!(f, "Store connectivity error: {}", source)
            }
            MediaError::Store { object_id, source } => {
                write!(f, "Store operation failed for object '{}': {}", object_id, source)
            }
            MediaError::Presign { object_id, reason } => {
                write!(
                    f,
                    "Presigned URL generation failed for object '{}': {}",
                    object_id, reason
                )
            }
            MediaError::InvalidConfig { reason } => {
                write!(f, "Invalid media storage config: {}", reason)
            }
        }
    }
}

impl std::error::Error for MediaError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MediaError::Connectivity { source } | MediaError::Store { source, .. } => {
                Some(source.as_ref())
            }
            _ => None,
        }
    }
}
