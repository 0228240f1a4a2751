//! Core data types for the gateway.

use bytes::Bytes;

/// A binary asset handed to the gateway for upload.
///
/// Created by the caller per upload and consumed exactly once; the gateway
/// does not retain it.
#[derive(Debug, Clone)]
pub struct MediaPayload {
    /// Caller-supplied name (e.g. the original file name). Diagnostic only;
    /// the stored object is keyed by its generated ID.
    pub name: String,
    /// Raw bytes. May be empty; a zero-length object is uploaded as-is.
    pub data: Bytes,
}

/// Outcome of one successful upload.
#[derive(Debug, Clone)]
pub struct UploadResult {
    /// Time-limited display URL for the uploaded object.
    pub url: String,
    /// Store key for later get/delete. Callers persist this if they want to
    /// reference the object again.
    pub object_id: String,
}

/// Generate a collision-free object ID for a new upload.
pub(crate) fn new_object_id() -> String {
    nanoid::nanoid!()
}
