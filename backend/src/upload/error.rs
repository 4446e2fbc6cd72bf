//! Error types for upload input handling

use thiserror::Error;

/// Result type for upload preparation
pub type UploadResult<T> = Result<T, UploadError>;

/// Errors caused by the client's upload payload
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UploadError {
    /// `dataURL` missing or not a `data:image/<subtype>;base64,` URL
    #[error("Invalid image dataURL")]
    InvalidDataUrl,

    /// Payload after the comma is empty or not standard base64
    #[error("Invalid image dataURL")]
    InvalidPayload,
}
