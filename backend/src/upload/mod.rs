//! Image upload pipeline: input checks, filename normalization and storage path derivation
mod data_url;
mod error;
mod filename;

use std::borrow::Cow;

use chrono::{DateTime, SecondsFormat, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::github::{NewFile, RepoTarget};

pub use data_url::{base64_payload, is_base64_payload, is_image_data_url};
pub use error::{UploadError, UploadResult};
pub use filename::{has_image_extension, normalize_filename, sanitize_filename, IMAGE_EXTENSIONS};

/// Directory inside the repository that receives uploads
pub const IMAGE_DIRECTORY: &str = "images";
/// Base URL serving raw file contents of public repositories
pub const RAW_CONTENT_BASE_URL: &str = "https://raw.githubusercontent.com";
/// Captions longer than this are truncated in the commit message
pub const MAX_CAPTION_CHARS: usize = 200;

const INVALID_DATA_URL: &str = "Invalid image dataURL";

/// Image upload request body
#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema)]
pub struct UploadRequest {
    /// Display name of the image, sanitized before use
    #[serde(default)]
    pub filename: Option<String>,
    /// `data:image/<subtype>;base64,<payload>`
    #[serde(default, rename = "dataURL")]
    pub data_url: Option<String>,
    /// Free-text annotation added to the commit message
    #[serde(default)]
    pub caption: Option<String>,
}

/// A file ready to be committed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredImage {
    /// Normalized filename
    pub filename: String,
    /// Repository path, `images/<timestamp>-<filename>`
    pub path: String,
    /// Base64 payload, unchanged from the data URL
    pub content: String,
    /// Commit message
    pub message: String,
}

impl StoredImage {
    /// Borrowed view for the contents API
    #[must_use]
    pub fn as_new_file(&self) -> NewFile<'_> {
        NewFile {
            path: &self.path,
            message: &self.message,
            content: &self.content,
        }
    }
}

impl Validate for UploadRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if !self.data_url.as_deref().is_some_and(is_image_data_url) {
            errors.add(
                "dataURL",
                ValidationError::new("invalid_data_url").with_message(Cow::Borrowed(INVALID_DATA_URL)),
            );
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Repository path for a file created at `now`
///
/// The timestamp is RFC 3339 with milliseconds and `:`/`.` replaced by `-`,
/// e.g. `images/2024-05-01T12-30-45-123Z-photo.png`, so paths sort by creation time.
#[must_use]
pub fn storage_path(now: DateTime<Utc>, filename: &str) -> String {
    let timestamp = now
        .to_rfc3339_opts(SecondsFormat::Millis, true)
        .replace([':', '.'], "-");
    format!("{IMAGE_DIRECTORY}/{timestamp}-{filename}")
}

/// Single-line, trimmed, length-limited caption; `None` when nothing is left
#[must_use]
pub fn clean_caption(caption: &str) -> Option<String> {
    let flattened: String = caption
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();
    let truncated: String = flattened.trim().chars().take(MAX_CAPTION_CHARS).collect();
    let cleaned = truncated.trim_end();
    (!cleaned.is_empty()).then(|| cleaned.to_string())
}

/// `Add image: <filename>`, followed by ` — <caption>` when a caption is present
#[must_use]
pub fn commit_message(filename: &str, caption: Option<&str>) -> String {
    match caption.and_then(clean_caption) {
        Some(caption) => format!("Add image: {filename} — {caption}"),
        None => format!("Add image: {filename}"),
    }
}

/// Public raw-content URL of a committed file
#[must_use]
pub fn public_url(target: &RepoTarget, path: &str) -> String {
    format!(
        "{RAW_CONTENT_BASE_URL}/{}/{}/{}/{path}",
        target.owner, target.repo, target.branch
    )
}

/// Validates the request and builds the file to commit
///
/// # Errors
///
/// Returns `UploadError::InvalidDataUrl` if `dataURL` is missing or not an image data URL
/// Returns `UploadError::InvalidPayload` if the payload is empty or not base64
pub fn prepare(request: UploadRequest, now: DateTime<Utc>) -> UploadResult<StoredImage> {
    let mut data_url = request
        .data_url
        .filter(|url| is_image_data_url(url))
        .ok_or(UploadError::InvalidDataUrl)?;

    // An accepted data URL always contains the comma closing `;base64,`
    let payload_len = base64_payload(&data_url)
        .ok_or(UploadError::InvalidDataUrl)?
        .len();
    let payload_start = data_url.len() - payload_len;
    let content = data_url.split_off(payload_start);
    if !is_base64_payload(&content) {
        return Err(UploadError::InvalidPayload);
    }

    let filename = normalize_filename(request.filename.as_deref());

    Ok(StoredImage {
        path: storage_path(now, &filename),
        message: commit_message(&filename, request.caption.as_deref()),
        content,
        filename,
    })
}
