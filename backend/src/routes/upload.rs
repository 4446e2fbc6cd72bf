use std::sync::Arc;

use axum::{Extension, Json};
use chrono::Utc;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::{
    github::{ContentsApi, GitHubConfig},
    types::{AppError, ValidatedJson},
    upload::{self, UploadRequest},
};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    /// Always `true` on success
    pub ok: bool,
    /// Public raw-content URL of the committed image
    pub url: String,
    /// github.com page of the committed image, when GitHub reports one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html_url: Option<String>,
}

/// Commits a base64 image to the configured GitHub repository
///
/// Pipeline:
/// 1. `dataURL` is checked by the extractor (400 on mismatch)
/// 2. The repository target is resolved from server configuration (500 when incomplete)
/// 3. The filename is normalized and the path `images/<timestamp>-<filename>` derived
/// 4. One `PUT` to the GitHub Contents API, no retry
///
/// # Errors
///
/// - 400 if `dataURL` is missing, not an image data URL, or carries an invalid payload
/// - 500 if owner, repository or token are not configured
/// - GitHub's own status and message if it rejects the commit
/// - 500 if GitHub cannot be reached or answers with an unreadable body
#[instrument(skip_all, fields(path = tracing::field::Empty))]
pub async fn upload_image(
    Extension(contents_api): Extension<Arc<dyn ContentsApi>>,
    Extension(github_config): Extension<Arc<GitHubConfig>>,
    ValidatedJson(payload): ValidatedJson<UploadRequest>,
) -> Result<Json<UploadResponse>, AppError> {
    let target = github_config.target()?;

    let image = upload::prepare(payload, Utc::now())?;
    tracing::Span::current().record("path", image.path.as_str());
    tracing::info!(
        "Committing {} to {}/{}@{}",
        image.filename,
        target.owner,
        target.repo,
        target.branch
    );

    let created = contents_api
        .create_file(&target, image.as_new_file())
        .await?;

    let url = upload::public_url(&target, &image.path);
    tracing::info!(
        "Image committed: {url} (commit {})",
        created.commit_sha.as_deref().unwrap_or("unknown")
    );

    Ok(Json(UploadResponse {
        ok: true,
        url,
        html_url: created.html_url,
    }))
}

/// CORS preflight / negotiation: 200 with an empty body
///
/// `CorsLayer` answers every `OPTIONS` request before routing, so this only documents the route.
#[allow(clippy::unused_async)]
pub async fn preflight() {}

/// Fallback for any method the upload route does not serve
#[allow(clippy::unused_async)]
pub async fn method_not_allowed() -> AppError {
    AppError::method_not_allowed()
}
