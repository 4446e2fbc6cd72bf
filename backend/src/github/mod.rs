//! GitHub Contents API client
mod config;
mod error;

use std::time::Duration;

use reqwest::{header, Client};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_tracing::TracingMiddleware;
use serde::{Deserialize, Serialize};
use tracing::instrument;
use url::Url;

pub use config::{GitHubConfig, RepoTarget, DEFAULT_BRANCH};
pub use error::{GitHubError, GitHubResult};

/// Default timeout for one GitHub call, below the server's default request timeout
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 24;
/// Maximum number of idle connections to maintain per host
const MAX_IDLE_CONNECTIONS_PER_HOST: usize = 10;
/// Media type recommended by the GitHub REST API
const GITHUB_ACCEPT: &str = "application/vnd.github+json";
/// Pinned REST API version
const GITHUB_API_VERSION: &str = "2022-11-28";
/// Error text used when GitHub's error body has no `message`
const UPSTREAM_FALLBACK_MESSAGE: &str = "GitHub upload failed";

/// A file to create in the target repository
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewFile<'a> {
    /// Repository-relative path, `/`-separated
    pub path: &'a str,
    /// Commit message
    pub message: &'a str,
    /// Base64-encoded file contents
    pub content: &'a str,
}

/// What GitHub reports back about the created file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreatedFile {
    /// Browser URL of the file on github.com
    pub html_url: Option<String>,
    /// SHA of the commit that added the file
    pub commit_sha: Option<String>,
}

#[derive(Serialize)]
struct PutContentsBody<'a> {
    message: &'a str,
    content: &'a str,
    branch: &'a str,
}

#[derive(Deserialize)]
struct PutContentsResponse {
    #[serde(default)]
    content: Option<ContentInfo>,
    #[serde(default)]
    commit: Option<CommitInfo>,
}

#[derive(Deserialize)]
struct ContentInfo {
    #[serde(default)]
    html_url: Option<String>,
}

#[derive(Deserialize)]
struct CommitInfo {
    #[serde(default)]
    sha: Option<String>,
}

#[derive(Deserialize)]
struct GitHubErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// Trait for the content-versioning backend that stores uploads
#[async_trait::async_trait]
pub trait ContentsApi: Send + Sync {
    /// Creates `file` on the target branch as a single commit.
    /// One attempt, no retries.
    async fn create_file(&self, target: &RepoTarget, file: NewFile<'_>) -> GitHubResult<CreatedFile>;
}

/// HTTP client for `PUT /repos/{owner}/{repo}/contents/{path}`
pub struct GitHubContentsClient {
    api_base_url: Url,
    http_client: ClientWithMiddleware,
}

impl GitHubContentsClient {
    /// Creates a new GitHub Contents API client with the default call timeout
    ///
    /// # Errors
    ///
    /// Returns `GitHubError::Transport` if the base URL is invalid or the HTTP client cannot be built
    pub fn new(api_base_url: &str) -> GitHubResult<Self> {
        Self::with_timeout(api_base_url, Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS))
    }

    /// Creates a client whose calls give up after `timeout`
    ///
    /// # Errors
    ///
    /// Returns `GitHubError::Transport` if the base URL is invalid or the HTTP client cannot be built
    pub fn with_timeout(api_base_url: &str, timeout: Duration) -> GitHubResult<Self> {
        let api_base_url = Url::parse(api_base_url)
            .map_err(|e| GitHubError::Transport(format!("Invalid GitHub API URL {api_base_url}: {e}")))?;
        if api_base_url.cannot_be_a_base() {
            return Err(GitHubError::Transport(format!(
                "GitHub API URL cannot be a base: {api_base_url}"
            )));
        }

        let reqwest_client = Client::builder()
            .timeout(timeout)
            .pool_max_idle_per_host(MAX_IDLE_CONNECTIONS_PER_HOST)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let http_client = ClientBuilder::new(reqwest_client)
            .with(TracingMiddleware::default())
            .build();

        Ok(Self {
            api_base_url,
            http_client,
        })
    }

    /// `{base}/repos/{owner}/{repo}/contents/{path}` with every segment percent-encoded
    fn contents_url(&self, target: &RepoTarget, path: &str) -> Url {
        let mut url = self.api_base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["repos", target.owner.as_str(), target.repo.as_str(), "contents"])
                .extend(path.split('/'));
        }
        url
    }
}

#[async_trait::async_trait]
impl ContentsApi for GitHubContentsClient {
    #[instrument(skip(self, target, file), fields(owner = %target.owner, repo = %target.repo, path = %file.path))]
    async fn create_file(&self, target: &RepoTarget, file: NewFile<'_>) -> GitHubResult<CreatedFile> {
        let url = self.contents_url(target, file.path);
        let body = PutContentsBody {
            message: file.message,
            content: file.content,
            branch: &target.branch,
        };

        let response = self
            .http_client
            .put(url)
            .bearer_auth(&target.token)
            .header(header::ACCEPT, GITHUB_ACCEPT)
            .header("X-GitHub-Api-Version", GITHUB_API_VERSION)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<GitHubErrorBody>()
                .await
                .ok()
                .and_then(|body| body.message)
                .filter(|message| !message.is_empty())
                .unwrap_or_else(|| UPSTREAM_FALLBACK_MESSAGE.to_string());

            return Err(GitHubError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        let created = response
            .json::<PutContentsResponse>()
            .await
            .map_err(|e| GitHubError::Decode(format!("Unexpected GitHub response: {e}")))?;

        tracing::debug!("GitHub accepted file with status {status}");

        Ok(CreatedFile {
            html_url: created.content.and_then(|content| content.html_url),
            commit_sha: created.commit.and_then(|commit| commit.sha),
        })
    }
}

#[cfg(any(test, feature = "test-utils"))]
pub mod mock {
    use std::sync::Mutex;

    use super::{ContentsApi, CreatedFile, GitHubError, GitHubResult, NewFile, RepoTarget};

    /// A call received by [`MockContentsApi`]
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct RecordedFile {
        pub owner: String,
        pub repo: String,
        pub branch: String,
        pub path: String,
        pub message: String,
        pub content: String,
    }

    /// In-memory stand-in for GitHub that records every call
    pub struct MockContentsApi {
        outcome: GitHubResult<CreatedFile>,
        calls: Mutex<Vec<RecordedFile>>,
    }

    impl MockContentsApi {
        #[must_use]
        pub fn succeeding(html_url: Option<&str>) -> Self {
            Self::with_outcome(Ok(CreatedFile {
                html_url: html_url.map(ToString::to_string),
                commit_sha: None,
            }))
        }

        #[must_use]
        pub fn failing(error: GitHubError) -> Self {
            Self::with_outcome(Err(error))
        }

        #[must_use]
        pub const fn with_outcome(outcome: GitHubResult<CreatedFile>) -> Self {
            Self {
                outcome,
                calls: Mutex::new(Vec::new()),
            }
        }

        /// Calls received so far
        ///
        /// # Panics
        ///
        /// Panics if the call log mutex is poisoned
        #[must_use]
        pub fn calls(&self) -> Vec<RecordedFile> {
            self.calls.lock().expect("mock call log poisoned").clone()
        }
    }

    #[async_trait::async_trait]
    impl ContentsApi for MockContentsApi {
        async fn create_file(
            &self,
            target: &RepoTarget,
            file: NewFile<'_>,
        ) -> GitHubResult<CreatedFile> {
            self.calls
                .lock()
                .expect("mock call log poisoned")
                .push(RecordedFile {
                    owner: target.owner.clone(),
                    repo: target.repo.clone(),
                    branch: target.branch.clone(),
                    path: file.path.to_string(),
                    message: file.message.to_string(),
                    content: file.content.to_string(),
                });
            self.outcome.clone()
        }
    }
}
