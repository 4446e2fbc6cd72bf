//! GitHub repository target configuration

use std::env;
use std::fmt;

use super::error::{GitHubError, GitHubResult};

/// Branch used when `GITHUB_BRANCH` is not set
pub const DEFAULT_BRANCH: &str = "main";

/// Repository that receives uploads, as configured on the server
///
/// Fields stay optional so the server can start unconfigured; every upload
/// then fails with a server error until the deployment is fixed.
#[derive(Clone, PartialEq, Eq)]
pub struct GitHubConfig {
    /// Repository owner (user or organization)
    pub owner: Option<String>,
    /// Repository name
    pub repo: Option<String>,
    /// Token with `contents: write` on the repository
    pub token: Option<String>,
    /// Target branch
    pub branch: String,
}

/// Fully resolved repository target for one upload
#[derive(Clone, PartialEq, Eq)]
pub struct RepoTarget {
    /// Repository owner
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// Target branch
    pub branch: String,
    /// Bearer token
    pub token: String,
}

impl GitHubConfig {
    /// Builds a configuration, treating blank values as absent
    #[must_use]
    pub fn new(
        owner: Option<String>,
        repo: Option<String>,
        token: Option<String>,
        branch: Option<String>,
    ) -> Self {
        Self {
            owner: non_blank(owner),
            repo: non_blank(repo),
            token: non_blank(token),
            branch: non_blank(branch).unwrap_or_else(|| DEFAULT_BRANCH.to_string()),
        }
    }

    /// Reads `GITHUB_OWNER`, `GITHUB_REPO`, `GITHUB_TOKEN` and `GITHUB_BRANCH`
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(
            env::var("GITHUB_OWNER").ok(),
            env::var("GITHUB_REPO").ok(),
            env::var("GITHUB_TOKEN").ok(),
            env::var("GITHUB_BRANCH").ok(),
        )
    }

    /// Resolves the target, failing if any required value is missing
    ///
    /// # Errors
    ///
    /// Returns `GitHubError::NotConfigured` naming every missing variable
    pub fn target(&self) -> GitHubResult<RepoTarget> {
        match (&self.owner, &self.repo, &self.token) {
            (Some(owner), Some(repo), Some(token)) => Ok(RepoTarget {
                owner: owner.clone(),
                repo: repo.clone(),
                branch: self.branch.clone(),
                token: token.clone(),
            }),
            _ => {
                let missing: Vec<&str> = [
                    ("GITHUB_OWNER", self.owner.is_none()),
                    ("GITHUB_REPO", self.repo.is_none()),
                    ("GITHUB_TOKEN", self.token.is_none()),
                ]
                .into_iter()
                .filter_map(|(name, absent)| absent.then_some(name))
                .collect();
                Err(GitHubError::NotConfigured(missing.join(", ")))
            }
        }
    }
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self::new(None, None, None, None)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn redacted(token: Option<&str>) -> &'static str {
    token.map_or("<unset>", |_| "<redacted>")
}

impl fmt::Debug for GitHubConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GitHubConfig")
            .field("owner", &self.owner)
            .field("repo", &self.repo)
            .field("token", &redacted(self.token.as_deref()))
            .field("branch", &self.branch)
            .finish()
    }
}

impl fmt::Debug for RepoTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RepoTarget")
            .field("owner", &self.owner)
            .field("repo", &self.repo)
            .field("branch", &self.branch)
            .field("token", &redacted(Some(self.token.as_str())))
            .finish()
    }
}
