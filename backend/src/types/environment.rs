//! Environment configuration for different deployment stages

use std::env;
use std::time::Duration;

use tracing::Level;

/// Default GitHub REST API base URL
const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";
/// Default listening port
const DEFAULT_PORT: u16 = 8001;
/// Default maximum request body size: 20 MiB of JSON, enough for a ~15 MiB image once base64-encoded
const DEFAULT_MAX_BODY_BYTES: usize = 20 * 1024 * 1024;
/// Default request timeout in seconds
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Application environment configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    /// Production environment
    Production,
    /// Staging environment
    Staging,
    /// Development environment
    Development {
        /// Optional override for the GitHub API base URL (e.g. a local mock)
        github_api_url_override: Option<String>,
    },
}

impl Environment {
    /// Creates an Environment from the `APP_ENV` environment variable
    ///
    /// # Panics
    ///
    /// Panics if `APP_ENV` contains an invalid value
    #[must_use]
    pub fn from_env() -> Self {
        let env = env::var("APP_ENV")
            .unwrap_or_else(|_| "development".to_string())
            .trim()
            .to_lowercase();

        match env.as_str() {
            "production" => Self::Production,
            "staging" => Self::Staging,
            "development" => {
                let github_api_url_override = env::var("GITHUB_API_URL")
                    .ok()
                    .map(|val| val.trim().to_string())
                    .filter(|val| !val.is_empty());

                Self::Development {
                    github_api_url_override,
                }
            }
            _ => panic!("Invalid environment: {env}"),
        }
    }

    /// Whether to show API docs
    #[must_use]
    pub const fn show_api_docs(&self) -> bool {
        matches!(self, Self::Development { .. } | Self::Staging)
    }

    /// Whether logs should be emitted as JSON (Datadog ingestion)
    #[must_use]
    pub const fn json_logs(&self) -> bool {
        matches!(self, Self::Production | Self::Staging)
    }

    /// Base URL of the GitHub REST API
    #[must_use]
    pub fn github_api_url(&self) -> String {
        match self {
            Self::Production | Self::Staging => DEFAULT_GITHUB_API_URL.to_string(),
            Self::Development {
                github_api_url_override,
            } => github_api_url_override
                .clone()
                .unwrap_or_else(|| DEFAULT_GITHUB_API_URL.to_string()),
        }
    }

    /// Port the HTTP server listens on
    ///
    /// # Errors
    ///
    /// Returns an error if `PORT` is set but is not a valid port number
    pub fn port(&self) -> Result<u16, std::num::ParseIntError> {
        env::var("PORT").map_or(Ok(DEFAULT_PORT), |p| p.trim().parse())
    }

    /// Maximum accepted request body size in bytes
    #[must_use]
    pub fn max_body_bytes(&self) -> usize {
        env::var("MAX_BODY_BYTES")
            .ok()
            .and_then(|val| val.trim().parse::<usize>().ok())
            .unwrap_or(DEFAULT_MAX_BODY_BYTES)
    }

    /// Time budget for a whole request, including the GitHub round-trip
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        let secs = env::var("REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|val| val.trim().parse::<u64>().ok())
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);
        Duration::from_secs(secs)
    }

    /// Timeout of the outbound GitHub call, four fifths of the request timeout
    ///
    /// Expires first so a hung upstream surfaces as a transport error.
    #[must_use]
    pub fn github_timeout(&self) -> Duration {
        self.request_timeout() * 4 / 5
    }

    #[must_use]
    pub fn tracing_level(&self) -> Level {
        env::var("TRACING_LEVEL")
            .ok()
            .and_then(|val| val.parse::<Level>().ok())
            .unwrap_or(match self {
                Self::Production | Self::Staging => Level::INFO,
                Self::Development { .. } => Level::DEBUG,
            })
    }
}
