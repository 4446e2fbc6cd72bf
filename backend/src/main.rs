use std::sync::Arc;

use image_upload_backend::{
    github::{ContentsApi, GitHubConfig, GitHubContentsClient},
    server,
    types::Environment,
};
use tracing_subscriber::{filter::LevelFilter, fmt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let environment = Environment::from_env();

    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(environment.tracing_level()).into())
        .from_env_lossy();

    // Configure logging format based on environment
    // Use JSON format for staging/production (Datadog), regular format for development
    if environment.json_logs() {
        fmt().json().with_env_filter(env_filter).init();
    } else {
        fmt().with_env_filter(env_filter).init();
    }

    let github_config = GitHubConfig::from_env();
    if let Err(err) = github_config.target() {
        tracing::warn!("Uploads will be rejected until configured: {err}");
    }

    let contents_api: Arc<dyn ContentsApi> = Arc::new(GitHubContentsClient::with_timeout(
        &environment.github_api_url(),
        environment.github_timeout(),
    )?);

    server::start(environment, contents_api, Arc::new(github_config)).await
}
