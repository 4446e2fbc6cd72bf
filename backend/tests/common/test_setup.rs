use axum::{
    body::Body,
    http::{Method, Request},
    response::Response,
    Router,
};
use image_upload_backend::{
    github::{mock::MockContentsApi, ContentsApi, GitHubConfig},
    server,
    types::Environment,
};
use std::sync::Arc;
use tower::ServiceExt;

/// Setup test environment with tracing enabled
pub fn setup_test_env() {
    // Initialize tracing for tests
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .try_init()
        .ok();
}

/// Configuration pointing at a test repository
pub fn test_github_config() -> GitHubConfig {
    GitHubConfig::new(
        Some("octo".to_string()),
        Some("gallery".to_string()),
        Some("test-token".to_string()),
        None,
    )
}

/// Router plus the contents backend it talks to
pub struct TestContext {
    pub router: Router,
    pub environment: Environment,
    pub mock: Option<Arc<MockContentsApi>>,
}

impl TestContext {
    /// Router backed by the given mock and configuration
    pub fn new(mock: MockContentsApi, github_config: GitHubConfig) -> Self {
        let mock = Arc::new(mock);
        let mut context = Self::with_contents_api(mock.clone(), github_config);
        context.mock = Some(mock);
        context
    }

    /// Router backed by a mock that accepts every file
    pub fn configured() -> Self {
        Self::new(
            MockContentsApi::succeeding(Some("https://github.com/octo/gallery/blob/main/images/x")),
            test_github_config(),
        )
    }

    /// Router backed by any contents implementation (e.g. a real client against wiremock)
    pub fn with_contents_api(contents_api: Arc<dyn ContentsApi>, github_config: GitHubConfig) -> Self {
        setup_test_env();

        let environment = Environment::Development {
            github_api_url_override: None,
        };

        let router = server::router(&environment, contents_api, Arc::new(github_config));

        Self {
            router,
            environment,
            mock: None,
        }
    }

    /// Router whose request timeout is `secs` seconds
    ///
    /// Reads `REQUEST_TIMEOUT_SECS`, so callers must be `#[serial]`.
    pub fn with_request_timeout(
        contents_api: Arc<dyn ContentsApi>,
        github_config: GitHubConfig,
        secs: u64,
    ) -> Self {
        std::env::set_var("REQUEST_TIMEOUT_SECS", secs.to_string());
        let context = Self::with_contents_api(contents_api, github_config);
        std::env::remove_var("REQUEST_TIMEOUT_SECS");
        context
    }

    /// The mock behind this context
    pub fn mock(&self) -> &MockContentsApi {
        self.mock.as_deref().expect("context was not built with a mock")
    }

    pub async fn send_post_request(
        &self,
        route: &str,
        payload: serde_json::Value,
    ) -> Result<Response, Box<dyn std::error::Error>> {
        let request = Request::builder()
            .uri(route)
            .method("POST")
            .header("Content-Type", "application/json")
            .body(Body::from(payload.to_string()))?;

        let response = self.router.clone().oneshot(request).await?;
        Ok(response)
    }

    pub async fn send_raw_post_request(
        &self,
        route: &str,
        content_type: Option<&str>,
        body: &'static str,
    ) -> Result<Response, Box<dyn std::error::Error>> {
        let mut builder = Request::builder().uri(route).method("POST");
        if let Some(content_type) = content_type {
            builder = builder.header("Content-Type", content_type);
        }
        let request = builder.body(Body::from(body))?;

        let response = self.router.clone().oneshot(request).await?;
        Ok(response)
    }

    pub async fn send_request(
        &self,
        method: Method,
        route: &str,
        headers: &[(&str, &str)],
    ) -> Result<Response, Box<dyn std::error::Error>> {
        let mut builder = Request::builder().uri(route).method(method);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        let request = builder.body(Body::empty())?;

        let response = self.router.clone().oneshot(request).await?;
        Ok(response)
    }
}
