use std::{any::Any, sync::Arc, time::Duration};

use aide::openapi::OpenApi;
use axum::{
    extract::{DefaultBodyLimit, Request, State},
    http::{
        header::{ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware::{self, Next},
    response::{IntoResponse, Response},
    Extension, Router,
};
use datadog_tracing::axum::{shutdown_signal, OtelAxumLayer, OtelInResponseLayer};
use tokio::net::TcpListener;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any as AnyOrigin, CorsLayer},
    set_header::SetResponseHeaderLayer,
};

use crate::routes;
use crate::{
    github::{ContentsApi, GitHubConfig},
    types::{AppError, Environment},
};

/// Builds the application router with all layers except request tracing
///
/// Shared by [`start`] and the integration tests.
pub fn router(
    environment: &Environment,
    contents_api: Arc<dyn ContentsApi>,
    github_config: Arc<GitHubConfig>,
) -> Router {
    let mut openapi = OpenApi::default();

    let cors = CorsLayer::new()
        .allow_origin(AnyOrigin)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE]);

    routes::handler()
        .finish_api(&mut openapi)
        .method_not_allowed_fallback(routes::upload::method_not_allowed)
        .layer(Extension(openapi))
        .layer(Extension(environment.clone()))
        .layer(Extension(contents_api))
        .layer(Extension(github_config))
        .layer(DefaultBodyLimit::max(environment.max_body_bytes()))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(middleware::from_fn_with_state(
            environment.request_timeout(),
            request_timeout,
        ))
        .layer(cors)
        // CorsLayer only lists methods and headers on preflight answers
        .layer(SetResponseHeaderLayer::if_not_present(
            ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("POST, OPTIONS"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("content-type"),
        ))
}

/// Starts the server with the given environment and dependencies
///
/// # Errors
///
/// Returns an error if the server fails to start or bind to the port
pub async fn start(
    environment: Environment,
    contents_api: Arc<dyn ContentsApi>,
    github_config: Arc<GitHubConfig>,
) -> anyhow::Result<()> {
    let router = router(&environment, contents_api, github_config)
        // Include trace context as header into the response
        .layer(OtelInResponseLayer)
        // Start OpenTelemetry trace on incoming request
        .layer(OtelAxumLayer::default());

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], environment.port()?));

    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("🔄 Image Upload Backend started on http://{addr}");

    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(anyhow::Error::from)
}

/// Ends requests that outlive `timeout` with the regular 500 envelope
async fn request_timeout(
    State(timeout): State<Duration>,
    request: Request,
    next: Next,
) -> Response {
    match tokio::time::timeout(timeout, next.run(request)).await {
        Ok(response) => response,
        Err(_) => AppError::internal(format!("Request timed out after {}s", timeout.as_secs()))
            .into_response(),
    }
}

/// Turns a handler panic into the regular 500 envelope
fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .cloned()
        .or_else(|| err.downcast_ref::<&str>().map(ToString::to_string))
        .unwrap_or_else(|| "Unexpected server error".to_string());

    AppError::internal(detail).into_response()
}
