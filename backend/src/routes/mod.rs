mod docs;
pub mod health;
pub mod upload;

use aide::axum::{
    routing::{get, post},
    ApiRouter,
};

/// Creates the router with all handler routes
pub fn handler() -> ApiRouter {
    ApiRouter::new()
        .merge(docs::handler())
        .api_route("/health", get(health::handler))
        .api_route(
            "/api/upload",
            post(upload::upload_image).options(upload::preflight),
        )
}
