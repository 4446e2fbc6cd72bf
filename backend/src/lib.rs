//! Image upload backend: commits base64 images to a GitHub repository

#![deny(clippy::all, clippy::pedantic, clippy::nursery, dead_code)]

/// GitHub Contents API client and repository configuration
pub mod github;

/// HTTP routes
pub mod routes;

/// Server assembly and startup
pub mod server;

/// Shared types: environment, errors, extractors
pub mod types;

/// Upload pipeline: validation, filename normalization, path derivation
pub mod upload;
