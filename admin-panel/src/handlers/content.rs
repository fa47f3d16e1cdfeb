use axum::{
    body::Bytes,
    extract::{Path, State},
    response::Response,
};
use std::sync::Arc;

use gate_core::error::AppError;

use crate::services::content_client::ContentClient;

/// The backend resources the panel proxies. Anything else is a 404 here,
/// not a passthrough.
fn resource_path(resource: &str) -> Result<(), AppError> {
    match resource {
        "users" | "models" | "posts" | "videos" => Ok(()),
        other => Err(AppError::NotFound(format!("Unknown resource: {}", other))),
    }
}

pub async fn list(
    State(content): State<Arc<ContentClient>>,
    Path(resource): Path<String>,
) -> Result<Response, AppError> {
    resource_path(&resource)?;
    content
        .forward(reqwest::Method::GET, &format!("/{}", resource), None)
        .await
}

pub async fn create(
    State(content): State<Arc<ContentClient>>,
    Path(resource): Path<String>,
    body: Bytes,
) -> Result<Response, AppError> {
    resource_path(&resource)?;
    content
        .forward(reqwest::Method::POST, &format!("/{}", resource), Some(body))
        .await
}

pub async fn fetch(
    State(content): State<Arc<ContentClient>>,
    Path((resource, id)): Path<(String, u64)>,
) -> Result<Response, AppError> {
    resource_path(&resource)?;
    content
        .forward(reqwest::Method::GET, &format!("/{}/{}", resource, id), None)
        .await
}

pub async fn update(
    State(content): State<Arc<ContentClient>>,
    Path((resource, id)): Path<(String, u64)>,
    body: Bytes,
) -> Result<Response, AppError> {
    resource_path(&resource)?;
    content
        .forward(
            reqwest::Method::PUT,
            &format!("/{}/{}", resource, id),
            Some(body),
        )
        .await
}

pub async fn remove(
    State(content): State<Arc<ContentClient>>,
    Path((resource, id)): Path<(String, u64)>,
) -> Result<Response, AppError> {
    resource_path(&resource)?;
    content
        .forward(
            reqwest::Method::DELETE,
            &format!("/{}/{}", resource, id),
            None,
        )
        .await
}
