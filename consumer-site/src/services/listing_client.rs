use axum::http::{header, StatusCode};
use axum::response::Response;
use gate_core::error::AppError;
use reqwest::Client;

use crate::config::ContentApiSettings;

/// Read-only client for the backend content API. The consumer site only
/// ever lists and fetches; bodies are relayed uninterpreted.
pub struct ListingClient {
    client: Client,
    settings: ContentApiSettings,
}

impl ListingClient {
    pub fn new(settings: ContentApiSettings) -> Self {
        Self {
            client: Client::new(),
            settings,
        }
    }

    pub async fn list(&self, resource: &str) -> Result<Response, AppError> {
        self.relay(&format!("/{}", resource)).await
    }

    pub async fn fetch(&self, resource: &str, id: u64) -> Result<Response, AppError> {
        self.relay(&format!("/{}/{}", resource, id)).await
    }

    async fn relay(&self, path: &str) -> Result<Response, AppError> {
        let url = format!("{}{}", self.settings.url, path);
        let upstream = self.client.get(&url).send().await.map_err(|e| {
            tracing::error!("Content API GET {} failed: {}", url, e);
            AppError::BadGateway("content API unreachable".to_string())
        })?;

        let status = StatusCode::from_u16(upstream.status().as_u16())
            .unwrap_or(StatusCode::BAD_GATEWAY);
        let content_type = upstream
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("application/json")
            .to_string();
        let bytes = upstream.bytes().await.map_err(|e| {
            tracing::error!("Content API GET {} body read failed: {}", url, e);
            AppError::BadGateway("content API response truncated".to_string())
        })?;

        Response::builder()
            .status(status)
            .header(header::CONTENT_TYPE, content_type)
            .body(axum::body::Body::from(bytes))
            .map_err(|e| AppError::InternalError(anyhow::Error::new(e)))
    }
}
