use axum::body::Bytes;
use axum::http::{header, StatusCode};
use axum::response::Response;
use gate_core::error::AppError;
use reqwest::Client;
use secrecy::ExposeSecret;

use crate::config::ContentApiSettings;

/// Passthrough client for the backend content API.
///
/// The gate subsystem does not interpret response bodies: whatever the
/// backend returns is relayed with its status and content type.
pub struct ContentClient {
    client: Client,
    settings: ContentApiSettings,
}

impl ContentClient {
    pub fn new(settings: ContentApiSettings) -> Self {
        Self {
            client: Client::new(),
            settings,
        }
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.settings.url, path);
        let mut builder = self.client.request(method, &url);
        if let Some(key) = &self.settings.api_key {
            builder = builder.bearer_auth(key.expose_secret());
        }
        builder
    }

    pub async fn forward(
        &self,
        method: reqwest::Method,
        path: &str,
        body: Option<Bytes>,
    ) -> Result<Response, AppError> {
        let mut builder = self.request(method.clone(), path);
        if let Some(body) = body {
            builder = builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(body);
        }

        let upstream = builder.send().await.map_err(|e| {
            tracing::error!("Content API {} {} failed: {}", method, path, e);
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
            tracing::error!("Content API {} {} body read failed: {}", method, path, e);
            AppError::BadGateway("content API response truncated".to_string())
        })?;

        Response::builder()
            .status(status)
            .header(header::CONTENT_TYPE, content_type)
            .body(axum::body::Body::from(bytes))
            .map_err(|e| AppError::InternalError(anyhow::Error::new(e)))
    }
}
