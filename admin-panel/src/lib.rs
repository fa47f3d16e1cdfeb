pub mod config;
pub mod handlers;
pub mod services;
pub mod startup;

use std::sync::Arc;

use axum::extract::FromRef;
use gate_core::identity::HttpIdentityProvider;
use gate_core::session::SessionCookieSettings;
use gate_core::verdict::GatePolicy;
use services::content_client::ContentClient;

/// Shared application state for the admin panel.
#[derive(Clone, FromRef)]
pub struct AppState {
    pub provider: Arc<HttpIdentityProvider>,
    pub content: Arc<ContentClient>,
    pub policy: Arc<GatePolicy>,
    pub cookies: SessionCookieSettings,
}

impl AppState {
    pub fn new(
        provider: Arc<HttpIdentityProvider>,
        content: Arc<ContentClient>,
        policy: GatePolicy,
        cookies: SessionCookieSettings,
    ) -> Self {
        Self {
            provider,
            content,
            policy: Arc::new(policy),
            cookies,
        }
    }
}
