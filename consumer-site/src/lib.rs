pub mod config;
pub mod handlers;
pub mod services;
pub mod startup;

use std::sync::Arc;

use axum::extract::FromRef;
use gate_core::identity::HttpIdentityProvider;
use gate_core::session::SessionCookieSettings;
use gate_core::verdict::GatePolicy;
use services::listing_client::ListingClient;

/// Shared application state for the consumer site.
#[derive(Clone, FromRef)]
pub struct AppState {
    pub provider: Arc<HttpIdentityProvider>,
    pub listings: Arc<ListingClient>,
    pub policy: Arc<GatePolicy>,
    pub cookies: SessionCookieSettings,
}

impl AppState {
    pub fn new(
        provider: Arc<HttpIdentityProvider>,
        listings: Arc<ListingClient>,
        policy: GatePolicy,
        cookies: SessionCookieSettings,
    ) -> Self {
        Self {
            provider,
            listings,
            policy: Arc::new(policy),
            cookies,
        }
    }
}
