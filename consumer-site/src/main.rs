use consumer_site::config::get_configuration;
use consumer_site::services::listing_client::ListingClient;
use consumer_site::startup::build_router;
use consumer_site::AppState;
use dotenvy::dotenv;
use gate_core::identity::HttpIdentityProvider;
use gate_core::observability::init_tracing;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let configuration = get_configuration().map_err(|e| {
        eprintln!("Failed to read configuration: {}", e);
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    init_tracing(
        "consumer-site",
        &configuration.server.log_level,
        configuration.server.otlp_endpoint.as_deref(),
    );

    gate_core::metrics::init_metrics();

    let provider = Arc::new(HttpIdentityProvider::new(
        configuration.identity_provider.url.clone(),
    ));
    let listings = Arc::new(ListingClient::new(configuration.content_api.clone()));

    let state = AppState::new(
        provider,
        listings,
        configuration.gate.clone(),
        configuration.cookies.clone(),
    );
    let app = build_router(state);

    let address = format!(
        "{}:{}",
        configuration.server.host, configuration.server.port
    );
    let listener = tokio::net::TcpListener::bind(&address).await.map_err(|e| {
        tracing::error!("Failed to bind TCP listener to {}: {}", address, e);
        anyhow::anyhow!("Failed to bind to address {}: {}", address, e)
    })?;

    info!("Starting consumer-site on {}", address);
    axum::serve(listener, app).await.map_err(|e| {
        tracing::error!("Server error: {}", e);
        anyhow::anyhow!("Server error: {}", e)
    })?;

    Ok(())
}
