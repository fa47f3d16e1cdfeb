use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::feed::IdentityFeed;
use super::IdentityRecord;
use crate::error::AppError;

/// Raw emission from the identity provider, before the auth context maps
/// it to an [`IdentityState`](super::IdentityState).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderEvent {
    /// Channel seed before the first real emission.
    Initializing,
    SignedIn(IdentityRecord),
    SignedOut,
    /// Emission the adapter could not interpret. Carried as data so the
    /// subscriber stays alive and can fall back to anonymous.
    Unrecognized(String),
}

/// A verified identity plus the bearer token that proves it. The token is
/// what gets cached into the session cookie; this layer never inspects it.
#[derive(Debug, Clone)]
pub struct AuthenticatedIdentity {
    pub record: IdentityRecord,
    pub id_token: String,
}

/// Surface of the external identity service consumed by the platform.
///
/// Every mutating call fails with [`AppError::AuthOperationFailed`] carrying
/// the provider's message on rejection; none of them propagate a transport
/// error past this boundary.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_in(&self, email: &str, password: &str)
        -> Result<AuthenticatedIdentity, AppError>;
    async fn sign_up(&self, email: &str, password: &str)
        -> Result<AuthenticatedIdentity, AppError>;
    async fn sign_out(&self) -> Result<(), AppError>;
    async fn send_verification_email(&self, id_token: &str) -> Result<(), AppError>;
    async fn send_password_reset(&self, email: &str) -> Result<(), AppError>;

    /// The identity-state feed this provider publishes to.
    fn feed(&self) -> &IdentityFeed;
}

/// HTTP adapter over the identity service.
pub struct HttpIdentityProvider {
    client: Client,
    base_url: String,
    feed: IdentityFeed,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignInResponse {
    local_id: String,
    email: String,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    admin: bool,
    id_token: String,
}

#[derive(Deserialize)]
struct ProviderError {
    error: ProviderErrorBody,
}

#[derive(Deserialize)]
struct ProviderErrorBody {
    message: String,
}

impl HttpIdentityProvider {
    pub fn new(base_url: String) -> Self {
        Self {
            client: Client::new(),
            base_url,
            feed: IdentityFeed::new(),
        }
    }

    async fn post(&self, path: &str, body: serde_json::Value) -> Result<reqwest::Response, AppError> {
        let url = format!("{}{}", self.base_url, path);
        self.client.post(&url).json(&body).send().await.map_err(|e| {
            tracing::error!("Identity provider request to {} failed: {}", url, e);
            AppError::AuthOperationFailed(
                "Network error. Please check your connection and try again.".to_string(),
            )
        })
    }

    /// Extract the provider's human-readable rejection message.
    async fn rejection_message(response: reqwest::Response) -> String {
        let status = response.status();
        match response.json::<ProviderError>().await {
            Ok(err) => err.error.message,
            Err(_) => format!("Authentication failed ({})", status),
        }
    }

    async fn authenticate(
        &self,
        path: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthenticatedIdentity, AppError> {
        let response = self
            .post(path, serde_json::json!({ "email": email, "password": password }))
            .await?;

        if !response.status().is_success() {
            let message = Self::rejection_message(response).await;
            tracing::warn!(email = %email, "Identity provider rejected {}: {}", path, message);
            return Err(AppError::AuthOperationFailed(message));
        }

        let body: SignInResponse = response.json().await.map_err(|e| {
            tracing::error!("Unparseable identity provider response: {}", e);
            AppError::AuthOperationFailed("Authentication failed".to_string())
        })?;

        let record = IdentityRecord {
            subject_id: body.local_id,
            email: body.email,
            display_name: body.display_name,
            is_admin: body.admin,
        };

        self.feed.publish(ProviderEvent::SignedIn(record.clone()));

        Ok(AuthenticatedIdentity {
            record,
            id_token: body.id_token,
        })
    }
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    async fn sign_in(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthenticatedIdentity, AppError> {
        self.authenticate("/v1/accounts/sign-in", email, password).await
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthenticatedIdentity, AppError> {
        self.authenticate("/v1/accounts/sign-up", email, password).await
    }

    async fn sign_out(&self) -> Result<(), AppError> {
        let response = self.post("/v1/accounts/sign-out", serde_json::json!({})).await?;
        if !response.status().is_success() {
            return Err(AppError::AuthOperationFailed(
                Self::rejection_message(response).await,
            ));
        }
        self.feed.publish(ProviderEvent::SignedOut);
        Ok(())
    }

    async fn send_verification_email(&self, id_token: &str) -> Result<(), AppError> {
        let response = self
            .post(
                "/v1/accounts/send-verification",
                serde_json::json!({ "idToken": id_token }),
            )
            .await?;
        if !response.status().is_success() {
            return Err(AppError::AuthOperationFailed(
                Self::rejection_message(response).await,
            ));
        }
        Ok(())
    }

    /// Ask the provider to mail a password-reset link. The reset
    /// confirmation itself happens on the provider's own pages; this
    /// subsystem only triggers the send.
    async fn send_password_reset(&self, email: &str) -> Result<(), AppError> {
        let response = self
            .post(
                "/v1/accounts/send-password-reset",
                serde_json::json!({ "email": email }),
            )
            .await?;
        if !response.status().is_success() {
            return Err(AppError::AuthOperationFailed(
                Self::rejection_message(response).await,
            ));
        }
        Ok(())
    }

    fn feed(&self) -> &IdentityFeed {
        &self.feed
    }
}
