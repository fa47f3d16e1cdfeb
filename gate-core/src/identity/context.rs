use std::sync::Arc;

use super::feed::IdentitySubscription;
use super::provider::{AuthenticatedIdentity, IdentityProvider, ProviderEvent};
use super::IdentityState;
use crate::error::AppError;
use crate::verdict::{self, ClientGate, GatePolicy};

/// Per-browsing-session view of the live identity state.
///
/// Mounting subscribes to the provider feed; dropping the context is the
/// unsubscribe. The context starts `Unknown` and stays there until the
/// first emission arrives. There is deliberately no timeout on that wait:
/// a hung provider blocks rendering of protected content rather than
/// guessing at a state.
pub struct AuthContext {
    provider: Arc<dyn IdentityProvider>,
    subscription: IdentitySubscription,
    state: IdentityState,
    last_error: Option<String>,
}

impl AuthContext {
    pub fn mount(provider: Arc<dyn IdentityProvider>) -> Self {
        let subscription = provider.feed().subscribe();
        let mut ctx = Self {
            provider,
            subscription,
            state: IdentityState::Unknown,
            last_error: None,
        };
        let current = ctx.subscription.current();
        ctx.apply(current);
        ctx
    }

    pub fn state(&self) -> &IdentityState {
        &self.state
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Map a provider emission onto the identity state union.
    ///
    /// Unrecognized emissions become `Anonymous` plus a recorded error
    /// string; they never crash the subscriber and are never silently
    /// dropped.
    fn apply(&mut self, event: ProviderEvent) {
        match event {
            ProviderEvent::Initializing => self.state = IdentityState::Unknown,
            ProviderEvent::SignedIn(record) => {
                self.last_error = None;
                self.state = IdentityState::Authenticated(record);
            }
            ProviderEvent::SignedOut => self.state = IdentityState::Anonymous,
            ProviderEvent::Unrecognized(detail) => {
                tracing::warn!("Unrecognized identity provider emission: {}", detail);
                self.last_error = Some(detail);
                self.state = IdentityState::Anonymous;
            }
        }
    }

    /// Wait for the next identity-state transition and fold it in.
    ///
    /// Returns the new state, or `None` if the provider feed is gone.
    pub async fn next_transition(&mut self) -> Option<&IdentityState> {
        let event = self.subscription.changed().await?;
        self.apply(event);
        Some(&self.state)
    }

    /// Client-side gate evaluation against the live identity state.
    pub fn evaluate(&self, policy: &GatePolicy, route: &str) -> ClientGate {
        verdict::client(policy, &self.state, route)
    }

    pub async fn sign_in(
        &mut self,
        email: &str,
        password: &str,
    ) -> Result<AuthenticatedIdentity, AppError> {
        match self.provider.sign_in(email, password).await {
            Ok(identity) => {
                self.last_error = None;
                self.state = IdentityState::Authenticated(identity.record.clone());
                Ok(identity)
            }
            Err(e) => {
                self.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    pub async fn sign_up(
        &mut self,
        email: &str,
        password: &str,
    ) -> Result<AuthenticatedIdentity, AppError> {
        match self.provider.sign_up(email, password).await {
            Ok(identity) => {
                self.last_error = None;
                self.state = IdentityState::Authenticated(identity.record.clone());
                Ok(identity)
            }
            Err(e) => {
                self.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Sign out. The local state flips to `Anonymous` before the provider
    /// round trip, so no stale authenticated view can flash while the call
    /// is in flight; a provider rejection is recorded, not propagated as a
    /// state change. Callers pair this with
    /// [`session::revoke`](crate::session::revoke) to drop the cookie.
    pub async fn sign_out(&mut self) -> Result<(), AppError> {
        self.state = IdentityState::Anonymous;
        self.last_error = None;
        if let Err(e) = self.provider.sign_out().await {
            tracing::error!("Provider sign-out failed: {}", e);
            self.last_error = Some(e.to_string());
            return Err(e);
        }
        Ok(())
    }

    pub async fn send_verification_email(&mut self, id_token: &str) -> Result<(), AppError> {
        self.provider.send_verification_email(id_token).await
    }

    pub async fn send_password_reset(&mut self, email: &str) -> Result<(), AppError> {
        self.provider.send_password_reset(email).await
    }
}
