pub mod context;
pub mod feed;
pub mod provider;

pub use context::AuthContext;
pub use feed::{IdentityFeed, IdentitySubscription};
pub use provider::{HttpIdentityProvider, IdentityProvider, ProviderEvent};

use serde::{Deserialize, Serialize};

/// The caller's authentication status as observed from the identity
/// provider's live feed.
///
/// Transitions are driven exclusively by the provider adapter; no other
/// component mutates identity state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityState {
    /// Subscription started, first emission not yet received.
    Unknown,
    Anonymous,
    Authenticated(IdentityRecord),
}

impl IdentityState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, IdentityState::Authenticated(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityRecord {
    pub subject_id: String,
    pub email: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub is_admin: bool,
}

#[cfg(test)]
impl IdentityRecord {
    pub(crate) fn test_record() -> Self {
        Self {
            subject_id: "user_123".to_string(),
            email: "test@example.com".to_string(),
            display_name: Some("Test User".to_string()),
            is_admin: false,
        }
    }
}
