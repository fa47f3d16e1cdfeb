use serde::Deserialize;

use crate::identity::IdentityState;

/// Routing decision produced by a gate evaluation.
///
/// Never persisted; recomputed on every evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateVerdict {
    Allow,
    RedirectToSignIn,
    RedirectToHome,
    RedirectToAgeGate,
}

/// Client-side evaluation result.
///
/// `Pending` is a suspension state, not a verdict: while the identity feed
/// has not resolved past `Unknown`, nothing observable should render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientGate {
    Pending,
    Verdict(GateVerdict),
}

/// The protected/public path set, supplied as configuration rather than
/// hardcoded: the two apps ship different sets (the admin panel protects
/// everything, the consumer site leaves content listings public).
#[derive(Debug, Clone, Deserialize)]
pub struct GatePolicy {
    /// Prefix under which the sign-in/sign-up pages live.
    #[serde(default = "default_auth_prefix")]
    pub auth_prefix: String,
    /// Prefixes outside the matcher entirely: static assets, favicon, and
    /// the session API endpoints, which must be reachable without a session.
    #[serde(default = "default_exempt_prefixes")]
    pub exempt_prefixes: Vec<String>,
    /// Additional prefixes browsable without a session.
    #[serde(default)]
    pub public_prefixes: Vec<String>,
    /// Redirect target for unauthenticated requests to protected paths.
    #[serde(default = "default_sign_in_path")]
    pub sign_in_path: String,
    /// Redirect target for authenticated requests to auth pages.
    #[serde(default = "default_home_path")]
    pub home_path: String,
    /// Where the age gate sends unconsented visitors.
    #[serde(default = "default_age_gate_path")]
    pub age_gate_path: String,
    /// Terminal view for visitors who declined the age gate.
    #[serde(default = "default_restricted_path")]
    pub restricted_path: String,
}

fn default_auth_prefix() -> String {
    "/auth".to_string()
}

fn default_exempt_prefixes() -> Vec<String> {
    vec![
        "/api".to_string(),
        "/static".to_string(),
        "/favicon.ico".to_string(),
        "/health".to_string(),
        "/metrics".to_string(),
    ]
}

fn default_sign_in_path() -> String {
    "/auth/signin".to_string()
}

fn default_home_path() -> String {
    "/".to_string()
}

fn default_age_gate_path() -> String {
    "/age-verification".to_string()
}

fn default_restricted_path() -> String {
    "/age-restriction".to_string()
}

impl Default for GatePolicy {
    fn default() -> Self {
        Self {
            auth_prefix: default_auth_prefix(),
            exempt_prefixes: default_exempt_prefixes(),
            public_prefixes: Vec::new(),
            sign_in_path: default_sign_in_path(),
            home_path: default_home_path(),
            age_gate_path: default_age_gate_path(),
            restricted_path: default_restricted_path(),
        }
    }
}

impl GatePolicy {
    fn matches_prefix(path: &str, prefix: &str) -> bool {
        path == prefix
            || (path.starts_with(prefix)
                && path.as_bytes().get(prefix.len()) == Some(&b'/'))
            || prefix == "/"
    }

    pub fn is_exempt(&self, path: &str) -> bool {
        self.exempt_prefixes
            .iter()
            .any(|p| Self::matches_prefix(path, p))
    }

    pub fn is_auth_path(&self, path: &str) -> bool {
        Self::matches_prefix(path, &self.auth_prefix)
    }

    pub fn is_public(&self, path: &str) -> bool {
        self.public_prefixes
            .iter()
            .any(|p| Self::matches_prefix(path, p))
    }
}

/// Edge evaluation: runs per request, before any route code, with nothing
/// but the request path and the presence of the session cookie.
///
/// This is a fast reject. It never contacts the identity provider, so it
/// cannot detect a revoked-but-unexpired token: a stale cookie is trusted
/// for up to the session max-age. The client evaluation is the compensating
/// control that closes that window on next render.
pub fn edge(policy: &GatePolicy, path: &str, has_session: bool) -> GateVerdict {
    if policy.is_exempt(path) {
        return GateVerdict::Allow;
    }
    // The age-gate pages must stay reachable without a session, or an
    // unconsented visitor bounces between the two gates forever.
    if path == policy.age_gate_path || path == policy.restricted_path {
        return GateVerdict::Allow;
    }
    if policy.is_auth_path(path) {
        if has_session {
            return GateVerdict::RedirectToHome;
        }
        return GateVerdict::Allow;
    }
    if !has_session && !policy.is_public(path) {
        return GateVerdict::RedirectToSignIn;
    }
    GateVerdict::Allow
}

/// Client evaluation: runs on every identity-state transition, with the
/// live identity state rather than the cached cookie.
///
/// Authoritative over [`edge`] for freshness: it forces a sign-out redirect
/// even while a stale session cookie still exists.
pub fn client(policy: &GatePolicy, state: &IdentityState, route: &str) -> ClientGate {
    match state {
        IdentityState::Unknown => ClientGate::Pending,
        // Auth pages always render, no redirect loop.
        _ if policy.is_auth_path(route) => ClientGate::Verdict(GateVerdict::Allow),
        IdentityState::Authenticated(_) => ClientGate::Verdict(GateVerdict::Allow),
        IdentityState::Anonymous => {
            if policy.is_public(route) || policy.is_exempt(route) {
                ClientGate::Verdict(GateVerdict::Allow)
            } else {
                ClientGate::Verdict(GateVerdict::RedirectToSignIn)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::IdentityRecord;

    fn policy() -> GatePolicy {
        GatePolicy::default()
    }

    #[test]
    fn protected_path_without_session_redirects_to_sign_in() {
        for path in ["/", "/users", "/posts/42", "/videos", "/models/7/edit"] {
            assert_eq!(
                edge(&policy(), path, false),
                GateVerdict::RedirectToSignIn,
                "path {path}"
            );
        }
    }

    #[test]
    fn auth_path_with_session_redirects_home() {
        for path in ["/auth/signin", "/auth/signup", "/auth"] {
            assert_eq!(
                edge(&policy(), path, true),
                GateVerdict::RedirectToHome,
                "path {path}"
            );
        }
    }

    #[test]
    fn remaining_combinations_allow() {
        assert_eq!(edge(&policy(), "/auth/signin", false), GateVerdict::Allow);
        assert_eq!(edge(&policy(), "/users", true), GateVerdict::Allow);
        assert_eq!(edge(&policy(), "/", true), GateVerdict::Allow);
    }

    #[test]
    fn matcher_exempts_assets_and_session_api() {
        for path in [
            "/static/app.css",
            "/favicon.ico",
            "/api/auth/session",
            "/health",
        ] {
            assert_eq!(edge(&policy(), path, false), GateVerdict::Allow, "path {path}");
        }
    }

    #[test]
    fn age_gate_pages_never_require_a_session() {
        // Without this the two gates bounce an unconsented, session-less
        // visitor between sign-in and the age prompt.
        assert_eq!(
            edge(&policy(), "/age-verification", false),
            GateVerdict::Allow
        );
        assert_eq!(
            edge(&policy(), "/age-restriction", false),
            GateVerdict::Allow
        );
    }

    #[test]
    fn prefix_match_does_not_swallow_siblings() {
        // "/authors" is not under "/auth".
        assert_eq!(
            edge(&policy(), "/authors", false),
            GateVerdict::RedirectToSignIn
        );
    }

    #[test]
    fn public_prefixes_browse_anonymously() {
        let mut p = policy();
        p.public_prefixes = vec!["/posts".to_string(), "/videos".to_string()];
        assert_eq!(edge(&p, "/posts/42", false), GateVerdict::Allow);
        assert_eq!(edge(&p, "/videos", false), GateVerdict::Allow);
        assert_eq!(edge(&p, "/account", false), GateVerdict::RedirectToSignIn);
    }

    #[test]
    fn unknown_identity_suspends_rather_than_allows() {
        assert_eq!(
            client(&policy(), &IdentityState::Unknown, "/users"),
            ClientGate::Pending
        );
    }

    #[test]
    fn sign_in_route_renders_for_any_identity() {
        for state in [
            IdentityState::Anonymous,
            IdentityState::Authenticated(IdentityRecord::test_record()),
        ] {
            assert_eq!(
                client(&policy(), &state, "/auth/signin"),
                ClientGate::Verdict(GateVerdict::Allow)
            );
        }
    }

    #[test]
    fn anonymous_on_protected_route_redirects() {
        assert_eq!(
            client(&policy(), &IdentityState::Anonymous, "/users"),
            ClientGate::Verdict(GateVerdict::RedirectToSignIn)
        );
    }

    #[test]
    fn authenticated_allows() {
        let state = IdentityState::Authenticated(IdentityRecord::test_record());
        assert_eq!(
            client(&policy(), &state, "/users"),
            ClientGate::Verdict(GateVerdict::Allow)
        );
    }
}
