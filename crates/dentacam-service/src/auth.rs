//! Credential verification for the capture endpoint.
//!
//! Verifying a bearer credential ("given a token, yield a user identity")
//! is an external capability: real deployments plug an identity provider
//! in behind [`CredentialVerifier`]. The gateway only needs the verified
//! identity plus the raw credential string, which it forwards to the
//! device for the subsequent upload.

use axum::http::HeaderMap;
use subtle::ConstantTimeEq;
use thiserror::Error;

use dentacam_types::UserId;

use crate::config::SecurityConfig;

/// Errors produced by credential verification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// No credential was supplied.
    #[error("no credential, authorization denied")]
    MissingCredential,
    /// The supplied credential did not verify.
    #[error("invalid credential")]
    InvalidCredential,
}

/// The external identity capability: verify a bearer credential and yield
/// the caller's identity.
pub trait CredentialVerifier: Send + Sync {
    /// Verify the bare credential (without any `Bearer ` prefix).
    fn verify(&self, credential: &str) -> Result<UserId, AuthError>;
}

/// Verifier comparing against one configured static token.
///
/// Sufficient for a single-operator deployment; comparison is constant
/// time to avoid leaking the token through response timing.
#[derive(Debug, Clone)]
pub struct StaticTokenVerifier {
    token: String,
    user: UserId,
}

impl StaticTokenVerifier {
    /// Create a verifier accepting `token` and yielding `user`.
    #[must_use]
    pub fn new(token: impl Into<String>, user: impl Into<UserId>) -> Self {
        Self {
            token: token.into(),
            user: user.into(),
        }
    }
}

impl CredentialVerifier for StaticTokenVerifier {
    fn verify(&self, credential: &str) -> Result<UserId, AuthError> {
        if self.token.as_bytes().ct_eq(credential.as_bytes()).into() {
            Ok(self.user.clone())
        } else {
            Err(AuthError::InvalidCredential)
        }
    }
}

/// Verifier that accepts any caller, used when auth is disabled.
#[derive(Debug, Clone)]
pub struct PermissiveVerifier {
    user: UserId,
}

impl PermissiveVerifier {
    /// Create a verifier yielding `user` for every credential.
    #[must_use]
    pub fn new(user: impl Into<UserId>) -> Self {
        Self { user: user.into() }
    }
}

impl CredentialVerifier for PermissiveVerifier {
    fn verify(&self, _credential: &str) -> Result<UserId, AuthError> {
        Ok(self.user.clone())
    }
}

/// Build the verifier described by the security configuration.
///
/// Auth enabled yields a [`StaticTokenVerifier`]; disabled yields a
/// [`PermissiveVerifier`]. Config validation guarantees the token is
/// present when auth is enabled.
pub fn verifier_from_config(security: &SecurityConfig) -> Box<dyn CredentialVerifier> {
    if security.auth_enabled {
        let token = security.api_token.clone().unwrap_or_default();
        Box::new(StaticTokenVerifier::new(token, security.user_id.as_str()))
    } else {
        Box::new(PermissiveVerifier::new(security.user_id.as_str()))
    }
}

/// Extract the caller's credential from the request headers.
///
/// Returns `(raw, bare)`: the raw `Authorization` header value exactly as
/// sent (what gets forwarded to the device) and the bare token with any
/// `Bearer ` prefix stripped (what gets verified). Clients historically
/// sent both forms, so both are accepted.
pub fn extract_credential(headers: &HeaderMap) -> Option<(&str, &str)> {
    let raw = headers.get("Authorization")?.to_str().ok()?;
    let bare = raw.strip_prefix("Bearer ").unwrap_or(raw);
    if bare.is_empty() {
        return None;
    }
    Some((raw, bare))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    const TOKEN: &str = "a-static-test-token";

    #[test]
    fn static_verifier_accepts_the_configured_token() {
        let verifier = StaticTokenVerifier::new(TOKEN, "user-1");
        assert_eq!(verifier.verify(TOKEN), Ok(UserId::from("user-1")));
    }

    #[test]
    fn static_verifier_rejects_other_tokens() {
        let verifier = StaticTokenVerifier::new(TOKEN, "user-1");
        assert_eq!(
            verifier.verify("wrong-token"),
            Err(AuthError::InvalidCredential)
        );
        assert_eq!(verifier.verify(""), Err(AuthError::InvalidCredential));
    }

    #[test]
    fn permissive_verifier_accepts_anything() {
        let verifier = PermissiveVerifier::new("operator");
        assert_eq!(verifier.verify("whatever"), Ok(UserId::from("operator")));
        assert_eq!(verifier.verify(""), Ok(UserId::from("operator")));
    }

    #[test]
    fn extract_credential_strips_bearer_prefix() {
        let mut headers = HeaderMap::new();
        headers.insert("Authorization", HeaderValue::from_static("Bearer abc123"));
        let (raw, bare) = extract_credential(&headers).unwrap();
        assert_eq!(raw, "Bearer abc123");
        assert_eq!(bare, "abc123");
    }

    #[test]
    fn extract_credential_accepts_a_bare_token() {
        let mut headers = HeaderMap::new();
        headers.insert("Authorization", HeaderValue::from_static("abc123"));
        let (raw, bare) = extract_credential(&headers).unwrap();
        assert_eq!(raw, "abc123");
        assert_eq!(bare, "abc123");
    }

    #[test]
    fn extract_credential_rejects_missing_or_empty() {
        let headers = HeaderMap::new();
        assert!(extract_credential(&headers).is_none());

        let mut headers = HeaderMap::new();
        headers.insert("Authorization", HeaderValue::from_static("Bearer "));
        assert!(extract_credential(&headers).is_none());
    }

    #[test]
    fn verifier_from_config_respects_auth_flag() {
        let mut security = SecurityConfig::default();
        assert!(verifier_from_config(&security).verify("anything").is_ok());

        security.auth_enabled = true;
        security.api_token = Some("configured-token-16ch".to_string());
        let verifier = verifier_from_config(&security);
        assert!(verifier.verify("configured-token-16ch").is_ok());
        assert!(verifier.verify("anything").is_err());
    }
}
