//! Credential selection for backend requests.
//!
//! Precedence per request: an access token supplied with the request wins
//! and grants read-write access; otherwise the configured API key serves as
//! a read-only fallback; with neither, the request cannot proceed. Tokens
//! are never validated here; the backend is the authority.

use crate::config::SheetRestConfig;
use crate::error::{Result, SheetRestError};

/// The credential chosen for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credential {
    /// Caller-supplied OAuth access token; read-write.
    OAuth(String),
    /// Service-configured API key; read-only.
    ApiKey(String),
}

impl Credential {
    /// Whether this credential may perform writes.
    #[must_use]
    pub fn can_write(&self) -> bool {
        matches!(self, Self::OAuth(_))
    }

    /// Guards a write operation. Called before any backend request is
    /// issued, so a refused write never reaches the wire.
    ///
    /// # Errors
    /// Returns a read-only-credential error naming the operation.
    pub fn ensure_writable(&self, operation: &str) -> Result<()> {
        if self.can_write() {
            Ok(())
        } else {
            Err(SheetRestError::read_only(operation))
        }
    }
}

/// Picks the credential for a request.
///
/// # Errors
/// Returns a missing-credential error when no token accompanies the request
/// and no API key is configured.
pub fn resolve_credential(
    access_token: Option<&str>,
    config: &SheetRestConfig,
) -> Result<Credential> {
    if let Some(token) = access_token {
        let token = token.trim();
        if !token.is_empty() {
            return Ok(Credential::OAuth(token.to_string()));
        }
    }
    match &config.google.api_key {
        Some(key) if !key.trim().is_empty() => Ok(Credential::ApiKey(key.clone())),
        _ => Err(SheetRestError::MissingCredential),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_key(key: Option<&str>) -> SheetRestConfig {
        let mut config = SheetRestConfig::default();
        config.google.api_key = key.map(String::from);
        config
    }

    #[test]
    fn access_token_wins_over_api_key() {
        let config = config_with_key(Some("service-key"));
        let credential = resolve_credential(Some("user-token"), &config).expect("resolve");
        assert_eq!(credential, Credential::OAuth(String::from("user-token")));
        assert!(credential.can_write());
    }

    #[test]
    fn blank_token_falls_back_to_api_key() {
        let config = config_with_key(Some("service-key"));
        let credential = resolve_credential(Some("   "), &config).expect("resolve");
        assert_eq!(credential, Credential::ApiKey(String::from("service-key")));
        assert!(!credential.can_write());
    }

    #[test]
    fn absent_token_uses_api_key() {
        let config = config_with_key(Some("service-key"));
        let credential = resolve_credential(None, &config).expect("resolve");
        assert!(matches!(credential, Credential::ApiKey(_)));
    }

    #[test]
    fn no_credential_at_all_is_an_error() {
        let config = config_with_key(None);
        let error = resolve_credential(None, &config).expect_err("must fail");
        assert_eq!(error.kind(), "missing_credential");
    }

    #[test]
    fn blank_api_key_counts_as_absent() {
        let config = config_with_key(Some("  "));
        let error = resolve_credential(None, &config).expect_err("must fail");
        assert_eq!(error.kind(), "missing_credential");
    }

    #[test]
    fn write_guard_refuses_api_key_credential() {
        let credential = Credential::ApiKey(String::from("service-key"));
        let error = credential
            .ensure_writable("create row")
            .expect_err("must refuse");
        assert_eq!(error.kind(), "read_only_credential");
        assert!(error.to_string().contains("create row"));

        let credential = Credential::OAuth(String::from("user-token"));
        assert!(credential.ensure_writable("create row").is_ok());
    }
}
