//! Session tokens. Token issuance and verification belong to an external
//! identity provider; this module only fixes the contract the service needs
//! and ships an in-memory issuer for local use and tests.

use std::collections::HashMap;

use parking_lot::RwLock;
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::domain::UserId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("no token")]
    MissingToken,
    #[error("invalid token")]
    InvalidToken,
}

pub trait TokenVerifier: Send + Sync {
    fn verify(&self, token: &str) -> Result<UserId, AuthError>;
}

/// Extract the token from an `Authorization: Bearer <token>` header value.
pub fn bearer_token(header: Option<&str>) -> Result<&str, AuthError> {
    let header = header.map(str::trim).unwrap_or_default();
    let token = match header.strip_prefix("Bearer") {
        Some(rest) if rest.is_empty() || rest.starts_with(' ') => rest.trim(),
        _ => header,
    };
    if token.is_empty() {
        return Err(AuthError::MissingToken);
    }
    Ok(token)
}

/// Resolve the caller behind an `Authorization` header.
pub fn authenticate<V: TokenVerifier + ?Sized>(
    verifier: &V,
    header: Option<&str>,
) -> Result<UserId, AuthError> {
    let token = bearer_token(header)?;
    verifier.verify(token).inspect_err(|err| {
        warn!(%err, "rejected token");
    })
}

/// Opaque random tokens mapped to users, kept in process.
#[derive(Debug, Default)]
pub struct MemoryTokens {
    tokens: RwLock<HashMap<String, UserId>>,
}

impl MemoryTokens {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&self, user: UserId) -> String {
        let token = Uuid::new_v4().simple().to_string();
        debug!(%user, "issued token");
        self.tokens.write().insert(token.clone(), user);
        token
    }

    pub fn revoke(&self, token: &str) -> bool {
        self.tokens.write().remove(token).is_some()
    }
}

impl TokenVerifier for MemoryTokens {
    fn verify(&self, token: &str) -> Result<UserId, AuthError> {
        self.tokens
            .read()
            .get(token)
            .cloned()
            .ok_or(AuthError::InvalidToken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_bearer_prefix() {
        assert_eq!(bearer_token(Some("Bearer abc")), Ok("abc"));
        assert_eq!(bearer_token(Some("abc")), Ok("abc"));
        assert_eq!(bearer_token(Some("Bearer ")), Err(AuthError::MissingToken));
        assert_eq!(bearer_token(None), Err(AuthError::MissingToken));
    }

    #[test]
    fn issued_tokens_verify_until_revoked() {
        let tokens = MemoryTokens::new();
        let token = tokens.issue(UserId::new("ada"));
        let header = format!("Bearer {token}");
        assert_eq!(
            authenticate(&tokens, Some(&header)),
            Ok(UserId::new("ada"))
        );

        assert!(tokens.revoke(&token));
        assert_eq!(
            authenticate(&tokens, Some(&header)),
            Err(AuthError::InvalidToken)
        );
    }
}
