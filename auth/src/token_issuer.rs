use chrono::Duration;

use crate::jwt::Claims;
use crate::jwt::JwtError;
use crate::jwt::JwtHandler;

/// Access token lifetime in minutes.
pub const ACCESS_TOKEN_MINUTES: i64 = 10;

/// Refresh token lifetime in days.
pub const REFRESH_TOKEN_DAYS: i64 = 7;

/// Issues and verifies the two token classes.
///
/// Access and refresh tokens are signed with independent secrets, so a
/// token of one class can never be presented as the other. The short
/// access lifetime bounds the damage window of a leaked token; the long
/// refresh lifetime amortizes login friction.
pub struct TokenIssuer {
    access: JwtHandler,
    refresh: JwtHandler,
}

/// An access/refresh token pair returned by login and refresh.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

impl TokenIssuer {
    /// Create an issuer from the two signing secrets.
    pub fn new(access_secret: &[u8], refresh_secret: &[u8]) -> Self {
        Self {
            access: JwtHandler::new(access_secret),
            refresh: JwtHandler::new(refresh_secret),
        }
    }

    /// Issue a short-lived access token for a user.
    pub fn issue_access(&self, user_id: impl ToString, email: &str) -> Result<String, JwtError> {
        let claims = Claims::new(user_id, email, Duration::minutes(ACCESS_TOKEN_MINUTES));
        self.access.encode(&claims)
    }

    /// Issue a long-lived refresh token for a user.
    pub fn issue_refresh(&self, user_id: impl ToString, email: &str) -> Result<String, JwtError> {
        let claims = Claims::new(user_id, email, Duration::days(REFRESH_TOKEN_DAYS));
        self.refresh.encode(&claims)
    }

    /// Issue a fresh access/refresh pair for a user.
    pub fn issue_pair(&self, user_id: impl ToString, email: &str) -> Result<TokenPair, JwtError> {
        let user_id = user_id.to_string();
        Ok(TokenPair {
            access_token: self.issue_access(&user_id, email)?,
            refresh_token: self.issue_refresh(&user_id, email)?,
        })
    }

    /// Verify a token against the access secret.
    ///
    /// # Errors
    /// * `TokenExpired` - Past the embedded expiry
    /// * `InvalidSignature` - Not signed with the access secret
    /// * `DecodingFailed` - Malformed token
    pub fn verify_access(&self, token: &str) -> Result<Claims, JwtError> {
        self.access.decode(token)
    }

    /// Verify a token against the refresh secret.
    ///
    /// # Errors
    /// * `TokenExpired` - Past the embedded expiry
    /// * `InvalidSignature` - Not signed with the refresh secret
    /// * `DecodingFailed` - Malformed token
    pub fn verify_refresh(&self, token: &str) -> Result<Claims, JwtError> {
        self.refresh.decode(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_issuer() -> TokenIssuer {
        TokenIssuer::new(
            b"access_secret_key_at_least_32_bytes!",
            b"refresh_secret_key_at_least_32_byte!",
        )
    }

    #[test]
    fn test_issue_pair_carries_identity() {
        let issuer = test_issuer();

        let pair = issuer
            .issue_pair("user123", "alice@example.com")
            .expect("Failed to issue pair");

        let access = issuer
            .verify_access(&pair.access_token)
            .expect("Access token did not verify");
        assert_eq!(access.sub, "user123");
        assert_eq!(access.email, "alice@example.com");

        let refresh = issuer
            .verify_refresh(&pair.refresh_token)
            .expect("Refresh token did not verify");
        assert_eq!(refresh.sub, "user123");
        assert_eq!(refresh.email, "alice@example.com");
    }

    #[test]
    fn test_token_classes_are_not_interchangeable() {
        let issuer = test_issuer();

        let pair = issuer
            .issue_pair("user123", "alice@example.com")
            .expect("Failed to issue pair");

        assert!(matches!(
            issuer.verify_access(&pair.refresh_token),
            Err(JwtError::InvalidSignature)
        ));
        assert!(matches!(
            issuer.verify_refresh(&pair.access_token),
            Err(JwtError::InvalidSignature)
        ));
    }

    #[test]
    fn test_token_lifetimes() {
        let issuer = test_issuer();

        let pair = issuer
            .issue_pair("user123", "alice@example.com")
            .expect("Failed to issue pair");

        let access = issuer.verify_access(&pair.access_token).unwrap();
        assert_eq!(access.exp - access.iat, ACCESS_TOKEN_MINUTES * 60);

        let refresh = issuer.verify_refresh(&pair.refresh_token).unwrap();
        assert_eq!(refresh.exp - refresh.iat, REFRESH_TOKEN_DAYS * 24 * 60 * 60);
    }

    #[test]
    fn test_repeated_issuance_produces_distinct_tokens() {
        let issuer = test_issuer();

        // Same user, same instant: rotation still has to supersede
        let first = issuer.issue_refresh("user123", "alice@example.com").unwrap();
        let second = issuer.issue_refresh("user123", "alice@example.com").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_expired_access_token_rejected() {
        let issuer = test_issuer();

        // Sign an already-expired claim set with the access secret
        let handler = JwtHandler::new(b"access_secret_key_at_least_32_bytes!");
        let claims = Claims::new("user123", "alice@example.com", Duration::hours(-1));
        let token = handler.encode(&claims).expect("Failed to encode token");

        assert!(matches!(
            issuer.verify_access(&token),
            Err(JwtError::TokenExpired)
        ));
    }
}
