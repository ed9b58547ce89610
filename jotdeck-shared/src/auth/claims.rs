/// Identity token validation
///
/// Jotdeck does not authenticate users itself. An external identity
/// provider issues signed bearer tokens carrying a stable `sub` claim plus
/// name/email; this module validates the signature and expiry and hands
/// back the claims for user resolution.
///
/// # Example
///
/// ```
/// use jotdeck_shared::auth::claims::{validate_identity_token, IdentityClaims};
/// use jsonwebtoken::{encode, EncodingKey, Header};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let claims = IdentityClaims::new("idp|42", Some("Ada"), Some("ada@example.com"));
/// let token = encode(
///     &Header::default(),
///     &claims,
///     &EncodingKey::from_secret(b"shared-secret"),
/// )?;
///
/// let validated = validate_identity_token(&token, "shared-secret")?;
/// assert_eq!(validated.sub, "idp|42");
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identity token validation error
#[derive(Debug, Error)]
pub enum TokenError {
    /// Token has expired
    #[error("Token has expired")]
    Expired,

    /// Signature, structure, or claim validation failed
    #[error("Invalid token: {0}")]
    Invalid(String),
}

/// Claims carried by the identity provider's bearer token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityClaims {
    /// Stable subject identifying the user at the provider
    pub sub: String,

    /// Display name, present at least at first sight
    #[serde(default)]
    pub name: Option<String>,

    /// Email, present at least at first sight
    #[serde(default)]
    pub email: Option<String>,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl IdentityClaims {
    /// Creates claims expiring in one hour; used by tests and tooling
    pub fn new(subject: &str, name: Option<&str>, email: Option<&str>) -> Self {
        let now = Utc::now();
        Self {
            sub: subject.to_string(),
            name: name.map(str::to_string),
            email: email.map(str::to_string),
            iat: now.timestamp(),
            exp: (now + Duration::hours(1)).timestamp(),
        }
    }

    /// Display name, falling back to the subject when the provider sent none
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.sub)
    }

    /// Email, empty when the provider sent none
    pub fn email_or_empty(&self) -> &str {
        self.email.as_deref().unwrap_or("")
    }
}

/// Validates an identity token and returns its claims
///
/// Checks signature (HS256 with the shared secret the provider is
/// configured with) and expiry.
///
/// # Errors
///
/// Returns `TokenError::Expired` for expired tokens and
/// `TokenError::Invalid` for anything else.
pub fn validate_identity_token(token: &str, secret: &str) -> Result<IdentityClaims, TokenError> {
    let validation = Validation::new(Algorithm::HS256);

    let data = decode::<IdentityClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
        _ => TokenError::Invalid(e.to_string()),
    })?;

    Ok(data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    fn sign(claims: &IdentityClaims) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_round_trip() {
        let claims = IdentityClaims::new("idp|42", Some("Ada"), Some("ada@example.com"));
        let validated = validate_identity_token(&sign(&claims), SECRET).unwrap();

        assert_eq!(validated.sub, "idp|42");
        assert_eq!(validated.name.as_deref(), Some("Ada"));
        assert_eq!(validated.email.as_deref(), Some("ada@example.com"));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let claims = IdentityClaims::new("idp|42", None, None);
        let result = validate_identity_token(&sign(&claims), "a-different-secret-entirely");
        assert!(matches!(result, Err(TokenError::Invalid(_))));
    }

    #[test]
    fn test_expired_token_rejected() {
        let now = Utc::now();
        let claims = IdentityClaims {
            sub: "idp|42".to_string(),
            name: None,
            email: None,
            iat: (now - Duration::hours(2)).timestamp(),
            exp: (now - Duration::hours(1)).timestamp(),
        };

        let result = validate_identity_token(&sign(&claims), SECRET);
        assert!(matches!(result, Err(TokenError::Expired)));
    }

    #[test]
    fn test_claim_fallbacks() {
        let claims = IdentityClaims::new("idp|42", None, None);
        assert_eq!(claims.display_name(), "idp|42");
        assert_eq!(claims.email_or_empty(), "");
    }
}
