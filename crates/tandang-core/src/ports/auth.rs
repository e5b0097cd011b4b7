//! Identity provider bridge and session token ports.

use async_trait::async_trait;

/// Identity returned by the OAuth provider after a successful code exchange.
#[derive(Debug, Clone)]
pub struct OAuthIdentity {
    /// Provider-scoped stable user id.
    pub provider_id: String,
    pub handle: String,
    pub email: String,
}

/// Claims carried by a session token.
#[derive(Debug, Clone)]
pub struct TokenClaims {
    pub subject: String,
    pub handle: String,
    pub email: String,
    pub exp: i64,
}

/// Session token service. Any authenticated identity may write; there is no
/// role model.
pub trait TokenService: Send + Sync {
    /// Issue a session token for an identity the provider vouched for.
    fn issue_token(&self, identity: &OAuthIdentity) -> Result<String, AuthError>;

    /// Validate and decode a token.
    fn validate_token(&self, token: &str) -> Result<TokenClaims, AuthError>;

    fn expiration_seconds(&self) -> i64;
}

/// Delegated OAuth sign-in: redirect out, exchange the callback code.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Provider authorize URL the sign-in affordance redirects to.
    fn authorize_url(&self, state: &str) -> String;

    /// Exchange the callback code for the signed-in identity.
    async fn exchange_code(&self, code: &str) -> Result<OAuthIdentity, AuthError>;
}

/// Authentication errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Sign-in failed: {0}")]
    SignInFailed(String),

    #[error("OAuth state mismatch")]
    StateMismatch,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Missing authorization header")]
    MissingAuth,
}
