//! GitHub adapter for the identity provider bridge.
//!
//! Sign-in is fully delegated: we redirect out to the provider and exchange
//! the callback code for a profile. No credentials are stored locally.

use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;

use tandang_core::ports::{AuthError, IdentityProvider, OAuthIdentity};

use crate::config::OAuthConfig;

const AUTHORIZE_ENDPOINT: &str = "https://github.com/login/oauth/authorize";
const TOKEN_ENDPOINT: &str = "https://github.com/login/oauth/access_token";
const USER_ENDPOINT: &str = "https://api.github.com/user";

pub struct GithubIdentityProvider {
    client: reqwest::Client,
    config: OAuthConfig,
}

impl GithubIdentityProvider {
    pub fn new(config: OAuthConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    error_description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UserProfile {
    id: u64,
    login: String,
    email: Option<String>,
}

#[async_trait]
impl IdentityProvider for GithubIdentityProvider {
    fn authorize_url(&self, state: &str) -> String {
        // Url::parse_with_params percent-encodes the redirect URL for us.
        Url::parse_with_params(
            AUTHORIZE_ENDPOINT,
            &[
                ("client_id", self.config.client_id.as_str()),
                ("redirect_uri", self.config.redirect_url.as_str()),
                ("scope", "read:user user:email"),
                ("state", state),
            ],
        )
        .expect("authorize endpoint is a valid URL")
        .into()
    }

    async fn exchange_code(&self, code: &str) -> Result<OAuthIdentity, AuthError> {
        let token: TokenResponse = self
            .client
            .post(TOKEN_ENDPOINT)
            .header("Accept", "application/json")
            .json(&serde_json::json!({
                "client_id": self.config.client_id,
                "client_secret": self.config.client_secret,
                "code": code,
            }))
            .send()
            .await
            .map_err(|e| AuthError::SignInFailed(e.to_string()))?
            .json()
            .await
            .map_err(|e| AuthError::SignInFailed(e.to_string()))?;

        let access_token = token.access_token.ok_or_else(|| {
            AuthError::SignInFailed(
                token
                    .error_description
                    .unwrap_or_else(|| "provider returned no access token".to_string()),
            )
        })?;

        let profile: UserProfile = self
            .client
            .get(USER_ENDPOINT)
            .bearer_auth(&access_token)
            .header("Accept", "application/vnd.github+json")
            .header("User-Agent", "tandang-api")
            .send()
            .await
            .map_err(|e| AuthError::SignInFailed(e.to_string()))?
            .json()
            .await
            .map_err(|e| AuthError::SignInFailed(e.to_string()))?;

        Ok(OAuthIdentity {
            provider_id: profile.id.to_string(),
            email: profile
                .email
                .unwrap_or_else(|| format!("{}@users.noreply.github.com", profile.login)),
            handle: profile.login,
        })
    }
}
