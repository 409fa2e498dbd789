use crate::auth::callback_server::{start_callback_server, AuthorizationResponse};
use crate::auth::pkce::PkceChallenge;
use crate::auth::provider::{IdentityProvider, UserIdentity};
use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::logging::Redacted;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Token endpoint response. Only the access token is used.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub id_token: Option<String>,
}

/// OpenID Connect userinfo response
#[derive(Debug, Clone, Deserialize)]
struct UserInfo {
    sub: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    email: Option<String>,
}

impl From<UserInfo> for UserIdentity {
    fn from(info: UserInfo) -> Self {
        let display_name = info
            .name
            .clone()
            .filter(|n| !n.trim().is_empty())
            .or_else(|| info.email.clone())
            .unwrap_or_else(|| info.sub.clone());

        UserIdentity {
            subject: info.sub,
            display_name,
            email: info.email,
        }
    }
}

/// Google sign-in through the browser with a loopback redirect
pub struct GoogleIdentityProvider {
    config: AuthConfig,
    client: Client,
}

impl GoogleIdentityProvider {
    pub fn new(config: AuthConfig) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    pub fn authorization_url(
        &self,
        redirect_uri: &str,
        pkce: &PkceChallenge,
    ) -> Result<String, AuthError> {
        let mut url = url::Url::parse(&self.config.auth_url)
            .map_err(|e| AuthError::InvalidUrl(e.to_string()))?;

        url.query_pairs_mut()
            .append_pair("client_id", &self.config.client_id)
            .append_pair("redirect_uri", redirect_uri)
            .append_pair("response_type", "code")
            .append_pair("scope", &self.config.scopes.join(" "))
            .append_pair("code_challenge", &pkce.challenge)
            .append_pair("code_challenge_method", "S256")
            .append_pair("state", &pkce.state)
            .append_pair("prompt", "select_account");

        Ok(url.to_string())
    }

    pub async fn exchange_code(
        &self,
        code: &str,
        code_verifier: &str,
        redirect_uri: &str,
    ) -> Result<TokenResponse, AuthError> {
        let mut params = vec![
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", redirect_uri),
            ("client_id", self.config.client_id.as_str()),
            ("code_verifier", code_verifier),
        ];
        if let Some(secret) = &self.config.client_secret {
            params.push(("client_secret", secret.as_str()));
        }

        let response = self
            .client
            .post(&self.config.token_url)
            .form(&params)
            .send()
            .await
            .map_err(|e| AuthError::TokenExchange(format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(AuthError::TokenExchange(format!("HTTP {}: {}", status, error_text)));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| AuthError::TokenExchange(format!("invalid response: {}", e)))?;

        debug!(
            access_token = %Redacted::new(&token.access_token),
            expires_in = ?token.expires_in,
            "Authorization code exchanged"
        );
        Ok(token)
    }

    pub async fn fetch_profile(&self, access_token: &str) -> Result<UserIdentity, AuthError> {
        let response = self
            .client
            .get(&self.config.userinfo_url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AuthError::Profile(format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AuthError::Profile(format!("HTTP {}", response.status())));
        }

        let info: UserInfo = response
            .json()
            .await
            .map_err(|e| AuthError::Profile(format!("invalid response: {}", e)))?;

        Ok(info.into())
    }
}

#[async_trait]
impl IdentityProvider for GoogleIdentityProvider {
    async fn sign_in(&self) -> Result<UserIdentity, AuthError> {
        let pkce = PkceChallenge::generate();
        let mut server = start_callback_server(self.config.callback_port).await?;
        let auth_url = self.authorization_url(&server.redirect_uri, &pkce)?;

        info!(url = %auth_url, "Waiting for browser sign-in");
        if self.config.open_browser {
            if let Err(e) = webbrowser::open(&auth_url) {
                warn!(error = %e, "Could not open browser, open the sign-in URL manually");
            }
        }

        let timeout_secs = self.config.login_timeout_seconds;
        let response = tokio::time::timeout(Duration::from_secs(timeout_secs), &mut server.receiver)
            .await
            .map_err(|_| AuthError::Timeout(timeout_secs))?
            .map_err(|_| AuthError::CallbackServer("callback listener closed".to_string()))?;

        let code = validate_redirect(response, &pkce.state)?;
        let token = self
            .exchange_code(&code, &pkce.verifier, &server.redirect_uri)
            .await?;
        self.fetch_profile(&token.access_token).await
    }
}

/// Check the redirect parameters and extract the authorization code
pub fn validate_redirect(
    response: AuthorizationResponse,
    expected_state: &str,
) -> Result<String, AuthError> {
    if let Some(error) = response.error {
        let message = match response.error_description {
            Some(description) => format!("{} ({})", error, description),
            None => error,
        };
        return Err(AuthError::Denied(message));
    }

    if response.state.as_deref() != Some(expected_state) {
        return Err(AuthError::StateMismatch);
    }

    response
        .code
        .filter(|code| !code.is_empty())
        .ok_or(AuthError::MissingCode)
}
