//! Seznam login provider.
//!
//! A login runs three steps in strict order: the authorization code is exchanged
//! for tokens, the access token is used to fetch the user's identity, and both
//! replies are normalized into [`ServiceData`]. Nothing is returned unless both
//! network calls succeed.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use log::*;
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::service_data::{normalize, LoginResult};
use super::types::{AuthorizationQuery, IdentityResponse, TokenResponse};
use crate::error::{
    configuration_error, oauth_error, ConfigurationErrorKind, Error, ErrorKind, OAuthErrorKind,
};
use crate::host::{HostServices, LoginHandler, ProtocolVersion, ProviderRegistry};
use crate::http::{HttpReply, HttpTransport};

/// Name the provider registers under and looks its configuration up by.
pub const PROVIDER_NAME: &str = "seznam";

pub const TOKEN_URL: &str = "https://login.szn.cz/api/v1/oauth/token";
pub const USER_URL: &str = "https://login.szn.cz/api/v1/user";

const HANDSHAKE_FAILED: &str = "Failed to complete OAuth handshake with Seznam.";
const IDENTITY_FAILED: &str = "Failed to fetch identity from Seznam.";

/// Endpoints of the Seznam OAuth API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub token_url: String,
    pub user_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            token_url: TOKEN_URL.to_string(),
            user_url: USER_URL.to_string(),
        }
    }
}

/// The Seznam provider adapter, bound to its host services and transport.
pub struct Provider {
    host: HostServices,
    transport: Arc<dyn HttpTransport>,
    endpoints: Endpoints,
}

impl Provider {
    pub fn new(host: HostServices, transport: Arc<dyn HttpTransport>, endpoints: Endpoints) -> Self {
        Self {
            host,
            transport,
            endpoints,
        }
    }

    /// Exchange the authorization code from the redirect callback for tokens.
    ///
    /// Fails with `ConfigurationErrorKind::Missing` before any request is made when
    /// no app credentials are registered for Seznam.
    pub async fn exchange_code(&self, query: &AuthorizationQuery) -> Result<TokenResponse, Error> {
        let config = self
            .host
            .config
            .find_config(PROVIDER_NAME)
            .await?
            .ok_or_else(|| {
                warn!("Seznam login attempted but the service is not configured");
                configuration_error(ConfigurationErrorKind::Missing, PROVIDER_NAME)
            })?;

        let client_secret = self.host.sealer.open(&config.secret)?;
        let redirect_uri = self.host.redirect.redirect_uri_for(PROVIDER_NAME, &config)?;

        let form = [
            ("grant_type", "authorization_code"),
            ("code", query.code.as_str()),
            ("client_id", config.client_id.as_str()),
            ("client_secret", client_secret.expose_secret().as_str()),
            ("redirect_uri", redirect_uri.as_str()),
            ("state", query.state.as_str()),
        ];

        debug!("Exchanging Seznam authorization code for tokens");

        let reply = self
            .transport
            .post_form(&self.endpoints.token_url, &form)
            .await
            .map_err(|e| {
                warn!("{} {}", HANDSHAKE_FAILED, e);
                e
            })?;

        decode_reply(reply, HANDSHAKE_FAILED)
    }

    /// Fetch the profile of the user the access token was issued for.
    pub async fn fetch_identity(&self, access_token: &str) -> Result<IdentityResponse, Error> {
        debug!("Fetching Seznam identity");

        let reply = self
            .transport
            .get_json(&self.endpoints.user_url, access_token)
            .await
            .map_err(|e| {
                warn!("{} {}", IDENTITY_FAILED, e);
                e
            })?;

        decode_reply(reply, IDENTITY_FAILED)
    }

    /// Hand out the login result stored for a popup's credential token/secret pair.
    pub async fn retrieve_credential(
        &self,
        credential_token: &str,
        credential_secret: &str,
    ) -> Result<LoginResult, Error> {
        self.host
            .credentials
            .retrieve_credential(credential_token, credential_secret)
            .await
    }
}

#[async_trait]
impl LoginHandler for Provider {
    async fn handle(&self, query: AuthorizationQuery) -> Result<LoginResult, Error> {
        let tokens = self.exchange_code(&query).await?;
        let identity = self.fetch_identity(&tokens.access_token).await?;

        let access_token = self.host.sealer.seal(&tokens.access_token)?;
        let service_data = normalize(tokens, identity, access_token, Utc::now());

        info!(
            "Seznam login completed for user {} ({})",
            service_data.id, service_data.username
        );

        Ok(LoginResult::new(service_data))
    }
}

/// Build the Seznam provider and register it with `registry` as an OAuth2 provider.
///
/// Returns the bound provider so the caller can also use it directly.
pub fn register(
    registry: &dyn ProviderRegistry,
    host: HostServices,
    transport: Arc<dyn HttpTransport>,
    endpoints: Endpoints,
) -> Result<Arc<Provider>, Error> {
    let provider = Arc::new(Provider::new(host, transport, endpoints));
    registry.register_provider(
        PROVIDER_NAME,
        ProtocolVersion::OAuth2,
        None,
        provider.clone(),
    )?;
    Ok(provider)
}

/// Turns a provider reply into `T`.
///
/// A body carrying a truthy `error` field is a protocol error whatever the HTTP
/// status; any other non-2xx reply or a body of the wrong shape is an invalid
/// response.
fn decode_reply<T: DeserializeOwned>(reply: HttpReply, context: &str) -> Result<T, Error> {
    if let Some(provider_error) = reply.body.get("error").and_then(error_text) {
        warn!("{} {}", context, provider_error);
        let message = match reply.body.get("error_description").and_then(Value::as_str) {
            Some(description) => format!("{} {}: {}", context, provider_error, description),
            None => format!("{} {}", context, provider_error),
        };
        return Err(oauth_error(OAuthErrorKind::Protocol(provider_error), &message));
    }

    if !reply.is_success() {
        warn!("{} Unexpected HTTP status {}", context, reply.status);
        return Err(oauth_error(
            OAuthErrorKind::InvalidResponse,
            &format!("{} HTTP status {}", context, reply.status),
        ));
    }

    serde_json::from_value(reply.body).map_err(|e| {
        warn!("{} Unexpected reply shape: {}", context, e);
        Error {
            source: Some(Box::new(e)),
            error_kind: ErrorKind::OAuth(OAuthErrorKind::InvalidResponse),
        }
    })
}

/// The provider's error string, if the `error` value counts as set.
fn error_text(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        other => Some(other.to_string()),
    }
}
