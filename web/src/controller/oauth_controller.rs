//! Controller for OAuth login flows.
//!
//! The provider redirects the login popup to the callback, which completes the
//! login and parks the result under the `state` value as credential token. The
//! popup's opener then collects it once with the token/secret pair.

use crate::{AppState, Error};

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use log::*;
use serde::{Deserialize, Serialize};
use seznam_auth::host::CredentialRetriever;
use seznam_auth::oauth::AuthorizationQuery;

use super::ApiResponse;

/// Query parameters the provider redirects back with
#[derive(Debug, Deserialize)]
pub struct OAuthCallback {
    pub code: Option<String>,
    pub state: Option<String>,
    /// Set instead of `code` when the user declined or the request was invalid.
    pub error: Option<String>,
}

/// Query parameters for collecting a completed login
#[derive(Debug, Deserialize)]
pub struct CredentialRequest {
    pub token: String,
    pub secret: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingCredential {
    pub credential_token: String,
    pub credential_secret: String,
}

/// GET /_oauth/{provider}
///
/// Handles the OAuth callback from the provider after user authorization.
pub async fn callback(
    State(app_state): State<AppState>,
    Path(provider): Path<String>,
    Query(params): Query<OAuthCallback>,
) -> Result<impl IntoResponse, Error> {
    if let Some(provider_error) = params.error {
        return Err(Error::Input(format!(
            "{provider} authorization failed: {provider_error}"
        )));
    }

    let code = params
        .code
        .ok_or_else(|| Error::Input("missing code".to_string()))?;
    let state = params
        .state
        .ok_or_else(|| Error::Input("missing state".to_string()))?;

    debug!("OAuth callback for provider {provider}");

    let result = app_state
        .registry_ref()
        .handle(
            &provider,
            AuthorizationQuery {
                code,
                state: state.clone(),
            },
        )
        .await?;

    app_state.credentials.cleanup_expired();
    let credential_secret = app_state.credentials.store(&state, result)?;

    Ok(Json(ApiResponse::new(
        StatusCode::OK.into(),
        PendingCredential {
            credential_token: state,
            credential_secret,
        },
    )))
}

/// GET /oauth/credential
///
/// Hands out a completed login exactly once.
pub async fn retrieve_credential(
    State(app_state): State<AppState>,
    Query(params): Query<CredentialRequest>,
) -> Result<impl IntoResponse, Error> {
    let result = app_state
        .credentials
        .retrieve_credential(&params.token, &params.secret)
        .await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), result)))
}
