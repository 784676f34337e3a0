use std::error::Error as StdError;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use seznam_auth::error::{
    ConfigurationErrorKind, CredentialErrorKind, Error as AuthError, ErrorKind, OAuthErrorKind,
    RegistryErrorKind,
};

use log::*;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    Auth(AuthError),
    Input(String),
}

impl StdError for Error {}

impl std::fmt::Display for Error {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> core::result::Result<(), std::fmt::Error> {
        match self {
            Error::Auth(err) => write!(fmt, "{err}"),
            Error::Input(message) => write!(fmt, "Invalid input: {message}"),
        }
    }
}

impl Error {
    fn status_and_message(&self) -> (StatusCode, String) {
        let Error::Auth(err) = self else {
            return (StatusCode::BAD_REQUEST, self.to_string());
        };

        match &err.error_kind {
            ErrorKind::Configuration(ConfigurationErrorKind::Missing) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "provider not configured".to_string(),
            ),
            ErrorKind::OAuth(OAuthErrorKind::Transport) | ErrorKind::Http(_) => {
                (StatusCode::BAD_GATEWAY, "provider unreachable".to_string())
            }
            ErrorKind::OAuth(OAuthErrorKind::Protocol(provider_error)) => {
                (StatusCode::BAD_REQUEST, provider_error.clone())
            }
            ErrorKind::OAuth(OAuthErrorKind::InvalidResponse) => (
                StatusCode::BAD_GATEWAY,
                "invalid response from provider".to_string(),
            ),
            ErrorKind::Credential(CredentialErrorKind::NotFound)
            | ErrorKind::Credential(CredentialErrorKind::Expired) => {
                (StatusCode::NOT_FOUND, "NOT FOUND".to_string())
            }
            ErrorKind::Credential(CredentialErrorKind::SecretMismatch) => {
                (StatusCode::FORBIDDEN, "FORBIDDEN".to_string())
            }
            ErrorKind::Registry(RegistryErrorKind::UnknownProvider) => {
                (StatusCode::NOT_FOUND, "unknown login provider".to_string())
            }
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL SERVER ERROR".to_string(),
            ),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        if status.is_server_error() {
            error!("Login request failed: {self}");
        } else {
            warn!("Login request rejected: {self}");
        }
        (status, message).into_response()
    }
}

impl From<AuthError> for Error {
    fn from(err: AuthError) -> Self {
        Error::Auth(err)
    }
}
