//! Error types for the `seznam-auth` crate.
//!
//! Follows the same pattern as the rest of the workspace: a root `Error` struct
//! holding an error kind tree and an optional source for error chaining.

use std::error::Error as StdError;
use std::fmt;

/// Top-level error type for seznam-auth crate.
/// Holds error kind and optional source for error chaining.
#[derive(Debug)]
pub struct Error {
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    pub error_kind: ErrorKind,
}

/// Major categories of errors in seznam-auth.
#[derive(Debug, PartialEq)]
pub enum ErrorKind {
    Configuration(ConfigurationErrorKind),
    OAuth(OAuthErrorKind),
    Secret(SecretErrorKind),
    Credential(CredentialErrorKind),
    Registry(RegistryErrorKind),
    Http(HttpErrorKind),
}

/// Errors from looking up the registered app credentials of a provider.
#[derive(Debug, PartialEq)]
pub enum ConfigurationErrorKind {
    /// No configuration is registered for the provider.
    Missing,
    /// A redirect URI could not be derived from the configuration.
    InvalidRedirectUri,
}

/// Errors from talking to the OAuth provider.
#[derive(Debug, PartialEq)]
pub enum OAuthErrorKind {
    /// DNS, TLS or connection failure reaching the provider.
    Transport,
    /// The provider answered with a JSON body carrying an `error` field.
    Protocol(String),
    /// The provider answered with something that is not the expected JSON shape.
    InvalidResponse,
}

/// Errors from sealing and opening secrets.
#[derive(Debug, PartialEq)]
pub enum SecretErrorKind {
    SealFailed,
    OpenFailed,
}

/// Errors from retrieving a pending login credential.
#[derive(Debug, PartialEq)]
pub enum CredentialErrorKind {
    NotFound,
    Expired,
    SecretMismatch,
}

/// Errors from the provider registry.
#[derive(Debug, PartialEq)]
pub enum RegistryErrorKind {
    DuplicateProvider,
    UnknownProvider,
}

/// Errors from HTTP client operations.
#[derive(Debug, PartialEq)]
pub enum HttpErrorKind {
    BuilderFailed,
    RequestFailed,
    Network,
}

impl Error {
    /// Returns true when restarting the login flow may succeed without any change
    /// on the user's side (the provider was unreachable).
    pub fn is_retriable(&self) -> bool {
        matches!(
            self.error_kind,
            ErrorKind::OAuth(OAuthErrorKind::Transport)
                | ErrorKind::Http(HttpErrorKind::Network)
        )
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.error_kind {
            ErrorKind::Configuration(ConfigurationErrorKind::Missing) => {
                write!(f, "Service not configured")?
            }
            ErrorKind::Configuration(kind) => write!(f, "Configuration error: {:?}", kind)?,
            ErrorKind::OAuth(OAuthErrorKind::Protocol(provider_error)) => {
                write!(f, "OAuth protocol error: {}", provider_error)?
            }
            ErrorKind::OAuth(kind) => write!(f, "OAuth error: {:?}", kind)?,
            ErrorKind::Secret(kind) => write!(f, "Secret error: {:?}", kind)?,
            ErrorKind::Credential(kind) => write!(f, "Credential error: {:?}", kind)?,
            ErrorKind::Registry(kind) => write!(f, "Registry error: {:?}", kind)?,
            ErrorKind::Http(kind) => write!(f, "HTTP error: {:?}", kind)?,
        }
        if let Some(source) = &self.source {
            write!(f, " ({})", source)?;
        }
        Ok(())
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        let error_kind = if err.is_builder() {
            ErrorKind::Http(HttpErrorKind::BuilderFailed)
        } else if err.is_request() {
            ErrorKind::Http(HttpErrorKind::RequestFailed)
        } else {
            ErrorKind::Http(HttpErrorKind::Network)
        };

        Error {
            source: Some(Box::new(err)),
            error_kind,
        }
    }
}

/// Helper function to create configuration errors.
pub fn configuration_error(kind: ConfigurationErrorKind, message: &str) -> Error {
    Error {
        source: Some(message.to_string().into()),
        error_kind: ErrorKind::Configuration(kind),
    }
}

/// Helper function to create OAuth errors.
pub fn oauth_error(kind: OAuthErrorKind, message: &str) -> Error {
    Error {
        source: Some(message.to_string().into()),
        error_kind: ErrorKind::OAuth(kind),
    }
}

/// Wraps an underlying transport failure (connection, TLS, DNS, timeout).
pub fn transport_error<E>(err: E) -> Error
where
    E: StdError + Send + Sync + 'static,
{
    Error {
        source: Some(Box::new(err)),
        error_kind: ErrorKind::OAuth(OAuthErrorKind::Transport),
    }
}

/// Helper function to create secret errors.
pub fn secret_error(kind: SecretErrorKind, message: &str) -> Error {
    Error {
        source: Some(message.to_string().into()),
        error_kind: ErrorKind::Secret(kind),
    }
}

/// Helper function to create credential errors.
pub fn credential_error(kind: CredentialErrorKind, message: &str) -> Error {
    Error {
        source: Some(message.to_string().into()),
        error_kind: ErrorKind::Credential(kind),
    }
}

/// Helper function to create registry errors.
pub fn registry_error(kind: RegistryErrorKind, message: &str) -> Error {
    Error {
        source: Some(message.to_string().into()),
        error_kind: ErrorKind::Registry(kind),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protocol_error_display_contains_provider_message() {
        let err = oauth_error(
            OAuthErrorKind::Protocol("invalid_grant".to_string()),
            "Failed to complete OAuth handshake with Seznam",
        );
        assert!(err.to_string().contains("invalid_grant"));
    }

    #[test]
    fn test_missing_configuration_display() {
        let err = configuration_error(ConfigurationErrorKind::Missing, "seznam");
        assert_eq!(err.to_string(), "Service not configured (seznam)");
    }

    #[test]
    fn test_only_transport_errors_are_retriable() {
        let transport = Error {
            source: None,
            error_kind: ErrorKind::OAuth(OAuthErrorKind::Transport),
        };
        assert!(transport.is_retriable());

        let protocol = oauth_error(OAuthErrorKind::Protocol("invalid_grant".into()), "");
        assert!(!protocol.is_retriable());

        let missing = configuration_error(ConfigurationErrorKind::Missing, "");
        assert!(!missing.is_retriable());
    }

    #[test]
    fn test_source_is_chained() {
        let err = credential_error(CredentialErrorKind::NotFound, "token abc");
        let source = StdError::source(&err).expect("source should be set");
        assert_eq!(source.to_string(), "token abc");
    }
}
