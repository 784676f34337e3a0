//! Contracts of the host application the adapter plugs into, with in-memory
//! implementations suitable for a single-process host and for tests.

mod config_store;
mod credentials;
mod redirect;
mod registry;

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Error;
use crate::oauth::LoginResult;
use crate::secret::SecretSealer;

pub use config_store::{InMemoryConfigStore, ProviderConfig};
pub use credentials::PendingCredentials;
pub use redirect::AbsoluteUrlResolver;
pub use registry::{LoginHandler, ProtocolVersion, ProviderRegistry, RegisteredProvider, Registry};

/// Lookup of the app credentials registered for a provider.
#[async_trait]
pub trait ConfigProvider: Send + Sync {
    /// Returns `None` when the provider has not been configured.
    async fn find_config(&self, provider: &str) -> Result<Option<ProviderConfig>, Error>;
}

/// Computes the redirect URI sent to the provider during code exchange.
pub trait RedirectUriResolver: Send + Sync {
    fn redirect_uri_for(&self, provider: &str, config: &ProviderConfig) -> Result<String, Error>;
}

/// Correlates a login popup's one-time credential token/secret pair with the
/// completed login result.
#[async_trait]
pub trait CredentialRetriever: Send + Sync {
    async fn retrieve_credential(
        &self,
        credential_token: &str,
        credential_secret: &str,
    ) -> Result<LoginResult, Error>;
}

/// The host capabilities a provider adapter is built with.
#[derive(Clone)]
pub struct HostServices {
    pub config: Arc<dyn ConfigProvider>,
    pub sealer: Arc<dyn SecretSealer>,
    pub redirect: Arc<dyn RedirectUriResolver>,
    pub credentials: Arc<dyn CredentialRetriever>,
}
