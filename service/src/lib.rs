use config::Config;
use log::{info, warn};
use seznam_auth::host::{
    AbsoluteUrlResolver, HostServices, InMemoryConfigStore, PendingCredentials, ProviderConfig,
    Registry,
};
use seznam_auth::http::{HttpClientConfig, ReqwestTransport};
use seznam_auth::oauth::{self, Endpoints, PROVIDER_NAME};
use seznam_auth::secret::{AesGcmSealer, PlaintextSealer, SecretSealer};
use std::sync::Arc;
use std::time::Duration;

pub mod config;
pub mod logging;

/// Builds the login providers and host services from configuration and
/// registers the Seznam provider.
pub fn init_login(config: &Config) -> Result<AppState, seznam_auth::Error> {
    let sealer: Arc<dyn SecretSealer> = match config.secret_encryption_key() {
        Some(key) => Arc::new(AesGcmSealer::new(&key)?),
        None => {
            warn!("SECRET_ENCRYPTION_KEY is not set, secrets will be stored unsealed");
            Arc::new(PlaintextSealer)
        }
    };

    let config_store = InMemoryConfigStore::new();
    match (config.seznam_client_id(), config.seznam_client_secret()) {
        (Some(client_id), Some(client_secret)) => config_store.upsert(
            PROVIDER_NAME,
            ProviderConfig {
                client_id,
                secret: sealer.seal(&client_secret)?,
                redirect_uri: config.seznam_redirect_uri(),
            },
        ),
        _ => warn!("Seznam client credentials are not set, Seznam logins will be rejected"),
    }

    let credentials = Arc::new(PendingCredentials::with_ttl(chrono::Duration::seconds(
        config.credential_ttl_secs,
    )));

    let host = HostServices {
        config: Arc::new(config_store),
        sealer,
        redirect: Arc::new(AbsoluteUrlResolver::new(config.root_url())?),
        credentials: credentials.clone(),
    };

    let transport = Arc::new(ReqwestTransport::from_config(HttpClientConfig {
        timeout: Duration::from_secs(config.http_timeout_secs),
        ..HttpClientConfig::default()
    })?);

    let registry = Arc::new(Registry::new());
    oauth::register(
        registry.as_ref(),
        host,
        transport,
        Endpoints {
            token_url: config.seznam_token_url().to_string(),
            user_url: config.seznam_user_url().to_string(),
        },
    )?;

    info!("Login providers registered: {}", registry.names().join(", "));

    Ok(AppState::new(config.clone(), registry, credentials))
}

// Service-level state containing only infrastructure concerns
// Needs to implement Clone to be able to be passed into Router as State
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub registry: Arc<Registry>,
    pub credentials: Arc<PendingCredentials>,
}

impl AppState {
    pub fn new(
        app_config: Config,
        registry: Arc<Registry>,
        credentials: Arc<PendingCredentials>,
    ) -> Self {
        Self {
            config: app_config,
            registry,
            credentials,
        }
    }

    pub fn registry_ref(&self) -> &Registry {
        self.registry.as_ref()
    }
}
