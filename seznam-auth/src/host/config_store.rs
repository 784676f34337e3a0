//! Per-provider app credentials.

use async_trait::async_trait;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use super::ConfigProvider;
use crate::error::Error;
use crate::secret::SealedSecret;

/// App credentials registered with a provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderConfig {
    pub client_id: String,
    /// Client secret as stored by the host, opened only for the token request.
    pub secret: SealedSecret,
    /// Explicit redirect URI. When absent the host derives one from the provider name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect_uri: Option<String>,
}

/// Config store held in memory, keyed by provider name.
#[derive(Debug, Default)]
pub struct InMemoryConfigStore {
    configs: DashMap<String, ProviderConfig>,
}

impl InMemoryConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the configuration of a provider.
    pub fn upsert(&self, provider: &str, config: ProviderConfig) {
        self.configs.insert(provider.to_string(), config);
    }

    pub fn remove(&self, provider: &str) -> Option<ProviderConfig> {
        self.configs.remove(provider).map(|(_, config)| config)
    }
}

#[async_trait]
impl ConfigProvider for InMemoryConfigStore {
    async fn find_config(&self, provider: &str) -> Result<Option<ProviderConfig>, Error> {
        Ok(self.configs.get(provider).map(|entry| entry.value().clone()))
    }
}
