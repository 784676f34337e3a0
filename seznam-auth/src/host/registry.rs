//! Registry of login providers keyed by provider name.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use log::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{registry_error, Error, RegistryErrorKind};
use crate::oauth::{AuthorizationQuery, LoginResult};

/// OAuth protocol generation a provider speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProtocolVersion {
    OAuth1,
    OAuth2,
}

/// Completes a login from the provider's redirect callback.
#[async_trait]
pub trait LoginHandler: Send + Sync {
    async fn handle(&self, query: AuthorizationQuery) -> Result<LoginResult, Error>;
}

/// Host registry that provider adapters register themselves with.
pub trait ProviderRegistry: Send + Sync {
    /// Register `handler` under `name`. `extra` carries protocol specific data
    /// (OAuth1 endpoint URLs); OAuth2 providers pass `None`.
    fn register_provider(
        &self,
        name: &str,
        version: ProtocolVersion,
        extra: Option<Value>,
        handler: Arc<dyn LoginHandler>,
    ) -> Result<(), Error>;
}

/// A provider as stored by [`Registry`].
#[derive(Clone)]
pub struct RegisteredProvider {
    pub name: String,
    pub version: ProtocolVersion,
    pub extra: Option<Value>,
    pub handler: Arc<dyn LoginHandler>,
}

impl std::fmt::Debug for RegisteredProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisteredProvider")
            .field("name", &self.name)
            .field("version", &self.version)
            .field("extra", &self.extra)
            .finish_non_exhaustive()
    }
}

/// In-memory [`ProviderRegistry`] that also dispatches callbacks.
#[derive(Debug, Default)]
pub struct Registry {
    providers: DashMap<String, RegisteredProvider>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<RegisteredProvider> {
        self.providers.get(name).map(|entry| entry.value().clone())
    }

    /// Registered provider names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.providers.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    /// Run the login handler registered under `name`.
    pub async fn handle(&self, name: &str, query: AuthorizationQuery) -> Result<LoginResult, Error> {
        // Clone the handler out so no map guard is held across the await.
        let handler = self
            .get(name)
            .ok_or_else(|| registry_error(RegistryErrorKind::UnknownProvider, name))?
            .handler;
        handler.handle(query).await
    }
}

impl ProviderRegistry for Registry {
    fn register_provider(
        &self,
        name: &str,
        version: ProtocolVersion,
        extra: Option<Value>,
        handler: Arc<dyn LoginHandler>,
    ) -> Result<(), Error> {
        use dashmap::mapref::entry::Entry;

        match self.providers.entry(name.to_string()) {
            Entry::Occupied(_) => Err(registry_error(
                RegistryErrorKind::DuplicateProvider,
                &format!("provider {} is already registered", name),
            )),
            Entry::Vacant(entry) => {
                debug!("Registering login provider {} ({:?})", name, version);
                entry.insert(RegisteredProvider {
                    name: name.to_string(),
                    version,
                    extra,
                    handler,
                });
                Ok(())
            }
        }
    }
}
