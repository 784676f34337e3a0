//! # seznam-auth
//!
//! "Log in with Seznam" for a host application's accounts system:
//! - OAuth 2.0 authorization-code exchange against login.szn.cz
//! - Identity fetch and normalization into a service data record
//! - Host contracts (provider registry, config store, secret sealing,
//!   redirect URIs, credential retrieval) with in-memory implementations
//! - HTTP client building with an explicit request timeout
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use seznam_auth::{
//!     host::{HostServices, Registry},
//!     http::{HttpClientConfig, ReqwestTransport},
//!     oauth::{self, AuthorizationQuery, Endpoints},
//! };
//!
//! let registry = Registry::new();
//! let transport = Arc::new(ReqwestTransport::from_config(HttpClientConfig::default())?);
//! oauth::register(&registry, host_services, transport, Endpoints::default())?;
//!
//! let result = registry.handle(oauth::PROVIDER_NAME, query).await?;
//! ```

pub mod error;
pub mod host;
pub mod http;
pub mod oauth;
pub mod secret;

// Re-export commonly used types
pub use error::{Error, ErrorKind};
