//! HTTP client building and the transport seam used by the provider adapter.

mod client;
mod transport;

pub use client::{HttpClientBuilder, HttpClientConfig};
pub use transport::{HttpReply, HttpTransport, ReqwestTransport};
