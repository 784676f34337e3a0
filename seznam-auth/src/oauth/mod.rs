//! OAuth 2.0 login against Seznam.

mod seznam;
mod service_data;
mod types;

pub use seznam::{register, Endpoints, Provider, PROVIDER_NAME, TOKEN_URL, USER_URL};
pub use service_data::{normalize, LoginOptions, LoginResult, Profile, ServiceData, KNOWN_SCOPES};
pub use types::{AuthorizationQuery, IdentityResponse, TokenResponse};
