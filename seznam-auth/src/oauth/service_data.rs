//! The normalized record handed to the host accounts system.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::types::{IdentityResponse, TokenResponse};
use crate::secret::SealedSecret;

/// Scopes whose data Seznam returns as same-named keys on the user-info reply.
pub const KNOWN_SCOPES: [&str; 4] = ["identity", "contact-phone", "avatar", "adulthood"];

/// Service data persisted by the host for a Seznam account.
///
/// Optional fields are omitted when the provider did not send them; an omitted
/// scope-gated field means the scope was not granted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceData {
    /// Provider-stable user id, the key the host matches accounts on.
    pub id: String,
    pub username: String,
    pub domain: String,
    pub email: String,
    pub access_token: SealedSecret,
    pub token_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scopes: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adulthood: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_phone: Option<Value>,
    /// Absolute expiry of the access token in epoch milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// Remaining known-scope keys (`identity`, `contact-phone`) copied verbatim.
    #[serde(flatten)]
    pub scope_grants: BTreeMap<String, Value>,
}

/// Display profile fragment for a newly created account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginOptions {
    pub profile: Profile,
}

/// Result of a successful login, the whole contract surface toward the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResult {
    pub service_data: ServiceData,
    pub options: LoginOptions,
}

impl LoginResult {
    pub fn new(service_data: ServiceData) -> Self {
        let name = service_data.username.clone();
        Self {
            service_data,
            options: LoginOptions {
                profile: Profile { name },
            },
        }
    }
}

/// Builds the service data record from the two endpoint replies.
///
/// `access_token` is the already sealed form of `tokens.access_token`; `now` anchors
/// the absolute expiry.
pub fn normalize(
    tokens: TokenResponse,
    identity: IdentityResponse,
    access_token: SealedSecret,
    now: DateTime<Utc>,
) -> ServiceData {
    // An expiry that does not fit epoch milliseconds is treated as unknown
    let expires_in = tokens.expires_in.and_then(|seconds| {
        seconds
            .checked_mul(1000)
            .and_then(|millis| now.timestamp_millis().checked_add(millis))
    });

    let mut avatar = identity.avatar_url.clone();
    let mut adulthood = None;
    let mut scope_grants = BTreeMap::new();
    for name in KNOWN_SCOPES {
        let Some(value) = identity.field(name) else {
            continue;
        };
        match name {
            "avatar" => avatar = Some(value.clone()),
            "adulthood" => adulthood = Some(value.clone()),
            _ => {
                scope_grants.insert(name.to_string(), value.clone());
            }
        }
    }

    ServiceData {
        id: tokens.oauth_user_id,
        username: identity.username,
        domain: identity.domain,
        email: tokens.account_name,
        access_token,
        token_type: tokens.token_type,
        scopes: tokens.scopes,
        avatar,
        adulthood,
        contact_phone: identity.contact_phone,
        expires_in,
        refresh_token: tokens.refresh_token.filter(|token| !token.is_empty()),
        scope_grants,
    }
}
