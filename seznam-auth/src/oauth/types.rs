//! Wire types of the Seznam OAuth endpoints.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Parameters of the OAuth redirect callback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationQuery {
    /// Single-use authorization grant.
    pub code: String,
    /// CSRF-binding token echoed back by the provider.
    pub state: String,
}

/// Reply of the token endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    /// Lifetime of the access token in seconds. Seznam may send it as a string.
    #[serde(default, deserialize_with = "lenient_seconds")]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default, deserialize_with = "scope_list")]
    pub scopes: Option<Vec<String>>,
    #[serde(deserialize_with = "string_or_number")]
    pub oauth_user_id: String,
    pub account_name: String,
}

/// Reply of the user-info endpoint.
///
/// Everything besides the always-present profile fields is kept in `fields`, so
/// scope-gated values can be told apart from values that were never sent.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct IdentityResponse {
    pub username: String,
    pub domain: String,
    #[serde(default)]
    pub avatar_url: Option<Value>,
    #[serde(default)]
    pub contact_phone: Option<Value>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl IdentityResponse {
    /// Raw value of a key sent by the provider, if the key is present at all.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }
}

fn lenient_seconds<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => match n.as_i64() {
            Some(seconds) => Ok(Some(seconds)),
            // Whole floats only; `as` would saturate anything beyond i64
            None => n
                .as_f64()
                .filter(|f| {
                    f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64
                })
                .map(|f| Some(f as i64))
                .ok_or_else(|| de::Error::custom(format!("expires_in out of range: {}", n))),
        },
        Some(Value::String(s)) => s.trim().parse::<i64>().map(Some).map_err(de::Error::custom),
        Some(other) => Err(de::Error::custom(format!(
            "expires_in must be a number, got {}",
            other
        ))),
    }
}

fn scope_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scopes {
        List(Vec<String>),
        Joined(String),
    }

    Ok(
        Option::<Scopes>::deserialize(deserializer)?.map(|scopes| match scopes {
            Scopes::List(list) => list,
            Scopes::Joined(joined) => joined
                .split(|c: char| c == ' ' || c == ',')
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        }),
    )
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(de::Error::custom(format!(
            "expected a string or number, got {}",
            other
        ))),
    }
}
