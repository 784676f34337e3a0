//! Transport seam between the provider adapter and the network.

use async_trait::async_trait;
use log::*;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde_json::Value;

use super::{HttpClientBuilder, HttpClientConfig};
use crate::error::{oauth_error, transport_error, Error, OAuthErrorKind};

/// A decoded JSON reply, whatever its HTTP status.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpReply {
    pub status: u16,
    pub body: Value,
}

impl HttpReply {
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Outbound HTTP operations the adapter needs.
///
/// Implementations report connection level failures as
/// `OAuthErrorKind::Transport` and bodies that are not JSON as
/// `OAuthErrorKind::InvalidResponse`.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// POST an `application/x-www-form-urlencoded` body and decode the JSON reply.
    async fn post_form(&self, url: &str, form: &[(&str, &str)]) -> Result<HttpReply, Error>;

    /// GET a JSON resource with `Authorization: bearer <token>`.
    async fn get_json(&self, url: &str, bearer_token: &str) -> Result<HttpReply, Error>;
}

/// [`HttpTransport`] backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Build a transport with its own client from the given configuration.
    pub fn from_config(config: HttpClientConfig) -> Result<Self, Error> {
        Ok(Self::new(HttpClientBuilder::with_config(config).build()?))
    }

    async fn read_reply(response: reqwest::Response) -> Result<HttpReply, Error> {
        let status = response.status().as_u16();
        let bytes = response.bytes().await.map_err(transport_error)?;

        let body = serde_json::from_slice(&bytes).map_err(|e| {
            warn!("Non-JSON reply with HTTP status {}: {:?}", status, e);
            oauth_error(
                OAuthErrorKind::InvalidResponse,
                &format!("HTTP {} reply is not JSON", status),
            )
        })?;

        Ok(HttpReply::new(status, body))
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn post_form(&self, url: &str, form: &[(&str, &str)]) -> Result<HttpReply, Error> {
        let response = self
            .client
            .post(url)
            .header(ACCEPT, "application/json")
            .form(form)
            .send()
            .await
            .map_err(transport_error)?;

        Self::read_reply(response).await
    }

    async fn get_json(&self, url: &str, bearer_token: &str) -> Result<HttpReply, Error> {
        let response = self
            .client
            .get(url)
            .header(AUTHORIZATION, format!("bearer {}", bearer_token))
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(transport_error)?;

        Self::read_reply(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use mockito::{Matcher, Server};
    use serde_json::json;

    fn transport() -> ReqwestTransport {
        ReqwestTransport::from_config(HttpClientConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn test_post_form_sends_urlencoded_body() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/token")
            .match_header("content-type", "application/x-www-form-urlencoded")
            .match_header("accept", "application/json")
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded("grant_type".into(), "authorization_code".into()),
                Matcher::UrlEncoded("code".into(), "a b&c".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"ok":true}"#)
            .create_async()
            .await;

        let reply = transport()
            .post_form(
                &format!("{}/token", server.url()),
                &[("grant_type", "authorization_code"), ("code", "a b&c")],
            )
            .await
            .unwrap();

        mock.assert_async().await;
        assert!(reply.is_success());
        assert_eq!(reply.body, json!({ "ok": true }));
    }

    #[tokio::test]
    async fn test_get_json_sends_lowercase_bearer() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/user")
            .match_header("authorization", "bearer tok")
            .match_header("accept", "application/json")
            .with_status(200)
            .with_body(r#"{"username":"bob"}"#)
            .create_async()
            .await;

        let reply = transport()
            .get_json(&format!("{}/user", server.url()), "tok")
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(reply.body["username"], json!("bob"));
    }

    #[tokio::test]
    async fn test_error_status_keeps_json_body() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/token")
            .with_status(400)
            .with_body(r#"{"error":"invalid_grant"}"#)
            .create_async()
            .await;

        let reply = transport()
            .post_form(&format!("{}/token", server.url()), &[])
            .await
            .unwrap();

        assert_eq!(reply.status, 400);
        assert!(!reply.is_success());
        assert_eq!(reply.body["error"], json!("invalid_grant"));
    }

    #[tokio::test]
    async fn test_non_json_body_is_invalid_response() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/user")
            .with_status(502)
            .with_body("<html>Bad Gateway</html>")
            .create_async()
            .await;

        let result = transport()
            .get_json(&format!("{}/user", server.url()), "tok")
            .await;

        assert!(matches!(
            result,
            Err(Error {
                error_kind: ErrorKind::OAuth(OAuthErrorKind::InvalidResponse),
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_error() {
        // Port 9 (discard) on localhost is expected to refuse connections.
        let result = transport().get_json("http://127.0.0.1:9/user", "tok").await;

        let err = result.unwrap_err();
        assert_eq!(err.error_kind, ErrorKind::OAuth(OAuthErrorKind::Transport));
        assert!(err.is_retriable());
    }
}
