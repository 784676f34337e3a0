use crate::AppState;
use axum::{routing::get, Router};

use crate::controller::{health_check_controller, oauth_controller};

pub fn define_routes(app_state: AppState) -> Router {
    Router::new()
        .merge(health_routes())
        .merge(oauth_routes(app_state))
}

fn health_routes() -> Router {
    Router::new().route("/health", get(health_check_controller::health_check))
}

fn oauth_routes(app_state: AppState) -> Router {
    Router::new()
        // The provider redirects the login popup here after user authorization
        .route("/_oauth/{provider}", get(oauth_controller::callback))
        .route(
            "/oauth/credential",
            get(oauth_controller::retrieve_credential),
        )
        .with_state(app_state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        response::Response,
    };
    use clap::Parser;
    use service::config::Config;
    use tower::ServiceExt;

    fn test_app() -> Router {
        // Nothing listens on port 9, so any outbound call fails fast
        let config = Config::try_parse_from(["seznam_login"])
            .unwrap()
            .set_seznam_endpoints(
                "http://127.0.0.1:9/token".to_string(),
                "http://127.0.0.1:9/user".to_string(),
            );
        let app_state = service::init_login(&config).unwrap();
        define_routes(app_state)
    }

    async fn get_status(app: Router, uri: &str) -> StatusCode {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let response: Response = app.oneshot(request).await.unwrap();
        response.status()
    }

    #[tokio::test]
    async fn test_health_check_is_ok() {
        assert_eq!(get_status(test_app(), "/health").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_callback_for_unknown_provider_is_not_found() {
        assert_eq!(
            get_status(test_app(), "/_oauth/github?code=abc&state=xyz").await,
            StatusCode::NOT_FOUND
        );
    }

    #[tokio::test]
    async fn test_callback_without_client_credentials_is_service_unavailable() {
        assert_eq!(
            get_status(test_app(), "/_oauth/seznam?code=abc&state=xyz").await,
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[tokio::test]
    async fn test_callback_with_provider_error_is_bad_request() {
        assert_eq!(
            get_status(test_app(), "/_oauth/seznam?error=access_denied&state=xyz").await,
            StatusCode::BAD_REQUEST
        );
    }

    #[tokio::test]
    async fn test_callback_without_code_is_bad_request() {
        assert_eq!(
            get_status(test_app(), "/_oauth/seznam?state=xyz").await,
            StatusCode::BAD_REQUEST
        );
    }

    #[tokio::test]
    async fn test_unknown_credential_is_not_found() {
        assert_eq!(
            get_status(test_app(), "/oauth/credential?token=nope&secret=nope").await,
            StatusCode::NOT_FOUND
        );
    }
}
