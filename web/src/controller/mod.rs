use serde::Serialize;
pub(crate) mod health_check_controller;
pub(crate) mod oauth_controller;

#[derive(Debug, Serialize)]
struct ApiResponse<T: Serialize> {
    status_code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(status_code: u16, data: T) -> Self {
        Self {
            status_code,
            data: Some(data),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::oauth_controller::PendingCredential;
    use super::*;
    use axum::http::StatusCode;
    use serde_json::json;

    #[test]
    fn test_pending_credential_response_shape() {
        let response = ApiResponse::new(
            StatusCode::OK.into(),
            PendingCredential {
                credential_token: "xyz".to_string(),
                credential_secret: "0f".repeat(32),
            },
        );

        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({
                "status_code": 200,
                "data": {
                    "credentialToken": "xyz",
                    "credentialSecret": "0f".repeat(32)
                }
            })
        );
    }

    #[test]
    fn test_response_without_data_omits_the_key() {
        let response = ApiResponse::<PendingCredential> {
            status_code: StatusCode::NO_CONTENT.into(),
            data: None,
        };
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({ "status_code": 204 })
        );
    }
}
