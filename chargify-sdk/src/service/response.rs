//! Normalized view of v2 API responses.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ChargifyResult;
use crate::http::RawResponse;

/// Statuses that the client itself reports as errors.
const ERROR_STATUSES: [u16; 3] = [401, 404, 500];

/// An error attached to a response, from the API body or from the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    /// `"client"` for errors raised by this library, absent for API errors
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub attribute: Option<String>,
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub message: String,
}

impl ApiError {
    /// Error raised by the client rather than returned by the API.
    pub fn client(kind: &str, message: impl Into<String>) -> Self {
        Self {
            source: Some("client".to_string()),
            attribute: None,
            kind: Some(kind.to_string()),
            message: message.into(),
        }
    }

    pub fn is_client_error(&self) -> bool {
        self.source.as_deref() == Some("client")
    }

    fn from_api_value(value: &Value) -> Self {
        serde_json::from_value(value.clone()).unwrap_or_else(|_| Self {
            source: None,
            attribute: None,
            kind: None,
            message: match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            },
        })
    }
}

/// Status, decoded body and collected errors of an API call.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    /// `None` when no response was received
    pub status: Option<u16>,
    /// Decoded JSON body, `Null` when empty or undecodable
    pub body: Value,
    pub errors: Vec<ApiError>,
}

impl ApiResponse {
    /// Normalize the result of [`crate::ChargifyV2::request`].
    pub fn from_result(result: ChargifyResult<RawResponse>) -> Self {
        match result {
            Ok(response) => Self::from_response(&response),
            Err(_) => Self {
                status: None,
                body: Value::Null,
                errors: vec![ApiError::client("networking", "no response")],
            },
        }
    }

    pub fn from_response(response: &RawResponse) -> Self {
        let mut errors = Vec::new();

        if ERROR_STATUSES.contains(&response.status) {
            errors.push(ApiError::client(
                "status_code",
                format!("Bad status code: {}", response.status),
            ));
        }

        let raw = response.body.trim();
        let body = if raw.is_empty() {
            Value::Null
        } else {
            match serde_json::from_str::<Value>(raw) {
                Ok(body) => body,
                Err(e) => {
                    errors.push(ApiError::client(
                        "parse",
                        format!("Failed to decode response body: {}", e),
                    ));
                    Value::Null
                }
            }
        };

        if let Some(api_errors) = body
            .get("result")
            .and_then(|result| result.get("errors"))
            .and_then(Value::as_array)
        {
            errors.extend(api_errors.iter().map(ApiError::from_api_value));
        }

        Self {
            status: Some(response.status),
            body,
            errors,
        }
    }

    pub fn is_error(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn errors(&self) -> &[ApiError] {
        &self.errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ChargifyError;
    use serde_json::json;

    #[test]
    fn test_no_response() {
        let response =
            ApiResponse::from_result(Err(ChargifyError::Transport("refused".to_string())));
        assert_eq!(response.status, None);
        assert_eq!(response.errors(), &[ApiError::client("networking", "no response")]);
    }

    #[test]
    fn test_bad_status_code() {
        let response = ApiResponse::from_response(&RawResponse::new(404));
        assert!(response.is_error());
        assert_eq!(response.errors()[0].kind.as_deref(), Some("status_code"));
        assert_eq!(response.errors()[0].message, "Bad status code: 404");
        assert_eq!(response.body, Value::Null);
    }

    #[test]
    fn test_other_statuses_are_not_client_errors() {
        let response = ApiResponse::from_response(&RawResponse::new(422).with_body("{}"));
        assert!(!response.is_error());
        assert_eq!(response.body, json!({}));
    }

    #[test]
    fn test_api_errors_are_collected() {
        let body = json!({
            "result": {
                "status_code": 422,
                "result_code": 4220,
                "errors": [
                    {"attribute": "customer.email", "message": "Email: cannot be blank."},
                    "plain message"
                ]
            }
        });
        let response =
            ApiResponse::from_response(&RawResponse::new(422).with_body(body.to_string()));

        assert_eq!(response.errors().len(), 2);
        assert_eq!(response.errors()[0].attribute.as_deref(), Some("customer.email"));
        assert!(!response.errors()[0].is_client_error());
        assert_eq!(response.errors()[1].message, "plain message");
    }

    #[test]
    fn test_undecodable_body() {
        let response = ApiResponse::from_response(&RawResponse::new(200).with_body("<html>"));
        assert_eq!(response.errors()[0].kind.as_deref(), Some("parse"));
        assert!(response.errors()[0].is_client_error());
    }
}
