//! Lookup of Direct calls.
//!
//! Every Direct submission creates a call record; its id comes back in the
//! redirect as `call_id`. Reading the call returns the submitted request and
//! the full result, including validation errors.

use serde_json::Value;
use tracing::debug;

use super::response::{ApiError, ApiResponse};
use super::ChargifyV2;
use crate::http::HttpMethod;

/// Entry point for the `calls` resource.
#[derive(Debug, Clone, Copy)]
pub struct CallApi<'a> {
    service: &'a ChargifyV2,
}

impl<'a> CallApi<'a> {
    pub(crate) fn new(service: &'a ChargifyV2) -> Self {
        Self { service }
    }

    /// GET `calls/{call_id}`.
    ///
    /// Never fails: a missing response or a 404 surfaces through
    /// [`Call::is_error`].
    pub async fn read_by_chargify_id(&self, call_id: &str) -> Call {
        let path = format!("calls/{}", call_id);
        let result = self
            .service
            .request(&path, HttpMethod::Get, None, Vec::<(String, String)>::new())
            .await;

        let response = ApiResponse::from_result(result);
        debug!(call_id, status = ?response.status, errors = response.errors.len(), "call read");

        Call::from_response(response)
    }
}

/// A Direct call record.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    data: Value,
    response: ApiResponse,
}

impl Call {
    /// Use the `call` object as data for a clean 200, the whole body otherwise.
    pub fn from_response(response: ApiResponse) -> Self {
        let data = if !response.is_error() && response.status == Some(200) {
            response.body.get("call").cloned().unwrap_or(Value::Null)
        } else {
            response.body.clone()
        };

        Self { data, response }
    }

    pub fn data(&self) -> &Value {
        &self.data
    }

    /// A top-level field of the call data.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    pub fn id(&self) -> Option<&str> {
        self.get("id").and_then(Value::as_str)
    }

    pub fn is_error(&self) -> bool {
        self.response.is_error()
    }

    pub fn errors(&self) -> &[ApiError] {
        self.response.errors()
    }

    /// HTTP status, `None` if no response was received.
    pub fn status(&self) -> Option<u16> {
        self.response.status
    }

    pub fn response(&self) -> &ApiResponse {
        &self.response
    }
}
