//! `reqwest`-backed transport.
//!
//! Handles:
//! - HTTP basic authentication with the v2 API id and password
//! - Default `Accept`/`User-Agent` headers
//! - Timeout handling
//! - Redirects are never followed

use async_trait::async_trait;
use reqwest::{header, redirect, Client, RequestBuilder};
use tracing::debug;

use super::transport::{HttpMethod, HttpRequest, HttpTransport, RawResponse, RequestBody};
use crate::config::V2Config;
use crate::error::{ChargifyError, ChargifyResult};

/// Default [`HttpTransport`] built on `reqwest`.
///
/// # Example
///
/// ```ignore
/// let transport = ReqwestTransport::new(&V2Config::from_env()?)?;
/// let service = ChargifyV2::with_transport(config, Arc::new(transport));
/// ```
#[derive(Clone)]
pub struct ReqwestTransport {
    /// The underlying HTTP client
    client: Client,
    /// Basic auth user and password
    credentials: (String, String),
}

impl ReqwestTransport {
    /// Create a transport authenticated with the config's API id and password.
    pub fn new(config: &V2Config) -> ChargifyResult<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_str(&config.user_agent).map_err(|e| {
                ChargifyError::Configuration(format!("Invalid user agent: {}", e))
            })?,
        );

        let client = Client::builder()
            .timeout(config.timeout())
            .redirect(redirect::Policy::none())
            .default_headers(headers)
            .build()
            .map_err(|e| {
                ChargifyError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            credentials: (config.api_id.clone(), config.api_password.clone()),
        })
    }

    fn builder(&self, request: &HttpRequest) -> RequestBuilder {
        let mut builder = match request.method {
            HttpMethod::Get => self.client.get(&request.url),
            HttpMethod::Post => self.client.post(&request.url),
            HttpMethod::Put => self.client.put(&request.url),
            HttpMethod::Delete => self.client.delete(&request.url),
        };

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        let (user, password) = &self.credentials;
        builder = builder.basic_auth(user, Some(password));

        match &request.body {
            RequestBody::Empty => builder,
            RequestBody::Form(fields) => builder.form(fields),
            RequestBody::Raw(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(body.clone()),
        }
    }
}

/// Copy response headers, keeping values that are not valid ASCII.
fn collect_headers(headers: &header::HeaderMap) -> Vec<(String, String)> {
    headers
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect()
}

/// Map a `reqwest` failure to the client's error taxonomy.
fn map_send_error(err: reqwest::Error) -> ChargifyError {
    if err.is_timeout() {
        ChargifyError::Timeout(err.to_string())
    } else if err.is_builder() {
        ChargifyError::Configuration(err.to_string())
    } else {
        ChargifyError::Transport(err.to_string())
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> ChargifyResult<RawResponse> {
        debug!("{} {}", request.method, request.url);

        let response = self
            .builder(&request)
            .send()
            .await
            .map_err(map_send_error)?;

        let status = response.status().as_u16();
        let headers = collect_headers(response.headers());

        let body = response
            .text()
            .await
            .map_err(|e| ChargifyError::Transport(format!("Failed to read response: {}", e)))?;

        debug!(status, bytes = body.len(), "response received");

        Ok(RawResponse {
            status,
            headers,
            body,
        })
    }
}
