//! The v2 API service client.
//!
//! [`ChargifyV2`] owns the credentials and the transport and hands out the
//! pieces built on top of them:
//!
//! - [`ChargifyV2::direct`]: a fresh Direct request for signup or card
//!   update forms
//! - [`ChargifyV2::check_auth`]: a live credential check
//! - [`ChargifyV2::call`]: lookup of Direct call records
//! - [`ChargifyV2::request`]: raw access to any v2 path
//!
//! # Example
//!
//! ```ignore
//! use chargify_sdk::{ChargifyV2, V2Config};
//!
//! let service = ChargifyV2::new(V2Config::from_env()?)?;
//! if !service.check_auth().await {
//!     eprintln!("Direct credentials rejected");
//! }
//!
//! let call = service.call().read_by_chargify_id(&call_id).await;
//! ```

mod call;
mod response;

pub use call::{Call, CallApi};
pub use response::{ApiError, ApiResponse};

use std::sync::Arc;

use rand::rngs::OsRng;
use tracing::debug;

use crate::config::V2Config;
use crate::direct::{card_update_action, signup_action, AuthProbe, DirectRequest, DirectSigner};
use crate::error::{ChargifyError, ChargifyResult};
use crate::http::{HttpMethod, HttpRequest, HttpTransport, RawResponse, RequestBody, ReqwestTransport};

/// Redirect used by [`ChargifyV2::check_auth`]; never visited.
const CHECK_AUTH_REDIRECT_URI: &str = "http://localhost";

/// Client for the Chargify v2 API.
#[derive(Clone)]
pub struct ChargifyV2 {
    config: V2Config,
    transport: Arc<dyn HttpTransport>,
}

impl ChargifyV2 {
    /// Create a client using the default `reqwest` transport.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `config` is invalid or the HTTP
    /// client cannot be built.
    pub fn new(config: V2Config) -> ChargifyResult<Self> {
        config.validate()?;
        let transport = ReqwestTransport::new(&config)?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Create a client with a custom transport.
    pub fn with_transport(config: V2Config, transport: Arc<dyn HttpTransport>) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &V2Config {
        &self.config
    }

    pub fn api_id(&self) -> &str {
        &self.config.api_id
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    pub fn transport(&self) -> Arc<dyn HttpTransport> {
        Arc::clone(&self.transport)
    }

    pub fn signer(&self) -> DirectSigner {
        self.config.signer()
    }

    /// Absolute URL of an API path.
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Send a request to `path`, relative to the base URL.
    ///
    /// Non-2xx responses are returned as `Ok`.
    ///
    /// # Errors
    ///
    /// - `PreconditionViolation` for POST or PUT without `raw_body`
    /// - `Transport` / `Timeout` when no response was received
    pub async fn request<I, K, V>(
        &self,
        path: &str,
        method: HttpMethod,
        raw_body: Option<String>,
        params: I,
    ) -> ChargifyResult<RawResponse>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        if method.requires_body() && raw_body.is_none() {
            return Err(ChargifyError::PreconditionViolation(
                "You must send raw data in a POST or PUT request".to_string(),
            ));
        }

        let mut request = HttpRequest::new(method, self.url(path)).with_query(params);
        if let Some(body) = raw_body.filter(|b| !b.is_empty()) {
            request = request.with_body(RequestBody::Raw(body));
        }

        debug!(method = %method, path, "sending API request");
        self.transport.send(request).await
    }

    /// A new Direct request stamped with the current time and an OS nonce.
    pub fn direct(&self) -> DirectRequest {
        DirectRequest::new(self.signer(), &mut OsRng)
    }

    /// Form action for Direct signups.
    pub fn signup_action(&self) -> String {
        signup_action(&self.config.base_url)
    }

    /// Form action for Direct card updates.
    pub fn card_update_action(&self, subscription_id: impl std::fmt::Display) -> String {
        card_update_action(&self.config.base_url, subscription_id)
    }

    /// An auth probe pointed at the signup action.
    pub fn auth_probe(&self) -> AuthProbe {
        AuthProbe::new(self.transport(), self.signup_action())
    }

    /// Check the Direct credentials against the live signup endpoint.
    ///
    /// Returns `false` on rejection and when no response is received.
    pub async fn check_auth(&self) -> bool {
        let mut direct = self.direct();
        if let Err(e) = direct.set_redirect_uri(CHECK_AUTH_REDIRECT_URI) {
            debug!(error = %e, "could not prepare auth check");
            return false;
        }
        self.auth_probe().test(&mut direct).await
    }

    /// Access to Direct call records.
    pub fn call(&self) -> CallApi<'_> {
        CallApi::new(self)
    }
}

impl std::fmt::Debug for ChargifyV2 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChargifyV2")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::testing::FixtureTransport;
    use serde_json::json;

    fn config() -> V2Config {
        V2Config::new("abc", "password", "secret").with_base_url("https://example.test/api/v2/")
    }

    fn service(answer: ChargifyResult<RawResponse>) -> (ChargifyV2, Arc<FixtureTransport>) {
        let transport = FixtureTransport::new(answer);
        (ChargifyV2::with_transport(config(), transport.clone()), transport)
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let err = ChargifyV2::new(V2Config::new("", "password", "secret")).unwrap_err();
        assert!(matches!(err, ChargifyError::Configuration(_)));
    }

    #[test]
    fn test_url_joining() {
        let (service, _) = service(Ok(RawResponse::new(200)));
        assert_eq!(service.url("/calls/1"), "https://example.test/api/v2/calls/1");
        assert_eq!(service.url("calls/1"), "https://example.test/api/v2/calls/1");
        assert_eq!(service.signup_action(), "https://example.test/api/v2/signups");
        assert_eq!(
            service.card_update_action(42),
            "https://example.test/api/v2/subscriptions/42/card_update"
        );
    }

    #[tokio::test]
    async fn test_post_without_body_fails() {
        let (service, transport) = service(Ok(RawResponse::new(200)));
        let err = service
            .request("calls", HttpMethod::Post, None, Vec::<(String, String)>::new())
            .await
            .unwrap_err();

        assert!(err.is_precondition_violation());
        assert!(transport.sent().is_empty());
    }

    #[tokio::test]
    async fn test_request_passes_query_and_body() {
        let (service, transport) = service(Ok(RawResponse::new(201)));
        let response = service
            .request("/things", HttpMethod::Put, Some("{}".to_string()), [("page", "2")])
            .await
            .unwrap();

        assert_eq!(response.status, 201);
        let sent = transport.sent();
        assert_eq!(sent[0].method, HttpMethod::Put);
        assert_eq!(sent[0].url, "https://example.test/api/v2/things");
        assert_eq!(sent[0].query, vec![("page".to_string(), "2".to_string())]);
        assert_eq!(sent[0].body, RequestBody::Raw("{}".to_string()));
    }

    #[tokio::test]
    async fn test_non_success_status_is_ok() {
        let (service, _) = service(Ok(RawResponse::new(500)));
        let response = service
            .request("calls/1", HttpMethod::Get, None, Vec::<(String, String)>::new())
            .await
            .unwrap();
        assert_eq!(response.status, 500);
    }

    #[test]
    fn test_direct_uses_service_credentials() {
        let (service, _) = service(Ok(RawResponse::new(200)));
        let direct = service.direct();
        assert_eq!(direct.api_id(), "abc");
        assert_eq!(direct.nonce().len(), 40);
        assert!(!direct.is_signed());
    }

    #[tokio::test]
    async fn test_check_auth_accepts_redirect() {
        let (service, transport) = service(Ok(
            RawResponse::new(302).with_header("Location", "http://localhost?call_id=1")
        ));
        assert!(service.check_auth().await);

        let sent = transport.sent();
        assert_eq!(sent[0].url, "https://example.test/api/v2/signups");
        match &sent[0].body {
            RequestBody::Form(fields) => {
                assert_eq!(fields[3].1, "redirect_uri=http%3A%2F%2Flocalhost")
            }
            other => panic!("expected form body, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_check_auth_rejects_incorrect_signature() {
        let (service, _) = service(Ok(RawResponse::new(200).with_body("Incorrect signature")));
        assert!(!service.check_auth().await);
    }

    #[tokio::test]
    async fn test_check_auth_without_response_is_false() {
        let (service, _) = service(Err(ChargifyError::Timeout("slow".to_string())));
        assert!(!service.check_auth().await);
    }

    #[tokio::test]
    async fn test_read_call() {
        let body = json!({"call": {"id": "call-1", "success": true}});
        let (service, transport) =
            service(Ok(RawResponse::new(200).with_body(body.to_string())));

        let call = service.call().read_by_chargify_id("call-1").await;
        assert!(!call.is_error());
        assert_eq!(call.id(), Some("call-1"));
        assert_eq!(call.get("success"), Some(&json!(true)));
        assert_eq!(transport.sent()[0].url, "https://example.test/api/v2/calls/call-1");
    }

    #[tokio::test]
    async fn test_read_call_without_response() {
        let (service, _) = service(Err(ChargifyError::Transport("refused".to_string())));
        let call = service.call().read_by_chargify_id("call-1").await;

        assert!(call.is_error());
        assert_eq!(call.status(), None);
        assert_eq!(call.errors()[0].kind.as_deref(), Some("networking"));
    }
}
