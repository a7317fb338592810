//! Direct request construction.
//!
//! A Direct request moves through two states:
//!
//! ```text
//! DraftRequest --sign()--> SignedRequest
//!  (data and redirect       (signature cached,
//!   are mutable)             payload frozen)
//! ```
//!
//! The signature covers `secure[data]`, so nothing that feeds `secure[data]`
//! may change once it has been computed. [`DraftRequest`] and
//! [`SignedRequest`] enforce this through ownership; [`DirectRequest`] wraps
//! both for callers that want lazy signing and get a
//! [`ChargifyError::PreconditionViolation`] on late mutation instead.

use chrono::Utc;
use rand::{CryptoRng, RngCore};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use super::callback::RedirectCallback;
use super::encoder::{encode, value_kind, Separator};
use super::nonce::generate_nonce;
use super::signer::{DirectSigner, ResponseSignatureInputs};
use crate::error::{ChargifyError, ChargifyResult};

/// Key under which the redirect URI is merged into `secure[data]`.
pub const REDIRECT_URI_KEY: &str = "redirect_uri";

/// Wire names of the five secure fields.
pub mod fields {
    pub const API_ID: &str = "secure[api_id]";
    pub const TIMESTAMP: &str = "secure[timestamp]";
    pub const NONCE: &str = "secure[nonce]";
    pub const DATA: &str = "secure[data]";
    pub const SIGNATURE: &str = "secure[signature]";
}

/// Credentials, timestamp and nonce of one outbound request.
///
/// Timestamp and nonce are fixed when the context is created.
#[derive(Debug, Clone)]
pub struct SigningContext {
    signer: DirectSigner,
    timestamp: i64,
    nonce: String,
}

impl SigningContext {
    /// Create a context stamped with the current time and a fresh nonce.
    pub fn new<R>(signer: DirectSigner, rng: &mut R) -> Self
    where
        R: RngCore + CryptoRng + ?Sized,
    {
        Self::with_parts(signer, Utc::now().timestamp(), generate_nonce(rng))
    }

    /// Create a context with an explicit timestamp and nonce.
    pub fn with_parts(signer: DirectSigner, timestamp: i64, nonce: impl Into<String>) -> Self {
        Self {
            signer,
            timestamp,
            nonce: nonce.into(),
        }
    }

    pub fn api_id(&self) -> &str {
        self.signer.api_id()
    }

    /// Unix timestamp in seconds.
    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn nonce(&self) -> &str {
        &self.nonce
    }

    pub fn signer(&self) -> &DirectSigner {
        &self.signer
    }

    /// Expected signature of a redirect carrying `inputs`.
    pub fn response_signature(&self, inputs: &ResponseSignatureInputs) -> String {
        self.signer.response_signature(inputs)
    }

    /// Check a redirect signature.
    pub fn is_valid_response_signature(
        &self,
        candidate: &str,
        inputs: &ResponseSignatureInputs,
    ) -> bool {
        self.signer.is_valid_response_signature(candidate, inputs)
    }

    /// Check the signature of a parsed redirect callback.
    pub fn is_valid_callback(&self, callback: &RedirectCallback) -> bool {
        self.is_valid_response_signature(&callback.signature, &callback.inputs)
    }
}

/// A Direct request whose payload can still change.
#[derive(Debug, Clone)]
pub struct DraftRequest {
    context: SigningContext,
    data: Map<String, Value>,
    redirect_uri: Option<String>,
}

impl DraftRequest {
    pub fn new(context: SigningContext) -> Self {
        Self {
            context,
            data: Map::new(),
            redirect_uri: None,
        }
    }

    /// Replace the tamper-proof data sent as `secure[data]`.
    ///
    /// Any `Serialize` value that serializes to a mapping is accepted; the
    /// mapping's field order is the order used for signing.
    ///
    /// # Errors
    ///
    /// Returns an encoding error if `data` fails to serialize or is not a
    /// mapping.
    pub fn set_data<T>(&mut self, data: &T) -> ChargifyResult<()>
    where
        T: Serialize + ?Sized,
    {
        let value = serde_json::to_value(data)
            .map_err(|e| ChargifyError::Encoding(format!("Failed to serialize data: {}", e)))?;

        match value {
            Value::Object(map) => {
                self.data = map;
                Ok(())
            }
            other => Err(ChargifyError::Encoding(format!(
                "secure data must be a mapping, got {}",
                value_kind(&other)
            ))),
        }
    }

    /// Set the URI the remote service redirects to after submission.
    pub fn set_redirect_uri(&mut self, redirect_uri: impl Into<String>) {
        self.redirect_uri = Some(redirect_uri.into());
    }

    pub fn redirect_uri(&self) -> Option<&str> {
        self.redirect_uri.as_deref()
    }

    pub fn context(&self) -> &SigningContext {
        &self.context
    }

    /// The data that will be signed, with the redirect URI merged in.
    pub fn data(&self) -> Map<String, Value> {
        let mut data = self.data.clone();
        if let Some(redirect_uri) = self.redirect_uri.as_deref().filter(|uri| !uri.is_empty()) {
            data.insert(
                REDIRECT_URI_KEY.to_string(),
                Value::String(redirect_uri.to_string()),
            );
        }
        data
    }

    /// `secure[data]` with `&` separators.
    pub fn data_string(&self) -> String {
        encode(&self.data(), Separator::Ampersand)
    }

    /// `secure[data]` with `&amp;` separators, for HTML attributes.
    pub fn data_string_encoded(&self) -> String {
        encode(&self.data(), Separator::HtmlEntity)
    }

    /// Compute the signature and freeze the payload.
    pub fn sign(self) -> SignedRequest {
        let data = self.data();
        let signature = self.context.signer.request_signature(
            self.context.timestamp,
            &self.context.nonce,
            &encode(&data, Separator::Ampersand),
        );

        debug!(
            api_id = self.context.api_id(),
            timestamp = self.context.timestamp,
            "direct request signed"
        );

        SignedRequest {
            context: self.context,
            data,
            redirect_uri: self.redirect_uri,
            signature,
        }
    }
}

/// A Direct request with a computed signature. Its payload is read-only.
#[derive(Debug, Clone)]
pub struct SignedRequest {
    context: SigningContext,
    data: Map<String, Value>,
    redirect_uri: Option<String>,
    signature: String,
}

impl SignedRequest {
    /// The `secure[signature]` value.
    pub fn signature(&self) -> &str {
        &self.signature
    }

    pub fn context(&self) -> &SigningContext {
        &self.context
    }

    /// The signed data, redirect URI included.
    pub fn data(&self) -> &Map<String, Value> {
        &self.data
    }

    pub fn redirect_uri(&self) -> Option<&str> {
        self.redirect_uri.as_deref()
    }

    pub fn data_string(&self) -> String {
        encode(&self.data, Separator::Ampersand)
    }

    pub fn data_string_encoded(&self) -> String {
        encode(&self.data, Separator::HtmlEntity)
    }

    /// The five secure fields, `secure[data]` encoded with `separator`.
    pub fn secure_fields(&self, separator: Separator) -> Vec<(String, String)> {
        vec![
            (fields::API_ID.to_string(), self.context.api_id().to_string()),
            (fields::TIMESTAMP.to_string(), self.context.timestamp.to_string()),
            (fields::NONCE.to_string(), self.context.nonce.clone()),
            (fields::DATA.to_string(), encode(&self.data, separator)),
            (fields::SIGNATURE.to_string(), self.signature.clone()),
        ]
    }

    /// Form fields for POSTing the request directly.
    pub fn form_fields(&self) -> Vec<(String, String)> {
        self.secure_fields(Separator::Ampersand)
    }

    /// HTML hidden inputs to place inside the signup or card update form.
    pub fn hidden_fields(&self) -> String {
        self.secure_fields(Separator::HtmlEntity)
            .into_iter()
            .map(|(name, value)| {
                format!(
                    "<input type=\"hidden\" {:<24} value=\"{}\" />\n",
                    format!("name=\"{}\"", name),
                    value
                )
            })
            .collect()
    }
}

/// A Direct request that signs itself on first use.
///
/// Reading the signature (directly or through [`hidden_fields`] /
/// [`form_fields`]) moves the request to the `Signed` state; after that,
/// [`set_data`] and [`set_redirect_uri`] fail with
/// [`ChargifyError::PreconditionViolation`].
///
/// [`hidden_fields`]: DirectRequest::hidden_fields
/// [`form_fields`]: DirectRequest::form_fields
/// [`set_data`]: DirectRequest::set_data
/// [`set_redirect_uri`]: DirectRequest::set_redirect_uri
///
/// # Example
///
/// ```ignore
/// let mut direct = DirectRequest::new(config.signer(), &mut OsRng);
/// direct.set_redirect_uri("https://example.com/signup/done")?;
/// direct.set_data(&json!({"signup": {"product": {"handle": "basic"}}}))?;
///
/// let html = direct.hidden_fields();
/// assert!(direct.set_data(&json!({})).is_err());
/// ```
#[derive(Debug, Clone)]
pub enum DirectRequest {
    Draft(DraftRequest),
    Signed(SignedRequest),
}

impl DirectRequest {
    /// Create a draft stamped with the current time and a fresh nonce.
    pub fn new<R>(signer: DirectSigner, rng: &mut R) -> Self
    where
        R: RngCore + CryptoRng + ?Sized,
    {
        Self::from_context(SigningContext::new(signer, rng))
    }

    pub fn from_context(context: SigningContext) -> Self {
        Self::Draft(DraftRequest::new(context))
    }

    pub fn is_signed(&self) -> bool {
        matches!(self, Self::Signed(_))
    }

    pub fn context(&self) -> &SigningContext {
        match self {
            Self::Draft(draft) => draft.context(),
            Self::Signed(signed) => signed.context(),
        }
    }

    pub fn api_id(&self) -> &str {
        self.context().api_id()
    }

    pub fn timestamp(&self) -> i64 {
        self.context().timestamp()
    }

    pub fn nonce(&self) -> &str {
        self.context().nonce()
    }

    /// Replace `secure[data]`.
    ///
    /// # Errors
    ///
    /// `PreconditionViolation` once signed; `Encoding` for non-mapping data.
    pub fn set_data<T>(&mut self, data: &T) -> ChargifyResult<()>
    where
        T: Serialize + ?Sized,
    {
        match self {
            Self::Draft(draft) => draft.set_data(data),
            Self::Signed(_) => Err(ChargifyError::already_signed()),
        }
    }

    /// Set the redirect URI.
    ///
    /// # Errors
    ///
    /// `PreconditionViolation` once signed.
    pub fn set_redirect_uri(&mut self, redirect_uri: impl Into<String>) -> ChargifyResult<()> {
        match self {
            Self::Draft(draft) => {
                draft.set_redirect_uri(redirect_uri);
                Ok(())
            }
            Self::Signed(_) => Err(ChargifyError::already_signed()),
        }
    }

    pub fn redirect_uri(&self) -> Option<&str> {
        match self {
            Self::Draft(draft) => draft.redirect_uri(),
            Self::Signed(signed) => signed.redirect_uri(),
        }
    }

    /// The data to be signed (or already signed), redirect URI included.
    pub fn data(&self) -> Map<String, Value> {
        match self {
            Self::Draft(draft) => draft.data(),
            Self::Signed(signed) => signed.data().clone(),
        }
    }

    pub fn data_string(&self) -> String {
        match self {
            Self::Draft(draft) => draft.data_string(),
            Self::Signed(signed) => signed.data_string(),
        }
    }

    pub fn data_string_encoded(&self) -> String {
        match self {
            Self::Draft(draft) => draft.data_string_encoded(),
            Self::Signed(signed) => signed.data_string_encoded(),
        }
    }

    /// Sign if still a draft and return the signed request.
    pub fn signed(&mut self) -> &SignedRequest {
        if let Self::Draft(draft) = self {
            let signed = draft.clone().sign();
            *self = Self::Signed(signed);
        }

        match self {
            Self::Signed(signed) => signed,
            Self::Draft(_) => unreachable!("draft requests are signed above"),
        }
    }

    /// The request signature, computed on first call and cached.
    pub fn signature(&mut self) -> &str {
        self.signed().signature()
    }

    /// HTML hidden inputs; signs the request.
    pub fn hidden_fields(&mut self) -> String {
        self.signed().hidden_fields()
    }

    /// POST form fields; signs the request.
    pub fn form_fields(&mut self) -> Vec<(String, String)> {
        self.signed().form_fields()
    }

    /// Expected signature of a redirect carrying `inputs`.
    pub fn response_signature(&self, inputs: &ResponseSignatureInputs) -> String {
        self.context().response_signature(inputs)
    }

    pub fn is_valid_response_signature(
        &self,
        candidate: &str,
        inputs: &ResponseSignatureInputs,
    ) -> bool {
        self.context().is_valid_response_signature(candidate, inputs)
    }

    pub fn is_valid_callback(&self, callback: &RedirectCallback) -> bool {
        self.context().is_valid_callback(callback)
    }
}

impl From<DraftRequest> for DirectRequest {
    fn from(draft: DraftRequest) -> Self {
        Self::Draft(draft)
    }
}

impl From<SignedRequest> for DirectRequest {
    fn from(signed: SignedRequest) -> Self {
        Self::Signed(signed)
    }
}
