//! Live credential check against the Direct signup endpoint.
//!
//! Chargify has no endpoint that validates Direct credentials. The probe
//! POSTs a signed request to the signup action with redirects disabled and
//! reads the answer heuristically: a correctly signed request is redirected
//! to the request's `redirect_uri`, while a bad one gets a `200` page saying
//! `Incorrect signature`.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, warn};

use super::request::DirectRequest;
use crate::error::ChargifyError;
use crate::http::{HttpRequest, HttpTransport, RawResponse};

/// Body returned by Chargify for a request with a bad signature.
pub const INCORRECT_SIGNATURE_BODY: &str = "Incorrect signature";

/// Why a probe response was judged a rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RejectionReason {
    /// Body is `Incorrect signature` (case-insensitive, trimmed)
    IncorrectSignatureBody,
    /// No `Location` header
    MissingRedirect,
    /// Status was exactly 200
    StatusOk,
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectionReason::IncorrectSignatureBody => write!(f, "incorrect signature body"),
            RejectionReason::MissingRedirect => write!(f, "missing redirect"),
            RejectionReason::StatusOk => write!(f, "status 200"),
        }
    }
}

/// Result of one probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The endpoint redirected; credentials look valid.
    Accepted(RawResponse),
    /// The endpoint answered but the heuristic failed.
    Rejected {
        reasons: Vec<RejectionReason>,
        response: RawResponse,
    },
    /// No response was obtained.
    Unreachable(ChargifyError),
}

impl ProbeOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, ProbeOutcome::Accepted(_))
    }

    /// The response, if one was received.
    pub fn response(&self) -> Option<&RawResponse> {
        match self {
            ProbeOutcome::Accepted(response) | ProbeOutcome::Rejected { response, .. } => {
                Some(response)
            }
            ProbeOutcome::Unreachable(_) => None,
        }
    }

    pub fn rejection_reasons(&self) -> &[RejectionReason] {
        match self {
            ProbeOutcome::Rejected { reasons, .. } => reasons,
            _ => &[],
        }
    }
}

/// Apply the acceptance heuristic to a response.
///
/// Every failing check is reported, not just the first one.
pub fn evaluate_response(response: RawResponse) -> ProbeOutcome {
    let mut reasons = Vec::new();

    if response.body.trim().eq_ignore_ascii_case(INCORRECT_SIGNATURE_BODY) {
        reasons.push(RejectionReason::IncorrectSignatureBody);
    }
    if response.location().is_none() {
        reasons.push(RejectionReason::MissingRedirect);
    }
    if response.status == 200 {
        reasons.push(RejectionReason::StatusOk);
    }

    if reasons.is_empty() {
        ProbeOutcome::Accepted(response)
    } else {
        ProbeOutcome::Rejected { reasons, response }
    }
}

/// Sends Direct requests to the signup endpoint to test credentials.
pub struct AuthProbe {
    transport: Arc<dyn HttpTransport>,
    signup_url: String,
    last_outcome: Option<ProbeOutcome>,
}

impl AuthProbe {
    pub fn new(transport: Arc<dyn HttpTransport>, signup_url: impl Into<String>) -> Self {
        Self {
            transport,
            signup_url: signup_url.into(),
            last_outcome: None,
        }
    }

    pub fn signup_url(&self) -> &str {
        &self.signup_url
    }

    /// POST `request` to the signup endpoint and classify the answer.
    ///
    /// Signs `request` if it is still a draft.
    pub async fn probe(&mut self, request: &mut DirectRequest) -> &ProbeOutcome {
        let http_request = HttpRequest::post_form(&self.signup_url, request.form_fields());
        debug!(url = %self.signup_url, api_id = request.api_id(), "sending auth probe");

        let outcome = match self.transport.send(http_request).await {
            Ok(response) => evaluate_response(response),
            Err(e) => ProbeOutcome::Unreachable(e),
        };

        match &outcome {
            ProbeOutcome::Accepted(response) => {
                info!(status = response.status, "auth probe accepted")
            }
            ProbeOutcome::Rejected { reasons, response } => {
                let reasons: Vec<String> = reasons.iter().map(ToString::to_string).collect();
                warn!(status = response.status, reasons = ?reasons, "auth probe rejected")
            }
            ProbeOutcome::Unreachable(e) => warn!(error = %e, "auth probe got no response"),
        }

        self.last_outcome.insert(outcome)
    }

    /// Returns true if the credentials behind `request` look valid.
    ///
    /// Never fails: a missing response counts as `false`.
    pub async fn test(&mut self, request: &mut DirectRequest) -> bool {
        self.probe(request).await.is_accepted()
    }

    /// Outcome of the most recent probe.
    pub fn last_outcome(&self) -> Option<&ProbeOutcome> {
        self.last_outcome.as_ref()
    }

    /// Response of the most recent probe, if one was received.
    pub fn last_response(&self) -> Option<&RawResponse> {
        self.last_outcome.as_ref().and_then(ProbeOutcome::response)
    }
}

impl fmt::Debug for AuthProbe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthProbe")
            .field("signup_url", &self.signup_url)
            .field("last_outcome", &self.last_outcome)
            .finish()
    }
}
