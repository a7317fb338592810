//! In-memory transport for unit tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::transport::{HttpRequest, HttpTransport, RawResponse};
use crate::error::ChargifyResult;

/// Replays a fixed answer and records every request sent.
pub(crate) struct FixtureTransport {
    answer: ChargifyResult<RawResponse>,
    sent: Mutex<Vec<HttpRequest>>,
}

impl FixtureTransport {
    pub(crate) fn new(answer: ChargifyResult<RawResponse>) -> Arc<Self> {
        Arc::new(Self {
            answer,
            sent: Mutex::new(Vec::new()),
        })
    }

    pub(crate) fn sent(&self) -> Vec<HttpRequest> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpTransport for FixtureTransport {
    async fn send(&self, request: HttpRequest) -> ChargifyResult<RawResponse> {
        self.sent.lock().unwrap().push(request);
        self.answer.clone()
    }
}
