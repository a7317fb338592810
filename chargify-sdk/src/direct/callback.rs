//! Parsing of the redirect Chargify sends back after a Direct submission.

use std::collections::HashMap;

use super::signer::{DirectSigner, ResponseSignatureInputs};
use crate::error::{ChargifyError, ChargifyResult};

/// Query parameters of a Direct redirect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectCallback {
    pub inputs: ResponseSignatureInputs,
    pub signature: String,
}

impl RedirectCallback {
    /// Parse a redirect query string, with or without the leading `?`.
    ///
    /// Values are form-url-decoded. When a key repeats, the last value wins.
    ///
    /// # Errors
    ///
    /// Returns a parse error naming the first missing field.
    pub fn from_query(query: &str) -> ChargifyResult<Self> {
        let query = query.strip_prefix('?').unwrap_or(query);

        let pairs: HashMap<String, String> =
            serde_urlencoded::from_str::<Vec<(String, String)>>(query)
                .map_err(|e| ChargifyError::Parse(format!("invalid redirect query: {}", e)))?
                .into_iter()
                .collect();

        Self::from_pairs(&pairs)
    }

    /// Build from already decoded query parameters.
    pub fn from_pairs(pairs: &HashMap<String, String>) -> ChargifyResult<Self> {
        let field = |name: &str| {
            pairs
                .get(name)
                .cloned()
                .ok_or_else(|| ChargifyError::missing_field(name))
        };

        Ok(Self {
            inputs: ResponseSignatureInputs {
                api_id: field("api_id")?,
                timestamp: field("timestamp")?,
                nonce: field("nonce")?,
                status_code: field("status_code")?,
                result_code: field("result_code")?,
                call_id: field("call_id")?,
            },
            signature: field("signature")?,
        })
    }

    /// Check the callback signature against `signer`'s secret.
    pub fn verify(&self, signer: &DirectSigner) -> bool {
        signer.is_valid_response_signature(&self.signature, &self.inputs)
    }

    pub fn call_id(&self) -> &str {
        &self.inputs.call_id
    }

    pub fn status_code(&self) -> &str {
        &self.inputs.status_code
    }

    pub fn result_code(&self) -> &str {
        &self.inputs.result_code
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signed_query(signer: &DirectSigner) -> String {
        let inputs = ResponseSignatureInputs {
            api_id: "abc".to_string(),
            timestamp: "1000".to_string(),
            nonce: "n".repeat(40),
            status_code: "200".to_string(),
            result_code: "2000".to_string(),
            call_id: "call 1".to_string(),
        };
        format!(
            "?api_id=abc&timestamp=1000&nonce={}&status_code=200&result_code=2000&call_id=call+1&signature={}",
            "n".repeat(40),
            signer.response_signature(&inputs)
        )
    }

    #[test]
    fn test_from_query_decodes_fields() {
        let signer = DirectSigner::new("abc", "secret");
        let callback = RedirectCallback::from_query(&signed_query(&signer)).unwrap();

        assert_eq!(callback.inputs.api_id, "abc");
        assert_eq!(callback.call_id(), "call 1");
        assert_eq!(callback.status_code(), "200");
        assert_eq!(callback.result_code(), "2000");
        assert!(callback.verify(&signer));
    }

    #[test]
    fn test_wrong_secret_fails_verification() {
        let signer = DirectSigner::new("abc", "secret");
        let callback = RedirectCallback::from_query(&signed_query(&signer)).unwrap();
        assert!(!callback.verify(&DirectSigner::new("abc", "other")));
    }

    #[test]
    fn test_missing_field() {
        let err = RedirectCallback::from_query("api_id=abc&timestamp=1").unwrap_err();
        assert_eq!(err, ChargifyError::missing_field("nonce"));
    }

    #[test]
    fn test_percent_decoding_and_last_value_wins() {
        let query = "api_id=a%40b&timestamp=1&timestamp=2&nonce=n&status_code=302\
                     &result_code=4000&call_id=x&signature=s";
        let callback = RedirectCallback::from_query(query).unwrap();
        assert_eq!(callback.inputs.api_id, "a@b");
        assert_eq!(callback.inputs.timestamp, "2");
        assert!(!callback.verify(&DirectSigner::new("a@b", "secret")));
    }

    #[test]
    fn test_form_decoding_edge_cases() {
        let query = "?&api_id=abc&&timestamp=1&nonce=n&status_code=200&result_code=2000\
                     &call_id=a+b%2Bc&signature=s&flag";
        let callback = RedirectCallback::from_query(query).unwrap();
        assert_eq!(callback.call_id(), "a b+c");
        assert_eq!(callback.signature, "s");
    }
}
