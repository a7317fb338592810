//! HMAC-SHA1 signing for Chargify Direct.
//!
//! Two signatures are involved in a Direct round trip:
//! 1. The request signature, sent as `secure[signature]`:
//!    `HMAC-SHA1(api_id + timestamp + nonce + data, api_secret)`
//! 2. The response signature, appended to the redirect back to the
//!    integrator: `HMAC-SHA1(api_id + timestamp + nonce + status_code +
//!    result_code + call_id, api_secret)`
//!
//! Fields are concatenated without delimiters; both digests are lowercase hex.

use std::fmt;

use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha1::Sha1;
use subtle::ConstantTimeEq;

type HmacSha1 = Hmac<Sha1>;

/// Length of a hex encoded HMAC-SHA1 signature.
pub const SIGNATURE_LEN: usize = 40;

/// The six redirect fields covered by the response signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseSignatureInputs {
    pub api_id: String,
    pub timestamp: String,
    pub nonce: String,
    pub status_code: String,
    pub result_code: String,
    pub call_id: String,
}

impl ResponseSignatureInputs {
    fn parts(&self) -> [&str; 6] {
        [
            self.api_id.as_str(),
            self.timestamp.as_str(),
            self.nonce.as_str(),
            self.status_code.as_str(),
            self.result_code.as_str(),
            self.call_id.as_str(),
        ]
    }
}

/// Compute the request signature over already-encoded `data`.
pub fn request_signature(
    api_id: &str,
    timestamp: i64,
    nonce: &str,
    encoded_data: &str,
    secret: &str,
) -> String {
    let timestamp = timestamp.to_string();
    hmac_sha1_hex(secret, &[api_id, timestamp.as_str(), nonce, encoded_data])
}

/// Compute the signature the remote service attaches to its redirect.
pub fn response_signature(inputs: &ResponseSignatureInputs, secret: &str) -> String {
    hmac_sha1_hex(secret, &inputs.parts())
}

/// Compare `candidate` with the expected response signature.
///
/// The comparison is exact (case-sensitive) and constant-time.
pub fn is_valid_response_signature(
    candidate: &str,
    inputs: &ResponseSignatureInputs,
    secret: &str,
) -> bool {
    let expected = response_signature(inputs, secret);
    bool::from(candidate.as_bytes().ct_eq(expected.as_bytes()))
}

fn hmac_sha1_hex(secret: &str, parts: &[&str]) -> String {
    let mut mac =
        HmacSha1::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    for part in parts {
        mac.update(part.as_bytes());
    }
    hex::encode(mac.finalize().into_bytes())
}

/// Signs Direct requests and verifies redirect signatures for one API id.
///
/// # Example
///
/// ```ignore
/// let signer = DirectSigner::new("api_id", "api_secret");
/// let signature = signer.request_signature(1_700_000_000, &nonce, "signup[product][id]=1");
/// assert_eq!(signature.len(), 40);
/// ```
#[derive(Clone)]
pub struct DirectSigner {
    api_id: String,
    api_secret: String,
}

impl DirectSigner {
    /// Create a new Direct signer.
    ///
    /// # Arguments
    ///
    /// * `api_id` - The v2 API id (public)
    /// * `api_secret` - The shared secret (never exposed client-side)
    pub fn new(api_id: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_id: api_id.into(),
            api_secret: api_secret.into(),
        }
    }

    /// The public API id.
    pub fn api_id(&self) -> &str {
        &self.api_id
    }

    /// Request signature for this API id.
    pub fn request_signature(&self, timestamp: i64, nonce: &str, encoded_data: &str) -> String {
        request_signature(&self.api_id, timestamp, nonce, encoded_data, &self.api_secret)
    }

    /// Expected response signature for the given redirect fields.
    pub fn response_signature(&self, inputs: &ResponseSignatureInputs) -> String {
        response_signature(inputs, &self.api_secret)
    }

    /// Check a redirect signature against the given fields.
    pub fn is_valid_response_signature(
        &self,
        candidate: &str,
        inputs: &ResponseSignatureInputs,
    ) -> bool {
        is_valid_response_signature(candidate, inputs, &self.api_secret)
    }
}

impl fmt::Debug for DirectSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DirectSigner")
            .field("api_id", &self.api_id)
            .field("api_secret", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs() -> ResponseSignatureInputs {
        ResponseSignatureInputs {
            api_id: "api-id".to_string(),
            timestamp: "1000".to_string(),
            nonce: "n".repeat(40),
            status_code: "200".to_string(),
            result_code: "2000".to_string(),
            call_id: "1234".to_string(),
        }
    }

    #[test]
    fn test_rfc2202_vector() {
        // RFC 2202 test case 2, fed through the response concatenation
        let inputs = ResponseSignatureInputs {
            api_id: "what do ya want ".to_string(),
            timestamp: "for ".to_string(),
            nonce: "nothing?".to_string(),
            status_code: String::new(),
            result_code: String::new(),
            call_id: String::new(),
        };
        assert_eq!(
            response_signature(&inputs, "Jefe"),
            "effcdf6ae5eb2fa2d27416d5f184df9c259a7c79"
        );
    }

    #[test]
    fn test_request_signature_concatenates_without_delimiters() {
        let signer = DirectSigner::new("abc", "secret");
        let nonce = "n".repeat(40);
        let expected = hmac_sha1_hex("secret", &[format!("abc1000{}a[b]=1", nonce).as_str()]);

        assert_eq!(signer.request_signature(1000, &nonce, "a[b]=1"), expected);
    }

    #[test]
    fn test_request_signature_shape_and_determinism() {
        let signer = DirectSigner::new("abc", "secret");
        let first = signer.request_signature(1000, "nonce", "a=1");
        let second = signer.request_signature(1000, "nonce", "a=1");

        assert_eq!(first, second);
        assert_eq!(first.len(), SIGNATURE_LEN);
        assert!(first.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b)));
        assert_ne!(first, signer.request_signature(1001, "nonce", "a=1"));
    }

    #[test]
    fn test_response_signature_round_trip() {
        let signer = DirectSigner::new("api-id", "secret");
        let signature = signer.response_signature(&inputs());

        assert!(signer.is_valid_response_signature(&signature, &inputs()));
        assert!(!signer.is_valid_response_signature(&"x".repeat(40), &inputs()));
        assert!(!signer.is_valid_response_signature(&signature.to_uppercase(), &inputs()));
        assert!(!signer.is_valid_response_signature(&signature[..39], &inputs()));
    }

    #[test]
    fn test_other_secret_does_not_verify() {
        let signature = response_signature(&inputs(), "secret");
        assert!(!is_valid_response_signature(&signature, &inputs(), "other"));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let debug = format!("{:?}", DirectSigner::new("abc", "super-secret"));
        assert!(debug.contains("abc"));
        assert!(!debug.contains("super-secret"));
    }
}
