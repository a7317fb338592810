//! Chargify Direct: signed form posts from the customer's browser.
//!
//! Direct lets a signup or card update form on the integrator's own site post
//! straight to Chargify. The form carries five `secure[...]` fields; the
//! signature binds the API id, a timestamp, a nonce and the tamper-proof data
//! to the integrator's API secret. After processing, Chargify redirects back
//! with a result that is signed the same way.
//!
//! # Components
//!
//! - [`encoder`]: nested-map canonical encoding of `secure[data]`
//! - [`nonce`]: random nonce generation
//! - [`signer`]: request and response HMAC-SHA1 signatures
//! - [`request`]: draft/signed request lifecycle and hidden form fields
//! - [`callback`]: parsing and verifying the redirect back
//! - [`auth_probe`]: heuristic live credential check
//! - [`endpoints`]: form action URLs
//!
//! # Example
//!
//! ```ignore
//! use chargify_sdk::direct::DirectRequest;
//! use rand::rngs::OsRng;
//! use serde_json::json;
//!
//! let mut direct = DirectRequest::new(config.signer(), &mut OsRng);
//! direct.set_redirect_uri("https://example.com/signup/done")?;
//! direct.set_data(&json!({"signup": {"product": {"handle": "basic"}}}))?;
//!
//! let form = format!(
//!     "<form method=\"post\" action=\"{}\">\n{}</form>",
//!     signup_action(&config.base_url),
//!     direct.hidden_fields()
//! );
//! ```

pub mod auth_probe;
pub mod callback;
pub mod encoder;
pub mod endpoints;
pub mod nonce;
pub mod request;
pub mod signer;

pub use auth_probe::{evaluate_response, AuthProbe, ProbeOutcome, RejectionReason};
pub use callback::RedirectCallback;
pub use encoder::{encode, encode_value, Separator};
pub use endpoints::{card_update_action, signup_action};
pub use nonce::{generate_nonce, is_valid_nonce};
pub use request::{DirectRequest, DraftRequest, SignedRequest, SigningContext, REDIRECT_URI_KEY};
pub use signer::{DirectSigner, ResponseSignatureInputs};
