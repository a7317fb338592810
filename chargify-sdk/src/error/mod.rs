//! Error handling for the Chargify client.
//!
//! This module provides:
//! - [`ChargifyError`], the single error type returned by fallible operations
//! - Error classification traits for retry decisions
//!
//! Authentication heuristics (the auth probe) and response signature
//! mismatches are *not* errors; they surface as booleans. Errors reported by
//! the remote API inside a response body are data, see
//! [`crate::service::ApiError`].
//!
//! # Usage
//!
//! ```rust,ignore
//! use chargify_sdk::error::{ChargifyError, ErrorClassification};
//!
//! match direct.set_redirect_uri("https://example.com/done") {
//!     Err(err) if err.is_precondition_violation() => { /* already signed */ }
//!     Err(err) if err.is_transient() => { /* retry later */ }
//!     _ => {}
//! }
//! ```

mod common;
mod traits;

pub use common::*;
pub use traits::*;
