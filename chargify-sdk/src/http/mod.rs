//! HTTP plumbing for the Chargify API.
//!
//! This module provides:
//!
//! - [`HttpTransport`]: the seam between request builders and the network
//! - [`HttpRequest`] / [`RawResponse`]: transport-neutral request and response values
//! - [`ReqwestTransport`]: the default transport, built on `reqwest`
//!
//! Transports never follow redirects and hand back non-2xx responses as
//! ordinary [`RawResponse`] values; only a missing response is an error.
//! The Direct auth probe depends on both properties.
//!
//! # Example
//!
//! ```ignore
//! use chargify_sdk::http::{HttpRequest, HttpTransport, ReqwestTransport};
//!
//! let transport = ReqwestTransport::new(&config)?;
//! let response = transport
//!     .send(HttpRequest::get("https://api.chargify.com/api/v2/calls/1234"))
//!     .await?;
//! println!("{} {:?}", response.status, response.location());
//! ```

mod client;
mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use client::ReqwestTransport;
pub use transport::{HttpMethod, HttpRequest, HttpTransport, RawResponse, RequestBody};
