//! chargify-sdk: client for the Chargify v2 API and the Chargify Direct
//! signing protocol.
//!
//! - [`direct`]: signed Direct requests, hidden form fields, redirect
//!   verification and the live auth probe
//! - [`service`]: the [`ChargifyV2`] client and call lookup
//! - [`http`]: transport seam and the `reqwest` implementation
//! - [`config`]: credentials and transport settings
//! - [`logging`]: `tracing` subscriber setup
//! - [`error`]: the [`ChargifyError`] type

pub mod config;
pub mod direct;
pub mod error;
pub mod http;
pub mod logging;
pub mod service;

pub use config::V2Config;
pub use direct::{DirectRequest, DirectSigner, RedirectCallback};
pub use error::{ChargifyError, ChargifyResult};
pub use service::ChargifyV2;
