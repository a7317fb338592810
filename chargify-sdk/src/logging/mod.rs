//! Logging setup for applications embedding the client.
//!
//! The library itself only emits `tracing` events (request dispatch, probe
//! outcomes, signature computation). Secrets and signature inputs are never
//! logged. Applications that do not install their own subscriber can call
//! [`init_logging`].
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Standard tracing filter (e.g., `info`, `chargify_sdk=debug`)
//! - `CHARGIFY_LOG_FORMAT`: Output format - `pretty` (default), `compact`, or `json`
//! - `CHARGIFY_LOG_LEVEL`: Fallback level when `RUST_LOG` is unset
//! - `CHARGIFY_LOG_LOCATION`: `true`/`false` for file:line info
//!
//! # Usage
//!
//! ```rust,ignore
//! use chargify_sdk::logging::{init_logging, LogConfig};
//!
//! init_logging(LogConfig::from_env())?;
//! ```

mod config;

pub use config::{init_logging, LogConfig, LogFormat};
