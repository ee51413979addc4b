//! Typed JSON requests over HTTP.
//!
//! # Overview
//! `Client` turns a URL, optional headers and an optional serde body into an
//! `HttpRequest`, hands it to a `Transport`, checks that the status is 2xx
//! and decodes the JSON answer into the caller's type.
//!
//! # Design
//! - `Client` is stateless; it holds a transport and a `ClientConfig`.
//! - Each operation is split into `build_*` (produces a request) and
//!   `parse_*` (consumes a response), so the I/O boundary is explicit and
//!   callers may run the exchange themselves.
//! - Key casing (`KeyCasing`) and default headers are configuration, fixed
//!   per client.
//! - `UreqTransport` (feature `ureq`) is the bundled blocking transport.

pub mod client;
pub mod codec;
pub mod config;
pub mod error;
pub mod http;
pub mod transport;

pub use client::Client;
pub use codec::KeyCasing;
pub use config::ClientConfig;
pub use error::ApiError;
pub use http::{Headers, HttpMethod, HttpRequest, HttpResponse};
pub use transport::Transport;
#[cfg(feature = "ureq")]
pub use transport::{UreqTransport, UreqTransportConfig};
