//! The network boundary.
//!
//! `Transport` is the only place an operation blocks. Implement it to plug
//! in any HTTP stack; `UreqTransport` is provided behind the `ureq` feature.

use std::sync::Arc;

use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};

/// Executes an `HttpRequest` and returns the server's answer as data.
///
/// Implementations must return non-2xx responses as `Ok`; status
/// interpretation belongs to the client. Failures to complete the exchange
/// are reported as `ApiError::TransportFailure`.
pub trait Transport: Send + Sync {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        (**self).execute(request)
    }
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        (**self).execute(request)
    }
}

#[cfg(feature = "ureq")]
pub use self::ureq_transport::{UreqTransport, UreqTransportConfig};

#[cfg(feature = "ureq")]
mod ureq_transport {
    use std::time::Duration;

    use log::debug;
    use serde::Deserialize;

    use super::Transport;
    use crate::error::ApiError;
    use crate::http::{Headers, HttpMethod, HttpRequest, HttpResponse};

    /// Settings for the bundled ureq agent.
    #[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
    #[serde(default)]
    pub struct UreqTransportConfig {
        /// Upper bound for the whole exchange. `None` waits forever.
        pub timeout_secs: Option<u64>,
    }

    /// Blocking transport backed by a shared `ureq::Agent`.
    #[derive(Debug, Clone)]
    pub struct UreqTransport {
        agent: ureq::Agent,
    }

    impl Default for UreqTransport {
        fn default() -> Self {
            Self::new(UreqTransportConfig::default())
        }
    }

    impl UreqTransport {
        pub fn new(config: UreqTransportConfig) -> Self {
            // 4xx/5xx must come back as data so the client can inspect them.
            let agent = ureq::Agent::config_builder()
                .http_status_as_error(false)
                .timeout_global(config.timeout_secs.map(Duration::from_secs))
                .build()
                .new_agent();
            Self { agent }
        }

        pub fn from_agent(agent: ureq::Agent) -> Self {
            Self { agent }
        }
    }

    impl Transport for UreqTransport {
        fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
            debug!("sending {} {}", request.method, request.url);
            let url = request.url.as_str();

            let result = match (request.method, request.body.as_deref()) {
                (HttpMethod::Get, _) => {
                    let mut builder = self.agent.get(url);
                    for (name, value) in request.headers.iter() {
                        builder = builder.header(name, value);
                    }
                    builder.call()
                }
                (HttpMethod::Delete, _) => {
                    let mut builder = self.agent.delete(url);
                    for (name, value) in request.headers.iter() {
                        builder = builder.header(name, value);
                    }
                    builder.call()
                }
                (HttpMethod::Post, body) => {
                    let mut builder = self.agent.post(url);
                    for (name, value) in request.headers.iter() {
                        builder = builder.header(name, value);
                    }
                    builder.send(body.unwrap_or_default())
                }
            };
            let mut response = result.map_err(|e| ApiError::TransportFailure(e.to_string()))?;

            let status = response.status().as_u16();
            let headers: Headers = response
                .headers()
                .iter()
                .filter_map(|(name, value)| Some((name.as_str(), value.to_str().ok()?)))
                .collect();
            let body = response
                .body_mut()
                .read_to_vec()
                .map_err(|e| ApiError::TransportFailure(e.to_string()))?;

            Ok(HttpResponse {
                status,
                headers,
                body,
            })
        }
    }
}
