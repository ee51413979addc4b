//! Typed JSON operations over a pluggable transport.
//!
//! # Design
//! `Client` holds only its transport and a `ClientConfig`; nothing changes
//! between calls. Each operation is split into a `build_*` method that
//! produces an `HttpRequest` and a `parse_*` method that consumes an
//! `HttpResponse`. `fetch`, `post` and `delete` glue the two halves together
//! around a single `Transport::execute` call. Callers that do their own I/O
//! can use the halves directly.

use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use crate::codec;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{Headers, HttpMethod, HttpRequest, HttpResponse, APPLICATION_JSON, CONTENT_TYPE};
use crate::transport::Transport;

/// Stateless client for JSON endpoints.
#[derive(Debug, Clone)]
pub struct Client<T> {
    transport: T,
    config: ClientConfig,
}

#[cfg(feature = "ureq")]
impl Client<crate::transport::UreqTransport> {
    /// Client backed by a default `UreqTransport`.
    pub fn with_ureq(config: ClientConfig) -> Self {
        Self::new(crate::transport::UreqTransport::default(), config)
    }
}

impl<T: Transport> Client<T> {
    pub fn new(transport: T, config: ClientConfig) -> Self {
        Self { transport, config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// GET `url` and decode the response body into `U`.
    pub fn fetch<U: DeserializeOwned>(&self, url: &str, headers: Option<&Headers>) -> Result<U, ApiError> {
        let request = self.build_fetch(url, headers)?;
        let response = self.transport.execute(&request)?;
        self.parse_json(response)
    }

    /// POST `body` as JSON to `url` and decode the response body into `U`.
    pub fn post<B, U>(&self, url: &str, headers: Option<&Headers>, body: &B) -> Result<U, ApiError>
    where
        B: Serialize + ?Sized,
        U: DeserializeOwned,
    {
        let request = self.build_post(url, headers, body)?;
        let response = self.transport.execute(&request)?;
        self.parse_json(response)
    }

    /// DELETE `url`. The response body is ignored.
    pub fn delete(&self, url: &str, headers: Option<&Headers>) -> Result<(), ApiError> {
        let request = self.build_delete(url, headers)?;
        let response = self.transport.execute(&request)?;
        self.parse_empty(response)
    }

    pub fn build_fetch(&self, url: &str, headers: Option<&Headers>) -> Result<HttpRequest, ApiError> {
        self.build(HttpMethod::Get, url, headers, None)
    }

    pub fn build_post<B: Serialize + ?Sized>(
        &self,
        url: &str,
        headers: Option<&Headers>,
        body: &B,
    ) -> Result<HttpRequest, ApiError> {
        // The URL is validated before the body is encoded.
        let url = parse_url(url)?;
        let body = codec::encode(body, self.config.key_casing)?;
        Ok(self.assemble(HttpMethod::Post, url, headers, Some(body)))
    }

    pub fn build_delete(&self, url: &str, headers: Option<&Headers>) -> Result<HttpRequest, ApiError> {
        self.build(HttpMethod::Delete, url, headers, None)
    }

    /// Validate the status and decode the body into `U`.
    pub fn parse_json<U: DeserializeOwned>(&self, response: HttpResponse) -> Result<U, ApiError> {
        check_status(&response)?;
        codec::decode(&response.body, self.config.key_casing)
    }

    /// Validate the status only.
    pub fn parse_empty(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)
    }

    fn build(
        &self,
        method: HttpMethod,
        url: &str,
        headers: Option<&Headers>,
        body: Option<Vec<u8>>,
    ) -> Result<HttpRequest, ApiError> {
        let url = parse_url(url)?;
        Ok(self.assemble(method, url, headers, body))
    }

    fn assemble(
        &self,
        method: HttpMethod,
        url: Url,
        headers: Option<&Headers>,
        body: Option<Vec<u8>>,
    ) -> HttpRequest {
        let mut merged = self.config.default_headers.clone();
        if let Some(headers) = headers {
            merged.extend_from(headers);
        }
        if body.is_some() && self.config.json_content_type && !merged.contains(CONTENT_TYPE) {
            merged.insert(CONTENT_TYPE, APPLICATION_JSON);
        }
        debug!("built {method} {url}");
        HttpRequest {
            method,
            url,
            headers: merged,
            body,
        }
    }
}

fn parse_url(raw: &str) -> Result<Url, ApiError> {
    let url = Url::parse(raw)?;
    if url.cannot_be_a_base() {
        return Err(ApiError::InvalidUrl(format!("{raw} is not a hierarchical URL")));
    }
    Ok(url)
}

/// Map statuses outside 200..=299 to `ApiError::StatusError`.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if (200..=299).contains(&response.status) {
        return Ok(());
    }
    warn!(
        "HTTP status {}; raw body: {}",
        response.status,
        String::from_utf8_lossy(&response.body)
    );
    Err(ApiError::StatusError {
        status: response.status,
        body: response.body.clone(),
    })
}
