//! Blocking HTTP execution behind a trait.
//!
//! # Design
//! `Transport` performs one `HttpRequest` and returns the complete
//! `HttpResponse`. Status codes are returned as data, never as errors, so the
//! dispatcher alone decides what a 4xx/5xx means. The default implementation
//! drives a `ureq` agent; tests substitute a scripted transport.

use std::fmt;

use crate::error::TransportError;
use crate::http::{HttpRequest, HttpResponse};

/// Executes a single HTTP exchange.
pub trait Transport: Send + Sync {
    /// Send `request` and read the full response body.
    ///
    /// Fails with `TransportErrorKind::Request` when the request cannot be
    /// built, `Call` when the exchange does not complete, and `Read` when the
    /// body cannot be consumed.
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// `Transport` backed by a shared `ureq::Agent`.
///
/// The agent is configured to hand back 4xx/5xx responses as data and to
/// accept non-standard method tokens. Connection reuse is whatever the agent
/// pools on its own.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .allow_non_standard_methods(true)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for UreqTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UreqTransport").finish_non_exhaustive()
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut builder = ureq::http::Request::builder()
            .method(request.method.as_str())
            .uri(request.url.as_str());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = match &request.body {
            Some(body) => {
                let req = builder
                    .body(body.as_slice())
                    .map_err(TransportError::request)?;
                self.agent.run(req)
            }
            None => {
                let req = builder.body(()).map_err(TransportError::request)?;
                self.agent.run(req)
            }
        };
        let mut response = response.map_err(TransportError::call)?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response
            .body_mut()
            .with_config()
            .limit(u64::MAX)
            .read_to_vec()
            .map_err(TransportError::read)?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}
