//! HTTP transport adapter for an RPC-style client framework.
//!
//! # Overview
//! Turns a framework call (procedure name, payload, target) into one HTTP
//! request/response cycle: the payload is encoded by a pluggable `Byter`,
//! sent to `base_url + name` with the configured method and content type,
//! and the response body is decoded back into the caller's target.
//!
//! # Design
//! - `HttpClient` resolves its base URL once, at construction; a bare host is
//!   probed over `http://` then `https://`.
//! - Each call is a single synchronous attempt. No retries, no timeouts
//!   beyond the transport's own.
//! - Network I/O sits behind `Transport` and encoding behind `Byter`, so the
//!   dispatcher can be exercised without a server.
//! - The framework instantiates transports through an explicit `Registry`;
//!   `register` installs this one under `"http"`.

pub mod byter;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod registry;
pub mod resolver;
pub mod transport;

#[cfg(test)]
mod test_support;

pub use byter::{Byter, JsonByter};
pub use client::{Client, ClientExt, HttpClient, HttpClientBuilder};
pub use config::{
    merge_configs, CallConfig, ConfigMap, ReturnType, KEY_CONTENT_TYPE, KEY_METHOD,
    KEY_REFERENCE_OBJ, KEY_RETURN_TYPE,
};
pub use error::{CallError, CodecError, Error, Result, TransportError, TransportErrorKind};
pub use http::{HttpRequest, HttpResponse};
pub use registry::{Constructor, Registry};
pub use transport::{Transport, UreqTransport};

/// Scheme this adapter registers under.
pub const SCHEME: &str = "http";

/// Install the HTTP client constructor in `registry`.
pub fn register(registry: &mut Registry) {
    registry.register(SCHEME, |host, config| {
        let client = HttpClient::connect(host, config.clone())?;
        Ok(Box::new(client) as Box<dyn Client>)
    });
}
