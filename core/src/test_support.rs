//! Scripted transport for unit tests.

use std::sync::Mutex;

use crate::error::{TransportError, TransportErrorKind};
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::Transport;

/// Answers every request whose URL starts with a reachable prefix with a
/// fixed response; everything else fails as a refused connection. Every
/// request is recorded.
pub struct ScriptedTransport {
    reachable: Vec<String>,
    response: HttpResponse,
    failure: Option<TransportErrorKind>,
    sent: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub fn reachable_over(prefixes: &[&str]) -> Self {
        Self {
            reachable: prefixes.iter().map(|p| p.to_string()).collect(),
            response: HttpResponse::new(200, "{}"),
            failure: None,
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn unreachable() -> Self {
        Self::reachable_over(&[])
    }

    /// Reachable everywhere, answering `status` with `body`.
    pub fn responding(status: u16, body: &str) -> Self {
        Self::reachable_over(&[""]).respond(status, body)
    }

    /// Reachable everywhere, failing every exchange at `kind`.
    pub fn failing(kind: TransportErrorKind) -> Self {
        let mut transport = Self::reachable_over(&[""]);
        transport.failure = Some(kind);
        transport
    }

    pub fn respond(mut self, status: u16, body: &str) -> Self {
        self.response = HttpResponse::new(status, body);
        self
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.response
            .headers
            .push((name.to_string(), value.to_string()));
        self
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.sent.lock().unwrap().clone()
    }

    pub fn urls(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.url).collect()
    }

    pub fn calls(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

impl Transport for ScriptedTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        self.sent.lock().unwrap().push(request.clone());
        if !self.reachable.iter().any(|p| request.url.starts_with(p)) {
            return Err(TransportError::call("connection refused"));
        }
        match self.failure {
            Some(kind) => Err(TransportError {
                kind,
                message: "scripted failure".to_string(),
            }),
            None => Ok(self.response.clone()),
        }
    }
}
