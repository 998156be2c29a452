//! Error types for the HTTP transport adapter.
//!
//! # Design
//! Every failure a call can produce maps to exactly one `Error` variant, and
//! every variant is terminal for the call that raised it. The messages carry
//! the URL (or host) involved so a caller logging only `Display` still knows
//! which endpoint failed.
//!
//! `TransportError` and `CodecError` are the collaborator-level errors; the
//! dispatcher attaches the request URL when folding them into `Error`.

use std::fmt;

/// Errors returned by the resolver, the dispatcher and the registry.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// `call` was given no reference value to decode into.
    #[error("reference object is missing")]
    MissingReference,

    /// Neither `http://` nor `https://` could reach the host.
    #[error("unreachable server http(s)://{host}")]
    Unreachable { host: String },

    /// The payload could not be serialized.
    #[error("failed to encode payload: {0}")]
    Encode(String),

    /// The request could not be built (bad method or URL).
    #[error("failed to create http request {url}: {message}")]
    Request { url: String, message: String },

    /// The network exchange did not complete.
    #[error("failed to call {url}: {message}")]
    Call { url: String, message: String },

    /// The response body could not be read to the end.
    #[error("failed to read result {url}: {message}")]
    Read { url: String, message: String },

    /// The server answered with a status >= 400.
    #[error("failed to call {url}: {status_line} - {body}")]
    Status {
        url: String,
        status: u16,
        status_line: String,
        body: String,
    },

    /// The response body could not be decoded into the target.
    #[error("failed to decode result {url}: {message}")]
    Decode { url: String, message: String },

    /// No constructor is registered for the requested scheme.
    #[error("no client registered for scheme {0:?}")]
    UnknownScheme(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Which stage of an HTTP exchange failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    Request,
    Call,
    Read,
}

/// Failure reported by a `Transport` implementation.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct TransportError {
    pub kind: TransportErrorKind,
    pub message: String,
}

impl TransportError {
    pub fn request(err: impl fmt::Display) -> Self {
        Self {
            kind: TransportErrorKind::Request,
            message: err.to_string(),
        }
    }

    pub fn call(err: impl fmt::Display) -> Self {
        Self {
            kind: TransportErrorKind::Call,
            message: err.to_string(),
        }
    }

    pub fn read(err: impl fmt::Display) -> Self {
        Self {
            kind: TransportErrorKind::Read,
            message: err.to_string(),
        }
    }

    /// Attach the request URL, producing the matching dispatcher error.
    pub(crate) fn at(self, url: &str) -> Error {
        let url = url.to_string();
        let message = self.message;
        match self.kind {
            TransportErrorKind::Request => Error::Request { url, message },
            TransportErrorKind::Call => Error::Call { url, message },
            TransportErrorKind::Read => Error::Read { url, message },
        }
    }
}

/// Failure reported by a `Byter`.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{0}")]
pub struct CodecError(pub String);

impl From<serde_json::Error> for CodecError {
    fn from(err: serde_json::Error) -> Self {
        CodecError(err.to_string())
    }
}

/// Error returned by `ClientExt::call`.
///
/// Hands the caller's reference value back untouched alongside the cause;
/// `reference` is `None` only for `Error::MissingReference`.
pub struct CallError<T> {
    pub reference: Option<T>,
    pub source: Error,
}

impl<T> CallError<T> {
    pub fn into_inner(self) -> (Option<T>, Error) {
        (self.reference, self.source)
    }
}

impl<T> fmt::Debug for CallError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallError")
            .field("has_reference", &self.reference.is_some())
            .field("source", &self.source)
            .finish()
    }
}

impl<T> fmt::Display for CallError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.source, f)
    }
}

impl<T> std::error::Error for CallError<T> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_error_maps_to_variant_with_url() {
        let err = TransportError::call("connection refused").at("http://h/x");
        assert!(matches!(err, Error::Call { ref url, .. } if url == "http://h/x"));
        assert_eq!(err.to_string(), "failed to call http://h/x: connection refused");

        let err = TransportError::read("eof").at("http://h/x");
        assert!(matches!(err, Error::Read { .. }));

        let err = TransportError::request("bad method").at("http://h/x");
        assert!(matches!(err, Error::Request { .. }));
    }

    #[test]
    fn status_error_embeds_url_status_and_body() {
        let err = Error::Status {
            url: "http://h/missing".to_string(),
            status: 404,
            status_line: "404 Not Found".to_string(),
            body: "no such thing".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("http://h/missing"));
        assert!(msg.contains("404 Not Found"));
        assert!(msg.contains("no such thing"));
    }

    #[test]
    fn call_error_displays_source() {
        let err = CallError {
            reference: Some(5u8),
            source: Error::MissingReference,
        };
        assert_eq!(err.to_string(), "reference object is missing");
        let (reference, source) = err.into_inner();
        assert_eq!(reference, Some(5));
        assert!(matches!(source, Error::MissingReference));
    }
}
