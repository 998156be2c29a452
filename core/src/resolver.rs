//! Base URL resolution for bare host strings.
//!
//! A host that already names its scheme is taken as-is. A bare host is
//! probed with a GET over `http://` and then `https://`; the first probe
//! whose exchange completes wins. The probe looks only at connectivity, so a
//! host answering 404 or 500 still counts as reachable.

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::http::HttpRequest;
use crate::transport::Transport;

const PROBE_SCHEMES: [&str; 2] = ["http://", "https://"];

/// Whether `host` carries an explicit `scheme://` prefix.
pub fn has_scheme(host: &str) -> bool {
    host.split("://").count() > 1
}

/// Resolve `host` into an absolute base URL without a trailing slash.
pub fn resolve(host: &str, transport: &dyn Transport) -> Result<String> {
    let host = host.trim_end_matches('/');
    if has_scheme(host) {
        return Ok(host.to_string());
    }

    for scheme in PROBE_SCHEMES {
        let candidate = format!("{scheme}{host}");
        match transport.execute(&HttpRequest::get(candidate.as_str())) {
            Ok(response) => {
                debug!(url = %candidate, status = response.status, "probe succeeded");
                return Ok(candidate);
            }
            Err(err) => {
                debug!(url = %candidate, error = %err, "probe failed");
            }
        }
    }

    warn!(host, "no scheme reached host");
    Err(Error::Unreachable {
        host: host.to_string(),
    })
}
