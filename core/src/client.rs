//! The HTTP client and the capability traits the RPC framework calls through.
//!
//! # Design
//! `HttpClient` holds only its resolved `base_url`, the construction-time
//! option map, and shared handles to a `Transport` and a `Byter`. Nothing is
//! mutated after construction, so one client can serve concurrent callers
//! without locking.
//!
//! `Client` is the object-safe capability every transport adapter exposes:
//! it moves `serde_json::Value`s. `ClientExt` layers the typed entry points
//! on top and is implemented for every `Client`, `dyn Client` included.

use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::byter::{decode_value, encode_value, Byter, JsonByter};
use crate::config::{CallConfig, ConfigMap, ReturnType};
use crate::error::{CallError, Error, Result};
use crate::http::{HttpRequest, HttpResponse};
use crate::resolver;
use crate::transport::{Transport, UreqTransport};

/// Capability interface shared by all transport adapters.
pub trait Client: Send + Sync {
    /// Absolute URL a call to `name` is sent to.
    fn url_for(&self, name: &str) -> String;

    /// Send `payload` to procedure `name` and return the result in the shape
    /// selected by the merged `configs`.
    fn invoke(&self, name: &str, payload: &Value, configs: &[ConfigMap]) -> Result<Value>;

    /// Release the client. Calls made afterwards are not guaranteed to work.
    fn close(&self);
}

/// Typed calls for any `Client`.
pub trait ClientExt: Client {
    /// Call `name` and decode the result into `target`.
    ///
    /// `target` is only written once the whole exchange and decode succeed;
    /// on any error it keeps its previous value.
    fn call_to<T, P>(
        &self,
        name: &str,
        target: &mut T,
        payload: &P,
        configs: &[ConfigMap],
    ) -> Result<()>
    where
        T: DeserializeOwned,
        P: Serialize + ?Sized,
    {
        *target = fetch(self, name, payload, configs)?;
        Ok(())
    }

    /// Call `name` and return a freshly decoded value of the reference's type.
    ///
    /// `None` fails before any network activity. On failure the reference is
    /// handed back unchanged inside the error.
    fn call<T, P>(
        &self,
        name: &str,
        reference: Option<T>,
        payload: &P,
        configs: &[ConfigMap],
    ) -> std::result::Result<T, CallError<T>>
    where
        T: DeserializeOwned,
        P: Serialize + ?Sized,
    {
        let Some(reference) = reference else {
            return Err(CallError {
                reference: None,
                source: Error::MissingReference,
            });
        };

        match fetch(self, name, payload, configs) {
            Ok(fresh) => Ok(fresh),
            Err(source) => Err(CallError {
                reference: Some(reference),
                source,
            }),
        }
    }
}

impl<C: Client + ?Sized> ClientExt for C {}

/// Encode `payload`, invoke `name` and decode the result as a new `T`.
fn fetch<C, T, P>(client: &C, name: &str, payload: &P, configs: &[ConfigMap]) -> Result<T>
where
    C: Client + ?Sized,
    T: DeserializeOwned,
    P: Serialize + ?Sized,
{
    let payload = encode_value(payload).map_err(|e| Error::Encode(e.0))?;
    let value = client.invoke(name, &payload, configs)?;
    decode_value(value).map_err(|e| Error::Decode {
        url: client.url_for(name),
        message: e.0,
    })
}

/// HTTP transport adapter.
#[derive(Clone)]
pub struct HttpClient {
    base_url: String,
    defaults: ConfigMap,
    transport: Arc<dyn Transport>,
    byter: Arc<dyn Byter>,
}

impl HttpClient {
    /// Resolve `host` with the default ureq transport and JSON byter.
    ///
    /// `config` becomes the lowest-priority option map of every call.
    pub fn connect(host: &str, config: ConfigMap) -> Result<Self> {
        Self::builder().config(config).connect(host)
    }

    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send an already-encoded body to `name` and return the raw response.
    ///
    /// Statuses >= 400 become `Error::Status`; the body is not decoded.
    pub fn exchange(&self, name: &str, body: Vec<u8>, config: &CallConfig) -> Result<HttpResponse> {
        let url = self.url_for(name);
        let request = HttpRequest {
            method: config.method(),
            url,
            headers: vec![(
                "Content-Type".to_string(),
                config.content_type().to_string(),
            )],
            body: Some(body),
        };

        let response = self
            .transport
            .execute(&request)
            .map_err(|e| e.at(&request.url))?;
        debug!(
            method = %request.method,
            url = %request.url,
            status = response.status,
            bytes = response.body.len(),
            "call completed"
        );

        if response.is_error() {
            return Err(Error::Status {
                status: response.status,
                status_line: response.status_line(),
                body: response.body_text(),
                url: request.url,
            });
        }
        Ok(response)
    }
}

impl Client for HttpClient {
    fn url_for(&self, name: &str) -> String {
        format!("{}{name}", self.base_url)
    }

    #[instrument(skip(self, payload, configs), fields(base_url = %self.base_url))]
    fn invoke(&self, name: &str, payload: &Value, configs: &[ConfigMap]) -> Result<Value> {
        let config = CallConfig::merged(std::iter::once(&self.defaults).chain(configs));
        let body = self.byter.encode(payload).map_err(|e| Error::Encode(e.0))?;
        let response = self.exchange(name, body, &config)?;

        let decode_err = |message: String| Error::Decode {
            url: self.url_for(name),
            message,
        };
        match config.return_type() {
            ReturnType::Object => self
                .byter
                .decode(&response.body, &config)
                .map_err(|e| decode_err(e.0)),
            ReturnType::Bytes => Ok(Value::from(response.body)),
            ReturnType::Response => {
                serde_json::to_value(&response).map_err(|e| decode_err(e.to_string()))
            }
        }
    }

    fn close(&self) {
        debug!(base_url = %self.base_url, "client closed");
    }
}

impl fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpClient")
            .field("base_url", &self.base_url)
            .field("defaults", &self.defaults)
            .finish_non_exhaustive()
    }
}

/// Assembles an `HttpClient` from optional parts.
#[derive(Default)]
pub struct HttpClientBuilder {
    config: ConfigMap,
    transport: Option<Arc<dyn Transport>>,
    byter: Option<Arc<dyn Byter>>,
}

impl HttpClientBuilder {
    pub fn config(mut self, config: ConfigMap) -> Self {
        self.config = config;
        self
    }

    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn byter(mut self, byter: Arc<dyn Byter>) -> Self {
        self.byter = Some(byter);
        self
    }

    /// Resolve `host` and build the client. Probing happens here, once.
    pub fn connect(self, host: &str) -> Result<HttpClient> {
        let transport = self
            .transport
            .unwrap_or_else(|| Arc::new(UreqTransport::new()));
        let byter = self.byter.unwrap_or_else(|| Arc::new(JsonByter));
        let base_url = resolver::resolve(host, transport.as_ref())?;
        debug!(host, %base_url, "http client ready");

        Ok(HttpClient {
            base_url,
            defaults: self.config,
            transport,
            byter,
        })
    }
}
