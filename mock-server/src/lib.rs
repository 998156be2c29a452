use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, Method, StatusCode},
    routing::{any, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::net::TcpListener;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Greeting {
    pub message: String,
    pub count: u32,
}

#[derive(Deserialize)]
pub struct GreetRequest {
    pub name: String,
    #[serde(default = "one")]
    pub times: u32,
}

fn one() -> u32 {
    1
}

/// What `/inspect` saw of the incoming request.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Inspection {
    pub method: String,
    pub content_type: Option<String>,
    pub body: String,
}

/// Requests served, for tests asserting that no network activity happened.
#[derive(Clone, Default)]
pub struct Hits(Arc<AtomicU64>);

impl Hits {
    pub fn get(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }

    fn bump(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

pub fn app() -> Router {
    app_with_hits(Hits::default())
}

pub fn app_with_hits(hits: Hits) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/echo", post(echo))
        .route("/greet", post(greet))
        .route("/inspect", any(inspect))
        .route("/raw", any(raw))
        .route("/status/{code}", any(status))
        .with_state(hits)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    run_with_hits(listener, Hits::default()).await
}

pub async fn run_with_hits(listener: TcpListener, hits: Hits) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_hits(hits)).await
}

async fn root(State(hits): State<Hits>) -> &'static str {
    hits.bump();
    "ok"
}

async fn echo(State(hits): State<Hits>, Json(body): Json<Value>) -> Json<Value> {
    hits.bump();
    Json(body)
}

async fn greet(State(hits): State<Hits>, Json(input): Json<GreetRequest>) -> Json<Greeting> {
    hits.bump();
    tracing::debug!(name = %input.name, "greet");
    Json(Greeting {
        message: format!("hello, {}", input.name),
        count: input.times,
    })
}

async fn inspect(
    State(hits): State<Hits>,
    method: Method,
    headers: HeaderMap,
    body: String,
) -> Json<Inspection> {
    hits.bump();
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    Json(Inspection {
        method: method.to_string(),
        content_type,
        body,
    })
}

async fn raw(State(hits): State<Hits>) -> ([(header::HeaderName, &'static str); 1], &'static str) {
    hits.bump();
    ([(header::CONTENT_TYPE, "text/plain")], "plain bytes, not json")
}

async fn status(
    State(hits): State<Hits>,
    Path(code): Path<u16>,
) -> Result<(StatusCode, String), StatusCode> {
    hits.bump();
    let code = StatusCode::from_u16(code).map_err(|_| StatusCode::BAD_REQUEST)?;
    Ok((code, format!("status {} requested", code.as_u16())))
}
