use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, app_with_hits, Greeting, Hits, Inspection};
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

// --- root ---

#[tokio::test]
async fn root_answers_probe() {
    let resp = app()
        .oneshot(Request::builder().uri("/").body(String::new()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(&body_bytes(resp).await[..], b"ok");
}

// --- echo ---

#[tokio::test]
async fn echo_returns_posted_json() {
    let resp = app()
        .oneshot(json_request("POST", "/echo", r#"{"a":[1,2],"b":null}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = body_json(resp).await;
    assert_eq!(body, serde_json::json!({"a": [1, 2], "b": null}));
}

#[tokio::test]
async fn echo_rejects_malformed_json() {
    let resp = app()
        .oneshot(json_request("POST", "/echo", "{not json"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- greet ---

#[tokio::test]
async fn greet_builds_greeting() {
    let resp = app()
        .oneshot(json_request("POST", "/greet", r#"{"name":"ada","times":3}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let greeting: Greeting = body_json(resp).await;
    assert_eq!(greeting.message, "hello, ada");
    assert_eq!(greeting.count, 3);
}

#[tokio::test]
async fn greet_missing_name_returns_422() {
    let resp = app()
        .oneshot(json_request("POST", "/greet", r#"{"times":1}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

// --- inspect ---

#[tokio::test]
async fn inspect_reports_method_and_content_type() {
    let req = Request::builder()
        .method("PUT")
        .uri("/inspect")
        .header(http::header::CONTENT_TYPE, "text/plain")
        .body("hello".to_string())
        .unwrap();
    let resp = app().oneshot(req).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let seen: Inspection = body_json(resp).await;
    assert_eq!(seen.method, "PUT");
    assert_eq!(seen.content_type.as_deref(), Some("text/plain"));
    assert_eq!(seen.body, "hello");
}

// --- raw ---

#[tokio::test]
async fn raw_returns_plain_text() {
    let resp = app()
        .oneshot(json_request("POST", "/raw", "{}"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get(http::header::CONTENT_TYPE).unwrap(),
        "text/plain"
    );
    assert_eq!(&body_bytes(resp).await[..], b"plain bytes, not json");
}

// --- status ---

#[tokio::test]
async fn status_returns_requested_code() {
    let resp = app()
        .oneshot(json_request("POST", "/status/503", "{}"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(&body_bytes(resp).await[..], b"status 503 requested");
}

#[tokio::test]
async fn status_bad_code_returns_400() {
    let resp = app()
        .oneshot(json_request("POST", "/status/abc", "{}"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_route_returns_404() {
    let resp = app()
        .oneshot(json_request("POST", "/nope", "{}"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- hits ---

#[tokio::test]
async fn hits_count_served_requests() {
    let hits = Hits::default();
    let app = app_with_hits(hits.clone());

    app.clone()
        .oneshot(json_request("POST", "/echo", "1"))
        .await
        .unwrap();
    app.oneshot(Request::builder().uri("/").body(String::new()).unwrap())
        .await
        .unwrap();

    assert_eq!(hits.get(), 2);
}
