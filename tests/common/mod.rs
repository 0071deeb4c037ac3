//! Shared utilities for integration tests.

use axum::{
    body::{Body, Bytes},
    http::{header, Request, Response, StatusCode},
    response::IntoResponse,
    routing::get,
    Router,
};
use tower::ServiceExt;

pub const LAST_MODIFIED: &str = "Wed, 21 Oct 2015 07:00:00 GMT";

/// Routes exercising each annotator branch, without any conditional layer.
pub fn routes() -> Router {
    Router::new()
        .route(
            "/page",
            get(|| async { ([(header::CONTENT_TYPE, "text/html")], "<h1>page</h1>") })
                .post(|| async { "posted" }),
        )
        .route(
            "/stamped",
            get(|| async { ([(header::LAST_MODIFIED, LAST_MODIFIED)], "stamped") }),
        )
        .route(
            "/tagged",
            get(|| async { ([(header::ETAG, "\"v1\"")], "tagged") }),
        )
        .route("/empty", get(|| async { StatusCode::OK }))
        .route(
            "/missing",
            get(|| async { (StatusCode::NOT_FOUND, "missing").into_response() }),
        )
}

/// Send one request through `app`.
pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

pub fn get_with(uri: &str, headers: &[(&str, &str)]) -> Request<Body> {
    let mut builder = Request::get(uri);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    builder.body(Body::empty()).unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Bytes {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
}

pub fn header_value<'a>(response: &'a Response<Body>, name: &str) -> Option<&'a str> {
    response.headers().get(name).and_then(|v| v.to_str().ok())
}
