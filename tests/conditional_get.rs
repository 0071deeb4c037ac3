//! End-to-end conditional GET through an axum router.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    middleware::from_fn_with_state,
    Router,
};
use conditional_get::config::parse_config;
use conditional_get::digest::{DigestError, DigestProvider};
use conditional_get::http::{conditional_get_middleware, ConditionalGet, ConditionalGetLayer};

mod common;

fn layered(pipeline: ConditionalGet) -> Router {
    common::routes().layer(ConditionalGetLayer::new(pipeline))
}

fn with_middleware(pipeline: ConditionalGet) -> Router {
    common::routes().layer(from_fn_with_state(Arc::new(pipeline), conditional_get_middleware))
}

#[tokio::test]
async fn test_revalidation_round_trip() {
    let apps = [
        layered(ConditionalGet::default()),
        with_middleware(ConditionalGet::default()),
    ];
    for app in apps {
        let first = common::send(app.clone(), common::get_with("/page", &[])).await;
        assert_eq!(first.status(), StatusCode::OK);
        let etag = common::header_value(&first, "etag").unwrap().to_string();
        assert!(etag.starts_with("W/\""));
        assert_eq!(etag.len(), 3 + 27);
        assert_eq!(
            common::header_value(&first, "cache-control"),
            Some("max-age=0, private, must-revalidate")
        );
        assert_eq!(common::body_bytes(first).await, "<h1>page</h1>");

        let revisit = common::get_with("/page", &[("if-none-match", etag.as_str())]);
        let second = common::send(app.clone(), revisit).await;
        assert_eq!(second.status(), StatusCode::NOT_MODIFIED);
        assert_eq!(common::header_value(&second, "etag"), Some(etag.as_str()));
        assert!(common::header_value(&second, "content-type").is_none());
        assert!(common::body_bytes(second).await.is_empty());

        let outdated = common::get_with("/page", &[("if-none-match", "W/\"outdated")]);
        let stale = common::send(app, outdated).await;
        assert_eq!(stale.status(), StatusCode::OK);
        assert_eq!(common::body_bytes(stale).await, "<h1>page</h1>");
    }
}

#[tokio::test]
async fn test_head_revalidates() {
    let app = layered(ConditionalGet::default());
    let first = common::send(app.clone(), common::get_with("/page", &[])).await;
    let etag = common::header_value(&first, "etag").unwrap().to_string();

    let head = Request::builder()
        .method(Method::HEAD)
        .uri("/page")
        .header("if-none-match", etag)
        .body(Body::empty())
        .unwrap();
    let response = common::send(app, head).await;
    assert_eq!(response.status(), StatusCode::NOT_MODIFIED);
}

#[tokio::test]
async fn test_post_is_never_short_circuited() {
    let app = layered(ConditionalGet::default());
    let first = common::send(app.clone(), common::get_with("/page", &[])).await;
    let etag = common::header_value(&first, "etag").unwrap().to_string();
    let posted_tag = {
        let post = Request::post("/page").body(Body::empty()).unwrap();
        let response = common::send(app.clone(), post).await;
        common::header_value(&response, "etag").unwrap().to_string()
    };

    for tag in [etag, posted_tag] {
        let post = Request::post("/page")
            .header("if-none-match", tag)
            .body(Body::empty())
            .unwrap();
        let response = common::send(app.clone(), post).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(common::body_bytes(response).await, "posted");
    }
}

#[tokio::test]
async fn test_last_modified_revalidation() {
    let app = layered(ConditionalGet::default());

    let plain = common::send(app.clone(), common::get_with("/stamped", &[])).await;
    assert!(common::header_value(&plain, "etag").is_none());
    assert!(common::header_value(&plain, "cache-control").is_none());

    let fresh = common::send(
        app.clone(),
        common::get_with(
            "/stamped",
            &[("if-modified-since", "Wed, 21 Oct 2015 07:28:00 GMT")],
        ),
    )
    .await;
    assert_eq!(fresh.status(), StatusCode::NOT_MODIFIED);
    assert_eq!(
        common::header_value(&fresh, "last-modified"),
        Some(common::LAST_MODIFIED)
    );

    let stale = common::send(
        app,
        common::get_with(
            "/stamped",
            &[("if-modified-since", "Tue, 20 Oct 2015 07:28:00 GMT")],
        ),
    )
    .await;
    assert_eq!(stale.status(), StatusCode::OK);
    assert_eq!(common::body_bytes(stale).await, "stamped");
}

#[tokio::test]
async fn test_handler_etag_is_respected() {
    let app = layered(ConditionalGet::default());

    let response = common::send(app.clone(), common::get_with("/tagged", &[])).await;
    assert_eq!(common::header_value(&response, "etag"), Some("\"v1\""));
    assert!(common::header_value(&response, "cache-control").is_none());

    let revisit = common::get_with("/tagged", &[("if-none-match", "\"v1\"")]);
    let response = common::send(app, revisit).await;
    assert_eq!(response.status(), StatusCode::NOT_MODIFIED);
}

#[tokio::test]
async fn test_untaggable_responses_pass_through() {
    let app = layered(ConditionalGet::default());

    let empty = common::send(app.clone(), common::get_with("/empty", &[])).await;
    assert_eq!(empty.status(), StatusCode::OK);
    assert!(common::header_value(&empty, "etag").is_none());

    let missing = common::send(app, common::get_with("/missing", &[])).await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    assert!(common::header_value(&missing, "etag").is_none());
}

#[derive(Debug)]
struct NoBackend;

impl DigestProvider for NoBackend {
    fn algorithm(&self) -> &'static str {
        "none"
    }

    fn hexdigest(&self, _data: &[u8]) -> Result<String, DigestError> {
        Err(DigestError::Unavailable)
    }
}

#[tokio::test]
async fn test_missing_digest_backend_still_serves() {
    let app = layered(ConditionalGet::default().with_provider(Arc::new(NoBackend)));

    let response = common::send(app, common::get_with("/page", &[])).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(common::header_value(&response, "etag").is_none());
    assert_eq!(common::body_bytes(response).await, "<h1>page</h1>");
}

#[tokio::test]
async fn test_config_driven_pipeline() {
    let config = parse_config(
        r#"
[etag]
cache_control = "private, no-cache"

[freshness]
enabled = false
"#,
    )
    .unwrap();
    let app = layered(ConditionalGet::from_config(&config).unwrap());

    let first = common::send(app.clone(), common::get_with("/page", &[])).await;
    assert_eq!(
        common::header_value(&first, "cache-control"),
        Some("private, no-cache")
    );
    let etag = common::header_value(&first, "etag").unwrap().to_string();

    let revisit = common::get_with("/page", &[("if-none-match", etag.as_str())]);
    let second = common::send(app, revisit).await;
    assert_eq!(second.status(), StatusCode::OK);
}
