//! Conditional GET as an axum middleware function.
//!
//! Mount with
//! `axum::middleware::from_fn_with_state(Arc::new(pipeline), conditional_get_middleware)`.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::freshness::RequestValidators;
use crate::http::pipeline::ConditionalGet;

pub async fn conditional_get_middleware(
    State(pipeline): State<Arc<ConditionalGet>>,
    request: Request,
    next: Next,
) -> Response {
    let validators = RequestValidators::from_request(&request);
    let response = next.run(request).await;
    pipeline.process(&validators, response).await
}
