//! Tower layer applying [`ConditionalGet`] to an inner service.

use std::sync::Arc;
use std::task::{Context, Poll};

use axum::{
    body::Body,
    http::{Request, Response},
};
use futures_util::future::BoxFuture;
use tower::{Layer, Service};

use crate::freshness::RequestValidators;
use crate::http::pipeline::ConditionalGet;

/// Layer that tags responses with weak ETags and answers fresh requests with 304.
#[derive(Debug, Clone, Default)]
pub struct ConditionalGetLayer {
    pipeline: Arc<ConditionalGet>,
}

impl ConditionalGetLayer {
    pub fn new(pipeline: ConditionalGet) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
        }
    }
}

impl<S> Layer<S> for ConditionalGetLayer {
    type Service = ConditionalGetService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        ConditionalGetService {
            inner,
            pipeline: Arc::clone(&self.pipeline),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConditionalGetService<S> {
    inner: S,
    pipeline: Arc<ConditionalGet>,
}

impl<S, B> Service<Request<B>> for ConditionalGetService<S>
where
    S: Service<Request<B>, Response = Response<Body>> + Send + 'static,
    S::Future: Send + 'static,
    B: 'static,
{
    type Response = Response<Body>;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request<B>) -> Self::Future {
        let validators = RequestValidators::from_request(&request);
        let pipeline = Arc::clone(&self.pipeline);
        let response = self.inner.call(request);

        Box::pin(async move {
            let response = response.await?;
            Ok(pipeline.process(&validators, response).await)
        })
    }
}
