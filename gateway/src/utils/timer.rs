use std::{
    marker::PhantomData,
    task::{Context, Poll},
};

use tokio::time::Instant;
use tower::{Layer, Service};

/// Stamps each incoming request with its arrival time, read back by the
/// proxy handler to log total request duration. Distinct from the per-peer
/// latency `proxy::forward` measures around the upstream hop itself, which
/// feeds `AdjustStats` (§4.2).
#[derive(Debug, Clone)]
pub struct TimerLayer<ReqBody> {
    _marker: PhantomData<ReqBody>,
}

impl<ReqBody> TimerLayer<ReqBody> {
    #[must_use]
    pub const fn new() -> Self {
        Self { _marker: PhantomData }
    }
}

impl<ReqBody> Default for TimerLayer<ReqBody> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, ReqBody> Layer<S> for TimerLayer<ReqBody>
where
    S: Service<http::Request<ReqBody>>,
{
    type Service = Timer<S, ReqBody>;

    fn layer(&self, inner: S) -> Self::Service {
        Timer::new(inner)
    }
}

#[derive(Debug)]
pub struct Timer<S, ReqBody> {
    inner: S,
    _marker: PhantomData<ReqBody>,
}

impl<S: Clone, ReqBody> Clone for Timer<S, ReqBody> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            _marker: PhantomData,
        }
    }
}

impl<S, ReqBody> Timer<S, ReqBody>
where
    S: Service<http::Request<ReqBody>>,
{
    pub const fn new(inner: S) -> Self {
        Self { inner, _marker: PhantomData }
    }
}

impl<S, ReqBody> Service<http::Request<ReqBody>> for Timer<S, ReqBody>
where
    S: Service<http::Request<ReqBody>> + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: http::Request<ReqBody>) -> Self::Future {
        req.extensions_mut().insert(Instant::now());
        self.inner.call(req)
    }
}
