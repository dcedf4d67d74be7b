use crate::exception::{BoxError, ExceptionFilter};
use axum::{
    http::Request,
    response::{IntoResponse, Response},
};
use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::{Layer, Service, ServiceExt};

/// Tower Layer that answers inner service errors through an [`ExceptionFilter`]
///
/// The wrapped service never fails: every error becomes an error response
/// negotiated against the headers of the request that caused it.
///
/// # Example
/// ```
/// use darkmatter::config::ConfigService;
/// use darkmatter::exception::{Exception, ExceptionHandler, ExceptionLayer};
/// use darkmatter::logger::TracingLogger;
/// use axum::{body::Body, http::Request, response::Response};
/// use std::sync::Arc;
/// use tower::{ServiceBuilder, service_fn};
///
/// let handler = ExceptionHandler::new(&ConfigService::empty(), Arc::new(TracingLogger)).unwrap();
/// let service = ServiceBuilder::new()
///     .layer(ExceptionLayer::new(handler))
///     .service(service_fn(|_req: Request<Body>| async {
///         Err::<Response, _>(Exception::not_found("no such route"))
///     }));
/// ```
#[derive(Clone)]
pub struct ExceptionLayer {
    filter: Arc<dyn ExceptionFilter>,
}

impl ExceptionLayer {
    pub fn new<F: ExceptionFilter>(filter: F) -> Self {
        Self {
            filter: Arc::new(filter),
        }
    }

    pub fn from_shared(filter: Arc<dyn ExceptionFilter>) -> Self {
        Self { filter }
    }
}

impl<S> Layer<S> for ExceptionLayer {
    type Service = ExceptionMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        ExceptionMiddleware {
            inner,
            filter: self.filter.clone(),
        }
    }
}

#[derive(Clone)]
pub struct ExceptionMiddleware<S> {
    inner: S,
    filter: Arc<dyn ExceptionFilter>,
}

impl<S, B> Service<Request<B>> for ExceptionMiddleware<S>
where
    S: Service<Request<B>, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
    S::Error: Into<BoxError> + Send,
    B: Send + 'static,
{
    type Response = Response;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Response, Infallible>> + Send>>;

    // Readiness of the inner service is awaited inside the call future so
    // that readiness errors go through the filter too.
    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: Request<B>) -> Self::Future {
        let headers = request.headers().clone();
        let filter = self.filter.clone();
        let inner = self.inner.clone();

        Box::pin(async move {
            match inner.oneshot(request).await {
                Ok(response) => Ok(response),
                Err(e) => Ok(filter.catch(&headers, e.into()).into_response()),
            }
        })
    }
}
