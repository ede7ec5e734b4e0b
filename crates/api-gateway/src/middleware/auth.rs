//! Admin authentication middleware.
//!
//! Admin routes require `Authorization: Bearer <token>` matching the
//! configured admin token. Comparison is constant-time; rejection happens
//! before any handler (and therefore before any mutation) runs.

use crate::envelope::ApiResponse;
use axum::{
    body::Body,
    http::{HeaderValue, Request, StatusCode},
    response::Response,
};
use std::sync::Arc;
use tower::{Layer, Service};
use tracing::warn;

/// Admin auth layer. `None` means no token is configured and every admin
/// request is rejected; admin access must be enabled deliberately.
#[derive(Clone)]
pub struct AdminAuthLayer {
    token: Arc<Option<String>>,
}

impl AdminAuthLayer {
    /// Build the layer with the configured admin token.
    pub fn new(token: Option<String>) -> Self {
        Self {
            token: Arc::new(token),
        }
    }
}

impl<S> Layer<S> for AdminAuthLayer {
    type Service = AdminAuthService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AdminAuthService {
            inner,
            token: Arc::clone(&self.token),
        }
    }
}

/// The auth service wrapping admin routes.
#[derive(Clone)]
pub struct AdminAuthService<S> {
    inner: S,
    token: Arc<Option<String>>,
}

impl<S> Service<Request<Body>> for AdminAuthService<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response;
    type Error = S::Error;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let token = Arc::clone(&self.token);
        let mut inner = self.inner.clone();

        Box::pin(async move {
            if !is_authorized(&req, token.as_deref()) {
                warn!(path = %req.uri().path(), "Admin request rejected");
                return Ok(unauthorized_response());
            }
            inner.call(req).await
        })
    }
}

fn is_authorized<B>(req: &Request<B>, expected: Option<&str>) -> bool {
    let Some(expected) = expected else {
        return false;
    };
    let Some(header) = req.headers().get("authorization") else {
        return false;
    };
    let Ok(header) = header.to_str() else {
        return false;
    };
    let Some(presented) = header.strip_prefix("Bearer ") else {
        return false;
    };
    constant_time_compare(presented, expected)
}

/// Constant-time string comparison. Both strings are padded to a common
/// length so neither content nor length leaks through timing.
pub fn constant_time_compare(a: &str, b: &str) -> bool {
    use subtle::ConstantTimeEq;

    let max_len = std::cmp::max(a.len(), b.len());
    let mut a_padded = vec![0u8; max_len];
    let mut b_padded = vec![0xFFu8; max_len];
    a_padded[..a.len()].copy_from_slice(a.as_bytes());
    b_padded[..b.len()].copy_from_slice(b.as_bytes());

    let lengths_equal = a.len().ct_eq(&b.len());
    let contents_equal = a_padded.ct_eq(&b_padded);
    (lengths_equal & contents_equal).into()
}

fn unauthorized_response() -> Response {
    let body = ApiResponse::<()>::fail("Admin authorization required");
    let mut response = Response::new(Body::from(
        serde_json::to_vec(&body).unwrap_or_default(),
    ));
    *response.status_mut() = StatusCode::UNAUTHORIZED;
    response
        .headers_mut()
        .insert("Content-Type", HeaderValue::from_static("application/json"));
    response
        .headers_mut()
        .insert("WWW-Authenticate", HeaderValue::from_static("Bearer"));
    response
}
