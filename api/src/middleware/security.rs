//! Security middleware for enforcing HTTPS and response hardening headers.
//!
//! - HTTPS enforcement outside development, trusting `X-Forwarded-Proto`
//!   only from configured proxies
//! - Rejection of malformed `Origin` headers (allow-listing is left to CORS)
//! - Security headers (HSTS, CSP, frame and sniffing protection)

use actix_web::{
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::header::{self, HeaderValue},
    Error, ResponseError,
};
use futures_util::future::LocalBoxFuture;
use std::{
    future::{ready, Ready},
    rc::Rc,
    task::{Context, Poll},
};

use kurator_core::DomainError;
use kurator_shared::Environment;

use crate::handlers::ApiError;

/// Security middleware factory
#[derive(Debug, Clone)]
pub struct SecurityMiddleware {
    /// Whether to enforce HTTPS (disabled in development)
    enforce_https: bool,
    /// Whether to add security headers
    add_security_headers: bool,
    /// Peers whose X-Forwarded-Proto is trusted
    trusted_proxies: Vec<String>,
}

impl SecurityMiddleware {
    pub fn for_environment(environment: Environment) -> Self {
        let middleware = if environment.is_development() {
            Self::development()
        } else {
            Self::production()
        };

        tracing::info!(
            enforce_https = middleware.enforce_https,
            add_headers = middleware.add_security_headers,
            "Security middleware configured"
        );
        middleware
    }

    /// No HTTPS enforcement, no extra headers
    pub fn development() -> Self {
        Self {
            enforce_https: false,
            add_security_headers: false,
            trusted_proxies: vec!["127.0.0.1".to_string(), "::1".to_string()],
        }
    }

    pub fn production() -> Self {
        Self {
            enforce_https: true,
            add_security_headers: true,
            trusted_proxies: vec![],
        }
    }

    /// Adds a trusted proxy to the whitelist
    pub fn with_trusted_proxy(mut self, proxy: impl Into<String>) -> Self {
        self.trusted_proxies.push(proxy.into());
        self
    }
}

impl<S, B> Transform<S, ServiceRequest> for SecurityMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = SecurityMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SecurityMiddlewareService {
            service: Rc::new(service),
            enforce_https: self.enforce_https,
            add_security_headers: self.add_security_headers,
            trusted_proxies: Rc::new(self.trusted_proxies.clone()),
        }))
    }
}

pub struct SecurityMiddlewareService<S> {
    service: Rc<S>,
    enforce_https: bool,
    add_security_headers: bool,
    trusted_proxies: Rc<Vec<String>>,
}

impl<S, B> Service<ServiceRequest> for SecurityMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let add_security_headers = self.add_security_headers;

        let rejection = if self.enforce_https && !is_secure_request(&req, &self.trusted_proxies) {
            tracing::warn!(method = %req.method(), path = %req.path(), "Insecure request blocked");
            Some(ApiError::Domain(DomainError::forbidden("HTTPS required")))
        } else if req
            .headers()
            .get(header::ORIGIN)
            .is_some_and(|origin| !is_well_formed_origin(origin))
        {
            tracing::warn!(method = %req.method(), path = %req.path(), "Malformed origin blocked");
            Some(ApiError::BadRequest("Invalid request origin".to_string()))
        } else {
            None
        };

        Box::pin(async move {
            if let Some(error) = rejection {
                let response = error.error_response();
                return Ok(req.into_response(response).map_into_right_body());
            }

            let mut response = service.call(req).await?;
            if add_security_headers {
                add_security_response_headers(&mut response);
            }
            Ok(response.map_into_left_body())
        })
    }
}

/// Checks if the request is secure (HTTPS or from trusted source)
fn is_secure_request(req: &ServiceRequest, trusted_proxies: &[String]) -> bool {
    if req.app_config().secure() {
        return true;
    }

    // Only trust X-Forwarded-Proto from a known proxy
    if let Some(forwarded_proto) = req.headers().get("x-forwarded-proto") {
        if let Ok(proto) = forwarded_proto.to_str() {
            let peer_addr = req
                .peer_addr()
                .map(|addr| addr.ip().to_string())
                .unwrap_or_default();
            if proto == "https" && trusted_proxies.iter().any(|p| p == &peer_addr) {
                return true;
            }
        }
    }

    let conn_info = req.connection_info();
    let host = conn_info.host();
    host == "localhost" || host.starts_with("localhost:") || host.starts_with("127.0.0.1") || host.starts_with("[::1]")
}

fn is_well_formed_origin(origin: &HeaderValue) -> bool {
    origin
        .to_str()
        .map(|o| o == "null" || o.starts_with("http://") || o.starts_with("https://"))
        .unwrap_or(false)
}

fn add_security_response_headers<B>(response: &mut ServiceResponse<B>) {
    let headers = response.headers_mut();

    headers.insert(
        header::STRICT_TRANSPORT_SECURITY,
        HeaderValue::from_static("max-age=31536000; includeSubDomains"),
    );
    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    headers.insert(
        header::REFERRER_POLICY,
        HeaderValue::from_static("no-referrer"),
    );
    // Responses carry PII
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    headers.insert(
        header::CONTENT_SECURITY_POLICY,
        HeaderValue::from_static("default-src 'none'; frame-ancestors 'none';"),
    );
}
