//! JWT authentication middleware for protecting API endpoints.
//!
//! The middleware extracts the bearer token from the Authorization header,
//! verifies it with the core `TokenService` and injects an [`AuthContext`]
//! into the request extensions. Handlers take `AuthContext` as an extractor
//! and turn it into the `Actor` the services expect.

use actix_web::{
    body::EitherBody,
    dev::{Payload, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::{AUTHORIZATION, USER_AGENT},
    Error, FromRequest, HttpMessage, HttpRequest, ResponseError,
};
use futures_util::future::LocalBoxFuture;
use std::{
    future::{ready, Ready},
    rc::Rc,
    sync::Arc,
    task::{Context, Poll},
};
use uuid::Uuid;

use kurator_core::domain::entities::token::Claims;
use kurator_core::errors::DomainError;
use kurator_core::services::TokenService;
use kurator_core::{Actor, RequestOrigin, UserRole};

use crate::handlers::ApiError;

/// Authenticated caller injected into requests
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user_id: Uuid,
    pub login: String,
    /// Role at token issue time; services re-read the stored role
    pub role: UserRole,
    /// JWT ID for tracing
    pub jti: String,
    pub origin: RequestOrigin,
}

impl AuthContext {
    pub fn from_claims(claims: Claims, origin: RequestOrigin) -> Result<Self, DomainError> {
        let user_id = claims.user_id().map_err(DomainError::Token)?;
        Ok(Self {
            user_id,
            login: claims.login,
            role: claims.role,
            jti: claims.jti,
            origin,
        })
    }

    pub fn actor(&self) -> Actor {
        Actor::new(self.user_id, self.role).with_origin(self.origin.clone())
    }
}

/// JWT authentication middleware factory
pub struct JwtAuth {
    tokens: Arc<TokenService>,
}

impl JwtAuth {
    pub fn new(tokens: Arc<TokenService>) -> Self {
        Self { tokens }
    }
}

impl<S, B> Transform<S, ServiceRequest> for JwtAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtAuthMiddleware {
            service: Rc::new(service),
            tokens: Arc::clone(&self.tokens),
        }))
    }
}

/// JWT authentication middleware service
pub struct JwtAuthMiddleware<S> {
    service: Rc<S>,
    tokens: Arc<TokenService>,
}

impl<S, B> Service<ServiceRequest> for JwtAuthMiddleware<S>
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
        let verified = authenticate(&req, &self.tokens);

        Box::pin(async move {
            let context = match verified {
                Ok(context) => context,
                Err(error) => {
                    tracing::debug!(path = %req.path(), error = %error, "Rejected unauthenticated request");
                    let response = ApiError::from(error).error_response();
                    return Ok(req.into_response(response).map_into_right_body());
                }
            };

            req.extensions_mut().insert(context);

            service.call(req).await.map(ServiceResponse::map_into_left_body)
        })
    }
}

fn authenticate(req: &ServiceRequest, tokens: &TokenService) -> Result<AuthContext, DomainError> {
    let token = extract_bearer_token(req).ok_or(DomainError::Unauthorized)?;
    let claims = tokens.verify(&token)?;
    AuthContext::from_claims(claims, request_origin(req.request()))
}

/// Extracts Bearer token from Authorization header
fn extract_bearer_token(req: &ServiceRequest) -> Option<String> {
    req.headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Client address and user agent for the audit trail.
///
/// The address honours `Forwarded` / `X-Forwarded-For` before falling back
/// to the peer address; the port is dropped.
pub fn request_origin(req: &HttpRequest) -> RequestOrigin {
    let ip_address = req
        .connection_info()
        .realip_remote_addr()
        .map(strip_port);
    let user_agent = req
        .headers()
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    RequestOrigin::new(ip_address, user_agent)
}

fn strip_port(addr: &str) -> String {
    // [::1]:8080
    if let Some(rest) = addr.strip_prefix('[') {
        if let Some((host, _)) = rest.split_once(']') {
            return host.to_string();
        }
    }
    // 10.0.0.1:8080, but leave bare IPv6 alone
    match addr.rsplit_once(':') {
        Some((host, port)) if !host.contains(':') && port.chars().all(|c| c.is_ascii_digit()) => {
            host.to_string()
        }
        _ => addr.to_string(),
    }
}

/// Extractor for required authentication
impl FromRequest for AuthContext {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let result = req
            .extensions()
            .get::<AuthContext>()
            .cloned()
            .ok_or_else(|| ApiError::unauthorized().into());

        ready(result)
    }
}
