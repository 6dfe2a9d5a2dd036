use crate::core::AppError;
use crate::modules::auth::services::Claims;
use crate::state::AppState;
use actix_web::{
    body::{BoxBody, EitherBody},
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::AUTHORIZATION,
    web, Error, HttpMessage, ResponseError,
};
use futures_util::future::LocalBoxFuture;
use std::future::{ready, Ready};
use std::rc::Rc;

/// Role every management endpoint requires
pub const ADMIN_ROLE: &str = "ADMIN";

/// Bearer token authorization middleware
///
/// Verifies the token against the JWT settings in [`AppState`] and, on
/// success, stores the [`Claims`] in the request extensions.
#[derive(Clone)]
pub struct JwtAuth {
    role: Rc<str>,
}

impl JwtAuth {
    pub fn require_role(role: &str) -> Self {
        Self { role: Rc::from(role) }
    }

    pub fn admin() -> Self {
        Self::require_role(ADMIN_ROLE)
    }
}

impl<S, B> Transform<S, ServiceRequest> for JwtAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<BoxBody, B>>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtAuthMiddleware<S>;
    type Future = Ready<std::result::Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtAuthMiddleware {
            service: Rc::new(service),
            role: self.role.clone(),
        }))
    }
}

pub struct JwtAuthMiddleware<S> {
    service: Rc<S>,
    role: Rc<str>,
}

impl<S, B> Service<ServiceRequest> for JwtAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<BoxBody, B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, std::result::Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let svc = self.service.clone();
        let role = self.role.clone();

        Box::pin(async move {
            match authorize(&req, &role) {
                Ok(claims) => {
                    req.extensions_mut().insert(claims);
                    svc.call(req).await.map(|res| res.map_into_right_body())
                }
                Err(err) => {
                    tracing::debug!(path = %req.path(), error = %err, "Request rejected");
                    Ok(req.into_response(err.error_response()).map_into_left_body())
                }
            }
        })
    }
}

fn authorize(req: &ServiceRequest, role: &str) -> crate::core::Result<Claims> {
    let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or_else(|| AppError::internal("Application state is not configured"))?;

    let header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::unauthorized("Missing Authorization header"))?;

    let token = header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::unauthorized("Authorization header is not a bearer token"))?;

    let claims = state.auth_service().verify(token)?;
    if !claims.has_role(role) {
        return Err(AppError::forbidden(format!("Role {} required", role)));
    }

    Ok(claims)
}
