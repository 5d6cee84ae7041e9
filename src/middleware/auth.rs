use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    web, Error, HttpMessage, HttpResponse, ResponseError,
};
use futures::future::LocalBoxFuture;
use std::future::{ready, Ready};
use std::rc::Rc;

use crate::app_state::AppState;
use crate::services::auth_service::{Claims, TokenKind};
use crate::services::session_service::{clear_session_cookie, SESSION_COOKIE};
use crate::utils::AppError;

/// Verifies the `session` cookie, confirms the profile still exists and
/// stores the `Claims` in the request extensions.
pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
}

/// Orphaned sessions get a 401 plus a cleared cookie.
async fn authenticate(req: &ServiceRequest) -> Result<Claims, HttpResponse> {
    let Some(state) = req.app_data::<web::Data<AppState>>().cloned() else {
        return Err(AppError::Internal("Application state is not configured".to_string())
            .error_response());
    };
    let Some(cookie) = req.cookie(SESSION_COOKIE) else {
        return Err(AppError::Unauthorized("Authentication required".to_string()).error_response());
    };

    let claims = state
        .keys
        .verify(cookie.value(), TokenKind::Session)
        .map_err(|e| {
            log::warn!("⚠️  {} {} rejected: {}", req.method(), req.path(), e);
            AppError::Unauthorized("Session expired or invalid".to_string()).error_response()
        })?;

    match state.users.find_user(&claims.sub).await {
        Ok(Some(_)) => Ok(claims),
        Ok(None) => {
            log::warn!("⚠️  Session for {} has no profile, forcing sign-out", claims.sub);
            let mut response =
                AppError::Unauthorized("User profile not found".to_string()).error_response();
            if let Err(e) = response.add_cookie(&clear_session_cookie(state.auth.secure_cookies)) {
                log::error!("❌ Failed to clear session cookie: {}", e);
            }
            Err(response)
        }
        Err(e) => Err(e.error_response()),
    }
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            match authenticate(&req).await {
                Ok(claims) => {
                    req.extensions_mut().insert(claims);
                    service
                        .call(req)
                        .await
                        .map(ServiceResponse::map_into_left_body)
                }
                Err(response) => Ok(req.into_response(response).map_into_right_body()),
            }
        })
    }
}
