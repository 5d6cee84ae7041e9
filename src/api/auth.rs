use actix_web::{web, HttpResponse};

use crate::app_state::AppState;
use crate::services::auth_service::{self, AuthResponse, LoginRequest, RegisterRequest};
use crate::utils::AppResult;

#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    tag = "Auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created, identity token issued", body = AuthResponse),
        (status = 400, description = "Invalid email, weak password or email already in use")
    )
)]
pub async fn register(
    state: web::Data<AppState>,
    request: web::Json<RegisterRequest>,
) -> AppResult<HttpResponse> {
    log::info!("📝 POST /auth/register - email: {}", request.email);

    let response = auth_service::register(
        state.users.as_ref(),
        &state.keys,
        state.auth.bcrypt_cost,
        &request,
    )
    .await?;
    Ok(HttpResponse::Created().json(response))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Credentials verified, identity token issued", body = AuthResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    state: web::Data<AppState>,
    request: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    log::info!("🔐 POST /auth/login - email: {}", request.email);

    let response = auth_service::login(state.users.as_ref(), &state.keys, &request).await?;
    Ok(HttpResponse::Ok().json(response))
}
