use actix_web::{web, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::app_state::AppState;
use crate::models::UserProfile;
use crate::services::auth_service::TokenKind;
use crate::services::session_service::{
    self, clear_session_cookie, session_cookie, SessionState, SESSION_COOKIE,
};
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionRequest {
    pub id_token: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct SessionResponse {
    pub success: bool,
    pub user: UserProfile,
}

fn signed_out(state: &AppState, message: &str) -> HttpResponse {
    HttpResponse::Unauthorized()
        .cookie(clear_session_cookie(state.auth.secure_cookies))
        .json(serde_json::json!({
            "success": false,
            "error": message,
        }))
}

#[utoipa::path(
    post,
    path = "/api/auth/session",
    tag = "Session",
    request_body = SessionRequest,
    responses(
        (status = 200, description = "Session cookie set", body = SessionResponse),
        (status = 401, description = "Invalid identity token or missing profile")
    )
)]
pub async fn create_session(
    state: web::Data<AppState>,
    request: web::Json<SessionRequest>,
) -> AppResult<HttpResponse> {
    match session_service::establish_session(state.users.as_ref(), &state.keys, &request.id_token)
        .await?
    {
        SessionState::Authenticated(profile) => {
            let token = state.keys.issue(TokenKind::Session, &profile)?;
            Ok(HttpResponse::Ok()
                .cookie(session_cookie(token, state.auth.secure_cookies))
                .json(SessionResponse {
                    success: true,
                    user: profile,
                }))
        }
        SessionState::PendingProfile { .. } | SessionState::Anonymous => {
            Ok(signed_out(&state, "User profile not found"))
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/auth/session",
    tag = "Session",
    responses(
        (status = 200, description = "Current user", body = SessionResponse),
        (status = 401, description = "No valid session")
    ),
    security(("session_cookie" = []))
)]
pub async fn get_session(state: web::Data<AppState>, req: HttpRequest) -> AppResult<HttpResponse> {
    let cookie = req.cookie(SESSION_COOKIE);
    let session = session_service::resolve_session(
        state.users.as_ref(),
        &state.keys,
        cookie.as_ref().map(|c| c.value()),
    )
    .await?;

    match session {
        SessionState::Authenticated(profile) => Ok(HttpResponse::Ok().json(SessionResponse {
            success: true,
            user: profile,
        })),
        SessionState::PendingProfile { .. } => Ok(signed_out(&state, "User profile not found")),
        SessionState::Anonymous => Err(AppError::Unauthorized("Not signed in".to_string())),
    }
}

#[utoipa::path(
    delete,
    path = "/api/auth/session",
    tag = "Session",
    responses(
        (status = 200, description = "Session cookie cleared")
    )
)]
pub async fn delete_session(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok()
        .cookie(clear_session_cookie(state.auth.secure_cookies))
        .json(serde_json::json!({ "success": true }))
}
