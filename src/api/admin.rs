// ==================== ADMIN ====================
// Toda ação re-lê o perfil do chamador e exige role admin

use actix_web::{web, HttpResponse};

use crate::app_state::AppState;
use crate::models::{City, CreateCityRequest, UpdateRoleRequest, UserProfile};
use crate::services::auth_service::Claims;
use crate::services::session_service::require_admin;
use crate::services::{city_service, user_service};
use crate::utils::AppResult;

#[utoipa::path(
    get,
    path = "/api/v1/admin/users",
    tag = "Admin",
    responses(
        (status = 200, description = "All users ordered by creation", body = Vec<UserProfile>),
        (status = 403, description = "Caller is not an admin")
    ),
    security(("session_cookie" = []))
)]
pub async fn list_users(
    state: web::Data<AppState>,
    claims: web::ReqData<Claims>,
) -> AppResult<HttpResponse> {
    let users = user_service::list_users(state.users.as_ref(), &claims.sub).await?;
    Ok(HttpResponse::Ok().json(users))
}

#[utoipa::path(
    patch,
    path = "/api/v1/admin/users/{id}/role",
    tag = "Admin",
    params(("id" = String, Path, description = "User id")),
    request_body = UpdateRoleRequest,
    responses(
        (status = 200, description = "Updated profile", body = UserProfile),
        (status = 403, description = "Caller is not an admin"),
        (status = 404, description = "User not found")
    ),
    security(("session_cookie" = []))
)]
pub async fn update_user_role(
    state: web::Data<AppState>,
    claims: web::ReqData<Claims>,
    path: web::Path<String>,
    request: web::Json<UpdateRoleRequest>,
) -> AppResult<HttpResponse> {
    let user_id = path.into_inner();
    let updated =
        user_service::update_role(state.users.as_ref(), &claims.sub, &user_id, request.role)
            .await?;
    Ok(HttpResponse::Ok().json(updated))
}

#[utoipa::path(
    post,
    path = "/api/v1/admin/cities",
    tag = "Admin",
    request_body = CreateCityRequest,
    responses(
        (status = 201, description = "City created", body = City),
        (status = 400, description = "Blank name"),
        (status = 403, description = "Caller is not an admin"),
        (status = 409, description = "City already exists")
    ),
    security(("session_cookie" = []))
)]
pub async fn create_city(
    state: web::Data<AppState>,
    claims: web::ReqData<Claims>,
    request: web::Json<CreateCityRequest>,
) -> AppResult<HttpResponse> {
    require_admin(state.users.as_ref(), &claims.sub).await?;
    let city = city_service::add_city(state.influencers.as_ref(), &request.name).await?;
    Ok(HttpResponse::Created().json(city))
}

#[utoipa::path(
    delete,
    path = "/api/v1/admin/cities/{id}",
    tag = "Admin",
    params(("id" = String, Path, description = "City id")),
    responses(
        (status = 200, description = "City and its influencers removed"),
        (status = 403, description = "Caller is not an admin"),
        (status = 404, description = "City not found")
    ),
    security(("session_cookie" = []))
)]
pub async fn delete_city(
    state: web::Data<AppState>,
    claims: web::ReqData<Claims>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    require_admin(state.users.as_ref(), &claims.sub).await?;
    let city_id = path.into_inner();
    city_service::delete_city(state.influencers.as_ref(), &city_id).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "success": true })))
}
