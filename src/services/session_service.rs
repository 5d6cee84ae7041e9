// ==================== SESSION ====================
// Anonymous -> PendingProfile (token verificado) -> Authenticated (perfil carregado)

use actix_web::cookie::{time::Duration as CookieDuration, Cookie, SameSite};

use crate::database::UserStore;
use crate::models::UserProfile;
use crate::services::auth_service::{JwtKeys, TokenKind, SESSION_TTL_DAYS};
use crate::utils::{AppError, AppResult};

pub const SESSION_COOKIE: &str = "session";

#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Anonymous,
    /// Credential verified but the profile has not been loaded (or no longer exists).
    PendingProfile { uid: String },
    Authenticated(UserProfile),
}

pub fn session_cookie(token: String, secure: bool) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, token)
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(CookieDuration::days(SESSION_TTL_DAYS))
        .finish()
}

pub fn clear_session_cookie(secure: bool) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, "")
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(CookieDuration::ZERO)
        .finish()
}

async fn load_profile(users: &dyn UserStore, uid: String) -> AppResult<SessionState> {
    Ok(match users.find_user(&uid).await? {
        Some(profile) => SessionState::Authenticated(profile),
        None => {
            log::warn!("⚠️  Session for {} has no profile, forcing sign-out", uid);
            SessionState::PendingProfile { uid }
        }
    })
}

/// Exchanges an identity token for a session. Invalid tokens are `Unauthorized`.
pub async fn establish_session(
    users: &dyn UserStore,
    keys: &JwtKeys,
    id_token: &str,
) -> AppResult<SessionState> {
    let claims = keys
        .verify(id_token, TokenKind::Id)
        .map_err(|_| AppError::Unauthorized("Invalid or expired ID token".to_string()))?;

    let state = load_profile(users, claims.sub).await?;
    if let SessionState::Authenticated(profile) = &state {
        users.touch_last_login(&profile.id).await?;
        log::info!("✅ Session created for {}", profile.email);
    }
    Ok(state)
}

/// Resolves the session cookie, if any, into a state.
pub async fn resolve_session(
    users: &dyn UserStore,
    keys: &JwtKeys,
    cookie: Option<&str>,
) -> AppResult<SessionState> {
    let Some(token) = cookie.filter(|t| !t.is_empty()) else {
        return Ok(SessionState::Anonymous);
    };

    match keys.verify(token, TokenKind::Session) {
        Ok(claims) => load_profile(users, claims.sub).await,
        Err(e) => {
            log::warn!("⚠️  Rejected session cookie: {}", e);
            Ok(SessionState::Anonymous)
        }
    }
}

/// Re-reads the caller's profile and requires the admin role.
pub async fn require_admin(users: &dyn UserStore, uid: &str) -> AppResult<UserProfile> {
    let profile = users
        .find_user(uid)
        .await?
        .ok_or_else(|| AppError::Unauthorized("User profile not found".to_string()))?;

    if !profile.is_admin() {
        log::warn!("⚠️  User {} attempted an admin action", profile.email);
        return Err(AppError::Forbidden("Admin access required".to_string()));
    }
    Ok(profile)
}
