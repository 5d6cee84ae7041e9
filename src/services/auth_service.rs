use bcrypt::{hash, verify};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::database::UserStore;
use crate::models::{Role, UserProfile};
use crate::utils::{AppError, AppResult, AuthErrorCode};

pub const MIN_PASSWORD_LENGTH: usize = 6;
pub const ID_TOKEN_TTL_SECS: i64 = 60 * 60;
pub const SESSION_TTL_DAYS: i64 = 5;

/// Identity tokens prove a fresh sign-in; session tokens live in the cookie.
/// Each kind has its own audience so one can never stand in for the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Id,
    Session,
}

impl TokenKind {
    fn audience(&self, issuer: &str) -> String {
        match self {
            TokenKind::Id => format!("{}:id", issuer),
            TokenKind::Session => format!("{}:session", issuer),
        }
    }

    fn ttl(&self) -> Duration {
        match self {
            TokenKind::Id => Duration::seconds(ID_TOKEN_TTL_SECS),
            TokenKind::Session => Duration::days(SESSION_TTL_DAYS),
        }
    }
}

// JWT Claims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String, // user_id
    pub email: String,
    pub iat: usize,
    pub exp: usize,
    pub jti: String,
    pub aud: String,
    pub iss: String,
}

/// HS256 keys built once at startup.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    issuer: String,
}

impl JwtKeys {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            issuer: config.jwt_issuer.clone(),
        }
    }

    pub fn issue(&self, kind: TokenKind, profile: &UserProfile) -> AppResult<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: profile.id.clone(),
            email: profile.email.clone(),
            iat: now.timestamp() as usize,
            exp: (now + kind.ttl()).timestamp() as usize,
            jti: Uuid::new_v4().to_string(),
            aud: kind.audience(&self.issuer),
            iss: self.issuer.clone(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AppError::Internal(format!("Failed to generate token: {}", e)))
    }

    pub fn verify(&self, token: &str, kind: TokenKind) -> AppResult<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[kind.audience(&self.issuer)]);
        validation.set_issuer(&[self.issuer.as_str()]);

        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| AppError::Unauthorized(format!("Invalid token: {}", e)))
    }
}

// Request/Response structures
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub success: bool,
    /// Short-lived identity token, exchanged at `POST /api/auth/session`
    pub id_token: String,
    pub expires_in: i64,
    pub user: UserProfile,
}

/// Minimal shape check: one `@`, non-empty local part, dotted domain, no whitespace.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn hash_password(password: &str, cost: u32) -> AppResult<String> {
    hash(password, cost).map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
}

fn issue_identity(keys: &JwtKeys, user: UserProfile) -> AppResult<AuthResponse> {
    Ok(AuthResponse {
        success: true,
        id_token: keys.issue(TokenKind::Id, &user)?,
        expires_in: ID_TOKEN_TTL_SECS,
        user,
    })
}

pub async fn register(
    users: &dyn UserStore,
    keys: &JwtKeys,
    bcrypt_cost: u32,
    request: &RegisterRequest,
) -> AppResult<AuthResponse> {
    let email = normalize_email(&request.email);
    if !is_valid_email(&email) {
        return Err(AppError::Auth(AuthErrorCode::InvalidEmail));
    }
    if request.password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AppError::Auth(AuthErrorCode::WeakPassword));
    }
    if users.find_user_by_email(&email).await?.is_some() {
        return Err(AppError::Auth(AuthErrorCode::EmailAlreadyInUse));
    }

    let name = match request.name.trim() {
        "" => email.split('@').next().unwrap_or_default().to_string(),
        name => name.to_string(),
    };
    let password_hash = hash_password(&request.password, bcrypt_cost)?;

    let user = users
        .create_user(&name, &email, &password_hash, Role::User)
        .await
        .map_err(|e| match e {
            AppError::Conflict(_) => AppError::Auth(AuthErrorCode::EmailAlreadyInUse),
            other => other,
        })?;

    log::info!("✅ User registered successfully: {}", email);
    issue_identity(keys, user)
}

pub async fn login(
    users: &dyn UserStore,
    keys: &JwtKeys,
    request: &LoginRequest,
) -> AppResult<AuthResponse> {
    let email = normalize_email(&request.email);

    let user = users
        .find_user_by_email(&email)
        .await?
        .ok_or(AppError::Auth(AuthErrorCode::InvalidCredential))?;

    let valid = verify(&request.password, &user.password_hash).map_err(|e| {
        log::error!("❌ Password verification error for {}: {}", email, e);
        AppError::Auth(AuthErrorCode::InvalidCredential)
    })?;
    if !valid {
        log::warn!("⚠️  Failed sign-in for {}", email);
        return Err(AppError::Auth(AuthErrorCode::InvalidCredential));
    }

    log::info!("✅ User signed in: {}", email);
    issue_identity(keys, user.profile)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::database::memory::MemoryStore;

    pub(crate) const TEST_COST: u32 = 4;

    pub(crate) fn test_keys() -> JwtKeys {
        JwtKeys::new(&AuthConfig {
            jwt_secret: "test-secret".to_string(),
            jwt_issuer: "influence-finder-test".to_string(),
            secure_cookies: false,
            bcrypt_cost: TEST_COST,
        })
    }

    fn register_request(email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            name: "Ana".to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let store = MemoryStore::new();
        let keys = test_keys();

        let registered = register(&store, &keys, TEST_COST, &register_request(" Ana@Example.com ", "secret1"))
            .await
            .unwrap();
        assert_eq!(registered.user.email, "ana@example.com");
        assert_eq!(registered.user.role, Role::User);

        let claims = keys.verify(&registered.id_token, TokenKind::Id).unwrap();
        assert_eq!(claims.sub, registered.user.id);

        let logged_in = login(
            &store,
            &keys,
            &LoginRequest {
                email: "ANA@example.com".to_string(),
                password: "secret1".to_string(),
            },
        )
        .await
        .unwrap();
        assert_eq!(logged_in.user.id, registered.user.id);
    }

    #[tokio::test]
    async fn test_register_error_codes() {
        let store = MemoryStore::new();
        let keys = test_keys();

        let err = register(&store, &keys, TEST_COST, &register_request("not-an-email", "secret1"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Auth(AuthErrorCode::InvalidEmail)));

        let err = register(&store, &keys, TEST_COST, &register_request("a@b.co", "12345"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Auth(AuthErrorCode::WeakPassword)));

        register(&store, &keys, TEST_COST, &register_request("a@b.co", "123456"))
            .await
            .unwrap();
        let err = register(&store, &keys, TEST_COST, &register_request("A@B.co", "123456"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Auth(AuthErrorCode::EmailAlreadyInUse)));
    }

    #[tokio::test]
    async fn test_wrong_password_is_invalid_credential() {
        let store = MemoryStore::new();
        let keys = test_keys();
        register(&store, &keys, TEST_COST, &register_request("a@b.co", "123456"))
            .await
            .unwrap();

        for (email, password) in [("a@b.co", "654321"), ("nobody@b.co", "123456")] {
            let err = login(
                &store,
                &keys,
                &LoginRequest {
                    email: email.to_string(),
                    password: password.to_string(),
                },
            )
            .await
            .unwrap_err();
            assert!(matches!(err, AppError::Auth(AuthErrorCode::InvalidCredential)));
        }
    }

    #[test]
    fn test_token_kinds_are_not_interchangeable() {
        let keys = test_keys();
        let profile = UserProfile {
            id: "u1".to_string(),
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            role: Role::User,
            created_at: 0,
            last_login: None,
        };

        let id_token = keys.issue(TokenKind::Id, &profile).unwrap();
        let session_token = keys.issue(TokenKind::Session, &profile).unwrap();

        assert!(keys.verify(&id_token, TokenKind::Session).is_err());
        assert!(keys.verify(&session_token, TokenKind::Id).is_err());
        assert_eq!(keys.verify(&session_token, TokenKind::Session).unwrap().sub, "u1");
    }

    #[test]
    fn test_email_validation() {
        assert!(is_valid_email("ana@example.com"));
        assert!(!is_valid_email("ana@example"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("ana example@x.com"));
        assert!(!is_valid_email("ana@@example.com"));
    }
}
