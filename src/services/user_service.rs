use crate::database::UserStore;
use crate::models::{Role, UserProfile};
use crate::services::session_service::require_admin;
use crate::utils::{AppError, AppResult};

pub async fn list_users(users: &dyn UserStore, caller_uid: &str) -> AppResult<Vec<UserProfile>> {
    require_admin(users, caller_uid).await?;
    users.list_users().await
}

/// Changes a user's role. Admins cannot demote themselves.
pub async fn update_role(
    users: &dyn UserStore,
    caller_uid: &str,
    target_uid: &str,
    role: Role,
) -> AppResult<UserProfile> {
    let admin = require_admin(users, caller_uid).await?;
    if admin.id == target_uid && role != Role::Admin {
        return Err(AppError::Validation(
            "Admins cannot remove their own admin role".to_string(),
        ));
    }

    let updated = users.update_role(target_uid, role).await?;
    log::info!(
        "✅ {} changed role of {} to {}",
        admin.email,
        updated.email,
        role.as_str()
    );
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::memory::MemoryStore;

    #[tokio::test]
    async fn test_role_changes_require_admin() {
        let store = MemoryStore::new();
        let admin = store
            .create_user("Root", "root@example.com", "hash", Role::Admin)
            .await
            .unwrap();
        let user = store
            .create_user("Ana", "ana@example.com", "hash", Role::User)
            .await
            .unwrap();

        let err = update_role(&store, &user.id, &user.id, Role::Admin).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));

        let promoted = update_role(&store, &admin.id, &user.id, Role::Admin).await.unwrap();
        assert_eq!(promoted.role, Role::Admin);

        let err = update_role(&store, &admin.id, "missing", Role::User).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let err = update_role(&store, &admin.id, &admin.id, Role::User).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        assert_eq!(list_users(&store, &admin.id).await.unwrap().len(), 2);
    }
}
