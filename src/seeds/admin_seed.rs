use crate::database::UserStore;
use crate::models::Role;
use crate::services::auth_service::{hash_password, normalize_email};
use crate::utils::AppResult;

/// Garante o admin inicial a partir de ADMIN_EMAIL / ADMIN_PASSWORD.
/// Promove a conta se já existir; cria quando há senha.
pub async fn seed_admin(
    users: &dyn UserStore,
    email: Option<&str>,
    password: Option<&str>,
    bcrypt_cost: u32,
) -> AppResult<()> {
    let Some(email) = email.map(normalize_email).filter(|e| !e.is_empty()) else {
        log::info!("👤 ADMIN_EMAIL not set, skipping admin seed");
        return Ok(());
    };

    if let Some(existing) = users.find_user_by_email(&email).await? {
        if existing.profile.is_admin() {
            log::info!("👤 Admin {} already present", email);
        } else {
            users.update_role(&existing.profile.id, Role::Admin).await?;
            log::info!("   ✅ Promoted {} to admin", email);
        }
        return Ok(());
    }

    let Some(password) = password else {
        log::warn!("⚠️  Admin {} does not exist and ADMIN_PASSWORD is not set", email);
        return Ok(());
    };

    let password_hash = hash_password(password, bcrypt_cost)?;
    let name = email.split('@').next().unwrap_or("admin").to_string();
    users
        .create_user(&name, &email, &password_hash, Role::Admin)
        .await?;
    log::info!("   ✅ Created admin account {}", email);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::memory::MemoryStore;

    #[tokio::test]
    async fn test_promotes_existing_user() {
        let store = MemoryStore::new();
        store
            .create_user("Ana", "ana@example.com", "hash", Role::User)
            .await
            .unwrap();

        seed_admin(&store, Some("ANA@example.com"), None, 4).await.unwrap();

        let record = store.find_user_by_email("ana@example.com").await.unwrap().unwrap();
        assert_eq!(record.profile.role, Role::Admin);
    }

    #[tokio::test]
    async fn test_creates_admin_when_password_given() {
        let store = MemoryStore::new();

        seed_admin(&store, Some("root@example.com"), None, 4).await.unwrap();
        assert!(store.list_users().await.unwrap().is_empty());

        seed_admin(&store, Some("root@example.com"), Some("changeme"), 4)
            .await
            .unwrap();
        let users = store.list_users().await.unwrap();
        assert_eq!(users.len(), 1);
        assert!(users[0].is_admin());
    }
}
