use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, DateTime};
use mongodb::options::ReturnDocument;
use serde::{Deserialize, Serialize};

use super::{is_duplicate_key, MongoDB, UserStore};
use crate::models::{Role, UserProfile, UserRecord};
use crate::utils::{AppError, AppResult};

pub const USERS: &str = "users";

// User document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,
    pub user_id: String, // PRIMARY IDENTIFIER
    pub name: String,
    pub email: String,
    pub password_hash: String,
    #[serde(default)]
    pub role: Role,
    pub created_at: DateTime,
    #[serde(default)]
    pub last_login: Option<DateTime>,
}

impl From<UserDocument> for UserRecord {
    fn from(doc: UserDocument) -> Self {
        UserRecord {
            profile: UserProfile {
                id: doc.user_id,
                name: doc.name,
                email: doc.email,
                role: doc.role,
                created_at: doc.created_at.timestamp_millis() / 1000,
                last_login: doc.last_login.map(|t| t.timestamp_millis() / 1000),
            },
            password_hash: doc.password_hash,
        }
    }
}

impl From<UserDocument> for UserProfile {
    fn from(doc: UserDocument) -> Self {
        UserRecord::from(doc).profile
    }
}

#[async_trait]
impl UserStore for MongoDB {
    async fn create_user(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
        role: Role,
    ) -> AppResult<UserProfile> {
        let user = UserDocument {
            _id: None,
            user_id: ObjectId::new().to_hex(),
            name: name.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            role,
            created_at: DateTime::now(),
            last_login: None,
        };

        match self.collection::<UserDocument>(USERS).insert_one(&user).await {
            Ok(_) => Ok(user.into()),
            Err(e) if is_duplicate_key(&e) => {
                Err(AppError::Conflict(format!("User {} already exists", email)))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn find_user(&self, user_id: &str) -> AppResult<Option<UserProfile>> {
        let user = self
            .collection::<UserDocument>(USERS)
            .find_one(doc! { "user_id": user_id })
            .await?;
        Ok(user.map(UserProfile::from))
    }

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<UserRecord>> {
        let user = self
            .collection::<UserDocument>(USERS)
            .find_one(doc! { "email": email })
            .await?;
        Ok(user.map(UserRecord::from))
    }

    async fn touch_last_login(&self, user_id: &str) -> AppResult<()> {
        self.collection::<UserDocument>(USERS)
            .update_one(
                doc! { "user_id": user_id },
                doc! { "$set": { "last_login": DateTime::now() } },
            )
            .await?;
        Ok(())
    }

    async fn list_users(&self) -> AppResult<Vec<UserProfile>> {
        let users: Vec<UserDocument> = self
            .collection::<UserDocument>(USERS)
            .find(doc! {})
            .sort(doc! { "created_at": 1 })
            .await?
            .try_collect()
            .await?;

        Ok(users.into_iter().map(UserProfile::from).collect())
    }

    async fn update_role(&self, user_id: &str, role: Role) -> AppResult<UserProfile> {
        let updated = self
            .collection::<UserDocument>(USERS)
            .find_one_and_update(
                doc! { "user_id": user_id },
                doc! { "$set": { "role": role.as_str() } },
            )
            .return_document(ReturnDocument::After)
            .await?;

        updated
            .map(UserProfile::from)
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", user_id)))
    }
}
