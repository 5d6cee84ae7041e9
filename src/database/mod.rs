pub mod cities;
pub mod users;

#[cfg(test)]
pub mod memory;

use async_trait::async_trait;
use mongodb::bson::doc;
use mongodb::options::IndexOptions;
use mongodb::{Client, ClientSession, Collection, Database, IndexModel};

use crate::models::{City, Influencer, Role, UserProfile, UserRecord};
use crate::utils::{AppError, AppResult};

const DEFAULT_DATABASE: &str = "influence_finder";

/// Storage for cities and their cached influencers.
#[async_trait]
pub trait InfluencerStore: Send + Sync {
    /// All cities ordered by name.
    async fn get_all_cities(&self) -> AppResult<Vec<City>>;

    /// Case-insensitive lookup by name.
    async fn find_city(&self, name: &str) -> AppResult<Option<City>>;

    /// Influencers cached under `city_name`; empty when the city is unknown.
    async fn get_influencers_by_city(&self, city_name: &str) -> AppResult<Vec<Influencer>>;

    /// Finds or creates the city and upserts every record by id, atomically.
    async fn save_influencers(&self, city_name: &str, records: &[Influencer]) -> AppResult<City>;

    async fn add_city(&self, name: &str) -> AppResult<City>;

    /// Removes the city together with its influencers.
    async fn delete_city(&self, city_id: &str) -> AppResult<()>;

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}

/// Storage for user profiles.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fails with `Conflict` when the email is taken.
    async fn create_user(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
        role: Role,
    ) -> AppResult<UserProfile>;

    async fn find_user(&self, user_id: &str) -> AppResult<Option<UserProfile>>;

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<UserRecord>>;

    async fn touch_last_login(&self, user_id: &str) -> AppResult<()>;

    async fn list_users(&self) -> AppResult<Vec<UserProfile>>;

    async fn update_role(&self, user_id: &str, role: Role) -> AppResult<UserProfile>;
}

#[derive(Clone)]
pub struct MongoDB {
    client: Client,
    db: Database,
}

impl MongoDB {
    pub async fn new(uri: &str) -> AppResult<Self> {
        let mut client_options = mongodb::options::ClientOptions::parse(uri).await?;

        // Connection pool
        client_options.max_pool_size = Some(20);
        client_options.min_pool_size = Some(5);
        client_options.max_idle_time = Some(std::time::Duration::from_secs(300));

        client_options.connect_timeout = Some(std::time::Duration::from_secs(5));
        client_options.server_selection_timeout = Some(std::time::Duration::from_secs(5));

        let db_name = client_options
            .default_database
            .clone()
            .unwrap_or_else(|| DEFAULT_DATABASE.to_string());

        let client = Client::with_options(client_options)?;
        let db = client.database(&db_name);

        // Test connection
        db.list_collection_names().await?;

        let mongodb = Self { client, db };
        mongodb.ensure_indexes().await?;

        Ok(mongodb)
    }

    /// Unique indexes back the case-insensitive city name and the per-city upsert key.
    async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("🔧 Creating database indexes...");

        let unique = || IndexOptions::builder().unique(true).build();

        let indexes: [(&str, IndexModel); 5] = [
            (
                cities::CITIES,
                IndexModel::builder()
                    .keys(doc! { "name_lower": 1 })
                    .options(unique())
                    .build(),
            ),
            (
                cities::CREATORS,
                IndexModel::builder()
                    .keys(doc! { "city_id": 1, "id": 1 })
                    .options(unique())
                    .build(),
            ),
            (
                cities::CITIES,
                IndexModel::builder().keys(doc! { "name": 1 }).build(),
            ),
            (
                users::USERS,
                IndexModel::builder()
                    .keys(doc! { "user_id": 1 })
                    .options(unique())
                    .build(),
            ),
            (
                users::USERS,
                IndexModel::builder()
                    .keys(doc! { "email": 1 })
                    .options(unique())
                    .build(),
            ),
        ];

        for (collection, index) in indexes {
            let keys = index.keys.clone();
            self.collection::<mongodb::bson::Document>(collection)
                .create_index(index)
                .await
                .map_err(|e| {
                    AppError::Database(format!("Failed to create index on {}: {}", collection, e))
                })?;
            log::info!("   ✅ Index ready: {}({:?})", collection, keys.keys().collect::<Vec<_>>());
        }

        log::info!("✅ Database indexes ready");

        Ok(())
    }

    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.db.collection(name)
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub async fn health_check(&self) -> AppResult<()> {
        self.db.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }
}

/// Commits on success, aborts on failure and hands back the original result.
pub(crate) async fn finish_transaction<T>(
    session: &mut ClientSession,
    result: AppResult<T>,
) -> AppResult<T> {
    match result {
        Ok(value) => {
            session.commit_transaction().await?;
            Ok(value)
        }
        Err(e) => {
            if let Err(abort_err) = session.abort_transaction().await {
                log::warn!("⚠️  Failed to abort transaction: {}", abort_err);
            }
            Err(e)
        }
    }
}

pub(crate) fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    use mongodb::error::{ErrorKind, WriteFailure};

    match *err.kind {
        ErrorKind::Write(WriteFailure::WriteError(ref write_error)) => write_error.code == 11000,
        _ => false,
    }
}
