use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, DateTime, Document};
use mongodb::ClientSession;
use serde::{Deserialize, Serialize};

use super::{finish_transaction, is_duplicate_key, InfluencerStore, MongoDB};
use crate::models::{city_key, City, Influencer};
use crate::utils::{AppError, AppResult};

pub const CITIES: &str = "cities";
pub const CREATORS: &str = "creators";

/// Documento da collection "cities"
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CityDocument {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    /// Lower-cased name carrying the unique index
    pub name_lower: String,
    pub created_at: DateTime,
}

impl From<CityDocument> for City {
    fn from(doc: CityDocument) -> Self {
        City {
            id: doc.id.to_hex(),
            name: doc.name,
            created_at: doc.created_at.timestamp_millis() / 1000,
        }
    }
}

impl MongoDB {
    async fn find_city_document(&self, name: &str) -> AppResult<Option<CityDocument>> {
        let city = self
            .collection::<CityDocument>(CITIES)
            .find_one(doc! { "name_lower": city_key(name) })
            .await?;
        Ok(city)
    }

    async fn save_in_transaction(
        &self,
        session: &mut ClientSession,
        city_name: &str,
        records: &[Influencer],
    ) -> AppResult<City> {
        let cities = self.collection::<CityDocument>(CITIES);
        let key = city_key(city_name);

        let existing = cities
            .find_one(doc! { "name_lower": &key })
            .session(&mut *session)
            .await?;

        let city = match existing {
            Some(city) => city,
            None => {
                let city = CityDocument {
                    id: ObjectId::new(),
                    name: city_name.trim().to_string(),
                    name_lower: key,
                    created_at: DateTime::now(),
                };
                cities.insert_one(&city).session(&mut *session).await?;
                log::info!("🏙️  Created city '{}' ({})", city.name, city.id.to_hex());
                city
            }
        };

        let creators = self.collection::<Document>(CREATORS);
        let now = DateTime::now();

        for influencer in records {
            let mut document = mongodb::bson::to_document(influencer)?;
            document.insert("city_id", city.id);
            document.insert("updated_at", now);

            creators
                .replace_one(doc! { "city_id": city.id, "id": &influencer.id }, document)
                .upsert(true)
                .session(&mut *session)
                .await?;
        }

        Ok(city.into())
    }

    async fn delete_in_transaction(
        &self,
        session: &mut ClientSession,
        city_id: ObjectId,
    ) -> AppResult<()> {
        let deleted = self
            .collection::<CityDocument>(CITIES)
            .delete_one(doc! { "_id": city_id })
            .session(&mut *session)
            .await?;

        if deleted.deleted_count == 0 {
            return Err(AppError::NotFound("City not found".to_string()));
        }

        let creators = self
            .collection::<Document>(CREATORS)
            .delete_many(doc! { "city_id": city_id })
            .session(&mut *session)
            .await?;

        log::info!(
            "🗑️  Deleted city {} and {} cached influencers",
            city_id.to_hex(),
            creators.deleted_count
        );
        Ok(())
    }
}

#[async_trait]
impl InfluencerStore for MongoDB {
    async fn get_all_cities(&self) -> AppResult<Vec<City>> {
        let cities: Vec<CityDocument> = self
            .collection::<CityDocument>(CITIES)
            .find(doc! {})
            .sort(doc! { "name": 1 })
            .await?
            .try_collect()
            .await?;

        Ok(cities.into_iter().map(City::from).collect())
    }

    async fn find_city(&self, name: &str) -> AppResult<Option<City>> {
        Ok(self.find_city_document(name).await?.map(City::from))
    }

    async fn get_influencers_by_city(&self, city_name: &str) -> AppResult<Vec<Influencer>> {
        let Some(city) = self.find_city_document(city_name).await? else {
            return Ok(Vec::new());
        };

        let influencers: Vec<Influencer> = self
            .collection::<Influencer>(CREATORS)
            .find(doc! { "city_id": city.id })
            .await?
            .try_collect()
            .await?;

        Ok(influencers)
    }

    async fn save_influencers(&self, city_name: &str, records: &[Influencer]) -> AppResult<City> {
        let mut session = self.client().start_session().await?;
        session.start_transaction().await?;

        let result = self.save_in_transaction(&mut session, city_name, records).await;
        finish_transaction(&mut session, result).await
    }

    async fn add_city(&self, name: &str) -> AppResult<City> {
        if self.find_city_document(name).await?.is_some() {
            return Err(AppError::Conflict(format!("City '{}' already exists", name.trim())));
        }

        let city = CityDocument {
            id: ObjectId::new(),
            name: name.trim().to_string(),
            name_lower: city_key(name),
            created_at: DateTime::now(),
        };

        match self.collection::<CityDocument>(CITIES).insert_one(&city).await {
            Ok(_) => Ok(city.into()),
            Err(e) if is_duplicate_key(&e) => Err(AppError::Conflict(format!(
                "City '{}' already exists",
                name.trim()
            ))),
            Err(e) => Err(e.into()),
        }
    }

    async fn delete_city(&self, city_id: &str) -> AppResult<()> {
        let object_id = ObjectId::parse_str(city_id)
            .map_err(|_| AppError::NotFound("City not found".to_string()))?;

        let mut session = self.client().start_session().await?;
        session.start_transaction().await?;

        let result = self.delete_in_transaction(&mut session, object_id).await;
        finish_transaction(&mut session, result).await
    }

    async fn ping(&self) -> AppResult<()> {
        self.health_check().await
    }
}
