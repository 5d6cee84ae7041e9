// ==================== CITY SERVICE ====================
// Leituras degradam para vazio; escritas propagam o erro

use std::cmp::Ordering;

use serde::Deserialize;
use utoipa::IntoParams;

use crate::database::InfluencerStore;
use crate::models::{City, Influencer};
use crate::utils::{AppError, AppResult};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    #[default]
    FollowersCount,
    PostsCount,
    EngagementRate,
    Username,
    Category,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

/// Query string for the cached influencer listing.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct InfluencerListQuery {
    /// followers_count | posts_count | engagement_rate | username | category
    #[param(value_type = Option<String>)]
    pub sort: Option<SortField>,
    /// asc | desc
    #[param(value_type = Option<String>)]
    pub direction: Option<SortDirection>,
}

pub fn sort_influencers(influencers: &mut [Influencer], field: SortField, direction: SortDirection) {
    influencers.sort_by(|a, b| {
        let ordering = match field {
            SortField::FollowersCount => a.followers_count.cmp(&b.followers_count),
            SortField::PostsCount => a.posts_count.cmp(&b.posts_count),
            SortField::EngagementRate => a
                .engagement_rate
                .partial_cmp(&b.engagement_rate)
                .unwrap_or(Ordering::Equal),
            SortField::Username => a.username.to_lowercase().cmp(&b.username.to_lowercase()),
            SortField::Category => a.category.to_lowercase().cmp(&b.category.to_lowercase()),
        };
        match direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
}

pub async fn get_all_cities(store: &dyn InfluencerStore) -> Vec<City> {
    match store.get_all_cities().await {
        Ok(cities) => cities,
        Err(e) => {
            log::error!("❌ Failed to load cities: {}", e);
            Vec::new()
        }
    }
}

pub async fn get_influencers_by_city(
    store: &dyn InfluencerStore,
    city_name: &str,
    query: &InfluencerListQuery,
) -> Vec<Influencer> {
    let mut influencers = match store.get_influencers_by_city(city_name).await {
        Ok(influencers) => influencers,
        Err(e) => {
            log::error!("❌ Failed to load influencers for {}: {}", city_name, e);
            Vec::new()
        }
    };

    sort_influencers(
        &mut influencers,
        query.sort.unwrap_or_default(),
        query.direction.unwrap_or_default(),
    );
    influencers
}

pub async fn add_city(store: &dyn InfluencerStore, name: &str) -> AppResult<City> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("City name cannot be empty".to_string()));
    }

    let city = store.add_city(name).await?;
    log::info!("✅ City '{}' created ({})", city.name, city.id);
    Ok(city)
}

pub async fn delete_city(store: &dyn InfluencerStore, city_id: &str) -> AppResult<()> {
    store.delete_city(city_id).await?;
    log::info!("✅ City {} deleted", city_id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::memory::MemoryStore;
    use crate::models::{Connector, PLACEHOLDER_PROFILE_PIC};

    fn influencer(username: &str, followers: u64, engagement: f64, category: &str) -> Influencer {
        Influencer {
            id: username.to_string(),
            username: username.to_string(),
            full_name: format!("@{}", username),
            biography: String::new(),
            followers_count: followers,
            posts_count: followers / 10,
            engagement_rate: engagement,
            connector: Connector::Youtube,
            location_country: "US".to_string(),
            location_city: "Austin".to_string(),
            profile_pic_url: PLACEHOLDER_PROFILE_PIC.to_string(),
            category: category.to_string(),
        }
    }

    fn usernames(influencers: &[Influencer]) -> Vec<&str> {
        influencers.iter().map(|i| i.username.as_str()).collect()
    }

    #[test]
    fn test_sort_fields_and_directions() {
        let mut list = vec![
            influencer("bravo", 200, 1.0, "Travel"),
            influencer("alpha", 50, 9.5, "Food"),
            influencer("Charlie", 900, 4.2, "art"),
        ];

        sort_influencers(&mut list, SortField::FollowersCount, SortDirection::Desc);
        assert_eq!(usernames(&list), vec!["Charlie", "bravo", "alpha"]);

        sort_influencers(&mut list, SortField::EngagementRate, SortDirection::Asc);
        assert_eq!(usernames(&list), vec!["bravo", "Charlie", "alpha"]);

        sort_influencers(&mut list, SortField::Username, SortDirection::Asc);
        assert_eq!(usernames(&list), vec!["alpha", "bravo", "Charlie"]);

        sort_influencers(&mut list, SortField::Category, SortDirection::Desc);
        assert_eq!(usernames(&list), vec!["bravo", "alpha", "Charlie"]);
    }

    #[tokio::test]
    async fn test_unknown_city_is_empty() {
        let store = MemoryStore::new();
        let result =
            get_influencers_by_city(&store, "Atlantis", &InfluencerListQuery::default()).await;
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_add_city_rejects_blank_and_duplicates() {
        let store = MemoryStore::new();

        let err = add_city(&store, "   ").await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let city = add_city(&store, "  Lisbon ").await.unwrap();
        assert_eq!(city.name, "Lisbon");

        let err = add_city(&store, "LISBON").await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_delete_city_removes_influencers() {
        let store = MemoryStore::new();
        let city = store
            .save_influencers("Austin", &[influencer("alpha", 10, 1.0, "Food")])
            .await
            .unwrap();

        delete_city(&store, &city.id).await.unwrap();

        assert!(get_all_cities(&store).await.is_empty());
        let err = delete_city(&store, &city.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
