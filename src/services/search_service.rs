use std::collections::HashSet;

use crate::database::InfluencerStore;
use crate::models::{Influencer, SearchParams};
use crate::services::discovery_service::{map_creator, DiscoveryClient};
use crate::utils::{AppError, AppResult};

pub const MISSING_CITY_MESSAGE: &str = "Please provide a City to start your search.";

/// Runs a live search: provider call, save under the requested city, re-read.
///
/// Returns the stored state of the records this search saved. Other influencers
/// cached under the same city are left out. Sorted by followers, descending.
pub async fn search_influencers(
    client: &DiscoveryClient,
    store: &dyn InfluencerStore,
    params: &SearchParams,
) -> AppResult<Vec<Influencer>> {
    let city = params
        .city()
        .ok_or_else(|| AppError::Validation(MISSING_CITY_MESSAGE.to_string()))?;

    log::info!("🔍 Searching influencers in {}", city);

    let creators = client.discover(params).await?;
    if creators.is_empty() {
        log::info!("📭 No influencers found for {}", city);
        return Ok(Vec::new());
    }

    let received = creators.len();
    let records: Vec<Influencer> = creators.into_iter().filter_map(map_creator).collect();
    if records.is_empty() {
        log::warn!("⚠️  All {} creators for {} were skipped", received, city);
        return Ok(Vec::new());
    }

    let saved_city = store.save_influencers(city, &records).await.map_err(|e| {
        log::error!("❌ Failed to save {} influencers for {}: {}", records.len(), city, e);
        e
    })?;
    log::info!("💾 Saved {} influencers under {}", records.len(), saved_city.name);

    let saved_ids: HashSet<&str> = records.iter().map(|r| r.id.as_str()).collect();
    let mut influencers = match store.get_influencers_by_city(city).await {
        Ok(influencers) => influencers
            .into_iter()
            .filter(|i| saved_ids.contains(i.id.as_str()))
            .collect::<Vec<_>>(),
        Err(e) => {
            log::error!("❌ Failed to re-read influencers for {}: {}", city, e);
            Vec::new()
        }
    };
    sort_by_followers(&mut influencers);

    log::info!("✅ Returning {} influencers for {}", influencers.len(), city);
    Ok(influencers)
}

pub fn sort_by_followers(influencers: &mut [Influencer]) {
    influencers.sort_by(|a, b| b.followers_count.cmp(&a.followers_count));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DiscoveryConfig;
    use crate::database::memory::MemoryStore;
    use crate::services::discovery_service::DISCOVERY_PATH;
    use std::time::Duration;
    use wiremock::{
        matchers::{method, path, query_param},
        Mock, MockServer, ResponseTemplate,
    };

    fn client_for(server: &MockServer) -> DiscoveryClient {
        DiscoveryClient::new(DiscoveryConfig {
            base_url: server.uri(),
            api_host: "discovery.test".to_string(),
            api_key: Some("secret".to_string()),
            timeout: Duration::from_secs(2),
        })
        .unwrap()
    }

    fn creator(handle: &str, followers: u64) -> serde_json::Value {
        serde_json::json!({
            "handle": handle,
            "bio": "Local creator",
            "followers": followers,
            "posts": 120,
            "engagement": 2.4,
            "connector": "instagram",
            "country": "US",
            "city": "Austin",
            "category": "Food"
        })
    }

    async fn mount_creators(server: &MockServer, creators: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path(DISCOVERY_PATH))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "creators": creators })),
            )
            .mount(server)
            .await;
    }

    fn params(city: &str) -> SearchParams {
        SearchParams {
            city: Some(city.to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_blank_city_never_calls_provider() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let store = MemoryStore::new();
        let err = search_influencers(&client_for(&server), &store, &params("   "))
            .await
            .unwrap_err();

        assert_eq!(err.user_message(), MISSING_CITY_MESSAGE);
        assert_eq!(store.save_calls(), 0);
    }

    #[tokio::test]
    async fn test_austin_search_persists_and_sorts() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(DISCOVERY_PATH))
            .and(query_param("city", "Austin"))
            .and(query_param("followers_minimum", "1000"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "creators": [creator("@small", 1_500), creator("@big", 90_000)]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let store = MemoryStore::new();
        let search = SearchParams {
            followers_min: Some(1000),
            followers_max: Some(10_000_000),
            ..params("Austin")
        };
        let result = search_influencers(&client_for(&server), &store, &search)
            .await
            .unwrap();

        let ids: Vec<&str> = result.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["big", "small"]);
        assert_eq!(result[0].full_name, "@big");
        assert_eq!(store.get_all_cities().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_null_creators_returns_empty_without_saving() {
        let server = MockServer::start().await;
        mount_creators(&server, serde_json::Value::Null).await;

        let store = MemoryStore::new();
        let result = search_influencers(&client_for(&server), &store, &params("Austin"))
            .await
            .unwrap();

        assert!(result.is_empty());
        assert_eq!(store.save_calls(), 0);
        assert!(store.get_all_cities().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_repeated_search_upserts_by_id() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(DISCOVERY_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "creators": [creator("@austin_eats", 1_000)]
            })))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        mount_creators(&server, serde_json::json!([creator("@austin_eats", 2_500)])).await;

        let store = MemoryStore::new();
        let client = client_for(&server);
        let first = search_influencers(&client, &store, &params("Austin")).await.unwrap();
        assert_eq!(first[0].followers_count, 1_000);

        let result = search_influencers(&client, &store, &params("austin"))
            .await
            .unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].followers_count, 2_500);
        let stored = store.get_influencers_by_city("Austin").await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].followers_count, 2_500);
        assert_eq!(store.get_all_cities().await.unwrap().len(), 1);
        assert_eq!(store.save_calls(), 2);
    }

    #[tokio::test]
    async fn test_result_excludes_influencers_cached_by_other_searches() {
        let server = MockServer::start().await;
        let mut big = creator("@tube_big", 500_000);
        big["connector"] = serde_json::json!("youtube");
        Mock::given(method("GET"))
            .and(path(DISCOVERY_PATH))
            .and(query_param("followers_minimum", "100000"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "creators": [big] })),
            )
            .mount(&server)
            .await;

        let store = MemoryStore::new();
        let cached = map_creator(serde_json::from_value(creator("@insta_tiny", 12)).unwrap())
            .unwrap();
        store.save_influencers("Austin", &[cached]).await.unwrap();

        let search = SearchParams {
            followers_min: Some(100_000),
            ..params("Austin")
        };
        let result = search_influencers(&client_for(&server), &store, &search)
            .await
            .unwrap();

        let ids: Vec<&str> = result.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["tube_big"]);
        assert!(result.iter().all(|i| i.followers_count >= 100_000));
        assert_eq!(store.get_influencers_by_city("Austin").await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_save_failure_propagates() {
        let server = MockServer::start().await;
        mount_creators(&server, serde_json::json!([creator("@austin_eats", 1_000)])).await;

        let store = MemoryStore::new();
        store.fail_writes();

        let err = search_influencers(&client_for(&server), &store, &params("Austin"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Database(_)));
    }

    #[tokio::test]
    async fn test_unknown_connectors_are_skipped() {
        let server = MockServer::start().await;
        let mut tiktok = creator("@dancer", 7_000);
        tiktok["connector"] = serde_json::json!("tiktok");
        mount_creators(&server, serde_json::json!([tiktok, creator("@chef", 3_000)])).await;

        let store = MemoryStore::new();
        let result = search_influencers(&client_for(&server), &store, &params("Austin"))
            .await
            .unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, "chef");
    }

    #[tokio::test]
    async fn test_upstream_error_message() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(429).set_body_json(serde_json::json!({ "message": "Too many requests" })),
            )
            .mount(&server)
            .await;

        let store = MemoryStore::new();
        let err = search_influencers(&client_for(&server), &store, &params("Austin"))
            .await
            .unwrap_err();
        assert_eq!(err.user_message(), "API Error: Too many requests");
        assert_eq!(store.save_calls(), 0);
    }
}
