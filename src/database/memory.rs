//! In-memory stores used by the test suite.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use super::{InfluencerStore, UserStore};
use crate::models::{city_key, City, Influencer, Role, UserProfile, UserRecord};
use crate::utils::{AppError, AppResult};

#[derive(Default)]
pub struct MemoryStore {
    cities: Mutex<Vec<(City, Vec<Influencer>)>>,
    users: Mutex<Vec<UserRecord>>,
    next_id: AtomicU64,
    fail_writes: AtomicBool,
    save_calls: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent write fail with a database error.
    pub fn fail_writes(&self) {
        self.fail_writes.store(true, Ordering::SeqCst);
    }

    pub fn save_calls(&self) -> u64 {
        self.save_calls.load(Ordering::SeqCst)
    }

    fn next_id(&self) -> String {
        format!("{:024x}", self.next_id.fetch_add(1, Ordering::SeqCst) + 1)
    }

    fn check_writable(&self) -> AppResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AppError::Database("simulated write failure".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl InfluencerStore for MemoryStore {
    async fn get_all_cities(&self) -> AppResult<Vec<City>> {
        let mut cities: Vec<City> = self
            .cities
            .lock()
            .unwrap()
            .iter()
            .map(|(city, _)| city.clone())
            .collect();
        cities.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(cities)
    }

    async fn find_city(&self, name: &str) -> AppResult<Option<City>> {
        let key = city_key(name);
        Ok(self
            .cities
            .lock()
            .unwrap()
            .iter()
            .find(|(city, _)| city_key(&city.name) == key)
            .map(|(city, _)| city.clone()))
    }

    async fn get_influencers_by_city(&self, city_name: &str) -> AppResult<Vec<Influencer>> {
        let key = city_key(city_name);
        Ok(self
            .cities
            .lock()
            .unwrap()
            .iter()
            .find(|(city, _)| city_key(&city.name) == key)
            .map(|(_, influencers)| influencers.clone())
            .unwrap_or_default())
    }

    async fn save_influencers(&self, city_name: &str, records: &[Influencer]) -> AppResult<City> {
        self.save_calls.fetch_add(1, Ordering::SeqCst);
        self.check_writable()?;

        let key = city_key(city_name);
        let mut cities = self.cities.lock().unwrap();

        let index = match cities.iter().position(|(city, _)| city_key(&city.name) == key) {
            Some(index) => index,
            None => {
                let city = City {
                    id: self.next_id(),
                    name: city_name.trim().to_string(),
                    created_at: 0,
                };
                cities.push((city, Vec::new()));
                cities.len() - 1
            }
        };

        let (city, stored) = &mut cities[index];
        for record in records {
            match stored.iter_mut().find(|existing| existing.id == record.id) {
                Some(existing) => *existing = record.clone(),
                None => stored.push(record.clone()),
            }
        }

        Ok(city.clone())
    }

    async fn add_city(&self, name: &str) -> AppResult<City> {
        self.check_writable()?;
        if self.find_city(name).await?.is_some() {
            return Err(AppError::Conflict(format!("City '{}' already exists", name.trim())));
        }

        let city = City {
            id: self.next_id(),
            name: name.trim().to_string(),
            created_at: 0,
        };
        self.cities.lock().unwrap().push((city.clone(), Vec::new()));
        Ok(city)
    }

    async fn delete_city(&self, city_id: &str) -> AppResult<()> {
        self.check_writable()?;
        let mut cities = self.cities.lock().unwrap();
        let before = cities.len();
        cities.retain(|(city, _)| city.id != city_id);
        if cities.len() == before {
            return Err(AppError::NotFound("City not found".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
        role: Role,
    ) -> AppResult<UserProfile> {
        self.check_writable()?;
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.profile.email == email) {
            return Err(AppError::Conflict(format!("User {} already exists", email)));
        }

        let profile = UserProfile {
            id: self.next_id(),
            name: name.to_string(),
            email: email.to_string(),
            role,
            created_at: users.len() as i64,
            last_login: None,
        };
        users.push(UserRecord {
            profile: profile.clone(),
            password_hash: password_hash.to_string(),
        });
        Ok(profile)
    }

    async fn find_user(&self, user_id: &str) -> AppResult<Option<UserProfile>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.profile.id == user_id)
            .map(|u| u.profile.clone()))
    }

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<UserRecord>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.profile.email == email)
            .cloned())
    }

    async fn touch_last_login(&self, user_id: &str) -> AppResult<()> {
        self.check_writable()?;
        if let Some(user) = self
            .users
            .lock()
            .unwrap()
            .iter_mut()
            .find(|u| u.profile.id == user_id)
        {
            user.profile.last_login = Some(1_700_000_000);
        }
        Ok(())
    }

    async fn list_users(&self) -> AppResult<Vec<UserProfile>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .map(|u| u.profile.clone())
            .collect())
    }

    async fn update_role(&self, user_id: &str, role: Role) -> AppResult<UserProfile> {
        self.check_writable()?;
        let mut users = self.users.lock().unwrap();
        let user = users
            .iter_mut()
            .find(|u| u.profile.id == user_id)
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", user_id)))?;
        user.profile.role = role;
        Ok(user.profile.clone())
    }
}

impl MemoryStore {
    /// Removes a user profile, leaving any issued tokens dangling.
    pub fn remove_user(&self, user_id: &str) {
        self.users.lock().unwrap().retain(|u| u.profile.id != user_id);
    }
}
