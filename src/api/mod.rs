pub mod admin;
pub mod auth;
pub mod cities;
pub mod health;
pub mod influencers;
pub mod metrics;
pub mod routes;
pub mod session;
pub mod suggestions;
pub mod swagger;
