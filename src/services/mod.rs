pub mod auth_service;
pub mod city_service;
pub mod discovery_service;
pub mod export_service;
pub mod search_service;
pub mod session_service;
pub mod suggestion_service;
pub mod user_service;

pub use discovery_service::DiscoveryClient;
pub use suggestion_service::SuggestionClient;
