pub mod city;
pub mod influencer;
pub mod search;
pub mod suggestion;
pub mod user;

pub use city::*;
pub use influencer::*;
pub use search::*;
pub use suggestion::*;
pub use user::*;
