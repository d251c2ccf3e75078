pub mod rate_limits;
pub mod users;

pub use rate_limits::{InMemoryRateLimitStore, RateLimitStore};
pub use users::{JsonFileUserStore, UpsertOutcome, UserRepository};
