pub mod chat;
pub mod rate_limit;
pub mod user;

pub use chat::ChatReply;
pub use rate_limit::RateLimitRecord;
pub use user::User;
