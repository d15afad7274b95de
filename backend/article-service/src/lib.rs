pub mod config;
pub mod error;
pub mod handlers;
pub mod keys;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod services;
pub mod store;

pub use config::{Config, RankingSettings};
pub use error::{ServiceError, ServiceResult, StoreError, StoreResult};
pub use models::{Article, ArticleOrder, VoteOutcome};
pub use services::ArticleService;
pub use store::{MemoryStore, RankingStore, RedisStore};
