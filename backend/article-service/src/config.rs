/// Configuration management for Article Service
///
/// Loads configuration from environment variables.
use crate::error::{ServiceError, ServiceResult};
use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application settings
    pub app: AppConfig,
    /// Redis configuration
    pub redis: RedisConfig,
    /// Ranking constants
    pub ranking: RankingSettings,
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application environment (development, staging, production)
    pub env: String,
    /// Server host to bind to
    pub host: String,
    /// HTTP port
    pub http_port: u16,
}

/// Redis configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisConfig {
    /// Redis URL (redis://host:port[/db])
    pub url: String,
    /// Database index override
    pub db: Option<i64>,
}

/// Ranking constants, read from `RANKING_*` variables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingSettings {
    /// Score added per counted vote
    #[serde(default = "default_vote_score")]
    pub vote_score: i64,
    #[serde(default = "default_articles_per_page")]
    pub articles_per_page: u32,
    /// Articles older than this stop accepting votes; also the voter set TTL
    #[serde(default = "default_vote_window_secs")]
    pub vote_window_secs: u64,
    #[serde(default = "default_group_cache_ttl_secs")]
    pub group_cache_ttl_secs: u64,
}

// Default values
fn default_vote_score() -> i64 {
    432
}

fn default_articles_per_page() -> u32 {
    25
}

fn default_vote_window_secs() -> u64 {
    7 * 86400
}

fn default_group_cache_ttl_secs() -> u64 {
    60
}

impl Default for RankingSettings {
    fn default() -> Self {
        Self {
            vote_score: default_vote_score(),
            articles_per_page: default_articles_per_page(),
            vote_window_secs: default_vote_window_secs(),
            group_cache_ttl_secs: default_group_cache_ttl_secs(),
        }
    }
}

impl RankingSettings {
    pub fn from_env() -> ServiceResult<Self> {
        let settings: RankingSettings = envy::prefixed("RANKING_")
            .from_env()
            .map_err(|e| ServiceError::Config(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> ServiceResult<()> {
        if self.articles_per_page == 0 {
            return Err(ServiceError::Config(
                "RANKING_ARTICLES_PER_PAGE must be greater than zero".to_string(),
            ));
        }
        if self.vote_score <= 0 {
            return Err(ServiceError::Config(
                "RANKING_VOTE_SCORE must be positive".to_string(),
            ));
        }
        // EXPIRE with 0 deletes the key outright.
        if self.vote_window_secs == 0 || self.vote_window_secs > i64::MAX as u64 {
            return Err(ServiceError::Config(format!(
                "RANKING_VOTE_WINDOW_SECS must be between 1 and {}",
                i64::MAX
            )));
        }
        if self.group_cache_ttl_secs == 0 {
            return Err(ServiceError::Config(
                "RANKING_GROUP_CACHE_TTL_SECS must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> ServiceResult<Self> {
        dotenvy::dotenv().ok();

        let app = AppConfig {
            env: std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
            host: std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            http_port: std::env::var("PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(8090),
        };

        let redis = RedisConfig {
            url: std::env::var("REDIS_URL")
                .unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string()),
            db: match std::env::var("REDIS_DB") {
                Ok(raw) => Some(raw.parse().map_err(|_| {
                    ServiceError::Config(format!("REDIS_DB must be an integer, got {}", raw))
                })?),
                Err(_) => None,
            },
        };

        Ok(Config {
            app,
            redis,
            ranking: RankingSettings::from_env()?,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.app.host, self.app.http_port)
    }
}
