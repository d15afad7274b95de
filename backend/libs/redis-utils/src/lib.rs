use anyhow::{Context, Result};
use redis::aio::ConnectionManager;
use redis::{Client, ConnectionAddr, ConnectionInfo, IntoConnectionInfo};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

/// Shared Redis connection manager guarded by a Tokio mutex.
pub type SharedConnectionManager = Arc<Mutex<ConnectionManager>>;

/// Redis connection pool backed by a single auto-reconnecting manager.
pub struct RedisPool {
    manager: SharedConnectionManager,
}

impl RedisPool {
    /// Connect to `redis_url`. `db` overrides the database index carried by
    /// the URL, if any.
    pub async fn connect(redis_url: &str, db: Option<i64>) -> Result<Self> {
        let info = connection_info(redis_url, db)?;
        let addr_label = addr_label(&info.addr);
        let db = info.redis.db;

        let client = Client::open(info).context("failed to construct Redis client")?;
        let connection_manager = ConnectionManager::new(client)
            .await
            .context("failed to initialize Redis connection manager")?;

        info!(addr = %addr_label, db, "Redis connection established");

        Ok(Self {
            manager: Arc::new(Mutex::new(connection_manager)),
        })
    }

    pub fn manager(&self) -> SharedConnectionManager {
        self.manager.clone()
    }
}

/// Parse a Redis URL and apply an optional database override.
pub fn connection_info(redis_url: &str, db: Option<i64>) -> Result<ConnectionInfo> {
    let mut info: ConnectionInfo = redis_url
        .into_connection_info()
        .context("failed to parse REDIS_URL connection string")?;

    if let Some(db) = db {
        info.redis.db = db;
    }

    Ok(info)
}

fn addr_label(addr: &ConnectionAddr) -> String {
    match addr {
        ConnectionAddr::Tcp(host, port) => format!("{}:{}", host, port),
        ConnectionAddr::TcpTls { host, port, .. } => format!("{}:{} (tls)", host, port),
        other => format!("{:?}", other),
    }
}
