/// Article Service - HTTP Server
///
/// Posts, votes on, and ranks articles stored in Redis.
use actix_web::{middleware as actix_middleware, web, App, HttpServer};
use anyhow::{Context, Result};
use article_service::{handlers, logging, ArticleService, Config, RedisStore};
use redis_utils::RedisPool;
use std::sync::Arc;
use tracing::info;

#[actix_web::main]
async fn main() -> Result<()> {
    logging::init_tracing();

    let config = Config::from_env().context("Failed to load configuration")?;
    let bind_address = config.bind_address();

    info!(
        env = %config.app.env,
        vote_score = config.ranking.vote_score,
        articles_per_page = config.ranking.articles_per_page,
        "Starting article-service on {}",
        bind_address
    );

    let pool = RedisPool::connect(&config.redis.url, config.redis.db)
        .await
        .context("Failed to connect to Redis")?;
    let store = Arc::new(RedisStore::new(pool.manager()));
    let service = web::Data::new(ArticleService::new(store, config.ranking.clone()));

    HttpServer::new(move || {
        App::new()
            .app_data(service.clone())
            .wrap(actix_middleware::Logger::default())
            .configure(handlers::configure::<RedisStore>)
    })
    .bind(&bind_address)
    .with_context(|| format!("Failed to bind {}", bind_address))?
    .run()
    .await
    .context("HTTP server error")?;

    info!("article-service stopped");
    Ok(())
}
