/// Scripted tour of the ranking operations against a live Redis.
///
/// Posts an article, votes on it, lists the top page, files the article
/// under a group and lists that group. Uses database 15 unless REDIS_DB
/// says otherwise.
use anyhow::{bail, Context, Result};
use article_service::{logging, Article, ArticleOrder, ArticleService, Config, RedisStore};
use redis_utils::RedisPool;
use std::sync::Arc;
use tracing::info;

const WALKTHROUGH_DB: i64 = 15;
const AUTHOR: &str = "wuhepeng";
const VOTER: &str = "other_user";
const GROUP: &str = "new-group";

#[tokio::main]
async fn main() -> Result<()> {
    logging::init_tracing();

    let config = Config::from_env().context("Failed to load configuration")?;
    let db = config.redis.db.unwrap_or(WALKTHROUGH_DB);
    let pool = RedisPool::connect(&config.redis.url, Some(db))
        .await
        .context("Failed to connect to Redis")?;

    let service = ArticleService::new(
        Arc::new(RedisStore::new(pool.manager())),
        config.ranking.clone(),
    );

    let article_id = service
        .post_article(AUTHOR, "A title", "http://www.google.com")
        .await?;
    info!(article_id, "We posted a new article");

    let Some(article) = service.get_article(article_id).await? else {
        bail!("article {} vanished right after posting", article_id);
    };
    info!(
        title = %article.title,
        link = %article.link,
        user = %article.user,
        now = article.posted_at,
        votes = article.votes,
        "Its hash looks like"
    );

    let outcome = service.vote_article(VOTER, &article.id).await?;
    let votes = service
        .get_article(article_id)
        .await?
        .map(|a| a.votes)
        .unwrap_or_default();
    info!(outcome = outcome.as_str(), votes, "We voted for the article");
    if votes <= 1 {
        bail!("vote was not counted (outcome: {})", outcome.as_str());
    }

    let articles = service.list_articles(1, ArticleOrder::Score).await?;
    info!("The currently highest-scoring articles are:");
    print_articles(&articles);
    if articles.is_empty() {
        bail!("score index is empty");
    }

    service
        .add_to_groups(article_id, &[GROUP.to_string()])
        .await?;
    let articles = service
        .list_group_articles(GROUP, 1, ArticleOrder::Score)
        .await?;
    info!(group = GROUP, "We added the article to a group, other articles include:");
    print_articles(&articles);
    if articles.is_empty() {
        bail!("group {} ranking is empty", GROUP);
    }

    Ok(())
}

fn print_articles(articles: &[Article]) {
    for article in articles {
        info!(
            id = %article.id,
            title = %article.title,
            link = %article.link,
            user = %article.user,
            now = article.posted_at,
            votes = article.votes,
            "  article"
        );
    }
}
