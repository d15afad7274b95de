use super::{unix_now, ArticleService};
use crate::error::{ServiceError, ServiceResult};
use crate::keys::{ArticleKey, SCORE_INDEX, TIME_INDEX};
use crate::models::{fields, Article, ArticleOrder};
use crate::store::RankingStore;
use tracing::{debug, info, warn};

impl<S: RankingStore> ArticleService<S> {
    /// Create an article and seed its voter set and both rank indexes.
    /// Returns the new article id.
    pub async fn post_article(&self, user: &str, title: &str, link: &str) -> ServiceResult<u64> {
        let raw_id = self.store.incr(ArticleKey::counter(), 1).await?;
        let article_id = u64::try_from(raw_id).map_err(|_| {
            ServiceError::Internal(format!("article counter went negative: {}", raw_id))
        })?;

        // The author counts as the first voter.
        let voted = ArticleKey::voted(&article_id.to_string());
        self.store.sadd(&voted, user).await?;
        self.store
            .expire(&voted, self.settings.vote_window_secs)
            .await?;

        let now = unix_now();
        let article = ArticleKey::article(article_id);
        self.store
            .hset_multiple(
                &article,
                &[
                    (fields::TITLE, title.to_string()),
                    (fields::LINK, link.to_string()),
                    (fields::USER, user.to_string()),
                    (fields::POSTED_AT, now.to_string()),
                    (fields::VOTES, "1".to_string()),
                ],
            )
            .await?;

        self.store
            .zadd(SCORE_INDEX, &article, (now + self.settings.vote_score) as f64)
            .await?;
        self.store.zadd(TIME_INDEX, &article, now as f64).await?;

        self.metrics.record_post();
        info!(article = %article, user = %user, "Article posted");

        Ok(article_id)
    }

    /// Read a single article back, `None` if it was never posted.
    pub async fn get_article(&self, article_id: u64) -> ServiceResult<Option<Article>> {
        let key = ArticleKey::article(article_id);
        let raw = self.store.hgetall(&key).await?;
        if raw.is_empty() {
            return Ok(None);
        }
        Ok(Some(Article::from_fields(&key, raw)?))
    }

    /// One page of articles from a global index, highest first.
    pub async fn list_articles(
        &self,
        page: u32,
        order: ArticleOrder,
    ) -> ServiceResult<Vec<Article>> {
        self.list_index(order.index_key(), page).await
    }

    /// One page of any ranking sorted set, resolving each member's hash.
    pub(crate) async fn list_index(&self, index: &str, page: u32) -> ServiceResult<Vec<Article>> {
        let Some((start, stop)) = self.page_bounds(page) else {
            return Ok(Vec::new());
        };

        let keys = self.store.zrevrange(index, start, stop).await?;
        let mut articles = Vec::with_capacity(keys.len());

        for key in keys {
            let raw = self.store.hgetall(&key).await?;
            if raw.is_empty() {
                warn!(index = %index, article = %key, "Ranked article has no hash");
                continue;
            }
            match Article::from_fields(&key, raw) {
                Ok(article) => articles.push(article),
                Err(e) => {
                    warn!(
                        index = %index,
                        article = %key,
                        error = %e,
                        "Skipping malformed article hash"
                    );
                }
            }
        }

        debug!(index = %index, page, count = articles.len(), "Listed articles");
        Ok(articles)
    }
}
