use super::ArticleService;
use crate::error::ServiceResult;
use crate::keys::ArticleKey;
use crate::models::{Article, ArticleOrder};
use crate::store::RankingStore;
use tracing::{debug, info};

impl<S: RankingStore> ArticleService<S> {
    /// Add an article to each named group. Re-adding is a no-op.
    pub async fn add_to_groups(&self, article_id: u64, groups: &[String]) -> ServiceResult<()> {
        let article = ArticleKey::article(article_id);

        for group in groups {
            let added = self.store.sadd(&ArticleKey::group(group), &article).await?;
            if added > 0 {
                info!(article = %article, group = %group, "Article added to group");
            }
        }

        Ok(())
    }

    /// One page of a group's articles, ranked through a cached
    /// intersection of the group set with a global index.
    ///
    /// The cached ranking lives for `group_cache_ttl_secs`; membership or
    /// score changes inside that window are not reflected until it expires.
    pub async fn list_group_articles(
        &self,
        group: &str,
        page: u32,
        order: ArticleOrder,
    ) -> ServiceResult<Vec<Article>> {
        let index = order.index_key();
        let key = ArticleKey::group_ranking(index, group);

        if self.store.exists(&key).await? {
            debug!(key = %key, "Group ranking cache hit");
            self.metrics.record_group_cache(true);
        } else {
            let group_key = ArticleKey::group(group);
            let count = self
                .store
                .zinterstore_max(&key, &[group_key.as_str(), index])
                .await?;
            self.store
                .expire(&key, self.settings.group_cache_ttl_secs)
                .await?;

            debug!(key = %key, count, "Group ranking cache rebuilt");
            self.metrics.record_group_cache(false);
        }

        self.list_index(&key, page).await
    }
}
