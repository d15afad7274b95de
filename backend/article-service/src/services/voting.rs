use super::{unix_now, ArticleService};
use crate::error::ServiceResult;
use crate::keys::{ArticleKey, SCORE_INDEX, TIME_INDEX};
use crate::models::{fields, VoteOutcome};
use crate::store::RankingStore;
use tracing::{debug, info};

impl<S: RankingStore> ArticleService<S> {
    /// Register `voter`'s vote on `article_key`.
    ///
    /// The window check, the voter-set insert and the two increments are
    /// separate store calls with no transaction around them; concurrent
    /// voters may interleave between them.
    pub async fn vote_article(&self, voter: &str, article_key: &str) -> ServiceResult<VoteOutcome> {
        let outcome = self.apply_vote(voter, article_key).await?;
        self.metrics.record_vote(outcome);
        Ok(outcome)
    }

    async fn apply_vote(&self, voter: &str, article_key: &str) -> ServiceResult<VoteOutcome> {
        let Some(posted_at) = self.store.zscore(TIME_INDEX, article_key).await? else {
            debug!(article = %article_key, "Vote for unknown article ignored");
            return Ok(VoteOutcome::UnknownArticle);
        };

        let window = i64::try_from(self.settings.vote_window_secs).unwrap_or(i64::MAX);
        let cutoff = unix_now().saturating_sub(window);
        if posted_at < cutoff as f64 {
            debug!(article = %article_key, voter = %voter, "Voting window closed");
            return Ok(VoteOutcome::Expired);
        }

        let Some(article_id) = ArticleKey::article_id(article_key) else {
            return Ok(VoteOutcome::UnknownArticle);
        };

        if self.store.sadd(&ArticleKey::voted(article_id), voter).await? == 0 {
            debug!(article = %article_key, voter = %voter, "Duplicate vote ignored");
            return Ok(VoteOutcome::AlreadyVoted);
        }

        let score = self
            .store
            .zincr(SCORE_INDEX, article_key, self.settings.vote_score as f64)
            .await?;
        let votes = self.store.hincr(article_key, fields::VOTES, 1).await?;

        info!(article = %article_key, voter = %voter, votes, score, "Vote counted");
        Ok(VoteOutcome::Counted)
    }
}
