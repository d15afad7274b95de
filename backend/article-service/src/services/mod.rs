//! Article ranking operations
//!
//! `ArticleService` owns nothing but a store handle and the ranking
//! constants; every operation is a short sequence of store calls.

mod articles;
mod groups;
mod voting;

use crate::config::RankingSettings;
use crate::metrics::RankingMetrics;
use crate::store::RankingStore;
use chrono::Utc;
use std::sync::Arc;

pub struct ArticleService<S> {
    store: Arc<S>,
    settings: RankingSettings,
    metrics: RankingMetrics,
}

impl<S> Clone for ArticleService<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            settings: self.settings.clone(),
            metrics: self.metrics.clone(),
        }
    }
}

impl<S: RankingStore> ArticleService<S> {
    pub fn new(store: Arc<S>, settings: RankingSettings) -> Self {
        Self {
            store,
            settings,
            metrics: RankingMetrics::new(),
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn settings(&self) -> &RankingSettings {
        &self.settings
    }

    pub fn metrics(&self) -> &RankingMetrics {
        &self.metrics
    }

    /// Zero-based inclusive rank range for a 1-based page; `None` for page 0.
    pub(crate) fn page_bounds(&self, page: u32) -> Option<(isize, isize)> {
        if page == 0 {
            return None;
        }
        let per_page = self.settings.articles_per_page as isize;
        let start = (page as isize - 1) * per_page;
        Some((start, start + per_page - 1))
    }
}

/// Current unix time in seconds
pub(crate) fn unix_now() -> i64 {
    Utc::now().timestamp()
}
