//! Ranking metrics for observability

use crate::models::VoteOutcome;
use prometheus::{Encoder, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};
use std::sync::OnceLock;
use tracing::warn;

static METRICS: OnceLock<RankingMetricsInner> = OnceLock::new();

struct RankingMetricsInner {
    registry: Registry,
    articles_posted: IntCounter,
    votes: IntCounterVec,
    group_cache: IntCounterVec,
}

impl RankingMetricsInner {
    fn new() -> Self {
        let inner = Self {
            registry: Registry::new(),
            articles_posted: IntCounter::new("articles_posted_total", "Total articles posted")
                .expect("valid metric definition"),
            votes: IntCounterVec::new(
                Opts::new("article_votes_total", "Vote attempts by outcome"),
                &["outcome"],
            )
            .expect("valid metric definition"),
            group_cache: IntCounterVec::new(
                Opts::new(
                    "group_ranking_cache_total",
                    "Group ranking cache lookups by result",
                ),
                &["result"],
            )
            .expect("valid metric definition"),
        };

        if let Err(e) = inner.register() {
            warn!(error = %e, "Failed to register ranking metrics");
        }
        inner
    }

    fn register(&self) -> Result<(), prometheus::Error> {
        self.registry
            .register(Box::new(self.articles_posted.clone()))?;
        self.registry.register(Box::new(self.votes.clone()))?;
        self.registry.register(Box::new(self.group_cache.clone()))?;
        Ok(())
    }
}

fn get_metrics() -> &'static RankingMetricsInner {
    METRICS.get_or_init(RankingMetricsInner::new)
}

/// Ranking metrics wrapper
#[derive(Clone, Default)]
pub struct RankingMetrics;

impl RankingMetrics {
    pub fn new() -> Self {
        Self
    }

    pub fn record_post(&self) {
        get_metrics().articles_posted.inc();
    }

    pub fn record_vote(&self, outcome: VoteOutcome) {
        get_metrics()
            .votes
            .with_label_values(&[outcome.as_str()])
            .inc();
    }

    pub fn record_group_cache(&self, hit: bool) {
        let result = if hit { "hit" } else { "miss" };
        get_metrics().group_cache.with_label_values(&[result]).inc();
    }

    /// Prometheus text exposition of every ranking metric
    pub fn render(&self) -> Result<String, prometheus::Error> {
        let families = get_metrics().registry.gather();
        let mut buf = Vec::new();
        TextEncoder::new().encode(&families, &mut buf)?;
        String::from_utf8(buf).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
