//! Store key schema
//!
//! Every key the service touches is built here.
//! Key format: {entity}:[identifier]

/// Counter key and article hash prefix
pub const ARTICLE_PREFIX: &str = "article:";

/// Global score index (sorted set)
pub const SCORE_INDEX: &str = "score:";

/// Global time index (sorted set)
pub const TIME_INDEX: &str = "time:";

const VOTED_PREFIX: &str = "voted:";
const GROUP_PREFIX: &str = "group:";

/// Store key builder
pub struct ArticleKey;

impl ArticleKey {
    // ============= Article Keys =============

    /// Atomic id counter
    /// Format: article:
    pub fn counter() -> &'static str {
        ARTICLE_PREFIX
    }

    /// Article hash
    /// Format: article:{id}
    pub fn article(article_id: u64) -> String {
        format!("{}{}", ARTICLE_PREFIX, article_id)
    }

    /// Voter set for an article
    /// Format: voted:{id}
    pub fn voted(article_id: &str) -> String {
        format!("{}{}", VOTED_PREFIX, article_id)
    }

    // ============= Group Keys =============

    /// Group membership set
    /// Format: group:{name}
    pub fn group(name: &str) -> String {
        format!("{}{}", GROUP_PREFIX, name)
    }

    /// Cached group ranking for an index
    /// Format: {index}{name}, e.g. score:new-group
    pub fn group_ranking(index: &str, name: &str) -> String {
        format!("{}{}", index, name)
    }

    // ============= Utility =============

    /// Id part of an article key: everything after the first ':'.
    pub fn article_id(article_key: &str) -> Option<&str> {
        article_key
            .split_once(':')
            .map(|(_, id)| id)
            .filter(|id| !id.is_empty())
    }
}
