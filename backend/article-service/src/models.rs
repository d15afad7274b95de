use crate::error::{StoreError, StoreResult};
use crate::keys::{SCORE_INDEX, TIME_INDEX};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Article hash field names
pub mod fields {
    pub const TITLE: &str = "title";
    pub const LINK: &str = "link";
    pub const USER: &str = "user";
    pub const POSTED_AT: &str = "now";
    pub const VOTES: &str = "votes";
}

/// An article as read back from its hash, tagged with its key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    /// Article key (`article:<id>`)
    pub id: String,
    pub title: String,
    pub link: String,
    pub user: String,
    /// Creation time, unix seconds
    #[serde(rename = "now")]
    pub posted_at: i64,
    pub votes: i64,
}

impl Article {
    /// Build from the raw hash fields stored under `key`.
    pub fn from_fields(key: &str, mut raw: HashMap<String, String>) -> StoreResult<Self> {
        let mut take = |field: &str| {
            raw.remove(field).ok_or_else(|| {
                StoreError::InvalidData(format!("{} is missing field {}", key, field))
            })
        };

        let title = take(fields::TITLE)?;
        let link = take(fields::LINK)?;
        let user = take(fields::USER)?;
        let posted_at = take(fields::POSTED_AT)?;
        let votes = take(fields::VOTES)?;

        Ok(Self {
            id: key.to_string(),
            title,
            link,
            user,
            posted_at: parse_field(key, fields::POSTED_AT, &posted_at)?,
            votes: parse_field(key, fields::VOTES, &votes)?,
        })
    }
}

fn parse_field(key: &str, field: &str, raw: &str) -> StoreResult<i64> {
    raw.parse().map_err(|_| {
        StoreError::InvalidData(format!("{} has non-integer {}: {}", key, field, raw))
    })
}

/// Global index an article listing is ranked by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArticleOrder {
    #[default]
    Score,
    Time,
}

impl ArticleOrder {
    pub fn index_key(self) -> &'static str {
        match self {
            ArticleOrder::Score => SCORE_INDEX,
            ArticleOrder::Time => TIME_INDEX,
        }
    }
}

impl fmt::Display for ArticleOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArticleOrder::Score => write!(f, "score"),
            ArticleOrder::Time => write!(f, "time"),
        }
    }
}

impl FromStr for ArticleOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "score" | "score:" => Ok(ArticleOrder::Score),
            "time" | "time:" => Ok(ArticleOrder::Time),
            other => Err(format!("unknown order '{}', expected score or time", other)),
        }
    }
}

/// Result of a vote attempt. Only `Counted` changes the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteOutcome {
    Counted,
    AlreadyVoted,
    Expired,
    UnknownArticle,
}

impl VoteOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            VoteOutcome::Counted => "counted",
            VoteOutcome::AlreadyVoted => "already_voted",
            VoteOutcome::Expired => "expired",
            VoteOutcome::UnknownArticle => "unknown_article",
        }
    }
}

// ============= HTTP payloads =============

#[derive(Debug, Clone, Deserialize)]
pub struct PostArticleRequest {
    pub user: String,
    pub title: String,
    pub link: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostArticleResponse {
    pub id: u64,
    pub key: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VoteRequest {
    pub user: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct VoteResponse {
    pub article: String,
    pub outcome: VoteOutcome,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AddToGroupsRequest {
    #[serde(default)]
    pub groups: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    pub page: Option<u32>,
    pub order: Option<String>,
}
