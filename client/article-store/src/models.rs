use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Publication status of an article document.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PublicationStatus {
    Draft,
    Published,
}

impl PublicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PublicationStatus::Draft => "draft",
            PublicationStatus::Published => "published",
        }
    }
}

/// Per-locale text with fallback resolution.
///
/// Documents carry a map of locale tag to string; screens resolve against the
/// viewer's locale and fall back to English, then to anything present.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct LocalizedText(BTreeMap<String, String>);

impl LocalizedText {
    pub fn new(locale: impl Into<String>, text: impl Into<String>) -> Self {
        let mut map = BTreeMap::new();
        map.insert(locale.into(), text.into());
        Self(map)
    }

    pub fn with(mut self, locale: impl Into<String>, text: impl Into<String>) -> Self {
        self.0.insert(locale.into(), text.into());
        self
    }

    pub fn resolve(&self, locale: &str) -> &str {
        self.0
            .get(locale)
            .or_else(|| self.0.get("en"))
            .or_else(|| self.0.values().next())
            .map(String::as_str)
            .unwrap_or("")
    }
}

/// A reader comment on an article. Append-only; no edit or delete.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub user_id: String,
    pub display_name: String,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

/// An article document as stored in the remote collection.
///
/// `likes_by`/`dislikes_by` carry set semantics over list storage and are kept
/// disjoint by the reaction operations. The `likes`/`dislikes`/`views` counters
/// are adjusted by signed deltas and are not derived from the membership lists,
/// so they can drift if mutated out of band.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: String,
    pub title: LocalizedText,
    pub summary: LocalizedText,
    #[serde(default)]
    pub likes_by: Vec<String>,
    #[serde(default)]
    pub dislikes_by: Vec<String>,
    #[serde(default)]
    pub likes: i64,
    #[serde(default)]
    pub dislikes: i64,
    #[serde(default)]
    pub views: i64,
    #[serde(default)]
    pub comments: Vec<Comment>,
    pub status: PublicationStatus,
    #[serde(default)]
    pub publish_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub feature_home: bool,
    #[serde(default)]
    pub feature_account: bool,
}

impl Article {
    /// Whether the article is live for readers at `now`: published and not
    /// scheduled for a future date.
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.status == PublicationStatus::Published
            && self.publish_at.map_or(true, |at| at <= now)
    }
}

/// Collection query filter. The publication predicate is always applied;
/// the optional flags narrow further.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleFilter {
    pub feature_home: Option<bool>,
    pub feature_account: Option<bool>,
    pub liked_by: Option<String>,
}

impl ArticleFilter {
    pub fn home() -> Self {
        Self {
            feature_home: Some(true),
            ..Self::default()
        }
    }

    pub fn account() -> Self {
        Self {
            feature_account: Some(true),
            ..Self::default()
        }
    }

    pub fn liked_by(user_id: impl Into<String>) -> Self {
        Self {
            liked_by: Some(user_id.into()),
            ..Self::default()
        }
    }

    pub fn matches(&self, article: &Article, now: DateTime<Utc>) -> bool {
        if !article.is_live(now) {
            return false;
        }
        if let Some(want) = self.feature_home {
            if article.feature_home != want {
                return false;
            }
        }
        if let Some(want) = self.feature_account {
            if article.feature_account != want {
                return false;
            }
        }
        if let Some(user_id) = &self.liked_by {
            if !article.likes_by.iter().any(|u| u == user_id) {
                return false;
            }
        }
        true
    }
}

/// The three reaction states a user can hold on an article.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReactionState {
    Neutral,
    Liked,
    Disliked,
}

impl ReactionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReactionState::Neutral => "neutral",
            ReactionState::Liked => "liked",
            ReactionState::Disliked => "disliked",
        }
    }
}
