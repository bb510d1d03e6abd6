use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use error_types::{AppError, AppResult};
use tokio::sync::{broadcast, RwLock};

use crate::models::{Article, ArticleFilter, Comment};

/// Counter fields supporting atomic signed increments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterField {
    Likes,
    Dislikes,
    Views,
}

/// Membership list fields supporting atomic set-add / set-remove.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberField {
    LikesBy,
    DislikesBy,
}

/// One atomic field mutation, mirroring the primitives the hosted document
/// store exposes. A `Vec<FieldOp>` passed to [`ArticleBackend::apply`] is
/// committed as a single atomic batch.
#[derive(Debug, Clone)]
pub enum FieldOp {
    Increment { field: CounterField, delta: i64 },
    ArrayUnion { field: MemberField, user_id: String },
    ArrayRemove { field: MemberField, user_id: String },
    ReplaceComments(Vec<Comment>),
}

/// Emitted after every committed mutation of an article document.
#[derive(Debug, Clone)]
pub struct ChangeEvent {
    pub article_id: String,
}

/// Seam over the hosted document database's article collection.
#[async_trait]
pub trait ArticleBackend: Send + Sync {
    /// One-shot read of a single document.
    async fn fetch(&self, id: &str) -> AppResult<Option<Article>>;

    /// One-shot query of the collection.
    async fn query(&self, filter: &ArticleFilter) -> AppResult<Vec<Article>>;

    /// Atomically applies a batch of field mutations to one document.
    async fn apply(&self, id: &str, ops: Vec<FieldOp>) -> AppResult<()>;

    /// Change feed; receivers are notified after every committed mutation.
    fn changes(&self) -> broadcast::Receiver<ChangeEvent>;
}

const CHANGE_CHANNEL_CAPACITY: usize = 64;

/// In-process backend used by tests and local runs.
///
/// Each `apply` batch runs under a single write lock, giving the same per-call
/// atomicity the hosted store guarantees per mutation.
pub struct MemoryBackend {
    articles: RwLock<HashMap<String, Article>>,
    changes_tx: broadcast::Sender<ChangeEvent>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        let (changes_tx, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            articles: RwLock::new(HashMap::new()),
            changes_tx,
        }
    }

    /// Inserts or replaces a document and notifies subscribers.
    pub async fn upsert(&self, article: Article) {
        let id = article.id.clone();
        self.articles.write().await.insert(id.clone(), article);
        let _ = self.changes_tx.send(ChangeEvent { article_id: id });
    }

    fn notify(&self, article_id: &str) {
        let _ = self.changes_tx.send(ChangeEvent {
            article_id: article_id.to_string(),
        });
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn apply_op(article: &mut Article, op: FieldOp) {
    match op {
        FieldOp::Increment { field, delta } => {
            let counter = match field {
                CounterField::Likes => &mut article.likes,
                CounterField::Dislikes => &mut article.dislikes,
                CounterField::Views => &mut article.views,
            };
            *counter += delta;
        }
        FieldOp::ArrayUnion { field, user_id } => {
            let list = match field {
                MemberField::LikesBy => &mut article.likes_by,
                MemberField::DislikesBy => &mut article.dislikes_by,
            };
            list.retain(|u| u != &user_id);
            list.push(user_id);
        }
        FieldOp::ArrayRemove { field, user_id } => {
            let list = match field {
                MemberField::LikesBy => &mut article.likes_by,
                MemberField::DislikesBy => &mut article.dislikes_by,
            };
            list.retain(|u| u != &user_id);
        }
        FieldOp::ReplaceComments(comments) => {
            article.comments = comments;
        }
    }
}

#[async_trait]
impl ArticleBackend for MemoryBackend {
    async fn fetch(&self, id: &str) -> AppResult<Option<Article>> {
        Ok(self.articles.read().await.get(id).cloned())
    }

    async fn query(&self, filter: &ArticleFilter) -> AppResult<Vec<Article>> {
        let now = Utc::now();
        let articles = self.articles.read().await;
        let mut matched: Vec<Article> = articles
            .values()
            .filter(|a| filter.matches(a, now))
            .cloned()
            .collect();
        // Newest first; stable order for equal timestamps.
        matched.sort_by(|a, b| {
            b.publish_at
                .cmp(&a.publish_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(matched)
    }

    async fn apply(&self, id: &str, ops: Vec<FieldOp>) -> AppResult<()> {
        {
            let mut articles = self.articles.write().await;
            let article = articles
                .get_mut(id)
                .ok_or_else(|| AppError::NotFound(format!("article {id}")))?;
            for op in ops {
                apply_op(article, op);
            }
        }
        self.notify(id);
        Ok(())
    }

    fn changes(&self) -> broadcast::Receiver<ChangeEvent> {
        self.changes_tx.subscribe()
    }
}
