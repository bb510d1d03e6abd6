use std::sync::{Arc, Mutex};

use chrono::Utc;
use error_types::{AppError, AppResult};
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::backend::{ArticleBackend, CounterField, FieldOp, MemberField};
use crate::models::{Article, ArticleFilter, Comment, ReactionState};

/// Cancels a live subscription's background task.
///
/// `unsubscribe` is idempotent and is also invoked on drop, so a torn-down
/// owner can never receive further updates.
pub struct SubscriptionGuard {
    task: Mutex<Option<JoinHandle<()>>>,
}

impl SubscriptionGuard {
    fn new(task: JoinHandle<()>) -> Self {
        Self {
            task: Mutex::new(Some(task)),
        }
    }

    pub fn unsubscribe(&self) {
        if let Ok(mut slot) = self.task.lock() {
            if let Some(task) = slot.take() {
                task.abort();
            }
        }
    }
}

impl Drop for SubscriptionGuard {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

/// Live view of a collection query: the full result set is re-delivered on
/// every underlying change.
pub struct CollectionSubscription {
    updates: watch::Receiver<Vec<Article>>,
    guard: SubscriptionGuard,
}

impl CollectionSubscription {
    /// Last delivered result set.
    pub fn current(&self) -> Vec<Article> {
        self.updates.borrow().clone()
    }

    /// Waits for the next delivery. Returns `false` once the subscription has
    /// been cancelled.
    pub async fn changed(&mut self) -> bool {
        self.updates.changed().await.is_ok()
    }

    pub fn unsubscribe(&self) {
        self.guard.unsubscribe();
    }
}

/// Live view of a single document. Delivers `None` when the document is
/// missing and when the backend is unreachable.
pub struct DocumentSubscription {
    updates: watch::Receiver<Option<Article>>,
    guard: SubscriptionGuard,
}

impl DocumentSubscription {
    pub fn current(&self) -> Option<Article> {
        self.updates.borrow().clone()
    }

    pub async fn changed(&mut self) -> bool {
        self.updates.changed().await.is_ok()
    }

    pub fn unsubscribe(&self) {
        self.guard.unsubscribe();
    }
}

/// Client for the remote article collection.
///
/// Translates reaction and view intents into atomic field mutations and
/// exposes one-shot and live reads. Subscriptions never raise: a failed read
/// degrades to an empty result set (or `None` for a single document) and the
/// failure is logged.
#[derive(Clone)]
pub struct ArticleStore {
    backend: Arc<dyn ArticleBackend>,
}

impl ArticleStore {
    pub fn new(backend: Arc<dyn ArticleBackend>) -> Self {
        Self { backend }
    }

    /// One-shot read of a single article.
    pub async fn fetch_one(&self, id: &str) -> AppResult<Option<Article>> {
        self.backend.fetch(id).await
    }

    /// Articles the given user has liked (backs the favorites screen).
    pub async fn fetch_liked_by(&self, user_id: &str) -> AppResult<Vec<Article>> {
        self.backend.query(&ArticleFilter::liked_by(user_id)).await
    }

    /// Best-effort `views += 1`. Failures are logged and swallowed; a missed
    /// view count is not worth surfacing to the reader.
    pub async fn increment_view(&self, id: &str) {
        let op = FieldOp::Increment {
            field: CounterField::Views,
            delta: 1,
        };
        if let Err(e) = self.backend.apply(id, vec![op]).await {
            debug!(article_id = id, error = %e, "view increment dropped");
        }
    }

    /// Atomically applies a reaction: membership follows `desired`, counters
    /// move by the caller-computed deltas. Exactly one membership branch
    /// executes per call; the two lists can never both gain the user.
    pub async fn apply_reaction(
        &self,
        article_id: &str,
        user_id: &str,
        desired: ReactionState,
        like_delta: i64,
        dislike_delta: i64,
    ) -> AppResult<()> {
        let user = user_id.to_string();
        let mut ops = match desired {
            ReactionState::Liked => vec![
                FieldOp::ArrayUnion {
                    field: MemberField::LikesBy,
                    user_id: user.clone(),
                },
                FieldOp::ArrayRemove {
                    field: MemberField::DislikesBy,
                    user_id: user,
                },
            ],
            ReactionState::Disliked => vec![
                FieldOp::ArrayUnion {
                    field: MemberField::DislikesBy,
                    user_id: user.clone(),
                },
                FieldOp::ArrayRemove {
                    field: MemberField::LikesBy,
                    user_id: user,
                },
            ],
            ReactionState::Neutral => vec![
                FieldOp::ArrayRemove {
                    field: MemberField::LikesBy,
                    user_id: user.clone(),
                },
                FieldOp::ArrayRemove {
                    field: MemberField::DislikesBy,
                    user_id: user,
                },
            ],
        };
        if like_delta != 0 {
            ops.push(FieldOp::Increment {
                field: CounterField::Likes,
                delta: like_delta,
            });
        }
        if dislike_delta != 0 {
            ops.push(FieldOp::Increment {
                field: CounterField::Dislikes,
                delta: dislike_delta,
            });
        }
        self.backend.apply(article_id, ops).await
    }

    /// Appends a comment and writes the full sequence back.
    ///
    /// Refuses empty identity or blank text locally; fails `NotFound` when the
    /// article no longer exists. The generated id concatenates the millisecond
    /// timestamp with the user id, which is unique as long as one user cannot
    /// submit twice in the same millisecond.
    pub async fn add_comment(
        &self,
        article_id: &str,
        user_id: &str,
        display_name: &str,
        text: &str,
    ) -> AppResult<Comment> {
        if user_id.is_empty() {
            return Err(AppError::Validation("comment requires a signed-in user".into()));
        }
        let text = text.trim();
        if text.is_empty() {
            return Err(AppError::Validation("comment text is empty".into()));
        }

        let article = self
            .backend
            .fetch(article_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("article {article_id}")))?;

        let created_at = Utc::now();
        let comment = Comment {
            id: format!("{}{}", created_at.timestamp_millis(), user_id),
            user_id: user_id.to_string(),
            display_name: display_name.to_string(),
            comment: text.to_string(),
            created_at,
        };

        let mut comments = article.comments;
        comments.push(comment.clone());
        self.backend
            .apply(article_id, vec![FieldOp::ReplaceComments(comments)])
            .await?;

        Ok(comment)
    }

    /// Live collection query. The current full result set is delivered
    /// immediately and again after every backend change; a failed read
    /// delivers an empty set instead of raising.
    pub async fn subscribe_to_collection(&self, filter: ArticleFilter) -> CollectionSubscription {
        let initial = match self.backend.query(&filter).await {
            Ok(articles) => articles,
            Err(e) => {
                warn!(error = %e, "collection subscription degraded to empty");
                Vec::new()
            }
        };
        let (tx, rx) = watch::channel(initial);

        let backend = Arc::clone(&self.backend);
        let mut changes = backend.changes();
        let task = tokio::spawn(async move {
            loop {
                match changes.recv().await {
                    Ok(_) | Err(broadcast::error::RecvError::Lagged(_)) => {}
                    Err(broadcast::error::RecvError::Closed) => break,
                }
                let snapshot = match backend.query(&filter).await {
                    Ok(articles) => articles,
                    Err(e) => {
                        warn!(error = %e, "collection refresh degraded to empty");
                        Vec::new()
                    }
                };
                if tx.send(snapshot).is_err() {
                    break;
                }
            }
        });

        CollectionSubscription {
            updates: rx,
            guard: SubscriptionGuard::new(task),
        }
    }

    /// Live view of a single article. Delivers `None` for missing documents
    /// and on backend failure.
    pub async fn subscribe_to_one(&self, id: &str) -> DocumentSubscription {
        let initial = match self.backend.fetch(id).await {
            Ok(article) => article,
            Err(e) => {
                warn!(article_id = id, error = %e, "document subscription degraded to absent");
                None
            }
        };
        let (tx, rx) = watch::channel(initial);

        let backend = Arc::clone(&self.backend);
        let mut changes = backend.changes();
        let id = id.to_string();
        let task = tokio::spawn(async move {
            loop {
                match changes.recv().await {
                    Ok(event) if event.article_id != id => continue,
                    Ok(_) | Err(broadcast::error::RecvError::Lagged(_)) => {}
                    Err(broadcast::error::RecvError::Closed) => break,
                }
                let snapshot = match backend.fetch(&id).await {
                    Ok(article) => article,
                    Err(e) => {
                        warn!(article_id = %id, error = %e, "document refresh degraded to absent");
                        None
                    }
                };
                if tx.send(snapshot).is_err() {
                    break;
                }
            }
        });

        DocumentSubscription {
            updates: rx,
            guard: SubscriptionGuard::new(task),
        }
    }
}
