use std::sync::Arc;

use app_core::{AppState, AuthSession, Config};
use article_store::{
    Article, ArticleFilter, LocalizedText, MemoryBackend, PublicationStatus, ReactionState,
};
use error_types::AppError;
use reaction_sync::ToggleOutcome;

fn published(id: &str) -> Article {
    Article {
        id: id.to_string(),
        title: LocalizedText::new("en", "Linen curtains").with("sv", "Linnegardiner"),
        summary: LocalizedText::new("en", "Care guide"),
        likes_by: vec![],
        dislikes_by: vec![],
        likes: 0,
        dislikes: 0,
        views: 0,
        comments: vec![],
        status: PublicationStatus::Published,
        publish_at: None,
        feature_home: true,
        feature_account: false,
    }
}

async fn app_with(articles: Vec<Article>) -> (AppState, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        kv_dir: dir.path().to_path_buf(),
        default_locale: "en".to_string(),
    };

    let backend = Arc::new(MemoryBackend::new());
    for article in articles {
        backend.upsert(article).await;
    }

    let state = AppState::init(&config, backend).await.unwrap();
    (state, dir)
}

#[tokio::test]
async fn session_toggle_flows_through_to_the_document() {
    let (app, _dir) = app_with(vec![published("a1")]).await;
    let session = AuthSession::new("u1", "Maja", "maja@example.com");

    let outcome = app.toggle_like(&session, "a1").await.unwrap();
    assert_eq!(outcome, ToggleOutcome::Applied(ReactionState::Liked));

    let article = app.store().fetch_one("a1").await.unwrap().unwrap();
    assert_eq!(article.likes_by, vec!["u1".to_string()]);
    assert_eq!(article.likes, 1);
}

#[tokio::test]
async fn anonymous_viewer_is_refused_everywhere() {
    let (app, _dir) = app_with(vec![published("a1")]).await;
    let anon = AuthSession::anonymous();

    assert!(matches!(
        app.toggle_like(&anon, "a1").await,
        Err(AppError::Validation(_))
    ));
    assert!(matches!(
        app.toggle_dislike(&anon, "a1").await,
        Err(AppError::Validation(_))
    ));
    assert!(matches!(
        app.add_comment(&anon, "a1", "hello").await,
        Err(AppError::Validation(_))
    ));
    assert!(matches!(
        app.favorite_articles(&anon).await,
        Err(AppError::Validation(_))
    ));
}

#[tokio::test]
async fn comment_carries_the_session_display_name() {
    let (app, _dir) = app_with(vec![published("a1")]).await;
    let session = AuthSession::new("u1", "Maja", "maja@example.com");

    let comment = app.add_comment(&session, "a1", "lovely fabric").await.unwrap();
    assert_eq!(comment.display_name, "Maja");
    assert_eq!(comment.user_id, "u1");

    let article = app.store().fetch_one("a1").await.unwrap().unwrap();
    assert_eq!(article.comments.len(), 1);
}

#[tokio::test]
async fn favorites_lists_liked_articles_only() {
    let (app, _dir) = app_with(vec![published("a1"), published("a2")]).await;
    let session = AuthSession::new("u1", "Maja", "maja@example.com");

    app.toggle_like(&session, "a2").await.unwrap();

    let favorites = app.favorite_articles(&session).await.unwrap();
    let ids: Vec<String> = favorites.into_iter().map(|a| a.id).collect();
    assert_eq!(ids, vec!["a2".to_string()]);
}

#[tokio::test]
async fn article_screen_flow_view_then_subscribe() {
    let (app, _dir) = app_with(vec![published("a1")]).await;
    let session = AuthSession::new("u1", "Maja", "maja@example.com");

    // Screen mount: record the view, then watch the document.
    app.store().increment_view("a1").await;
    let mut sub = app.store().subscribe_to_one("a1").await;
    assert_eq!(sub.current().unwrap().views, 1);

    app.toggle_like(&session, "a1").await.unwrap();
    assert!(sub.changed().await);
    let article = sub.current().unwrap();
    assert_eq!(article.likes, 1);
    assert_eq!(article.title.resolve("sv"), "Linnegardiner");
    assert_eq!(app.localize(&article.title), "Linen curtains");

    // Screen teardown.
    sub.unsubscribe();
}

#[tokio::test]
async fn home_feed_uses_the_feature_flag_filter() {
    let mut plain = published("a2");
    plain.feature_home = false;

    let (app, _dir) = app_with(vec![published("a1"), plain]).await;

    let sub = app
        .store()
        .subscribe_to_collection(ArticleFilter::home())
        .await;
    let ids: Vec<String> = sub.current().into_iter().map(|a| a.id).collect();
    assert_eq!(ids, vec!["a1".to_string()]);
}
