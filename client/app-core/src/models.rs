use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::routing::{NotificationPayload, NotificationRoute};

/// A notification shown on the notifications screen.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: Uuid,
    pub title: String,
    pub body: String,
    pub payload: NotificationPayload,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub read: bool,
}

impl Notification {
    pub fn new(title: impl Into<String>, body: impl Into<String>, payload: NotificationPayload) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            body: body.into(),
            payload,
            created_at: Utc::now(),
            read: false,
        }
    }

    /// Where tapping this notification sends the viewer.
    pub fn route(&self) -> NotificationRoute {
        NotificationRoute::resolve(&self.payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notification_routes_through_its_payload() {
        let n = Notification::new(
            "New article",
            "Velvet sofas are back",
            NotificationPayload::new("article", Some("a1".to_string())),
        );
        assert!(!n.read);
        assert_eq!(
            n.route(),
            NotificationRoute::ArticleDetails {
                article_id: "a1".to_string()
            }
        );
    }
}
