use serde::{Deserialize, Serialize};

/// Raw destination hint carried by a push notification.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPayload {
    pub kind: String,
    #[serde(default)]
    pub target_id: Option<String>,
}

impl NotificationPayload {
    pub fn new(kind: impl Into<String>, target_id: Option<String>) -> Self {
        Self {
            kind: kind.into(),
            target_id,
        }
    }
}

/// Closed set of screens a notification can send the viewer to.
///
/// Replaces string-keyed route tables: every destination carries exactly the
/// parameters it needs, and resolution is an exhaustive match. Unknown kinds
/// and kinds missing their target degrade to `Home` rather than erroring, so
/// payloads from a newer server version stay navigable.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "screen", rename_all = "camelCase")]
pub enum NotificationRoute {
    ArticleDetails { article_id: String },
    Product { product_id: String },
    Order { order_id: String },
    Favorites,
    Account,
    Home,
}

impl NotificationRoute {
    pub fn resolve(payload: &NotificationPayload) -> Self {
        match (payload.kind.as_str(), payload.target_id.as_deref()) {
            ("article", Some(id)) => NotificationRoute::ArticleDetails {
                article_id: id.to_string(),
            },
            ("product", Some(id)) => NotificationRoute::Product {
                product_id: id.to_string(),
            },
            ("order", Some(id)) => NotificationRoute::Order {
                order_id: id.to_string(),
            },
            ("favorites", _) => NotificationRoute::Favorites,
            ("account", _) => NotificationRoute::Account,
            _ => NotificationRoute::Home,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_kinds_resolve_with_their_target() {
        let route = NotificationRoute::resolve(&NotificationPayload::new(
            "article",
            Some("a1".to_string()),
        ));
        assert_eq!(
            route,
            NotificationRoute::ArticleDetails {
                article_id: "a1".to_string()
            }
        );

        let route = NotificationRoute::resolve(&NotificationPayload::new(
            "order",
            Some("o42".to_string()),
        ));
        assert_eq!(
            route,
            NotificationRoute::Order {
                order_id: "o42".to_string()
            }
        );
    }

    #[test]
    fn targetless_kinds_ignore_the_target() {
        let route =
            NotificationRoute::resolve(&NotificationPayload::new("account", Some("x".into())));
        assert_eq!(route, NotificationRoute::Account);
    }

    #[test]
    fn unknown_or_incomplete_payloads_fall_back_to_home() {
        let unknown = NotificationPayload::new("flashSale", Some("x".into()));
        assert_eq!(NotificationRoute::resolve(&unknown), NotificationRoute::Home);

        let missing_target = NotificationPayload::new("article", None);
        assert_eq!(
            NotificationRoute::resolve(&missing_target),
            NotificationRoute::Home
        );
    }
}
