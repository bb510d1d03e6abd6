use error_types::{AppError, AppResult};

/// The authenticated viewer, passed explicitly into every operation that
/// needs an identity. Nothing in the core reads ambient auth state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthSession {
    pub user_id: String,
    pub display_name: String,
    pub email: String,
}

impl AuthSession {
    pub fn new(
        user_id: impl Into<String>,
        display_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            display_name: display_name.into(),
            email: email.into(),
        }
    }

    /// A signed-out viewer.
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn is_authenticated(&self) -> bool {
        !self.user_id.is_empty()
    }

    /// The user id, or a validation refusal the UI turns into a login prompt.
    pub fn require_user(&self) -> AppResult<&str> {
        if self.is_authenticated() {
            Ok(&self.user_id)
        } else {
            Err(AppError::Validation("sign in required".into()))
        }
    }
}
