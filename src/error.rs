use thiserror::Error;

/// Failures surfaced by the store, the provider registry and the feeds.
///
/// None of these come out of the search engine, which cannot fail.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Invalid transition for {entity} {id}: {from} -> {to}")]
    InvalidTransition {
        entity: &'static str,
        id: String,
        from: String,
        to: String,
    },

    #[error(transparent)]
    Persistence(#[from] anyhow::Error),
}

impl CatalogError {
    pub(crate) fn not_found(entity: &'static str, id: &str) -> Self {
        CatalogError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub(crate) fn invalid_transition(
        entity: &'static str,
        id: &str,
        from: impl ToString,
        to: impl ToString,
    ) -> Self {
        CatalogError::InvalidTransition {
            entity,
            id: id.to_string(),
            from: from.to_string(),
            to: to.to_string(),
        }
    }

    /// Message safe to show in a toast. Persistence details stay in the logs.
    pub fn user_message(&self) -> String {
        match self {
            CatalogError::Persistence(_) => "Something went wrong. Please try again.".to_string(),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;

/// Structured `{ success, message }` answer handed back to the UI layer.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ActionOutcome {
    pub success: bool,
    pub message: String,
}

impl ActionOutcome {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

impl<T> From<Result<T>> for ActionOutcome {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(_) => ActionOutcome::ok("Done"),
            Err(err) => ActionOutcome::failed(err.user_message()),
        }
    }
}
