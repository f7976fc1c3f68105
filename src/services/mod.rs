//! Entity services. Each owns the SQL for one entity and takes the caller's
//! [`TenantContext`](crate::auth::TenantContext) on every call; nothing here
//! reads tenant identity from anywhere else.

use thiserror::Error;

pub mod forms;
pub mod notifications;
pub mod user_contacts;
pub mod user_skills;
pub mod user_socials;
pub mod users;
pub mod workflows;

pub use forms::{FormFlag, FormService};
pub use notifications::NotificationService;
pub use user_contacts::UserContactService;
pub use user_skills::UserSkillService;
pub use user_socials::UserSocialService;
pub use users::UserService;
pub use workflows::WorkflowService;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Invalid(String),

    #[error("failed to decode {what}: {source}")]
    Decode {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// A lookup chain step that the caller cannot fix by changing input
    #[error("{0}")]
    Unresolved(String),

    #[error("password hashing failed: {0}")]
    Password(String),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl ServiceError {
    pub fn not_found(what: impl Into<String>) -> Self {
        ServiceError::NotFound(what.into())
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        ServiceError::Invalid(message.into())
    }
}

/// Translate a unique-constraint violation (SQLSTATE 23505) into a conflict
pub(crate) fn conflict_on_unique(err: sqlx::Error, message: &str) -> ServiceError {
    match &err {
        sqlx::Error::Database(db) if db.code().as_deref() == Some("23505") => {
            tracing::warn!("Unique violation: {}", db.message());
            ServiceError::Conflict(message.to_string())
        }
        _ => ServiceError::Database(err),
    }
}

/// Fail with not-found when a write touched no rows
pub(crate) fn require_affected(rows_affected: u64, what: &str) -> Result<(), ServiceError> {
    if rows_affected == 0 {
        return Err(ServiceError::not_found(what));
    }
    Ok(())
}
