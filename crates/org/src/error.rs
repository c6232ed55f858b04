use thiserror::Error;

pub type Result<T> = std::result::Result<T, OrgError>;

#[derive(Debug, Error)]
pub enum OrgError {
    #[error("Invitation not found or expired")]
    InvitationNotFound,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid role: {0}. Must be one of: admin, coordinator")]
    InvalidRole(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("{0}")]
    Identity(#[from] tickethub_auth::AuthError),

    #[error("Database error: {0}")]
    Database(#[from] tickethub_database::DatabaseError),

    #[error("Cache error: {0}")]
    Cache(#[from] tickethub_cache::CacheError),
}

impl From<validator::ValidationErrors> for OrgError {
    fn from(err: validator::ValidationErrors) -> Self {
        OrgError::ValidationError(err.to_string())
    }
}
