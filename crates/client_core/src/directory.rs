//! Seam between the orchestrator and the remote user collection.

use async_trait::async_trait;
use shared::protocol::UsersPage;

use crate::{error::DirectoryError, query::Query};

#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Primary request against the collection endpoint.
    async fn request_users(&self, query: &Query) -> Result<UsersPage, DirectoryError>;

    /// Secondary request against the diagnostic variant of the endpoint. Expected
    /// to fail with [`DirectoryError::Diagnostic`] carrying a readable reason.
    async fn request_users_with_error(&self, query: &Query) -> Result<UsersPage, DirectoryError>;
}

pub struct MissingUserDirectory;

#[async_trait]
impl UserDirectory for MissingUserDirectory {
    async fn request_users(&self, _query: &Query) -> Result<UsersPage, DirectoryError> {
        Err(DirectoryError::Transport(
            "user directory is unavailable".to_string(),
        ))
    }

    async fn request_users_with_error(&self, _query: &Query) -> Result<UsersPage, DirectoryError> {
        Err(DirectoryError::Diagnostic(
            "no user directory configured".to_string(),
        ))
    }
}
