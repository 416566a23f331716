//! Two-tier fetch: a primary request, and on its failure a diagnostic request
//! whose reported error becomes the message shown to the user.

use shared::protocol::UsersPage;
use tracing::{info, warn};

use crate::{directory::UserDirectory, error::DirectoryError, query::Query};

/// Shown when neither request produced a page or a readable reason.
pub const GENERIC_FETCH_ERROR: &str = "Failed to fetch users";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FetchState {
    #[default]
    Idle,
    Loading,
    Success(UsersPage),
    Failure(String),
}

impl FetchState {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn page(&self) -> Option<&UsersPage> {
        match self {
            Self::Success(page) => Some(page),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failure(message) => Some(message),
            _ => None,
        }
    }
}

/// Outcome of a single directory request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchResult {
    Success(UsersPage),
    TransportFailure(String),
    DiagnosticFailure(String),
}

impl From<Result<UsersPage, DirectoryError>> for FetchResult {
    fn from(value: Result<UsersPage, DirectoryError>) -> Self {
        match value {
            Ok(page) => Self::Success(page),
            Err(DirectoryError::Transport(reason)) => Self::TransportFailure(reason),
            Err(DirectoryError::Diagnostic(message)) => Self::DiagnosticFailure(message),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchStep {
    Commit(FetchState),
    Fallback,
}

/// Any primary failure, diagnostic or not, is retried once against the
/// diagnostic endpoint.
pub fn plan_after_primary(primary: FetchResult) -> FetchStep {
    match primary {
        FetchResult::Success(page) => FetchStep::Commit(FetchState::Success(page)),
        FetchResult::TransportFailure(_) | FetchResult::DiagnosticFailure(_) => FetchStep::Fallback,
    }
}

/// A page returned by the diagnostic endpoint is as good as a primary page.
pub fn settle_fallback(secondary: FetchResult) -> FetchState {
    match secondary {
        FetchResult::Success(page) => FetchState::Success(page),
        FetchResult::DiagnosticFailure(message) => FetchState::Failure(message),
        FetchResult::TransportFailure(_) => FetchState::Failure(GENERIC_FETCH_ERROR.to_string()),
    }
}

/// Runs the primary request and, if needed, the fallback. Always settles on
/// `Success` or `Failure`.
pub async fn fetch_users(directory: &dyn UserDirectory, query: &Query) -> FetchState {
    let primary = FetchResult::from(directory.request_users(query).await);
    match plan_after_primary(primary.clone()) {
        FetchStep::Commit(state) => state,
        FetchStep::Fallback => {
            warn!(
                name = query.name(),
                age = query.age(),
                limit = query.limit().get(),
                offset = query.offset(),
                outcome = ?primary,
                "primary users request failed; requesting diagnostic"
            );
            let secondary = FetchResult::from(directory.request_users_with_error(query).await);
            if let FetchResult::Success(_) = &secondary {
                info!("diagnostic users request returned a page; using it");
            }
            settle_fallback(secondary)
        }
    }
}

#[cfg(test)]
#[path = "tests/fetch_tests.rs"]
mod tests;
