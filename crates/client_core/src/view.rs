//! Render model shared by the front ends.

use std::num::NonZeroU32;

use shared::domain::User;

use crate::{fetch::FetchState, session::SessionSnapshot};

pub const EMPTY_STATE_ROW: &str = "Users not found";
pub const LOADING_LABEL: &str = "Loading...";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListBody {
    Loading,
    /// Full banner text, message included.
    Error(String),
    Users(Vec<String>),
    Empty(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationBar {
    pub page: u32,
    pub has_prev: bool,
    pub has_next: bool,
    pub limit: NonZeroU32,
    pub page_size_options: Vec<NonZeroU32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserListView {
    pub body: ListBody,
    pub pagination: PaginationBar,
}

impl UserListView {
    pub fn from_snapshot(snapshot: &SessionSnapshot, page_size_options: &[NonZeroU32]) -> Self {
        let body = match &snapshot.fetch {
            FetchState::Loading => ListBody::Loading,
            FetchState::Failure(message) => ListBody::Error(error_banner(message)),
            FetchState::Success(page) if !page.is_empty() => {
                ListBody::Users(page.data.iter().map(user_row).collect())
            }
            FetchState::Success(_) | FetchState::Idle => ListBody::Empty(EMPTY_STATE_ROW),
        };

        Self {
            body,
            pagination: PaginationBar {
                page: snapshot.page_info.page,
                has_prev: snapshot.page_info.has_prev,
                has_next: snapshot.page_info.has_next,
                limit: snapshot.query.limit(),
                page_size_options: page_size_options.to_vec(),
            },
        }
    }

    /// Plain-text rendering, one line per row.
    pub fn to_lines(&self) -> Vec<String> {
        let mut lines = match &self.body {
            ListBody::Loading => vec![LOADING_LABEL.to_string()],
            ListBody::Error(banner) => vec![banner.clone()],
            ListBody::Users(rows) => rows.clone(),
            ListBody::Empty(placeholder) => vec![placeholder.to_string()],
        };
        lines.push(self.pagination.summary());
        lines
    }
}

impl PaginationBar {
    pub fn summary(&self) -> String {
        format!(
            "page: {} | by page: {} | prev: {} | next: {}",
            self.page,
            self.limit,
            if self.has_prev { "yes" } else { "no" },
            if self.has_next { "yes" } else { "no" },
        )
    }
}

pub fn error_banner(message: &str) -> String {
    format!("Failed to fetch users: {message}")
}

pub fn user_row(user: &User) -> String {
    format!("{}, {}", user.name, user.age)
}

#[cfg(test)]
#[path = "tests/view_tests.rs"]
mod tests;
