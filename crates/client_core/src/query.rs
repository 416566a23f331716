//! Filter and pagination intent as an immutable value plus its reducer.

use std::num::NonZeroU32;

use shared::protocol::ListUsersRequest;

pub const DEFAULT_PAGE_SIZE: NonZeroU32 = match NonZeroU32::new(5) {
    Some(size) => size,
    None => panic!("default page size must be non-zero"),
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    name: String,
    age: String,
    limit: NonZeroU32,
    offset: u32,
}

impl Default for Query {
    fn default() -> Self {
        Self::with_limit(DEFAULT_PAGE_SIZE)
    }
}

impl Query {
    /// Empty filters on the first page.
    pub fn with_limit(limit: NonZeroU32) -> Self {
        Self {
            name: String::new(),
            age: String::new(),
            limit,
            offset: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn age(&self) -> &str {
        &self.age
    }

    pub fn limit(&self) -> NonZeroU32 {
        self.limit
    }

    pub fn offset(&self) -> u32 {
        self.offset
    }

    pub fn set_name(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            offset: 0,
            ..self.clone()
        }
    }

    pub fn set_age(&self, age: impl Into<String>) -> Self {
        Self {
            age: age.into(),
            offset: 0,
            ..self.clone()
        }
    }

    pub fn set_limit(&self, limit: NonZeroU32) -> Self {
        Self {
            limit,
            offset: 0,
            ..self.clone()
        }
    }

    pub fn next_page(&self) -> Self {
        Self {
            offset: self.offset.saturating_add(self.limit.get()),
            ..self.clone()
        }
    }

    /// Clamps at the first page instead of going negative.
    pub fn prev_page(&self) -> Self {
        Self {
            offset: self.offset.saturating_sub(self.limit.get()),
            ..self.clone()
        }
    }

    /// Jumps to a 1-indexed page; page 0 is treated as page 1.
    pub fn at_page(&self, page: u32) -> Self {
        Self {
            offset: page.saturating_sub(1).saturating_mul(self.limit.get()),
            ..self.clone()
        }
    }

    pub fn to_request(&self) -> ListUsersRequest {
        ListUsersRequest {
            name: self.name.clone(),
            age: self.age.clone(),
            limit: self.limit.get(),
            offset: self.offset,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryAction {
    SetName(String),
    SetAge(String),
    SetLimit(NonZeroU32),
    NextPage,
    PrevPage,
    /// 1-indexed; page 0 is treated as page 1.
    GoToPage(u32),
    /// Back to `initial`, typically the session's starting query.
    Reset { initial: Query },
}

impl QueryAction {
    pub fn label(&self) -> &'static str {
        match self {
            Self::SetName(_) => "set_name",
            Self::SetAge(_) => "set_age",
            Self::SetLimit(_) => "set_limit",
            Self::NextPage => "next_page",
            Self::PrevPage => "prev_page",
            Self::GoToPage(_) => "go_to_page",
            Self::Reset { .. } => "reset",
        }
    }
}

pub fn reduce(current: &Query, action: QueryAction) -> Query {
    match action {
        QueryAction::SetName(name) => current.set_name(name),
        QueryAction::SetAge(age) => current.set_age(age),
        QueryAction::SetLimit(limit) => current.set_limit(limit),
        QueryAction::NextPage => current.next_page(),
        QueryAction::PrevPage => current.prev_page(),
        QueryAction::GoToPage(page) => current.at_page(page),
        QueryAction::Reset { initial } => initial,
    }
}

#[cfg(test)]
#[path = "tests/query_tests.rs"]
mod tests;
