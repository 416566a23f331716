use serde::{Deserialize, Serialize};

use crate::domain::User;

/// Query parameters accepted by both the collection and diagnostic endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListUsersRequest {
    pub name: String,
    pub age: String,
    pub limit: u32,
    pub offset: u32,
}

/// One page of users plus the number of records matching the filters.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UsersPage {
    pub data: Vec<User>,
    pub total: u64,
}

impl UsersPage {
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
