//! Query state and fetch orchestration for the user directory front ends.

pub mod config;
pub mod directory;
pub mod error;
pub mod fetch;
pub mod http_directory;
pub mod pagination;
pub mod query;
pub mod session;
pub mod view;

pub use config::{load_settings, ClientSettings};
pub use directory::{MissingUserDirectory, UserDirectory};
pub use error::DirectoryError;
pub use fetch::{fetch_users, FetchResult, FetchState, FetchStep, GENERIC_FETCH_ERROR};
pub use http_directory::HttpUserDirectory;
pub use pagination::PageInfo;
pub use query::{reduce, Query, QueryAction};
pub use session::{FetchTicket, RequestId, SessionEvent, SessionSnapshot, UserListSession};
pub use view::{ListBody, PaginationBar, UserListView};
