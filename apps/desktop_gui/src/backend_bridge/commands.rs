//! Backend commands queued from UI to backend worker.

use client_core::QueryAction;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCommand {
    Apply(QueryAction),
    Refresh,
    Reset,
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Apply(action) => action.label(),
            Self::Refresh => "refresh",
            Self::Reset => "reset",
        }
    }
}
