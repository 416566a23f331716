//! Maps UI intents onto backend commands, respecting the current pagination affordances.

use std::num::NonZeroU32;

use client_core::{PaginationBar, QueryAction};

use crate::backend_bridge::commands::BackendCommand;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiIntent {
    NameEdited(String),
    AgeEdited(String),
    PageSizeSelected(NonZeroU32),
    PrevPageClicked,
    NextPageClicked,
    RetryClicked,
    ResetClicked,
}

/// `None` when the intent is a no-op in the current state, e.g. "next" on the
/// last page or re-selecting the active page size.
pub fn command_for_intent(intent: UiIntent, pagination: &PaginationBar) -> Option<BackendCommand> {
    match intent {
        UiIntent::NameEdited(name) => Some(BackendCommand::Apply(QueryAction::SetName(name))),
        UiIntent::AgeEdited(age) => Some(BackendCommand::Apply(QueryAction::SetAge(
            sanitize_age(&age),
        ))),
        UiIntent::PageSizeSelected(limit) if limit != pagination.limit => {
            Some(BackendCommand::Apply(QueryAction::SetLimit(limit)))
        }
        UiIntent::PageSizeSelected(_) => None,
        UiIntent::PrevPageClicked if pagination.has_prev => {
            Some(BackendCommand::Apply(QueryAction::PrevPage))
        }
        UiIntent::NextPageClicked if pagination.has_next => {
            Some(BackendCommand::Apply(QueryAction::NextPage))
        }
        UiIntent::PrevPageClicked | UiIntent::NextPageClicked => None,
        UiIntent::RetryClicked => Some(BackendCommand::Refresh),
        UiIntent::ResetClicked => Some(BackendCommand::Reset),
    }
}

/// The age field is numeric; anything else typed into it is dropped.
pub fn sanitize_age(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}
