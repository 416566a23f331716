use std::{collections::HashMap, num::NonZeroU32, sync::Arc};

use async_trait::async_trait;
use client_core::{
    DirectoryError, FetchState, ListBody, Query, QueryAction, SessionEvent, UserDirectory,
    UserListSession, UserListView,
};
use shared::{
    domain::{User, UserAge, UserId},
    protocol::UsersPage,
};
use tokio::sync::{Mutex, Notify};

/// In-memory directory: substring match on name, exact match on age.
/// Requests for a gated name block until the gate is opened.
struct FakeDirectory {
    users: Vec<User>,
    primary_failure: Option<DirectoryError>,
    diagnostic_failure: DirectoryError,
    gates: Mutex<HashMap<String, Arc<Notify>>>,
}

impl FakeDirectory {
    fn with_users(count: i64) -> Self {
        let users = (1..=count)
            .map(|id| User {
                id: UserId(id),
                name: format!("user-{id}"),
                age: UserAge::Years(20 + (id % 3) as u32),
            })
            .collect();
        Self {
            users,
            primary_failure: None,
            diagnostic_failure: DirectoryError::Diagnostic("unexpected".to_string()),
            gates: Mutex::new(HashMap::new()),
        }
    }

    fn failing(primary: DirectoryError, diagnostic: DirectoryError) -> Self {
        Self {
            primary_failure: Some(primary),
            diagnostic_failure: diagnostic,
            ..Self::with_users(0)
        }
    }

    async fn gate(&self, name: &str) -> Arc<Notify> {
        self.gates
            .lock()
            .await
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(Notify::new()))
            .clone()
    }

    fn page_for(&self, query: &Query) -> UsersPage {
        let matching: Vec<User> = self
            .users
            .iter()
            .filter(|user| user.name.contains(query.name()))
            .filter(|user| query.age().is_empty() || user.age.to_string() == query.age())
            .cloned()
            .collect();
        UsersPage {
            total: matching.len() as u64,
            data: matching
                .into_iter()
                .skip(query.offset() as usize)
                .take(query.limit().get() as usize)
                .collect(),
        }
    }
}

#[async_trait]
impl UserDirectory for FakeDirectory {
    async fn request_users(&self, query: &Query) -> Result<UsersPage, DirectoryError> {
        let gate = self.gates.lock().await.get(query.name()).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        match &self.primary_failure {
            Some(err) => Err(err.clone()),
            None => Ok(self.page_for(query)),
        }
    }

    async fn request_users_with_error(&self, _query: &Query) -> Result<UsersPage, DirectoryError> {
        Err(self.diagnostic_failure.clone())
    }
}

fn limit(value: u32) -> NonZeroU32 {
    NonZeroU32::new(value).expect("non-zero")
}

fn page_sizes() -> Vec<NonZeroU32> {
    vec![limit(4), limit(8), limit(16)]
}

#[tokio::test]
async fn first_page_of_twelve_offers_next_only() {
    let session = UserListSession::new(
        Arc::new(FakeDirectory::with_users(12)),
        Query::with_limit(limit(5)),
    );

    let ticket = session.refresh().await;
    ticket.task.await.expect("fetch task");

    let snapshot = session.snapshot().await;
    assert_eq!(snapshot.fetch.page().map(|page| page.data.len()), Some(5));
    assert_eq!(snapshot.page_info.page, 1);
    assert!(!snapshot.page_info.has_prev);
    assert!(snapshot.page_info.has_next);
}

#[tokio::test]
async fn third_page_of_twelve_offers_prev_only() {
    let session = UserListSession::new(
        Arc::new(FakeDirectory::with_users(12)),
        Query::with_limit(limit(5)),
    );

    session.dispatch(QueryAction::NextPage).await;
    let ticket = session.dispatch(QueryAction::NextPage).await;
    assert_eq!(ticket.query.offset(), 10);
    ticket.task.await.expect("fetch task");

    let snapshot = session.snapshot().await;
    assert_eq!(snapshot.fetch.page().map(|page| page.data.len()), Some(2));
    assert_eq!(snapshot.page_info.page, 3);
    assert!(snapshot.page_info.has_prev);
    assert!(!snapshot.page_info.has_next);
}

#[tokio::test]
async fn transport_fault_shows_diagnostic_banner_and_clears_loading() {
    let session = UserListSession::new(
        Arc::new(FakeDirectory::failing(
            DirectoryError::Transport("connection reset".to_string()),
            DirectoryError::Diagnostic("rate limited".to_string()),
        )),
        Query::default(),
    );
    let mut events = session.subscribe_events();

    let ticket = session.refresh().await;
    ticket.task.await.expect("fetch task");

    let SessionEvent::StateChanged(loading) = events.recv().await.expect("loading event");
    assert!(loading.fetch.is_loading());
    let SessionEvent::StateChanged(settled) = events.recv().await.expect("settled event");
    assert_eq!(settled.fetch, FetchState::Failure("rate limited".to_string()));

    let view = UserListView::from_snapshot(&session.snapshot().await, &page_sizes());
    assert_eq!(
        view.body,
        ListBody::Error("Failed to fetch users: rate limited".to_string())
    );
}

#[tokio::test]
async fn no_matches_render_empty_state_row() {
    let session = UserListSession::new(
        Arc::new(FakeDirectory::with_users(12)),
        Query::with_limit(limit(8)),
    );

    let ticket = session
        .dispatch(QueryAction::SetName("nobody".to_string()))
        .await;
    ticket.task.await.expect("fetch task");

    let snapshot = session.snapshot().await;
    assert_eq!(snapshot.fetch.page().map(|page| page.total), Some(0));
    assert!(!snapshot.page_info.has_next);
    let view = UserListView::from_snapshot(&snapshot, &page_sizes());
    assert_eq!(view.body, ListBody::Empty("Users not found"));
}

#[tokio::test]
async fn stale_response_does_not_overwrite_newer_query() {
    let directory = Arc::new(FakeDirectory::with_users(12));
    let slow_gate = directory.gate("user-1").await;
    let session = UserListSession::new(directory.clone(), Query::with_limit(limit(16)));

    let stale = session
        .dispatch(QueryAction::SetName("user-1".to_string()))
        .await;
    let fresh = session
        .dispatch(QueryAction::SetName("user-2".to_string()))
        .await;
    assert!(fresh.request_id > stale.request_id);

    fresh.task.await.expect("fresh fetch");
    slow_gate.notify_one();
    stale.task.await.expect("stale fetch");

    let snapshot = session.snapshot().await;
    assert_eq!(snapshot.query.name(), "user-2");
    assert_eq!(snapshot.request_id, fresh.request_id);
    let page = snapshot.fetch.page().expect("fresh page committed");
    assert_eq!(page.data.len(), 1);
    assert_eq!(page.data[0].name, "user-2");
}

#[tokio::test]
async fn pagination_keeps_last_total_while_next_page_loads() {
    let directory = Arc::new(FakeDirectory::with_users(12));
    let session = UserListSession::new(directory.clone(), Query::with_limit(limit(4)));

    session.refresh().await.task.await.expect("first fetch");
    let gate = directory.gate("").await;
    let ticket = session.dispatch(QueryAction::NextPage).await;

    let loading = session.snapshot().await;
    assert!(loading.fetch.is_loading());
    assert_eq!(loading.page_info.page, 2);
    assert!(loading.page_info.has_prev);
    assert!(loading.page_info.has_next);

    gate.notify_one();
    ticket.task.await.expect("second fetch");
    assert_eq!(
        session.snapshot().await.fetch.page().map(|page| page.data[0].id),
        Some(UserId(5))
    );
}

#[tokio::test]
async fn reset_returns_to_initial_query() {
    let session = UserListSession::new(
        Arc::new(FakeDirectory::with_users(12)),
        Query::with_limit(limit(4)),
    );

    session
        .dispatch(QueryAction::SetLimit(limit(8)))
        .await
        .task
        .await
        .expect("limit fetch");
    session.dispatch(QueryAction::NextPage).await;
    let ticket = session.reset().await;
    ticket.task.await.expect("reset fetch");

    let snapshot = session.snapshot().await;
    assert_eq!(&snapshot.query, session.initial_query());
    assert_eq!(snapshot.page_info.page, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn events_arrive_in_request_order_under_rapid_dispatch() {
    let session = UserListSession::new(
        Arc::new(FakeDirectory::with_users(12)),
        Query::with_limit(limit(4)),
    );
    let mut events = session.subscribe_events();

    let mut tickets = Vec::new();
    for round in 0..50 {
        let action = if round % 2 == 0 {
            QueryAction::NextPage
        } else {
            QueryAction::PrevPage
        };
        tickets.push(session.dispatch(action).await);
    }
    for ticket in tickets {
        ticket.task.await.expect("fetch task");
    }

    let mut last_seen = 0;
    while let Ok(SessionEvent::StateChanged(snapshot)) = events.try_recv() {
        assert!(
            snapshot.request_id >= last_seen,
            "request {} arrived after {last_seen}",
            snapshot.request_id
        );
        last_seen = snapshot.request_id;
    }
    assert_eq!(last_seen, 50);
}
