//! Owns the current query and fetch state and makes sure only the newest
//! request's outcome is committed.

use std::sync::Arc;

use tokio::{
    sync::{broadcast, Mutex},
    task::JoinHandle,
};
use tracing::{debug, info};

use crate::{
    directory::UserDirectory,
    fetch::{fetch_users, FetchState},
    pagination::{derive, PageInfo},
    query::{reduce, Query, QueryAction},
};

pub type RequestId = u64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub query: Query,
    pub fetch: FetchState,
    pub page_info: PageInfo,
    pub request_id: RequestId,
}

#[derive(Debug, Clone)]
pub enum SessionEvent {
    StateChanged(SessionSnapshot),
}

/// Handle to the fetch started by a dispatch. Awaiting `task` waits until the
/// outcome is committed or discarded as stale.
pub struct FetchTicket {
    pub request_id: RequestId,
    pub query: Query,
    pub task: JoinHandle<()>,
}

struct SessionState {
    query: Query,
    fetch: FetchState,
    /// Total from the most recent successful page; keeps pagination usable while
    /// the next page loads or after a failure.
    last_total: u64,
    latest_request: RequestId,
}

impl SessionState {
    fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            query: self.query.clone(),
            fetch: self.fetch.clone(),
            page_info: derive(&self.query, self.last_total),
            request_id: self.latest_request,
        }
    }
}

pub struct UserListSession {
    directory: Arc<dyn UserDirectory>,
    initial_query: Query,
    inner: Mutex<SessionState>,
    events: broadcast::Sender<SessionEvent>,
}

impl UserListSession {
    pub fn new(directory: Arc<dyn UserDirectory>, initial_query: Query) -> Arc<Self> {
        let (events, _) = broadcast::channel(256);
        Arc::new(Self {
            directory,
            inner: Mutex::new(SessionState {
                query: initial_query.clone(),
                fetch: FetchState::Idle,
                last_total: 0,
                latest_request: 0,
            }),
            initial_query,
            events,
        })
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        self.inner.lock().await.snapshot()
    }

    pub fn initial_query(&self) -> &Query {
        &self.initial_query
    }

    /// Applies `action` to the current query and starts a fetch for the result.
    /// Every dispatch fetches, even when the query did not change.
    pub async fn dispatch(self: &Arc<Self>, action: QueryAction) -> FetchTicket {
        self.dispatch_batch([action]).await
    }

    /// Applies `actions` in order and starts a single fetch for the final query.
    /// An empty batch refetches the current query.
    pub async fn dispatch_batch(
        self: &Arc<Self>,
        actions: impl IntoIterator<Item = QueryAction>,
    ) -> FetchTicket {
        let mut labels = Vec::new();
        // Snapshots are sent while the lock is held so subscribers see them in request order.
        let (request_id, query) = {
            let mut guard = self.inner.lock().await;
            for action in actions {
                labels.push(action.label());
                guard.query = reduce(&guard.query, action);
            }
            guard.latest_request += 1;
            guard.fetch = FetchState::Loading;
            let _ = self.events.send(SessionEvent::StateChanged(guard.snapshot()));
            (guard.latest_request, guard.query.clone())
        };
        info!(
            actions = ?labels,
            request_id,
            name = query.name(),
            age = query.age(),
            limit = query.limit().get(),
            offset = query.offset(),
            "fetching users"
        );

        let session = Arc::clone(self);
        let task_query = query.clone();
        let task = tokio::spawn(async move {
            let outcome = fetch_users(session.directory.as_ref(), &task_query).await;
            session.commit(request_id, outcome).await;
        });

        FetchTicket {
            request_id,
            query,
            task,
        }
    }

    /// Fetches the current query again.
    pub async fn refresh(self: &Arc<Self>) -> FetchTicket {
        self.dispatch_batch(Vec::<QueryAction>::new()).await
    }

    pub async fn reset(self: &Arc<Self>) -> FetchTicket {
        self.dispatch(QueryAction::Reset {
            initial: self.initial_query.clone(),
        })
        .await
    }

    async fn commit(&self, request_id: RequestId, outcome: FetchState) {
        let mut guard = self.inner.lock().await;
        if request_id != guard.latest_request {
            debug!(
                request_id,
                latest_request = guard.latest_request,
                "discarding stale users response"
            );
            return;
        }
        if let FetchState::Success(page) = &outcome {
            guard.last_total = page.total;
        }
        guard.fetch = outcome;
        let _ = self.events.send(SessionEvent::StateChanged(guard.snapshot()));
    }
}
