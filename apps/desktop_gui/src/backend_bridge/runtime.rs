//! Runtime bridge between UI command queue and backend event intake.

use std::{sync::Arc, thread};

use client_core::{
    ClientSettings, FetchTicket, HttpUserDirectory, SessionEvent, UserListSession,
};
use crossbeam_channel::{Receiver, Sender, TrySendError};
use tokio::sync::broadcast::error::RecvError;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};

pub fn launch(settings: ClientSettings, cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>) {
    thread::spawn(move || {
        let _ = ui_tx.try_send(UiEvent::Info("Backend worker starting...".to_string()));
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("backend worker startup failure: failed to build runtime: {err}"),
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            let directory = match HttpUserDirectory::from_settings(&settings) {
                Ok(directory) => directory,
                Err(err) => {
                    let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                        UiErrorContext::BackendStartup,
                        format!("invalid directory url '{}': {err}", settings.server_url),
                    )));
                    tracing::error!(server_url = %settings.server_url, "failed to build user directory client: {err}");
                    return;
                }
            };

            let session = UserListSession::new(Arc::new(directory), settings.initial_query());
            let event_task = tokio::spawn(forward_session_events(
                session.subscribe_events(),
                ui_tx.clone(),
            ));
            let _ = ui_tx.try_send(UiEvent::Info(format!(
                "Connected to {}",
                settings.server_url
            )));

            // Blocking receive is fine here: fetches run on the runtime's worker threads.
            while let Ok(cmd) = cmd_rx.recv() {
                tracing::debug!(command = cmd.name(), "backend command received");
                let ticket = match cmd {
                    BackendCommand::Apply(action) => session.dispatch(action).await,
                    BackendCommand::Refresh => session.refresh().await,
                    BackendCommand::Reset => session.reset().await,
                };
                watch_ticket(ticket, ui_tx.clone());
            }

            tracing::info!("ui command channel closed; stopping backend worker");
            event_task.abort();
        });
    });
}

async fn forward_session_events(
    mut events: tokio::sync::broadcast::Receiver<SessionEvent>,
    ui_tx: Sender<UiEvent>,
) {
    loop {
        match events.recv().await {
            Ok(SessionEvent::StateChanged(snapshot)) => {
                match ui_tx.try_send(UiEvent::Session(snapshot)) {
                    Ok(()) => {}
                    Err(TrySendError::Full(_)) => {
                        tracing::warn!("ui event queue full; dropping session snapshot");
                    }
                    Err(TrySendError::Disconnected(_)) => break,
                }
            }
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "session event receiver lagged");
            }
            Err(RecvError::Closed) => break,
        }
    }
}

/// Fetch outcomes arrive through session events; only a crashed fetch task needs reporting.
fn watch_ticket(ticket: FetchTicket, ui_tx: Sender<UiEvent>) {
    let request_id = ticket.request_id;
    tokio::spawn(async move {
        if let Err(err) = ticket.task.await {
            if err.is_panic() {
                tracing::error!(request_id, "users fetch task panicked: {err}");
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::Backend,
                    format!("users fetch {request_id} crashed: {err}"),
                )));
            }
        }
    });
}
