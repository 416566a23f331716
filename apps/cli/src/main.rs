use std::{num::NonZeroU32, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use client_core::{
    load_settings, HttpUserDirectory, QueryAction, UserListSession, UserListView,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(about = "Fetch one page of users from the directory")]
struct Args {
    /// Overrides `server_url` from user_directory.toml / APP__SERVER_URL.
    #[arg(long)]
    server_url: Option<String>,
    /// Substring filter on the user name.
    #[arg(long, default_value = "")]
    name: String,
    #[arg(long, default_value = "")]
    age: String,
    /// Page size; defaults to the configured initial page size.
    #[arg(long)]
    limit: Option<NonZeroU32>,
    /// 1-indexed page number.
    #[arg(long, default_value_t = 1)]
    page: u32,
}

impl Args {
    fn actions(&self) -> Vec<QueryAction> {
        let mut actions = Vec::new();
        if let Some(limit) = self.limit {
            actions.push(QueryAction::SetLimit(limit));
        }
        actions.push(QueryAction::SetName(self.name.clone()));
        actions.push(QueryAction::SetAge(self.age.clone()));
        actions.push(QueryAction::GoToPage(self.page));
        actions
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = load_settings();
    if let Some(server_url) = &args.server_url {
        settings.server_url = server_url.clone();
    }
    let directory = HttpUserDirectory::from_settings(&settings)
        .with_context(|| format!("invalid directory url '{}'", settings.server_url))?;
    let session = UserListSession::new(Arc::new(directory), settings.initial_query());

    tracing::info!(server_url = %settings.server_url, "requesting users");
    let ticket = session.dispatch_batch(args.actions()).await;
    ticket.task.await.context("users fetch task failed")?;

    let snapshot = session.snapshot().await;
    let view = UserListView::from_snapshot(&snapshot, &settings.page_size_options);
    for line in view.to_lines() {
        println!("{line}");
    }

    Ok(())
}
