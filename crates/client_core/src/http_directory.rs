use async_trait::async_trait;
use reqwest::{Client, Response};
use shared::{error::ApiError, protocol::UsersPage};
use url::Url;

use crate::{config::ClientSettings, directory::UserDirectory, error::DirectoryError, query::Query};

/// [`UserDirectory`] backed by the HTTP collection and diagnostic endpoints.
pub struct HttpUserDirectory {
    http: Client,
    users_url: Url,
    diagnostic_url: Url,
}

impl HttpUserDirectory {
    pub fn new(http: Client, users_url: Url, diagnostic_url: Url) -> Self {
        Self {
            http,
            users_url,
            diagnostic_url,
        }
    }

    pub fn from_settings(settings: &ClientSettings) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(settings.request_timeout)
            .build()?;
        Ok(Self::new(
            http,
            settings.users_url()?,
            settings.diagnostic_url()?,
        ))
    }

    async fn send(&self, url: &Url, query: &Query) -> Result<Response, DirectoryError> {
        self.http
            .get(url.clone())
            .query(&query.to_request())
            .send()
            .await
            .map_err(|err| DirectoryError::Transport(err.to_string()))
    }
}

#[async_trait]
impl UserDirectory for HttpUserDirectory {
    async fn request_users(&self, query: &Query) -> Result<UsersPage, DirectoryError> {
        self.send(&self.users_url, query)
            .await?
            .error_for_status()
            .map_err(|err| DirectoryError::Transport(err.to_string()))?
            .json::<UsersPage>()
            .await
            .map_err(|err| DirectoryError::Transport(err.to_string()))
    }

    async fn request_users_with_error(&self, query: &Query) -> Result<UsersPage, DirectoryError> {
        let res = self.send(&self.diagnostic_url, query).await?;
        let status = res.status();
        if status.is_success() {
            return res
                .json::<UsersPage>()
                .await
                .map_err(|err| DirectoryError::Transport(err.to_string()));
        }

        let body = res
            .text()
            .await
            .map_err(|err| DirectoryError::Transport(err.to_string()))?;
        Err(DirectoryError::Diagnostic(diagnostic_message(
            status, &body,
        )))
    }
}

/// Prefers a JSON [`ApiError`] message, then the raw body, then the status line.
pub(crate) fn diagnostic_message(status: reqwest::StatusCode, body: &str) -> String {
    if let Ok(api_error) = serde_json::from_str::<ApiError>(body) {
        return api_error.message;
    }

    let body = body.trim();
    if !body.is_empty() {
        return body.to_string();
    }

    match status.canonical_reason() {
        Some(reason) => format!("{} {reason}", status.as_u16()),
        None => status.as_u16().to_string(),
    }
}

#[cfg(test)]
#[path = "tests/http_directory_tests.rs"]
mod tests;
