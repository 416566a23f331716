use std::{fs, num::NonZeroU32, path::Path, time::Duration};

use serde::Deserialize;
use tracing::warn;
use url::Url;

use crate::query::{Query, DEFAULT_PAGE_SIZE};

pub const SETTINGS_FILE: &str = "user_directory.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub server_url: String,
    pub users_path: String,
    pub diagnostic_path: String,
    pub request_timeout: Duration,
    pub initial_page_size: NonZeroU32,
    pub page_size_options: Vec<NonZeroU32>,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:8080".into(),
            users_path: "/users".into(),
            diagnostic_path: "/users/with-error".into(),
            request_timeout: Duration::from_secs(10),
            initial_page_size: DEFAULT_PAGE_SIZE,
            page_size_options: [4, 8, 16].into_iter().filter_map(NonZeroU32::new).collect(),
        }
    }
}

impl ClientSettings {
    pub fn initial_query(&self) -> Query {
        Query::with_limit(self.initial_page_size)
    }

    pub fn users_url(&self) -> Result<Url, url::ParseError> {
        endpoint_url(&self.server_url, &self.users_path)
    }

    pub fn diagnostic_url(&self) -> Result<Url, url::ParseError> {
        endpoint_url(&self.server_url, &self.diagnostic_path)
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    server_url: Option<String>,
    users_path: Option<String>,
    diagnostic_path: Option<String>,
    request_timeout_secs: Option<u64>,
    initial_page_size: Option<u32>,
    page_size_options: Option<Vec<u32>>,
}

/// Defaults, then `user_directory.toml` in the working directory, then
/// `APP__*` environment variables.
pub fn load_settings() -> ClientSettings {
    load_settings_from(Path::new(SETTINGS_FILE), &|name| std::env::var(name).ok())
}

pub fn load_settings_from(path: &Path, env: &dyn Fn(&str) -> Option<String>) -> ClientSettings {
    let raw = fs::read_to_string(path).ok();
    settings_from_sources(raw.as_deref(), env)
}

pub fn settings_from_sources(
    file_contents: Option<&str>,
    env: &dyn Fn(&str) -> Option<String>,
) -> ClientSettings {
    let mut settings = ClientSettings::default();

    if let Some(raw) = file_contents {
        match toml::from_str::<FileSettings>(raw) {
            Ok(file_cfg) => apply_file_settings(&mut settings, file_cfg),
            Err(err) => warn!("ignoring unreadable {SETTINGS_FILE}: {err}"),
        }
    }

    if let Some(v) = env("APP__SERVER_URL") {
        settings.server_url = v;
    }
    if let Some(v) = env("APP__USERS_PATH") {
        settings.users_path = v;
    }
    if let Some(v) = env("APP__DIAGNOSTIC_PATH") {
        settings.diagnostic_path = v;
    }
    if let Some(v) = env("APP__REQUEST_TIMEOUT_SECS") {
        match v.parse::<u64>() {
            Ok(secs) => settings.request_timeout = Duration::from_secs(secs),
            Err(err) => warn!("ignoring APP__REQUEST_TIMEOUT_SECS={v}: {err}"),
        }
    }
    if let Some(v) = env("APP__INITIAL_PAGE_SIZE") {
        match v.parse::<NonZeroU32>() {
            Ok(size) => settings.initial_page_size = size,
            Err(err) => warn!("ignoring APP__INITIAL_PAGE_SIZE={v}: {err}"),
        }
    }

    settings
}

fn apply_file_settings(settings: &mut ClientSettings, file_cfg: FileSettings) {
    if let Some(v) = file_cfg.server_url {
        settings.server_url = v;
    }
    if let Some(v) = file_cfg.users_path {
        settings.users_path = v;
    }
    if let Some(v) = file_cfg.diagnostic_path {
        settings.diagnostic_path = v;
    }
    if let Some(v) = file_cfg.request_timeout_secs {
        settings.request_timeout = Duration::from_secs(v);
    }
    if let Some(v) = file_cfg.initial_page_size {
        match NonZeroU32::new(v) {
            Some(size) => settings.initial_page_size = size,
            None => warn!("ignoring initial_page_size = 0 in {SETTINGS_FILE}"),
        }
    }
    if let Some(options) = file_cfg.page_size_options {
        let options: Vec<NonZeroU32> = options.into_iter().filter_map(NonZeroU32::new).collect();
        if options.is_empty() {
            warn!("ignoring empty page_size_options in {SETTINGS_FILE}");
        } else {
            settings.page_size_options = options;
        }
    }
}

fn endpoint_url(server_url: &str, path: &str) -> Result<Url, url::ParseError> {
    let base = Url::parse(server_url.trim_end_matches('/'))?;
    base.join(path)
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
