use std::{
    collections::HashMap,
    env, fs,
    time::{SystemTime, UNIX_EPOCH},
};

use super::*;

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |name| vars.get(name).cloned()
}

fn limit(value: u32) -> NonZeroU32 {
    NonZeroU32::new(value).expect("non-zero")
}

#[test]
fn defaults_without_file_or_env() {
    let settings = settings_from_sources(None, &env_from(&[]));
    assert_eq!(settings, ClientSettings::default());
    assert_eq!(settings.initial_page_size, limit(5));
    assert_eq!(
        settings.page_size_options,
        vec![limit(4), limit(8), limit(16)]
    );
}

#[test]
fn file_values_override_defaults() {
    let raw = r#"
server_url = "http://directory.internal:9000"
request_timeout_secs = 3
initial_page_size = 8
page_size_options = [8, 0, 32]
"#;
    let settings = settings_from_sources(Some(raw), &env_from(&[]));

    assert_eq!(settings.server_url, "http://directory.internal:9000");
    assert_eq!(settings.request_timeout, Duration::from_secs(3));
    assert_eq!(settings.initial_page_size, limit(8));
    assert_eq!(settings.page_size_options, vec![limit(8), limit(32)]);
    assert_eq!(settings.users_path, "/users");
}

#[test]
fn env_overrides_file() {
    let raw = r#"server_url = "http://from-file:1""#;
    let settings = settings_from_sources(
        Some(raw),
        &env_from(&[
            ("APP__SERVER_URL", "http://from-env:2"),
            ("APP__INITIAL_PAGE_SIZE", "16"),
        ]),
    );

    assert_eq!(settings.server_url, "http://from-env:2");
    assert_eq!(settings.initial_page_size, limit(16));
    assert_eq!(settings.initial_query().limit(), limit(16));
}

#[test]
fn invalid_values_keep_previous_settings() {
    let settings = settings_from_sources(
        Some("initial_page_size = 0\npage_size_options = [0]"),
        &env_from(&[
            ("APP__REQUEST_TIMEOUT_SECS", "soon"),
            ("APP__INITIAL_PAGE_SIZE", "0"),
        ]),
    );
    assert_eq!(settings, ClientSettings::default());

    let garbage = settings_from_sources(Some("not = [valid"), &env_from(&[]));
    assert_eq!(garbage, ClientSettings::default());
}

#[test]
fn joins_endpoint_paths_onto_server_url() {
    let settings = ClientSettings {
        server_url: "http://127.0.0.1:8080/".into(),
        ..ClientSettings::default()
    };
    assert_eq!(
        settings.users_url().expect("users url").as_str(),
        "http://127.0.0.1:8080/users"
    );
    assert_eq!(
        settings.diagnostic_url().expect("diagnostic url").as_str(),
        "http://127.0.0.1:8080/users/with-error"
    );
}

#[test]
fn reads_settings_file_from_disk() {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let temp_root = env::temp_dir().join(format!("user_directory_config_test_{suffix}"));
    fs::create_dir_all(&temp_root).expect("temp root");
    let path = temp_root.join(SETTINGS_FILE);
    fs::write(&path, "users_path = \"/v2/users\"\n").expect("write settings");

    let settings = load_settings_from(&path, &env_from(&[]));
    assert_eq!(settings.users_path, "/v2/users");

    let missing = load_settings_from(&temp_root.join("absent.toml"), &env_from(&[]));
    assert_eq!(missing, ClientSettings::default());

    fs::remove_dir_all(temp_root).expect("cleanup");
}
