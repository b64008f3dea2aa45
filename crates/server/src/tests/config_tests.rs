use super::Settings;

use std::{collections::HashMap, path::Path};

fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn defaults_point_at_local_checkout() {
    let settings = Settings::default();
    assert_eq!(settings.server_bind, "127.0.0.1:8501");
    assert_eq!(settings.repo_path, Path::new("./repo"));
    assert_eq!(settings.data_file, "drink_data.json");
    assert_eq!(settings.commit_message, "Updated drink data");
    assert!(settings.sync_enabled);
    assert_eq!(settings.remote_url(), None);
}

#[test]
fn file_values_override_defaults() {
    let mut settings = Settings::default();
    settings.apply_file(
        r#"
        bind_addr = "0.0.0.0:9000"
        repo_path = "/srv/ratings"
        repo_url = "https://example.com/ratings.git"
        sync_enabled = "off"
        "#,
    );

    assert_eq!(settings.server_bind, "0.0.0.0:9000");
    assert_eq!(settings.repo_path, Path::new("/srv/ratings"));
    assert_eq!(
        settings.remote_url().as_deref(),
        Some("https://example.com/ratings.git")
    );
    assert!(!settings.sync_enabled);
}

#[test]
fn malformed_file_is_ignored() {
    let mut settings = Settings::default();
    settings.apply_file("this is = = not toml");
    assert_eq!(settings, Settings::default());
}

#[test]
fn app_prefixed_env_wins_over_short_name() {
    let mut settings = Settings::default();
    settings.apply_env(env(&[
        ("SERVER_BIND", "127.0.0.1:1"),
        ("APP__BIND_ADDR", "127.0.0.1:2"),
        ("RATINGS_DATA_FILE", "short.json"),
        ("APP__DATA_FILE", "long.json"),
        ("RATINGS_SYNC", "false"),
        ("APP__COMMIT_MESSAGE", "ratings update"),
    ]));

    assert_eq!(settings.server_bind, "127.0.0.1:2");
    assert_eq!(settings.data_file, "long.json");
    assert!(!settings.sync_enabled);
    assert_eq!(settings.commit_message, "ratings update");
}

#[test]
fn unparseable_sync_flag_keeps_previous_value() {
    let mut settings = Settings::default();
    settings.apply_env(env(&[("RATINGS_SYNC", "maybe")]));
    assert!(settings.sync_enabled);
}

#[test]
fn blank_remote_url_is_treated_as_unset() {
    let mut settings = Settings::default();
    settings.apply_env(env(&[("RATINGS_REPO_URL", "   ")]));
    assert_eq!(settings.remote_url(), None);
}
