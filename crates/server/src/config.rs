use std::{collections::HashMap, fs, path::PathBuf};

use repo_sync::DEFAULT_COMMIT_MESSAGE;
use storage::DEFAULT_DATA_FILE;

pub const SETTINGS_FILE: &str = "ratings.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub server_bind: String,
    pub repo_path: PathBuf,
    pub repo_url: Option<String>,
    pub data_file: String,
    pub sync_enabled: bool,
    pub commit_message: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_bind: "127.0.0.1:8501".into(),
            repo_path: PathBuf::from("./repo"),
            repo_url: None,
            data_file: DEFAULT_DATA_FILE.into(),
            sync_enabled: true,
            commit_message: DEFAULT_COMMIT_MESSAGE.into(),
        }
    }
}

impl Settings {
    /// Applies the flat `key = "value"` pairs of a settings file. Unknown keys are ignored.
    pub fn apply_file(&mut self, raw: &str) {
        let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(raw) else {
            return;
        };

        if let Some(v) = file_cfg.get("bind_addr") {
            self.server_bind = v.clone();
        }
        if let Some(v) = file_cfg.get("repo_path") {
            self.repo_path = PathBuf::from(v);
        }
        if let Some(v) = file_cfg.get("repo_url") {
            self.repo_url = Some(v.clone());
        }
        if let Some(v) = file_cfg.get("data_file") {
            self.data_file = v.clone();
        }
        if let Some(v) = file_cfg.get("sync_enabled").and_then(|v| parse_flag(v)) {
            self.sync_enabled = v;
        }
        if let Some(v) = file_cfg.get("commit_message") {
            self.commit_message = v.clone();
        }
    }

    /// Applies environment overrides. `APP__*` names win over the short ones.
    pub fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(v) = var("SERVER_BIND") {
            self.server_bind = v;
        }
        if let Some(v) = var("APP__BIND_ADDR") {
            self.server_bind = v;
        }

        if let Some(v) = var("RATINGS_REPO_PATH") {
            self.repo_path = PathBuf::from(v);
        }
        if let Some(v) = var("APP__REPO_PATH") {
            self.repo_path = PathBuf::from(v);
        }

        if let Some(v) = var("RATINGS_REPO_URL") {
            self.repo_url = Some(v);
        }
        if let Some(v) = var("APP__REPO_URL") {
            self.repo_url = Some(v);
        }

        if let Some(v) = var("RATINGS_DATA_FILE") {
            self.data_file = v;
        }
        if let Some(v) = var("APP__DATA_FILE") {
            self.data_file = v;
        }

        if let Some(v) = var("RATINGS_SYNC").and_then(|v| parse_flag(&v)) {
            self.sync_enabled = v;
        }
        if let Some(v) = var("APP__SYNC_ENABLED").and_then(|v| parse_flag(&v)) {
            self.sync_enabled = v;
        }

        if let Some(v) = var("APP__COMMIT_MESSAGE") {
            self.commit_message = v;
        }
    }

    /// Remote url with blank values treated as unset.
    pub fn remote_url(&self) -> Option<String> {
        self.repo_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(str::to_string)
    }
}

pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(SETTINGS_FILE) {
        settings.apply_file(&raw);
    }
    settings.apply_env(|key| std::env::var(key).ok());

    settings
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
