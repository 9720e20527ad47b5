use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::domain::UserProfile;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_base_url: String,
    pub api_token: Option<String>,
    pub request_timeout_secs: u64,
    pub page_limit: u32,
    pub start_path: String,
    pub dark_mode: bool,
    pub user: Option<UserProfile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            api_token: None,
            request_timeout_secs: 10,
            page_limit: 10,
            start_path: "/owner".to_string(),
            dark_mode: false,
            user: None,
        }
    }
}

impl Config {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    /// Signed-in profile, ignoring a `[user]` table with no name in it
    pub fn profile(&self) -> Option<UserProfile> {
        let named = |field: &Option<String>| field.as_deref().is_some_and(|s| !s.trim().is_empty());
        self.user
            .clone()
            .filter(|user| named(&user.first_name) || named(&user.last_name))
    }
}

pub fn load() -> Config {
    let Some(path) = config_path() else {
        return Config::default();
    };
    load_from(&path)
}

pub fn load_from(path: &Path) -> Config {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(_) => return Config::default(),
    };
    match toml::from_str::<Config>(&content) {
        Ok(config) => config,
        Err(err) => {
            log::warn!("ignoring invalid config {}: {err}", path.display());
            Config::default()
        }
    }
}

pub fn config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os("OWNER_DASH_CONFIG").map(PathBuf::from) {
        return Some(path);
    }
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from) {
        return Some(xdg.join("owner-dash").join("config.toml"));
    }
    if let Some(home) = std::env::var_os("HOME").map(PathBuf::from) {
        return Some(home.join(".config").join("owner-dash").join("config.toml"));
    }

    directories::ProjectDirs::from("io", "owner-dash", "owner-dash")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

pub fn data_dir() -> Option<PathBuf> {
    if let Some(xdg) = std::env::var_os("XDG_DATA_HOME").map(PathBuf::from) {
        return Some(xdg.join("owner-dash"));
    }
    if let Some(home) = std::env::var_os("HOME").map(PathBuf::from) {
        return Some(home.join(".local").join("share").join("owner-dash"));
    }
    directories::ProjectDirs::from("io", "owner-dash", "owner-dash")
        .map(|dirs| dirs.data_dir().to_path_buf())
}

pub fn log_path() -> Option<PathBuf> {
    data_dir().map(|dir| dir.join("owner-dash.log"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.page_limit, 10);
        assert_eq!(config.start_path, "/owner");
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
        assert!(config.profile().is_none());
    }

    #[test]
    fn test_parse_full_config() {
        let config: Config = toml::from_str(
            r#"
            api_base_url = "https://api.example.com"
            api_token = "abc"
            request_timeout_secs = 0
            page_limit = 25
            start_path = "/owner/cars"
            dark_mode = true

            [user]
            first_name = "Maria"
            last_name = "Santos"
            email = "maria@example.com"
            "#,
        )
        .unwrap();
        assert_eq!(config.api_base_url, "https://api.example.com");
        assert_eq!(config.api_token.as_deref(), Some("abc"));
        assert_eq!(config.request_timeout(), Duration::from_secs(1));
        assert_eq!(config.page_limit, 25);
        assert!(config.dark_mode);
        let user = config.profile().unwrap();
        assert_eq!(user.first_name.as_deref(), Some("Maria"));
        assert_eq!(user.email.as_deref(), Some("maria@example.com"));
    }

    #[test]
    fn test_nameless_user_is_ignored() {
        let config: Config = toml::from_str("[user]\nemail = \"x@example.com\"\n").unwrap();
        assert!(config.profile().is_none());
    }

    #[test]
    fn test_invalid_file_falls_back_to_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "page_limit = \"ten\"").unwrap();
        let config = load_from(file.path());
        assert_eq!(config.page_limit, 10);
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = load_from(Path::new("/definitely/not/here/config.toml"));
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
    }
}
