use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_APP_URL: &str = "http://localhost:3000";
pub const DEFAULT_SYNC_DELAY_MS: u64 = 3000;
pub const ENV_BASE_URL: &str = "EMAILING_BASE_URL";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub app_url: Option<String>,
    #[serde(default)]
    pub sync_delay_ms: Option<u64>,
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
    /// Raw `name=value` pair seeded into the cookie jar for every request.
    #[serde(default)]
    pub session_cookie: Option<String>,
}

impl Settings {
    /// Resolves the backend origin: explicit override, then `EMAILING_BASE_URL`,
    /// then the profile value, then the local default.
    pub fn base_url(&self, override_url: Option<&str>) -> AppResult<String> {
        if let Some(url) = override_url.map(str::trim).filter(|url| !url.is_empty()) {
            return normalize_base_url(url);
        }

        if let Some(url) = env_non_empty(ENV_BASE_URL) {
            return normalize_base_url(&url);
        }

        normalize_base_url(self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL))
    }

    pub fn app_url(&self) -> AppResult<String> {
        normalize_base_url(self.app_url.as_deref().unwrap_or(DEFAULT_APP_URL))
    }

    pub fn sync_delay(&self) -> Duration {
        Duration::from_millis(self.sync_delay_ms.unwrap_or(DEFAULT_SYNC_DELAY_MS))
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }

    pub fn session_cookie(&self) -> Option<&str> {
        self.session_cookie
            .as_deref()
            .map(str::trim)
            .filter(|cookie| !cookie.is_empty())
    }
}

pub fn normalize_base_url(raw: &str) -> AppResult<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(AppError::Config("base url must not be empty".to_string()));
    }

    let parsed = url::Url::parse(trimmed)?;
    if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
        return Err(AppError::Config(format!(
            "base url must use http:// or https:// and include a host, got `{trimmed}`"
        )));
    }

    Ok(trimmed.to_string())
}

fn env_non_empty(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

pub fn load(path: PathBuf) -> AppResult<Settings> {
    if !path.exists() {
        return Ok(Settings::default());
    }

    let raw = fs::read_to_string(path)?;
    let settings = serde_json::from_str(&raw)?;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_trailing_slash() {
        assert_eq!(
            normalize_base_url(" http://localhost:8000/ ").expect("valid url"),
            "http://localhost:8000"
        );
    }

    #[test]
    fn rejects_non_http_scheme() {
        assert!(matches!(
            normalize_base_url("ftp://example.com"),
            Err(AppError::Config(_))
        ));
        assert!(normalize_base_url("").is_err());
    }

    #[test]
    fn explicit_override_wins() {
        let settings = Settings {
            base_url: Some("http://profile.example".to_string()),
            ..Settings::default()
        };
        assert_eq!(
            settings
                .base_url(Some("https://cli.example/"))
                .expect("valid override"),
            "https://cli.example"
        );
    }

    #[test]
    fn defaults_apply_when_fields_missing() {
        let settings: Settings = serde_json::from_str("{}").expect("empty settings parse");
        assert_eq!(settings.sync_delay(), Duration::from_millis(3000));
        assert_eq!(settings.request_timeout(), None);
        assert_eq!(settings.session_cookie(), None);
        assert_eq!(settings.app_url().expect("default app url"), DEFAULT_APP_URL);
    }

    #[test]
    fn zero_timeout_means_no_timeout() {
        let settings = Settings {
            request_timeout_secs: Some(0),
            ..Settings::default()
        };
        assert_eq!(settings.request_timeout(), None);
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let settings = load(dir.path().join("absent.json")).expect("defaults");
        assert!(settings.base_url.is_none());
    }
}
