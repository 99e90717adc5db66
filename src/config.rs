// ⚙️ Settings - one immutable value handed to each batch driver at startup
//
// Sources, later wins:
// 1. built-in defaults
// 2. `config/config.json` (optional)
// 3. environment: REF_CODE, USE_PROXY, CAPTCHA_TOKEN, REGISTER_URL, IP_CHECK_URL

use crate::logging::{log, Severity};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = "config/config.json";

/// Attempts at `fetch_user_data` per account.
pub const RETRY_LIMIT: u32 = 3;

/// Total points at which an account is pruned from the store (inclusive).
pub const MINIMUM_POINTS_THRESHOLD: f64 = 19000.00;

/// Per-call HTTP timeout for registration.
pub const REQUEST_TIMEOUT_SECS: u64 = 120;

pub const DEFAULT_IP_CHECK_URL: &str = "https://api.ipify.org?format=json";

/// Registration endpoint used when neither the config file nor REGISTER_URL sets one.
pub const DEFAULT_REGISTER_URL: &str = "http://127.0.0.1:8080/api/auth/register";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Referral code sent with each registration (null when absent)
    #[serde(alias = "REF_CODE", alias = "refCode")]
    pub ref_code: Option<String>,

    /// Route registrations through the positional proxy from `proxy.txt`
    #[serde(alias = "USE_PROXY", alias = "useProxy")]
    pub use_proxy: bool,

    /// Pre-obtained CAPTCHA token; without one, every registration is abandoned
    #[serde(alias = "CAPTCHA_TOKEN", alias = "captchaToken")]
    pub captcha_token: Option<String>,

    /// Registration endpoint (POST, JSON body)
    #[serde(alias = "REGISTER_URL", alias = "registerUrl")]
    pub register_url: String,

    /// IP-echo endpoint used to verify a proxy's egress address
    #[serde(alias = "IP_CHECK_URL", alias = "ipCheckUrl")]
    pub ip_check_url: String,

    pub request_timeout_secs: u64,
    pub retry_limit: u32,
    pub points_threshold: f64,

    pub register_file: PathBuf,
    pub proxy_file: PathBuf,
    pub accounts_file: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            ref_code: None,
            use_proxy: false,
            captcha_token: None,
            register_url: DEFAULT_REGISTER_URL.to_string(),
            ip_check_url: DEFAULT_IP_CHECK_URL.to_string(),
            request_timeout_secs: REQUEST_TIMEOUT_SECS,
            retry_limit: RETRY_LIMIT,
            points_threshold: MINIMUM_POINTS_THRESHOLD,
            register_file: PathBuf::from("register.txt"),
            proxy_file: PathBuf::from("proxy.txt"),
            accounts_file: PathBuf::from("accounts.txt"),
        }
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

impl Settings {
    /// Defaults + `config/config.json` + environment.
    /// A bad config file is logged and replaced by the defaults.
    pub fn load_or_default() -> Self {
        Self::from_file_or_default(Path::new(DEFAULT_CONFIG_PATH))
            .with_overrides(|key| std::env::var(key).ok())
    }

    pub fn from_file_or_default(path: &Path) -> Self {
        match Self::from_file(path) {
            Ok(settings) => settings,
            Err(e) => {
                log(Severity::Error, format!("{:#}. Using default settings.", e));
                Settings::default()
            }
        }
    }

    /// Read a JSON settings file; a missing file yields the defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Settings::default());
        }

        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Apply overrides from a key lookup (the process environment in `load`).
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("REF_CODE") {
            self.ref_code = non_empty(v);
        }
        if let Some(v) = lookup("USE_PROXY") {
            self.use_proxy = parse_flag(&v);
        }
        if let Some(v) = lookup("CAPTCHA_TOKEN") {
            self.captcha_token = non_empty(v);
        }
        if let Some(v) = lookup("REGISTER_URL").and_then(non_empty) {
            self.register_url = v;
        }
        if let Some(v) = lookup("IP_CHECK_URL").and_then(non_empty) {
            self.ip_check_url = v;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.retry_limit, 3);
        assert_eq!(settings.points_threshold, 19000.00);
        assert_eq!(settings.request_timeout_secs, 120);
        assert!(!settings.use_proxy);
        assert!(settings.ref_code.is_none());
        assert_eq!(settings.register_url, DEFAULT_REGISTER_URL);
        assert_eq!(settings.accounts_file, PathBuf::from("accounts.txt"));
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let settings = Settings::from_file(&dir.path().join("config.json")).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_file_accepts_screaming_keys() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"REF_CODE": "FRIEND42", "USE_PROXY": true}"#).unwrap();

        let settings = Settings::from_file(&path).unwrap();
        assert_eq!(settings.ref_code.as_deref(), Some("FRIEND42"));
        assert!(settings.use_proxy);
        assert_eq!(settings.retry_limit, RETRY_LIMIT);
    }

    #[test]
    fn test_malformed_file_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = Settings::from_file(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to parse config file"));
    }

    #[test]
    fn test_malformed_file_falls_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert_eq!(Settings::from_file_or_default(&path), Settings::default());
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            ("REF_CODE", " ABC "),
            ("USE_PROXY", "yes"),
            ("CAPTCHA_TOKEN", ""),
            ("REGISTER_URL", "http://localhost:9000/register"),
        ]
        .into_iter()
        .collect();

        let settings = Settings {
            captcha_token: Some("stale".to_string()),
            ..Settings::default()
        }
        .with_overrides(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(settings.ref_code.as_deref(), Some("ABC"));
        assert!(settings.use_proxy);
        assert!(settings.captcha_token.is_none());
        assert_eq!(settings.register_url, "http://localhost:9000/register");
        assert_eq!(settings.ip_check_url, DEFAULT_IP_CHECK_URL);
    }
}
