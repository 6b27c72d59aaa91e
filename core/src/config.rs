//! Base address and timeout resolution for the task API.
//!
//! The base address is resolved once, at startup, and handed to `TaskApi`;
//! it is never re-evaluated per request.

use std::time::Duration;

use thiserror::Error;

/// Port the local backend listens on.
pub const BACKEND_PORT: u16 = 8001;

/// Relay origin used by a browser-hosted UI during development.
pub const DEFAULT_RELAY_ORIGIN: &str = "http://localhost:5174";

/// Per-request timeout applied by the production transport.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(5000);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown host mode {0:?}, expected \"desktop\" or \"browser\"")]
    UnknownHostMode(String),

    #[error("invalid timeout {0:?}, expected milliseconds")]
    InvalidTimeout(String),
}

/// Where the UI is running, which decides how it reaches the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostMode {
    /// Inside the desktop shell: talk to the backend directly.
    Desktop,
    /// Served by a web server whose `/api` prefix is stripped and relayed to
    /// the backend.
    Browser { relay_origin: String },
}

impl HostMode {
    pub fn base_url(&self) -> String {
        match self {
            HostMode::Desktop => format!("http://localhost:{BACKEND_PORT}"),
            HostMode::Browser { relay_origin } => {
                format!("{}/api", relay_origin.trim_end_matches('/'))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::for_host(&HostMode::Desktop)
    }
}

impl ClientConfig {
    pub fn for_host(mode: &HostMode) -> Self {
        Self {
            base_url: mode.base_url(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Resolve from `TASK_API_URL`, `TASK_HOST_MODE`, `TASK_RELAY_ORIGIN`
    /// and `TASK_API_TIMEOUT_MS`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same resolution as `from_env`, reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = match lookup("TASK_API_URL") {
            Some(url) if !url.trim().is_empty() => Self {
                base_url: url.trim().to_string(),
                timeout: DEFAULT_TIMEOUT,
            },
            _ => {
                let mode = match lookup("TASK_HOST_MODE").as_deref().map(str::trim) {
                    None | Some("") | Some("desktop") => HostMode::Desktop,
                    Some("browser") => HostMode::Browser {
                        relay_origin: lookup("TASK_RELAY_ORIGIN")
                            .unwrap_or_else(|| DEFAULT_RELAY_ORIGIN.to_string()),
                    },
                    Some(other) => return Err(ConfigError::UnknownHostMode(other.to_string())),
                };
                Self::for_host(&mode)
            }
        };

        if let Some(raw) = lookup("TASK_API_TIMEOUT_MS") {
            let millis: u64 = raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidTimeout(raw.clone()))?;
            config.timeout = Duration::from_millis(millis);
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn resolve(vars: &[(&str, &str)]) -> Result<ClientConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ClientConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn default_is_desktop_backend() {
        let config = resolve(&[]).unwrap();
        assert_eq!(config.base_url, "http://localhost:8001");
        assert_eq!(config.timeout, Duration::from_millis(5000));
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn browser_mode_goes_through_relay() {
        let config = resolve(&[("TASK_HOST_MODE", "browser")]).unwrap();
        assert_eq!(config.base_url, "http://localhost:5174/api");

        let config = resolve(&[
            ("TASK_HOST_MODE", "browser"),
            ("TASK_RELAY_ORIGIN", "http://ui.local:3000/"),
        ])
        .unwrap();
        assert_eq!(config.base_url, "http://ui.local:3000/api");
    }

    #[test]
    fn explicit_url_wins_over_mode() {
        let config = resolve(&[
            ("TASK_API_URL", "http://10.0.0.2:9000"),
            ("TASK_HOST_MODE", "browser"),
        ])
        .unwrap();
        assert_eq!(config.base_url, "http://10.0.0.2:9000");
    }

    #[test]
    fn timeout_override() {
        let config = resolve(&[("TASK_API_TIMEOUT_MS", "250")]).unwrap();
        assert_eq!(config.timeout, Duration::from_millis(250));
    }

    #[test]
    fn bad_values_are_rejected() {
        assert_eq!(
            resolve(&[("TASK_HOST_MODE", "kiosk")]).unwrap_err(),
            ConfigError::UnknownHostMode("kiosk".to_string())
        );
        assert_eq!(
            resolve(&[("TASK_API_TIMEOUT_MS", "soon")]).unwrap_err(),
            ConfigError::InvalidTimeout("soon".to_string())
        );
    }
}
