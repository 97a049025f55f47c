//! Connection configuration.
//!
//! One `SwitchConfig` is built at start-up and handed by reference to the
//! session and transport. The base address is resolved from it once and
//! never mutated afterwards.

use crate::error::{SwitchError, SwitchResult};

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Everything needed to talk to one switch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwitchConfig {
    /// IP or hostname (e.g. "192.168.60.15"); an explicit scheme is kept.
    #[serde(default)]
    pub host: String,
    /// Web management password.
    #[serde(default)]
    pub password: String,
    /// Timeout for login, telemetry and action requests.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Bound on establishing the TCP connection. A switch that drops packets
    /// hits this before the request timeout and is reported as unreachable.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    /// Timeout for the best-effort logout request.
    #[serde(default = "default_logout_timeout")]
    pub logout_timeout_secs: u64,
    /// Pause after login and after logout while the device settles its session.
    #[serde(default = "default_settle_delay")]
    pub settle_delay_ms: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_timeout() -> u64 { 15 }
fn default_connect_timeout() -> u64 { 5 }
fn default_logout_timeout() -> u64 { 5 }
fn default_settle_delay() -> u64 { 1000 }
fn default_user_agent() -> String { "Mozilla/5.0 (HA Scraper)".to_string() }

impl Default for SwitchConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            password: String::new(),
            timeout_secs: default_timeout(),
            connect_timeout_secs: default_connect_timeout(),
            logout_timeout_secs: default_logout_timeout(),
            settle_delay_ms: default_settle_delay(),
            user_agent: default_user_agent(),
        }
    }
}

impl SwitchConfig {
    pub fn new(host: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            password: password.into(),
            ..Self::default()
        }
    }

    /// Load a JSON config file. Missing fields take their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> SwitchResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            SwitchError::configuration(format!("cannot read {}: {e}", path.display()))
        })?;
        serde_json::from_str(&text).map_err(|e| {
            SwitchError::configuration(format!("invalid config {}: {e}", path.display()))
        })
    }

    /// Resolved base address, e.g. `http://192.168.60.15`.
    pub fn base_url(&self) -> SwitchResult<String> {
        let host = self.host.trim().trim_end_matches('/');
        if host.is_empty() {
            return Err(SwitchError::configuration(
                "switch address is not set (pass a host argument or set HASIVO_HOST)",
            ));
        }
        if host.starts_with("http://") || host.starts_with("https://") {
            Ok(host.to_string())
        } else {
            Ok(format!("http://{host}"))
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn logout_timeout(&self) -> Duration {
        Duration::from_secs(self.logout_timeout_secs)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}
