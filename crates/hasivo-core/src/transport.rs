//! HTTP transport.
//!
//! A single `post` primitive against the configured base address. The
//! session cookie issued at login lives in the client's cookie store, so
//! one transport instance must carry a whole login → action → logout
//! sequence. No retries happen here.

use crate::config::SwitchConfig;
use crate::error::{SwitchError, SwitchResult};

use log::debug;
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, CONNECTION, CONTENT_TYPE, USER_AGENT};
use serde_json::Value;
use std::time::Duration;

/// Status and body of a successful (2xx) reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    pub body: String,
}

impl Reply {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Parse the body as JSON.
    pub fn json(&self) -> SwitchResult<Value> {
        serde_json::from_str(&self.body).map_err(|e| {
            SwitchError::unknown(format!("response body is not valid JSON: {e}"))
        })
    }
}

/// Request/response seam between the session and the wire.
#[cfg_attr(test, mockall::automock)]
pub trait Transport {
    /// Base address requests are issued against, e.g. `http://192.168.60.15`.
    fn base_url(&self) -> String;

    /// POST `body` as JSON to `path`, relative to the base address.
    fn post(&mut self, path: &str, body: &Value, timeout: Duration) -> SwitchResult<Reply>;

    /// Release the underlying connection resources. Later posts fail.
    fn close(&mut self) -> SwitchResult<()>;
}

/// Blocking reqwest transport with a cookie store.
pub struct HttpTransport {
    client: Option<Client>,
    base_url: String,
}

impl HttpTransport {
    pub fn new(config: &SwitchConfig) -> SwitchResult<Self> {
        let base_url = config.base_url()?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(CONNECTION, HeaderValue::from_static("close"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent).map_err(|e| {
                SwitchError::configuration(format!("invalid user agent: {e}"))
            })?,
        );

        let client = Client::builder()
            .default_headers(headers)
            .cookie_store(true)
            .connect_timeout(config.connect_timeout())
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| SwitchError::unknown(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client: Some(client),
            base_url,
        })
    }
}

impl Transport for HttpTransport {
    fn base_url(&self) -> String {
        self.base_url.clone()
    }

    fn post(&mut self, path: &str, body: &Value, timeout: Duration) -> SwitchResult<Reply> {
        let client = self
            .client
            .as_ref()
            .ok_or_else(|| SwitchError::unknown("transport already released"))?;
        let url = format!("{}{}", self.base_url, path);
        debug!("POST {url} (timeout {}s)", timeout.as_secs());

        let resp = client.post(&url).timeout(timeout).json(body).send()?;

        let status = resp.status();
        if !status.is_success() {
            return Err(SwitchError::protocol(
                status.as_u16(),
                "check the password or whether the session has expired",
            ));
        }

        let body = resp.text()?;
        Ok(Reply::new(status.as_u16(), body))
    }

    fn close(&mut self) -> SwitchResult<()> {
        // Dropping the client closes its pooled connections.
        self.client.take();
        Ok(())
    }
}
