// Monitor backend HTTP client
//
// Wraps `reqwest::Client` with endpoint URL construction, query-string
// encoding for the add/delete operations, and error-body parsing. The
// backend reports failures either as plain text or as `{"error": "..."}`
// JSON; both are surfaced as `Error::Backend`.

use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::models::{ErrorBody, LogsResponse, StatusResponse};
use crate::transport::TransportConfig;

/// HTTP client for the network monitor backend.
///
/// All methods are single request-response calls; the backend holds every
/// piece of persistent device state, so there is no session or auth flow.
pub struct MonitorClient {
    http: reqwest::Client,
    base_url: Url,
}

impl MonitorClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// `base_url` is the backend root, e.g. `http://localhost:8080`.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self { http, base_url })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn from_reqwest(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        let base_url = Url::parse(base_url)?;
        Ok(Self { http, base_url })
    }

    /// The backend base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── Endpoints ────────────────────────────────────────────────────

    /// `GET /status` -- current status map for every registered device.
    pub async fn status(&self) -> Result<StatusResponse, Error> {
        let url = self.endpoint("status")?;
        self.get_json(url).await
    }

    /// `POST /add?ip=&location=&name=` -- register a device.
    pub async fn add_device(&self, ip: &str, location: &str, name: &str) -> Result<(), Error> {
        let mut url = self.endpoint("add")?;
        url.query_pairs_mut()
            .append_pair("ip", ip)
            .append_pair("location", location)
            .append_pair("name", name);
        self.post_empty(url).await
    }

    /// `POST /delete?ip=` -- remove a device from the registry.
    pub async fn delete_device(&self, ip: &str) -> Result<(), Error> {
        let mut url = self.endpoint("delete")?;
        url.query_pairs_mut().append_pair("ip", ip);
        self.post_empty(url).await
    }

    /// `GET /logs` -- the backend's monitoring log lines.
    pub async fn logs(&self) -> Result<Vec<String>, Error> {
        let url = self.endpoint("logs")?;
        let body: LogsResponse = self.get_json(url).await?;
        Ok(body.logs)
    }

    // ── Request helpers ──────────────────────────────────────────────

    fn endpoint(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path)?)
    }

    /// Send a GET request and decode a JSON body.
    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {}", url);

        let resp = self.http.get(url).send().await.map_err(Error::Transport)?;
        let status = resp.status();
        let body = resp.text().await.map_err(Error::Transport)?;

        if !status.is_success() {
            return Err(backend_error(status.as_u16(), &body));
        }

        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body,
        })
    }

    /// Send a POST request, discarding any success body.
    async fn post_empty(&self, url: Url) -> Result<(), Error> {
        debug!("POST {}", url);

        let resp = self.http.post(url).send().await.map_err(Error::Transport)?;
        let status = resp.status();

        if status.is_success() {
            return Ok(());
        }

        let body = resp.text().await.map_err(Error::Transport)?;
        Err(backend_error(status.as_u16(), &body))
    }
}

/// Build an `Error::Backend` from a non-2xx response body.
///
/// Prefers the `error` (then `message`) field of a JSON error body and
/// falls back to the raw text, so plain-text backends still read well.
fn backend_error(status: u16, body: &str) -> Error {
    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|e| e.error.or(e.message))
        .unwrap_or_else(|| {
            let text = body.trim();
            if text.is_empty() {
                format!("HTTP {status}")
            } else {
                text.to_owned()
            }
        });

    Error::Backend { message, status }
}
