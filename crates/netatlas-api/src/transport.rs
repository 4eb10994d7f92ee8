// Shared transport configuration for building reqwest::Client instances.
//
// The monitor backend speaks plain HTTP on a LAN, so there is no TLS or
// cookie handling here -- just timeout and identification.

use std::time::Duration;

/// Transport configuration for the backend HTTP client.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, crate::error::Error> {
        Ok(reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent("netatlas/0.1.0")
            .build()?)
    }
}
