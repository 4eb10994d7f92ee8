//! Async client for the network monitor backend.
//!
//! The backend owns all device state (registry, ping status, logs); this
//! crate is the thin HTTP surface the dashboard consumes. Four endpoints:
//! `GET /status`, `POST /add`, `POST /delete`, `GET /logs`.

pub mod client;
pub mod error;
pub mod models;
pub mod transport;

pub use client::MonitorClient;
pub use error::Error;
pub use models::{DeviceStatusEntry, LogsResponse, StatusResponse};
pub use transport::TransportConfig;
