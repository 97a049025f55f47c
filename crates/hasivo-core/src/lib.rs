//! # Hasivo PoE switch control
//!
//! Client for the JSON-over-HTTP protocol served by the web management
//! interface of Hasivo PoE switches. Every operation runs inside one
//! login → command → logout session against a single switch.
//!
//! ## Modules
//!
//! - **error** — Crate error type and result alias
//! - **config** — Connection configuration (address, password, timings)
//! - **protocol** — Endpoint table and command payloads
//! - **ports** — Raw array index → port number / opcode / power slot mappings
//! - **transport** — `Transport` trait and blocking HTTP implementation
//! - **session** — Session state machine with guaranteed logout
//! - **types** — Decoded telemetry and result envelopes
//! - **telemetry** — `/101` response decoder
//! - **service** — One-command-per-session façade

pub mod error;
pub mod config;
pub mod protocol;
pub mod ports;
pub mod transport;
pub mod session;
pub mod types;
pub mod telemetry;
pub mod service;

pub use config::SwitchConfig;
pub use error::{SwitchError, SwitchErrorKind, SwitchResult};
pub use protocol::Command;
pub use service::SwitchService;
pub use types::{ActionReport, ErrorReport, Outcome, TelemetryReport};
