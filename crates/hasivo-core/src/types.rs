//! Shared data structures: decoded telemetry and result envelopes.
//!
//! Serialized field names are consumed by downstream automation and must
//! not change.

use crate::ports::PortKind;

use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Telemetry
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// `on` when the telemetry decoded cleanly, `off` when decoding failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceStatus {
    On,
    Off,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkState {
    On,
    Off,
}

impl LinkState {
    pub fn from_code(code: i64) -> Self {
        if code > 0 {
            Self::On
        } else {
            Self::Off
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceInfo {
    #[serde(rename = "model_sn")]
    pub serial: String,
    pub voltage_v: f64,
    /// Watts; the device reports milliwatts.
    pub total_power_w: f64,
    pub mac: String,
    pub ip: String,
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortRecord {
    /// Physical port number, 1-based.
    pub id: usize,
    #[serde(rename = "type")]
    pub kind: PortKind,
    pub state: LinkState,
    pub link_code: i64,
    pub admin_state: i64,
    pub poe_power_w: f64,
    pub tx_count: i64,
    pub rx_count: i64,
    /// Management IP of the owning device.
    pub ip: String,
    pub opcode: i64,
}

impl PortRecord {
    pub fn key(&self) -> String {
        format!("port{}", self.id)
    }
}

/// Decoded `/101` response.
///
/// `device_info` is `None` and `ports` empty when decoding failed before
/// reaching them; both serialize as `{}` in that case.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TelemetryReport {
    pub status: DeviceStatus,
    #[serde(serialize_with = "device_info_or_empty")]
    pub device_info: Option<DeviceInfo>,
    /// In source-index order: highest port first.
    #[serde(serialize_with = "ports_by_key")]
    pub ports: Vec<PortRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TelemetryReport {
    pub fn on() -> Self {
        Self {
            status: DeviceStatus::On,
            device_info: None,
            ports: Vec::new(),
            error: None,
        }
    }

    pub fn port(&self, number: usize) -> Option<&PortRecord> {
        self.ports.iter().find(|p| p.id == number)
    }

    pub fn is_on(&self) -> bool {
        self.status == DeviceStatus::On
    }
}

fn device_info_or_empty<S: Serializer>(
    info: &Option<DeviceInfo>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match info {
        Some(info) => info.serialize(serializer),
        None => serializer.serialize_map(Some(0))?.end(),
    }
}

fn ports_by_key<S: Serializer>(ports: &[PortRecord], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_map(ports.iter().map(|p| (p.key(), p)))
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Action / error envelopes
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportStatus {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionReport {
    pub status: ReportStatus,
    pub message: String,
}

impl ActionReport {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: ReportStatus::Success,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorReport {
    pub status: ReportStatus,
    pub error: String,
}

impl ErrorReport {
    pub fn new(error: impl ToString) -> Self {
        Self {
            status: ReportStatus::Error,
            error: error.to_string(),
        }
    }
}

/// What a command produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Outcome {
    Telemetry(TelemetryReport),
    Action(ActionReport),
}
