//! Wire protocol: endpoint table and command payloads.
//!
//! Every request is a JSON POST of the shape `{"data": {"callcmd": N, ...}}`
//! to the path `/N`. The callcmd/path pairing is fixed by the firmware.

use serde_json::{json, Value};

// ── Endpoints ───────────────────────────────────────────────────────

/// Protocol endpoints, one per callcmd.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Login,
    Telemetry,
    PortAction,
    DeviceReboot,
    Logout,
}

impl Endpoint {
    pub fn callcmd(self) -> u16 {
        match self {
            Self::Telemetry => 101,
            Self::PortAction => 103,
            Self::DeviceReboot => 104,
            Self::Login => 123,
            Self::Logout => 126,
        }
    }

    pub fn path(self) -> &'static str {
        match self {
            Self::Telemetry => "/101",
            Self::PortAction => "/103",
            Self::DeviceReboot => "/104",
            Self::Login => "/123",
            Self::Logout => "/126",
        }
    }
}

// ── Commands ────────────────────────────────────────────────────────

/// The three operations a caller can run inside a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    ReadTelemetry,
    /// `opcode` is sent as-is; the device rejects values it does not know.
    RebootPort { opcode: i64 },
    RebootDevice,
}

impl Command {
    pub fn read_telemetry() -> Self {
        Self::ReadTelemetry
    }

    pub fn reboot_port(opcode: i64) -> Self {
        Self::RebootPort { opcode }
    }

    pub fn reboot_device() -> Self {
        Self::RebootDevice
    }

    pub fn endpoint(&self) -> Endpoint {
        match self {
            Self::ReadTelemetry => Endpoint::Telemetry,
            Self::RebootPort { .. } => Endpoint::PortAction,
            Self::RebootDevice => Endpoint::DeviceReboot,
        }
    }

    /// Request body for this command.
    pub fn payload(&self) -> Value {
        let callcmd = self.endpoint().callcmd();
        match self {
            Self::RebootPort { opcode } => json!({
                "data": { "callcmd": callcmd, "calldata": { "opcode": opcode } }
            }),
            Self::ReadTelemetry | Self::RebootDevice => json!({
                "data": { "callcmd": callcmd }
            }),
        }
    }

    pub fn is_action(&self) -> bool {
        !matches!(self, Self::ReadTelemetry)
    }
}

// ── Session payloads ────────────────────────────────────────────────

pub fn login_payload(password: &str) -> Value {
    json!({
        "data": {
            "callcmd": Endpoint::Login.callcmd(),
            "calldata": { "password": password }
        }
    })
}

pub fn logout_payload() -> Value {
    json!({ "data": { "callcmd": Endpoint::Logout.callcmd() } })
}
