//! Telemetry decoder for the `/101` response.
//!
//! The response carries device-wide scalars plus five parallel per-port
//! arrays (`link`, `pw`, `tx`, `rx`, `AdminState`) indexed in reverse port
//! order; see [`crate::ports`] for the index mappings.
//!
//! Decoding never fails outright. [`try_decode_into`] is the fallible step;
//! [`decode`] turns its error into an `off` report that keeps whatever was
//! decoded before the failure.

use crate::error::{SwitchError, SwitchResult};
use crate::ports::{self, PortKind};
use crate::types::{DeviceInfo, DeviceStatus, LinkState, PortRecord, TelemetryReport};

use log::warn;
use serde_json::{Map, Value};

/// Decode a raw telemetry envelope `{"data": {"calldata": {...}}}`.
pub fn decode(raw: &Value) -> TelemetryReport {
    let mut report = TelemetryReport::on();
    if let Err(e) = try_decode_into(raw, &mut report) {
        warn!("telemetry decode failed after {} port(s): {e}", report.ports.len());
        report.status = DeviceStatus::Off;
        report.error = Some(e.to_string());
    }
    report
}

/// Fill `report` from `raw`, stopping at the first malformed field.
pub fn try_decode_into(raw: &Value, report: &mut TelemetryReport) -> SwitchResult<()> {
    let data = calldata(raw)?;

    report.device_info = Some(DeviceInfo {
        serial: text_field(data, "sn"),
        voltage_v: float_field(data, "vol")?,
        total_power_w: float_field(data, "tp")? / 1000.0,
        mac: text_field(data, "mac"),
        ip: text_field(data, "ip"),
        version: text_field(data, "V"),
    });

    let link = array_field(data, "link")?;
    let pw = array_field(data, "pw")?;
    let tx = array_field(data, "tx")?;
    let rx = array_field(data, "rx")?;
    let admin = array_field(data, "AdminState")?;
    let ip = text_field(data, "ip");

    let port_count = link.len();
    for i in 0..port_count {
        let id = ports::port_number_for_index(i, port_count);
        let kind = PortKind::classify(id);

        let link_code = int_at(link, "link", i)?;
        let tx_count = int_at(tx, "tx", i)?;
        let rx_count = int_at(rx, "rx", i)?;
        let admin_state = match admin.get(i) {
            Some(v) => to_int(v, "AdminState", i)?,
            None => 0,
        };

        let poe_power_w = match kind {
            PortKind::PoE => {
                let slot = ports::power_slot_for_index(i);
                match pw.get(slot) {
                    Some(v) => to_float(v, "pw", slot)?,
                    None => 0.0,
                }
            }
            PortKind::Uplink => 0.0,
        };

        report.ports.push(PortRecord {
            id,
            kind,
            state: LinkState::from_code(link_code),
            link_code,
            admin_state,
            poe_power_w,
            tx_count,
            rx_count,
            ip: ip.clone(),
            opcode: ports::reboot_opcode_for_index(i),
        });
    }

    Ok(())
}

// ── Field access ────────────────────────────────────────────────────

fn calldata(raw: &Value) -> SwitchResult<&Map<String, Value>> {
    match raw.get("data").and_then(|d| d.get("calldata")) {
        Some(Value::Object(map)) if !map.is_empty() => Ok(map),
        Some(Value::Object(_)) | Some(Value::Null) | None => {
            Err(SwitchError::decode("missing calldata"))
        }
        Some(other) => Err(SwitchError::decode(format!(
            "calldata is not an object: {other}"
        ))),
    }
}

/// Non-string scalars keep their JSON text, so a numeric `sn` of `12345`
/// reads as `"12345"`.
fn text_field(data: &Map<String, Value>, key: &str) -> String {
    match data.get(key) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn float_field(data: &Map<String, Value>, key: &str) -> SwitchResult<f64> {
    match data.get(key) {
        None | Some(Value::Null) => Ok(0.0),
        Some(v) => to_float(v, key, 0),
    }
}

/// Absent arrays read as empty.
fn array_field<'a>(data: &'a Map<String, Value>, key: &str) -> SwitchResult<&'a [Value]> {
    match data.get(key) {
        None => Ok(&[][..]),
        Some(Value::Array(items)) => Ok(items),
        Some(other) => Err(SwitchError::decode(format!(
            "`{key}` is not an array: {other}"
        ))),
    }
}

fn int_at(items: &[Value], key: &str, index: usize) -> SwitchResult<i64> {
    let value = items.get(index).ok_or_else(|| {
        SwitchError::decode(format!(
            "`{key}` has {} entries, no index {index}",
            items.len()
        ))
    })?;
    to_int(value, key, index)
}

// ── Coercion ────────────────────────────────────────────────────────
//
// Firmware versions disagree on whether numbers are sent as JSON numbers
// or as strings, so both are accepted.

fn to_int(value: &Value, key: &str, index: usize) -> SwitchResult<i64> {
    let parsed = match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.abs() < i64::MAX as f64).map(|f| f.trunc() as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        Value::Bool(b) => Some(i64::from(*b)),
        _ => None,
    };
    parsed.ok_or_else(|| {
        SwitchError::decode(format!("`{key}`[{index}] is not an integer: {value}"))
    })
}

fn to_float(value: &Value, key: &str, index: usize) -> SwitchResult<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    };
    parsed.ok_or_else(|| {
        SwitchError::decode(format!("`{key}`[{index}] is not a number: {value}"))
    })
}
