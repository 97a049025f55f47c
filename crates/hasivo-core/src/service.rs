//! Command façade.
//!
//! `SwitchService` runs one command per call through one freshly opened
//! session over an [`HttpTransport`]. The generic `*_with` functions take any
//! [`Transport`] and are what the service (and the tests) build on.

use crate::config::SwitchConfig;
use crate::error::{SwitchError, SwitchResult};
use crate::ports::{self, PORT_REBOOT_OPCODES};
use crate::protocol::Command;
use crate::session::with_session;
use crate::telemetry;
use crate::transport::{HttpTransport, Transport};
use crate::types::{ActionReport, Outcome, TelemetryReport};

use log::{info, warn};

/// Login, read `/101`, logout, then decode.
///
/// Transport failures are returned as errors; a malformed payload comes
/// back as an `off` report.
pub fn read_telemetry_with<T: Transport>(
    config: &SwitchConfig,
    transport: T,
) -> SwitchResult<TelemetryReport> {
    let raw = with_session(config, transport, |session| {
        session.execute(&Command::read_telemetry())?.json()
    })?;
    Ok(telemetry::decode(&raw))
}

/// Login, send a reboot command, logout.
pub fn send_action_with<T: Transport>(
    config: &SwitchConfig,
    transport: T,
    command: Command,
) -> SwitchResult<ActionReport> {
    if !command.is_action() {
        return Err(SwitchError::unknown(format!(
            "{command:?} is not an action command"
        )));
    }
    if let Command::RebootPort { opcode } = command {
        match ports::port_for_opcode(opcode, PORT_REBOOT_OPCODES.len()) {
            Some(port) => info!("rebooting port {port} (opcode {opcode})"),
            None => warn!("opcode {opcode} is not in the port table; sending it anyway"),
        }
    }

    with_session(config, transport, |session| {
        session.execute(&command)?;
        Ok(ActionReport::success(format!(
            "command sent to {}{}",
            session.base_url(),
            command.endpoint().path()
        )))
    })
}

/// Dispatch any command.
pub fn run_command_with<T: Transport>(
    config: &SwitchConfig,
    transport: T,
    command: Command,
) -> SwitchResult<Outcome> {
    match command {
        Command::ReadTelemetry => read_telemetry_with(config, transport).map(Outcome::Telemetry),
        _ => send_action_with(config, transport, command).map(Outcome::Action),
    }
}

/// One switch, one session per call.
#[derive(Debug, Clone)]
pub struct SwitchService {
    config: SwitchConfig,
}

impl SwitchService {
    pub fn new(config: SwitchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SwitchConfig {
        &self.config
    }

    pub fn execute(&self, command: Command) -> SwitchResult<Outcome> {
        run_command_with(&self.config, self.transport()?, command)
    }

    pub fn read_telemetry(&self) -> SwitchResult<TelemetryReport> {
        read_telemetry_with(&self.config, self.transport()?)
    }

    pub fn reboot_port(&self, opcode: i64) -> SwitchResult<ActionReport> {
        send_action_with(&self.config, self.transport()?, Command::reboot_port(opcode))
    }

    pub fn reboot_device(&self) -> SwitchResult<ActionReport> {
        send_action_with(&self.config, self.transport()?, Command::reboot_device())
    }

    fn transport(&self) -> SwitchResult<HttpTransport> {
        HttpTransport::new(&self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SwitchErrorKind;
    use crate::transport::{MockTransport, Reply};
    use crate::types::{DeviceStatus, ReportStatus};
    use mockall::{predicate, Sequence};
    use serde_json::{json, Value};
    use std::time::Duration;

    fn config() -> SwitchConfig {
        SwitchConfig {
            settle_delay_ms: 0,
            ..SwitchConfig::new("192.168.60.15", "pw")
        }
    }

    /// Mock expecting login → `path` → logout, in that order.
    fn scripted(
        path: &'static str,
        reply: impl Fn() -> SwitchResult<Reply> + Send + 'static,
    ) -> MockTransport {
        let mut mock = MockTransport::new();
        let mut seq = Sequence::new();
        mock.expect_base_url()
            .return_const("http://192.168.60.15".to_string());
        mock.expect_post()
            .with(predicate::eq("/123"), predicate::always(), predicate::always())
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _| Ok(Reply::new(200, "")));
        mock.expect_post()
            .with(predicate::eq(path), predicate::always(), predicate::always())
            .times(1)
            .in_sequence(&mut seq)
            .returning(move |_, _, _| reply());
        mock.expect_post()
            .with(
                predicate::eq("/126"),
                predicate::eq(json!({"data": {"callcmd": 126}})),
                predicate::eq(Duration::from_secs(5)),
            )
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _| Ok(Reply::new(200, "")));
        mock.expect_close()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(()));
        mock
    }

    #[test]
    fn port_reboot_sends_exact_payload() {
        let mut mock = MockTransport::new();
        let mut seq = Sequence::new();
        mock.expect_base_url()
            .return_const("http://192.168.60.15".to_string());
        mock.expect_post()
            .withf(|path: &str, _: &Value, _: &Duration| path == "/123")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _| Ok(Reply::new(200, "")));
        mock.expect_post()
            .withf(|path: &str, body: &Value, _: &Duration| {
                path == "/103"
                    && *body == json!({"data": {"callcmd": 103, "calldata": {"opcode": 147}}})
            })
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _| Ok(Reply::new(200, "")));
        mock.expect_post()
            .withf(|path: &str, _: &Value, _: &Duration| path == "/126")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _| Ok(Reply::new(200, "")));
        mock.expect_close().times(1).returning(|| Ok(()));

        let report = send_action_with(&config(), mock, Command::reboot_port(147)).unwrap();
        assert_eq!(report.status, ReportStatus::Success);
        assert_eq!(report.message, "command sent to http://192.168.60.15/103");
    }

    #[test]
    fn device_reboot_protocol_error_still_logs_out() {
        let mock = scripted("/104", || Err(SwitchError::protocol(401, "expired")));
        let err = send_action_with(&config(), mock, Command::reboot_device()).unwrap_err();
        assert_eq!(err.kind(), SwitchErrorKind::Protocol);
    }

    #[test]
    fn telemetry_read_decodes_reply() {
        let body = json!({
            "data": {"calldata": {
                "tp": 15000, "ip": "192.168.60.15",
                "link": [5, 0, 1], "pw": [2.0], "tx": [1, 2, 3], "rx": [4, 5, 6]
            }}
        })
        .to_string();
        let mock = scripted("/101", move || Ok(Reply::new(200, body.clone())));

        let report = read_telemetry_with(&config(), mock).unwrap();
        assert_eq!(report.status, DeviceStatus::On);
        assert_eq!(report.ports.len(), 3);
        assert_eq!(report.port(3).unwrap().poe_power_w, 2.0);
        assert_eq!(report.device_info.unwrap().total_power_w, 15.0);
    }

    #[test]
    fn malformed_telemetry_is_a_report_not_an_error() {
        let mock = scripted("/101", || Ok(Reply::new(200, r#"{"data": {}}"#)));
        let report = read_telemetry_with(&config(), mock).unwrap();
        assert_eq!(report.status, DeviceStatus::Off);
        assert!(!report.error.unwrap().is_empty());
    }

    #[test]
    fn non_json_telemetry_is_an_error() {
        let mock = scripted("/101", || Ok(Reply::new(200, "<html></html>")));
        let err = read_telemetry_with(&config(), mock).unwrap_err();
        assert_eq!(err.kind(), SwitchErrorKind::Unknown);
    }

    #[test]
    fn run_command_dispatches_by_variant() {
        let mock = scripted("/104", || Ok(Reply::new(200, "")));
        let outcome = run_command_with(&config(), mock, Command::reboot_device()).unwrap();
        assert!(matches!(outcome, Outcome::Action(_)));
    }

    #[test]
    fn telemetry_is_not_an_action() {
        let mock = MockTransport::new();
        let err = send_action_with(&config(), mock, Command::read_telemetry()).unwrap_err();
        assert_eq!(err.kind(), SwitchErrorKind::Unknown);
    }

    #[test]
    fn service_without_host_fails_before_network() {
        let service = SwitchService::new(SwitchConfig::default());
        let err = service.reboot_device().unwrap_err();
        assert_eq!(err.kind(), SwitchErrorKind::Configuration);
    }
}
