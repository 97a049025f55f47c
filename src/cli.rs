use clap::Parser;
use hasivo_core::{Command, SwitchConfig, SwitchError, SwitchResult};
use std::path::PathBuf;
use thiserror::Error;

const USAGE: &str = "usage: hasivo-ctl [HOST] | HOST reboot | HOST port <OPCODE>";

#[derive(Debug, Parser)]
#[command(
    name = "hasivo-ctl",
    about = "Read telemetry from, or reboot ports on, a Hasivo PoE switch",
    version
)]
pub struct Cli {
    /// JSON config file (host, password, timeout_secs, ...).
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Switch address used when no HOST argument is given.
    #[arg(long, env = "HASIVO_HOST")]
    pub host: Option<String>,

    /// Web management password.
    #[arg(long, env = "HASIVO_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Request timeout in seconds (logout keeps its own short timeout).
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Log protocol steps to stderr.
    #[arg(short, long)]
    pub verbose: bool,

    /// [HOST] [reboot | port <OPCODE>]; OPCODE may be negative.
    #[arg(value_name = "ARGS", num_args = 0..=3, allow_negative_numbers = true)]
    pub args: Vec<String>,
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),
    #[error(transparent)]
    Switch(#[from] SwitchError),
}

/// What the positional arguments ask for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub host: Option<String>,
    pub command: Command,
}

impl Invocation {
    pub fn from_args(args: &[String]) -> Result<Self, CliError> {
        let action = args.get(1).map(|a| a.to_lowercase());
        let command = match (args.len(), action.as_deref()) {
            (0, _) | (1, _) => Command::read_telemetry(),
            (2, Some("reboot")) => Command::reboot_device(),
            (3, Some("port")) => {
                let opcode = args[2].trim().parse::<i64>().map_err(|_| {
                    CliError::Usage(format!(
                        "reboot opcode must be an integer, got `{}`; {USAGE}",
                        args[2]
                    ))
                })?;
                Command::reboot_port(opcode)
            }
            _ => {
                return Err(CliError::Usage(format!(
                    "unrecognised arguments `{}`; {USAGE}",
                    args.join(" ")
                )))
            }
        };

        Ok(Self {
            host: args.first().cloned(),
            command,
        })
    }
}

impl Cli {
    /// Defaults, then the config file, then flags/environment, then the
    /// positional host.
    pub fn resolve_config(&self, positional_host: Option<&str>) -> SwitchResult<SwitchConfig> {
        let mut config = match &self.config {
            Some(path) => SwitchConfig::from_json_file(path)?,
            None => SwitchConfig::default(),
        };
        if let Some(host) = &self.host {
            config.host = host.clone();
        }
        if let Some(password) = &self.password {
            config.password = password.clone();
        }
        if let Some(timeout) = self.timeout {
            config.timeout_secs = timeout;
        }
        if let Some(host) = positional_host {
            config.host = host.to_string();
        }
        config.base_url()?;
        Ok(config)
    }
}
