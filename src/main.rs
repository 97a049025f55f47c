mod cli;

use anyhow::{anyhow, Result};
use clap::error::ErrorKind;
use clap::Parser;
use hasivo_core::{Command, ErrorReport, Outcome, SwitchService};
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use cli::{Cli, CliError, Invocation};

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.exit()
        }
        Err(err) => {
            let first_line = err.to_string().lines().next().unwrap_or_default().to_string();
            return emit_error(first_line.trim_start_matches("error: "));
        }
    };

    if let Err(err) = init_tracing(cli.verbose) {
        eprintln!("logging unavailable: {err}");
    }

    match run(&cli) {
        Ok(outcome) => emit(&outcome),
        Err(err) => emit_error(err),
    }
}

fn init_tracing(verbose: bool) -> Result<()> {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    // stdout carries the JSON result only.
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow!(err))
}

fn run(cli: &Cli) -> Result<Outcome, CliError> {
    let invocation = Invocation::from_args(&cli.args)?;
    let config = cli.resolve_config(invocation.host.as_deref())?;
    let service = SwitchService::new(config);

    let target = service.config().host.clone();
    match invocation.command {
        Command::ReadTelemetry => info!("reading telemetry from {target}"),
        Command::RebootDevice => info!("rebooting device at {target}"),
        Command::RebootPort { opcode } => info!("rebooting port opcode {opcode} at {target}"),
    }

    Ok(service.execute(invocation.command)?)
}

fn emit(outcome: &Outcome) -> ExitCode {
    match serde_json::to_string(outcome) {
        Ok(line) => {
            println!("{line}");
            ExitCode::SUCCESS
        }
        Err(err) => emit_error(format!("failed to encode result: {err}")),
    }
}

fn emit_error(err: impl ToString) -> ExitCode {
    let report = ErrorReport::new(err);
    match serde_json::to_string(&report) {
        Ok(line) => println!("{line}"),
        Err(_) => println!(r#"{{"status":"Error","error":"unencodable error"}}"#),
    }
    ExitCode::FAILURE
}
