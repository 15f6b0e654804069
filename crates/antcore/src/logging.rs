use clap::ValueEnum;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::exit::{CliError, CliResult, INTERNAL};

/// Targets `--log-level` applies to. Other crates stay at `warn`.
const TARGETS: [&str; 3] = ["antcore", "antcore_frame", "antcore_message"];

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// Filter directives for `level`, e.g. `warn,antcore=debug,antcore_frame=debug,...`.
///
/// `--log-level debug` turns on the scanner's resync diagnostics without
/// pulling in debug output from dependencies.
pub fn directives(level: LogLevel) -> String {
    let others = if level == LogLevel::Error {
        "error"
    } else {
        "warn"
    };
    let mut out = String::from(others);
    for target in TARGETS {
        out.push(',');
        out.push_str(target);
        out.push('=');
        out.push_str(level.as_str());
    }
    out
}

/// Route library and CLI events to stderr. Stdout carries command output only.
///
/// `RUST_LOG`, when set, replaces the directives derived from `level`.
pub fn init_logging(format: LogFormat, level: LogLevel) -> CliResult<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives(level)));
    let subscriber = tracing_subscriber::registry().with(filter);

    let result = match format {
        LogFormat::Text => subscriber
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(false)
                    .with_target(false),
            )
            .try_init(),
        LogFormat::Json => subscriber
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
    };

    result.map_err(|err| CliError::new(INTERNAL, format!("failed to init logging: {err}")))
}
