mod cmd;
mod exit;
mod logging;
mod output;

use clap::Parser;

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "antcore", version, about = "ANT message codec CLI")]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level for antcore events (stderr). `RUST_LOG` overrides.
    #[arg(long, value_name = "LEVEL", default_value = "info", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    if let Err(err) = init_logging(cli.log_format, cli.log_level) {
        eprintln!("error: {err}");
        std::process::exit(err.code);
    }

    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
    let result = cmd::run(cli.command, format);

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_decode_subcommand() {
        let cli = Cli::try_parse_from(["antcore", "decode", "A4 01 4A 00 EF"])
            .expect("decode args should parse");
        assert!(matches!(cli.command, Command::Decode(_)));
    }

    #[test]
    fn parses_encode_with_hex_type() {
        let cli = Cli::try_parse_from([
            "antcore",
            "encode",
            "--type",
            "0x42",
            "--payload",
            "00 10 01",
            "--format",
            "raw",
        ])
        .expect("encode args should parse");

        let Command::Encode(args) = cli.command else {
            panic!("expected encode");
        };
        assert_eq!(args.msg_type, 0x42);
        assert_eq!(args.payload.as_deref(), Some("00 10 01"));
        assert!(matches!(cli.format, Some(OutputFormat::Raw)));
    }

    #[test]
    fn rejects_garbage_type() {
        let err = Cli::try_parse_from(["antcore", "encode", "--type", "zz"])
            .expect_err("invalid type should fail");
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn parses_scan_defaults() {
        let cli = Cli::try_parse_from(["antcore", "scan", "--count", "3"])
            .expect("scan args should parse");
        let Command::Scan(args) = cli.command else {
            panic!("expected scan");
        };
        assert!(args.path.is_none());
        assert_eq!(args.count, Some(3));
        assert_eq!(args.max_payload, antcore_frame::DEFAULT_MAX_PAYLOAD);
    }
}
