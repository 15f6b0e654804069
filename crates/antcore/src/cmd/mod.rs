use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::exit::CliResult;
use crate::output::{parse_byte_arg, OutputFormat};

pub mod decode;
pub mod encode;
pub mod scan;
pub mod types;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Decode one frame given as hex.
    Decode(DecodeArgs),
    /// Build a message and print it.
    Encode(EncodeArgs),
    /// Read a byte stream and print every frame found in it.
    Scan(ScanArgs),
    /// List the registered message types.
    Types(TypesArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Decode(args) => decode::run(args, format),
        Command::Encode(args) => encode::run(args, format),
        Command::Scan(args) => scan::run(args, format),
        Command::Types(args) => types::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Frame bytes in hex, e.g. "A4 01 4A 00 EF".
    pub hex: String,
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Message type, hex (0x4E) or decimal.
    #[arg(long = "type", value_name = "TYPE", value_parser = parse_byte_arg)]
    pub msg_type: u16,
    /// Payload bytes in hex. Defaults to the type's default payload.
    #[arg(long)]
    pub payload: Option<String>,
    /// Sync byte, 0xA4 or 0xA5.
    #[arg(long, value_parser = parse_byte_arg)]
    pub sync: Option<u16>,
}

#[derive(Args, Debug)]
pub struct ScanArgs {
    /// File to read. Reads stdin when omitted.
    pub path: Option<PathBuf>,
    /// Exit after printing N messages.
    #[arg(long)]
    pub count: Option<usize>,
    /// Largest payload accepted before a sync candidate is treated as noise.
    #[arg(long, default_value_t = antcore_frame::DEFAULT_MAX_PAYLOAD)]
    pub max_payload: usize,
}

#[derive(Args, Debug, Default)]
pub struct TypesArgs {}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}
