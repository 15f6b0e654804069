use std::io::{IsTerminal, Write};

use antcore_frame::sync::sync_name;
use antcore_message::{AntMessage, Registry};
use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct MessageOutput<'a> {
    msg_type: String,
    name: &'a str,
    channel: Option<u8>,
    sync: String,
    format: &'a str,
    payload_size: usize,
    payload: String,
    checksum: String,
    summary: String,
}

impl<'a> MessageOutput<'a> {
    fn new(msg: &'a AntMessage) -> Self {
        let raw = msg.message();
        Self {
            msg_type: format!("0x{:02X}", raw.msg_type()),
            name: msg.name(),
            channel: msg.channel_number(),
            sync: format!("0x{:02X}", raw.sync()),
            format: raw.format().name(),
            payload_size: raw.payload().len(),
            payload: to_hex(raw.payload()),
            checksum: format!("0x{:02X}", raw.checksum()),
            summary: msg.to_string(),
        }
    }
}

pub fn print_message(msg: &AntMessage, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string(&MessageOutput::new(msg)).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let out = MessageOutput::new(msg);
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["TYPE", "NAME", "CHANNEL", "FORMAT", "PAYLOAD"])
                .add_row(vec![
                    out.msg_type,
                    out.name.to_string(),
                    out.channel
                        .map(|channel| channel.to_string())
                        .unwrap_or_else(|| "-".to_string()),
                    out.format.to_string(),
                    out.payload,
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            let raw = msg.message();
            println!(
                "{} type=0x{:02X} sync={} size={} payload={}",
                msg,
                raw.msg_type(),
                sync_name(raw.sync()),
                raw.payload().len(),
                to_hex(raw.payload())
            );
        }
        OutputFormat::Raw => print_hex_line(&msg.encode()),
    }
}

#[derive(Serialize)]
struct TypeOutput<'a> {
    msg_type: String,
    name: &'a str,
}

pub fn print_types(registry: &Registry, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let types: Vec<TypeOutput<'_>> = registry
                .entries()
                .map(|entry| TypeOutput {
                    msg_type: format!("0x{:02X}", entry.msg_type),
                    name: entry.name,
                })
                .collect();
            println!(
                "{}",
                serde_json::to_string(&types).unwrap_or_else(|_| "[]".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["TYPE", "NAME"]);
            for entry in registry.entries() {
                table.add_row(vec![format!("0x{:02X}", entry.msg_type), entry.name.to_string()]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty | OutputFormat::Raw => {
            for entry in registry.entries() {
                println!("0x{:02X} {}", entry.msg_type, entry.name);
            }
        }
    }
}

pub fn print_hex_line(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = writeln!(out, "{}", to_hex(data));
    let _ = out.flush();
}

/// Space separated upper-case hex, e.g. `A4 01 4A 00 EF`.
pub fn to_hex(data: &[u8]) -> String {
    data.iter()
        .map(|byte| hex::encode_upper([*byte]))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parse hex bytes. Whitespace, `:` and `,` separators and a `0x` prefix on
/// each group are accepted.
pub fn parse_hex(input: &str) -> Result<Vec<u8>, String> {
    let digits: String = input
        .split(|c: char| c.is_whitespace() || c == ':' || c == ',')
        .map(|group| {
            group
                .strip_prefix("0x")
                .or_else(|| group.strip_prefix("0X"))
                .unwrap_or(group)
        })
        .collect();

    hex::decode(&digits).map_err(|err| format!("invalid hex {input:?}: {err}"))
}

/// Parse a single byte given as hex (`0x4E`, `4e`) or decimal (`78`).
pub fn parse_byte_arg(input: &str) -> Result<u16, String> {
    let trimmed = input.trim();
    let parsed = match trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        Some(hex) => u16::from_str_radix(hex, 16),
        None => trimmed.parse::<u16>(),
    };
    parsed.map_err(|_| format!("invalid number {input:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_roundtrip() {
        let bytes = [0xA4, 0x01, 0x4A, 0x00, 0xEF];
        assert_eq!(to_hex(&bytes), "A4 01 4A 00 EF");
        assert_eq!(parse_hex("A4 01 4A 00 EF").unwrap(), bytes);
        assert_eq!(parse_hex("a4014a00ef").unwrap(), bytes);
        assert_eq!(parse_hex("0xA4,0x01,0x4A,0x00,0xEF").unwrap(), bytes);
        assert_eq!(parse_hex("a4:01:4a:00:ef").unwrap(), bytes);
    }

    #[test]
    fn hex_rejects_bad_input() {
        assert!(parse_hex("A4 0").unwrap_err().contains("Odd number of digits"));
        assert!(parse_hex("ZZ").is_err());
        assert!(parse_hex("é1").is_err());
        assert!(parse_hex("").unwrap().is_empty());
    }

    #[test]
    fn byte_args() {
        assert_eq!(parse_byte_arg("0x4E").unwrap(), 0x4E);
        assert!(parse_byte_arg("4e").is_err());
        assert_eq!(parse_byte_arg("78").unwrap(), 78);
        assert_eq!(parse_byte_arg("0x100").unwrap(), 0x100);
        assert!(parse_byte_arg("x").is_err());
    }
}
