#![cfg(feature = "cli")]

use std::path::PathBuf;
use std::process::{Command, Output};

fn antcore(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_antcore"))
        .arg("--log-level")
        .arg("error")
        .args(args)
        .output()
        .expect("antcore should run")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn frame(msg_type: u8, payload: &[u8]) -> Vec<u8> {
    let mut wire = vec![0xA4, payload.len() as u8, msg_type];
    wire.extend_from_slice(payload);
    let checksum = wire.iter().fold(0u8, |acc, byte| acc ^ byte);
    wire.push(checksum);
    wire
}

fn unique_temp_file(tag: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "antcore-{tag}-{}-{}.bin",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("time should be after epoch")
            .as_nanos()
    ))
}

#[test]
fn decode_prints_json() {
    let output = antcore(&["--format", "json", "decode", "A4 03 42 00 00 00 E5"]);

    assert!(output.status.success());
    let stdout = stdout(&output);
    assert!(stdout.contains("\"name\":\"ChannelAssign\""), "{stdout}");
    assert!(stdout.contains("\"msg_type\":\"0x42\""), "{stdout}");
    assert!(stdout.contains("\"channel\":0"), "{stdout}");
    assert!(stdout.contains("\"checksum\":\"0xE5\""), "{stdout}");
}

#[test]
fn decode_bad_checksum_exits_60() {
    let output = antcore(&["--format", "json", "decode", "A4 03 42 00 00 00 E4"]);

    assert_eq!(output.status.code(), Some(60));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("decode failed"), "{stderr}");
}

#[test]
fn decode_bad_hex_exits_64() {
    let output = antcore(&["decode", "A4 0"]);
    assert_eq!(output.status.code(), Some(64));
}

#[test]
fn encode_default_as_raw_hex() {
    let output = antcore(&["--format", "raw", "encode", "--type", "0x4A"]);

    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), "A4 01 4A 00 EF");
}

#[test]
fn encode_with_payload_and_sync() {
    let output = antcore(&[
        "--format", "json", "encode", "--type", "0x4B", "--payload", "03", "--sync", "0xA5",
    ]);

    assert!(output.status.success());
    let stdout = stdout(&output);
    assert!(stdout.contains("\"name\":\"ChannelOpen\""), "{stdout}");
    assert!(stdout.contains("\"sync\":\"0xA5\""), "{stdout}");
    assert!(stdout.contains("\"channel\":3"), "{stdout}");
}

#[test]
fn encode_rejects_out_of_range_type() {
    let output = antcore(&["encode", "--type", "0x100"]);
    assert_eq!(output.status.code(), Some(64));
}

#[test]
fn encode_rejects_payload_that_does_not_fit_variant() {
    let output = antcore(&["encode", "--type", "0x42", "--payload", "01"]);
    assert_eq!(output.status.code(), Some(60));
}

#[test]
fn scan_skips_noise_between_frames() {
    let path = unique_temp_file("scan");
    let mut bytes = vec![0x00, 0x13, 0xA4, 0x01];
    bytes.extend(frame(0x4B, &[1]));
    bytes.extend([0xA4, 0x01, 0x4B, 0x00, 0x00]);
    bytes.extend(frame(0x4E, &[2, 1, 2, 3, 4, 5, 6, 7, 8]));
    bytes.extend([0xA4, 0x09]);
    std::fs::write(&path, &bytes).expect("temp file should be writable");

    let output = antcore(&["--format", "json", "scan", path.to_str().expect("utf-8 path")]);
    let _ = std::fs::remove_file(&path);

    assert!(output.status.success());
    let stdout = stdout(&output);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 2, "{stdout}");
    assert!(lines[0].contains("\"name\":\"ChannelOpen\""));
    assert!(lines[1].contains("\"name\":\"BroadcastData\""));
    assert!(lines[1].contains("\"channel\":2"));
}

#[test]
fn scan_stops_after_count() {
    let path = unique_temp_file("count");
    let mut bytes = Vec::new();
    for channel in 0..4 {
        bytes.extend(frame(0x4C, &[channel]));
    }
    std::fs::write(&path, &bytes).expect("temp file should be writable");

    let output = antcore(&[
        "--format",
        "pretty",
        "scan",
        "--count",
        "2",
        path.to_str().expect("utf-8 path"),
    ]);
    let _ = std::fs::remove_file(&path);

    assert!(output.status.success());
    assert_eq!(stdout(&output).lines().count(), 2);
}

#[test]
fn scan_missing_file_fails() {
    let path = unique_temp_file("missing");
    let output = antcore(&["scan", path.to_str().expect("utf-8 path")]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn types_lists_registry() {
    let output = antcore(&["--format", "json", "types"]);

    assert!(output.status.success());
    let stdout = stdout(&output);
    assert!(stdout.contains("{\"msg_type\":\"0x42\",\"name\":\"ChannelAssign\"}"), "{stdout}");
    assert!(stdout.contains("\"LegacyBurstData\""), "{stdout}");
}

#[test]
fn version_prints_name() {
    let output = antcore(&["version"]);
    assert!(output.status.success());
    assert!(stdout(&output).starts_with("antcore "));

    let extended = antcore(&["version", "--extended"]);
    assert!(stdout(&extended).contains("features: async="));
}
