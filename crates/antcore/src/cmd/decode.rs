use crate::cmd::DecodeArgs;
use crate::exit::{message_error, CliError, CliResult, SUCCESS};
use crate::output::{parse_hex, print_message, OutputFormat};

pub fn run(args: DecodeArgs, format: OutputFormat) -> CliResult<i32> {
    let raw = parse_hex(&args.hex).map_err(CliError::usage)?;
    let msg = antcore_message::decode(&raw).map_err(|err| message_error("decode failed", err))?;

    print_message(&msg, format);
    Ok(SUCCESS)
}
