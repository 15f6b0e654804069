use antcore_message::registry;
use tracing::debug;

use crate::cmd::EncodeArgs;
use crate::exit::{message_error, CliError, CliResult, SUCCESS};
use crate::output::{parse_hex, print_message, OutputFormat};

pub fn run(args: EncodeArgs, format: OutputFormat) -> CliResult<i32> {
    let registry = registry();
    let msg = match &args.payload {
        Some(hex) => {
            let payload = parse_hex(hex).map_err(CliError::usage)?;
            registry.construct_with_payload(args.msg_type, &payload)
        }
        None => registry.construct(args.msg_type),
    }
    .map_err(|err| message_error("encode failed", err))?;

    let msg = match args.sync {
        Some(sync) => {
            let sync = u8::try_from(sync)
                .map_err(|_| CliError::usage(format!("sync byte out of range: 0x{sync:X}")))?;
            let raw = msg
                .into_message()
                .with_sync(sync)
                .map_err(|err| message_error("encode failed", err))?;
            registry
                .interpret(raw)
                .map_err(|err| message_error("encode failed", err))?
        }
        None => msg,
    };

    debug!(msg_type = msg.msg_type(), name = msg.name(), "encoded message");
    print_message(&msg, format);
    Ok(SUCCESS)
}
