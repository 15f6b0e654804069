use std::fs::File;
use std::io::Read;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use antcore_frame::{FrameConfig, FrameError, FrameReader, MAX_PAYLOAD};
use antcore_message::{registry, Message};
use tracing::{info, warn};

use crate::cmd::ScanArgs;
use crate::exit::{frame_error, io_error, CliError, CliResult, INTERNAL, SUCCESS};
use crate::output::{print_message, to_hex, OutputFormat};

pub fn run(args: ScanArgs, format: OutputFormat) -> CliResult<i32> {
    if args.max_payload == 0 || args.max_payload > MAX_PAYLOAD {
        return Err(CliError::usage(format!(
            "--max-payload must be within 1..={MAX_PAYLOAD}"
        )));
    }

    let source: Box<dyn Read> = match &args.path {
        Some(path) => Box::new(
            File::open(path).map_err(|err| io_error(&format!("open {}", path.display()), err))?,
        ),
        None => Box::new(std::io::stdin().lock()),
    };
    let mut reader = FrameReader::with_config(
        source,
        FrameConfig {
            max_payload_size: args.max_payload,
        },
    );

    let running = Arc::new(AtomicBool::new(true));
    install_ctrlc_handler(running.clone())?;

    let mut printed = 0usize;
    let mut rejected = 0usize;

    while running.load(Ordering::SeqCst) {
        let frame = match reader.read_frame() {
            Ok(frame) => frame,
            Err(FrameError::ConnectionClosed) => break,
            Err(err) => return Err(frame_error("read failed", err)),
        };

        let msg = match Message::from_frame(frame).and_then(|raw| registry().interpret(raw)) {
            Ok(msg) => msg,
            Err(err) => {
                warn!(error = %err, "skipping message");
                rejected = rejected.saturating_add(1);
                continue;
            }
        };

        print_message(&msg, format);
        printed = printed.saturating_add(1);

        if let Some(count) = args.count {
            if printed >= count {
                break;
            }
        }
    }

    if !reader.buffered().is_empty() {
        info!(
            trailing = %to_hex(reader.buffered()),
            "incomplete bytes left at end of input"
        );
    }
    info!(printed, rejected, "scan finished");
    Ok(SUCCESS)
}

fn install_ctrlc_handler(running: Arc<AtomicBool>) -> CliResult<()> {
    ctrlc::set_handler(move || {
        // A second interrupt while blocked on input exits immediately.
        if !running.swap(false, Ordering::SeqCst) {
            std::process::exit(SUCCESS);
        }
    })
    .map_err(|err| CliError::new(INTERNAL, format!("signal handler setup failed: {err}")))
}
